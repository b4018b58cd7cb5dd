//! Web server implementation

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use complex_forms_common::{password, NewUser, Store, UserRecord};
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::{require_auth, TokenSigner};
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::rate_limit::{self, RateLimiter};
use crate::routes::{auth, form_data, forms, hierarchy, submissions, workday};

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password123";

/// State shared by every handler
pub struct AppState {
    pub config: ServerConfig,
    pub store: Store,
    pub signer: TokenSigner,
    pub limiter: Mutex<RateLimiter>,
}

impl AppState {
    pub fn new(config: ServerConfig, store: Store) -> Self {
        let secret = match config.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => secret.to_string(),
            None => {
                warn!("JWT_SECRET not set; generated a random secret, tokens will not survive a restart");
                TokenSigner::random_secret()
            }
        };
        Self {
            signer: TokenSigner::new(secret.as_bytes(), config.token_ttl_hours),
            limiter: Mutex::new(RateLimiter::from_config(&config.rate_limit)),
            config,
            store,
        }
    }

    /// Sleep for `ms` when latency simulation is on.
    pub async fn latency(&self, ms: u64) {
        if self.config.simulate_latency {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    pub fn issue_token(&self, user: &UserRecord) -> Result<String, ApiError> {
        self.signer
            .issue(user)
            .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
    }
}

/// Web server state
#[derive(Clone)]
pub struct WebServer {
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server
    pub fn new(config: ServerConfig, store: Store) -> Self {
        Self {
            state: Arc::new(AppState::new(config, store)),
        }
    }

    /// Create the demo account if it does not exist yet.
    pub fn seed_demo_user(&self) -> anyhow::Result<()> {
        if self.state.store.find_user_by_email(DEMO_EMAIL).is_some() {
            return Ok(());
        }
        let password_hash =
            password::hash_password(DEMO_PASSWORD, self.state.config.password_iterations)?;
        let user = self.state.store.create_user(NewUser {
            email: DEMO_EMAIL.to_string(),
            password_hash,
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
        })?;
        info!("Seeded demo user {} ({})", user.email, user.id);
        Ok(())
    }

    /// Create router
    pub fn router(&self) -> Router {
        let state = self.state.clone();

        // Protected routes (require a bearer token)
        let protected_routes = Router::new()
            .route("/api/auth/me", get(auth::me))
            .route("/api/forms/basic", post(forms::basic))
            .route("/api/forms/complex", post(forms::complex))
            .route("/api/forms/workday", post(forms::workday))
            .route("/api/forms/multipage/start", post(forms::start_multipage))
            .route(
                "/api/forms/multipage/:session_id/page/:page_number",
                post(forms::save_page),
            )
            .route("/api/forms/multipage/:session_id", get(forms::get_session))
            .route(
                "/api/forms/multipage/:session_id/submit",
                post(forms::submit_multipage),
            )
            .route("/api/forms/submissions", get(submissions::list))
            .route("/api/forms/submissions/:id", get(submissions::get))
            .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

        // Public routes (no auth required)
        Router::new()
            .route("/api/health", get(health_handler))
            .route("/api/auth/register", post(auth::register))
            .route("/api/auth/login", post(auth::login))
            // Cascading dropdown data
            .route(
                "/api/form-data/countries",
                get(form_data::countries).post(form_data::countries),
            )
            .route("/api/form-data/states/:country_id", get(form_data::states))
            .route(
                "/api/form-data/departments",
                get(form_data::departments).post(form_data::departments),
            )
            .route("/api/form-data/teams/:department_id", get(form_data::teams))
            .route("/api/form-data/skills", get(form_data::skills))
            .route("/api/form-data/job-titles", get(form_data::job_titles))
            // Hierarchy trees
            .route("/api/form-data/hierarchy", get(hierarchy::list))
            .route("/api/form-data/hierarchy/:tree", get(hierarchy::children))
            .route(
                "/api/form-data/hierarchy/:tree/resolve",
                post(hierarchy::resolve),
            )
            // Workday-style widgets
            .route("/api/form-data/workday/states", post(workday::states))
            .route("/api/form-data/workday/teams", post(workday::teams))
            .route(
                "/api/form-data/workday/phone-codes",
                post(workday::phone_codes),
            )
            .route(
                "/api/form-data/workday/phone-types",
                post(workday::phone_types),
            )
            .route(
                "/api/form-data/workday/locations/countries",
                post(workday::location_countries),
            )
            .route(
                "/api/form-data/workday/locations/states",
                post(workday::location_states),
            )
            .merge(protected_routes)
            .fallback(fallback_handler)
            .layer(middleware::map_response(method_not_allowed_json))
            .layer(middleware::from_fn_with_state(state.clone(), rate_limit::limit))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the web server
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        info!("Complex forms API listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;

        Ok(())
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Give the router's bare 405s a JSON body, keeping the `Allow` header.
async fn method_not_allowed_json(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let mut json = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = response.headers().get(header::ALLOW) {
        json.headers_mut().insert(header::ALLOW, allow.clone());
    }
    json
}

/// Unknown `/api/*` paths get a JSON 404; everything else is the SPA.
async fn fallback_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let path = request.uri().path();
    let is_api = path == "/api" || path.starts_with("/api/");

    match (&state.config.static_dir, is_api) {
        (Some(dir), false) => {
            let index = ServeFile::new(dir.join("index.html"));
            match ServeDir::new(dir).fallback(index).oneshot(request).await {
                Ok(response) => response.into_response(),
                Err(never) => match never {},
            }
        }
        _ => ApiError::NotFound("Not found".to_string()).into_response(),
    }
}
