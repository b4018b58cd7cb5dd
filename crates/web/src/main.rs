use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use complex_forms_api::{ServerConfig, WebServer};
use complex_forms_common::Store;

#[derive(Parser)]
#[command(name = "complex-forms-api")]
#[command(about = "Mock job-application form API for exercising autofill tooling")]
#[command(version)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind host
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Bind port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Token signing secret
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// Access token lifetime in hours
    #[arg(long, env = "COMPLEX_FORMS_TOKEN_TTL_HOURS")]
    token_ttl_hours: Option<u64>,

    /// Persist users and submissions to this JSON file
    #[arg(long, env = "COMPLEX_FORMS_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Serve the built SPA from this directory
    #[arg(long, env = "COMPLEX_FORMS_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Answer form-data requests without simulated delay
    #[arg(long, env = "COMPLEX_FORMS_NO_LATENCY")]
    no_latency: bool,

    /// Skip creating the demo user
    #[arg(long)]
    no_demo_user: bool,

    /// Disable per-IP rate limiting
    #[arg(long)]
    no_rate_limit: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if self.jwt_secret.is_some() {
            config.jwt_secret = self.jwt_secret;
        }
        if let Some(hours) = self.token_ttl_hours {
            config.token_ttl_hours = hours;
        }
        if self.data_file.is_some() {
            config.data_file = self.data_file;
        }
        if self.static_dir.is_some() {
            config.static_dir = self.static_dir;
        }
        if self.no_latency {
            config.simulate_latency = false;
        }
        if self.no_demo_user {
            config.seed_demo_user = false;
        }
        if self.no_rate_limit {
            config.rate_limit.enabled = false;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    info!("Complex forms API v{}", complex_forms_common::VERSION);

    let config = cli.into_config()?;
    let addr = config.listen_addr().await?;

    let store = match &config.data_file {
        Some(path) => {
            info!("Persisting data to {}", path.display());
            Store::open(path)?
        }
        None => {
            info!("Using in-memory store; data is lost on exit");
            Store::in_memory()
        }
    };
    if let Some(dir) = &config.static_dir {
        info!("Serving SPA from {}", dir.display());
    }

    let seed = config.seed_demo_user;
    let server = WebServer::new(config, store);
    if seed {
        server.seed_demo_user()?;
    }

    server.serve(addr).await
}
