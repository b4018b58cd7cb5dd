//! Users, submissions and multi-page sessions
//!
//! State lives in memory behind a lock. When opened with a path, every
//! mutation rewrites the JSON snapshot through a temp file in the same
//! directory, so a crash never leaves a half-written file behind. A
//! mutation only becomes visible in memory once its snapshot is written.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{FormKind, MultiPageSession, NewUser, Submission, UserId, UserRecord};
use crate::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreData {
    #[serde(default)]
    users: Vec<UserRecord>,
    #[serde(default)]
    submissions: Vec<Submission>,
    #[serde(default)]
    sessions: BTreeMap<String, MultiPageSession>,
}

/// Query filter for [`Store::list_submissions`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionFilter {
    /// Client-reported form variant, compared case-insensitively
    #[serde(rename = "type", default)]
    pub form_type: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    /// Inclusive lower bound, `YYYY-MM-DD`
    #[serde(default)]
    pub from: Option<String>,
    /// Inclusive upper bound, `YYYY-MM-DD`
    #[serde(default)]
    pub to: Option<String>,
    /// Case-insensitive substring of the submitted data
    #[serde(default)]
    pub q: Option<String>,
}

struct CompiledFilter {
    form_type: Option<String>,
    kind: Option<FormKind>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    q: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        Error::InvalidInput(format!("{field} must be a YYYY-MM-DD date, got {value:?}"))
    })
}

impl SubmissionFilter {
    fn compile(&self) -> Result<CompiledFilter> {
        Ok(CompiledFilter {
            form_type: non_empty(&self.form_type).map(str::to_lowercase),
            kind: non_empty(&self.kind)
                .map(str::parse::<FormKind>)
                .transpose()?,
            from: non_empty(&self.from).map(|v| parse_date("from", v)).transpose()?,
            to: non_empty(&self.to).map(|v| parse_date("to", v)).transpose()?,
            q: non_empty(&self.q).map(str::to_lowercase),
        })
    }
}

impl CompiledFilter {
    fn matches(&self, submission: &Submission) -> bool {
        if let Some(wanted) = &self.form_type {
            match &submission.form_type {
                Some(t) if t.to_lowercase() == *wanted => {}
                _ => return false,
            }
        }
        if self.kind.is_some_and(|k| k != submission.form_kind) {
            return false;
        }
        let day = submission.submitted_at.date_naive();
        if self.from.is_some_and(|from| day < from) || self.to.is_some_and(|to| day > to) {
            return false;
        }
        if let Some(q) = &self.q {
            return submission.data.to_string().to_lowercase().contains(q.as_str());
        }
        true
    }
}

/// Shared application store
pub struct Store {
    data: RwLock<StoreData>,
    path: Option<PathBuf>,
}

impl Store {
    /// Store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            data: RwLock::new(StoreData::default()),
            path: None,
        }
    }

    /// Open a store backed by a JSON file. A missing file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let data: StoreData = if raw.trim().is_empty() {
                StoreData::default()
            } else {
                serde_json::from_str(&raw)?
            };
            info!(
                "Loaded store from {} ({} users, {} submissions, {} sessions)",
                path.display(),
                data.users.len(),
                data.submissions.len(),
                data.sessions.len()
            );
            data
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            info!("Starting empty store at {}", path.display());
            StoreData::default()
        };
        Ok(Self {
            data: RwLock::new(data),
            path: Some(path),
        })
    }

    fn persist(&self, data: &StoreData) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, data)?;
        tmp.flush()?;
        tmp.persist(path)?;
        debug!("Persisted store to {}", path.display());
        Ok(())
    }

    /// Run `change` against a copy of the state and swap it in only after
    /// the snapshot is on disk.
    fn commit<T>(&self, change: impl FnOnce(&mut StoreData) -> Result<T>) -> Result<T> {
        let mut data = self.data.write();
        if self.path.is_none() {
            return change(&mut data);
        }
        let mut next = data.clone();
        let out = change(&mut next)?;
        self.persist(&next)?;
        *data = next;
        Ok(out)
    }

    // ---- users ----

    pub fn create_user(&self, new: NewUser) -> Result<UserRecord> {
        let email = new.email.trim().to_string();
        if email.is_empty() {
            return Err(Error::InvalidInput("email is required".to_string()));
        }

        self.commit(|data| {
            if data.users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
                return Err(Error::already_exists("user", email));
            }
            let id = data.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
            let user = UserRecord {
                id,
                email,
                password_hash: new.password_hash,
                first_name: new.first_name,
                last_name: new.last_name,
                created_at: Utc::now(),
            };
            data.users.push(user.clone());
            Ok(user)
        })
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<UserRecord> {
        let email = email.trim();
        self.data
            .read()
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn get_user(&self, id: UserId) -> Option<UserRecord> {
        self.data.read().users.iter().find(|u| u.id == id).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.data.read().users.len()
    }

    // ---- submissions ----

    /// Record a submission. The body's top-level `type` string, if any, is
    /// kept as the form variant.
    pub fn record_submission(
        &self,
        user_id: UserId,
        kind: FormKind,
        data: serde_json::Value,
    ) -> Result<Submission> {
        let form_type = data
            .get("type")
            .and_then(|t| t.as_str())
            .map(str::to_string);
        let submission = Submission {
            id: Uuid::new_v4().to_string(),
            user_id,
            form_kind: kind,
            form_type,
            data,
            submitted_at: Utc::now(),
        };

        self.commit(|data| {
            data.submissions.push(submission.clone());
            Ok(submission)
        })
    }

    /// The caller's submissions matching `filter`, newest first.
    pub fn list_submissions(
        &self,
        user_id: UserId,
        filter: &SubmissionFilter,
    ) -> Result<Vec<Submission>> {
        let filter = filter.compile()?;
        Ok(self
            .data
            .read()
            .submissions
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id && filter.matches(s))
            .cloned()
            .collect())
    }

    pub fn get_submission(&self, user_id: UserId, id: &str) -> Result<Submission> {
        self.data
            .read()
            .submissions
            .iter()
            .find(|s| s.id == id && s.user_id == user_id)
            .cloned()
            .ok_or_else(|| Error::not_found("submission", id))
    }

    // ---- multi-page sessions ----

    pub fn start_session(&self, user_id: UserId) -> Result<MultiPageSession> {
        let session = MultiPageSession {
            id: Uuid::new_v4().to_string(),
            user_id,
            pages: BTreeMap::new(),
            current_page: 1,
            started_at: Utc::now(),
            last_updated: None,
            submitted: false,
            submitted_at: None,
        };
        self.commit(|data| {
            data.sessions.insert(session.id.clone(), session.clone());
            Ok(session)
        })
    }

    pub fn get_session(&self, user_id: UserId, session_id: &str) -> Result<MultiPageSession> {
        self.data
            .read()
            .sessions
            .get(session_id)
            .filter(|s| s.user_id == user_id)
            .cloned()
            .ok_or_else(|| Error::not_found("session", session_id))
    }

    /// Store `page_data` under page `page` and make it the current page.
    pub fn save_page(
        &self,
        user_id: UserId,
        session_id: &str,
        page: u32,
        page_data: serde_json::Value,
    ) -> Result<MultiPageSession> {
        if page == 0 {
            return Err(Error::InvalidInput("page number must be at least 1".to_string()));
        }
        self.commit(|data| {
            let session = data
                .sessions
                .get_mut(session_id)
                .filter(|s| s.user_id == user_id)
                .ok_or_else(|| Error::not_found("session", session_id))?;
            session.pages.insert(page, page_data);
            session.current_page = page;
            session.last_updated = Some(Utc::now());
            Ok(session.clone())
        })
    }

    /// Finish a session, recording a `multipage` submission whose id is the
    /// session id. Submitting an already-submitted session returns the
    /// existing record.
    pub fn submit_session(&self, user_id: UserId, session_id: &str) -> Result<Submission> {
        {
            let data = self.data.read();
            let session = data
                .sessions
                .get(session_id)
                .filter(|s| s.user_id == user_id)
                .ok_or_else(|| Error::not_found("session", session_id))?;
            if session.submitted {
                return data
                    .submissions
                    .iter()
                    .find(|s| s.id == session.id)
                    .cloned()
                    .ok_or_else(|| {
                        Error::Internal(format!("submitted session {} has no record", session.id))
                    });
            }
        }

        self.commit(|data| {
            let session = data
                .sessions
                .get_mut(session_id)
                .filter(|s| s.user_id == user_id)
                .ok_or_else(|| Error::not_found("session", session_id))?;
            if session.submitted {
                // lost a race with another submit; the record already exists
                let id = session.id.clone();
                return data
                    .submissions
                    .iter()
                    .find(|s| s.id == id)
                    .cloned()
                    .ok_or_else(|| Error::Internal(format!("submitted session {id} has no record")));
            }

            let now = Utc::now();
            session.submitted = true;
            session.submitted_at = Some(now);
            let submission = Submission {
                id: session.id.clone(),
                user_id,
                form_kind: FormKind::Multipage,
                form_type: None,
                data: serde_json::json!({ "pages": session.pages }),
                submitted_at: now,
            };
            data.submissions.push(submission.clone());
            Ok(submission)
        })
    }
}
