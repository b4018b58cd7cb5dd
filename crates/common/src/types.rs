//! Core types for the complex forms harness

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Country offered by the address dropdowns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_states: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_provinces: bool,
}

impl Country {
    /// Whether the country has a second-level subdivision list.
    pub fn has_subdivisions(&self) -> bool {
        self.has_states || self.has_provinces
    }
}

/// State or province of a country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub has_teams: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTitle {
    pub id: String,
    pub name: String,
    pub department: String,
    pub level: String,
}

/// One page of a paginated search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub has_more: bool,
}

impl<T: Clone> Page<T> {
    /// Slice `matches` at `offset..offset + limit`.
    pub fn slice(matches: &[T], offset: usize, limit: usize) -> Self {
        let total = matches.len();
        let start = offset.min(total);
        let end = offset.saturating_add(limit).min(total);
        Self {
            items: matches[start..end].to_vec(),
            total,
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

/// Generic `{ id, name }` option used by the Workday-style dropdowns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedOption {
    pub id: String,
    pub name: String,
}

impl NamedOption {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Option shape of the two-level Workday hierarchical dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelOption {
    pub id: String,
    pub text: String,
    pub value: String,
}

/// User identifier
pub type UserId = u64;

/// Stored user account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

/// User as returned to clients (no password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Which submission endpoint recorded a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Basic,
    Complex,
    Multipage,
    Workday,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Basic => "basic",
            FormKind::Complex => "complex",
            FormKind::Multipage => "multipage",
            FormKind::Workday => "workday",
        }
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FormKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(FormKind::Basic),
            "complex" => Ok(FormKind::Complex),
            "multipage" | "multi-page" => Ok(FormKind::Multipage),
            "workday" => Ok(FormKind::Workday),
            other => Err(crate::Error::InvalidInput(format!("unknown form kind: {other}"))),
        }
    }
}

/// Recorded form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub user_id: UserId,
    pub form_kind: FormKind,
    /// Form variant reported by the client in the body's `type` field.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    pub data: serde_json::Value,
    pub submitted_at: DateTime<Utc>,
}

/// Server-side state of a paginated form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiPageSession {
    pub id: String,
    pub user_id: UserId,
    pub pages: BTreeMap<u32, serde_json::Value>,
    pub current_page: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub submitted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_slice_bounds() {
        let data: Vec<u32> = (0..10).collect();

        let page = Page::slice(&data, 0, 4);
        assert_eq!(page.items, vec![0, 1, 2, 3]);
        assert_eq!(page.total, 10);
        assert!(page.has_more);

        let page = Page::slice(&data, 8, 4);
        assert_eq!(page.items, vec![8, 9]);
        assert!(!page.has_more);

        let page = Page::slice(&data, 50, 4);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 10);
        assert!(!page.has_more);
    }

    #[test]
    fn test_country_flags_omitted_when_false() {
        let uk = Country {
            id: "UK".into(),
            name: "United Kingdom".into(),
            has_states: false,
            has_provinces: false,
        };
        let json = serde_json::to_value(&uk).unwrap();
        assert_eq!(json, serde_json::json!({"id": "UK", "name": "United Kingdom"}));
    }

    #[test]
    fn test_form_kind_parse() {
        assert_eq!("Basic".parse::<FormKind>().unwrap(), FormKind::Basic);
        assert_eq!("multi-page".parse::<FormKind>().unwrap(), FormKind::Multipage);
        assert!("lever".parse::<FormKind>().is_err());
    }

    #[test]
    fn test_session_pages_serialize_with_string_keys() {
        let mut pages = BTreeMap::new();
        pages.insert(2, serde_json::json!({"a": 1}));
        let session = MultiPageSession {
            id: "s1".into(),
            user_id: 1,
            pages,
            current_page: 2,
            started_at: Utc::now(),
            last_updated: None,
            submitted: false,
            submitted_at: None,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["pages"]["2"]["a"], 1);
        assert_eq!(json["currentPage"], 2);
        assert!(json.get("submitted").is_none());
    }
}
