//! Workday-style option lookups
//!
//! Workday widgets POST their parent context in several redundant shapes
//! (`parentId`, `parentValue`, `parent`, `parentLabel`, `contextPath`).
//! [`OptionsRequest::parent_key`] picks whichever the client sent.

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::catalog;
use crate::types::{LevelOption, NamedOption, Region, Team};

static PHONE_CODES: Lazy<Vec<NamedOption>> = Lazy::new(|| {
    [
        ("+1", "United States (+1)"),
        ("+1-CA", "Canada (+1)"),
        ("+44", "United Kingdom (+44)"),
        ("+49", "Germany (+49)"),
        ("+33", "France (+33)"),
        ("+81", "Japan (+81)"),
        ("+61", "Australia (+61)"),
        ("+55", "Brazil (+55)"),
        ("+91", "India (+91)"),
        ("+86", "China (+86)"),
    ]
    .into_iter()
    .map(|(id, name)| NamedOption::new(id, name))
    .collect()
});

static PHONE_TYPES: Lazy<Vec<NamedOption>> = Lazy::new(|| {
    [
        ("mobile", "Mobile"),
        ("home", "Home"),
        ("work", "Work"),
        ("fax", "Fax"),
        ("other", "Other"),
    ]
    .into_iter()
    .map(|(id, name)| NamedOption::new(id, name))
    .collect()
});

/// Body of a Workday option request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsRequest {
    #[serde(default)]
    pub parent_value: Option<String>,
    #[serde(default)]
    pub parent_label: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub context_path: Vec<String>,
    #[serde(default)]
    pub level: Option<u32>,
}

impl OptionsRequest {
    /// First non-empty parent reference, in order of specificity.
    pub fn parent_key(&self) -> Option<&str> {
        [
            self.parent_id.as_deref(),
            self.parent_value.as_deref(),
            self.parent.as_deref(),
            self.parent_label.as_deref(),
            self.context_path.last().map(String::as_str),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
    }
}

/// Split a compound `"US|CA"` value into its parent and child parts.
pub fn split_compound(value: &str) -> (&str, Option<&str>) {
    match value.split_once('|') {
        Some((parent, child)) => (parent, Some(child).filter(|c| !c.is_empty())),
        None => (value, None),
    }
}

pub fn phone_codes() -> &'static [NamedOption] {
    &PHONE_CODES
}

pub fn phone_types() -> &'static [NamedOption] {
    &PHONE_TYPES
}

/// States for the country named by the request, resolved by id or name.
pub fn states_for(req: &OptionsRequest) -> &'static [Region] {
    req.parent_key()
        .map(|key| split_compound(key).0)
        .and_then(catalog::find_country)
        .map(|c| catalog::states(&c.id))
        .unwrap_or(&[])
}

/// Teams for the department named by the request, resolved by id or name.
pub fn teams_for(req: &OptionsRequest) -> &'static [Team] {
    req.parent_key()
        .map(|key| split_compound(key).0)
        .and_then(catalog::find_department)
        .map(|d| catalog::teams(&d.id))
        .unwrap_or(&[])
}

/// Level-1 options of the location picker.
pub fn country_level_options() -> Vec<LevelOption> {
    catalog::countries()
        .iter()
        .map(|c| LevelOption {
            id: c.id.clone(),
            text: c.name.clone(),
            value: c.id.clone(),
        })
        .collect()
}

/// Level-2 options of the location picker for the requested country.
pub fn state_level_options(req: &OptionsRequest) -> Vec<LevelOption> {
    states_for(req)
        .iter()
        .map(|s| LevelOption {
            id: s.id.clone(),
            text: s.name.clone(),
            value: s.id.clone(),
        })
        .collect()
}
