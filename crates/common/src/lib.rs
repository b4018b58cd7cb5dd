//! Complex Forms Common Library
//!
//! Form catalog data, hierarchy trees with hierarchical selection, password
//! hashing and the submission store shared by the complex forms API.

pub mod catalog;
pub mod error;
pub mod hierarchy;
pub mod password;
pub mod selection;
pub mod store;
pub mod types;
pub mod workday;

// Re-export commonly used types
pub use error::{Error, Result};
pub use hierarchy::{NodeView, Tree, TreeSummary};
pub use selection::{NodeState, Selection};
pub use store::{Store, SubmissionFilter};
pub use types::*;

/// Harness version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
