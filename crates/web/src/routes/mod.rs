//! HTTP handlers, grouped by API area.

pub mod auth;
pub mod form_data;
pub mod forms;
pub mod hierarchy;
pub mod submissions;
pub mod workday;
