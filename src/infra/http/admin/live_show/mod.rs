//! Live show admin module.
//!
//! - `handlers`: form page, save and cache clearing
//! - `forms`: the posted form and its mapping to service input
//! - `api`: JSON read/replace of the stored document

pub(super) mod api;
mod forms;
mod handlers;

pub(super) use handlers::{admin_live_show, admin_live_show_clear_cache, admin_live_show_save};
