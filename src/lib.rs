//! Admin console and read API for a website's live show details.
//!
//! The details are a single JSON document in object storage, read through an
//! in-process cache and edited from an admin form.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
