//! HTML views rendered with askama.

pub mod admin;
pub mod views;
