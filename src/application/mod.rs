//! Application services layer.

pub mod admin;
pub mod clock;
pub mod error;
pub mod live_show;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod testing;
