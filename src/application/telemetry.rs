//! Telemetry port: dependency calls and show transitions.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::live_show::ShowEvent;

/// Kind of storage call recorded as a dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    Download,
    Upload,
}

impl StorageOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Download => "Download",
            Self::Upload => "Upload",
        }
    }
}

/// One storage call, as reported to telemetry.
#[derive(Debug, Clone)]
pub struct DependencyRecord {
    pub target: String,
    pub name: String,
    pub uri: String,
    pub operation: StorageOperation,
    pub size_bytes: u64,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub success: bool,
}

impl DependencyRecord {
    pub const KIND: &'static str = "Storage";
}

/// Fire-and-forget reporting sink.
///
/// Implementations must not fail or block; callers check `is_enabled` before doing any
/// work to build a record.
pub trait Telemetry: Send + Sync {
    fn is_enabled(&self) -> bool;

    fn track_dependency(&self, record: DependencyRecord);

    fn track_event(&self, event: ShowEvent);
}

/// Telemetry sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTelemetry;

impl Telemetry for DisabledTelemetry {
    fn is_enabled(&self) -> bool {
        false
    }

    fn track_dependency(&self, _record: DependencyRecord) {}

    fn track_event(&self, _event: ShowEvent) {}
}
