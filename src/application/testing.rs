//! Test doubles shared by application-layer unit tests.

use std::sync::Mutex;

use crate::application::telemetry::{DependencyRecord, Telemetry};
use crate::domain::live_show::ShowEvent;

/// Telemetry sink that keeps everything it is given.
#[derive(Debug)]
pub struct RecordingTelemetry {
    enabled: bool,
    dependencies: Mutex<Vec<DependencyRecord>>,
    events: Mutex<Vec<ShowEvent>>,
}

impl RecordingTelemetry {
    pub fn enabled() -> Self {
        Self::with_enabled(true)
    }

    pub fn disabled() -> Self {
        Self::with_enabled(false)
    }

    fn with_enabled(enabled: bool) -> Self {
        Self {
            enabled,
            dependencies: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn dependencies(&self) -> Vec<DependencyRecord> {
        self.dependencies.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<ShowEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Telemetry for RecordingTelemetry {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn track_dependency(&self, record: DependencyRecord) {
        if self.enabled {
            self.dependencies.lock().unwrap().push(record);
        }
    }

    fn track_event(&self, event: ShowEvent) {
        if self.enabled {
            self.events.lock().unwrap().push(event);
        }
    }
}
