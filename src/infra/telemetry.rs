use std::sync::Once;

use metrics::{Unit, counter, describe_counter, describe_histogram, histogram};
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::application::telemetry::{DependencyRecord, Telemetry};
use crate::cache::{METRIC_CACHE_EVICT_TOTAL, METRIC_CACHE_HIT_TOTAL, METRIC_CACHE_MISS_TOTAL};
use crate::config::{LogFormat, LoggingSettings};
use crate::domain::live_show::ShowEvent;

use super::error::InfraError;

pub const METRIC_STORAGE_REQUEST_MS: &str = "onair_storage_request_ms";
pub const METRIC_STORAGE_REQUEST_TOTAL: &str = "onair_storage_request_total";
pub const METRIC_SHOW_TRANSITION_TOTAL: &str = "onair_show_transition_total";

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_CACHE_HIT_TOTAL,
            Unit::Count,
            "Total number of live show cache hits."
        );
        describe_counter!(
            METRIC_CACHE_MISS_TOTAL,
            Unit::Count,
            "Total number of live show cache misses."
        );
        describe_counter!(
            METRIC_CACHE_EVICT_TOTAL,
            Unit::Count,
            "Total number of cache evictions due to capacity."
        );
        describe_histogram!(
            METRIC_STORAGE_REQUEST_MS,
            Unit::Milliseconds,
            "Object storage request latency in milliseconds."
        );
        describe_counter!(
            METRIC_STORAGE_REQUEST_TOTAL,
            Unit::Count,
            "Total number of object storage requests by operation and outcome."
        );
        describe_counter!(
            METRIC_SHOW_TRANSITION_TOTAL,
            Unit::Count,
            "Total number of live show starts and ends."
        );
    });
}

/// Telemetry sink reporting through `tracing` events and `metrics`.
#[derive(Debug, Clone, Copy)]
pub struct TracingTelemetry {
    enabled: bool,
}

impl TracingTelemetry {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Telemetry for TracingTelemetry {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn track_dependency(&self, record: DependencyRecord) {
        if !self.enabled {
            return;
        }

        let outcome = if record.success { "success" } else { "failure" };
        let elapsed_ms = record.duration.as_secs_f64() * 1000.0;

        histogram!(
            METRIC_STORAGE_REQUEST_MS,
            "operation" => record.operation.as_str()
        )
        .record(elapsed_ms);
        counter!(
            METRIC_STORAGE_REQUEST_TOTAL,
            "operation" => record.operation.as_str(),
            "outcome" => outcome
        )
        .increment(1);

        info!(
            target = "onair::telemetry::dependency",
            kind = DependencyRecord::KIND,
            host = %record.target,
            name = %record.name,
            uri = %record.uri,
            operation = record.operation.as_str(),
            size_bytes = record.size_bytes,
            started_at = %record.started_at.to_rfc3339(),
            elapsed_ms,
            success = record.success,
            "storage dependency call"
        );
    }

    fn track_event(&self, event: ShowEvent) {
        if !self.enabled {
            return;
        }

        counter!(
            METRIC_SHOW_TRANSITION_TOTAL,
            "transition" => event.transition.as_str()
        )
        .increment(1);

        info!(
            target = "onair::telemetry::event",
            event = event.transition.event_name(),
            show_embed_url = %event.embed_url,
            "live show transition"
        );
    }
}
