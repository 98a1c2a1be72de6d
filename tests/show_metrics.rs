use std::collections::HashSet;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use chrono_tz::Australia::Sydney;
use metrics_util::debugging::DebuggingRecorder;
use onair::{
    application::{
        admin::{AdminLiveShowService, LiveShowInput, SubmitOutcome},
        clock::FixedClock,
        live_show::{DocumentLocation, LiveShowCache, LiveShowStore},
    },
    cache::{
        CacheConfig, METRIC_CACHE_HIT_TOTAL, METRIC_CACHE_MISS_TOTAL, MemoryCache,
    },
    domain::live_show::ShowTransition,
    infra::{
        storage::InMemoryObjectStore,
        telemetry::{
            METRIC_SHOW_TRANSITION_TOTAL, METRIC_STORAGE_REQUEST_MS,
            METRIC_STORAGE_REQUEST_TOTAL, TracingTelemetry,
        },
    },
};

#[tokio::test]
async fn live_show_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let storage = Arc::new(InMemoryObjectStore::new());
    let telemetry = Arc::new(TracingTelemetry::new(true));
    let cache: Arc<LiveShowCache> = Arc::new(MemoryCache::new(&CacheConfig::default()));
    let store = LiveShowStore::new(
        storage.clone(),
        cache,
        telemetry.clone(),
        DocumentLocation::new("liveshow", "liveshowdetails.json"),
    );
    let service = AdminLiveShowService::new(
        store.clone(),
        telemetry,
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 23, 0, 0).unwrap())),
        Sydney,
        "Test",
    );

    // Miss, then a save that starts a show and uploads.
    let outcome = service
        .submit(LiveShowInput {
            embed_url: Some("https://live".to_string()),
            ..Default::default()
        })
        .await
        .expect("submit succeeds");
    assert!(matches!(
        outcome,
        SubmitOutcome::Saved {
            transition: Some(ShowTransition::Started)
        }
    ));

    // Hit from the cache the save populated, then a download after invalidation.
    store.load().await.expect("cached load");
    store.invalidate();
    store.load().await.expect("fresh load");
    assert_eq!(storage.downloads(), 1);

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    for expected in [
        METRIC_CACHE_HIT_TOTAL,
        METRIC_CACHE_MISS_TOTAL,
        METRIC_STORAGE_REQUEST_MS,
        METRIC_STORAGE_REQUEST_TOTAL,
        METRIC_SHOW_TRANSITION_TOTAL,
    ] {
        assert!(names.contains(expected), "missing metric `{expected}`");
    }
}
