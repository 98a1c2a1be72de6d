//! In-process cache in front of the live show store.
//!
//! A single entry is cached under [`LIVE_SHOW_DETAILS_CACHE_KEY`]. Behaviour is
//! controlled through the `[cache]` settings section:
//!
//! ```toml
//! [cache]
//! enabled = true
//! capacity = 16
//! ```

mod config;
mod keys;
mod lock;
mod store;

pub use config::CacheConfig;
pub use keys::LIVE_SHOW_DETAILS_CACHE_KEY;
pub use store::{
    Cache, METRIC_CACHE_EVICT_TOTAL, METRIC_CACHE_HIT_TOTAL, METRIC_CACHE_MISS_TOTAL,
    MemoryCache, NoopCache,
};
