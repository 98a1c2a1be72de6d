//! Cache key definitions.

/// Key of the single cached live show document.
pub const LIVE_SHOW_DETAILS_CACHE_KEY: &str = "onair::live_show_details";
