//! Application services for the administrative surface.

pub mod live_show;

pub use live_show::{AdminLiveShowService, Flash, LiveShowInput, ReplaceOutcome, SubmitOutcome};
