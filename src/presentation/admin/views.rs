//! Admin page layout shared by every admin template.

mod live_show;

pub use live_show::{AdminFieldErrorView, AdminLiveShowTemplate, AdminLiveShowView};

#[derive(Clone)]
pub struct AdminMetaView {
    pub title: String,
    pub heading: String,
    pub description: String,
}

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub meta: AdminMetaView,
    pub environment: String,
    pub version: &'static str,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(meta: AdminMetaView, environment: impl Into<String>, content: T) -> Self {
        Self {
            meta,
            environment: environment.into(),
            version: env!("CARGO_PKG_VERSION"),
            content,
        }
    }
}
