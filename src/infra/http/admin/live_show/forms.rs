//! Form definitions for live show admin handlers.

use serde::Deserialize;

use crate::application::admin::{Flash, LiveShowInput};

/// Posted admin form; field names match the rendered inputs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminLiveShowForm {
    #[serde(rename = "LiveShowEmbedUrl")]
    pub(crate) live_show_embed_url: Option<String>,
    #[serde(rename = "LiveShowHtml")]
    pub(crate) live_show_html: Option<String>,
    #[serde(rename = "NextShowDateLocal")]
    pub(crate) next_show_date_local: Option<String>,
    #[serde(rename = "AdminMessage")]
    pub(crate) admin_message: Option<String>,
}

impl From<AdminLiveShowForm> for LiveShowInput {
    fn from(form: AdminLiveShowForm) -> Self {
        Self {
            embed_url: form.live_show_embed_url,
            html: form.live_show_html,
            next_show_local: form.next_show_date_local,
            admin_message: form.admin_message,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FlashQuery {
    flash: Option<String>,
}

impl FlashQuery {
    /// Unknown values are dropped, so only fixed messages can be shown.
    pub(crate) fn flash(&self) -> Option<Flash> {
        self.flash.as_deref().and_then(Flash::from_query)
    }
}
