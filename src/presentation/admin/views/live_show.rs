use askama::Template;

use crate::application::admin::live_show::AdminLiveShowPage;
use crate::domain::error::DomainError;
use crate::domain::live_show::{MAX_ADMIN_MESSAGE_LENGTH, MAX_EMBED_URL_LENGTH};

use super::{AdminLayout, AdminMetaView};

#[derive(Clone)]
pub struct AdminFieldErrorView {
    pub field: &'static str,
    pub message: String,
}

impl From<&DomainError> for AdminFieldErrorView {
    fn from(error: &DomainError) -> Self {
        Self {
            field: error.field(),
            message: error.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AdminLiveShowView {
    pub flash: Option<&'static str>,
    pub errors: Vec<AdminFieldErrorView>,
    pub is_live: bool,
    pub embed_url: String,
    pub html: String,
    pub admin_message: String,
    pub next_show_input: String,
    pub next_show_display: Option<String>,
    pub next_show_utc: String,
    pub morning_suggestion: String,
    pub afternoon_suggestion: String,
    pub timezone: &'static str,
    pub form_action: &'static str,
    pub clear_cache_action: &'static str,
    pub max_embed_url_length: usize,
    pub max_admin_message_length: usize,
}

impl AdminLiveShowView {
    pub fn new(
        page: &AdminLiveShowPage,
        errors: &[DomainError],
        form_action: &'static str,
        clear_cache_action: &'static str,
    ) -> Self {
        Self {
            flash: page.flash,
            errors: errors.iter().map(AdminFieldErrorView::from).collect(),
            is_live: page.is_live,
            embed_url: page.embed_url.clone(),
            html: page.html.clone(),
            admin_message: page.admin_message.clone(),
            next_show_input: page.next_show_input.clone(),
            next_show_display: page.next_show_display.clone(),
            next_show_utc: page.next_show_utc.clone().unwrap_or_default(),
            morning_suggestion: page.morning_suggestion.clone(),
            afternoon_suggestion: page.afternoon_suggestion.clone(),
            timezone: page.timezone,
            form_action,
            clear_cache_action,
            max_embed_url_length: MAX_EMBED_URL_LENGTH,
            max_admin_message_length: MAX_ADMIN_MESSAGE_LENGTH,
        }
    }
}

#[derive(Template)]
#[template(path = "admin/live_show.html")]
pub struct AdminLiveShowTemplate {
    pub view: AdminLayout<AdminLiveShowView>,
}

impl AdminLiveShowTemplate {
    pub fn new(environment: &str, content: AdminLiveShowView) -> Self {
        let meta = AdminMetaView {
            title: "Live show admin".to_string(),
            heading: "Live show".to_string(),
            description: "Manage the live show embed, schedule and banner message.".to_string(),
        };
        Self {
            view: AdminLayout::new(meta, environment, content),
        }
    }
}
