use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::{info, warn};

use crate::application::clock::Clock;
use crate::application::live_show::{LiveShowStore, LiveShowStoreError};
use crate::application::telemetry::Telemetry;
use crate::domain::error::DomainError;
use crate::domain::live_show::{
    LiveShowDetails, MAX_ADMIN_MESSAGE_LENGTH, MAX_HTML_LENGTH, ShowEvent, ShowTransition,
    normalize_embed_url, validate_embed_url, validate_max_length,
};
use crate::util::timezone::{
    format_display, format_input, local_to_utc, parse_local_datetime, show_suggestions, to_local,
};

pub const FIELD_EMBED_URL: &str = "LiveShowEmbedUrl";
pub const FIELD_HTML: &str = "LiveShowHtml";
pub const FIELD_NEXT_SHOW: &str = "NextShowDateLocal";
pub const FIELD_ADMIN_MESSAGE: &str = "AdminMessage";

#[derive(Debug, Error)]
pub enum AdminLiveShowError {
    #[error(transparent)]
    Store(#[from] LiveShowStoreError),
}

/// One-shot confirmation shown after a redirect back to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Saved,
    CacheCleared,
}

impl Flash {
    pub fn as_query(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::CacheCleared => "cache-cleared",
        }
    }

    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "saved" => Some(Self::Saved),
            "cache-cleared" => Some(Self::CacheCleared),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Saved => "Live show details saved successfully!",
            Self::CacheCleared => "Live show cache cleared successfully!",
        }
    }
}

/// Raw form values as submitted; blank strings count as unset.
#[derive(Debug, Clone, Default)]
pub struct LiveShowInput {
    pub embed_url: Option<String>,
    pub html: Option<String>,
    pub next_show_local: Option<String>,
    pub admin_message: Option<String>,
}

/// Everything the admin form renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminLiveShowPage {
    pub flash: Option<&'static str>,
    pub is_live: bool,
    pub embed_url: String,
    pub html: String,
    pub admin_message: String,
    /// `datetime-local` value in the display timezone.
    pub next_show_input: String,
    pub next_show_display: Option<String>,
    pub next_show_utc: Option<String>,
    pub morning_suggestion: String,
    pub afternoon_suggestion: String,
    pub timezone: &'static str,
    pub environment: String,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Saved {
        transition: Option<ShowTransition>,
    },
    Invalid {
        page: Box<AdminLiveShowPage>,
        errors: Vec<DomainError>,
    },
}

#[derive(Debug)]
pub enum ReplaceOutcome {
    Saved {
        transition: Option<ShowTransition>,
    },
    Invalid {
        errors: Vec<DomainError>,
    },
}

#[derive(Clone)]
pub struct AdminLiveShowService {
    store: LiveShowStore,
    telemetry: Arc<dyn Telemetry>,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    environment: String,
}

impl AdminLiveShowService {
    pub fn new(
        store: LiveShowStore,
        telemetry: Arc<dyn Telemetry>,
        clock: Arc<dyn Clock>,
        timezone: Tz,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            store,
            telemetry,
            clock,
            timezone,
            environment: environment.into(),
        }
    }

    pub fn store(&self) -> &LiveShowStore {
        &self.store
    }

    pub async fn show_page(
        &self,
        flash: Option<Flash>,
    ) -> Result<AdminLiveShowPage, AdminLiveShowError> {
        let details = self.store.load().await?.unwrap_or_default();
        Ok(self.page(&details, flash))
    }

    pub async fn submit(&self, input: LiveShowInput) -> Result<SubmitOutcome, AdminLiveShowError> {
        let current = self.store.load().await?.unwrap_or_default();

        let next = match validate(input, self.timezone) {
            Ok(next) => next,
            Err(errors) => {
                log_rejected("form", &errors);
                return Ok(SubmitOutcome::Invalid {
                    page: Box::new(self.page(&current, None)),
                    errors,
                });
            }
        };

        let transition = self.commit(&current, next).await?;
        Ok(SubmitOutcome::Saved { transition })
    }

    /// Replace the whole document, as sent to the JSON API.
    ///
    /// Runs the same checks, URL upgrade and transition tracking as [`Self::submit`].
    pub async fn replace(
        &self,
        details: Option<LiveShowDetails>,
    ) -> Result<ReplaceOutcome, AdminLiveShowError> {
        let details = details.ok_or(LiveShowStoreError::InvalidArgument("details"))?;
        let current = self.store.load().await?.unwrap_or_default();

        let next = match validate_document(details) {
            Ok(next) => next,
            Err(errors) => {
                log_rejected("api", &errors);
                return Ok(ReplaceOutcome::Invalid { errors });
            }
        };

        let transition = self.commit(&current, next).await?;
        Ok(ReplaceOutcome::Saved { transition })
    }

    async fn commit(
        &self,
        current: &LiveShowDetails,
        next: LiveShowDetails,
    ) -> Result<Option<ShowTransition>, AdminLiveShowError> {
        let event = ShowEvent::between(
            current.live_show_embed_url.as_deref(),
            next.live_show_embed_url.as_deref(),
        );
        let transition = event.as_ref().map(|event| event.transition);
        if let Some(event) = event
            && self.telemetry.is_enabled()
        {
            self.telemetry.track_event(event);
        }

        self.store.save(Some(next)).await?;

        info!(
            target = "onair::admin::live_show",
            transition = transition.map(ShowTransition::as_str),
            "Live show details updated"
        );
        Ok(transition)
    }

    pub fn clear_cache(&self) {
        self.store.invalidate();
    }

    fn page(&self, details: &LiveShowDetails, flash: Option<Flash>) -> AdminLiveShowPage {
        let (morning_suggestion, afternoon_suggestion) =
            show_suggestions(self.clock.now(), self.timezone);
        let next_show = details
            .next_show_date_utc
            .map(|utc| (utc, to_local(utc, self.timezone)));

        AdminLiveShowPage {
            flash: flash.map(Flash::message),
            is_live: details.is_live(),
            embed_url: details.live_show_embed_url.clone().unwrap_or_default(),
            html: details.live_show_html.clone().unwrap_or_default(),
            admin_message: details.admin_message.clone().unwrap_or_default(),
            next_show_input: next_show
                .map(|(_, local)| format_input(local))
                .unwrap_or_default(),
            next_show_display: next_show.map(|(_, local)| format_display(local)),
            next_show_utc: next_show.map(|(utc, _)| utc.to_rfc3339()),
            morning_suggestion,
            afternoon_suggestion,
            timezone: self.timezone.name(),
            environment: self.environment.clone(),
        }
    }
}

fn log_rejected(source: &'static str, errors: &[DomainError]) {
    warn!(
        target = "onair::admin::live_show",
        source,
        error_count = errors.len(),
        fields = ?errors.iter().map(DomainError::field).collect::<Vec<_>>(),
        "Rejected live show submission"
    );
}

/// Whitespace-only values count as unset; anything else is kept as submitted.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn embed_url_field(value: Option<String>, errors: &mut Vec<DomainError>) -> Option<String> {
    let url = non_blank(value)?;
    let url = url.trim();
    match validate_embed_url(url) {
        Ok(()) => Some(normalize_embed_url(url)),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

fn bounded_field(
    value: Option<String>,
    field: &'static str,
    max: usize,
    errors: &mut Vec<DomainError>,
) -> Option<String> {
    let value = non_blank(value)?;
    if let Err(err) = validate_max_length(&value, field, max) {
        errors.push(err);
    }
    Some(value)
}

fn next_show_field(
    value: Option<String>,
    timezone: Tz,
    errors: &mut Vec<DomainError>,
) -> Option<DateTime<Utc>> {
    let raw = non_blank(value)?;
    match next_show_utc(raw.trim(), timezone) {
        Ok(utc) => Some(utc),
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

fn finish(
    details: LiveShowDetails,
    errors: Vec<DomainError>,
) -> Result<LiveShowDetails, Vec<DomainError>> {
    if errors.is_empty() {
        Ok(details)
    } else {
        Err(errors)
    }
}

/// Check every form field, returning the replacement document or all problems found.
fn validate(input: LiveShowInput, timezone: Tz) -> Result<LiveShowDetails, Vec<DomainError>> {
    let mut errors = Vec::new();
    let details = LiveShowDetails {
        live_show_embed_url: embed_url_field(input.embed_url, &mut errors),
        live_show_html: bounded_field(input.html, FIELD_HTML, MAX_HTML_LENGTH, &mut errors),
        admin_message: bounded_field(
            input.admin_message,
            FIELD_ADMIN_MESSAGE,
            MAX_ADMIN_MESSAGE_LENGTH,
            &mut errors,
        ),
        next_show_date_utc: next_show_field(input.next_show_local, timezone, &mut errors),
    };
    finish(details, errors)
}

/// Same rules for a whole document; the next show is already in UTC.
fn validate_document(details: LiveShowDetails) -> Result<LiveShowDetails, Vec<DomainError>> {
    let mut errors = Vec::new();
    let next = LiveShowDetails {
        live_show_embed_url: embed_url_field(details.live_show_embed_url, &mut errors),
        live_show_html: bounded_field(
            details.live_show_html,
            FIELD_HTML,
            MAX_HTML_LENGTH,
            &mut errors,
        ),
        admin_message: bounded_field(
            details.admin_message,
            FIELD_ADMIN_MESSAGE,
            MAX_ADMIN_MESSAGE_LENGTH,
            &mut errors,
        ),
        next_show_date_utc: details.next_show_date_utc,
    };
    finish(next, errors)
}

fn next_show_utc(raw: &str, timezone: Tz) -> Result<DateTime<Utc>, DomainError> {
    let local = parse_local_datetime(raw).ok_or_else(|| {
        DomainError::validation(FIELD_NEXT_SHOW, format!("`{raw}` is not a valid date and time"))
    })?;
    local_to_utc(local, timezone).ok_or_else(|| {
        DomainError::validation(
            FIELD_NEXT_SHOW,
            format!("`{raw}` does not exist in {} (daylight saving change)", timezone.name()),
        )
    })
}
