//! The live show document and the rules that apply to its fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::DomainError;

const INSECURE_SCHEME_PREFIX: &str = "http://";
const SECURE_SCHEME_PREFIX: &str = "https://";

pub const MAX_EMBED_URL_LENGTH: usize = 2048;
pub const MAX_HTML_LENGTH: usize = 64 * 1024;
pub const MAX_ADMIN_MESSAGE_LENGTH: usize = 1024;

/// The single persisted live show document.
///
/// Stored as JSON with PascalCase keys. Missing keys read back as `None`, so documents
/// written before a field existed remain loadable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LiveShowDetails {
    pub live_show_embed_url: Option<String>,
    pub live_show_html: Option<String>,
    pub next_show_date_utc: Option<DateTime<Utc>>,
    pub admin_message: Option<String>,
}

impl LiveShowDetails {
    /// A show is live while an embed URL is set.
    pub fn is_live(&self) -> bool {
        !is_blank(self.live_show_embed_url.as_deref())
    }
}

/// Rewrite an `http://` embed URL to `https://`, leaving the remainder untouched.
pub fn normalize_embed_url(url: &str) -> String {
    match url.strip_prefix(INSECURE_SCHEME_PREFIX) {
        Some(rest) => format!("{SECURE_SCHEME_PREFIX}{rest}"),
        None => url.to_string(),
    }
}

pub fn validate_embed_url(url: &str) -> Result<(), DomainError> {
    const FIELD: &str = "LiveShowEmbedUrl";

    if url.len() > MAX_EMBED_URL_LENGTH {
        return Err(DomainError::validation(
            FIELD,
            format!("must be at most {MAX_EMBED_URL_LENGTH} characters"),
        ));
    }

    let parsed = Url::parse(url)
        .map_err(|err| DomainError::validation(FIELD, format!("is not a valid URL: {err}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(DomainError::validation(
            FIELD,
            format!("must use http or https, not `{other}`"),
        )),
    }
}

pub fn validate_max_length(
    value: &str,
    field: &'static str,
    limit: usize,
) -> Result<(), DomainError> {
    if value.chars().count() > limit {
        return Err(DomainError::validation(
            field,
            format!("must be at most {limit} characters"),
        ));
    }
    Ok(())
}

/// Change in "is a show live" state between two saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowTransition {
    Started,
    Ended,
}

impl ShowTransition {
    pub fn detect(previous: Option<&str>, next: Option<&str>) -> Option<Self> {
        match (is_blank(previous), is_blank(next)) {
            (true, false) => Some(Self::Started),
            (false, true) => Some(Self::Ended),
            _ => None,
        }
    }

    pub fn event_name(self) -> &'static str {
        match self {
            Self::Started => "Show Started",
            Self::Ended => "Show Ended",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Ended => "ended",
        }
    }
}

/// Observability event raised when a save starts or ends a show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowEvent {
    pub transition: ShowTransition,
    pub embed_url: String,
}

impl ShowEvent {
    /// Build the event for a save, naming the URL that went live or the one that stopped.
    pub fn between(previous: Option<&str>, next: Option<&str>) -> Option<Self> {
        let transition = ShowTransition::detect(previous, next)?;
        let embed_url = match transition {
            ShowTransition::Started => next,
            ShowTransition::Ended => previous,
        }
        .unwrap_or_default()
        .to_string();

        Some(Self {
            transition,
            embed_url,
        })
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn normalizes_insecure_scheme() {
        assert_eq!(normalize_embed_url("http://x/y"), "https://x/y");
    }

    #[test]
    fn normalization_leaves_secure_and_empty_urls_alone() {
        assert_eq!(normalize_embed_url("https://x/y"), "https://x/y");
        assert_eq!(normalize_embed_url(""), "");
        assert_eq!(
            normalize_embed_url(&normalize_embed_url("http://x/y")),
            "https://x/y"
        );
    }

    #[test]
    fn normalization_is_case_sensitive_on_the_prefix() {
        assert_eq!(normalize_embed_url("HTTP://x/y"), "HTTP://x/y");
    }

    #[test]
    fn detects_started_and_ended() {
        assert_eq!(
            ShowTransition::detect(Some(""), Some("http://a")),
            Some(ShowTransition::Started)
        );
        assert_eq!(
            ShowTransition::detect(None, Some("http://a")),
            Some(ShowTransition::Started)
        );
        assert_eq!(
            ShowTransition::detect(Some("http://a"), Some("")),
            Some(ShowTransition::Ended)
        );
        assert_eq!(
            ShowTransition::detect(Some("http://a"), None),
            Some(ShowTransition::Ended)
        );
    }

    #[test]
    fn no_transition_without_state_change() {
        assert_eq!(ShowTransition::detect(Some(""), Some("")), None);
        assert_eq!(ShowTransition::detect(None, None), None);
        assert_eq!(
            ShowTransition::detect(Some("http://a"), Some("http://b")),
            None
        );
    }

    #[test]
    fn ended_event_names_previous_url() {
        let event = ShowEvent::between(Some("https://a"), None).expect("ended event");
        assert_eq!(event.transition, ShowTransition::Ended);
        assert_eq!(event.embed_url, "https://a");
        assert_eq!(event.transition.event_name(), "Show Ended");
    }

    #[test]
    fn serializes_with_pascal_case_keys() {
        let details = LiveShowDetails {
            live_show_embed_url: Some("https://live".to_string()),
            live_show_html: None,
            next_show_date_utc: Some(Utc.with_ymd_and_hms(2024, 5, 7, 0, 0, 0).unwrap()),
            admin_message: Some("hi".to_string()),
        };

        let json = serde_json::to_value(&details).expect("serialize");
        assert_eq!(json["LiveShowEmbedUrl"], "https://live");
        assert!(json["LiveShowHtml"].is_null());
        assert_eq!(json["NextShowDateUtc"], "2024-05-07T00:00:00Z");
        assert_eq!(json["AdminMessage"], "hi");
    }

    #[test]
    fn reads_documents_with_missing_keys_and_offsets() {
        let details: LiveShowDetails =
            serde_json::from_str(r#"{"AdminMessage":"x","NextShowDateUtc":"2024-05-07T10:00:00+10:00"}"#)
                .expect("deserialize");
        assert_eq!(details.admin_message.as_deref(), Some("x"));
        assert!(details.live_show_embed_url.is_none());
        assert_eq!(
            details.next_show_date_utc,
            Some(Utc.with_ymd_and_hms(2024, 5, 7, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn embed_url_must_be_web_url() {
        assert!(validate_embed_url("https://youtube.com/embed/abc").is_ok());
        assert!(validate_embed_url("http://example.com").is_ok());
        assert!(validate_embed_url("ftp://example.com").is_err());
        assert!(validate_embed_url("not a url").is_err());
    }

    #[test]
    fn max_length_counts_characters() {
        assert!(validate_max_length("ééé", "AdminMessage", 3).is_ok());
        let err = validate_max_length("abcd", "AdminMessage", 3).expect_err("too long");
        assert_eq!(err.field(), "AdminMessage");
    }
}
