//! JSON access to the stored live show document.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::admin::ReplaceOutcome;
use crate::application::error::HttpError;
use crate::domain::error::DomainError;
use crate::domain::live_show::LiveShowDetails;

use super::super::AdminState;

#[derive(Debug, Serialize)]
struct FieldErrorBody {
    field: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ValidationErrorBody {
    errors: Vec<FieldErrorBody>,
}

impl From<&[DomainError]> for ValidationErrorBody {
    fn from(errors: &[DomainError]) -> Self {
        Self {
            errors: errors
                .iter()
                .map(|error| FieldErrorBody {
                    field: error.field(),
                    message: error.to_string(),
                })
                .collect(),
        }
    }
}

pub(crate) async fn live_show_get(State(state): State<AdminState>) -> Response {
    match state.live_show.store().load().await {
        Ok(details) => Json(details).into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}

/// Replace the stored document; `null` is a 400, invalid fields a 422.
pub(crate) async fn live_show_put(
    State(state): State<AdminState>,
    Json(details): Json<Option<LiveShowDetails>>,
) -> Response {
    match state.live_show.replace(details).await {
        Ok(ReplaceOutcome::Saved { .. }) => StatusCode::NO_CONTENT.into_response(),
        Ok(ReplaceOutcome::Invalid { errors }) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationErrorBody::from(errors.as_slice())),
        )
            .into_response(),
        Err(err) => HttpError::from(err).into_response(),
    }
}
