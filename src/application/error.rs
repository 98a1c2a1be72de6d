use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    application::{admin::live_show::AdminLiveShowError, live_show::LiveShowStoreError},
    infra::error::InfraError,
};

#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message,
            report,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

impl From<LiveShowStoreError> for HttpError {
    fn from(error: LiveShowStoreError) -> Self {
        const SOURCE: &str = "infra::http::live_show_error_to_http_error";

        match &error {
            LiveShowStoreError::InvalidArgument(_) => HttpError::from_error(
                SOURCE,
                StatusCode::BAD_REQUEST,
                "Live show details are required",
                &error,
            ),
            LiveShowStoreError::Storage(_) => HttpError::from_error(
                SOURCE,
                StatusCode::BAD_GATEWAY,
                "Storage unavailable",
                &error,
            ),
            LiveShowStoreError::Deserialization(_) | LiveShowStoreError::Serialization(_) => {
                HttpError::from_error(
                    SOURCE,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Stored live show data is malformed",
                    &error,
                )
            }
        }
    }
}

impl From<AdminLiveShowError> for HttpError {
    fn from(error: AdminLiveShowError) -> Self {
        match error {
            AdminLiveShowError::Store(err) => err.into(),
        }
    }
}

/// Failures that end the process, reported once by `main`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    LiveShow(#[from] LiveShowStoreError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}
