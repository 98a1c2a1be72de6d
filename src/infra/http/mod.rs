mod admin;
mod middleware;
mod public;

pub use admin::{AdminState, build_admin_router};
pub use middleware::{REQUEST_ID_HEADER, RequestContext};
pub use public::{PublicState, build_public_router};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

async fn health() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
