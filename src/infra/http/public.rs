use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, header::CACHE_CONTROL},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::application::{error::HttpError, live_show::LiveShowStore};

use super::{
    health,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct PublicState {
    pub live_show: LiveShowStore,
}

pub fn build_public_router(state: PublicState) -> Router {
    Router::new()
        .route("/api/live-show", get(live_show_details))
        .route("/_health", get(health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn live_show_details(State(state): State<PublicState>) -> Response {
    match state.live_show.load().await {
        Ok(details) => {
            let mut response = Json(details).into_response();
            response
                .headers_mut()
                .insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
            response
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}
