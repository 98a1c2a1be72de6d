mod live_show;
mod state;

pub use state::AdminState;

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};

use super::{
    health,
    middleware::{log_responses, set_request_context},
};

const ADMIN_PATH: &str = "/admin";
const CLEAR_CACHE_PATH: &str = "/admin/clearcache";
const API_LIVE_SHOW_PATH: &str = "/admin/api/live-show";

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to(ADMIN_PATH) }))
        .route(
            ADMIN_PATH,
            get(live_show::admin_live_show).post(live_show::admin_live_show_save),
        )
        .route(CLEAR_CACHE_PATH, post(live_show::admin_live_show_clear_cache))
        .route(
            API_LIVE_SHOW_PATH,
            get(live_show::api::live_show_get).put(live_show::api::live_show_put),
        )
        .route("/_health", get(health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}
