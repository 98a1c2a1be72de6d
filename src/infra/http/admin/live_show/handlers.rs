//! HTTP handlers for the live show admin form.

use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::application::admin::{Flash, SubmitOutcome};
use crate::application::error::HttpError;
use crate::presentation::{
    admin::views::{AdminLiveShowTemplate, AdminLiveShowView},
    views::render_template_response,
};

use super::super::{ADMIN_PATH, AdminState, CLEAR_CACHE_PATH};
use super::forms::{AdminLiveShowForm, FlashQuery};

fn redirect_with_flash(flash: Flash) -> Redirect {
    Redirect::to(&format!("{ADMIN_PATH}?flash={}", flash.as_query()))
}

pub(crate) async fn admin_live_show(
    State(state): State<AdminState>,
    Query(query): Query<FlashQuery>,
) -> Response {
    let page = match state.live_show.show_page(query.flash()).await {
        Ok(page) => page,
        Err(err) => return HttpError::from(err).into_response(),
    };

    let content = AdminLiveShowView::new(&page, &[], ADMIN_PATH, CLEAR_CACHE_PATH);
    render_template_response(
        AdminLiveShowTemplate::new(&page.environment, content),
        StatusCode::OK,
    )
}

pub(crate) async fn admin_live_show_save(
    State(state): State<AdminState>,
    Form(form): Form<AdminLiveShowForm>,
) -> Response {
    match state.live_show.submit(form.into()).await {
        Ok(SubmitOutcome::Saved { .. }) => redirect_with_flash(Flash::Saved).into_response(),
        Ok(SubmitOutcome::Invalid { page, errors }) => {
            let content = AdminLiveShowView::new(&page, &errors, ADMIN_PATH, CLEAR_CACHE_PATH);
            render_template_response(
                AdminLiveShowTemplate::new(&page.environment, content),
                StatusCode::UNPROCESSABLE_ENTITY,
            )
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

pub(crate) async fn admin_live_show_clear_cache(State(state): State<AdminState>) -> Response {
    state.live_show.clear_cache();
    redirect_with_flash(Flash::CacheCleared).into_response()
}
