use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use shared::{
    domain::{contact_path, edit_contact_path, ContactChanges, NavigationState},
    error::{ApiError, ErrorCode},
    protocol::{FavoriteForm, SearchQuery},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    app_state::AppState,
    views::{render_layout, Detail, LayoutView},
};

const MAX_FORM_BYTES: usize = 64 * 1024;

type HttpError = (StatusCode, Json<ApiError>);

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route("/healthz", get(healthz))
        .route("/contacts/:contact_id", get(show_contact))
        .route(
            "/contacts/:contact_id/edit",
            get(edit_contact).post(update_contact),
        )
        .route("/contacts/:contact_id/favorite", post(set_favorite))
        .route("/contacts/:contact_id/destroy", post(destroy_contact))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, HttpError> {
    server_api::health(&state.api).await.map_err(reject)?;
    Ok("ok")
}

async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    let listing = server_api::list_contacts(&state.api, query.q.as_deref())
        .await
        .map_err(reject)?;

    if wants_json(&headers) {
        return Ok(Json(listing).into_response());
    }

    Ok(Html(render_layout(&LayoutView {
        listing: &listing,
        current_path: "/",
        navigation: &NavigationState::Idle,
        detail: Detail::Index,
    }))
    .into_response())
}

async fn create_contact(State(state): State<Arc<AppState>>) -> Result<Redirect, HttpError> {
    let contact = server_api::create_contact(&state.api)
        .await
        .map_err(reject)?;
    info!(contact_id = %contact.id, "contact created");
    Ok(Redirect::to(&edit_contact_path(&contact.id)))
}

async fn show_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<String>,
    Query(query): Query<SearchQuery>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    let contact = server_api::get_contact(&state.api, &contact_id)
        .await
        .map_err(reject)?;

    if wants_json(&headers) {
        return Ok(Json(contact).into_response());
    }

    let listing = server_api::list_contacts(&state.api, query.q.as_deref())
        .await
        .map_err(reject)?;
    let current_path = contact_path(&contact.id);
    Ok(Html(render_layout(&LayoutView {
        listing: &listing,
        current_path: &current_path,
        navigation: &NavigationState::Idle,
        detail: Detail::Contact(&contact),
    }))
    .into_response())
}

async fn edit_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, HttpError> {
    let contact = server_api::get_contact(&state.api, &contact_id)
        .await
        .map_err(reject)?;
    let listing = server_api::list_contacts(&state.api, query.q.as_deref())
        .await
        .map_err(reject)?;
    let current_path = edit_contact_path(&contact.id);
    Ok(Html(render_layout(&LayoutView {
        listing: &listing,
        current_path: &current_path,
        navigation: &NavigationState::Idle,
        detail: Detail::Edit(&contact),
    })))
}

async fn update_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<String>,
    Form(changes): Form<ContactChanges>,
) -> Result<Redirect, HttpError> {
    let contact = server_api::update_contact(&state.api, &contact_id, changes)
        .await
        .map_err(reject)?;
    info!(contact_id = %contact.id, "contact updated");
    Ok(Redirect::to(&contact_path(&contact.id)))
}

async fn set_favorite(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<String>,
    Form(form): Form<FavoriteForm>,
) -> Result<Redirect, HttpError> {
    let contact = server_api::set_favorite(&state.api, &contact_id, form.favorite)
        .await
        .map_err(reject)?;
    Ok(Redirect::to(&contact_path(&contact.id)))
}

async fn destroy_contact(
    State(state): State<Arc<AppState>>,
    Path(contact_id): Path<String>,
) -> Result<Redirect, HttpError> {
    let removed = server_api::destroy_contact(&state.api, Some(&contact_id))
        .await
        .map_err(reject)?;
    info!(contact_id = %removed, "contact destroyed");
    Ok(Redirect::to("/"))
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

fn reject(err: ApiError) -> HttpError {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
