use axum::{
    Json,
    extract::{Path, RawQuery, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    application::error::HttpError,
    domain::card::{CardRequest, ImageFormat, ParsedCard, parse_card_query},
    presentation::views::render_card_response,
};

use super::HttpState;

pub(super) async fn health() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

pub(super) async fn card_root(
    State(state): State<HttpState>,
    RawQuery(query): RawQuery,
) -> Result<Response, HttpError> {
    render_from_params(&state, "", query.as_deref())
}

pub(super) async fn card_from_path(
    State(state): State<HttpState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<Response, HttpError> {
    render_from_params(&state, &path, query.as_deref())
}

pub(super) async fn render_json(
    State(state): State<HttpState>,
    payload: Result<Json<CardRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let Json(request) = payload.map_err(|rejection| {
        HttpError::new(
            "infra::http::render_json",
            StatusCode::BAD_REQUEST,
            "Invalid card request",
            rejection.body_text(),
        )
    })?;

    let html = state.renderer.render(&request)?;
    Ok(render_card_response(html, ImageFormat::default()))
}

fn render_from_params(
    state: &HttpState,
    path: &str,
    query: Option<&str>,
) -> Result<Response, HttpError> {
    let ParsedCard { request, format } = parse_card_query(path, query)?;
    let html = state.renderer.render(&request)?;
    Ok(render_card_response(html, format))
}
