use axum::{
    Extension,
    extract::{Json, State},
    response::IntoResponse,
};

use app_api::{
    EmptyRequest, GrowthRateRequest, PresetSaveRequest, PresetSelectRequest, SessionDatesRequest,
    SessionPriceRequest, TagSubmitRequest, UsageTableRequest,
};

use crate::{
    errors::HttpError,
    state::{HttpState, SessionId, generate_session_id},
};

pub async fn session_open(
    State(state): State<HttpState>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let session_id = generate_session_id();
    let response = app_api::session_open(&state.context, &session_id);
    Ok(Json(response))
}

pub async fn session_close(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::session_close(&state.context, &session_id)?;
    Ok(Json(response))
}

pub async fn session_get(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::session_get(&state.context, &session_id)?;
    Ok(Json(response))
}

pub async fn session_dates(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(req): Json<SessionDatesRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::session_dates(&state.context, &session_id, req)?;
    Ok(Json(response))
}

pub async fn session_price(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(req): Json<SessionPriceRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::session_price(&state.context, &session_id, req)?;
    Ok(Json(response))
}

pub async fn query_all(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::query_all(&state.context, &session_id)?;
    Ok(Json(response))
}

pub async fn tags_list(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::tags_list(&state.context, &session_id)?;
    Ok(Json(response))
}

pub async fn tag_submit(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(req): Json<TagSubmitRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::tag_submit(&state.context, &session_id, req)?;
    Ok(Json(response))
}

pub async fn presets_list(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::presets_list(&state.context, &session_id)?;
    Ok(Json(response))
}

pub async fn preset_select(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(req): Json<PresetSelectRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::preset_select(&state.context, &session_id, req)?;
    Ok(Json(response))
}

pub async fn preset_save(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(req): Json<PresetSaveRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::preset_save(&state.context, &session_id, req)?;
    Ok(Json(response))
}

pub async fn consumption(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::consumption(&state.context, &session_id)?;
    Ok(Json(response))
}

pub async fn usage_table(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(req): Json<UsageTableRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::usage_table(&state.context, &session_id, req)?;
    Ok(Json(response))
}

pub async fn prediction_generate(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::prediction_generate(&state.context, &session_id)?;
    Ok(Json(response))
}

pub async fn growth_rate_set(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(req): Json<GrowthRateRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::growth_rate_set(&state.context, &session_id, req)?;
    Ok(Json(response))
}

pub async fn projection(
    State(state): State<HttpState>,
    Extension(SessionId(session_id)): Extension<SessionId>,
    Json(_): Json<EmptyRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::projection(&state.context, &session_id)?;
    Ok(Json(response))
}

pub async fn not_found() -> HttpError {
    HttpError::route_not_found()
}
