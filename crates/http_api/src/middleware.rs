use axum::{
    body::Body,
    extract::State,
    http::{Request, header::ORIGIN},
    middleware::Next,
    response::Response,
};

use crate::{
    errors::HttpError,
    state::{HttpState, SESSION_HEADER, SessionId},
};

pub async fn require_session(
    State(state): State<HttpState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HttpError> {
    let session_id = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(HttpError::session_missing)?;
    state.context.app_state.sessions.get(&session_id)?;
    req.extensions_mut().insert(SessionId(session_id));

    Ok(next.run(req).await)
}

/// Rejects browser requests coming from anything but a loopback origin.
pub async fn require_loopback(req: Request<Body>, next: Next) -> Result<Response, HttpError> {
    if let Some(origin) = req.headers().get(ORIGIN) {
        check_origin(origin.to_str().ok())?;
    }
    Ok(next.run(req).await)
}

fn check_origin(origin: Option<&str>) -> Result<(), HttpError> {
    let origin = origin.ok_or_else(|| HttpError::invalid_origin(false))?;
    if !is_loopback_origin(origin) {
        return Err(HttpError::invalid_origin(true));
    }
    Ok(())
}

fn is_loopback_origin(origin: &str) -> bool {
    origin.starts_with("http://127.0.0.1:")
        || origin.starts_with("http://localhost:")
        || origin.starts_with("http://[::1]:")
        || origin.starts_with("https://127.0.0.1:")
        || origin.starts_with("https://localhost:")
        || origin.starts_with("https://[::1]:")
}
