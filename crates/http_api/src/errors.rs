use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use frost_app::{ApiError, AppError};

/// JSON error body plus the status it is sent with.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    body: ApiError,
}

impl HttpError {
    fn with_code(status: StatusCode, message: impl Into<String>, code: &str) -> Self {
        Self {
            status,
            body: ApiError {
                status: status.as_u16(),
                message: message.into(),
                code: Some(code.to_string()),
            },
        }
    }

    pub fn session_missing() -> Self {
        Self::with_code(
            StatusCode::UNAUTHORIZED,
            "missing session header",
            "session_missing",
        )
    }

    /// A present but unreadable Origin is malformed; a foreign one is refused.
    pub fn invalid_origin(readable: bool) -> Self {
        if readable {
            Self::with_code(StatusCode::FORBIDDEN, "invalid origin", "invalid_origin")
        } else {
            Self::with_code(
                StatusCode::BAD_REQUEST,
                "invalid Origin header",
                "invalid_origin",
            )
        }
    }

    pub fn route_not_found() -> Self {
        Self::with_code(StatusCode::NOT_FOUND, "not found", "not_found")
    }
}

impl From<AppError> for HttpError {
    fn from(err: AppError) -> Self {
        let body = ApiError::from(err);
        let status = StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self { status, body }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(
                status = self.status.as_u16(),
                code = self.body.code.as_deref().unwrap_or(""),
                message = %self.body.message,
                "dashboard request failed"
            );
        }
        (self.status, Json(self.body)).into_response()
    }
}
