use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Per-request failure. Isolated to the request that produced it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundRejection {
    /// Caller address is outside every trusted network.
    #[error("Access denied")]
    AccessDenied,
    /// Body is not a valid Telegram update.
    #[error("Invalid JSON")]
    MalformedPayload,
}

impl InboundRejection {
    pub fn status(self) -> StatusCode {
        match self {
            Self::AccessDenied => StatusCode::UNAUTHORIZED,
            Self::MalformedPayload => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for InboundRejection {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(serde_json::json!({ "message": self.to_string() })),
        )
            .into_response()
    }
}
