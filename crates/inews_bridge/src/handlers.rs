use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inews_core::Error;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::{AppState, Channel};

/// A bridge error rendered as `{ "error": "..." }`.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::UnknownChannel(_) | Error::FolderNotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidArgument(_) | Error::InvalidFolderName(_) => StatusCode::BAD_REQUEST,
            Error::MissingApiKey(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("IPC handler failed: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub async fn list_channels() -> impl IntoResponse {
    Json(Channel::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>())
}

/// `POST /ipc/:channel` with a JSON array of positional arguments.
/// An empty body means no arguments.
pub async fn invoke(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let channel: Channel = name.parse()?;
    let args = if body.iter().all(u8::is_ascii_whitespace) {
        Vec::new()
    } else {
        serde_json::from_slice::<Vec<Value>>(&body).map_err(|e| {
            Error::InvalidArgument(format!("arguments must be a JSON array: {}", e))
        })?
    };

    let result = state.bridge.invoke(channel, args).await?;
    Ok(Json(result))
}
