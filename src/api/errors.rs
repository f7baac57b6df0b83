use axum::{response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

use crate::errors::ResearchError;

impl IntoResponse for ResearchError {
    fn into_response(self) -> axum::response::Response {
        let class = self.classify();
        if class.status.is_server_error() {
            error!(error_type = class.error_type, error = %self, "Request failed");
        }
        (
            class.status,
            Json(json!({"error": self.to_string(), "error_type": class.error_type})),
        )
            .into_response()
    }
}
