use axum::http::StatusCode;

use super::types::ResearchError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub status: StatusCode,
}

impl ResearchError {
    /// Classify this error into its reported type and the HTTP status it maps to.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            ResearchError::Config(_) => ErrorClassification {
                error_type: "ConfigurationError",
                status: StatusCode::SERVICE_UNAVAILABLE,
            },
            ResearchError::InvalidRequest(_) => ErrorClassification {
                error_type: "InvalidRequestError",
                status: StatusCode::BAD_REQUEST,
            },
            ResearchError::Upstream(_) => ErrorClassification {
                error_type: "UpstreamError",
                status: StatusCode::BAD_GATEWAY,
            },
            ResearchError::Synthesis(_) => ErrorClassification {
                error_type: "SynthesisError",
                status: StatusCode::BAD_GATEWAY,
            },
            ResearchError::Render(_) => ErrorClassification {
                error_type: "RenderError",
                status: StatusCode::INTERNAL_SERVER_ERROR,
            },

            // Delivery records sink failures in the response; the status only applies
            // when a sink call is the whole request (e.g. folder listing).
            ResearchError::Sink(_) => ErrorClassification {
                error_type: "SinkError",
                status: StatusCode::BAD_GATEWAY,
            },

            ResearchError::Io(_) => ErrorClassification {
                error_type: "IoError",
                status: StatusCode::INTERNAL_SERVER_ERROR,
            },
            ResearchError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                status: StatusCode::INTERNAL_SERVER_ERROR,
            },
            ResearchError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                status: StatusCode::INTERNAL_SERVER_ERROR,
            },
            ResearchError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                status: StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}
