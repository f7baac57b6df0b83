//! Research runs shared by the synchronous and background handlers.

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio_util::io::ReaderStream;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::ResearchError;
use crate::pipeline::{DeliveryOptions, DeliveryReport, DeliveryResponse, ReportKind};
use super::AppState;

/// Research `identifier`, then deliver the report.
pub async fn run_report(
    state: &AppState,
    kind: ReportKind,
    identifier: &str,
    options: &DeliveryOptions,
) -> Result<DeliveryReport, ResearchError> {
    let orchestrator = state.orchestrator()?;
    let bundle = match kind {
        ReportKind::MultiSource => orchestrator.research(identifier).await?,
        ReportKind::Firmographic => orchestrator.research_firmographic(identifier).await?,
    };
    state.delivery().deliver(&bundle, kind, options).await
}

/// Detach a run. The only observable outcome is the email (or its absence).
pub fn spawn_report(state: AppState, kind: ReportKind, identifier: String, options: DeliveryOptions) -> String {
    let job_id = Uuid::new_v4().to_string();
    let id = job_id.clone();

    tokio::spawn(async move {
        info!(job_id = %id, identifier = %identifier, ?kind, "Background report started");
        match run_report(&state, kind, &identifier, &options).await {
            Ok(report) => info!(
                job_id = %id,
                file = %report.artifact.filename,
                emailed = report.email.as_ref().map_or(false, |e| e.success),
                uploaded = report.upload.as_ref().map_or(false, |u| u.success),
                "Background report finished"
            ),
            Err(e) => error!(job_id = %id, error = %e, "Background report failed"),
        }
    });

    job_id
}

/// Turn the pipeline's chosen response shape into an HTTP response.
pub async fn into_http(response: DeliveryResponse) -> Result<Response, ResearchError> {
    match response {
        DeliveryResponse::Summary(summary) => Ok(Json(summary).into_response()),
        DeliveryResponse::File { artifact, upload_error } => {
            let file = tokio::fs::File::open(&artifact.path).await?;
            let body = Body::from_stream(ReaderStream::new(file));

            let mut response = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/pdf")
                .header(header::CONTENT_LENGTH, artifact.size_bytes)
                .header(
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.filename),
                )
                .body(body)
                .map_err(|e| ResearchError::Internal(format!("Failed to build response: {}", e)))?;

            if let Some(err) = upload_error {
                response
                    .headers_mut()
                    .insert("X-Drive-Upload-Error", header_safe(&err));
            }
            Ok(response)
        }
    }
}

fn header_safe(text: &str) -> HeaderValue {
    let cleaned: String = text
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { ' ' })
        .collect();
    HeaderValue::from_str(&cleaned).unwrap_or_else(|_| HeaderValue::from_static("Unknown error"))
}
