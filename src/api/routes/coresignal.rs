use axum::{extract::State, response::Response, Json};
use tracing::info;

use crate::api::jobs::{into_http, run_report, spawn_report};
use crate::api::models::{BackgroundReportRequest, FirmographicReportRequest, JobAccepted};
use crate::api::AppState;
use crate::errors::ResearchError;
use crate::pipeline::{DeliveryOptions, ReportKind};
use crate::utils::formatting::iso_timestamp;

pub async fn generate_pdf(
    State(state): State<AppState>,
    Json(req): Json<FirmographicReportRequest>,
) -> Result<Response, ResearchError> {
    info!(website = %req.website, "Firmographic report requested");

    let options = DeliveryOptions {
        email: req.email(),
        upload: req.upload_to_drive,
        folder_id: req
            .upload_to_drive_folder_id
            .clone()
            .or_else(|| state.config.drive.default_folder_id.clone()),
        return_data: false,
    };

    let report = run_report(&state, ReportKind::Firmographic, &req.website, &options).await?;
    into_http(report.response).await
}

pub async fn generate_pdf_background(
    State(state): State<AppState>,
    Json(req): Json<BackgroundReportRequest>,
) -> Result<Json<JobAccepted>, ResearchError> {
    let email = req.email.trim().to_string();
    if email.is_empty() {
        return Err(ResearchError::InvalidRequest("email is required for background reports".into()));
    }
    if req.website.trim().is_empty() {
        return Err(ResearchError::InvalidRequest("website must not be empty".into()));
    }
    state.orchestrator()?;

    let options = DeliveryOptions {
        email: Some(email.clone()),
        upload: true,
        folder_id: state.config.drive.interface_folder_id.clone(),
        return_data: false,
    };
    let job_id = spawn_report(state, ReportKind::Firmographic, req.website.clone(), options);

    Ok(Json(JobAccepted {
        message: "Report generation started! You'll receive an email when it's ready.".into(),
        status: "processing",
        domain: None,
        website: Some(req.website),
        email,
        timestamp: iso_timestamp(),
        estimated_time: "5-10 minutes",
        job_id,
    }))
}
