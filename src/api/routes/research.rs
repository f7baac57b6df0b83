use axum::{extract::State, response::Response, Json};
use tracing::info;

use crate::api::jobs::{into_http, run_report, spawn_report};
use crate::api::models::{BackgroundResearchRequest, JobAccepted, MultiSourceResearchRequest};
use crate::api::AppState;
use crate::errors::ResearchError;
use crate::pipeline::{DeliveryOptions, ReportKind};
use crate::utils::formatting::iso_timestamp;
use crate::utils::identifier::normalize_domain;

pub async fn multi_source_research(
    State(state): State<AppState>,
    Json(req): Json<MultiSourceResearchRequest>,
) -> Result<Response, ResearchError> {
    info!(domain = %req.domain, "Multi-source research requested");

    let options = DeliveryOptions {
        email: req.email(),
        upload: req.upload_to_drive,
        folder_id: req
            .upload_to_drive_folder_id
            .clone()
            .or_else(|| state.config.drive.default_folder_id.clone()),
        return_data: req.return_data,
    };

    let report = run_report(&state, ReportKind::MultiSource, &req.domain, &options).await?;
    into_http(report.response).await
}

pub async fn multi_source_research_background(
    State(state): State<AppState>,
    Json(req): Json<BackgroundResearchRequest>,
) -> Result<Json<JobAccepted>, ResearchError> {
    let email = req.email.trim().to_string();
    if email.is_empty() {
        return Err(ResearchError::InvalidRequest("email is required for background research".into()));
    }
    let domain = normalize_domain(&req.domain);
    if domain.is_empty() {
        return Err(ResearchError::InvalidRequest("domain must not be empty".into()));
    }
    // Fail now rather than acknowledge a job that cannot start.
    state.orchestrator()?;

    // Background runs always upload, whatever the caller asked for.
    let options = DeliveryOptions {
        email: Some(email.clone()),
        upload: true,
        folder_id: state.config.drive.interface_folder_id.clone(),
        return_data: false,
    };
    let job_id = spawn_report(state, ReportKind::MultiSource, domain, options);

    Ok(Json(JobAccepted {
        message: "Multi-source research started! You'll receive an email when it's ready.".into(),
        status: "processing",
        domain: Some(req.domain),
        website: None,
        email,
        timestamp: iso_timestamp(),
        estimated_time: "5-10 minutes",
        job_id,
    }))
}
