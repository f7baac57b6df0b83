use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::api::AppState;
use crate::utils::formatting::iso_timestamp;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let config = &state.config;
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": iso_timestamp(),
        "api_availability": {
            "coresignal": state.providers.firmographic.is_some(),
            "apollo": state.providers.enrichment.is_some(),
            "tavily": state.providers.search.is_some(),
            "llm": state.llm.is_some(),
        },
        "google_drive_available": state.cloud.is_some(),
        "email_configured": state.mailer.is_some(),
        "service_account_exists": config.drive.service_account_file.exists(),
    }))
}
