use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};

use crate::api::models::DriveFilesQuery;
use crate::api::AppState;
use crate::errors::ResearchError;

pub async fn list_drive_files(
    State(state): State<AppState>,
    Query(query): Query<DriveFilesQuery>,
) -> Result<Json<Value>, ResearchError> {
    let cloud = state.cloud.clone().ok_or_else(|| {
        ResearchError::InvalidRequest(
            "Google Drive functionality not available. Check the service account file".into(),
        )
    })?;
    let folder_id = query
        .folder_id()
        .or_else(|| state.config.drive.interface_folder_id.clone())
        .ok_or_else(|| {
            ResearchError::InvalidRequest(
                "No folder ID provided and GOOGLE_DRIVE_INTERFACE_FOLDER_ID is not set".into(),
            )
        })?;

    let files = cloud.list(&folder_id).await?;
    Ok(Json(json!({
        "folder_id": folder_id,
        "file_count": files.len(),
        "files": files,
    })))
}
