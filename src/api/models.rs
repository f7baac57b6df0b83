use serde::{Deserialize, Serialize};

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct MultiSourceResearchRequest {
    pub domain: String,
    pub email: Option<String>,
    #[serde(default)]
    pub return_data: bool,
    #[serde(default)]
    pub upload_to_drive: bool,
    pub upload_to_drive_folder_id: Option<String>,
}

impl MultiSourceResearchRequest {
    pub fn email(&self) -> Option<String> {
        non_empty(self.email.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct FirmographicReportRequest {
    pub website: String,
    pub email: Option<String>,
    #[serde(default)]
    pub upload_to_drive: bool,
    pub upload_to_drive_folder_id: Option<String>,
}

impl FirmographicReportRequest {
    pub fn email(&self) -> Option<String> {
        non_empty(self.email.clone())
    }
}

/// Background requests deliver by email only, so the address is required.
#[derive(Debug, Deserialize)]
pub struct BackgroundResearchRequest {
    #[serde(alias = "website")]
    pub domain: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct BackgroundReportRequest {
    #[serde(alias = "domain")]
    pub website: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct DriveFilesQuery {
    pub folder_id: Option<String>,
}

impl DriveFilesQuery {
    pub fn folder_id(&self) -> Option<String> {
        non_empty(self.folder_id.clone())
    }
}

#[derive(Debug, Serialize)]
pub struct JobAccepted {
    pub message: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    pub email: String,
    pub timestamp: String,
    pub estimated_time: &'static str,
    pub job_id: String,
}
