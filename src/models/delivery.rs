use serde::Serialize;

/// Delivery destinations for a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    CloudUpload,
    Email,
}

/// Where an uploaded artifact landed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudLocation {
    pub file_id: String,
    pub file_name: Option<String>,
    pub view_link: Option<String>,
    pub size: Option<String>,
}

/// Result of handing the artifact to one sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryOutcome {
    #[serde(skip)]
    pub sink: SinkKind,
    pub success: bool,
    #[serde(flatten)]
    pub location: Option<CloudLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn uploaded(location: CloudLocation) -> Self {
        Self {
            sink: SinkKind::CloudUpload,
            success: true,
            location: Some(location),
            message: None,
            error: None,
        }
    }

    pub fn emailed(message: impl Into<String>) -> Self {
        Self {
            sink: SinkKind::Email,
            success: true,
            location: None,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(sink: SinkKind, error: impl Into<String>) -> Self {
        Self {
            sink,
            success: false,
            location: None,
            message: None,
            error: Some(error.into()),
        }
    }

    pub fn view_link(&self) -> Option<&str> {
        self.location.as_ref().and_then(|l| l.view_link.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_outcome_flattens_location() {
        let outcome = DeliveryOutcome::uploaded(CloudLocation {
            file_id: "abc".into(),
            file_name: Some("Acme.pdf".into()),
            view_link: Some("https://drive.example.com/abc".into()),
            size: Some("1024".into()),
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["file_id"], "abc");
        assert_eq!(json["view_link"], "https://drive.example.com/abc");
        assert!(json.get("error").is_none());
        assert!(json.get("sink").is_none());
    }

    #[test]
    fn test_failed_outcome_has_error_only() {
        let outcome = DeliveryOutcome::failed(SinkKind::Email, "Email service not configured");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Email service not configured");
        assert!(json.get("file_id").is_none());
        assert!(outcome.view_link().is_none());
    }
}
