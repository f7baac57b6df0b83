use std::sync::Arc;

use chrono::{DateTime, Local};
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::errors::ResearchError;
use crate::models::{DeliveryOutcome, ResearchBundle, SinkKind};
use crate::sinks::{CloudStore, EmailAttachment, Mailer, ReportEmail};
use crate::utils::formatting::{format_megabytes, iso_timestamp, safe_file_stem};
use super::render::{RenderedArtifact, ReportRenderer};

/// Attachment ceiling most mail providers accept.
pub const DEFAULT_ATTACHMENT_LIMIT: u64 = 25 * 1024 * 1024;

/// Which research flow produced the bundle. Controls naming and summary wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    MultiSource,
    Firmographic,
}

impl ReportKind {
    pub fn artifact_filename(&self, company_name: &str, at: DateTime<Local>) -> String {
        let infix = match self {
            Self::MultiSource => "multi_source_report",
            Self::Firmographic => "coresignal_report",
        };
        format!("{}_{}_{}.pdf", safe_file_stem(company_name), infix, at.format("%Y%m%d_%H%M%S"))
    }

    /// Response key carrying the request identifier.
    pub fn identifier_key(&self) -> &'static str {
        match self {
            Self::MultiSource => "domain",
            Self::Firmographic => "website",
        }
    }

    pub fn upload_description(&self, company_name: &str, at: DateTime<Local>) -> String {
        let label = match self {
            Self::MultiSource => "Multi-source company research report",
            Self::Firmographic => "Company research report",
        };
        format!("{} for {} generated on {}", label, company_name, at.format("%Y-%m-%d %H:%M:%S"))
    }

    fn generated_message(&self) -> &'static str {
        match self {
            Self::MultiSource => "Multi-source research completed and PDF generated successfully",
            Self::Firmographic => "PDF generated successfully",
        }
    }

    fn uploaded_message(&self) -> &'static str {
        match self {
            Self::MultiSource => "Multi-source research completed and PDF uploaded to Google Drive successfully",
            Self::Firmographic => "PDF generated and uploaded to Google Drive successfully",
        }
    }
}

/// Per-request delivery switches.
#[derive(Debug, Clone, Default)]
pub struct DeliveryOptions {
    pub email: Option<String>,
    pub upload: bool,
    pub folder_id: Option<String>,
    pub return_data: bool,
}

/// What the caller gets back.
#[derive(Debug)]
pub enum DeliveryResponse {
    /// JSON summary with sink outcomes.
    Summary(Value),
    /// Stream the artifact. `upload_error` is set when an upload was attempted and failed.
    File {
        artifact: RenderedArtifact,
        upload_error: Option<String>,
    },
}

#[derive(Debug)]
pub struct DeliveryReport {
    pub artifact: RenderedArtifact,
    pub upload: Option<DeliveryOutcome>,
    pub email: Option<DeliveryOutcome>,
    /// The local artifact was removed after a durable hand-off.
    pub artifact_removed: bool,
    pub response: DeliveryResponse,
}

/// Render, hand the artifact to the requested sinks, and pick the response shape.
#[derive(Clone)]
pub struct DeliveryPipeline {
    renderer: Arc<dyn ReportRenderer>,
    cloud: Option<Arc<dyn CloudStore>>,
    mailer: Option<Arc<dyn Mailer>>,
    attachment_limit: u64,
}

impl DeliveryPipeline {
    pub fn new(
        renderer: Arc<dyn ReportRenderer>,
        cloud: Option<Arc<dyn CloudStore>>,
        mailer: Option<Arc<dyn Mailer>>,
    ) -> Self {
        Self {
            renderer,
            cloud,
            mailer,
            attachment_limit: DEFAULT_ATTACHMENT_LIMIT,
        }
    }

    pub fn with_attachment_limit(mut self, limit: u64) -> Self {
        self.attachment_limit = limit;
        self
    }

    /// Only rendering is fatal. Sink failures are recorded in the report.
    pub async fn deliver(
        &self,
        bundle: &ResearchBundle,
        kind: ReportKind,
        options: &DeliveryOptions,
    ) -> Result<DeliveryReport, ResearchError> {
        let started = Local::now();
        let filename = kind.artifact_filename(&bundle.company_name, started);
        let artifact = self.renderer.render(&bundle.report, &filename).await?;

        let upload = if options.upload {
            Some(self.upload(bundle, kind, &artifact, options.folder_id.as_deref(), started).await)
        } else {
            None
        };

        let mut email_handed_off = false;
        let email = match options.email.as_deref() {
            Some(to) => {
                let link = upload
                    .as_ref()
                    .filter(|u| u.success)
                    .and_then(|u| u.view_link())
                    .map(str::to_string);
                let (outcome, carried_report) = self.email(to, &bundle.company_name, &artifact, link).await;
                email_handed_off = outcome.success && carried_report;
                Some(outcome)
            }
            None => None,
        };

        let upload_ok = upload.as_ref().map_or(false, |u| u.success);
        let email_ok = email.as_ref().map_or(false, |e| e.success);

        let response = if options.email.is_some() {
            let mut summary = self.summary(bundle, kind, &artifact, kind.generated_message(), options);
            summary.insert("email_sent".into(), json!(email_ok));
            if let Some(upload) = &upload {
                summary.insert("google_drive".into(), serde_json::to_value(upload)?);
            }
            if let Some(email) = &email {
                summary.insert("email_result".into(), serde_json::to_value(email)?);
            }
            DeliveryResponse::Summary(Value::Object(summary))
        } else if upload_ok {
            let mut summary = self.summary(bundle, kind, &artifact, kind.uploaded_message(), options);
            if let Some(upload) = &upload {
                summary.insert("google_drive".into(), serde_json::to_value(upload)?);
            }
            DeliveryResponse::Summary(Value::Object(summary))
        } else {
            DeliveryResponse::File {
                artifact: artifact.clone(),
                upload_error: upload
                    .as_ref()
                    .filter(|u| !u.success)
                    .map(|u| u.error.clone().unwrap_or_else(|| "Unknown error".to_string())),
            }
        };

        // An email without the attachment or a link is not a hand-off; the file stays.
        let mut artifact_removed = false;
        if email_handed_off || upload_ok {
            match tokio::fs::remove_file(&artifact.path).await {
                Ok(()) => artifact_removed = true,
                Err(e) => warn!(path = %artifact.path.display(), error = %e, "Failed to remove delivered artifact"),
            }
        }

        info!(
            company = %bundle.company_name,
            file = %artifact.filename,
            uploaded = upload_ok,
            emailed = email_ok,
            "Delivery finished"
        );

        Ok(DeliveryReport { artifact, upload, email, artifact_removed, response })
    }

    async fn upload(
        &self,
        bundle: &ResearchBundle,
        kind: ReportKind,
        artifact: &RenderedArtifact,
        folder_id: Option<&str>,
        at: DateTime<Local>,
    ) -> DeliveryOutcome {
        let Some(cloud) = &self.cloud else {
            warn!("Upload requested but Google Drive is not configured");
            return DeliveryOutcome::failed(SinkKind::CloudUpload, "Google Drive uploader not available");
        };
        let Some(folder_id) = folder_id.filter(|f| !f.trim().is_empty()) else {
            warn!("Upload requested but no folder id is set");
            return DeliveryOutcome::failed(SinkKind::CloudUpload, "Google Drive upload folder ID is not set");
        };

        let description = kind.upload_description(&bundle.company_name, at);
        match cloud.upload(&artifact.path, &artifact.filename, folder_id, &description).await {
            Ok(location) => DeliveryOutcome::uploaded(location),
            Err(e) => {
                warn!(error = %e, "Google Drive upload failed");
                DeliveryOutcome::failed(SinkKind::CloudUpload, sink_message(e))
            }
        }
    }

    /// Returns the outcome and whether the message carried the report, either
    /// attached or as a cloud link.
    async fn email(
        &self,
        to: &str,
        company_name: &str,
        artifact: &RenderedArtifact,
        cloud_link: Option<String>,
    ) -> (DeliveryOutcome, bool) {
        let Some(mailer) = &self.mailer else {
            warn!("Email requested but the mail transport is not configured");
            return (DeliveryOutcome::failed(SinkKind::Email, "Email service not configured"), false);
        };

        let attachment = if artifact.size_bytes < self.attachment_limit {
            Some(EmailAttachment {
                path: artifact.path.clone(),
                filename: artifact.filename.clone(),
            })
        } else {
            warn!(
                size = %format_megabytes(artifact.size_bytes),
                "PDF too large to attach, sending link only"
            );
            None
        };

        let carries_report = attachment.is_some() || cloud_link.is_some();
        let message = ReportEmail {
            to: to.to_string(),
            company_name: company_name.to_string(),
            attachment,
            cloud_link,
        };
        match mailer.send(&message).await {
            Ok(confirmation) if carries_report => (DeliveryOutcome::emailed(confirmation), true),
            Ok(confirmation) => {
                warn!(to = %to, path = %artifact.path.display(), "Email sent without the report, keeping the PDF");
                let note = format!(
                    "{} (report not included: PDF is {} and no Google Drive link is available)",
                    confirmation,
                    format_megabytes(artifact.size_bytes)
                );
                (DeliveryOutcome::emailed(note), false)
            }
            Err(e) => {
                warn!(to = %to, error = %e, "Email delivery failed");
                (DeliveryOutcome::failed(SinkKind::Email, sink_message(e)), false)
            }
        }
    }

    fn summary(
        &self,
        bundle: &ResearchBundle,
        kind: ReportKind,
        artifact: &RenderedArtifact,
        message: &str,
        options: &DeliveryOptions,
    ) -> Map<String, Value> {
        let mut summary = Map::new();
        summary.insert("message".into(), json!(message));
        summary.insert("company_name".into(), json!(bundle.company_name));
        summary.insert(kind.identifier_key().into(), json!(bundle.domain));
        summary.insert("pdf_filename".into(), json!(artifact.filename));
        summary.insert("timestamp".into(), json!(iso_timestamp()));
        summary.insert("data_sources".into(), json!(bundle.data_sources()));
        if options.return_data {
            summary.insert("raw_data".into(), bundle.raw_data());
        }
        summary
    }
}

fn sink_message(error: ResearchError) -> String {
    match error {
        ResearchError::Sink(msg) => msg,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_artifact_filename() {
        let at = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(
            ReportKind::MultiSource.artifact_filename("Acme, Inc.", at),
            "Acme_Inc_multi_source_report_20240305_140709.pdf"
        );
        assert_eq!(
            ReportKind::Firmographic.artifact_filename("Unknown_Company", at),
            "Unknown_Company_coresignal_report_20240305_140709.pdf"
        );
    }

    #[test]
    fn test_upload_description() {
        let at = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        assert_eq!(
            ReportKind::MultiSource.upload_description("Acme", at),
            "Multi-source company research report for Acme generated on 2024-03-05 14:07:09"
        );
    }
}
