use std::path::PathBuf;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::SmtpConfig;
use crate::errors::ResearchError;

/// File to attach to a report email.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailAttachment {
    pub path: PathBuf,
    pub filename: String,
}

/// One report notification. `attachment` is `None` when the artifact is sent link-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEmail {
    pub to: String,
    pub company_name: String,
    pub attachment: Option<EmailAttachment>,
    pub cloud_link: Option<String>,
}

impl ReportEmail {
    pub fn subject(&self) -> String {
        format!("Company Research Report - {}", self.company_name)
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send the report email, returning a human readable confirmation.
    async fn send(&self, email: &ReportEmail) -> Result<String, ResearchError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, ResearchError> {
        let (Some(user), Some(password)) = (config.user.clone(), config.password.clone()) else {
            return Err(ResearchError::Config("EMAIL_USER and EMAIL_PASSWORD must be set".into()));
        };
        let from = config
            .from_address()
            .ok_or_else(|| ResearchError::Config("No sender address configured".into()))?
            .parse::<Mailbox>()
            .map_err(|e| ResearchError::Config(format!("Invalid sender address: {}", e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
            .map_err(|e| ResearchError::Config(format!("Invalid SMTP server {}: {}", config.server, e)))?
            .port(config.port)
            .credentials(Credentials::new(user, password))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &ReportEmail) -> Result<String, ResearchError> {
        let to = email
            .to
            .parse::<Mailbox>()
            .map_err(|e| ResearchError::Sink(format!("Invalid recipient {}: {}", email.to, e)))?;

        let mut body = MultiPart::mixed().singlepart(SinglePart::html(email_body(
            &email.company_name,
            email.cloud_link.as_deref(),
        )));

        if let Some(attachment) = &email.attachment {
            let bytes = tokio::fs::read(&attachment.path).await?;
            let pdf = ContentType::parse("application/pdf")
                .map_err(|e| ResearchError::Internal(format!("content type: {}", e)))?;
            body = body.singlepart(Attachment::new(attachment.filename.clone()).body(bytes, pdf));
        }

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject())
            .multipart(body)
            .map_err(|e| ResearchError::Sink(format!("Failed to build email: {}", e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| ResearchError::Sink(format!("Failed to send email: {}", e)))?;

        info!(
            to = %email.to,
            attached = email.attachment.is_some(),
            "Email sent"
        );
        Ok(format!("Report sent to {}", email.to))
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn email_body(company_name: &str, cloud_link: Option<&str>) -> String {
    let drive_section = cloud_link
        .map(|link| {
            format!(
                r#"<div style="margin: 20px 0; padding: 15px; background-color: #e8f5e8; border-left: 4px solid #28a745;">
  <h3 style="margin: 0 0 10px 0;">Google Drive Access</h3>
  <p style="margin: 0;"><a href="{}">View Report in Google Drive</a></p>
</div>"#,
                escape_html(link)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family: sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1>Company Research Report</h1>
  <h2>Report Ready: {company}</h2>
  <p>Your company research report has been generated successfully.</p>
  <ul>
    <li>Company overview and key metrics</li>
    <li>Recent news and market updates</li>
    <li>Major customers and partnerships</li>
    <li>Competitive landscape analysis</li>
    <li>Financial and growth insights</li>
  </ul>
  {drive_section}
  <p>This report combines data from CoreSignal, Apollo and Tavily.</p>
  <hr>
  <p style="color: #6c757d; font-size: 14px;">Generated by Company Research API</p>
</body>
</html>
"#,
        company = escape_html(company_name),
    )
}
