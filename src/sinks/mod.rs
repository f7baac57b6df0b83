//! Delivery destinations for rendered reports.

pub mod drive;
pub mod email;

pub use drive::{CloudStore, DriveClient, DriveFile};
pub use email::{EmailAttachment, Mailer, ReportEmail, SmtpMailer};
