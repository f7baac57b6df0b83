pub mod types;
pub mod classification;

pub use types::ResearchError;
pub use classification::ErrorClassification;
