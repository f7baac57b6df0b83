pub mod delivery;
pub mod orchestrator;
pub mod render;

pub use delivery::{DeliveryOptions, DeliveryPipeline, DeliveryReport, DeliveryResponse, ReportKind};
pub use orchestrator::ResearchOrchestrator;
pub use render::{PandocRenderer, RenderedArtifact, ReportRenderer};
