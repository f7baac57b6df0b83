pub mod formatter;
pub mod prompt;
pub mod synthesizer;

pub use synthesizer::ReportSynthesizer;
