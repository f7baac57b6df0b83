pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod reporting;
pub mod sinks;
pub mod utils;
