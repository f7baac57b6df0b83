pub mod commands;
pub mod research;
pub mod serve;

pub use commands::{Cli, Commands};
