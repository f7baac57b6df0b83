pub mod credentials;
pub mod parser;
pub mod types;

pub use credentials::{redact_credentials, resolve_credential};
pub use parser::{load_config, parse_config_file};
pub use types::*;
