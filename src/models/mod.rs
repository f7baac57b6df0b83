pub mod bundle;
pub mod delivery;
pub mod provider_result;
pub mod search_result;

pub use bundle::*;
pub use delivery::*;
pub use provider_result::*;
pub use search_result::*;
