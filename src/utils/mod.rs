pub mod formatting;
pub mod identifier;
pub mod truncation;
