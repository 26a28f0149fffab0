pub mod config;
pub mod error;

pub use config::{CIRCLE_APPROXIMATION_CONST, CleanUpConfig};
pub use error::{RedactError, RedactResult};
