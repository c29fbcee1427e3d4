// Configuration loading

pub mod error;
pub mod schema;
pub mod settings;

pub use error::ConfigError;
pub use schema::{AttributeSchema, AttributeSpec, SUPPORTED_KINDS};
pub use settings::GridSettings;
