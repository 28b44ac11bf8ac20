//! Operator configuration
//!
//! Layers, lowest precedence first: defaults resolved once from the operator
//! environment at startup, an optional YAML file, then environment overrides.

mod defaults;
pub mod loader;
pub mod paths;
pub mod schema;

pub use defaults::{
    MAX_TOKENS_FOR_RESPONSE_DEFAULT, OperatorDefaults, RAG_IMAGE_ENV, RAG_IMAGE_URL_FALLBACK,
};
pub use loader::ConfigLoader;
pub use schema::Config;
