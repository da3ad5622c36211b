//! Application configuration
//!
//! Parameters that control the reasoning cycle's loops. File-based
//! configuration is parsed in the infrastructure layer and converted into
//! these types.

mod engine_params;

pub use engine_params::EngineParams;
