//! Infrastructure layer for autologic
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP model clients, configuration file
//! loading, catalog loading and the JSONL progress trace.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use catalog::CatalogLoader;
pub use config::{
    ConfigLoader, ConfigValidationError, FileCatalogConfig, FileConfig, FileEngineConfig,
    FileLlmConfig, FileOutputConfig, FileProviderConfig, FileRoleConfig, RoleSettings,
};
pub use logging::JsonlProgressLogger;
pub use providers::{
    ChatTransport, FactoryError, FreeModelCache, GenerationParams, HuggingFaceClient,
    ModelFactory, OpenAiCompatClient, OpenRouterClient,
};
