//! Configuration file loading for autologic
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `AUTOLOGIC_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./autologic.toml` or `./.autologic.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/autologic/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_MODEL, DEFAULT_PROVIDER, FileCatalogConfig, FileConfig,
    FileEngineConfig, FileLlmConfig, FileOutputConfig, FileProviderConfig, FileRoleConfig,
    RoleSettings,
};
pub use loader::ConfigLoader;
