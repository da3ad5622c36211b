//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "autologic";
const PROJECT_FILES: [&str; 2] = ["autologic.toml", ".autologic.toml"];
const ENV_PREFIX: &str = "AUTOLOGIC_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `AUTOLOGIC_`-prefixed environment variables (`__` separates
    ///    sections, e.g. `AUTOLOGIC_LLM__ACTIVE_MODEL`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./autologic.toml` or `./.autologic.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/autologic/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        // An explicit file must exist; discovered ones are optional
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))));
        }
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// The merged provider chain, before extraction
    pub fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/autologic/config.toml if set,
    /// otherwise falls back to ~/.config/autologic/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn describe_sources(explicit: Option<&Path>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push(format!("  [ env ] Environment: {ENV_PREFIX}*"));

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{mark:^5}] Explicit: {}", path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push(format!(
                "  [     ] Project: ./{} or ./{}",
                PROJECT_FILES[0], PROJECT_FILES[1]
            )),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            lines.push(format!("  [{mark}] Global:  {}", path.display()));
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.llm.active_provider, "openrouter");
        assert_eq!(config.engine.max_retries, 3);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("autologic"));
    }

    #[test]
    fn test_project_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "autologic.toml",
                r#"
[llm]
active_provider = "ollama"
active_model = "llama3.1"

[llm.resilience]
rate_limit = 2.0
"#,
            )?;
            jail.set_env("AUTOLOGIC_LLM__ACTIVE_MODEL", "qwen2.5");
            jail.set_env("AUTOLOGIC_ENGINE__MAX_RETRIES", "5");

            let config = ConfigLoader::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.llm.active_provider, "ollama");
            assert_eq!(config.llm.active_model, "qwen2.5");
            assert_eq!(config.llm.resilience.rate_limit, 2.0);
            assert_eq!(config.engine.max_retries, 5);
            // Untouched sections keep defaults
            assert_eq!(config.engine.phase_attempts, 3);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file("autologic.toml", "[engine]\nmax_retries = 2\n")?;
            jail.create_file("custom.toml", "[engine]\nmax_retries = 4\n")?;

            let explicit = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&explicit)).map_err(|e| e.to_string())?;
            assert_eq!(config.engine.max_retries, 4);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let explicit = PathBuf::from("does-not-exist.toml");
            assert!(ConfigLoader::load(Some(&explicit)).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_describe_sources_mentions_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(".autologic.toml", "")?;
            let lines = ConfigLoader::describe_sources(None);
            assert!(lines.iter().any(|l| l.contains("[FOUND] Project: .autologic.toml")));
            Ok(())
        });
    }
}
