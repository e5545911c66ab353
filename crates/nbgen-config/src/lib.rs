//! Configuration management for nbgen.
//!
//! Parses `nbgen.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! All paths in the config file are interpreted relative to the directory
//! containing the config file and resolved to absolute paths during load.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "nbgen.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override documentation source directory.
    pub source_dir: Option<PathBuf>,
    /// Override the book renderer command.
    pub book_command: Option<String>,
    /// Override the HTML deployment directory name.
    pub deploy_name: Option<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Book build configuration.
    pub book: BookConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    registry: Option<String>,
    api_dump: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default, Clone)]
pub struct DocsConfig {
    /// Root directory holding markdown sources and generated notebooks.
    pub source_dir: PathBuf,
    /// Path to the registry manifest (`registry.toml`).
    pub registry: PathBuf,
    /// Path to the API introspection dump, if API-reference units are used.
    pub api_dump: Option<PathBuf>,
}

impl DocsConfig {
    /// Ephemeral renderer output directory (`_build/`).
    #[must_use]
    pub fn build_dir(&self) -> PathBuf {
        self.source_dir.join("_build")
    }

    /// Rendered HTML tree inside the build directory.
    #[must_use]
    pub fn html_build_dir(&self) -> PathBuf {
        self.build_dir().join("html")
    }

    /// PDF produced by the single-document builder.
    #[must_use]
    pub fn pdf_build_path(&self) -> PathBuf {
        self.build_dir().join("pdf").join("book.pdf")
    }

    /// HTML deployment directory (`docs/<deploy_name>/`).
    #[must_use]
    pub fn deploy_dir(&self, deploy_name: &str) -> PathBuf {
        self.source_dir.join("docs").join(deploy_name)
    }

    /// Fixed PDF deployment path (`docs/<pdf_name>`).
    #[must_use]
    pub fn pdf_deploy_path(&self, pdf_name: &str) -> PathBuf {
        self.source_dir.join("docs").join(pdf_name)
    }
}

/// Book build configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BookConfig {
    /// External renderer command.
    pub command: String,
    /// Name of the HTML deployment directory under `docs/`.
    pub deploy_name: String,
    /// Filename of the deployed PDF under `docs/`.
    pub pdf_name: String,
    /// Regex patterns for build-log lines to filter out.
    pub noise_patterns: Vec<String>,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            command: "jupyter-book".to_owned(),
            deploy_name: "site".to_owned(),
            pdf_name: "manual.pdf".to_owned(),
            noise_patterns: vec![
                "copying ".to_owned(),
                "reading sources".to_owned(),
                "writing output".to_owned(),
            ],
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `nbgen.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(command) = &settings.book_command {
            self.book.command.clone_from(command);
        }
        if let Some(deploy_name) = &settings.deploy_name {
            self.book.deploy_name.clone_from(deploy_name);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            docs: DocsConfigRaw::default(),
            book: BookConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs_src"),
                registry: base.join("docs_src").join("registry.toml"),
                api_dump: None,
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading and applying CLI settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.book.command, "book.command")?;
        require_non_empty(&self.book.deploy_name, "book.deploy_name")?;
        require_non_empty(&self.book.pdf_name, "book.pdf_name")?;

        // The deployment directory name is joined under docs/; path
        // separators would escape it.
        if self.book.deploy_name.contains('/') || self.book.deploy_name.contains('\\') {
            return Err(ConfigError::Validation(
                "book.deploy_name must be a plain directory name".to_owned(),
            ));
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    ///
    /// The registry manifest defaults to `registry.toml` inside the resolved
    /// source directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let source_dir = config_dir.join(self.docs.source_dir.as_deref().unwrap_or("docs_src"));
        let registry = match self.docs.registry.as_deref() {
            Some(path) => config_dir.join(path),
            None => source_dir.join("registry.toml"),
        };
        self.docs_resolved = DocsConfig {
            source_dir,
            registry,
            api_dump: self.docs.api_dump.as_deref().map(|p| config_dir.join(p)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/test/docs_src")
        );
        assert_eq!(
            config.docs_resolved.registry,
            PathBuf::from("/test/docs_src/registry.toml")
        );
        assert!(config.docs_resolved.api_dump.is_none());
        assert_eq!(config.book.command, "jupyter-book");
        assert_eq!(config.book.deploy_name, "site");
        assert_eq!(config.book.pdf_name, "manual.pdf");
    }

    #[test]
    fn test_parse_minimal_config() {
        let toml = "";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.book.command, "jupyter-book");
        assert_eq!(config.book.noise_patterns.len(), 3);
    }

    #[test]
    fn test_parse_book_config() {
        let toml = r#"
[book]
command = "my-book"
deploy_name = "flgt"
pdf_name = "fiatlight_manual.pdf"
noise_patterns = ["^copying", "^reading"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.book.command, "my-book");
        assert_eq!(config.book.deploy_name, "flgt");
        assert_eq!(config.book.pdf_name, "fiatlight_manual.pdf");
        assert_eq!(config.book.noise_patterns, vec!["^copying", "^reading"]);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "documentation"
registry = "documentation/registry.toml"
api_dump = "api.json"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/documentation")
        );
        assert_eq!(
            config.docs_resolved.registry,
            PathBuf::from("/project/documentation/registry.toml")
        );
        assert_eq!(
            config.docs_resolved.api_dump,
            Some(PathBuf::from("/project/api.json"))
        );
    }

    #[test]
    fn test_derived_paths() {
        let docs = DocsConfig {
            source_dir: PathBuf::from("/project/docs_src"),
            registry: PathBuf::from("/project/registry.toml"),
            api_dump: None,
        };
        assert_eq!(docs.build_dir(), PathBuf::from("/project/docs_src/_build"));
        assert_eq!(
            docs.html_build_dir(),
            PathBuf::from("/project/docs_src/_build/html")
        );
        assert_eq!(
            docs.pdf_build_path(),
            PathBuf::from("/project/docs_src/_build/pdf/book.pdf")
        );
        assert_eq!(
            docs.deploy_dir("flgt"),
            PathBuf::from("/project/docs_src/docs/flgt")
        );
        assert_eq!(
            docs.pdf_deploy_path("manual.pdf"),
            PathBuf::from("/project/docs_src/docs/manual.pdf")
        );
    }

    #[test]
    fn test_apply_cli_settings_source_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
        // Unchanged
        assert_eq!(config.book.command, "jupyter-book");
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(
            config.docs_resolved.source_dir,
            before.docs_resolved.source_dir
        );
        assert_eq!(config.book.command, before.book.command);
    }

    #[test]
    fn test_validate_default_passes() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_command() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.book.command = String::new();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("book.command"));
    }

    #[test]
    fn test_validate_deploy_name_with_separator() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.book.deploy_name = "../escape".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("deploy_name"));
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let err = Config::load(Some(Path::new("/nonexistent/nbgen.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_against_config_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let config_path = tmp.path().join("nbgen.toml");
        std::fs::write(
            &config_path,
            "[docs]\nsource_dir = \"manual\"\n\n[book]\ndeploy_name = \"flgt\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();
        assert_eq!(config.docs_resolved.source_dir, tmp.path().join("manual"));
        assert_eq!(config.book.deploy_name, "flgt");
        assert_eq!(config.config_path, Some(config_path));
    }
}
