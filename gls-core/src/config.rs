//! Configuration management for gls
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (GLS_*)
//! 3. Config file (~/.config/gls/config.toml)
//! 4. Default values

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// How command results are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable, colorized text
    #[default]
    Plain,
    /// The raw result structure as JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(OutputFormat::Plain),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::Config(format!(
                "Unknown output format '{}'. Expected plain or json",
                other
            ))),
        }
    }
}

/// GitHub scope settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Organization whose repositories are operated on.
    /// When unset, the authenticated user's own repositories are used.
    pub organization: Option<String>,

    /// Name of the template repository (source of truth)
    pub template_repo: Option<String>,
}

/// Output settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitHub scope configuration
    pub github: GitHubConfig,

    /// Output configuration
    pub output: OutputConfig,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub organization: Option<String>,
    pub template_repo: Option<String>,
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading config file");
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/gls/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gls").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - GLS_ORGANIZATION: Organization scope
    /// - GLS_TEMPLATE_REPO: Template repository name
    /// - GLS_FORMAT: Output format (plain or json)
    pub fn with_env_overrides(self) -> Self {
        self.with_env_from(|key| std::env::var(key).ok())
    }

    fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(org) = lookup("GLS_ORGANIZATION").filter(|v| !v.is_empty()) {
            self.github.organization = Some(org);
        }

        if let Some(template) = lookup("GLS_TEMPLATE_REPO").filter(|v| !v.is_empty()) {
            self.github.template_repo = Some(template);
        }

        if let Some(format) = lookup("GLS_FORMAT") {
            match format.parse() {
                Ok(format) => self.output.format = format,
                Err(e) => warn!(error = %e, "Ignoring GLS_FORMAT"),
            }
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(org) = overrides.organization {
            self.github.organization = Some(org);
        }

        if let Some(template) = overrides.template_repo {
            self.github.template_repo = Some(template);
        }

        if let Some(format) = overrides.format {
            self.output.format = format;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults. An explicit `path`
    /// must exist; the default location is optional.
    pub fn load_with_overrides(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let base = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load()?,
        };

        Ok(base.with_env_overrides().with_cli_overrides(overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.organization.is_none());
        assert!(config.github.template_repo.is_none());
        assert_eq!(config.output.format, OutputFormat::Plain);
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().with_cli_overrides(ConfigOverrides {
            organization: Some("acme".to_string()),
            template_repo: Some("template".to_string()),
            format: Some(OutputFormat::Json),
        });

        assert_eq!(config.github.organization.as_deref(), Some("acme"));
        assert_eq!(config.github.template_repo.as_deref(), Some("template"));
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let toml = r#"
[github]
organization = "from-file"
template_repo = "file-template"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let config = config.with_env_from(|key| match key {
            "GLS_ORGANIZATION" => Some("from-env".to_string()),
            "GLS_FORMAT" => Some("JSON".to_string()),
            _ => None,
        });

        assert_eq!(config.github.organization.as_deref(), Some("from-env"));
        assert_eq!(config.github.template_repo.as_deref(), Some("file-template"));
        assert_eq!(config.output.format, OutputFormat::Json);

        let config = config.with_cli_overrides(ConfigOverrides {
            organization: Some("from-cli".to_string()),
            ..Default::default()
        });
        assert_eq!(config.github.organization.as_deref(), Some("from-cli"));
        assert_eq!(config.github.template_repo.as_deref(), Some("file-template"));
    }

    #[test]
    fn test_invalid_env_format_is_ignored() {
        let config = Config::default().with_env_from(|key| match key {
            "GLS_FORMAT" => Some("yaml".to_string()),
            _ => None,
        });
        assert_eq!(config.output.format, OutputFormat::Plain);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[github]
organization = "acme"
template_repo = "template"

[output]
format = "json"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.github.organization.as_deref(), Some("acme"));
        assert_eq!(config.github.template_repo.as_deref(), Some("template"));
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[github]
template_repo = "template"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.github.organization.is_none());
        assert_eq!(config.output.format, OutputFormat::Plain);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github]\norganization = \"acme\"").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.github.organization.as_deref(), Some("acme"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github\norganization = ").unwrap();

        let err = Config::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert_eq!(" Json ".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
