//! Secrets management for gls
//!
//! Credentials are stored separately from configuration to avoid accidental
//! sharing. The secrets file is located at `~/.config/gls/secrets.toml` and
//! must have restrictive permissions (0600 on Unix).
//!
//! Loading priority:
//! 1. CLI flags (`--token`, `--username`, `--password`)
//! 2. Environment variables (GITHUB_TOKEN, GLS_USERNAME, GLS_PASSWORD)
//! 3. Secrets file (~/.config/gls/secrets.toml)

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Secrets structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// GitHub configuration
    pub github: GitHubSecrets,
}

/// GitHub-related secrets
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubSecrets {
    /// GitHub Personal Access Token
    pub token: Option<String>,

    /// Basic-auth user name
    pub username: Option<String>,

    /// Basic-auth password
    pub password: Option<String>,
}

impl fmt::Debug for GitHubSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubSecrets")
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Credentials used to authenticate against GitHub
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Personal access token
    Token(String),
    /// Username and password (HTTP basic auth)
    Basic { username: String, password: String },
}

impl Credentials {
    /// Short description that never reveals the secret itself
    pub fn describe(&self) -> String {
        match self {
            Credentials::Token(_) => "token".to_string(),
            Credentials::Basic { username, .. } => format!("basic auth as {}", username),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.debug_tuple("Token").field(&"***").finish(),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// Returns default (empty) secrets if file doesn't exist
    pub fn load() -> Result<Self> {
        let secrets_path = Self::default_secrets_path();

        if let Some(path) = secrets_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file with permission checking
    pub fn load_from_file(path: &Path) -> Result<Self> {
        // Check file permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::metadata(path).map_err(Error::Io)?;
            let mode = metadata.permissions().mode();

            // Readable by group or others
            if mode & 0o077 != 0 {
                return Err(Error::Config(format!(
                    "Secrets file {} has insecure permissions {:o}. \
                     Please run: chmod 600 {}",
                    path.display(),
                    mode & 0o777,
                    path.display()
                )));
            }

            debug!(path = %path.display(), mode = format!("{:o}", mode & 0o777), "Secrets file permissions OK");
        }

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        for value in [
            &mut secrets.github.token,
            &mut secrets.github.username,
            &mut secrets.github.password,
        ] {
            if let Some(v) = value {
                *v = v.trim().to_string();
            }
        }

        Ok(secrets)
    }

    /// Get the default secrets file path
    ///
    /// Returns `~/.config/gls/secrets.toml` on Unix
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gls").join("secrets.toml"))
    }

    /// Resolve credentials from CLI values, the environment and this file
    ///
    /// A token from any layer wins over a username/password pair. Returns
    /// `None` when neither a token nor a complete pair is available.
    pub fn credentials(
        &self,
        cli_token: Option<String>,
        cli_username: Option<String>,
        cli_password: Option<String>,
    ) -> Option<Credentials> {
        self.credentials_from(cli_token, cli_username, cli_password, |key| {
            std::env::var(key).ok()
        })
    }

    fn credentials_from(
        &self,
        cli_token: Option<String>,
        cli_username: Option<String>,
        cli_password: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<Credentials> {
        let pick = |cli: Option<String>, env_key: &str, file: &Option<String>| {
            cli.map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or_else(|| {
                    lookup(env_key)
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                })
                .or_else(|| file.clone().filter(|v| !v.is_empty()))
        };

        if let Some(token) = pick(cli_token, "GITHUB_TOKEN", &self.github.token) {
            debug!("Using GitHub token");
            return Some(Credentials::Token(token));
        }

        let username = pick(cli_username, "GLS_USERNAME", &self.github.username);
        let password = pick(cli_password, "GLS_PASSWORD", &self.github.password);

        match (username, password) {
            (Some(username), Some(password)) => {
                debug!(username = %username, "Using GitHub basic auth");
                Some(Credentials::Basic { username, password })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_secrets() {
        let secrets = Secrets::default();
        assert!(secrets.github.token.is_none());
        assert!(secrets.credentials_from(None, None, None, no_env).is_none());
    }

    #[test]
    fn test_parse_secrets() {
        let toml = r#"
[github]
token = "ghp_xxxxxxxxxxxx"
"#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(secrets.github.token, Some("ghp_xxxxxxxxxxxx".to_string()));
        assert_eq!(
            secrets.credentials_from(None, None, None, no_env),
            Some(Credentials::Token("ghp_xxxxxxxxxxxx".to_string()))
        );
    }

    #[test]
    fn test_token_wins_over_basic_auth() {
        let secrets = Secrets {
            github: GitHubSecrets {
                token: None,
                username: Some("octocat".to_string()),
                password: Some("hunter2".to_string()),
            },
        };

        let creds = secrets.credentials_from(Some("cli-token".to_string()), None, None, no_env);
        assert_eq!(creds, Some(Credentials::Token("cli-token".to_string())));
    }

    #[test]
    fn test_basic_auth_requires_both_parts() {
        let secrets = Secrets::default();
        assert!(secrets
            .credentials_from(None, Some("octocat".to_string()), None, no_env)
            .is_none());

        let creds = secrets.credentials_from(
            None,
            Some("octocat".to_string()),
            None,
            |key| (key == "GLS_PASSWORD").then(|| "from-env".to_string()),
        );
        assert_eq!(
            creds,
            Some(Credentials::Basic {
                username: "octocat".to_string(),
                password: "from-env".to_string(),
            })
        );
    }

    #[test]
    fn test_env_token_overrides_file() {
        let secrets = Secrets {
            github: GitHubSecrets {
                token: Some("from_file".to_string()),
                ..Default::default()
            },
        };

        let creds = secrets.credentials_from(None, None, None, |key| {
            (key == "GITHUB_TOKEN").then(|| "  from_env  ".to_string())
        });
        assert_eq!(creds, Some(Credentials::Token("from_env".to_string())));
    }

    #[test]
    fn test_debug_masks_secrets() {
        let creds = Credentials::Basic {
            username: "octocat".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("octocat"));
        assert!(!debug.contains("hunter2"));
        assert_eq!(creds.describe(), "basic auth as octocat");

        let secrets = GitHubSecrets {
            token: Some("ghp_secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{:?}", secrets).contains("ghp_secret"));
    }

    #[cfg(unix)]
    #[test]
    fn test_insecure_permissions_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github]\ntoken = \"test\"").unwrap();

        let perms = std::fs::Permissions::from_mode(0o644);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let result = Secrets::load_from_file(file.path());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("insecure permissions"));
    }

    #[cfg(unix)]
    #[test]
    fn test_secure_permissions_accepted() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github]\ntoken = \"  ghp_test  \"").unwrap();

        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let result = Secrets::load_from_file(file.path());
        assert!(result.is_ok());
        assert_eq!(result.unwrap().github.token, Some("ghp_test".to_string()));
    }
}
