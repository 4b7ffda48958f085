//! Error types for GitHub operations

use thiserror::Error;

/// Result type for GitHub operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during GitHub operations
#[derive(Error, Debug)]
pub enum Error {
    /// GitHub API error not covered by a more specific variant
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// Neither a token nor a username/password pair was supplied
    #[error(
        "GitHub username/password or token is required. \
         Use --token, set GITHUB_TOKEN, or add credentials to ~/.config/gls/secrets.toml"
    )]
    AuthenticationRequired,

    /// Authentication error
    #[error("GitHub authentication error: {0}")]
    Auth(String),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] gls_core::Error),

    /// No repository given and no template repository configured
    #[error("Repository is required. Use --repository or configure a template repository")]
    RepositoryRequired,

    /// Organization or user not found
    #[error("{0} doesn't exist or is not accessible")]
    ScopeNotFound(String),

    /// Repository not found
    #[error("Repository {0} doesn't exist")]
    RepositoryNotFound(String),

    /// Milestone number not found
    #[error("Cannot find milestone #{number} in repository {repository}")]
    MilestoneNumberNotFound { number: u64, repository: String },

    /// Milestone title not found
    #[error("Cannot find milestone \"{title}\" in repository {repository}")]
    MilestoneNotFound { title: String, repository: String },

    /// Milestone creation rejected because the title is taken
    #[error("Milestone \"{title}\" already exists in repository {repository}")]
    MilestoneExists { title: String, repository: String },

    /// GitHub rejected a create/update (HTTP 422)
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// An update without any field to change
    #[error("Nothing to update")]
    NothingToUpdate,

    /// Unexpected status code or payload
    #[error("Unexpected GitHub response: {0}")]
    ProtocolViolation(String),

    /// Any other non-2xx status
    #[error("GitHub returned status {status}: {message}")]
    Remote { status: u16, message: String },
}

impl Error {
    /// Whether this is one of the "does not exist" errors
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ScopeNotFound(_)
                | Error::RepositoryNotFound(_)
                | Error::MilestoneNumberNotFound { .. }
                | Error::MilestoneNotFound { .. }
        )
    }

    /// Whether GitHub rejected the payload
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::ValidationFailed(_) | Error::MilestoneExists { .. }
        )
    }
}
