//! CLI command implementations

pub mod labels;
pub mod milestones;
pub mod repositories;

pub use labels::LabelsArgs;
pub use milestones::MilestonesArgs;
pub use repositories::RepositoriesArgs;

use gls_core::OutputFormat;
use gls_github::GitHubClient;

/// Everything a command needs once the client is connected
pub struct Context {
    pub client: GitHubClient,
    pub format: OutputFormat,
}
