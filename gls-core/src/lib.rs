//! gls core - configuration for the GitHub labels & milestones sync tool
//!
//! This crate holds everything `gls` needs before it talks to GitHub:
//! the layered [`Config`], the [`Secrets`] file and the resolved
//! [`Credentials`].

pub mod config;
pub mod error;
pub mod secrets;

pub use config::{Config, ConfigOverrides, GitHubConfig, OutputConfig, OutputFormat};
pub use error::{Error, Result};
pub use secrets::{Credentials, GitHubSecrets, Secrets};
