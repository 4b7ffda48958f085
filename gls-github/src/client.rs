//! GitHub API client using octocrab

use async_trait::async_trait;
use gls_core::{Credentials, GitHubConfig};
use octocrab::{Octocrab, Page};
use serde::Serialize;
use tracing::{debug, info};

use crate::repos::filter_owned;
use crate::{
    Error, GitHubApi, Label, Milestone, MilestoneStateFilter, MilestoneUpdate, NewMilestone,
    Repository, Result, Scope,
};

const PER_PAGE: u8 = 100;

/// Authenticated GitHub session
///
/// Holds the credentials, the resolved [`Scope`] and the template repository.
/// Nothing in it changes after construction.
pub struct GitHubClient {
    client: Octocrab,
    scope: Scope,
    template_repo: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    repo_type: Option<&'a str>,
    per_page: u8,
}

impl ListParams<'_> {
    fn new() -> Self {
        Self {
            state: None,
            repo_type: None,
            per_page: PER_PAGE,
        }
    }
}

/// What a request was about, used to turn HTTP statuses into domain errors
#[derive(Debug, Clone, Copy)]
pub(crate) enum Target<'a> {
    CurrentUser,
    Scope(&'a Scope),
    Repository(&'a str),
    Milestone { repository: &'a str, number: u64 },
    NewMilestone { repository: &'a str, title: &'a str },
}

impl GitHubClient {
    /// Authenticate and resolve the scope
    ///
    /// Without an organization the scope is the authenticated user, which
    /// costs one request to look up the login.
    pub async fn connect(credentials: Option<Credentials>, config: &GitHubConfig) -> Result<Self> {
        let credentials = credentials.ok_or(Error::AuthenticationRequired)?;
        let client = build_octocrab(&credentials)?;

        let scope = match &config.organization {
            Some(org) => Scope::Organization(org.clone()),
            None => {
                debug!("Looking up authenticated user");
                let user = client
                    .current()
                    .user()
                    .await
                    .map_err(|e| classify(e, Target::CurrentUser))?;
                Scope::User(user.login)
            }
        };

        info!(scope = %scope, auth = %credentials.describe(), "Created GitHub client");

        Ok(Self {
            client,
            scope,
            template_repo: config.template_repo.clone(),
        })
    }

    /// Create a client for a known scope without any network access
    pub fn with_scope(
        credentials: &Credentials,
        scope: Scope,
        template_repo: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            client: build_octocrab(credentials)?,
            scope,
            template_repo,
        })
    }

    /// Configured template repository
    pub fn template_repo(&self) -> Option<&str> {
        self.template_repo.as_deref()
    }

    /// `repository` if given, the template repository otherwise
    pub fn repository_or_template(&self, repository: Option<&str>) -> Result<String> {
        repository
            .or(self.template_repo())
            .map(str::to_string)
            .ok_or(Error::RepositoryRequired)
    }

    /// Get the underlying octocrab client
    pub fn client(&self) -> &Octocrab {
        &self.client
    }

    fn milestones_route(&self, repo: &str) -> String {
        format!("/repos/{}/{}/milestones", self.scope.login(), repo)
    }

    fn milestone_route(&self, repo: &str, number: u64) -> String {
        format!("{}/{}", self.milestones_route(repo), number)
    }

    async fn get_all<T>(
        &self,
        route: &str,
        params: &ListParams<'_>,
        target: Target<'_>,
    ) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let page: Page<T> = self
            .client
            .get(route, Some(params))
            .await
            .map_err(|e| classify(e, target))?;

        self.client
            .all_pages(page)
            .await
            .map_err(|e| classify(e, target))
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    fn scope(&self) -> &Scope {
        &self.scope
    }

    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        debug!(scope = %self.scope, "Listing repositories");

        let mut params = ListParams::new();
        let route = match &self.scope {
            Scope::Organization(org) => {
                params.repo_type = Some("all");
                format!("/orgs/{}/repos", org)
            }
            Scope::User(_) => "/user/repos".to_string(),
        };

        let repos: Vec<Repository> = self
            .get_all(&route, &params, Target::Scope(&self.scope))
            .await?;
        let total = repos.len();
        let owned = filter_owned(repos, &self.scope);

        info!(total, owned = owned.len(), "Fetched repositories");

        Ok(owned)
    }

    async fn list_labels(&self, repo: &str) -> Result<Vec<Label>> {
        debug!(owner = %self.scope.login(), repo, "Listing labels");

        let route = format!("/repos/{}/{}/labels", self.scope.login(), repo);
        let labels: Vec<Label> = self
            .get_all(&route, &ListParams::new(), Target::Repository(repo))
            .await?;

        debug!(repo, count = labels.len(), "Fetched labels");
        Ok(labels)
    }

    async fn list_milestones(
        &self,
        repo: &str,
        filter: MilestoneStateFilter,
    ) -> Result<Vec<Milestone>> {
        debug!(owner = %self.scope.login(), repo, state = filter.as_param(), "Listing milestones");

        let params = ListParams {
            state: Some(filter.as_param()),
            ..ListParams::new()
        };
        let milestones: Vec<Milestone> = self
            .get_all(&self.milestones_route(repo), &params, Target::Repository(repo))
            .await?;

        debug!(repo, count = milestones.len(), "Fetched milestones");
        Ok(milestones)
    }

    async fn get_milestone(&self, repo: &str, number: u64) -> Result<Milestone> {
        debug!(owner = %self.scope.login(), repo, number, "Fetching milestone");

        self.client
            .get(self.milestone_route(repo, number), None::<&()>)
            .await
            .map_err(|e| {
                classify(
                    e,
                    Target::Milestone {
                        repository: repo,
                        number,
                    },
                )
            })
    }

    async fn create_milestone(&self, repo: &str, milestone: &NewMilestone) -> Result<Milestone> {
        debug!(owner = %self.scope.login(), repo, title = %milestone.title, "Creating milestone");

        let created: Milestone = self
            .client
            .post(self.milestones_route(repo), Some(milestone))
            .await
            .map_err(|e| {
                classify(
                    e,
                    Target::NewMilestone {
                        repository: repo,
                        title: &milestone.title,
                    },
                )
            })?;

        info!(repo, number = created.number, title = %created.title, "Created milestone");
        Ok(created)
    }

    async fn update_milestone(
        &self,
        repo: &str,
        number: u64,
        update: &MilestoneUpdate,
    ) -> Result<Milestone> {
        if update.is_empty() {
            return Err(Error::NothingToUpdate);
        }

        debug!(owner = %self.scope.login(), repo, number, ?update, "Updating milestone");

        let updated: Milestone = self
            .client
            .patch(self.milestone_route(repo, number), Some(update))
            .await
            .map_err(|e| {
                classify(
                    e,
                    Target::Milestone {
                        repository: repo,
                        number,
                    },
                )
            })?;

        info!(repo, number, title = %updated.title, "Updated milestone");
        Ok(updated)
    }

    async fn delete_milestone(&self, repo: &str, number: u64) -> Result<()> {
        debug!(owner = %self.scope.login(), repo, number, "Deleting milestone");

        let target = Target::Milestone {
            repository: repo,
            number,
        };
        let route = self.milestone_route(repo, number);
        let response = self
            .client
            ._delete(route.as_str(), None::<&()>)
            .await
            .map_err(|e| classify(e, target))?;

        delete_status(response.status().as_u16(), &route, target)?;
        info!(repo, number, "Deleted milestone");
        Ok(())
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("scope", &self.scope)
            .field("template_repo", &self.template_repo)
            .finish_non_exhaustive()
    }
}

fn build_octocrab(credentials: &Credentials) -> Result<Octocrab> {
    let builder = Octocrab::builder();
    let builder = match credentials {
        Credentials::Token(token) => builder.personal_token(token.clone()),
        Credentials::Basic { username, password } => {
            builder.basic_auth(username.clone(), password.clone())
        }
    };

    builder
        .build()
        .map_err(|e| Error::Auth(format!("Failed to create GitHub client: {}", e)))
}

/// Map an octocrab error onto the domain error for `target`
pub(crate) fn classify(err: octocrab::Error, target: Target<'_>) -> Error {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            let codes: Vec<String> = source
                .errors
                .iter()
                .flatten()
                .filter_map(|e| e.get("code").and_then(|c| c.as_str()))
                .map(str::to_string)
                .collect();
            classify_status(source.status_code.as_u16(), source.message.clone(), &codes, target)
        }
        other => Error::Api(other),
    }
}

/// Map a non-2xx status onto the domain error for `target`
pub(crate) fn classify_status(
    status: u16,
    message: String,
    error_codes: &[String],
    target: Target<'_>,
) -> Error {
    match status {
        401 => Error::Auth(if message.is_empty() {
            "Bad credentials".to_string()
        } else {
            message
        }),
        404 => match target {
            Target::CurrentUser => Error::Auth("Cannot look up the authenticated user".to_string()),
            Target::Scope(scope) => Error::ScopeNotFound(scope.to_string()),
            Target::Repository(repo) | Target::NewMilestone { repository: repo, .. } => {
                Error::RepositoryNotFound(repo.to_string())
            }
            Target::Milestone { repository, number } => Error::MilestoneNumberNotFound {
                number,
                repository: repository.to_string(),
            },
        },
        422 => match target {
            Target::NewMilestone { repository, title }
                if error_codes.first().map(String::as_str) == Some("already_exists") =>
            {
                Error::MilestoneExists {
                    title: title.to_string(),
                    repository: repository.to_string(),
                }
            }
            _ if error_codes.is_empty() => Error::ValidationFailed(message),
            _ => Error::ValidationFailed(format!("{} ({})", message, error_codes.join(", "))),
        },
        status => Error::Remote { status, message },
    }
}

/// Check the status of a DELETE, which must answer 204
pub(crate) fn delete_status(status: u16, route: &str, target: Target<'_>) -> Result<()> {
    match status {
        204 => Ok(()),
        404 => Err(classify_status(404, String::new(), &[], target)),
        401 => Err(classify_status(401, "Bad credentials".to_string(), &[], target)),
        status => Err(Error::ProtocolViolation(format!(
            "expected status 204 from DELETE {}, got {}",
            route, status
        ))),
    }
}
