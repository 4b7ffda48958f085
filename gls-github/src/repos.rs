//! Repository ownership filtering

use tracing::debug;

use crate::{Repository, Scope};

/// Keep only repositories owned directly by `scope`
///
/// Listings also surface repositories reachable through team access or
/// collaboration; those are dropped. Owner type and login must both match
/// exactly. Forks owned by the scope are kept.
pub fn filter_owned(repos: Vec<Repository>, scope: &Scope) -> Vec<Repository> {
    repos
        .into_iter()
        .filter(|repo| {
            let owned = scope.owns(&repo.owner);
            if !owned {
                debug!(repo = %repo.name, owner = %repo.owner.login, "Skipping repository not owned by scope");
            }
            owned
        })
        .collect()
}
