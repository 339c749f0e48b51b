use chrono::{DateTime, Utc};
use octocrab::models::Repository;
use std::fmt;
use std::str::FromStr;

use crate::error::ForkitError;

/// Platform-side repository identity in `owner/name` form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoId {
    type Err = ForkitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s
            .split_once('/')
            .ok_or_else(|| ForkitError::Config(format!("expected owner/name, got {s:?}")))?;
        if owner.is_empty() || name.is_empty() {
            return Err(ForkitError::Config(format!("expected owner/name, got {s:?}")));
        }
        Ok(Self::new(owner, name))
    }
}

/// What the platform reports about a repository. `parent` is only present
/// when the repository is a fork.
#[derive(Clone, Debug)]
pub struct RemoteRepo {
    pub id: RepoId,
    /// Canonical https clone URL; the form origin remotes must end up on.
    pub clone_url: String,
    /// Bare git-protocol fetch URL.
    pub fetch_url: String,
    pub is_fork: bool,
    pub parent: Option<Box<RemoteRepo>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteRepo {
    pub fn from_api(repo: &Repository) -> Self {
        let owner = repo
            .owner
            .as_ref()
            .map(|o| o.login.clone())
            .unwrap_or_default();
        let name = repo.name.clone();
        let clone_url = repo
            .clone_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("https://github.com/{owner}/{name}.git"));
        let fetch_url = repo
            .git_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("git://github.com/{owner}/{name}.git"));

        Self {
            id: RepoId::new(owner, name),
            clone_url,
            fetch_url,
            is_fork: repo.fork.unwrap_or(false),
            parent: repo
                .parent
                .as_deref()
                .map(|p| Box::new(Self::from_api(p))),
            updated_at: repo.updated_at,
        }
    }
}

/// Result of a platform lookup. Absence is a value, not an error.
#[derive(Clone, Debug)]
pub enum Lookup {
    Found(RemoteRepo),
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_id_display() {
        assert_eq!(RepoId::new("climatebrad", "forkit").to_string(), "climatebrad/forkit");
    }

    #[test]
    fn parse_repo_id() {
        let id: RepoId = "climatebrad/forkit".parse().unwrap();
        assert_eq!(id, RepoId::new("climatebrad", "forkit"));
    }

    #[test]
    fn parse_repo_id_rejects_bad_forms() {
        assert!("forkit".parse::<RepoId>().is_err());
        assert!("climatebrad/".parse::<RepoId>().is_err());
        assert!("/forkit".parse::<RepoId>().is_err());
    }

    #[test]
    fn parse_repo_id_keeps_extra_separators_in_name() {
        let id: RepoId = "owner/a/b".parse().unwrap();
        assert_eq!(id.owner, "owner");
        assert_eq!(id.name, "a/b");
    }
}
