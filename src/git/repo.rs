use git2::Repository;
use std::path::Path;

use crate::error::{ForkitError, Result};

/// A directory is a repository root when the git metadata lives directly
/// in it. Cheap enough to probe on every step of a walk.
pub fn is_repo_root(path: &Path) -> bool {
    path.join(".git").exists()
}

pub fn open_repo(path: &Path) -> Result<Repository> {
    Ok(Repository::open(path)?)
}

/// Fatal precondition for cloning: `path` and its ancestors must not
/// already be a working copy.
pub fn ensure_not_in_repo(path: &Path) -> Result<()> {
    if Repository::discover(path).is_ok() {
        return Err(ForkitError::TargetIsRepo(path.to_path_buf()));
    }
    Ok(())
}

pub fn clone_repo(url: &str, dest: &Path) -> Result<Repository> {
    Ok(Repository::clone(url, dest)?)
}

pub fn remote_url(repo: &Repository, name: &str) -> Option<String> {
    repo.find_remote(name)
        .ok()
        .and_then(|remote| remote.url().map(String::from))
}

/// Point `origin` at `url`, creating the remote if it does not exist yet.
pub fn set_origin(repo: &Repository, url: &str) -> Result<()> {
    if repo.find_remote("origin").is_ok() {
        repo.remote_set_url("origin", url)?;
    } else {
        repo.remote("origin", url)?;
    }
    Ok(())
}

pub fn create_remote(repo: &Repository, name: &str, url: &str) -> Result<()> {
    repo.remote(name, url)?;
    Ok(())
}

pub fn repo_name(repo: &Repository) -> String {
    repo.workdir()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_repo;
    use tempfile::tempdir;

    #[test]
    fn repo_root_probe() {
        let dir = tempdir().unwrap();
        assert!(!is_repo_root(dir.path()));
        init_repo(dir.path());
        assert!(is_repo_root(dir.path()));
    }

    #[test]
    fn clone_target_precondition() {
        let dir = tempdir().unwrap();
        assert!(ensure_not_in_repo(dir.path()).is_ok());

        init_repo(dir.path());
        assert!(matches!(
            ensure_not_in_repo(dir.path()),
            Err(ForkitError::TargetIsRepo(_))
        ));

        // a subdirectory of a working copy is just as fatal
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        assert!(ensure_not_in_repo(&nested).is_err());
    }

    #[test]
    fn set_origin_creates_then_repoints() {
        let dir = tempdir().unwrap();
        let repo = init_repo(dir.path());

        assert!(remote_url(&repo, "origin").is_none());
        set_origin(&repo, "git://github.com/me/thing.git").unwrap();
        assert_eq!(
            remote_url(&repo, "origin").as_deref(),
            Some("git://github.com/me/thing.git")
        );

        set_origin(&repo, "https://github.com/me/thing.git").unwrap();
        assert_eq!(
            remote_url(&repo, "origin").as_deref(),
            Some("https://github.com/me/thing.git")
        );
    }

    #[test]
    fn create_remote_sets_url() {
        let dir = tempdir().unwrap();
        let repo = init_repo(dir.path());

        create_remote(&repo, "upstream", "git://github.com/them/thing.git").unwrap();
        assert_eq!(
            remote_url(&repo, "upstream").as_deref(),
            Some("git://github.com/them/thing.git")
        );
    }

    #[test]
    fn repo_name_uses_workdir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("widget");
        std::fs::create_dir(&path).unwrap();
        let repo = init_repo(&path);
        assert_eq!(repo_name(&repo), "widget");
    }
}
