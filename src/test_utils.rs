#![cfg(test)]

use git2::Repository;
use std::path::Path;

use crate::github::types::{RemoteRepo, RepoId};

pub fn init_repo(path: &Path) -> Repository {
    Repository::init(path).unwrap()
}

/// Repository with a single empty commit, enough to be cloned from.
pub fn init_committed_repo(path: &Path) -> Repository {
    let repo = Repository::init(path).unwrap();
    {
        let sig = git2::Signature::now("test", "test@example.com").unwrap();
        let tree_id = {
            let mut index = repo.index().unwrap();
            index.write_tree().unwrap()
        };
        let tree = repo.find_tree(tree_id).unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
            .unwrap();
    }
    repo
}

pub fn make_remote(owner: &str, name: &str) -> RemoteRepo {
    RemoteRepo {
        id: RepoId::new(owner, name),
        clone_url: format!("https://github.com/{owner}/{name}.git"),
        fetch_url: format!("git://github.com/{owner}/{name}.git"),
        is_fork: false,
        parent: None,
        updated_at: None,
    }
}

pub fn make_fork(owner: &str, name: &str, parent: RemoteRepo) -> RemoteRepo {
    let mut fork = make_remote(owner, name);
    fork.is_fork = true;
    fork.parent = Some(Box::new(parent));
    fork
}
