//! Names of repositories already present under a root directory, used to
//! avoid duplicate clones.

use itertools::Itertools;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::Result;
use crate::git::repo::is_repo_root;

pub struct LocalNameIndex {
    names: HashSet<String>,
}

impl LocalNameIndex {
    /// Read a cached name list. `None` when the cache file does not exist.
    /// The index is read-only for the rest of the run either way.
    pub fn load(cache: &Path) -> Result<Option<Self>> {
        if !cache.exists() {
            return Ok(None);
        }
        let names = fs::read_to_string(cache)?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        debug!("loaded local repository names from {}", cache.display());
        Ok(Some(Self { names }))
    }

    pub fn build(root: &Path) -> Self {
        let names = find_repo_roots(root)
            .into_iter()
            .filter_map(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().to_string())
            })
            .collect();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// One name per line, sorted so the file diffs cleanly.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut lines = self.names.iter().sorted().join("\n");
        if !lines.is_empty() {
            lines.push('\n');
        }
        fs::write(path, lines)?;
        Ok(())
    }
}

/// Top-down walk that stops at the first repository root on each path:
/// a repository's subtree is never descended into.
pub fn find_repo_roots(root: &Path) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    let mut walker = WalkDir::new(root).into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("skipping unreadable path: {e}");
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        if is_repo_root(entry.path()) {
            roots.push(entry.path().to_path_buf());
            walker.skip_current_dir();
        }
    }

    roots
}
