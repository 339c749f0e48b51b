//! Sequencing for the search -> fork -> clone -> upstream pipeline and the
//! origin-repair walk. Every step takes an ordered sequence; single-item
//! callers wrap the item before calling.

use git2::Repository;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::Options;
use crate::error::Result;
use crate::git::repo;
use crate::git::url::parse_remote_url;
use crate::github::client::GitHubClient;
use crate::github::types::{Lookup, RemoteRepo, RepoId};
use crate::locals::{find_repo_roots, LocalNameIndex};

/// Search matching the platform's sort order (most recently updated
/// first), capped at `opts.max`. Verbose and dry-run modes list every
/// candidate's clone URL.
pub async fn search(
    client: &GitHubClient,
    keywords: &[String],
    opts: &Options,
) -> Result<Vec<RemoteRepo>> {
    let repos = client
        .search_repos(keywords, opts.user.as_deref(), opts.max)
        .await?;

    info!(
        "found {} matching repositor{}",
        repos.len(),
        if repos.len() == 1 { "y" } else { "ies" }
    );
    if opts.verbose || opts.dry_run {
        for repo in &repos {
            let updated = repo
                .updated_at
                .map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339());
            info!("{} (updated {updated})", repo.clone_url);
        }
        if let Some(first) = repos.first() {
            info!("first match: {}", first.clone_url);
        }
    }

    Ok(repos)
}

/// Fork-exists predicate: the acting account owns a same-named repository
/// whose parent is the source repository.
fn is_fork_of(candidate: &RemoteRepo, source: &RepoId) -> bool {
    candidate.parent.as_ref().is_some_and(|p| p.id == *source)
}

/// Fork every repository that is not already forked into the acting
/// account. Existing forks are included in the output only when
/// `include_forked` is set. Output order follows input order.
pub async fn fork_repos(
    client: &GitHubClient,
    repos: &[RemoteRepo],
    opts: &Options,
) -> Result<Vec<RemoteRepo>> {
    let me = client.current_login().await?;
    let mut forks = Vec::new();

    for source in repos {
        let candidate = RepoId::new(me.clone(), source.id.name.clone());
        match client.lookup(&candidate).await? {
            Lookup::Found(existing) if is_fork_of(&existing, &source.id) => {
                if opts.include_forked {
                    info!("fork {} already exists; including it", existing.id);
                    forks.push(existing);
                } else {
                    info!("fork {} already exists; skipping", existing.id);
                }
                continue;
            }
            Lookup::Found(existing) if existing.is_fork => {
                debug!("{candidate} exists but forks something other than {}", source.id);
            }
            Lookup::Found(_) => {
                debug!("{candidate} exists and is not a fork");
            }
            Lookup::NotFound => {}
        }

        if opts.dry_run {
            info!("dry-run: would fork {}", source.clone_url);
            continue;
        }

        info!("forking {}", source.clone_url);
        let fork = client.create_fork(&source.id).await?;
        if !client.wait_fork_ready(&fork.id).await? {
            warn!("no confirmation that fork {} is ready; continuing", fork.id);
        }
        forks.push(fork);
    }

    Ok(forks)
}

/// Clone each repository under `opts.clone_dir`, consulting the local name
/// index first so a same-named clone anywhere under the tracked tree is
/// never duplicated. Origin always ends up on the canonical clone URL.
pub fn clone_repos(
    repos: &[RemoteRepo],
    index: &LocalNameIndex,
    opts: &Options,
) -> Result<Vec<Repository>> {
    repo::ensure_not_in_repo(&opts.clone_dir)?;

    let mut cloned = Vec::new();
    for remote in repos {
        let name = &remote.id.name;
        let dest = opts.clone_dir.join(name);

        if index.contains(name) {
            info!(
                "{name} already cloned under {}; skipping",
                opts.clone_dir.display()
            );
            continue;
        }

        if repo::is_repo_root(&dest) {
            debug!("{} already exists; checking its origin", dest.display());
            let local = repo::open_repo(&dest)?;
            repair_origin(&local, &remote.clone_url, opts.dry_run)?;
            if !opts.dry_run {
                cloned.push(local);
            }
            continue;
        }

        if opts.dry_run {
            info!(
                "dry-run: would clone {} into {}",
                remote.fetch_url,
                dest.display()
            );
            continue;
        }

        info!("cloning {} into {}", remote.fetch_url, dest.display());
        let local = repo::clone_repo(&remote.fetch_url, &dest)?;
        // A raw clone leaves origin on the bare fetch URL.
        repo::set_origin(&local, &remote.clone_url)?;
        cloned.push(local);
    }

    Ok(cloned)
}

/// Create or repoint `origin` so it matches the canonical clone URL.
fn repair_origin(local: &Repository, canonical: &str, dry_run: bool) -> Result<()> {
    match repo::remote_url(local, "origin") {
        Some(current) if current == canonical => Ok(()),
        current => {
            if dry_run {
                info!("dry-run: would point origin at {canonical} (was {current:?})");
                return Ok(());
            }
            repo::set_origin(local, canonical)
        }
    }
}

/// For each cloned repository, resolve its origin's parent and make sure
/// an `upstream` remote points at it. Repositories whose origin is not a
/// fork are skipped. Returns the upstream URL per linked repository.
pub async fn add_upstreams(
    client: &GitHubClient,
    locals: &[Repository],
    opts: &Options,
) -> Result<Vec<String>> {
    let mut upstreams = Vec::new();

    for local in locals {
        let name = repo::repo_name(local);
        let Some(origin) = repo::remote_url(local, "origin") else {
            warn!("{name} has no origin remote; skipping");
            continue;
        };
        debug!("resolving {origin}");

        let id = parse_remote_url(&origin)?;
        let remote = match client.lookup(&id).await? {
            Lookup::Found(remote) => remote,
            Lookup::NotFound => {
                warn!("{id} not found on the platform; skipping {name}");
                continue;
            }
        };

        let Some(parent) = remote.parent.as_deref() else {
            info!("{} has no upstream parent; skipping", remote.id);
            continue;
        };

        if let Some(existing) = repo::remote_url(local, "upstream") {
            info!("{name} already has upstream {existing}");
            upstreams.push(existing);
            continue;
        }

        if opts.dry_run {
            info!("dry-run: would add upstream {} to {name}", parent.fetch_url);
            continue;
        }

        info!("adding upstream {} to {name}", parent.fetch_url);
        repo::create_remote(local, "upstream", &parent.fetch_url)?;
        upstreams.push(parent.fetch_url.clone());
    }

    Ok(upstreams)
}

/// Walk `root` top-down and repoint every repository's origin to its
/// canonical clone URL. Repository subtrees are pruned: the first root
/// found on a path is the one processed.
pub async fn fix_origins(client: &GitHubClient, root: &Path, dry_run: bool) -> Result<()> {
    for path in find_repo_roots(root) {
        let local = repo::open_repo(&path)?;

        let Some(origin) = repo::remote_url(&local, "origin") else {
            info!("{} has no origin remote; skipping", path.display());
            continue;
        };

        let id = match parse_remote_url(&origin) {
            Ok(id) => id,
            Err(e) => {
                warn!("{}: {e}; skipping", path.display());
                continue;
            }
        };

        let canonical = match client.lookup(&id).await? {
            Lookup::Found(remote) => remote.clone_url,
            Lookup::NotFound => {
                warn!("{id} not found on the platform; skipping {}", path.display());
                continue;
            }
        };

        if origin == canonical {
            debug!("{} origin already canonical", path.display());
            continue;
        }
        if dry_run {
            info!(
                "dry-run: would point {} origin at {canonical} (was {origin})",
                path.display()
            );
            continue;
        }
        info!("pointing {} origin at {canonical}", path.display());
        repo::set_origin(&local, &canonical)?;
    }

    Ok(())
}
