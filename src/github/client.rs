use itertools::Itertools;
use octocrab::Octocrab;
use tokio::time::{sleep, Duration};
use tracing::debug;

use crate::error::{ForkitError, Result};
use crate::github::types::{Lookup, RemoteRepo, RepoId};

const SEARCH_PAGE_SIZE: u8 = 100;
const FORK_POLL_MAX_WAIT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct GitHubClient {
    octo: Octocrab,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self> {
        let octo = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| ForkitError::GitHub(e.to_string()))?;
        Ok(Self { octo })
    }

    /// Login of the account the token authenticates as.
    pub async fn current_login(&self) -> Result<String> {
        let user = self
            .octo
            .current()
            .user()
            .await
            .map_err(|e| ForkitError::GitHub(e.to_string()))?;
        Ok(user.login)
    }

    /// Search repositories by keyword, most recently updated first.
    /// Keywords are space-joined into a single query; `user` narrows the
    /// search to one account. Stops collecting at `max` when set.
    pub async fn search_repos(
        &self,
        keywords: &[String],
        user: Option<&str>,
        max: Option<usize>,
    ) -> Result<Vec<RemoteRepo>> {
        let mut query = keywords.iter().join(" ");
        if let Some(user) = user {
            query.push_str(&format!(" user:{user}"));
        }
        debug!("searching repositories: {query:?}");

        let mut repos = Vec::new();
        let mut page = 1u32;

        loop {
            let result = self
                .octo
                .search()
                .repositories(&query)
                .sort("updated")
                .order("desc")
                .per_page(SEARCH_PAGE_SIZE)
                .page(page)
                .send()
                .await
                .map_err(|e| ForkitError::GitHub(e.to_string()))?;

            if result.items.is_empty() {
                break;
            }

            for item in &result.items {
                repos.push(RemoteRepo::from_api(item));
                if max.is_some_and(|m| repos.len() >= m) {
                    break;
                }
            }

            if max.is_some_and(|m| repos.len() >= m) || result.next.is_none() {
                break;
            }
            page += 1;
        }

        Ok(repos)
    }

    /// Look a repository up by identity. A 404 is an ordinary negative
    /// result; anything else propagates.
    pub async fn lookup(&self, id: &RepoId) -> Result<Lookup> {
        match self.octo.repos(&id.owner, &id.name).get().await {
            Ok(repo) => Ok(Lookup::Found(RemoteRepo::from_api(&repo))),
            Err(e) if is_not_found(&e) => Ok(Lookup::NotFound),
            Err(e) => Err(ForkitError::GitHub(e.to_string())),
        }
    }

    /// Fork `id` into the acting account.
    pub async fn create_fork(&self, id: &RepoId) -> Result<RemoteRepo> {
        let repo = self
            .octo
            .repos(&id.owner, &id.name)
            .create_fork()
            .send()
            .await
            .map_err(|e| ForkitError::GitHub(e.to_string()))?;
        Ok(RemoteRepo::from_api(&repo))
    }

    /// Fork creation is asynchronous on the platform side. Poll until the
    /// fork is visible, doubling the delay each round up to a hard cap.
    /// Returns false on timeout; the caller decides how loudly to complain.
    pub async fn wait_fork_ready(&self, id: &RepoId) -> Result<bool> {
        let mut delay = Duration::from_secs(1);
        let mut waited = Duration::ZERO;

        loop {
            if let Lookup::Found(_) = self.lookup(id).await? {
                return Ok(true);
            }
            if waited >= FORK_POLL_MAX_WAIT {
                return Ok(false);
            }
            debug!("fork {id} not visible yet; waiting {}s", delay.as_secs());
            sleep(delay).await;
            waited += delay;
            delay *= 2;
        }
    }
}

fn is_not_found(err: &octocrab::Error) -> bool {
    matches!(err, octocrab::Error::GitHub { source, .. } if source.status_code == 404)
}
