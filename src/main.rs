mod cli;
mod config;
mod error;
mod git;
mod github;
mod locals;
#[cfg(test)]
mod test_utils;
mod workflow;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{AuthArgs, Cli, Commands};
use config::{Config, Options};
use error::{ForkitError, Result};
use github::client::GitHubClient;
use github::types::{Lookup, RemoteRepo, RepoId};
use locals::LocalNameIndex;

// git2 types are !Send, so everything runs on the current thread.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load();

    match cli.command {
        Commands::Sync {
            auth,
            pipeline,
            max,
            user,
            keywords,
        } => {
            let client = authenticate(&auth, &config)?;
            let opts = Options::new(cli.verbose, &pipeline, max, user, &config);
            let repos = workflow::search(&client, &keywords, &opts).await?;
            run_pipeline(&client, repos, &opts).await
        }
        Commands::One {
            auth,
            pipeline,
            repo,
        } => {
            let client = authenticate(&auth, &config)?;
            let opts = Options::new(cli.verbose, &pipeline, None, None, &config);
            let id: RepoId = repo.parse()?;
            let repos = match client.lookup(&id).await? {
                Lookup::Found(repo) => vec![repo],
                Lookup::NotFound => {
                    return Err(ForkitError::GitHub(format!("{id} not found")));
                }
            };
            run_pipeline(&client, repos, &opts).await
        }
        Commands::FixOrigin { auth, dry_run, dir } => {
            let client = authenticate(&auth, &config)?;
            workflow::fix_origins(&client, &dir, dry_run).await
        }
    }
}

fn authenticate(auth: &AuthArgs, config: &Config) -> Result<GitHubClient> {
    let token = config::resolve_token(auth.token.as_deref(), &auth.token_file, config)?;
    GitHubClient::new(&token)
}

/// The fork -> clone -> upstream sequence, each stage gated by its flag
/// and consuming the previous stage's output.
async fn run_pipeline(
    client: &GitHubClient,
    repos: Vec<RemoteRepo>,
    opts: &Options,
) -> Result<()> {
    let forks = if opts.fork {
        workflow::fork_repos(client, &repos, opts).await?
    } else {
        Vec::new()
    };

    let locals = if opts.clone {
        let index = match LocalNameIndex::load(&opts.locals_file)? {
            Some(index) => index,
            None => {
                let index = LocalNameIndex::build(&opts.clone_dir);
                debug!(
                    "indexed {} local repositor{} under {}",
                    index.len(),
                    if index.len() == 1 { "y" } else { "ies" },
                    opts.clone_dir.display()
                );
                if !opts.dry_run {
                    index.save(&opts.locals_file)?;
                }
                index
            }
        };
        workflow::clone_repos(&forks, &index, opts)?
    } else {
        Vec::new()
    };

    if opts.upstream {
        workflow::add_upstreams(client, &locals, opts).await?;
    }

    Ok(())
}
