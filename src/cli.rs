use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_TOKEN_FILE;

#[derive(Parser, Debug)]
#[command(
    name = "forkit",
    version,
    about = "Search, bulk-fork, clone, and remote-fix GitHub repositories"
)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search repositories by keyword, then fork, clone, and link them
    Sync {
        #[command(flatten)]
        auth: AuthArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Limit to the first MAX matching repositories
        #[arg(short = 'n', long = "max", value_name = "MAX")]
        max: Option<usize>,

        /// Only match repositories owned by USER
        #[arg(long, value_name = "USER")]
        user: Option<String>,

        /// Keywords to search for, joined into a single query
        #[arg(required = true)]
        keywords: Vec<String>,
    },

    /// Run the fork/clone/link pipeline for one repository
    One {
        #[command(flatten)]
        auth: AuthArgs,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Repository in owner/name form
        repo: String,
    },

    /// Repoint every repository under DIR to its canonical clone URL
    FixOrigin {
        #[command(flatten)]
        auth: AuthArgs,

        /// Log intended changes without making them
        #[arg(long, alias = "test")]
        dry_run: bool,

        /// Root directory to search for repositories
        dir: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct AuthArgs {
    /// Access token; takes precedence over the token file
    #[arg(short = 't', long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// File whose first line is the access token
    #[arg(short = 'f', long, value_name = "FILE", default_value = DEFAULT_TOKEN_FILE)]
    pub token_file: PathBuf,
}

#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Fork matching repositories
    #[arg(long)]
    pub fork: bool,

    /// Clone matching forks, if they exist
    #[arg(long)]
    pub clone: bool,

    /// Add an upstream remote to cloned repositories
    #[arg(long)]
    pub upstream: bool,

    /// Also clone and link forks that already existed
    #[arg(long)]
    pub include_forked: bool,

    /// Run every check but perform no mutations
    #[arg(long, alias = "test")]
    pub dry_run: bool,

    /// Directory to clone repositories into [default: .]
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// File caching the names of repositories already cloned
    /// [default: .localrepos]
    #[arg(long, value_name = "FILE")]
    pub locals_file: Option<PathBuf>,
}
