use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForkitError {
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("github error: {0}")]
    GitHub(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no access token: {0}")]
    MissingToken(String),

    #[error("{} is already inside a git repository; refusing to clone into it", .0.display())]
    TargetIsRepo(PathBuf),

    #[error("cannot parse owner/name from remote url: {0}")]
    BadRemoteUrl(String),
}

pub type Result<T> = std::result::Result<T, ForkitError>;
