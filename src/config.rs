use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::PipelineArgs;
use crate::error::{ForkitError, Result};

pub const DEFAULT_TOKEN_FILE: &str = ".oauth";
pub const DEFAULT_LOCALS_FILE: &str = ".localrepos";

/// Durable settings: config file and environment, merged under any CLI
/// flags. The token is the last-resort credential source (see
/// [`resolve_token`]).
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    pub github_token: Option<String>,
    pub clone_dir: PathBuf,
    pub locals_file: PathBuf,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("github_token", &self.github_token.as_ref().map(|_| "[REDACTED]"))
            .field("clone_dir", &self.clone_dir)
            .field("locals_file", &self.locals_file)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            clone_dir: PathBuf::from("."),
            locals_file: PathBuf::from(DEFAULT_LOCALS_FILE),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_file = config_dir().join("forkit").join("config.toml");

        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if config_file.exists() {
            figment = figment.merge(Toml::file(&config_file));
        }

        figment = figment.merge(Env::prefixed("FORKIT_")).merge(
            Env::raw()
                .only(&["GITHUB_TOKEN"])
                .map(|_| "github_token".into()),
        );

        match figment.extract() {
            Ok(config) => config,
            Err(e) => {
                eprintln!("warning: config parse error, using defaults: {e}");
                Config::default()
            }
        }
    }
}

/// Resolve the access credential. An explicit literal wins, then the first
/// line of the token file, then whatever the layered config produced.
/// Nothing non-empty is fatal, and the message names what was tried.
pub fn resolve_token(literal: Option<&str>, token_file: &Path, config: &Config) -> Result<String> {
    if let Some(token) = literal {
        let token = token.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    if token_file.exists() {
        let first_line = fs::read_to_string(token_file)?
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        if !first_line.is_empty() {
            return Ok(first_line);
        }
    }

    if let Some(token) = &config.github_token {
        let token = token.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    Err(ForkitError::MissingToken(format!(
        "no -t token given, {} missing or empty, GITHUB_TOKEN unset",
        token_file.display()
    )))
}

/// Immutable per-run options handed to every pipeline component.
#[derive(Clone, Debug)]
pub struct Options {
    pub verbose: bool,
    pub dry_run: bool,
    pub fork: bool,
    pub clone: bool,
    pub upstream: bool,
    pub include_forked: bool,
    pub max: Option<usize>,
    pub user: Option<String>,
    pub clone_dir: PathBuf,
    pub locals_file: PathBuf,
}

impl Options {
    pub fn new(
        verbose: bool,
        pipeline: &PipelineArgs,
        max: Option<usize>,
        user: Option<String>,
        config: &Config,
    ) -> Self {
        Self {
            verbose,
            dry_run: pipeline.dry_run,
            fork: pipeline.fork,
            clone: pipeline.clone,
            upstream: pipeline.upstream,
            include_forked: pipeline.include_forked,
            max,
            user,
            clone_dir: pipeline
                .dir
                .clone()
                .unwrap_or_else(|| config.clone_dir.clone()),
            locals_file: pipeline
                .locals_file
                .clone()
                .unwrap_or_else(|| config.locals_file.clone()),
        }
    }
}

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".config"))
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[test]
    fn literal_token_wins() {
        let dir = tempdir().unwrap();
        let file = dir.path().join(DEFAULT_TOKEN_FILE);
        fs::write(&file, "from-file\n").unwrap();

        let token = resolve_token(Some("from-flag"), &file, &Config::default()).unwrap();
        assert_eq!(token, "from-flag");
    }

    #[test]
    fn token_file_first_line_trimmed() {
        let dir = tempdir().unwrap();
        let file = dir.path().join(DEFAULT_TOKEN_FILE);
        fs::write(&file, "  from-file  \nsecond line ignored\n").unwrap();

        let token = resolve_token(None, &file, &Config::default()).unwrap();
        assert_eq!(token, "from-file");
    }

    #[test]
    fn config_token_is_last_resort() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join(DEFAULT_TOKEN_FILE);
        let config = Config {
            github_token: Some("from-env".to_string()),
            ..Config::default()
        };

        let token = resolve_token(None, &missing, &config).unwrap();
        assert_eq!(token, "from-env");
    }

    #[test]
    fn no_source_is_fatal_and_names_the_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join(DEFAULT_TOKEN_FILE);

        let err = resolve_token(None, &missing, &Config::default()).unwrap_err();
        assert!(err.to_string().contains(".oauth"));
    }

    #[test]
    fn empty_token_file_falls_through() {
        let dir = tempdir().unwrap();
        let file = dir.path().join(DEFAULT_TOKEN_FILE);
        fs::write(&file, "\n\n").unwrap();

        assert!(resolve_token(None, &file, &Config::default()).is_err());
    }

    #[test]
    #[serial]
    fn env_token_reaches_config() {
        std::env::set_var("GITHUB_TOKEN", "env-token");
        let config = Config::load();
        std::env::remove_var("GITHUB_TOKEN");
        assert_eq!(config.github_token.as_deref(), Some("env-token"));
    }

    #[test]
    #[serial]
    fn debug_output_redacts_token() {
        let config = Config {
            github_token: Some("sekret".to_string()),
            ..Config::default()
        };
        assert!(!format!("{config:?}").contains("sekret"));
    }
}
