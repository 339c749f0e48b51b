use crate::error::{ForkitError, Result};
use crate::github::types::RepoId;

/// Extract owner/name from the remote URL forms GitHub hands out:
/// `https://github.com/o/r.git`, `git://github.com/o/r.git`,
/// `git@github.com:o/r.git`, and `ssh://git@github.com/o/r.git`.
pub fn parse_remote_url(url: &str) -> Result<RepoId> {
    let stripped = url.trim().trim_end_matches('/').trim_end_matches(".git");

    let path = if let Some(rest) = stripped.strip_prefix("git@") {
        // scp-like form: everything after the colon is the path
        rest.split_once(':').map(|(_, path)| path)
    } else if let Some(idx) = stripped.find("://") {
        stripped[idx + 3..].split_once('/').map(|(_, path)| path)
    } else {
        None
    };

    let path = path.ok_or_else(|| ForkitError::BadRemoteUrl(url.to_string()))?;
    let mut segments = path.rsplitn(2, '/');
    let name = segments.next().unwrap_or_default();
    let owner = segments
        .next()
        .unwrap_or_default()
        .rsplit('/')
        .next()
        .unwrap_or_default();

    if owner.is_empty() || name.is_empty() {
        return Err(ForkitError::BadRemoteUrl(url.to_string()));
    }
    Ok(RepoId::new(owner, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_https_url() {
        let id = parse_remote_url("https://github.com/climatebrad/forkit.git").unwrap();
        assert_eq!(id, RepoId::new("climatebrad", "forkit"));
    }

    #[test]
    fn parses_https_url_without_suffix() {
        let id = parse_remote_url("https://github.com/climatebrad/forkit").unwrap();
        assert_eq!(id, RepoId::new("climatebrad", "forkit"));
    }

    #[test]
    fn parses_git_protocol_url() {
        let id = parse_remote_url("git://github.com/climatebrad/forkit.git").unwrap();
        assert_eq!(id, RepoId::new("climatebrad", "forkit"));
    }

    #[test]
    fn parses_scp_like_url() {
        let id = parse_remote_url("git@github.com:climatebrad/forkit.git").unwrap();
        assert_eq!(id, RepoId::new("climatebrad", "forkit"));
    }

    #[test]
    fn parses_ssh_url() {
        let id = parse_remote_url("ssh://git@github.com/climatebrad/forkit.git").unwrap();
        assert_eq!(id, RepoId::new("climatebrad", "forkit"));
    }

    #[test]
    fn parses_trailing_slash() {
        let id = parse_remote_url("https://github.com/climatebrad/forkit/").unwrap();
        assert_eq!(id, RepoId::new("climatebrad", "forkit"));
    }

    #[test]
    fn rejects_urls_without_owner() {
        assert!(parse_remote_url("https://github.com/forkit").is_err());
        assert!(parse_remote_url("not a url").is_err());
        assert!(parse_remote_url("").is_err());
    }
}
