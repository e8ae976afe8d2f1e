use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Git operation failed: {0}")]
    Git(String),

    #[error("GitHub CLI operation failed: {0}")]
    GitHubCli(String),

    #[error("GitHub CLI not found")]
    GitHubCliNotFound,

    #[error("GitHub authentication failed: {0}")]
    Authentication(String),

    #[error("GitHub rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Cannot delete branch '{branch}': {reason}")]
    Delete { branch: String, reason: String },

    #[error("Branch name is not utf-8: {0}")]
    BranchNameNotUtf8(String),

    #[error("Too many pull requests for '{branch}': the list may be cut at {limit}")]
    TooManyPullRequests { branch: String, limit: usize },

    #[error("Remote '{0}' not found")]
    RemoteNotFound(String),

    #[error("Wrong number of remotes: expected 1, have {0}")]
    WrongRemoteCount(usize),

    #[error("Remote url is not a GitHub repository: {0}")]
    RemoteUrlNotGithub(String),

    #[error("Cannot determine the default branch")]
    DefaultBranchUnknown,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SweepError {
    /// Errors after which no pushed branch can be classified
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SweepError::Authentication(_) | SweepError::GitHubCliNotFound
        )
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_auth_and_missing_cli_are_fatal() {
        assert!(SweepError::Authentication("bad token".to_string()).is_fatal());
        assert!(SweepError::GitHubCliNotFound.is_fatal());

        assert!(!SweepError::RateLimit("slow down".to_string()).is_fatal());
        assert!(!SweepError::Network("timeout".to_string()).is_fatal());
        assert!(!SweepError::GitHubCli("boom".to_string()).is_fatal());
        assert!(!SweepError::Delete {
            branch: "feature/w".to_string(),
            reason: "gone".to_string(),
        }
        .is_fatal());
    }

    #[test]
    fn test_delete_error_message_names_branch() {
        let err = SweepError::Delete {
            branch: "feature/w".to_string(),
            reason: "cannot delete branch checked out".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot delete branch 'feature/w': cannot delete branch checked out"
        );
    }
}
