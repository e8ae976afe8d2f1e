use crate::core::PullRequestState;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State as reported by `gh pr list --json state`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GhState {
    Open,
    Closed,
    Merged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GhPullRequest {
    pub number: u64,
    pub state: GhState,
}

impl From<GhState> for PullRequestState {
    fn from(state: GhState) -> Self {
        match state {
            GhState::Open => PullRequestState::Open,
            GhState::Closed | GhState::Merged => PullRequestState::Closed,
        }
    }
}

/// `owner/name` of a repository hosted on GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubRepo {
    pub owner: String,
    pub name: String,
}

impl GitHubRepo {
    /// Extract the repository from a remote url
    ///
    /// Understands the scp-like ssh form, `ssh://` and `https://` urls,
    /// with or without the `.git` suffix.
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let re = Regex::new(concat!(
            r"^(?:git@github\.com:|ssh://git@github\.com/|https://(?:[^@/]+@)?github\.com/)",
            r"(?P<owner>[\w.-]+)/(?P<name>[\w.-]+?)(?:\.git)?/?$",
        ))
        .ok()?;
        let caps = re.captures(url.trim())?;
        let owner = caps.name("owner")?.as_str().to_string();
        let name = caps.name("name")?.as_str().to_string();
        Some(Self { owner, name })
    }
}

impl fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
