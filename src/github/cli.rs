use crate::core::PullRequestState;
use crate::errors::{Result, SweepError};
use crate::github::types::{GhPullRequest, GitHubRepo};
use std::process::Command;

/// Upper bound of pull requests `gh` returns for a single branch
pub const PR_LIMIT: usize = 1000;

pub trait GitHubCli {
    fn is_available(&self) -> Result<bool>;
    fn pull_requests_for_branch(&self, branch_name: &str) -> Result<Vec<PullRequestState>>;
}

pub struct GitHubCliImpl {
    repo: GitHubRepo,
    token: Option<String>,
}

impl GitHubCliImpl {
    pub fn new(repo: GitHubRepo) -> Self {
        Self { repo, token: None }
    }

    /// Token handed to `gh` through `GH_TOKEN`, only for the child process
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn run_command(&self, args: &[&str]) -> Result<std::process::Output> {
        let mut command = Command::new("gh");
        command.args(args);
        if let Some(token) = &self.token {
            command.env("GH_TOKEN", token);
        }

        let output = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SweepError::GitHubCliNotFound
            } else {
                SweepError::GitHubCli(format!("Failed to execute gh command: {}", e))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(error_from_stderr(&stderr));
        }

        Ok(output)
    }
}

impl GitHubCli for GitHubCliImpl {
    fn is_available(&self) -> Result<bool> {
        match Command::new("gh").arg("--version").output() {
            Ok(output) => Ok(output.status.success()),
            Err(_) => Ok(false),
        }
    }

    fn pull_requests_for_branch(&self, branch_name: &str) -> Result<Vec<PullRequestState>> {
        log::debug!("Fetching PRs of {} for branch: {}", self.repo, branch_name);

        let repo = self.repo.to_string();
        let limit = PR_LIMIT.to_string();
        let output = self.run_command(&[
            "pr", "list",
            "--repo", &repo,
            "--head", branch_name,
            "--state", "all",
            "--json", "number,state",
            "--limit", &limit,
        ])?;

        let prs = parse_pr_list(&output.stdout)?;
        log::debug!(
            "PRs for {}: {:?}",
            branch_name,
            prs.iter().map(|pr| (pr.number, pr.state)).collect::<Vec<_>>()
        );

        pull_request_states(branch_name, prs, PR_LIMIT)
    }
}

/// Convert a pull request list, refusing one `gh` may have cut at `limit`
///
/// An open pull request past the cut would otherwise go unseen.
pub fn pull_request_states(
    branch_name: &str,
    prs: Vec<GhPullRequest>,
    limit: usize,
) -> Result<Vec<PullRequestState>> {
    if prs.len() >= limit {
        return Err(SweepError::TooManyPullRequests {
            branch: branch_name.to_string(),
            limit,
        });
    }
    Ok(prs.into_iter().map(|pr| pr.state.into()).collect())
}

/// Parse the json `gh pr list` prints
pub fn parse_pr_list(stdout: &[u8]) -> Result<Vec<GhPullRequest>> {
    let text = String::from_utf8_lossy(stdout);
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(text.trim())?)
}

/// Map a failed `gh` invocation to the matching error kind
pub fn error_from_stderr(stderr: &str) -> SweepError {
    let message = stderr.trim().to_string();
    let lower = message.to_lowercase();

    if lower.contains("gh auth login")
        || lower.contains("authentication")
        || lower.contains("http 401")
        || lower.contains("bad credentials")
    {
        SweepError::Authentication(message)
    } else if lower.contains("rate limit") {
        SweepError::RateLimit(message)
    } else if lower.contains("error connecting")
        || lower.contains("timeout")
        || lower.contains("timed out")
        || lower.contains("could not resolve")
    {
        SweepError::Network(message)
    } else {
        SweepError::GitHubCli(message)
    }
}

#[cfg(test)]
pub struct MockGitHubCli {
    pub available: bool,
    pub pull_requests: std::collections::HashMap<String, Vec<PullRequestState>>,
    pub failures: std::collections::HashMap<String, fn() -> SweepError>,
    pub requested: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockGitHubCli {
    pub fn new() -> Self {
        Self {
            available: true,
            pull_requests: std::collections::HashMap::new(),
            failures: std::collections::HashMap::new(),
            requested: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_pull_requests(mut self, branch: &str, states: Vec<PullRequestState>) -> Self {
        self.pull_requests.insert(branch.to_string(), states);
        self
    }

    pub fn with_failure(mut self, branch: &str, failure: fn() -> SweepError) -> Self {
        self.failures.insert(branch.to_string(), failure);
        self
    }

    pub fn set_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn get_requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl GitHubCli for MockGitHubCli {
    fn is_available(&self) -> Result<bool> {
        Ok(self.available)
    }

    fn pull_requests_for_branch(&self, branch_name: &str) -> Result<Vec<PullRequestState>> {
        self.requested.lock().unwrap().push(branch_name.to_string());
        if let Some(failure) = self.failures.get(branch_name) {
            return Err(failure());
        }
        Ok(self
            .pull_requests
            .get(branch_name)
            .cloned()
            .unwrap_or_default())
    }
}
