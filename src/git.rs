use crate::errors::{Result, SweepError};
use crate::github::GitHubRepo;
use git2::{BranchType, Repository};
use std::path::Path;

/// Git config key overriding the remote to compare against
pub const REMOTE_KEY: &str = "sweep.remote";
/// Git config key overriding the default branch
pub const DEFAULT_BRANCH_KEY: &str = "sweep.defaultBranch";

/// A local branch as listed by the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalBranch {
    /// Lossy rendering when the ref name is not utf-8
    pub name: String,
    pub utf8: bool,
}

impl LocalBranch {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            utf8: true,
        }
    }
}

pub trait GitRepo {
    fn remote_name(&self) -> &str;
    fn list_local_branches(&self) -> Result<Vec<LocalBranch>>;
    fn default_branch_name(&self) -> Result<String>;
    fn is_pushed(&self, branch_name: &str) -> Result<bool>;
    fn delete_local_branch(&self, branch_name: &str) -> Result<()>;
}

pub struct Git {
    repository: Repository,
    remote: String,
}

fn git_error(context: &str) -> impl Fn(git2::Error) -> SweepError + '_ {
    move |e| SweepError::Git(format!("{}: {}", context, e.message()))
}

impl Git {
    /// Open the repository at `path`
    ///
    /// The remote is `remote` if given, else the `sweep.remote` config,
    /// else the only remote of the repository, else `origin`.
    pub fn open(path: impl AsRef<Path>, remote: Option<&str>) -> Result<Self> {
        let repository = Repository::open(path).map_err(git_error("open repository"))?;

        let remote = match remote {
            Some(remote) => remote.to_string(),
            None => match config_string(&repository, REMOTE_KEY) {
                Some(remote) => remote,
                None => guess_remote(&repository)?,
            },
        };

        if repository.find_remote(&remote).is_err() {
            return Err(SweepError::RemoteNotFound(remote));
        }
        log::debug!("Using remote: {}", remote);

        Ok(Self { repository, remote })
    }

    /// The GitHub repository the remote points at
    pub fn github_repo(&self) -> Result<GitHubRepo> {
        let remote = self
            .repository
            .find_remote(&self.remote)
            .map_err(|_| SweepError::RemoteNotFound(self.remote.clone()))?;
        let url = remote
            .url()
            .ok_or_else(|| SweepError::RemoteUrlNotGithub("<not utf-8>".to_string()))?;

        let repo = GitHubRepo::from_remote_url(url)
            .ok_or_else(|| SweepError::RemoteUrlNotGithub(url.to_string()))?;
        log::debug!("Remote {} is {}", self.remote, repo);
        Ok(repo)
    }

    fn has_local_branch(&self, name: &str) -> bool {
        self.repository.find_branch(name, BranchType::Local).is_ok()
    }

    /// Branch `refs/remotes/<remote>/HEAD` points at, if any
    fn remote_head(&self) -> Option<String> {
        let head_ref = format!("refs/remotes/{}/HEAD", self.remote);
        let reference = self.repository.find_reference(&head_ref).ok()?;
        let target = reference.symbolic_target()?;
        let prefix = format!("refs/remotes/{}/", self.remote);
        target.strip_prefix(&prefix).map(|s| s.to_string())
    }
}

fn config_string(repository: &Repository, key: &str) -> Option<String> {
    let config = repository.config().ok()?;
    config.get_string(key).ok().filter(|value| !value.is_empty())
}

fn guess_remote(repository: &Repository) -> Result<String> {
    let remotes = repository.remotes().map_err(git_error("list remotes"))?;
    let names: Vec<&str> = remotes.iter().flatten().collect();

    match names.as_slice() {
        [only] => Ok(only.to_string()),
        names if names.contains(&"origin") => Ok("origin".to_string()),
        names => Err(SweepError::WrongRemoteCount(names.len())),
    }
}

impl GitRepo for Git {
    fn remote_name(&self) -> &str {
        &self.remote
    }

    fn list_local_branches(&self) -> Result<Vec<LocalBranch>> {
        let branches = self
            .repository
            .branches(Some(BranchType::Local))
            .map_err(git_error("list local branches"))?;

        let mut names = Vec::new();
        for entry in branches {
            let (branch, _) = entry.map_err(git_error("read local branch"))?;
            let bytes = branch.name_bytes().map_err(git_error("read branch name"))?;
            match std::str::from_utf8(bytes) {
                Ok(name) => names.push(LocalBranch::new(name)),
                Err(_) => {
                    let name = String::from_utf8_lossy(bytes).into_owned();
                    log::warn!("Branch name is not utf-8: {}", name);
                    names.push(LocalBranch { name, utf8: false });
                }
            }
        }
        Ok(names)
    }

    fn default_branch_name(&self) -> Result<String> {
        if let Some(name) = config_string(&self.repository, DEFAULT_BRANCH_KEY) {
            return Ok(name);
        }
        if let Some(name) = self.remote_head() {
            return Ok(name);
        }
        ["main", "master"]
            .into_iter()
            .find(|name| self.has_local_branch(name))
            .map(|name| name.to_string())
            .ok_or(SweepError::DefaultBranchUnknown)
    }

    fn is_pushed(&self, branch_name: &str) -> Result<bool> {
        let remote_branch = format!("{}/{}", self.remote, branch_name);
        match self.repository.find_branch(&remote_branch, BranchType::Remote) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(git_error("look up remote branch")(e)),
        }
    }

    fn delete_local_branch(&self, branch_name: &str) -> Result<()> {
        log::debug!("Deleting local branch: {}", branch_name);
        let mut branch = match self.repository.find_branch(branch_name, BranchType::Local) {
            Ok(branch) => branch,
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                return Err(SweepError::Delete {
                    branch: branch_name.to_string(),
                    reason: "branch not found".to_string(),
                })
            }
            Err(e) => return Err(git_error("look up local branch")(e)),
        };

        branch.delete().map_err(|e| SweepError::Delete {
            branch: branch_name.to_string(),
            reason: e.message().to_string(),
        })
    }
}

#[cfg(test)]
pub struct MockGit {
    pub remote: String,
    pub branches: Vec<LocalBranch>,
    pub default_branch: String,
    pub pushed: std::collections::HashSet<String>,
    pub refuse_delete: std::collections::HashSet<String>,
    pub deleted: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockGit {
    pub fn new(default_branch: &str) -> Self {
        Self {
            remote: "origin".to_string(),
            branches: vec![LocalBranch::new(default_branch)],
            default_branch: default_branch.to_string(),
            pushed: std::collections::HashSet::from([default_branch.to_string()]),
            refuse_delete: std::collections::HashSet::new(),
            deleted: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_local_branch(mut self, name: &str) -> Self {
        self.branches.push(LocalBranch::new(name));
        self
    }

    /// `name` stands in for the lossy rendering of a non utf-8 ref
    pub fn with_non_utf8_branch(mut self, name: &str) -> Self {
        self.branches.push(LocalBranch {
            name: name.to_string(),
            utf8: false,
        });
        self
    }

    pub fn with_pushed_branch(mut self, name: &str) -> Self {
        self.branches.push(LocalBranch::new(name));
        self.pushed.insert(name.to_string());
        self
    }

    pub fn refusing_delete_of(mut self, name: &str) -> Self {
        self.refuse_delete.insert(name.to_string());
        self
    }

    pub fn get_deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl GitRepo for MockGit {
    fn remote_name(&self) -> &str {
        &self.remote
    }

    fn list_local_branches(&self) -> Result<Vec<LocalBranch>> {
        Ok(self.branches.clone())
    }

    fn default_branch_name(&self) -> Result<String> {
        Ok(self.default_branch.clone())
    }

    fn is_pushed(&self, branch_name: &str) -> Result<bool> {
        Ok(self.pushed.contains(branch_name))
    }

    fn delete_local_branch(&self, branch_name: &str) -> Result<()> {
        if self.refuse_delete.contains(branch_name) {
            return Err(SweepError::Delete {
                branch: branch_name.to_string(),
                reason: "branch not found".to_string(),
            });
        }
        self.deleted.lock().unwrap().push(branch_name.to_string());
        Ok(())
    }
}
