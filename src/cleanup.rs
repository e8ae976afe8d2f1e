use crate::{
    config::SweepConfig,
    core::{classify, Branch, Classification},
    errors::{Result, SweepError},
    git::GitRepo,
    github::GitHubCli,
};
use std::collections::BTreeMap;

/// What we managed to learn about a local branch
#[derive(Debug)]
pub enum Observation {
    Known(Branch),
    /// Facts could not be gathered; such a branch is always retained
    Unknown { name: String, error: SweepError },
}

#[derive(Debug)]
pub struct BranchReport {
    pub classification: Option<Classification>,
    pub deleted: bool,
    pub error: Option<SweepError>,
}

#[derive(Debug, Default)]
pub struct Report {
    pub dry_run: bool,
    pub branches: BTreeMap<String, BranchReport>,
}

impl Report {
    pub fn has_errors(&self) -> bool {
        self.branches.values().any(|entry| entry.error.is_some())
    }

    pub fn deleted(&self) -> impl Iterator<Item = &str> {
        self.branches
            .iter()
            .filter(|(_, entry)| entry.deleted)
            .map(|(name, _)| name.as_str())
    }

    /// Branches classified as stale, deleted or not
    pub fn stale(&self) -> impl Iterator<Item = &str> {
        self.branches
            .iter()
            .filter(|(_, entry)| {
                entry
                    .classification
                    .is_some_and(Classification::is_stale)
            })
            .map(|(name, _)| name.as_str())
    }
}

pub struct Cleaner<'a, G: GitRepo, H: GitHubCli> {
    git: &'a G,
    github: &'a H,
    config: &'a SweepConfig,
}

impl<'a, G: GitRepo, H: GitHubCli> Cleaner<'a, G, H> {
    pub fn new(git: &'a G, github: &'a H, config: &'a SweepConfig) -> Self {
        Self { git, github, config }
    }

    /// Observe every local branch then delete the stale ones
    pub fn sweep(&self) -> Result<Report> {
        if !self.github.is_available()? {
            return Err(SweepError::GitHubCliNotFound);
        }
        let observations = self.observe()?;
        Ok(self.run(observations))
    }

    /// Gather the facts needed to classify each local branch
    ///
    /// Pull requests are only fetched for pushed, non-default branches.
    /// Fatal errors abort, anything else marks the branch as unknown.
    pub fn observe(&self) -> Result<Vec<Observation>> {
        let mut observations = Vec::new();

        for local in self.git.list_local_branches()? {
            let name = local.name;
            if !local.utf8 {
                let error = SweepError::BranchNameNotUtf8(name.clone());
                observations.push(Observation::Unknown { name, error });
                continue;
            }

            match self.observe_branch(&name) {
                Ok(branch) => {
                    log::debug!("Observed {:?}", branch);
                    observations.push(Observation::Known(branch));
                }
                Err(error) if error.is_fatal() => return Err(error),
                Err(error) => {
                    log::debug!("Cannot observe {}: {}", name, error);
                    observations.push(Observation::Unknown { name, error });
                }
            }
        }

        Ok(observations)
    }

    fn observe_branch(&self, name: &str) -> Result<Branch> {
        let is_default = name == self.config.default_branch;
        let is_pushed = self.git.is_pushed(name)?;

        let pull_requests = if is_pushed && !is_default {
            self.github.pull_requests_for_branch(name)?
        } else {
            Vec::new()
        };

        Ok(Branch {
            name: name.to_string(),
            is_default,
            is_pushed,
            pull_requests,
        })
    }

    /// Classify each observation and delete stale branches
    ///
    /// A failed delete is recorded and does not stop the run.
    pub fn run(&self, observations: Vec<Observation>) -> Report {
        let mut report = Report {
            dry_run: self.config.dry_run,
            branches: BTreeMap::new(),
        };

        for observation in observations {
            let (name, entry) = match observation {
                Observation::Known(branch) => {
                    let entry = self.dispose(&branch);
                    (branch.name, entry)
                }
                Observation::Unknown { name, error } => (
                    name,
                    BranchReport {
                        classification: None,
                        deleted: false,
                        error: Some(error),
                    },
                ),
            };
            report.branches.insert(name, entry);
        }

        report
    }

    fn dispose(&self, branch: &Branch) -> BranchReport {
        let classification = classify(branch);
        let mut entry = BranchReport {
            classification: Some(classification),
            deleted: false,
            error: None,
        };

        if !classification.is_stale() {
            log::debug!("Retaining {} ({})", branch.name, classification);
            return entry;
        }

        if self.config.dry_run {
            log::info!("Would delete {}", branch.name);
            return entry;
        }

        match self.git.delete_local_branch(&branch.name) {
            Ok(()) => {
                log::info!("Deleted {}", branch.name);
                entry.deleted = true;
            }
            Err(error) => {
                log::error!("Failed to delete {}: {}", branch.name, error);
                entry.error = Some(error);
            }
        }
        entry
    }
}
