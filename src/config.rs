use crate::errors::Result;
use crate::git::GitRepo;

/// Settings of a single sweep, resolved once before the run starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    pub remote: String,
    pub default_branch: String,
    pub dry_run: bool,
}

impl SweepConfig {
    /// Flags win over what the repository says
    pub fn resolve<G: GitRepo>(
        git: &G,
        default_branch: Option<&str>,
        dry_run: bool,
    ) -> Result<Self> {
        let default_branch = match default_branch {
            Some(name) => name.to_string(),
            None => git.default_branch_name()?,
        };

        Ok(Self {
            remote: git.remote_name().to_string(),
            default_branch,
            dry_run,
        })
    }
}
