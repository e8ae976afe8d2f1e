use crate::{
    cleanup::{Cleaner, Report},
    config::SweepConfig,
    errors::Result,
    git::Git,
    github::GitHubCliImpl,
};
use clap::Args;

#[derive(Debug, Args)]
pub struct Clean {
    /// GitHub token handed to `gh` for this run only
    ///
    /// Without it, `gh` uses whatever `gh auth login` stored.
    #[arg(long, short = 'T')]
    pub token: Option<String>,

    /// Report what would be deleted without touching the repository
    #[arg(long, short)]
    pub dry_run: bool,

    /// Remote to compare branches against
    #[arg(long)]
    pub remote: Option<String>,

    /// Branch that is never deleted (detected when omitted)
    #[arg(long)]
    pub default_branch: Option<String>,

    /// Path to the repository to clean
    #[arg(default_value = ".")]
    pub path: String,
}

impl Clean {
    /// Returns the report so the caller can pick the exit status
    pub fn execute(&self) -> Result<Report> {
        let git = Git::open(&self.path, self.remote.as_deref())?;
        let config = SweepConfig::resolve(&git, self.default_branch.as_deref(), self.dry_run)?;
        let repo = git.github_repo()?;

        log::info!(
            "Sweeping {} against {} ({}), default branch {}",
            self.path, config.remote, repo, config.default_branch
        );

        let github_cli = GitHubCliImpl::new(repo).with_token(self.token.clone());
        let report = Cleaner::new(&git, &github_cli, &config).sweep()?;

        print_report(&report);
        Ok(report)
    }
}

fn print_report(report: &Report) {
    for (name, entry) in &report.branches {
        match (&entry.classification, &entry.error) {
            (None, Some(error)) => {
                eprintln!("❌ {}: retained, {}", name, error);
            }
            (Some(classification), Some(error)) => {
                eprintln!("❌ {}: {}, {}", name, classification, error);
            }
            (Some(classification), None) if entry.deleted => {
                println!("🗑️  {}: {}, deleted", name, classification);
            }
            (Some(classification), None) if classification.is_stale() && report.dry_run => {
                println!("🗑️  {}: {}, would delete", name, classification);
            }
            (Some(classification), None) => {
                println!("✅ {}: {}, retained", name, classification);
            }
            (None, None) => {
                println!("✅ {}: retained", name);
            }
        }
    }

    let deleted = report.deleted().count();
    if report.dry_run {
        println!("{} branch(es) would be deleted", report.stale().count());
    } else if deleted == 0 {
        println!("Nothing to delete");
    } else {
        println!("{} branch(es) deleted", deleted);
    }
}
