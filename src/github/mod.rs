pub mod cli;
pub mod types;


pub use cli::{GitHubCli, GitHubCliImpl};
pub use types::GitHubRepo;
