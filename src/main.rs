use clap::Parser;
use commands::clean::Clean;

mod cleanup;
mod commands;
mod config;
mod core;
mod errors;
mod git;
mod github;

/// Delete local branches whose pull requests are all closed
///
/// A branch is deleted when it was pushed to the remote, at least one pull
/// request was opened for it and every such pull request is now closed or
/// merged. The default branch is never touched.
#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "git-sweep", version)]
struct Cli {
    #[command(flatten)]
    clean: Clean,
}

fn main() {
    env_logger::init();

    let args = Cli::parse();

    match args.clean.execute() {
        Ok(report) if report.has_errors() => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
