//! CLI argument definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "plasmactl",
    version,
    about = "Publish packaged platform artifacts to the artifacts repository"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload local artifact archive to private repository
    Publish {
        /// Artifacts repository username
        #[arg(long)]
        username: Option<String>,
        /// Artifacts repository password
        #[arg(long)]
        password: Option<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
