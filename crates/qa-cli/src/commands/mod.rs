//! CLI command definitions and handlers.

use anyhow::Result;
use clap::{Parser, Subcommand};
use qa_core::config::Config;
use std::path::PathBuf;

pub mod check_db;
pub mod make_admin;
pub mod serve;

/// Real-time Q&A dashboard backend
#[derive(Parser)]
#[command(name = "qa")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the SQLite database (overrides QA_DATABASE)
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API and WebSocket server
    Serve(serve::ServeArgs),

    /// Print the contents of the database
    CheckDb,

    /// Grant the admin flag to a user
    MakeAdmin(make_admin::MakeAdminArgs),
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut config = Config::from_env()?;
        if let Some(path) = self.database {
            config.database_path = path;
        }

        match self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::CheckDb => check_db::execute(&config),
            Commands::MakeAdmin(args) => make_admin::execute(args, &config),
        }
    }
}
