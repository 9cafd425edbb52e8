//! Admin promotion command.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::Input;
use qa_core::config::Config;
use qa_core::user;

use crate::output;

#[derive(Args)]
pub struct MakeAdminArgs {
    /// Username to promote (prompted for when omitted)
    pub username: Option<String>,
}

pub fn execute(args: MakeAdminArgs, config: &Config) -> Result<()> {
    let pool = qa_db::init_pool(&config.database_path)?;

    let username = match args.username {
        Some(name) => name,
        None => {
            let users = user::list_users(&pool)?;
            if users.is_empty() {
                bail!("No users found in database. Register a user first.");
            }

            println!("{}", "Available users:".bold());
            output::print_users(&users);
            println!();

            Input::<String>::new()
                .with_prompt("Username to make admin")
                .interact_text()?
                .trim()
                .to_string()
        }
    };

    let changed = user::make_admin(&pool, &username)?;
    tracing::info!(username = %username, changed, "Admin flag granted");

    if changed {
        println!("{} User '{}' is now an admin", "✓".green().bold(), username.cyan());
    } else {
        println!("{} User '{}' is already an admin", "✓".green().bold(), username.cyan());
    }

    Ok(())
}
