//! Database inspection command.

use anyhow::Result;
use colored::Colorize;
use qa_core::config::Config;
use qa_core::{question, response, user};

use crate::output;

pub fn execute(config: &Config) -> Result<()> {
    let pool = qa_db::init_pool(&config.database_path)?;

    let users = user::list_users(&pool)?;
    let questions = question::list_questions(&pool, None)?;
    let responses = response::list_all_responses(&pool)?;

    println!("{}", "Q&A DASHBOARD - DATABASE CHECKER".cyan().bold());
    println!("  {}", config.database_path.display().to_string().dimmed());

    output::section("Users");
    output::print_users(&users);

    output::section("Questions");
    output::print_questions(&questions);

    output::section("Responses");
    output::print_responses(&responses);

    output::section("Summary");
    println!("  Total users:     {}", users.len());
    println!("  Total questions: {}", questions.len());
    println!("  Total responses: {}", responses.len());

    Ok(())
}
