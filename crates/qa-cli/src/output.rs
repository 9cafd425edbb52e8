//! Terminal output formatting.

use colored::Colorize;
use qa_core::question::model::{Question, QuestionStatus};
use qa_core::response::model::Response;
use qa_core::user::model::User;

pub fn section(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(72));
}

/// Print users as a table.
pub fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("{}", "No users found.".dimmed());
        return;
    }

    println!("{:<6} {:<20} {:<30} {:<6}", "ID", "Username", "Email", "Admin");
    for user in users {
        let admin = if user.is_admin { "yes".green() } else { "no".dimmed() };
        println!(
            "{:<6} {:<20} {:<30} {:<6}",
            user.user_id,
            truncate(&user.username, 20),
            truncate(&user.email, 30),
            admin
        );
    }
}

/// Print questions as a table.
pub fn print_questions(questions: &[Question]) {
    if questions.is_empty() {
        println!("{}", "No questions found.".dimmed());
        return;
    }

    println!(
        "{:<6} {:<16} {:<10} {:<9} {:<40}",
        "ID", "Author", "Status", "Replies", "Message"
    );
    for q in questions {
        let status = match q.status {
            QuestionStatus::Escalated => "Escalated".red(),
            QuestionStatus::Pending => "Pending".yellow(),
            QuestionStatus::Answered => "Answered".green(),
        };
        println!(
            "{:<6} {:<16} {:<10} {:<9} {:<40}",
            q.question_id,
            truncate(q.author(), 16),
            status,
            q.response_count,
            truncate(&q.message, 50)
        );
    }
}

/// Print responses as a table.
pub fn print_responses(responses: &[Response]) {
    if responses.is_empty() {
        println!("{}", "No responses found.".dimmed());
        return;
    }

    println!("{:<6} {:<9} {:<16} {:<40}", "ID", "Question", "Author", "Message");
    for r in responses {
        println!(
            "{:<6} {:<9} {:<16} {:<40}",
            r.response_id,
            r.question_id,
            truncate(r.author(), 16),
            truncate(&r.message, 50)
        );
    }
}

/// Truncate to `max` characters, marking the cut with "...".
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
