//! Field constraints applied before anything is written or broadcast.

use crate::error::{QaError, QaResult};

pub const MAX_MESSAGE_CHARS: usize = 1000;
pub const MAX_GUEST_NAME_CHARS: usize = 100;
pub const MIN_USERNAME_CHARS: usize = 3;
pub const MAX_USERNAME_CHARS: usize = 50;
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Question or response text: 1 to 1000 characters.
pub fn message(text: &str) -> QaResult<()> {
    let len = text.chars().count();
    if len == 0 {
        return Err(QaError::validation("Message must not be empty"));
    }
    if len > MAX_MESSAGE_CHARS {
        return Err(QaError::validation(format!(
            "Message must be at most {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn guest_name(name: &str) -> QaResult<()> {
    if name.chars().count() > MAX_GUEST_NAME_CHARS {
        return Err(QaError::validation(format!(
            "Guest name must be at most {MAX_GUEST_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn username(name: &str) -> QaResult<()> {
    let len = name.chars().count();
    if !(MIN_USERNAME_CHARS..=MAX_USERNAME_CHARS).contains(&len) {
        return Err(QaError::validation(format!(
            "Username must be between {MIN_USERNAME_CHARS} and {MAX_USERNAME_CHARS} characters"
        )));
    }
    Ok(())
}

pub fn password(password: &str) -> QaResult<()> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(QaError::validation(format!(
            "Password must be at least {MIN_PASSWORD_CHARS} characters"
        )));
    }
    Ok(())
}

/// Accepts `local@domain.tld`: one `@`, non-empty local part, dotted domain, no whitespace.
pub fn email(address: &str) -> QaResult<()> {
    let invalid = || QaError::validation("Invalid email address");

    if address.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = address.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}
