//! Form-level validation. Everything here runs before a request is built, so a
//! rejected form never reaches the gateway or a store's error field.

use regex::Regex;

use crate::constants::{MIN_PASSWORD_LEN, MIN_PROJECT_NAME_LEN, MIN_TITLE_LEN, MIN_USERNAME_LEN};
use crate::error::{KanbanError, KanbanResult};
use crate::models::{IssueDraft, LoginData, ProjectDraft, SignupData};

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid");
}

pub trait Validate {
    fn validate(&self) -> KanbanResult<()>;
}

fn invalid(field: &'static str, message: impl Into<String>) -> KanbanError {
    KanbanError::Validation {
        field,
        message: message.into(),
    }
}

fn require_min_len(field: &'static str, label: &str, value: &str, min: usize) -> KanbanResult<()> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(invalid(field, format!("{} is required", label)));
    }
    if len < min {
        return Err(invalid(
            field,
            format!("{} must be at least {} characters", label, min),
        ));
    }
    Ok(())
}

fn require_email(value: &str) -> KanbanResult<()> {
    if value.trim().is_empty() {
        return Err(invalid("email", "Email is required"));
    }
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(invalid("email", "Email address is not valid"));
    }
    Ok(())
}

impl Validate for IssueDraft {
    fn validate(&self) -> KanbanResult<()> {
        require_min_len("title", "Title", &self.title, MIN_TITLE_LEN)
    }
}

impl Validate for ProjectDraft {
    fn validate(&self) -> KanbanResult<()> {
        require_min_len("name", "Project name", &self.name, MIN_PROJECT_NAME_LEN)
    }
}

impl Validate for LoginData {
    fn validate(&self) -> KanbanResult<()> {
        require_email(&self.email)?;
        if self.password.is_empty() {
            return Err(invalid("password", "Password is required"));
        }
        Ok(())
    }
}

impl Validate for SignupData {
    fn validate(&self) -> KanbanResult<()> {
        require_min_len("username", "Username", &self.username, MIN_USERNAME_LEN)?;
        require_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(invalid(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        Ok(())
    }
}
