//! Credential validation performed before any network call.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{AcureError, Result};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_NAME_LEN: usize = 3;

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Email/password pair submitted by the login form.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_email(&self.email) {
            return Err(AcureError::validation("Please enter a valid email address"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AcureError::validation(
                "Password must be at least 6 characters",
            ));
        }
        Ok(())
    }
}

/// Fields submitted by the register form.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Body sent to the register endpoint once validation passed.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// The trimmed name, or the email's local part when the name is blank.
    pub fn effective_name(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            self.email
                .trim()
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string()
        } else {
            name.to_string()
        }
    }

    /// Validates in form order and returns the request to send.
    pub fn validate(&self) -> Result<RegisterRequest> {
        let name = self.effective_name();
        if name.chars().count() < MIN_NAME_LEN {
            return Err(AcureError::validation(
                "Please enter a valid name (min 3 characters)",
            ));
        }
        if self.password != self.confirm_password {
            return Err(AcureError::validation("Passwords do not match"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AcureError::validation(
                "Password must be at least 6 characters",
            ));
        }
        let email = self.email.trim();
        if !is_valid_email(email) {
            return Err(AcureError::validation("Please enter a valid email address"));
        }

        Ok(RegisterRequest {
            name,
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}
