//! Local input checks, run before anything reaches the network

use crate::api::models::{LoginPayload, ResetPasswordPayload, SignupPayload, TaskPayload};
use crate::error::ApiError;

/// Minimum password length accepted by the server
pub const MIN_PASSWORD_LEN: usize = 8;

/// Input that can be rejected locally with a [`ApiError::Validation`]
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError>;
}

impl Validate for LoginPayload {
    fn validate(&self) -> Result<(), ApiError> {
        email(&self.email)?;
        password(&self.password, "Password is required", "Password must be at least 8 characters")
    }
}

impl Validate for SignupPayload {
    fn validate(&self) -> Result<(), ApiError> {
        required(&self.name, "Name is required")?;
        email(&self.email)?;
        password(&self.password, "Password is required", "Password must be at least 8 characters")
    }
}

impl Validate for ResetPasswordPayload {
    fn validate(&self) -> Result<(), ApiError> {
        password(
            &self.current_password,
            "Current Password is required",
            "Password must be at least 8 characters",
        )?;
        password(
            &self.new_password,
            "New Password is required",
            "New Password must be at least 8 characters",
        )?;
        if self.new_password == self.current_password {
            return Err(invalid(
                "New password must be different from the current password",
            ));
        }
        if let Some(confirm) = &self.confirm_new_password {
            if confirm != &self.new_password {
                return Err(invalid("Passwords must match"));
            }
        }
        Ok(())
    }
}

impl Validate for TaskPayload {
    fn validate(&self) -> Result<(), ApiError> {
        required(&self.title, "Title is required")?;
        required(&self.description, "Description is required")
    }
}

/// Task ids are opaque server strings; only blank and dot-segment ids are refused
pub fn task_id(id: &str) -> Result<(), ApiError> {
    required(id, "Task id is required")?;
    if matches!(id, "." | "..") {
        return Err(invalid("Invalid task id"));
    }
    Ok(())
}

fn invalid(message: &str) -> ApiError {
    ApiError::Validation(message.to_string())
}

fn required(value: &str, message: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(invalid(message));
    }
    Ok(())
}

fn password(value: &str, missing: &str, short: &str) -> Result<(), ApiError> {
    if value.is_empty() {
        return Err(invalid(missing));
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(invalid(short));
    }
    Ok(())
}

fn email(value: &str) -> Result<(), ApiError> {
    required(value, "Email is required")?;
    if !is_email(value) {
        return Err(invalid("Invalid email"));
    }
    Ok(())
}

/// `local@domain.tld`, no whitespace, one `@`
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), ApiError>) -> String {
        result.unwrap_err().display_message()
    }

    #[test]
    fn task_id_rules() {
        assert!(task_id("42").is_ok());
        assert!(task_id("../signup").is_ok());
        assert_eq!(message(task_id(" ")), "Task id is required");
        assert_eq!(message(task_id("..")), "Invalid task id");
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("a@b.com"));
        assert!(is_email("first.last+tag@mail.example.org"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.com"));
        assert!(!is_email("a@@b.com"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email("a@b..com"));
    }

    #[test]
    fn login_rules() {
        assert!(LoginPayload::new("a@b.com", "12345678").validate().is_ok());
        assert_eq!(message(LoginPayload::new("", "12345678").validate()), "Email is required");
        assert_eq!(message(LoginPayload::new("nope", "12345678").validate()), "Invalid email");
        assert_eq!(message(LoginPayload::new("a@b.com", "").validate()), "Password is required");
        assert_eq!(
            message(LoginPayload::new("a@b.com", "1234567").validate()),
            "Password must be at least 8 characters"
        );
    }

    #[test]
    fn signup_requires_name() {
        assert_eq!(
            message(SignupPayload::new("   ", "a@b.com", "12345678").validate()),
            "Name is required"
        );
        assert!(SignupPayload::new("Ada", "a@b.com", "12345678").validate().is_ok());
    }

    #[test]
    fn reset_password_rules() {
        let same = ResetPasswordPayload::new("password1", "password1");
        assert_eq!(
            message(same.validate()),
            "New password must be different from the current password"
        );

        let mismatch = ResetPasswordPayload::new("password1", "password2").with_confirmation("password3");
        assert_eq!(message(mismatch.validate()), "Passwords must match");

        let short = ResetPasswordPayload::new("password1", "short");
        assert_eq!(message(short.validate()), "New Password must be at least 8 characters");

        let ok = ResetPasswordPayload::new("password1", "password2").with_confirmation("password2");
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn task_requires_fields() {
        assert_eq!(message(TaskPayload::new("", "y").validate()), "Title is required");
        assert_eq!(message(TaskPayload::new("x", " ").validate()), "Description is required");
        assert!(TaskPayload::new("x", "y").validate().is_ok());
    }
}
