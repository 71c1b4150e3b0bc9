//! Client-side checks run before any auth call.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Why a login or signup form was refused. The messages are shown inline.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
	#[error("All fields are required.")]
	MissingFields,

	#[error("Please enter your email and password.")]
	MissingCredentials,

	#[error("Please enter a valid email address.")]
	InvalidEmail,

	#[error("Passwords do not match.")]
	PasswordMismatch,

	#[error("Password must be at least 8 characters long.")]
	PasswordTooShort,
}

pub fn is_valid_email(email: &str) -> bool {
	EMAIL_RE.is_match(email)
}

/// Checks run in order; the first failure wins.
pub fn validate_signup(email: &str, password: &str, confirm: &str) -> Result<(), FormError> {
	if email.trim().is_empty() || password.trim().is_empty() || confirm.trim().is_empty() {
		return Err(FormError::MissingFields);
	}
	if !is_valid_email(email) {
		return Err(FormError::InvalidEmail);
	}
	if password != confirm {
		return Err(FormError::PasswordMismatch);
	}
	if password.chars().count() < MIN_PASSWORD_LEN {
		return Err(FormError::PasswordTooShort);
	}
	Ok(())
}

pub fn validate_login(email: &str, password: &str) -> Result<(), FormError> {
	if email.trim().is_empty() || password.is_empty() {
		return Err(FormError::MissingCredentials);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn signup_requires_every_field() {
		assert_eq!(
			validate_signup("", "abc12345", "abc12345"),
			Err(FormError::MissingFields)
		);
		assert_eq!(
			validate_signup("a@b.co", "   ", "abc12345"),
			Err(FormError::MissingFields)
		);
		assert_eq!(
			validate_signup("a@b.co", "abc12345", ""),
			Err(FormError::MissingFields)
		);
	}

	#[test]
	fn signup_rejects_malformed_email() {
		assert_eq!(
			validate_signup("not-an-email", "abc12345", "abc12345"),
			Err(FormError::InvalidEmail)
		);
		assert_eq!(
			validate_signup("a b@c.de", "abc12345", "abc12345"),
			Err(FormError::InvalidEmail)
		);
		assert_eq!(
			validate_signup("user@host", "abc12345", "abc12345"),
			Err(FormError::InvalidEmail)
		);
	}

	#[test]
	fn signup_rejects_mismatched_passwords() {
		assert_eq!(
			validate_signup("op@plant.io", "abc12345", "abc12346"),
			Err(FormError::PasswordMismatch)
		);
	}

	#[test]
	fn signup_rejects_short_passwords() {
		assert_eq!(
			validate_signup("op@plant.io", "short1", "short1"),
			Err(FormError::PasswordTooShort)
		);
	}

	#[test]
	fn signup_accepts_valid_input() {
		assert_eq!(validate_signup("op@plant.io", "abc12345", "abc12345"), Ok(()));
	}

	#[test]
	fn signup_messages() {
		assert_eq!(FormError::MissingFields.to_string(), "All fields are required.");
		assert_eq!(
			FormError::PasswordTooShort.to_string(),
			"Password must be at least 8 characters long."
		);
	}

	#[test]
	fn login_needs_both_fields() {
		assert_eq!(validate_login("", "pw"), Err(FormError::MissingCredentials));
		assert_eq!(validate_login("op@plant.io", ""), Err(FormError::MissingCredentials));
		assert_eq!(validate_login("op@plant.io", "pw"), Ok(()));
	}
}
