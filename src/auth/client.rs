//! Stand-in for the hosted auth provider. Every call succeeds after a short
//! delay and leaves a mock token in storage.

use log::info;

use super::token::{BrowserStorage, KeyValueStore, TokenStorage};
use super::validate::{validate_login, validate_signup};
use crate::api::simulated_delay;
use crate::error::AuthError;

/// Providers the login page offers.
pub const SUPPORTED_PROVIDERS: [&str; 1] = ["google"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
	pub email: String,
	pub token: String,
}

#[derive(Clone, Debug)]
pub struct AuthClient<S = BrowserStorage> {
	tokens: TokenStorage<S>,
	delay_ms: u32,
}

impl<S: KeyValueStore> AuthClient<S> {
	pub fn new(tokens: TokenStorage<S>, delay_ms: u32) -> Self {
		Self { tokens, delay_ms }
	}

	pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
		validate_login(email, password)?;
		simulated_delay(self.delay_ms).await;
		info!("Signed in {}", email.trim());
		self.open_session(email.trim(), "password")
	}

	pub async fn sign_up(&self, email: &str, password: &str, confirm: &str) -> Result<Session, AuthError> {
		validate_signup(email, password, confirm)?;
		simulated_delay(self.delay_ms).await;
		info!("Created account for {}", email.trim());
		self.open_session(email.trim(), "password")
	}

	pub async fn sign_in_with_provider(&self, provider: &str) -> Result<Session, AuthError> {
		if !SUPPORTED_PROVIDERS.contains(&provider) {
			return Err(AuthError::UnsupportedProvider(provider.to_string()));
		}
		simulated_delay(self.delay_ms).await;
		info!("Signed in with {}", provider);
		self.open_session(&format!("user@{}.example", provider), provider)
	}

	pub async fn sign_out(&self) -> Result<(), AuthError> {
		simulated_delay(self.delay_ms).await;
		self.tokens.remove_token()?;
		info!("Signed out");
		Ok(())
	}

	pub fn is_signed_in(&self) -> bool {
		self.tokens.get_token().is_some()
	}

	fn open_session(&self, email: &str, method: &str) -> Result<Session, AuthError> {
		let token = format!("mock.{}.{}", method, email);
		self.tokens.save_token(&token)?;
		Ok(Session {
			email: email.to_string(),
			token,
		})
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;
	use crate::auth::token::MemoryStore;
	use crate::auth::validate::FormError;

	fn client() -> (AuthClient<MemoryStore>, TokenStorage<MemoryStore>) {
		let tokens = TokenStorage::new(MemoryStore::default());
		(AuthClient::new(tokens.clone(), 0), tokens)
	}

	#[test]
	fn sign_in_stores_token() {
		let (auth, tokens) = client();
		let session = block_on(auth.sign_in(" ops@plant.io ", "hunter22")).unwrap();
		assert_eq!(session.email, "ops@plant.io");
		assert_eq!(tokens.get_token(), Some(session.token));
		assert!(auth.is_signed_in());
	}

	#[test]
	fn sign_in_requires_both_fields() {
		let (auth, tokens) = client();
		let err = block_on(auth.sign_in("ops@plant.io", "")).unwrap_err();
		assert_eq!(err, AuthError::Validation(FormError::MissingCredentials));
		assert_eq!(tokens.get_token(), None);
	}

	#[test]
	fn sign_up_validates_before_storing() {
		let (auth, tokens) = client();
		let err = block_on(auth.sign_up("ops@plant.io", "abc12345", "abc12346")).unwrap_err();
		assert_eq!(err, AuthError::Validation(FormError::PasswordMismatch));
		assert!(tokens.get_token().is_none());

		block_on(auth.sign_up("ops@plant.io", "abc12345", "abc12345")).unwrap();
		assert!(tokens.get_token().is_some());
	}

	#[test]
	fn only_google_provider_is_supported() {
		let (auth, _) = client();
		assert!(block_on(auth.sign_in_with_provider("google")).is_ok());
		assert_eq!(
			block_on(auth.sign_in_with_provider("github")).unwrap_err(),
			AuthError::UnsupportedProvider("github".into())
		);
	}

	#[test]
	fn sign_out_clears_token() {
		let (auth, tokens) = client();
		block_on(auth.sign_in("ops@plant.io", "hunter22")).unwrap();
		block_on(auth.sign_out()).unwrap();
		assert!(tokens.get_token().is_none());
	}
}
