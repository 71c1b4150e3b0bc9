//! Bearer token persistence and the fetch wrapper that sends it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use crate::error::{ApiError, StorageError};

/// localStorage key holding the token.
pub const TOKEN_KEY: &str = "jwt_token";

/// String key/value storage, the browser's or an in-memory stand-in.
pub trait KeyValueStore {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
	fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
	fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
	fn storage() -> Result<web_sys::Storage, StorageError> {
		web_sys::window()
			.ok_or(StorageError::Unavailable)?
			.local_storage()?
			.ok_or(StorageError::Unavailable)
	}
}

impl KeyValueStore for BrowserStorage {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(Self::storage()?.get_item(key)?)
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		Ok(Self::storage()?.set_item(key, value)?)
	}

	fn remove(&self, key: &str) -> Result<(), StorageError> {
		Ok(Self::storage()?.remove_item(key)?)
	}
}

/// Process-local store, shared between clones.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Rc<RefCell<HashMap<String, String>>>);

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.0.borrow().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
		self.0.borrow_mut().insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StorageError> {
		self.0.borrow_mut().remove(key);
		Ok(())
	}
}

#[derive(Clone, Debug, Default)]
pub struct TokenStorage<S = BrowserStorage> {
	store: S,
}

impl<S: KeyValueStore> TokenStorage<S> {
	pub fn new(store: S) -> Self {
		Self { store }
	}

	pub fn save_token(&self, token: &str) -> Result<(), StorageError> {
		self.store.set(TOKEN_KEY, token)
	}

	/// Missing storage reads as "no token".
	pub fn get_token(&self) -> Option<String> {
		match self.store.get(TOKEN_KEY) {
			Ok(token) => token,
			Err(err) => {
				warn!("Could not read auth token: {}", err);
				None
			}
		}
	}

	pub fn remove_token(&self) -> Result<(), StorageError> {
		self.store.remove(TOKEN_KEY)
	}

	pub fn bearer_header(&self) -> Option<String> {
		self.get_token().map(|token| format!("Bearer {}", token))
	}
}

/// `fetch` with `Authorization: Bearer <token>` attached when a token is stored.
pub async fn authenticated_fetch<S: KeyValueStore>(
	tokens: &TokenStorage<S>,
	method: &str,
	url: &str,
	body: Option<&JsValue>,
) -> Result<Response, ApiError> {
	let headers = Headers::new()?;
	if let Some(auth) = tokens.bearer_header() {
		headers.append("Authorization", &auth)?;
	}

	let init = RequestInit::new();
	init.set_method(method);
	init.set_headers(&headers);
	if let Some(body) = body {
		init.set_body(body);
	}

	let request = Request::new_with_str_and_init(url, &init)?;
	let window = web_sys::window().ok_or_else(|| ApiError::Network("no window".into()))?;
	let response = JsFuture::from(window.fetch_with_request(&request)).await?;
	response.dyn_into::<Response>().map_err(ApiError::from)
}

/// Reads a response body as text.
pub async fn response_text(response: &Response) -> Result<String, ApiError> {
	let text = JsFuture::from(response.text()?).await?;
	text.as_string()
		.ok_or_else(|| ApiError::Decode("response body is not text".into()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn token_round_trip() {
		let tokens = TokenStorage::new(MemoryStore::default());
		assert_eq!(tokens.get_token(), None);
		tokens.save_token("abc.def.ghi").unwrap();
		assert_eq!(tokens.get_token().as_deref(), Some("abc.def.ghi"));
		tokens.remove_token().unwrap();
		assert_eq!(tokens.get_token(), None);
	}

	#[test]
	fn bearer_header_only_with_token() {
		let store = MemoryStore::default();
		let tokens = TokenStorage::new(store.clone());
		assert_eq!(tokens.bearer_header(), None);
		store.set(TOKEN_KEY, "t0k3n").unwrap();
		assert_eq!(tokens.bearer_header().as_deref(), Some("Bearer t0k3n"));
	}

	#[test]
	fn clones_share_the_store() {
		let store = MemoryStore::default();
		TokenStorage::new(store.clone()).save_token("x").unwrap();
		assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("x"));
	}
}
