//! Error types shared by the service, storage and auth layers.

use thiserror::Error;

use crate::auth::validate::FormError;

/// Browser storage failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
	/// No `window.localStorage` (non-browser host or disabled by the user)
	#[error("browser storage is unavailable")]
	Unavailable,

	/// The storage call itself threw
	#[error("storage error: {0}")]
	Js(String),
}

/// Failures talking to the production line backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
	#[error("network error: {0}")]
	Network(String),

	#[error("could not decode response: {0}")]
	Decode(String),

	#[error(transparent)]
	Storage(#[from] StorageError),
}

/// Failures from the auth client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
	#[error(transparent)]
	Validation(#[from] FormError),

	#[error("unsupported provider: {0}")]
	UnsupportedProvider(String),

	#[error(transparent)]
	Storage(#[from] StorageError),
}

impl From<wasm_bindgen::JsValue> for StorageError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		StorageError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
	}
}

impl From<wasm_bindgen::JsValue> for ApiError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		ApiError::Network(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
	}
}

impl From<serde_json::Error> for ApiError {
	fn from(err: serde_json::Error) -> Self {
		ApiError::Decode(err.to_string())
	}
}
