//! Production line data: the service seam, its payloads and the two backends.

pub mod fixtures;
pub mod http;
pub mod placeholder;

use gloo_timers::future::TimeoutFuture;
use serde::{Deserialize, Serialize};

use crate::auth::{BrowserStorage, KeyValueStore, TokenStorage};
use crate::components::flowchart::Layout;
use crate::config::AppConfig;
use crate::error::ApiError;

pub use http::HttpService;
pub use placeholder::PlaceholderService;

/// Result of a report submission as the backend reports it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
	pub success: bool,
	pub message: String,
}

/// The file picked in the report dialog.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportFile {
	pub name: String,
	pub size: u64,
	pub mime: String,
	/// Browser handle, absent in tests.
	#[serde(skip)]
	pub blob: Option<web_sys::File>,
}

impl ReportFile {
	pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			size,
			mime: mime.into(),
			blob: None,
		}
	}

	pub fn from_file(file: web_sys::File) -> Self {
		Self {
			name: file.name(),
			size: file.size() as u64,
			mime: file.type_(),
			blob: Some(file),
		}
	}
}

/// One maintenance report upload.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
	pub machine_id: String,
	pub machine_name: String,
	pub file: ReportFile,
	/// ISO-8601, taken when the upload was confirmed.
	pub submitted_at: String,
}

/// Backend for production line layouts and maintenance reports.
#[allow(async_fn_in_trait)]
pub trait ProductionService {
	/// Unknown line ids yield an empty layout rather than an error.
	async fn fetch_layout(&self, line_id: &str) -> Result<Layout, ApiError>;

	async fn submit_report(&self, submission: &ReportSubmission) -> Result<SubmitOutcome, ApiError>;
}

/// The service the app actually talks to, chosen from [`AppConfig`].
#[derive(Clone, Debug)]
pub enum Backend<S = BrowserStorage> {
	Placeholder(PlaceholderService<S>),
	Http(HttpService<S>),
}

impl<S: KeyValueStore> Backend<S> {
	pub fn from_config(tokens: TokenStorage<S>, config: &AppConfig) -> Self {
		match &config.api_base_url {
			Some(base) => Backend::Http(HttpService::new(base, tokens)),
			None => Backend::Placeholder(PlaceholderService::new(tokens, config)),
		}
	}
}

impl<S: KeyValueStore> ProductionService for Backend<S> {
	async fn fetch_layout(&self, line_id: &str) -> Result<Layout, ApiError> {
		match self {
			Backend::Placeholder(service) => service.fetch_layout(line_id).await,
			Backend::Http(service) => service.fetch_layout(line_id).await,
		}
	}

	async fn submit_report(&self, submission: &ReportSubmission) -> Result<SubmitOutcome, ApiError> {
		match self {
			Backend::Placeholder(service) => service.submit_report(submission).await,
			Backend::Http(service) => service.submit_report(submission).await,
		}
	}
}

/// Waits `ms` milliseconds on the browser event loop; zero returns at once.
pub async fn simulated_delay(ms: u32) {
	if ms > 0 {
		TimeoutFuture::new(ms).await;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::auth::MemoryStore;

	#[test]
	fn backend_follows_api_base() {
		let tokens = TokenStorage::new(MemoryStore::default());
		let config = AppConfig {
			api_base_url: None,
			..AppConfig::default()
		};
		assert!(matches!(
			Backend::from_config(tokens.clone(), &config),
			Backend::Placeholder(_)
		));

		let config = AppConfig {
			api_base_url: Some("https://plant.example".into()),
			..AppConfig::default()
		};
		assert!(matches!(
			Backend::from_config(tokens, &config),
			Backend::Http(_)
		));
	}

	#[test]
	fn submission_serializes_without_the_blob() {
		let submission = ReportSubmission {
			machine_id: "m-1".into(),
			machine_name: "Press".into(),
			file: ReportFile::new("r.pdf", 12, "application/pdf"),
			submitted_at: "2024-08-01T09:30:00.000Z".into(),
		};
		let json = serde_json::to_value(&submission).unwrap();
		assert_eq!(json["machineName"], "Press");
		assert_eq!(json["file"]["size"], 12);
		assert!(json["file"].get("blob").is_none());
	}
}
