//! `ProductionService` over HTTP, for builds configured with a backend URL.

use log::{debug, info};
use serde::Deserialize;
use wasm_bindgen::JsValue;
use web_sys::FormData;

use super::{ProductionService, ReportSubmission, SubmitOutcome};
use crate::auth::token::response_text;
use crate::auth::{BrowserStorage, KeyValueStore, TokenStorage, authenticated_fetch};
use crate::components::flowchart::Layout;
use crate::error::ApiError;

#[derive(Clone, Debug)]
pub struct HttpService<S = BrowserStorage> {
	base_url: String,
	tokens: TokenStorage<S>,
}

#[derive(Deserialize)]
struct Reply {
	#[serde(default)]
	message: Option<String>,
}

/// Reads a report endpoint reply. The body's `message` wins when present.
pub fn outcome_from_reply(ok: bool, body: &str) -> SubmitOutcome {
	let message = serde_json::from_str::<Reply>(body)
		.ok()
		.and_then(|reply| reply.message)
		.filter(|message| !message.trim().is_empty());
	let fallback = if ok {
		"Report submitted successfully"
	} else {
		"Failed to submit report"
	};
	SubmitOutcome {
		success: ok,
		message: message.unwrap_or_else(|| fallback.to_string()),
	}
}

impl<S: KeyValueStore> HttpService<S> {
	pub fn new(base_url: &str, tokens: TokenStorage<S>) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			tokens,
		}
	}

	pub fn layout_url(&self, line_id: &str) -> String {
		format!("{}/api/production-lines/{}", self.base_url, line_id)
	}

	pub fn report_url(&self, machine_id: &str) -> String {
		format!("{}/api/machines/{}/reports", self.base_url, machine_id)
	}
}

impl<S: KeyValueStore> ProductionService for HttpService<S> {
	async fn fetch_layout(&self, line_id: &str) -> Result<Layout, ApiError> {
		let url = self.layout_url(line_id);
		debug!("GET {}", url);
		let response = authenticated_fetch(&self.tokens, "GET", &url, None).await?;
		if !response.ok() {
			return Err(ApiError::Network(format!(
				"Failed to fetch production line data for {} (HTTP {})",
				line_id,
				response.status()
			)));
		}
		let body = response_text(&response).await?;
		Ok(serde_json::from_str(&body)?)
	}

	async fn submit_report(&self, submission: &ReportSubmission) -> Result<SubmitOutcome, ApiError> {
		let form = FormData::new()?;
		if let Some(file) = &submission.file.blob {
			form.append_with_blob_and_filename("reportFile", file, &submission.file.name)?;
		}
		form.append_with_str("machineName", &submission.machine_name)?;
		form.append_with_str("submissionTimestamp", &submission.submitted_at)?;

		let url = self.report_url(&submission.machine_id);
		info!("POST {} ({})", url, submission.file.name);
		let body: &JsValue = form.as_ref();
		let response = authenticated_fetch(&self.tokens, "POST", &url, Some(body)).await?;
		let body = response_text(&response).await.unwrap_or_default();
		Ok(outcome_from_reply(response.ok(), &body))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::auth::MemoryStore;

	#[test]
	fn urls_ignore_trailing_slash() {
		let svc = HttpService::new("https://plant.example/", TokenStorage::new(MemoryStore::default()));
		assert_eq!(
			svc.layout_url("line-1"),
			"https://plant.example/api/production-lines/line-1"
		);
		assert_eq!(
			svc.report_url("machine-A"),
			"https://plant.example/api/machines/machine-A/reports"
		);
	}

	#[test]
	fn reply_message_is_preferred() {
		let outcome = outcome_from_reply(true, r#"{"message":"Queued for review"}"#);
		assert_eq!(
			outcome,
			SubmitOutcome {
				success: true,
				message: "Queued for review".into()
			}
		);
	}

	#[test]
	fn unreadable_error_body_gets_generic_message() {
		let outcome = outcome_from_reply(false, "<html>502</html>");
		assert!(!outcome.success);
		assert_eq!(outcome.message, "Failed to submit report");

		let outcome = outcome_from_reply(true, "");
		assert_eq!(outcome.message, "Report submitted successfully");
	}
}
