//! In-browser stand-in for the production line backend.

use log::{info, warn};
use rand::Rng;

use super::{ProductionService, ReportSubmission, SubmitOutcome, fixtures, simulated_delay};
use crate::auth::{BrowserStorage, KeyValueStore, TokenStorage};
use crate::components::flowchart::Layout;
use crate::config::AppConfig;
use crate::error::ApiError;

/// Characters of the token shown in logs.
const TOKEN_PREVIEW_LEN: usize = 15;

/// Whether one simulated submission goes through.
pub fn simulated_success<R: Rng + ?Sized>(rng: &mut R, success_rate: f64) -> bool {
	if success_rate.is_nan() {
		return false;
	}
	rng.gen_bool(success_rate.clamp(0.0, 1.0))
}

#[derive(Clone, Debug)]
pub struct PlaceholderService<S = BrowserStorage> {
	tokens: TokenStorage<S>,
	fetch_delay_ms: u32,
	submit_delay_ms: u32,
	success_rate: f64,
}

impl<S: KeyValueStore> PlaceholderService<S> {
	pub fn new(tokens: TokenStorage<S>, config: &AppConfig) -> Self {
		Self {
			tokens,
			fetch_delay_ms: config.fetch_delay_ms,
			submit_delay_ms: config.submit_delay_ms,
			success_rate: config.submit_success_rate,
		}
	}

	fn token_preview(&self) -> String {
		match self.tokens.get_token() {
			Some(token) => {
				let head: String = token.chars().take(TOKEN_PREVIEW_LEN).collect();
				format!("{}...", head)
			}
			None => "none".to_string(),
		}
	}
}

impl<S: KeyValueStore> ProductionService for PlaceholderService<S> {
	async fn fetch_layout(&self, line_id: &str) -> Result<Layout, ApiError> {
		info!(
			"Fetching production line '{}' (placeholder, token: {})",
			line_id,
			self.token_preview()
		);
		simulated_delay(self.fetch_delay_ms).await;

		Ok(fixtures::line_layout(line_id).unwrap_or_else(|| {
			warn!("No placeholder data for production line '{}'", line_id);
			Layout::default()
		}))
	}

	async fn submit_report(&self, submission: &ReportSubmission) -> Result<SubmitOutcome, ApiError> {
		info!(
			"Submitting report for machine {} (placeholder, token: {}): {}",
			submission.machine_id,
			self.token_preview(),
			serde_json::to_string(submission)?
		);
		simulated_delay(self.submit_delay_ms).await;

		let machine_id = &submission.machine_id;
		Ok(if simulated_success(&mut rand::thread_rng(), self.success_rate) {
			SubmitOutcome {
				success: true,
				message: format!("Report for machine {} submitted successfully (simulated).", machine_id),
			}
		} else {
			SubmitOutcome {
				success: false,
				message: format!("Failed to submit report for machine {} (simulated error).", machine_id),
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::api::ReportFile;
	use crate::auth::MemoryStore;

	fn service(success_rate: f64) -> PlaceholderService<MemoryStore> {
		let config = AppConfig {
			fetch_delay_ms: 0,
			submit_delay_ms: 0,
			submit_success_rate: success_rate,
			..AppConfig::default()
		};
		PlaceholderService::new(TokenStorage::new(MemoryStore::default()), &config)
	}

	fn submission() -> ReportSubmission {
		ReportSubmission {
			machine_id: "machine-A".into(),
			machine_name: "CNC Mill A-1".into(),
			file: ReportFile::new("april.pdf", 2048, "application/pdf"),
			submitted_at: "2024-08-01T09:30:00.000Z".into(),
		}
	}

	#[test]
	fn line_1_has_two_machines() {
		let layout = block_on(service(0.9).fetch_layout("line-1")).unwrap();
		assert_eq!(layout.nodes.len(), 2);
		assert_eq!(layout.nodes[0].data.name, "CNC Mill A-1 (API Loaded)");
		assert_eq!(layout.edges[0].id, "eA-B");
	}

	#[test]
	fn unknown_line_is_empty_not_an_error() {
		let layout = block_on(service(0.9).fetch_layout("line-404")).unwrap();
		assert!(layout.is_empty());
	}

	#[test]
	fn submit_messages_name_the_machine() {
		let ok = block_on(service(1.0).submit_report(&submission())).unwrap();
		assert!(ok.success);
		assert_eq!(
			ok.message,
			"Report for machine machine-A submitted successfully (simulated)."
		);

		let failed = block_on(service(0.0).submit_report(&submission())).unwrap();
		assert!(!failed.success);
		assert_eq!(
			failed.message,
			"Failed to submit report for machine machine-A (simulated error)."
		);
	}

	#[test]
	fn success_rate_is_roughly_honoured() {
		let mut rng = StdRng::seed_from_u64(7);
		let wins = (0..10_000)
			.filter(|_| simulated_success(&mut rng, 0.9))
			.count();
		assert!((8_700..=9_300).contains(&wins), "{wins}");
	}

	#[test]
	fn out_of_range_rates_are_clamped() {
		let mut rng = StdRng::seed_from_u64(1);
		assert!(simulated_success(&mut rng, 3.0));
		assert!(!simulated_success(&mut rng, -1.0));
		assert!(!simulated_success(&mut rng, f64::NAN));
	}

	#[test]
	fn token_preview_is_truncated() {
		let svc = service(0.9);
		assert_eq!(svc.token_preview(), "none");
		svc.tokens.save_token("eyJhbGciOiJIUzI1NiJ9.payload.sig").unwrap();
		assert_eq!(svc.token_preview(), "eyJhbGciOiJIUzI...");
	}
}
