//! Tunables shared through Leptos context.

use crate::components::flowchart::ViewSettings;

/// Delays, odds and view limits for the app. `App` provides the defaults as
/// context; the only build-time input is `LINE_FLOW_API_BASE`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
	/// Backend root for the HTTP service; `None` uses the built-in placeholder data.
	pub api_base_url: Option<String>,
	/// Line shown when the URL has no `?line=`.
	pub default_line_id: String,
	/// Simulated latency of a layout fetch.
	pub fetch_delay_ms: u32,
	/// Simulated latency of a report upload.
	pub submit_delay_ms: u32,
	/// Simulated latency of sign-in, sign-up and sign-out.
	pub auth_delay_ms: u32,
	/// Chance that a simulated report submission succeeds.
	pub submit_success_rate: f64,
	/// How long a toast stays up before dismissing itself.
	pub toast_duration_ms: u32,
	/// Zoom limits and grid snapping for the flowchart.
	pub view: ViewSettings,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: option_env!("LINE_FLOW_API_BASE").map(str::to_string),
			default_line_id: "line-1".to_string(),
			fetch_delay_ms: 1_000,
			submit_delay_ms: 1_500,
			auth_delay_ms: 800,
			submit_success_rate: 0.9,
			toast_duration_ms: 5_000,
			view: ViewSettings::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_placeholder_timings() {
		let config = AppConfig::default();
		assert_eq!(config.default_line_id, "line-1");
		assert_eq!(config.fetch_delay_ms, 1_000);
		assert_eq!(config.submit_delay_ms, 1_500);
		assert_eq!(config.view.max_zoom, 4.0);
		assert_eq!(config.view.snap_grid, 15.0);
	}
}
