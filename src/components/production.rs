//! The production line page body: loads a layout into the flowchart and
//! wires the report dialog to its cards.

use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use log::{debug, error, info, warn};

use super::flowchart::{FlowchartCanvas, FlowchartControls, FlowchartHandle, Layout};
use super::report_dialog::{ReportDialog, ReportTarget};
use super::toast::{Notify, Toast, Toasts};
use crate::api::{Backend, ProductionService, fixtures};
use crate::config::AppConfig;

/// What a finished load puts on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedLine {
	pub layout: Layout,
	/// Whether the cards offer "File Report"; off for the fallback layout.
	pub report_action: bool,
}

/// Numbers each load so a slow response can't overwrite a newer one.
#[derive(Debug, Default)]
pub struct LoadGeneration(Cell<u64>);

impl LoadGeneration {
	pub fn begin(&self) -> u64 {
		let next = self.0.get() + 1;
		self.0.set(next);
		next
	}

	pub fn is_current(&self, generation: u64) -> bool {
		self.0.get() == generation
	}
}

/// Fetches a line, falling back to the bundled default layout on failure.
pub async fn load_line<S, N>(service: &S, line_id: &str, notify: &N) -> LoadedLine
where
	S: ProductionService,
	N: Notify,
{
	match service.fetch_layout(line_id).await {
		Ok(layout) => {
			info!(
				"Production line '{}' fetched: {} nodes, {} edges",
				line_id,
				layout.nodes.len(),
				layout.edges.len()
			);
			LoadedLine {
				layout,
				report_action: true,
			}
		}
		Err(err) => {
			error!("Failed to load production line '{}': {}", line_id, err);
			notify.notify(Toast::destructive(
				"Could Not Load Production Line",
				format!("Showing the default layout instead. ({})", err),
			));
			LoadedLine {
				layout: fixtures::default_layout(),
				report_action: false,
			}
		}
	}
}

/// Looks up the card a "File Report" click came from.
pub fn report_target(handle: &FlowchartHandle, machine_id: &str, notify: &impl Notify) -> Option<ReportTarget> {
	match handle.borrow().node_data(machine_id) {
		Some(data) => Some(ReportTarget {
			machine_id: machine_id.to_string(),
			machine_name: (!data.name.trim().is_empty()).then(|| data.name.clone()),
		}),
		None => {
			warn!("File report requested for unknown machine '{}'", machine_id);
			notify.notify(Toast::destructive(
				"Machine Not Found",
				format!("Could not find machine {} on this line.", machine_id),
			));
			None
		}
	}
}

#[component]
pub fn ProductionFlowchart() -> impl IntoView {
	let config = expect_context::<AppConfig>();
	let service = expect_context::<Backend>();
	let toasts = expect_context::<Toasts>();
	let query = use_query_map();

	let default_line = config.default_line_id.clone();
	let line_id = Memo::new(move |_| {
		query
			.with(|q| q.get("line"))
			.filter(|id| !id.trim().is_empty())
			.unwrap_or_else(|| default_line.clone())
	});

	let handle = FlowchartHandle::new(config.view);
	let loading = RwSignal::new(true);
	let show_grid = RwSignal::new(true);
	let show_minimap = RwSignal::new(true);
	let dialog_target = RwSignal::new(None::<ReportTarget>);
	let generation = Rc::new(LoadGeneration::default());

	let handle_load = handle.clone();
	Effect::new(move |_| {
		let line_id = line_id.get();
		let current = generation.begin();
		let (handle, generation, service) = (handle_load.clone(), generation.clone(), service.clone());
		loading.set(true);
		spawn_local(async move {
			let loaded = load_line(&service, &line_id, &toasts).await;
			if !generation.is_current(current) {
				debug!("Discarding stale load of '{}'", line_id);
				return;
			}
			{
				let mut s = handle.borrow_mut();
				s.report_action = loaded.report_action;
				s.load(&loaded.layout);
			}
			loading.set(false);
		});
	});

	let handle_report = handle.clone();
	let on_file_report: Rc<dyn Fn(String)> = Rc::new(move |machine_id: String| {
		if let Some(target) = report_target(&handle_report, &machine_id, &toasts) {
			debug!("Opening report dialog for {}", target.machine_id);
			dialog_target.set(Some(target));
		}
	});

	let handle_submitted = handle.clone();
	let on_submitted: Rc<dyn Fn(&str, &str)> = Rc::new(move |machine_id: &str, submitted_at: &str| {
		if !handle_submitted.borrow_mut().mark_reported(machine_id, submitted_at) {
			warn!("Report filed for '{}' but the machine is no longer shown", machine_id);
		}
	});

	view! {
		<div class="flowchart-shell">
			<FlowchartCanvas
				handle=handle.clone()
				show_grid=show_grid
				show_minimap=show_minimap
				on_file_report=on_file_report
			/>
			<FlowchartControls handle=handle show_grid=show_grid show_minimap=show_minimap />
			<div class="flowchart-loading" hidden=move || !loading.get()>
				"Loading production line..."
			</div>
		</div>
		<ReportDialog target=dialog_target on_submitted=on_submitted />
	}
}

#[cfg(test)]
mod tests {
	use futures::executor::block_on;

	use super::*;
	use crate::api::{ReportSubmission, SubmitOutcome};
	use crate::components::flowchart::{MachineNode, MachineNodeData, Position, ViewSettings};
	use crate::components::toast::testing::RecordedToasts;
	use crate::error::ApiError;

	struct FailingService;

	impl ProductionService for FailingService {
		async fn fetch_layout(&self, _line_id: &str) -> Result<Layout, ApiError> {
			Err(ApiError::Network("503".into()))
		}

		async fn submit_report(&self, _submission: &ReportSubmission) -> Result<SubmitOutcome, ApiError> {
			Err(ApiError::Network("503".into()))
		}
	}

	struct FixedService(Layout);

	impl ProductionService for FixedService {
		async fn fetch_layout(&self, _line_id: &str) -> Result<Layout, ApiError> {
			Ok(self.0.clone())
		}

		async fn submit_report(&self, _submission: &ReportSubmission) -> Result<SubmitOutcome, ApiError> {
			unreachable!()
		}
	}

	fn machine(id: &str, name: &str) -> MachineNode {
		MachineNode {
			id: id.into(),
			position: Some(Position::new(0.0, 0.0)),
			data: MachineNodeData {
				name: name.into(),
				..Default::default()
			},
		}
	}

	#[test]
	fn failed_load_falls_back_with_toast() {
		let toasts = RecordedToasts::default();
		let loaded = block_on(load_line(&FailingService, "line-1", &toasts));
		assert_eq!(loaded.layout, fixtures::default_layout());
		assert!(!loaded.report_action);
		assert_eq!(toasts.titles(), ["Could Not Load Production Line"]);
	}

	#[test]
	fn successful_load_enables_reports() {
		let toasts = RecordedToasts::default();
		let layout = Layout {
			nodes: vec![machine("m-1", "Press")],
			edges: vec![],
		};
		let loaded = block_on(load_line(&FixedService(layout.clone()), "line-1", &toasts));
		assert_eq!(loaded.layout, layout);
		assert!(loaded.report_action);
		assert!(toasts.all().is_empty());
	}

	#[test]
	fn empty_line_is_still_a_success() {
		let toasts = RecordedToasts::default();
		let loaded = block_on(load_line(&FixedService(Layout::default()), "nowhere", &toasts));
		assert!(loaded.layout.is_empty());
		assert!(loaded.report_action);
	}

	#[test]
	fn only_latest_generation_is_current() {
		let generation = LoadGeneration::default();
		let first = generation.begin();
		let second = generation.begin();
		assert!(!generation.is_current(first));
		assert!(generation.is_current(second));
	}

	#[test]
	fn report_target_for_known_and_unknown_machines() {
		let handle = FlowchartHandle::new(ViewSettings::default());
		handle.borrow_mut().load(&Layout {
			nodes: vec![machine("m-1", "Press"), machine("m-2", "")],
			edges: vec![],
		});
		let toasts = RecordedToasts::default();

		let target = report_target(&handle, "m-1", &toasts).unwrap();
		assert_eq!(target.machine_name.as_deref(), Some("Press"));
		assert_eq!(report_target(&handle, "m-2", &toasts).unwrap().machine_name, None);
		assert!(toasts.all().is_empty());

		assert!(report_target(&handle, "ghost", &toasts).is_none());
		assert_eq!(toasts.titles(), ["Machine Not Found"]);
	}
}
