//! Dialog for filing a machine's maintenance report.

use std::rc::Rc;

use leptos::html::Input;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};
use web_sys::HtmlInputElement;

use super::toast::{Notify, Toast, Toasts};
use crate::api::{Backend, ProductionService, ReportFile, ReportSubmission};

/// File types the upload picker offers.
pub const ACCEPTED_REPORT_TYPES: &str = ".pdf,.doc,.docx,application/msword,application/vnd.openxmlformats-officedocument.wordprocessingml.document,.xls,.xlsx,application/vnd.ms-excel,application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The machine the dialog is open for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportTarget {
	pub machine_id: String,
	pub machine_name: Option<String>,
}

impl ReportTarget {
	fn label(&self) -> String {
		match &self.machine_name {
			Some(name) => name.clone(),
			None => format!("Machine ID: {}", self.machine_id),
		}
	}
}

/// Validates the selection and announces the upload. `None` means nothing
/// should be sent.
pub fn prepare_upload(
	target: Option<&ReportTarget>,
	file: Option<&ReportFile>,
	now: &str,
	notify: &impl Notify,
) -> Option<ReportSubmission> {
	let (Some(target), Some(file)) = (target.filter(|t| !t.machine_id.is_empty()), file) else {
		notify.notify(Toast::destructive(
			"Upload Error",
			"No file selected or machine ID missing.",
		));
		return None;
	};

	notify.notify(Toast::new(
		"Processing Report...",
		format!("Uploading \"{}\" for {}.", file.name, target.label()),
	));

	Some(ReportSubmission {
		machine_id: target.machine_id.clone(),
		machine_name: target
			.machine_name
			.clone()
			.unwrap_or_else(|| "Unknown Machine".to_string()),
		file: file.clone(),
		submitted_at: now.to_string(),
	})
}

/// Sends the report and toasts the outcome. Returns whether it went through.
pub async fn submit_report<S, N>(service: &S, submission: &ReportSubmission, notify: &N) -> bool
where
	S: ProductionService,
	N: Notify,
{
	match service.submit_report(submission).await {
		Ok(outcome) if outcome.success => {
			info!("Report for {} accepted", submission.machine_id);
			let message = non_empty(outcome.message).unwrap_or_else(|| {
				format!(
					"\"{}\" has been processed for {}.",
					submission.file.name, submission.machine_name
				)
			});
			notify.notify(Toast::success("Report Uploaded Successfully", message));
			true
		}
		Ok(outcome) => {
			let message = non_empty(outcome.message).unwrap_or_else(|| {
				format!(
					"Could not process \"{}\". Please try again.",
					submission.file.name
				)
			});
			notify.notify(Toast::destructive("Upload Failed", message));
			false
		}
		Err(err) => {
			error!("Error submitting report: {}", err);
			notify.notify(Toast::destructive(
				"Upload Error",
				"An unexpected error occurred. Please try again.",
			));
			false
		}
	}
}

/// The manual form path; not built yet.
pub fn fill_report_manually(target: Option<&ReportTarget>, notify: &impl Notify) {
	let Some(target) = target else {
		return;
	};
	let name = target.machine_name.as_deref().unwrap_or("this machine");
	notify.notify(Toast::destructive(
		"Feature Not Available",
		format!("Report filling feature is not yet set up for {}.", name),
	));
}

/// The control that holds the picked file.
trait FilePicker {
	fn clear(&self);
}

impl FilePicker for HtmlInputElement {
	fn clear(&self) {
		self.set_value("");
	}
}

/// Forgets the chosen file. The picker is cleared too, otherwise choosing the
/// same file again fires no `change`.
fn clear_selection(selection: &mut Option<ReportFile>, picker: Option<&impl FilePicker>) {
	*selection = None;
	if let Some(picker) = picker {
		picker.clear();
	}
}

fn non_empty(message: String) -> Option<String> {
	(!message.trim().is_empty()).then_some(message)
}

#[component]
pub fn ReportDialog(
	/// Open while `Some`.
	target: RwSignal<Option<ReportTarget>>,
	/// Called with the machine id and timestamp of an accepted report.
	on_submitted: Rc<dyn Fn(&str, &str)>,
) -> impl IntoView {
	let service = expect_context::<Backend>();
	let toasts = expect_context::<Toasts>();
	let selected = RwSignal::new_local(None::<ReportFile>);
	let uploading = RwSignal::new(false);
	let file_input = NodeRef::<Input>::new();

	let close = move || {
		selected.update(|file| clear_selection(file, file_input.get_untracked().as_ref()));
		target.set(None);
	};

	let title = move || {
		let name = target
			.with(|t| t.as_ref().and_then(|t| t.machine_name.clone()))
			.unwrap_or_else(|| "Machine".to_string());
		format!("File Maintenance Report for {}", name)
	};

	let on_change = move |ev: web_sys::Event| {
		let input: HtmlInputElement = event_target(&ev);
		if let Some(file) = input.files().and_then(|files| files.get(0)) {
			selected.set(Some(ReportFile::from_file(file)));
		}
	};

	let on_choose = move |_| {
		if let Some(input) = file_input.get() {
			input.click();
		}
	};

	let on_upload = move |_| {
		let now = String::from(js_sys::Date::new_0().to_iso_string());
		let submission = selected.with_untracked(|file| {
			target.with_untracked(|t| prepare_upload(t.as_ref(), file.as_ref(), &now, &toasts))
		});
		let Some(submission) = submission else {
			return;
		};

		uploading.set(true);
		let (service, on_submitted) = (service.clone(), on_submitted.clone());
		spawn_local(async move {
			if submit_report(&service, &submission, &toasts).await {
				on_submitted(&submission.machine_id, &submission.submitted_at);
			}
			uploading.set(false);
			close();
		});
	};

	let on_fill = move |_| {
		target.with_untracked(|t| fill_report_manually(t.as_ref(), &toasts));
	};

	view! {
		<div class="dialog-backdrop" hidden=move || target.with(Option::is_none)>
			<div class="dialog" role="dialog" aria-modal="true">
				<header class="dialog-header">
					<h2 class="dialog-title">{title}</h2>
					<p class="dialog-description">
						"Choose how to submit the maintenance report for this machine."
					</p>
				</header>

				<section class="dialog-option">
					<h4>"Option 1: Upload Report File"</h4>
					<p class="hint">
						"Upload a PDF, DOCX, or Excel file containing the report details."
					</p>
					<button class="btn btn-outline" on:click=on_choose>
						{move || {
							selected
								.with(|file| file.as_ref().map(|f| format!("Selected: {}", f.name)))
								.unwrap_or_else(|| "Choose File to Upload".to_string())
						}}
					</button>
					<input
						node_ref=file_input
						type="file"
						class="hidden"
						accept=ACCEPTED_REPORT_TYPES
						on:change=on_change
					/>
					<button
						class="btn btn-primary"
						hidden=move || selected.with(Option::is_none)
						disabled=move || uploading.get()
						on:click=on_upload
					>
						{move || {
							selected
								.with(|file| file.as_ref().map(|f| format!("Upload \"{}\"", f.name)))
								.unwrap_or_default()
						}}
					</button>
				</section>

				<div class="dialog-divider">
					<span>"Or"</span>
				</div>

				<section class="dialog-option">
					<h4>"Option 2: Fill Report Manually"</h4>
					<p class="hint">
						"Enter the report details directly into a form (feature coming soon)."
					</p>
					<button class="btn btn-outline" on:click=on_fill>
						"Fill Report Form"
					</button>
				</section>

				<footer class="dialog-footer">
					<button class="btn btn-ghost" on:click=move |_| close()>
						"Cancel"
					</button>
				</footer>
			</div>
		</div>
	}
}
