//! Transient notifications in the corner of the screen.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastVariant {
	#[default]
	Default,
	Success,
	Destructive,
}

impl ToastVariant {
	fn class(self) -> &'static str {
		match self {
			ToastVariant::Default => "toast",
			ToastVariant::Success => "toast toast-success",
			ToastVariant::Destructive => "toast toast-destructive",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
	pub title: String,
	pub description: String,
	pub variant: ToastVariant,
}

impl Toast {
	pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			description: description.into(),
			variant: ToastVariant::Default,
		}
	}

	pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			variant: ToastVariant::Success,
			..Self::new(title, description)
		}
	}

	pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			variant: ToastVariant::Destructive,
			..Self::new(title, description)
		}
	}
}

/// Anything that can show a toast.
pub trait Notify {
	fn notify(&self, toast: Toast);
}

/// Toast queue shared through context. Each toast removes itself after
/// `duration_ms`.
#[derive(Clone, Copy)]
pub struct Toasts {
	entries: RwSignal<Vec<(u64, Toast)>>,
	next_id: RwSignal<u64>,
	duration_ms: u32,
}

impl Toasts {
	pub fn new(duration_ms: u32) -> Self {
		Self {
			entries: RwSignal::new(Vec::new()),
			next_id: RwSignal::new(0),
			duration_ms,
		}
	}

	pub fn dismiss(&self, id: u64) {
		self.entries.update(|entries| entries.retain(|(i, _)| *i != id));
	}
}

impl Notify for Toasts {
	fn notify(&self, toast: Toast) {
		if toast.variant == ToastVariant::Destructive {
			error!("{}: {}", toast.title, toast.description);
		} else {
			debug!("{}: {}", toast.title, toast.description);
		}

		let id = self.next_id.get_untracked();
		self.next_id.set(id + 1);
		self.entries.update(|entries| entries.push((id, toast)));

		let (toasts, duration) = (*self, self.duration_ms);
		spawn_local(async move {
			TimeoutFuture::new(duration).await;
			toasts.dismiss(id);
		});
	}
}

/// Renders the toasts from context.
#[component]
pub fn Toaster() -> impl IntoView {
	let toasts = expect_context::<Toasts>();

	view! {
		<div class="toaster" role="status" aria-live="polite">
			<For
				each=move || toasts.entries.get()
				key=|(id, _)| *id
				children=move |(id, toast)| {
					view! {
						<div class=toast.variant.class()>
							<div class="toast-body">
								<p class="toast-title">{toast.title}</p>
								<p class="toast-description">{toast.description}</p>
							</div>
							<button
								class="toast-close"
								aria-label="Dismiss"
								on:click=move |_| toasts.dismiss(id)
							>
								"×"
							</button>
						</div>
					}
				}
			/>
		</div>
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use std::cell::RefCell;

	use super::{Notify, Toast};

	/// Keeps every toast it is given.
	#[derive(Default)]
	pub struct RecordedToasts(RefCell<Vec<Toast>>);

	impl RecordedToasts {
		pub fn titles(&self) -> Vec<String> {
			self.0.borrow().iter().map(|t| t.title.clone()).collect()
		}

		pub fn all(&self) -> Vec<Toast> {
			self.0.borrow().clone()
		}
	}

	impl Notify for RecordedToasts {
		fn notify(&self, toast: Toast) {
			self.0.borrow_mut().push(toast);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn constructors_set_variant() {
		assert_eq!(Toast::new("a", "b").variant, ToastVariant::Default);
		assert_eq!(Toast::success("a", "b").variant, ToastVariant::Success);
		let t = Toast::destructive("Upload Error", "No file selected or machine ID missing.");
		assert_eq!(t.variant, ToastVariant::Destructive);
		assert_eq!(t.title, "Upload Error");
	}

	#[test]
	fn variant_classes() {
		assert_eq!(ToastVariant::Destructive.class(), "toast toast-destructive");
		assert_eq!(ToastVariant::Default.class(), "toast");
	}
}
