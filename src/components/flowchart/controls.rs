use leptos::prelude::*;

use super::component::FlowchartHandle;

/// Zoom, fit, recenter and layer toggles overlaid on the canvas.
#[component]
pub fn FlowchartControls(
	handle: FlowchartHandle,
	show_grid: RwSignal<bool>,
	show_minimap: RwSignal<bool>,
) -> impl IntoView {
	let (zoom_in, zoom_out, fit, recenter) =
		(handle.clone(), handle.clone(), handle.clone(), handle);

	view! {
		<div class="flowchart-controls">
			<button
				type="button"
				title="Zoom In"
				on:click=move |_| zoom_in.borrow_mut().zoom_in()
			>
				"+"
			</button>
			<button
				type="button"
				title="Zoom Out"
				on:click=move |_| zoom_out.borrow_mut().zoom_out()
			>
				"−"
			</button>
			<button
				type="button"
				title="Fit View"
				on:click=move |_| fit.borrow_mut().fit()
			>
				"⤢"
			</button>
			<button
				type="button"
				title="Reset View"
				on:click=move |_| recenter.borrow_mut().recenter()
			>
				"⟲"
			</button>
			<button
				type="button"
				title="Toggle Grid"
				class:active=move || show_grid.get()
				on:click=move |_| show_grid.update(|v| *v = !*v)
			>
				"#"
			</button>
			<button
				type="button"
				title="Toggle Minimap"
				class:active=move || show_minimap.get()
				on:click=move |_| show_minimap.update(|v| *v = !*v)
			>
				"▣"
			</button>
		</div>
	}
}
