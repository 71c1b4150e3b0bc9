use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::components::A;

use crate::components::flowchart::Theme;
use crate::components::production::ProductionFlowchart;

#[component]
pub fn Production() -> impl IntoView {
	let theme = expect_context::<RwSignal<Theme>>();

	view! {
		<Title text="Production Flowchart" />
		<div class="production-page">
			<header class="page-header">
				<A href="/">"←"</A>
				<h1>"Production Flowchart"</h1>
				<button
					type="button"
					class="btn btn-ghost theme-toggle"
					title="Toggle theme"
					on:click=move |_| theme.update(|t| *t = t.toggled())
				>
					{move || match theme.get() {
						Theme::Light => "☾",
						Theme::Dark => "☀",
					}}
				</button>
			</header>
			<div class="production-body">
				<ProductionFlowchart />
			</div>
		</div>
	}
}
