use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use log::warn;

use crate::auth::{AuthClient, TokenStorage};
use crate::config::AppConfig;

/// Landing page with links into the app.
#[component]
pub fn Home() -> impl IntoView {
	let config = expect_context::<AppConfig>();
	let auth: AuthClient = AuthClient::new(TokenStorage::default(), config.auth_delay_ms);
	let signed_in = RwSignal::new(auth.is_signed_in());
	let line = config.default_line_id;

	let on_sign_out = move |_| {
		let auth = auth.clone();
		spawn_local(async move {
			match auth.sign_out().await {
				Ok(()) => signed_in.set(false),
				Err(err) => warn!("Sign out failed: {}", err),
			}
		});
	};

	view! {
		<main class="home">
			<h1>"Line Flow"</h1>
			<p class="subtitle">
				"Machine status, health and maintenance reports for each production line."
			</p>
			<nav class="home-links">
				<A href=format!("/production?line={}", line)>"Open production flowchart"</A>
				<span hidden=move || signed_in.get()>
					<A href="/login">"Login"</A>
					" · "
					<A href="/signup">"Sign up"</A>
				</span>
			</nav>
			<button
				class="btn btn-ghost"
				hidden=move || !signed_in.get()
				on:click=on_sign_out
			>
				"Sign out"
			</button>
		</main>
	}
}
