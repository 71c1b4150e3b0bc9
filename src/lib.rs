//! Leptos client-side app wiring and routes.

use getrandom as _;
use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod api;
pub mod auth;
pub mod components;
pub mod config;
pub mod error;
mod pages;

use crate::api::Backend;
use crate::auth::TokenStorage;
use crate::components::flowchart::Theme;
use crate::components::toast::{Toaster, Toasts};
use crate::config::AppConfig;

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::login::Login;
use crate::pages::not_found::NotFound;
use crate::pages::production::Production;
use crate::pages::signup::Signup;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Theme the browser asks for through `prefers-color-scheme`.
fn preferred_theme() -> Theme {
	let dark = web_sys::window()
		.and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
		.is_some_and(|mq| mq.matches());
	if dark { Theme::Dark } else { Theme::Light }
}

/// Router for the landing, auth and production pages, with 404 fallback.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let config = AppConfig::default();
	let theme = RwSignal::new(preferred_theme());
	info!(
		"Starting with {} backend, theme {}",
		if config.api_base_url.is_some() { "HTTP" } else { "placeholder" },
		theme.get_untracked().as_str()
	);

	let backend: Backend = Backend::from_config(TokenStorage::default(), &config);
	provide_context(backend);
	provide_context(Toasts::new(config.toast_duration_ms));
	provide_context(theme);
	provide_context(config);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=move || theme.get().as_str() />

		// sets the document title
		<Title text="Line Flow" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/login") view=Login />
				<Route path=path!("/signup") view=Signup />
				<Route path=path!("/production") view=Production />
			</Routes>
		</Router>
		<Toaster />
	}
}
