use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use log::{debug, warn};

use crate::auth::validate::validate_signup;
use crate::auth::{AuthClient, TokenStorage};
use crate::components::auth_shell::{AuthBackdrop, FormAlert, GoogleIcon};
use crate::config::AppConfig;

#[component]
pub fn Signup() -> impl IntoView {
	let config = expect_context::<AppConfig>();
	let auth: AuthClient = AuthClient::new(TokenStorage::default(), config.auth_delay_ms);
	let navigate = use_navigate();

	let email = RwSignal::new(String::new());
	let password = RwSignal::new(String::new());
	let confirm = RwSignal::new(String::new());
	let error = RwSignal::new(None::<String>);
	let pending = RwSignal::new(false);

	let (auth_submit, navigate_submit) = (auth.clone(), navigate.clone());
	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		error.set(None);
		let (email, password, confirm) = (
			email.get_untracked(),
			password.get_untracked(),
			confirm.get_untracked(),
		);
		if let Err(err) = validate_signup(&email, &password, &confirm) {
			debug!("Signup form rejected: {}", err);
			error.set(Some(err.to_string()));
			return;
		}

		pending.set(true);
		let (auth, navigate) = (auth_submit.clone(), navigate_submit.clone());
		spawn_local(async move {
			match auth.sign_up(&email, &password, &confirm).await {
				Ok(_) => navigate("/", Default::default()),
				Err(err) => {
					warn!("Sign up failed: {}", err);
					error.set(Some(err.to_string()));
				}
			}
			pending.set(false);
		});
	};

	let on_google = move |_| {
		error.set(None);
		pending.set(true);
		let (auth, navigate) = (auth.clone(), navigate.clone());
		spawn_local(async move {
			match auth.sign_in_with_provider("google").await {
				Ok(_) => navigate("/", Default::default()),
				Err(err) => {
					warn!("Google sign up failed: {}", err);
					error.set(Some(err.to_string()));
				}
			}
			pending.set(false);
		});
	};

	view! {
		<div class="auth-page">
			<AuthBackdrop />
			<div class="auth-card">
				<h2>"Sign Up"</h2>
				<FormAlert message=error />
				<form on:submit=on_submit novalidate>
					<label for="email">"Email"</label>
					<input
						type="email"
						id="email"
						placeholder="Enter your email"
						bind:value=email
						disabled=move || pending.get()
					/>
					<label for="password">"Password"</label>
					<input
						type="password"
						id="password"
						placeholder="Enter your password"
						bind:value=password
						disabled=move || pending.get()
					/>
					<label for="confirmPassword">"Confirm Password"</label>
					<input
						type="password"
						id="confirmPassword"
						placeholder="Confirm your password"
						bind:value=confirm
						disabled=move || pending.get()
					/>
					<button type="submit" class="btn btn-primary" disabled=move || pending.get()>
						{move || if pending.get() { "Signing up..." } else { "Sign Up" }}
					</button>
				</form>
				<div class="auth-divider">
					<span>"Or continue with"</span>
				</div>
				<button class="btn btn-provider" on:click=on_google disabled=move || pending.get()>
					<GoogleIcon />
					{move || if pending.get() { "Redirecting..." } else { "Sign up with Google" }}
				</button>
				<p class="auth-legal">
					"By signing up, you agree to our Terms of Service and Privacy Policy."
				</p>
				<p class="auth-switch">
					"Already have an account? "
					<A href="/login">"Log in"</A>
				</p>
			</div>
		</div>
	}
}
