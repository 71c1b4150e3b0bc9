//! Token storage, form validation and the placeholder sign-in client.

pub mod client;
pub mod token;
pub mod validate;

pub use client::{AuthClient, Session};
pub use token::{BrowserStorage, KeyValueStore, MemoryStore, TokenStorage, authenticated_fetch};
pub use validate::FormError;
