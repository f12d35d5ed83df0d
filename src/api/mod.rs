//! # API Module
//!
//! HTTP handlers served by the local callback server during login.
//!
//! - [`callback`] - receives Spotify's redirect after the user grants access,
//!   checks the `state` value and stores the authorization code for the
//!   waiting login flow.
//! - [`health`] - returns status and version, handy for checking the server
//!   is reachable at the configured redirect address.

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
