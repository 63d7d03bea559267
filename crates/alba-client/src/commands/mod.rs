//! Command handlers invoked by the presentation layer.
//!
//! Each sub-module groups related commands by domain. Commands take the
//! [`AppState`](crate::state::AppState) explicitly and return plain values
//! or a [`CommandError`](crate::error::CommandError).

pub mod profile;
pub mod settings;
pub mod teas;
pub mod weather;
