//! Blocking client core for the GitHub JSON API.
//!
//! [`Client`] issues GET and POST requests, applies Basic credentials
//! preemptively, decodes JSON bodies, and turns 404/500 error payloads into
//! a [`RequestException`] with a readable message.

mod client;
pub mod codec;
pub mod config;
mod errors;
pub mod transport;
pub mod types;
mod user_agent;
pub use self::client::Client;
pub use self::config::{Credentials, HostConfig, Protocol};
pub use self::errors::{format_field_error, format_request_error, Error, RequestException};
