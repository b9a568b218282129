//! REST API client.

mod client;
mod errors;

pub use client::ApiClient;
pub use errors::ApiError;
