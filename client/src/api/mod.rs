//! HTTP access to the booking backend.

mod client;

pub use client::{ApiClient, ApiError, API_URL_ENV_VAR};
