//! Pull API client for the asset monitoring backend.
//!
//! - [`ApiClient`]: typed request/response calls for every REST endpoint
//! - [`validation`]: flattening of server-side validation failures
//! - [`QueryCache`] / [`CachedApi`]: process-wide keyed result cache with
//!   invalidation after configuration saves
//! - [`endpoints::telemetry_ws_url`]: push channel address derived from the
//!   API base URL

pub mod cache;
pub mod cached;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod validation;

pub use cache::{QueryCache, QueryKey};
pub use cached::CachedApi;
pub use client::ApiClient;
pub use endpoints::{telemetry_ws_url, DEFAULT_API_BASE};
pub use error::{ClientError, ClientResult};
pub use validation::{normalize_detail, validation_messages, UNEXPECTED_ERROR};
