//! Fetch layer: HTTP client for the pipeline backend and the dashboard state it feeds.

#[cfg(feature = "http")]
pub mod dashboard;
#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use dashboard::Dashboard;
#[cfg(feature = "http")]
pub use http::{ApiClient, ApiError, ClientConfig};
