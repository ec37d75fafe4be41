#[cfg(test)]
pub mod fake;
pub mod http;
pub mod meta;
pub mod recommendations;

pub use http::{ApiClient, ApiError};
