//! Client side of the bookmark service REST API.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod mock;

pub use client::{BookmarkApi, HttpApiClient};
pub use error::{ApiError, ApiResult, classify};
