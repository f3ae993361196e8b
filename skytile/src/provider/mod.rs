//! Satellite imagery provider
//!
//! This module knows the address shape of the NASA GIBS tile service and
//! provides the HTTP client abstraction every network lookup goes through.
//!
//! ```ignore
//! use skytile::provider::{tile_url, AsyncReqwestClient, Layer};
//!
//! let http_client = AsyncReqwestClient::new()?;
//! let url = tile_url(Layer::ViirsSnpp, date, &tile, now_millis);
//! let bytes = http_client.get(&url).await?;
//! ```

mod gibs;
mod http;
mod types;

pub use gibs::{tile_url, Layer, GIBS_BASE_URL, TILE_MATRIX_SET};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_HTTP_TIMEOUT_SECS};
pub use types::ProviderError;

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
