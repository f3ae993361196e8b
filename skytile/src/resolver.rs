//! Fallback tile resolver.
//!
//! Most candidate addresses point at mosaics that do not exist (yet), so a
//! miss is the expected outcome of a single probe. The resolver walks the
//! candidate list strictly in order, one request in flight at a time, and
//! returns the first image that downloads and decodes. Only exhausting the
//! whole list is reported as an error.
//!
//! ```text
//! Pending ──► Trying(0) ──miss──► Trying(1) ──miss──► … ──miss──► Exhausted
//!                │                   │                  │
//!                └──────hit──────────┴───────hit────────┴──► Succeeded(image)
//! ```

use std::future::Future;
use std::time::Duration;

use image::DynamicImage;
use thiserror::Error;
use tracing::{debug, info};

use crate::candidates::{Candidate, CandidateList};
use crate::provider::{AsyncHttpClient, ProviderError};

/// Default bound on a single candidate probe.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(15);

/// A successfully decoded tile image.
///
/// Ownership passes to the caller; the resolver keeps nothing.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    url: String,
    image: DynamicImage,
}

impl LoadedImage {
    pub fn new(url: impl Into<String>, image: DynamicImage) -> Self {
        Self {
            url: url.into(),
            image,
        }
    }

    /// Address the image was loaded from.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// Why a single candidate produced no image.
///
/// All variants are treated the same way by the resolver: as a miss.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Download failed (not found, network error, bad status).
    #[error("fetch failed: {0}")]
    Fetch(#[from] ProviderError),

    /// The body was not a decodable image.
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// The probe did not settle in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Terminal resolution failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Every candidate missed.
    #[error("no tiles available for these coordinates in the date range")]
    Exhausted {
        /// Number of candidates probed before giving up.
        attempts: usize,
    },
}

/// Outcome of probing one candidate.
#[derive(Debug)]
pub enum Attempt {
    Loaded(LoadedImage),
    Missed(LoadError),
}

/// Loads and decodes a single image address.
pub trait ImageLoader: Send + Sync {
    /// Fetches and decodes the image at `url`.
    fn load(&self, url: &str) -> impl Future<Output = Result<LoadedImage, LoadError>> + Send;
}

/// [`ImageLoader`] backed by an HTTP client and the `image` decoders.
pub struct HttpImageLoader<C: AsyncHttpClient> {
    http_client: C,
}

impl<C: AsyncHttpClient> HttpImageLoader<C> {
    /// Creates a new loader over the given HTTP client.
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    pub fn http_client(&self) -> &C {
        &self.http_client
    }
}

impl<C: AsyncHttpClient> ImageLoader for HttpImageLoader<C> {
    async fn load(&self, url: &str) -> Result<LoadedImage, LoadError> {
        let bytes = self.http_client.get(url).await?;
        let image = image::load_from_memory(&bytes)?;
        Ok(LoadedImage::new(url, image))
    }
}

/// Sequential first-hit resolver over a candidate list.
pub struct Resolver<L: ImageLoader> {
    loader: L,
    attempt_timeout: Option<Duration>,
}

impl<L: ImageLoader> Resolver<L> {
    /// Creates a resolver with the default per-attempt timeout.
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            attempt_timeout: Some(DEFAULT_ATTEMPT_TIMEOUT),
        }
    }

    /// Sets the per-attempt timeout. `None` lets a hung request stall forever.
    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn attempt_timeout(&self) -> Option<Duration> {
        self.attempt_timeout
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Probes a single address, folding every failure into [`Attempt::Missed`].
    pub async fn attempt(&self, url: &str) -> Attempt {
        let result = match self.attempt_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.loader.load(url)).await {
                Ok(result) => result,
                Err(_) => Err(LoadError::Timeout(limit)),
            },
            None => self.loader.load(url).await,
        };

        match result {
            Ok(image) => Attempt::Loaded(image),
            Err(e) => Attempt::Missed(e),
        }
    }

    /// Returns the first candidate that loads, abandoning the rest.
    pub async fn resolve(&self, candidates: CandidateList) -> Result<LoadedImage, ResolveError> {
        self.resolve_with_progress(candidates, |_, _| {}).await
    }

    /// Like [`resolve`](Self::resolve), calling `on_attempt(index, candidate)`
    /// before each probe.
    pub async fn resolve_with_progress<F>(
        &self,
        candidates: CandidateList,
        mut on_attempt: F,
    ) -> Result<LoadedImage, ResolveError>
    where
        F: FnMut(usize, &Candidate),
    {
        let total = candidates.len();
        let mut attempts = 0;

        for (index, candidate) in candidates.into_iter().enumerate() {
            on_attempt(index, &candidate);
            attempts += 1;

            match self.attempt(&candidate.url).await {
                Attempt::Loaded(image) => {
                    info!(
                        url = %candidate.url,
                        date = %candidate.date,
                        layer = candidate.layer.identifier(),
                        attempts,
                        "Tile loaded"
                    );
                    return Ok(image);
                }
                Attempt::Missed(e) => {
                    debug!(
                        url = %candidate.url,
                        attempt = index,
                        total,
                        error = %e,
                        "Candidate missed"
                    );
                }
            }
        }

        Err(ResolveError::Exhausted { attempts })
    }
}
