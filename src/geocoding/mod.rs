//! Coordinate lookup for restaurants that arrive without a location.
//!
//! [`GeocodeLookup`] is the seam to the external service; [`GeocodeResolver`]
//! wraps it so that every failure becomes an unresolved row instead of an
//! error.

pub mod credentials;
pub mod opencage;
pub mod resolver;

pub use credentials::{load_api_key, ApiKey};
pub use opencage::OpenCageClient;
pub use resolver::GeocodeResolver;

use crate::models::Coordinates;
use thiserror::Error;

/// Failure modes of a single lookup. Never fatal to a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("rate limited (HTTP {0})")]
    RateLimited(u16),

    #[error("request rejected (HTTP {code}): {message}")]
    Rejected { code: u16, message: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// External geocoding capability.
///
/// `Ok(None)` means the service answered but found no match. Implementations
/// are called concurrently from worker threads and must not retry.
pub trait GeocodeLookup: Send + Sync {
    fn lookup(&self, query: &str, country: &str) -> Result<Option<Coordinates>, GeocodeError>;
}
