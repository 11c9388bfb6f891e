//! Provides platform specific logic and [`PlatformService`] to access it.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::GeocreditError;

/// Service providing some platform specific functions in a generic way.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Loads a byte array from the given url.
    ///
    /// Returns [`GeocreditError::NotFound`] if the server responded with 404 and
    /// [`GeocreditError::IO`] for any other failure.
    async fn load_bytes_from_url(&self, url: &str) -> Result<Bytes, GeocreditError>;
}

pub mod native;

/// Default implementation of the [`PlatformService`] for the current platform.
pub type PlatformServiceImpl = native::NativePlatformService;
