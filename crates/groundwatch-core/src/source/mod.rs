//! Contact document access
//!
//! One fetch per load, one endpoint. The source is a narrow async seam so the
//! alert service can be driven by a fake in tests.

mod file;
mod http;

pub use file::FileSource;
pub use http::HttpSource;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::RawContact;

/// A source of the contact collection
#[async_trait]
pub trait ContactSource: Send + Sync {
    /// Fetch the full contact collection once
    async fn fetch(&self) -> Result<Vec<RawContact>>;
}

/// Build a source for `location`
///
/// `http://` and `https://` locations are fetched over the network, anything
/// else is read as a local path.
pub fn source_for(location: &str) -> Arc<dyn ContactSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpSource::new(location))
    } else {
        Arc::new(FileSource::new(location))
    }
}
