//! Local-file contact source

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::models::RawContact;

use super::ContactSource;

/// Reads the contact document from a local JSON file
///
/// Lets the dashboard run against the bundled sample document without a
/// network endpoint.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    /// Create a source for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContactSource for FileSource {
    async fn fetch(&self) -> Result<Vec<RawContact>> {
        debug!(path = %self.path.display(), "reading contact document");
        let raw = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}
