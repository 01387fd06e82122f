//! Collaborator traits at the pipeline's seams.
//!
//! Production implementations wrap remote HTTP services; the mocks in
//! [`crate::testing`] implement the same traits for offline tests.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{Detection, ProductRow, SearchResult};

/// Detects objects in a whole image.
///
/// Failure here is fatal to the run; there is no partial detection.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, image_path: &Path) -> Result<Vec<Detection>>;
}

/// Submits a cropped image and returns candidate product references.
///
/// Production implementations absorb transport and parse failures at this
/// boundary and surface them as an empty list; see
/// [`FallbackPolicy`](crate::search::FallbackPolicy).
#[async_trait]
pub trait ReverseSearcher: Send + Sync {
    async fn search(&self, crop_path: &Path) -> Result<Vec<SearchResult>>;
}

/// Extracts structured product fields from a product URL.
///
/// `Ok(None)` is the "no data" sentinel: the scrape succeeded but the
/// actor had nothing for this URL.
#[async_trait]
pub trait ProductScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<Option<ProductRow>>;
}

/// Writes the aggregated rows as a flat spreadsheet.
///
/// Must reject an empty row collection with
/// [`PipelineError::NoData`](crate::error::PipelineError::NoData) and
/// never produce a file in that case.
pub trait RowExporter: Send + Sync {
    fn export(&self, rows: &[ProductRow]) -> Result<PathBuf>;
}
