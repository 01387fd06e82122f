//! Mock collaborators for testing.
//!
//! These implement the same traits as the production clients but return
//! canned responses and record the calls made, so pipeline behavior can be
//! tested without any network access.

use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::error::{PipelineError, Result};
use crate::traits::{Detector, ProductScraper, ReverseSearcher, RowExporter};
use crate::types::{Detection, ProductRow, SearchResult};

/// A mock detector returning a fixed detection list.
#[derive(Default)]
pub struct MockDetector {
    detections: Arc<RwLock<Vec<Detection>>>,
    fail: bool,
    calls: Arc<RwLock<Vec<PathBuf>>>,
}

impl MockDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these detections from every `detect` call.
    pub fn with_detections(self, detections: Vec<Detection>) -> Self {
        *self.detections.write().unwrap() = detections;
        self
    }

    /// Make every `detect` call fail with a remote service error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }
}

#[async_trait]
impl Detector for MockDetector {
    async fn detect(&self, image_path: &Path) -> Result<Vec<Detection>> {
        self.calls.write().unwrap().push(image_path.to_path_buf());
        if self.fail {
            return Err(PipelineError::RemoteService {
                service: "vision",
                source: "mock detection failure".into(),
            });
        }
        Ok(self.detections.read().unwrap().clone())
    }
}

/// A mock searcher that hands out result lists in FIFO order.
///
/// Each `search` call consumes the next queued list; once the queue is
/// drained, further calls return empty lists.
#[derive(Default)]
pub struct MockSearcher {
    queue: Arc<RwLock<VecDeque<Vec<SearchResult>>>>,
    calls: Arc<RwLock<Vec<PathBuf>>>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result list for the next unanswered call.
    pub fn with_results(self, results: Vec<SearchResult>) -> Self {
        self.queue.write().unwrap().push_back(results);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Crop paths that were searched, in call order.
    pub fn searched_paths(&self) -> Vec<PathBuf> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl ReverseSearcher for MockSearcher {
    async fn search(&self, crop_path: &Path) -> Result<Vec<SearchResult>> {
        self.calls.write().unwrap().push(crop_path.to_path_buf());
        Ok(self
            .queue
            .write()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

/// Per-URL outcome for [`MockScraper`].
#[derive(Debug, Clone)]
enum ScrapeOutcome {
    Row(ProductRow),
    NoData,
    Fail,
}

/// A mock scraper with per-URL canned outcomes.
///
/// URLs with no configured outcome scrape to "no data".
#[derive(Default)]
pub struct MockScraper {
    outcomes: Arc<RwLock<HashMap<String, ScrapeOutcome>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scraping this URL yields the given row.
    pub fn with_row(self, url: impl Into<String>, row: ProductRow) -> Self {
        self.outcomes
            .write()
            .unwrap()
            .insert(url.into(), ScrapeOutcome::Row(row));
        self
    }

    /// Scraping this URL succeeds but yields no data.
    pub fn with_no_data(self, url: impl Into<String>) -> Self {
        self.outcomes
            .write()
            .unwrap()
            .insert(url.into(), ScrapeOutcome::NoData);
        self
    }

    /// Scraping this URL fails with a remote service error.
    pub fn with_failure(self, url: impl Into<String>) -> Self {
        self.outcomes
            .write()
            .unwrap()
            .insert(url.into(), ScrapeOutcome::Fail);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// URLs that were scraped, in call order.
    pub fn scraped_urls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl ProductScraper for MockScraper {
    async fn scrape(&self, url: &str) -> Result<Option<ProductRow>> {
        self.calls.write().unwrap().push(url.to_string());
        let outcome = self.outcomes.read().unwrap().get(url).cloned();
        match outcome {
            Some(ScrapeOutcome::Row(row)) => Ok(Some(row)),
            Some(ScrapeOutcome::Fail) => Err(PipelineError::RemoteService {
                service: "mock-scraper",
                source: format!("mock scrape failure for {url}").into(),
            }),
            Some(ScrapeOutcome::NoData) | None => Ok(None),
        }
    }
}

/// A mock exporter that records the rows it was handed.
///
/// Honors the exporter contract: an empty row collection is rejected with
/// `NoData` and nothing is recorded.
#[derive(Default)]
pub struct MockExporter {
    exported: Arc<RwLock<Option<Vec<ProductRow>>>>,
}

impl MockExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows from the last successful export, if any.
    pub fn exported_rows(&self) -> Option<Vec<ProductRow>> {
        self.exported.read().unwrap().clone()
    }
}

impl Clone for MockExporter {
    fn clone(&self) -> Self {
        Self {
            exported: Arc::clone(&self.exported),
        }
    }
}

impl RowExporter for MockExporter {
    fn export(&self, rows: &[ProductRow]) -> Result<PathBuf> {
        if rows.is_empty() {
            return Err(PipelineError::NoData);
        }
        *self.exported.write().unwrap() = Some(rows.to_vec());
        Ok(PathBuf::from("mock_report.xlsx"))
    }
}
