//! The pipeline driver: detect, crop, search, scrape, export.
//!
//! One run processes one image end to end. Detection failure is fatal;
//! everything after it is isolated per item and per link so a single bad
//! crop or dead product page never aborts the rest of the batch. Export
//! of zero rows is rejected, never silently skipped.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::crop::Cropper;
use crate::detect::VisionDetector;
use crate::error::{PipelineError, Result};
use crate::export::XlsxExporter;
use crate::scrape::ApifyProductScraper;
use crate::search::{FallbackPolicy, ReverseSearchClient};
use crate::traits::{Detector, ProductScraper, ReverseSearcher, RowExporter};
use crate::types::ProductRow;

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Where the spreadsheet was written.
    pub report_path: PathBuf,

    /// Detections returned by the detector.
    pub items_detected: usize,

    /// Detections dropped before search (no bounding box, failed crop).
    pub items_skipped: usize,

    /// Rows that made it into the report.
    pub rows_exported: usize,

    /// Product links whose scrape failed and was dropped.
    pub failed_links: Vec<String>,
}

/// Sequences one image through detection, per-item crop/search/scrape,
/// aggregation, and export.
pub struct Pipeline<D, S, P, E> {
    detector: D,
    searcher: S,
    scraper: P,
    exporter: E,
    cropper: Cropper,
}

impl Pipeline<VisionDetector, ReverseSearchClient, ApifyProductScraper, XlsxExporter> {
    /// Assemble the production pipeline from configuration.
    pub fn production(config: &PipelineConfig, policy: FallbackPolicy) -> Self {
        Pipeline::new(
            VisionDetector::new(config.vision_api_key.clone()),
            ReverseSearchClient::new()
                .with_endpoint(config.search_endpoint.clone())
                .with_policy(policy),
            ApifyProductScraper::new(&config.apify_token),
            XlsxExporter::new(config.report_path.clone()),
            Cropper::new(config.crop_dir.clone()),
        )
    }
}

impl<D, S, P, E> Pipeline<D, S, P, E>
where
    D: Detector,
    S: ReverseSearcher,
    P: ProductScraper,
    E: RowExporter,
{
    pub fn new(detector: D, searcher: S, scraper: P, exporter: E, cropper: Cropper) -> Self {
        Self {
            detector,
            searcher,
            scraper,
            exporter,
            cropper,
        }
    }

    /// Run the full pipeline on one image.
    ///
    /// Fatal failure points: the detection call, an unreadable source
    /// image, and export with zero rows. Everything else is logged and
    /// absorbed.
    pub async fn run(&self, image_path: &Path) -> Result<RunReport> {
        info!(image = %image_path.display(), "pipeline run starting");

        let detections = self.detector.detect(image_path).await?;
        info!(count = detections.len(), "detections received");

        let mut rows: Vec<ProductRow> = Vec::new();
        let mut items_skipped = 0usize;
        let mut failed_links: Vec<String> = Vec::new();

        for (index, detection) in detections.iter().enumerate() {
            let Some(bbox) = &detection.bbox else {
                debug!(item = %detection.name, index, "no bounding box, skipping");
                items_skipped += 1;
                continue;
            };

            let crop = match self.cropper.crop(image_path, bbox, &detection.name, index) {
                Ok(item) => item,
                // A vanished source image invalidates the whole run.
                Err(err @ PipelineError::ImageNotFound { .. }) => return Err(err),
                Err(err) => {
                    warn!(item = %detection.name, index, error = %err, "crop failed, skipping item");
                    items_skipped += 1;
                    continue;
                }
            };

            let results = match self.searcher.search(&crop.path).await {
                Ok(results) => results,
                Err(err) => {
                    warn!(item = %detection.name, error = %err, "search failed, treating as no candidates");
                    Vec::new()
                }
            };
            debug!(item = %detection.name, candidates = results.len(), "search finished");

            for result in &results {
                match self.scraper.scrape(&result.url).await {
                    Ok(Some(row)) => rows.push(row),
                    Ok(None) => {
                        debug!(url = %result.url, "scraper returned no data, dropping link");
                    }
                    Err(err) => {
                        warn!(url = %result.url, error = %err, "scrape failed, dropping link");
                        failed_links.push(result.url.clone());
                    }
                }
            }
        }

        let report_path = self.exporter.export(&rows)?;
        info!(
            path = %report_path.display(),
            rows = rows.len(),
            skipped = items_skipped,
            failed_links = failed_links.len(),
            "pipeline run finished"
        );

        Ok(RunReport {
            report_path,
            items_detected: detections.len(),
            items_skipped,
            rows_exported: rows.len(),
            failed_links,
        })
    }
}
