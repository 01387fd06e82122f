//! Typed errors for the roomscan pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur during a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source image missing or failed to decode. Fatal to the run.
    #[error("image not found or unreadable: {path}")]
    ImageNotFound { path: String },

    /// An external HTTP collaborator failed.
    ///
    /// Fatal when raised by the detection stage; absorbed per link when
    /// raised by a scraper.
    #[error("remote service error ({service}): {source}")]
    RemoteService {
        service: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Export was attempted with zero rows. No file is written.
    #[error("no rows to export")]
    NoData,

    /// Required endpoint or credential missing at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem failure while writing crops or the report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Crop encode/write failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Spreadsheet writer failure.
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),
}

impl PipelineError {
    /// Wrap a collaborator failure, tagging it with the service name.
    pub fn remote(
        service: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::RemoteService {
            service,
            source: Box::new(source),
        }
    }

    /// Flag a source image that could not be read or decoded.
    pub fn image_not_found(path: impl Into<String>) -> Self {
        Self::ImageNotFound { path: path.into() }
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
