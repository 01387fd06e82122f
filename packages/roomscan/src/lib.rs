//! Furniture detection to shopping report pipeline.
//!
//! Takes a photo of a room, detects furniture-scale objects via a remote
//! vision API, crops each detection, reverse-searches the crops for
//! candidate product listings, scrapes product detail through third-party
//! actors, and exports the aggregated rows as a spreadsheet.
//!
//! The real work happens in external services; this library is the
//! sequencing, the bounding-box arithmetic, and the failure isolation
//! between them. The one hard invariant: a failing scrape for one link
//! never aborts the remaining links or items.
//!
//! # Usage
//!
//! ```rust,ignore
//! use roomscan::{FallbackPolicy, Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::from_env()?;
//! let pipeline = Pipeline::production(&config, FallbackPolicy::default());
//!
//! let report = pipeline.run(Path::new("living_room.jpg")).await?;
//! println!("report at {}", report.report_path.display());
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator trait seams (Detector, ReverseSearcher, ...)
//! - [`types`] - Tagged data structures passed between stages
//! - [`geometry`] - Normalized polygon to pixel box conversion
//! - [`crop`] - Crop extraction and deterministic file naming
//! - [`detect`] - Google Vision object localization client
//! - [`search`] - Reverse image search client and fallback policy
//! - [`scrape`] - Apify actor scrapers with URL routing
//! - [`export`] - Spreadsheet report writer
//! - [`pipeline`] - The run driver
//! - [`config`] - Startup configuration and credentials
//! - [`testing`] - Mock collaborators for offline tests

pub mod config;
pub mod crop;
pub mod detect;
pub mod error;
pub mod export;
pub mod geometry;
pub mod pipeline;
pub mod scrape;
pub mod search;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use config::{PipelineConfig, SecretString, DEFAULT_SEARCH_ENDPOINT};
pub use crop::Cropper;
pub use detect::VisionDetector;
pub use error::{PipelineError, Result};
pub use export::XlsxExporter;
pub use geometry::{clip_box, pixel_box};
pub use pipeline::{Pipeline, RunReport};
pub use scrape::ApifyProductScraper;
pub use search::{FallbackPolicy, ReverseSearchClient};
pub use traits::{Detector, ProductScraper, ReverseSearcher, RowExporter};
pub use types::{
    BoundingBox, CroppedItem, Detection, NormalizedVertex, ProductRow, SearchResult,
};

// Re-export testing utilities
pub use testing::{MockDetector, MockExporter, MockScraper, MockSearcher};
