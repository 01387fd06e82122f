//! Core data types passed between pipeline stages.
//!
//! Every stage boundary uses one of these tagged structures rather than
//! loosely-shaped JSON, so validation happens once at the edge where the
//! payload enters the pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A vertex in the detector's normalized coordinate space.
///
/// Coordinates are nominally in `[0, 1]` but may arrive unclamped; the
/// normalizer clamps before scaling to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedVertex {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl NormalizedVertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An absolute pixel-space rectangle.
///
/// `x + w` and `y + h` are not guaranteed to stay within the image; the
/// crop extractor clips against the actual extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// One localized object instance reported by the detection collaborator.
///
/// `bbox: None` means the detector could not localize the object; the
/// driver counts it as skipped and moves on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub name: String,
    pub bbox: Option<BoundingBox>,
}

impl Detection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bbox: None,
        }
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }
}

/// A crop written to disk for one detection.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedItem {
    pub path: PathBuf,
    pub source_bbox: BoundingBox,
    pub label: String,
    /// Position in the detection sequence; keeps filenames unique when
    /// multiple detections share a label.
    pub index: usize,
}

/// A candidate product reference returned by reverse image search.
///
/// May be a real match or a synthesized placeholder, depending on the
/// configured [`FallbackPolicy`](crate::search::FallbackPolicy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    #[serde(default)]
    pub site: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "price", default)]
    pub price_hint: Option<f64>,
}

impl SearchResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            site: None,
            title: None,
            price_hint: None,
        }
    }
}

/// One exported record. Owned by the exporter once handed over; nothing
/// mutates a row after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Website")]
    pub website: String,
    #[serde(rename = "Product Link")]
    pub product_link: String,
}

impl ProductRow {
    pub fn new(
        item_name: impl Into<String>,
        price: impl Into<String>,
        website: impl Into<String>,
        product_link: impl Into<String>,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            price: price.into(),
            website: website.into(),
            product_link: product_link.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_deserializes_wire_shape() {
        let json = r#"{"url":"https://shop.example/p/1","site":"shop.example","price":19.5}"#;
        let result: SearchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.url, "https://shop.example/p/1");
        assert_eq!(result.site.as_deref(), Some("shop.example"));
        assert_eq!(result.title, None);
        assert_eq!(result.price_hint, Some(19.5));
    }

    #[test]
    fn detection_without_bbox_is_explicit() {
        let det = Detection::new("mirror");
        assert!(det.bbox.is_none());

        let det = det.with_bbox(BoundingBox::new(1, 2, 3, 4));
        assert_eq!(det.bbox, Some(BoundingBox::new(1, 2, 3, 4)));
    }
}
