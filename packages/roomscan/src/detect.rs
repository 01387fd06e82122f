//! Object detection via the Google Vision `images:annotate` endpoint.

use async_trait::async_trait;
use base64::Engine;
use image::GenericImageView;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::SecretString;
use crate::error::{PipelineError, Result};
use crate::geometry::pixel_box;
use crate::traits::Detector;
use crate::types::{Detection, NormalizedVertex};

const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Detects furniture-scale objects with the Vision OBJECT_LOCALIZATION
/// feature and converts the reported polygons into pixel boxes.
pub struct VisionDetector {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
}

impl VisionDetector {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Point the detector at a different annotate endpoint (tests, proxies).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Detector for VisionDetector {
    async fn detect(&self, image_path: &Path) -> Result<Vec<Detection>> {
        // Decode once up front for dimensions; an unreadable image is fatal
        // before any network traffic happens.
        let img = image::open(image_path)
            .map_err(|_| PipelineError::image_not_found(image_path.display().to_string()))?;
        let (width, height) = img.dimensions();

        let bytes = tokio::fs::read(image_path).await?;
        let content = base64::engine::general_purpose::STANDARD.encode(&bytes);

        let request = AnnotateRequest {
            requests: vec![AnnotateEntry {
                image: ImageContent { content },
                features: vec![Feature {
                    kind: "OBJECT_LOCALIZATION",
                }],
            }],
        };

        debug!(endpoint = %self.endpoint, bytes = bytes.len(), "submitting annotate request");
        // The key goes in a header, not the URL: reqwest errors echo the
        // request URL, and those errors end up in user-visible output.
        let resp = self
            .client
            .post(&self.endpoint)
            .header("X-Goog-Api-Key", self.api_key.expose())
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::remote("vision", e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "vision API returned an error");
            return Err(PipelineError::RemoteService {
                service: "vision",
                source: format!("HTTP {status}: {body}").into(),
            });
        }

        let response: AnnotateResponse = resp
            .json()
            .await
            .map_err(|e| PipelineError::remote("vision", e))?;

        if let Some(err) = response.responses.first().and_then(|r| r.error.as_ref()) {
            return Err(PipelineError::RemoteService {
                service: "vision",
                source: err.message.clone().into(),
            });
        }

        let detections = parse_annotations(&response, width, height);
        info!(count = detections.len(), "detection finished");
        Ok(detections)
    }
}

/// Map annotate responses into [`Detection`]s.
///
/// Names are lowercased; annotations without any polygon vertices are
/// dropped outright (there is nothing to crop).
fn parse_annotations(response: &AnnotateResponse, width: u32, height: u32) -> Vec<Detection> {
    let annotations = response
        .responses
        .first()
        .map(|r| r.annotations.as_slice())
        .unwrap_or_default();

    annotations
        .iter()
        .filter_map(|ann| {
            let vertices: Vec<NormalizedVertex> = ann
                .bounding_poly
                .as_ref()
                .map(|p| {
                    p.normalized_vertices
                        .iter()
                        .map(|v| NormalizedVertex::new(v.x, v.y))
                        .collect()
                })
                .unwrap_or_default();

            let bbox = pixel_box(&vertices, width, height)?;
            let name = ann
                .name
                .as_deref()
                .unwrap_or("unknown")
                .to_lowercase();
            Some(Detection::new(name).with_bbox(bbox))
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateEntry>,
}

#[derive(Debug, Serialize)]
struct AnnotateEntry {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Debug, Deserialize)]
struct AnnotateResult {
    #[serde(rename = "localizedObjectAnnotations", default)]
    annotations: Vec<ObjectAnnotation>,
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct ObjectAnnotation {
    name: Option<String>,
    #[serde(rename = "boundingPoly")]
    bounding_poly: Option<BoundingPoly>,
}

#[derive(Debug, Deserialize)]
struct BoundingPoly {
    #[serde(rename = "normalizedVertices", default)]
    normalized_vertices: Vec<WireVertex>,
}

/// Vision omits coordinates that are exactly zero.
#[derive(Debug, Deserialize)]
struct WireVertex {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    fn annotate_response(json: &str) -> AnnotateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn parses_annotations_into_pixel_boxes() {
        let response = annotate_response(
            r#"{
                "responses": [{
                    "localizedObjectAnnotations": [{
                        "name": "Chair",
                        "boundingPoly": {
                            "normalizedVertices": [
                                {"x": 0.1, "y": 0.2},
                                {"x": 0.5, "y": 0.2},
                                {"x": 0.5, "y": 0.6},
                                {"x": 0.1, "y": 0.6}
                            ]
                        }
                    }]
                }]
            }"#,
        );

        let detections = parse_annotations(&response, 1000, 500);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].name, "chair");
        // h is 199, not 200: 0.6 - 0.2 carries binary residue and the
        // extent is floored, exactly as the scaling formula specifies.
        assert_eq!(
            detections[0].bbox,
            Some(BoundingBox::new(100, 100, 400, 199))
        );
    }

    #[test]
    fn drops_annotations_without_vertices() {
        let response = annotate_response(
            r#"{
                "responses": [{
                    "localizedObjectAnnotations": [
                        {"name": "Table"},
                        {"name": "Sofa", "boundingPoly": {"normalizedVertices": []}}
                    ]
                }]
            }"#,
        );

        assert!(parse_annotations(&response, 640, 480).is_empty());
    }

    #[test]
    fn omitted_vertex_coordinates_default_to_zero() {
        let response = annotate_response(
            r#"{
                "responses": [{
                    "localizedObjectAnnotations": [{
                        "name": "Rug",
                        "boundingPoly": {
                            "normalizedVertices": [{}, {"x": 0.5, "y": 0.5}]
                        }
                    }]
                }]
            }"#,
        );

        let detections = parse_annotations(&response, 100, 100);
        assert_eq!(detections[0].bbox, Some(BoundingBox::new(0, 0, 50, 50)));
    }

    #[test]
    fn empty_response_yields_no_detections() {
        let response = annotate_response(r#"{"responses": []}"#);
        assert!(parse_annotations(&response, 640, 480).is_empty());
    }

    #[tokio::test]
    async fn transport_errors_never_leak_the_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("room.jpg");
        image::RgbImage::from_pixel(8, 8, image::Rgb([120, 120, 120]))
            .save(&image_path)
            .unwrap();

        // Port 1 refuses immediately; no service is contacted.
        let detector = VisionDetector::new(crate::config::SecretString::new("sk-test-secret"))
            .with_endpoint("http://127.0.0.1:1/annotate");
        let err = detector.detect(&image_path).await.unwrap_err();
        assert!(matches!(err, PipelineError::RemoteService { .. }));

        let mut rendered = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            rendered.push_str(&inner.to_string());
            source = inner.source();
        }
        assert!(
            !rendered.contains("sk-test-secret"),
            "API key must not appear in the error chain: {rendered}"
        );
    }
}
