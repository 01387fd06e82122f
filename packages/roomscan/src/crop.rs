//! Crop extraction: pixel sub-regions written to disk, one per detection.

use image::GenericImageView;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};
use crate::geometry::clip_box;
use crate::types::{BoundingBox, CroppedItem};

/// Extracts rectangular crops from a source image.
///
/// The output directory is created on first use; creation is idempotent.
/// Filenames are deterministic: `{index}_{label with spaces as underscores}.jpg`,
/// so a repeated (label, index) pair overwrites its own file and distinct
/// indices never collide.
pub struct Cropper {
    output_dir: PathBuf,
}

impl Cropper {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Crop `bbox` out of the image and save it as a JPEG.
    ///
    /// The rectangle is clipped against the image extents first; a box
    /// hanging over the edge degrades to a partial crop and a box entirely
    /// outside degrades to an empty one. Neither is an error.
    pub fn crop(
        &self,
        image_path: &Path,
        bbox: &BoundingBox,
        label: &str,
        index: usize,
    ) -> Result<CroppedItem> {
        let img = image::open(image_path)
            .map_err(|_| PipelineError::image_not_found(image_path.display().to_string()))?;

        fs::create_dir_all(&self.output_dir)?;

        let (width, height) = img.dimensions();
        let region = clip_box(bbox, width, height);
        let out_path = self.output_dir.join(crop_filename(label, index));

        if region.w > 0 && region.h > 0 {
            let cropped = img.crop_imm(region.x, region.y, region.w, region.h);
            cropped.to_rgb8().save(&out_path)?;
            debug!(path = %out_path.display(), label, index, "crop written");
        } else {
            // Zero-area regions cannot be encoded as JPEG. The search
            // boundary treats the missing file as "no candidates".
            warn!(
                label,
                index,
                bbox = ?bbox,
                "crop region is empty, skipping write"
            );
        }

        Ok(CroppedItem {
            path: out_path,
            source_bbox: *bbox,
            label: label.to_string(),
            index,
        })
    }
}

fn crop_filename(label: &str, index: usize) -> String {
    format!("{}_{}.jpg", index, label.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    fn write_test_image(dir: &Path, width: u32, height: u32) -> PathBuf {
        let path = dir.join("room.jpg");
        RgbImage::from_pixel(width, height, Rgb([180, 160, 140]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn filenames_are_unique_per_index() {
        assert_eq!(crop_filename("Chair", 0), "0_Chair.jpg");
        assert_eq!(crop_filename("Chair", 1), "1_Chair.jpg");
        assert_ne!(crop_filename("Chair", 0), crop_filename("Chair", 1));
    }

    #[test]
    fn spaces_in_labels_become_underscores() {
        assert_eq!(crop_filename("coffee table", 2), "2_coffee_table.jpg");
    }

    #[test]
    fn crop_writes_file_and_creates_output_dir() {
        let dir = tempdir().unwrap();
        let image_path = write_test_image(dir.path(), 64, 48);
        let out_dir = dir.path().join("crops");

        let cropper = Cropper::new(&out_dir);
        let bbox = BoundingBox::new(8, 8, 16, 16);
        let item = cropper.crop(&image_path, &bbox, "chair", 0).unwrap();

        assert_eq!(item.path, out_dir.join("0_chair.jpg"));
        assert_eq!(item.source_bbox, bbox);
        assert_eq!(item.index, 0);
        assert!(item.path.exists());

        let saved = image::open(&item.path).unwrap();
        assert_eq!(saved.dimensions(), (16, 16));
    }

    #[test]
    fn overflowing_bbox_degrades_to_partial_crop() {
        let dir = tempdir().unwrap();
        let image_path = write_test_image(dir.path(), 64, 48);

        let cropper = Cropper::new(dir.path().join("crops"));
        let bbox = BoundingBox::new(56, 40, 100, 100);
        let item = cropper.crop(&image_path, &bbox, "sofa", 1).unwrap();

        let saved = image::open(&item.path).unwrap();
        assert_eq!(saved.dimensions(), (8, 8));
    }

    #[test]
    fn fully_outside_bbox_is_accepted_without_file() {
        let dir = tempdir().unwrap();
        let image_path = write_test_image(dir.path(), 64, 48);

        let cropper = Cropper::new(dir.path().join("crops"));
        let bbox = BoundingBox::new(500, 500, 10, 10);
        let item = cropper.crop(&image_path, &bbox, "lamp", 2).unwrap();

        assert!(!item.path.exists());
    }

    #[test]
    fn missing_source_image_is_image_not_found() {
        let dir = tempdir().unwrap();
        let cropper = Cropper::new(dir.path().join("crops"));
        let bbox = BoundingBox::new(0, 0, 10, 10);

        let err = cropper
            .crop(&dir.path().join("nope.jpg"), &bbox, "chair", 0)
            .unwrap_err();
        assert!(matches!(err, PipelineError::ImageNotFound { .. }));
    }
}
