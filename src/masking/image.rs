//! Raster image masking over OCR bounding boxes.

use super::raster::{self, PixelRect, Raster, BLACK, WHITE};
use super::strategy::{MaskingRequest, MaskingStrategy};
use super::{MaskReport, Masker, MaskingError};
use crate::detection::{BoundingBox, PIIDetection, PIIType};

#[derive(Debug, Clone, PartialEq)]
pub struct MaskedImage {
    pub report: MaskReport,
    /// Pixel regions that were masked, in masking order.
    pub regions: Vec<PixelRect>,
}

impl Masker {
    /// Mask every occurrence with a bounding box in place. Occurrences
    /// without geometry are reported as skipped.
    pub fn mask_image(
        &self,
        image: &mut Raster,
        detections: &[PIIDetection],
        request: &MaskingRequest,
    ) -> Result<MaskedImage, MaskingError> {
        request.validate()?;
        let password = match request.strategy {
            MaskingStrategy::Hash => Some(request.password()?),
            _ => None,
        };
        let mut report = MaskReport::default();
        let mut regions = Vec::new();

        for d in request.select(detections) {
            for occ in &d.all_occurrences {
                let Some(bbox) = occ.bounding_box else {
                    report.skip(d.pii_type, occ.page, "no bounding box");
                    continue;
                };
                let rect = self.mask_region(&bbox, image.width(), image.height());
                if rect.is_empty() {
                    report.skip(d.pii_type, occ.page, "region outside image");
                    continue;
                }

                match request.strategy {
                    MaskingStrategy::Blackout => image.fill_rect(rect, BLACK),
                    MaskingStrategy::Blur => image.gaussian_blur(rect, self.config().blur_sigma as f64),
                    MaskingStrategy::Pixelate => image.pixelate(rect, self.config().pixelate_block),
                    MaskingStrategy::Hash => {
                        if let Some(pw) = password {
                            self.encrypt_occurrence(&occ.value, pw, d.pii_type, occ.page, &mut report)?;
                        }
                        image.fill_rect(rect, WHITE);
                        draw_label(image, rect, &replacement_label(d.pii_type, &occ.value));
                    }
                }
                regions.push(rect);
                report.masked += 1;
            }
        }

        tracing::debug!(
            strategy = %request.strategy,
            masked = report.masked,
            skipped = report.skipped.len(),
            "Image masked"
        );
        Ok(MaskedImage { report, regions })
    }

    /// Clamp the height to the configured fraction of the width around
    /// the vertical centre, then pad and clip to the image.
    fn mask_region(&self, bbox: &BoundingBox, width: u32, height: u32) -> PixelRect {
        let max_h = bbox.width * self.config().image_max_height_ratio;
        let (y, h) = if bbox.height > max_h {
            (bbox.y + (bbox.height - max_h) / 2.0, max_h)
        } else {
            (bbox.y, bbox.height)
        };
        let pad = self.config().image_padding as f32;
        let padded = BoundingBox::new(bbox.x - pad, y - pad, bbox.width + 2.0 * pad, h + 2.0 * pad);
        PixelRect::from_bbox(&padded, 1.0, width, height)
    }
}

/// `PHONE: XXXX3210`: the type tag plus the last four alphanumerics.
pub fn replacement_label(pii_type: PIIType, value: &str) -> String {
    let tail: Vec<char> = value.chars().filter(|c| c.is_alphanumeric()).collect();
    let last4: String = tail[tail.len().saturating_sub(4)..].iter().collect();
    format!("{}: XXXX{}", pii_type.as_str(), last4)
}

fn draw_label(image: &mut Raster, rect: PixelRect, label: &str) {
    let chars = label.chars().count().max(1);
    let by_height = rect.height() / raster::text_height(1);
    let by_width = rect.width() / raster::text_width(chars, 1).max(1);
    let scale = by_height.min(by_width).max(1);

    let mut shown: Vec<char> = label.chars().collect();
    while shown.len() > 1 && raster::text_width(shown.len(), scale) > rect.width() {
        shown.pop();
    }
    let shown: String = shown.into_iter().collect();

    let x = rect.x0 + rect.width().saturating_sub(raster::text_width(shown.chars().count(), scale)) / 2;
    let y = rect.y0 + rect.height().saturating_sub(raster::text_height(scale)) / 2;
    image.draw_text(x, y, &shown, scale, BLACK);
}

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
