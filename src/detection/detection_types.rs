//! Data types flowing through the detection pipeline.

use serde::{Deserialize, Serialize};

use super::pii_types::{PIICategory, PIIType};

/// Rectangle locating a text region in a raster image (pixels) or on a
/// paginated page (points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 { self.x + self.width }
    pub fn bottom(&self) -> f32 { self.y + self.height }
    pub fn area(&self) -> f32 { self.width.max(0.0) * self.height.max(0.0) }

    /// Smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        BoundingBox {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Area of the intersection, zero when disjoint.
    pub fn intersection_area(&self, other: &BoundingBox) -> f32 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 { 0.0 } else { w * h }
    }
}

/// OCR word geometry keyed by byte offsets into the page text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordBox {
    pub start: usize,
    pub end: usize,
    pub bbox: BoundingBox,
}

/// One page of extracted text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number.
    pub page: u32,
    pub text: String,
    #[serde(default)]
    pub word_boxes: Vec<WordBox>,
}

/// Output of the upstream extraction/OCR collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedText {
    pub pages: Vec<PageText>,
}

impl ExtractedText {
    /// Single-page document without geometry.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { pages: vec![PageText { page: 1, text: text.into(), word_boxes: Vec::new() }] }
    }

    pub fn with_page(mut self, page: PageText) -> Self {
        self.pages.push(page);
        self
    }

    /// All page texts joined with newlines.
    pub fn full_text(&self) -> String {
        self.pages.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().join("\n")
    }

    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.text.trim().is_empty())
    }
}

/// A single pattern firing, before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatch {
    pub pii_type: PIIType,
    pub matched_text: String,
    pub normalized_text: String,
    pub start: usize,
    pub end: usize,
    pub base_confidence: f64,
}

/// One physical occurrence of a detected value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub page: u32,
    pub start: usize,
    pub end: usize,
    /// Text exactly as it appeared at this occurrence.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// Externally visible detection record.
///
/// After deduplication `occurrence_count == all_occurrences.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PIIDetection {
    pub pii_type: PIIType,
    pub category: PIICategory,
    pub value: String,
    pub normalized_value: String,
    pub confidence: f64,
    pub page: u32,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    pub occurrence_count: usize,
    pub all_occurrences: Vec<Occurrence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
}

impl PIIDetection {
    /// Build a single-occurrence detection.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pii_type: PIIType,
        value: impl Into<String>,
        normalized_value: impl Into<String>,
        confidence: f64,
        page: u32,
        start: usize,
        end: usize,
        bounding_box: Option<BoundingBox>,
    ) -> Self {
        let value = value.into();
        Self {
            pii_type,
            category: pii_type.category(),
            normalized_value: normalized_value.into(),
            confidence,
            page,
            start,
            end,
            bounding_box,
            occurrence_count: 1,
            all_occurrences: vec![Occurrence { page, start, end, value: value.clone(), bounding_box }],
            value,
            document_type: None,
        }
    }

    /// Bounding boxes of every occurrence that has one.
    pub fn all_bounding_boxes(&self) -> Vec<BoundingBox> {
        self.all_occurrences.iter().filter_map(|o| o.bounding_box).collect()
    }
}
