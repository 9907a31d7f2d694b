//! Paginated document masking.
//!
//! The rendering library is an external collaborator reached through
//! [`PaginatedDocument`]. Per page, every variant of every selected value
//! is searched as a positioned instance; overlapping instances collapse
//! to one redaction. Irreversible strategies then rasterize the page and
//! degrade the same regions, so the original text layer cannot be
//! recovered from under the annotation.
//!
//! Hash redactions skip the raster pass: the page keeps its text layer so
//! the encrypted overlay stays extractable for decryption. The original
//! value is still removed by `apply_redactions`.

use std::collections::BTreeMap;

use super::raster::{self, PixelRect, Raster, BLACK, WHITE};
use super::strategy::{MaskingRequest, MaskingStrategy};
use super::variants::value_variants;
use super::{MaskReport, Masker, MaskingError};
use crate::detection::{BoundingBox, ExtractedText, PIIDetection, PageText, WordBox};

/// A positioned text match, in points.
#[derive(Debug, Clone, PartialEq)]
pub struct TextInstance {
    pub page: u32,
    pub rect: BoundingBox,
    /// Text as it appears on the page, which may differ in case from the needle.
    pub text: String,
}

/// Operations masking needs from a paginated document. Pages are 1-based.
pub trait PaginatedDocument {
    fn page_count(&self) -> u32;

    /// Width and height in points.
    fn page_size(&self, page: u32) -> Option<(f32, f32)>;

    fn search(&self, page: u32, needle: &str, case_insensitive: bool) -> Vec<TextInstance>;

    /// Queue a redaction; `overlay` is drawn over the cleared area.
    fn add_redaction(&mut self, page: u32, rect: BoundingBox, overlay: Option<&str>) -> Result<(), MaskingError>;

    /// Remove the text under queued redactions. Returns how many were applied.
    fn apply_redactions(&mut self, page: u32) -> Result<usize, MaskingError>;

    fn render_page(&self, page: u32, dpi: u32) -> Result<Raster, MaskingError>;

    /// Replace the page content with a flat image.
    fn replace_page_image(&mut self, page: u32, image: Raster) -> Result<(), MaskingError>;
}

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;
pub const CHAR_WIDTH: f32 = 6.0;
pub const LINE_HEIGHT: f32 = 12.0;
pub const MARGIN: f32 = 36.0;

/// Monospaced in-memory paginated document: Letter pages, one text line
/// per 12pt row, 6pt per character.
#[derive(Debug, Clone, Default)]
pub struct PageModel {
    pages: Vec<ModelPage>,
}

#[derive(Debug, Clone, Default)]
struct ModelPage {
    lines: Vec<Vec<char>>,
    pending: Vec<(BoundingBox, Option<String>)>,
    applied: Vec<(BoundingBox, Option<String>)>,
    image: Option<Raster>,
}

impl PageModel {
    pub fn lines_per_page() -> usize {
        ((PAGE_HEIGHT - 2.0 * MARGIN) / LINE_HEIGHT) as usize
    }

    /// One entry per page.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pages = pages
            .into_iter()
            .map(|text| ModelPage {
                lines: text.as_ref().lines().map(|l| l.chars().collect()).collect(),
                ..ModelPage::default()
            })
            .collect();
        Self { pages }
    }

    /// Flow `text` onto as many pages as its lines need.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let chunks: Vec<String> = lines.chunks(Self::lines_per_page().max(1)).map(|c| c.join("\n")).collect();
        if chunks.is_empty() { Self::from_pages([""]) } else { Self::from_pages(chunks) }
    }

    fn page(&self, page: u32) -> Option<&ModelPage> {
        self.pages.get((page as usize).checked_sub(1)?)
    }

    fn page_mut(&mut self, page: u32) -> Result<&mut ModelPage, MaskingError> {
        let index = (page as usize)
            .checked_sub(1)
            .ok_or_else(|| MaskingError::Document(format!("no page {}", page)))?;
        self.pages.get_mut(index).ok_or_else(|| MaskingError::Document(format!("no page {}", page)))
    }

    /// Visible text layer of `page`; empty once the page is rasterized.
    pub fn page_text(&self, page: u32) -> String {
        self.page(page)
            .map(|p| p.lines.iter().map(|l| l.iter().collect::<String>()).collect::<Vec<_>>().join("\n"))
            .unwrap_or_default()
    }

    pub fn is_rasterized(&self, page: u32) -> bool {
        self.page(page).is_some_and(|p| p.image.is_some())
    }

    /// Overlay strings drawn by applied redactions.
    pub fn overlays(&self, page: u32) -> Vec<String> {
        self.page(page)
            .map(|p| p.applied.iter().filter_map(|(_, o)| o.clone()).collect())
            .unwrap_or_default()
    }

    /// Text plus per-word geometry, as an OCR/extraction step would
    /// report it.
    pub fn extract(&self) -> ExtractedText {
        let mut out = ExtractedText::default();
        for (i, page) in self.pages.iter().enumerate() {
            let mut text = String::new();
            let mut word_boxes = Vec::new();
            for (row, line) in page.lines.iter().enumerate() {
                if row > 0 { text.push('\n'); }
                let mut col = 0;
                while col < line.len() {
                    if line[col].is_whitespace() {
                        text.push(line[col]);
                        col += 1;
                        continue;
                    }
                    let start_col = col;
                    let start = text.len();
                    while col < line.len() && !line[col].is_whitespace() {
                        text.push(line[col]);
                        col += 1;
                    }
                    word_boxes.push(WordBox { start, end: text.len(), bbox: cell_rect(row, start_col, col - start_col) });
                }
            }
            out.pages.push(PageText { page: i as u32 + 1, text, word_boxes });
        }
        out
    }
}

fn cell_rect(row: usize, col: usize, len: usize) -> BoundingBox {
    BoundingBox::new(
        MARGIN + col as f32 * CHAR_WIDTH,
        MARGIN + row as f32 * LINE_HEIGHT,
        len as f32 * CHAR_WIDTH,
        LINE_HEIGHT,
    )
}

fn is_word_char(c: Option<&char>) -> bool {
    c.is_some_and(|c| c.is_alphanumeric())
}

impl PaginatedDocument for PageModel {
    fn page_count(&self) -> u32 { self.pages.len() as u32 }

    fn page_size(&self, page: u32) -> Option<(f32, f32)> {
        self.page(page).map(|_| (PAGE_WIDTH, PAGE_HEIGHT))
    }

    fn search(&self, page: u32, needle: &str, case_insensitive: bool) -> Vec<TextInstance> {
        let Some(p) = self.page(page) else { return Vec::new() };
        let fold = |c: char| if case_insensitive { c.to_lowercase().next().unwrap_or(c) } else { c };
        let needle: Vec<char> = needle.chars().map(fold).collect();
        if needle.is_empty() { return Vec::new(); }

        let mut found = Vec::new();
        for (row, line) in p.lines.iter().enumerate() {
            if line.len() < needle.len() { continue; }
            for col in 0..=line.len() - needle.len() {
                let window = &line[col..col + needle.len()];
                if !window.iter().zip(&needle).all(|(a, b)| fold(*a) == *b) { continue; }
                let end = col + needle.len();
                let joins_left = col > 0 && is_word_char(needle.first()) && is_word_char(line.get(col - 1));
                let joins_right = is_word_char(needle.last()) && is_word_char(line.get(end));
                if !joins_left && !joins_right {
                    found.push(TextInstance {
                        page,
                        rect: cell_rect(row, col, needle.len()),
                        text: window.iter().collect(),
                    });
                }
            }
        }
        found
    }

    fn add_redaction(&mut self, page: u32, rect: BoundingBox, overlay: Option<&str>) -> Result<(), MaskingError> {
        self.page_mut(page)?.pending.push((rect, overlay.map(str::to_string)));
        Ok(())
    }

    fn apply_redactions(&mut self, page: u32) -> Result<usize, MaskingError> {
        let p = self.page_mut(page)?;
        let pending = std::mem::take(&mut p.pending);
        for (rect, _) in &pending {
            for (row, line) in p.lines.iter_mut().enumerate() {
                for (col, ch) in line.iter_mut().enumerate() {
                    let cell = cell_rect(row, col, 1);
                    let (cx, cy) = (cell.x + cell.width / 2.0, cell.y + cell.height / 2.0);
                    if cx >= rect.x && cx <= rect.right() && cy >= rect.y && cy <= rect.bottom() {
                        *ch = ' ';
                    }
                }
            }
        }
        let applied = pending.len();
        p.applied.extend(pending);
        Ok(applied)
    }

    fn render_page(&self, page: u32, dpi: u32) -> Result<Raster, MaskingError> {
        let p = self.page(page).ok_or_else(|| MaskingError::Document(format!("no page {}", page)))?;
        if let Some(image) = &p.image {
            return Ok(image.clone());
        }
        let scale = dpi as f32 / 72.0;
        let mut img = Raster::new((PAGE_WIDTH * scale).ceil() as u32, (PAGE_HEIGHT * scale).ceil() as u32, WHITE);
        let glyph_scale = (scale.round() as u32).max(1);

        for (row, line) in p.lines.iter().enumerate() {
            for (col, ch) in line.iter().enumerate() {
                if ch.is_whitespace() { continue; }
                let cell = cell_rect(row, col, 1);
                let (x, y) = ((cell.x * scale) as u32, ((cell.y + 2.0) * scale) as u32);
                img.draw_text(x, y, &ch.to_string(), glyph_scale, BLACK);
            }
        }
        for (rect, overlay) in &p.applied {
            let px = PixelRect::from_bbox(rect, scale, img.width(), img.height());
            match overlay {
                Some(text) => {
                    img.fill_rect(px, WHITE);
                    let fit = (px.width() / (raster::text_width(1, 1) + 1).max(1)) as usize;
                    let shown: String = text.chars().take(fit.max(1)).collect();
                    img.draw_text(px.x0, px.y0, &shown, 1, BLACK);
                }
                None => img.fill_rect(px, BLACK),
            }
        }
        Ok(img)
    }

    fn replace_page_image(&mut self, page: u32, image: Raster) -> Result<(), MaskingError> {
        let p = self.page_mut(page)?;
        p.lines.clear();
        p.image = Some(image);
        Ok(())
    }
}

/// True when `a` and `b` overlap by more than `threshold` of the smaller
/// area.
pub fn overlaps(a: &BoundingBox, b: &BoundingBox, threshold: f32) -> bool {
    let smaller = a.area().min(b.area());
    if smaller <= 0.0 { return a == b; }
    a.intersection_area(b) / smaller > threshold
}

impl Masker {
    pub fn mask_paginated(
        &self,
        doc: &mut dyn PaginatedDocument,
        detections: &[PIIDetection],
        request: &MaskingRequest,
    ) -> Result<MaskReport, MaskingError> {
        request.validate()?;
        let selected = request.select(detections);
        let password = match request.strategy {
            MaskingStrategy::Hash => Some(request.password()?),
            _ => None,
        };
        let mut report = MaskReport::default();
        let mut found = vec![false; selected.len()];

        let mut by_page: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (i, d) in selected.iter().enumerate() {
            for occ in &d.all_occurrences {
                let indices = by_page.entry(occ.page).or_default();
                if !indices.contains(&i) { indices.push(i); }
            }
        }

        for (page, indices) in by_page {
            if page == 0 || page > doc.page_count() {
                for &i in &indices {
                    report.skip(selected[i].pii_type, page, format!("page {} out of range", page));
                }
                continue;
            }

            let mut regions: Vec<(BoundingBox, usize, String)> = Vec::new();
            for &i in &indices {
                let d = selected[i];
                for variant in value_variants(&d.value, d.pii_type) {
                    for hit in doc.search(page, &variant, d.pii_type.is_case_insensitive()) {
                        if regions.iter().any(|(r, _, _)| overlaps(r, &hit.rect, self.config().overlap_threshold)) {
                            continue;
                        }
                        regions.push((hit.rect, i, hit.text));
                    }
                }
            }
            if regions.is_empty() { continue; }

            for (rect, i, found_text) in &regions {
                let d = selected[*i];
                let overlay = match password {
                    Some(pw) => Some(self.encrypt_occurrence(found_text, pw, d.pii_type, page, &mut report)?.ciphertext),
                    None => None,
                };
                doc.add_redaction(page, *rect, overlay.as_deref())?;
                found[*i] = true;
                report.masked += 1;
            }
            let applied = doc.apply_redactions(page)?;

            if !request.strategy.is_reversible() {
                self.degrade_page(doc, page, &regions, request.strategy)?;
            }
            tracing::debug!(page, regions = regions.len(), applied, "Page redacted");
        }

        for (d, hit) in selected.iter().zip(found) {
            if !hit {
                report.skip(d.pii_type, d.page, "value not found on any page");
            }
        }
        Ok(report)
    }

    fn degrade_page(
        &self,
        doc: &mut dyn PaginatedDocument,
        page: u32,
        regions: &[(BoundingBox, usize, String)],
        strategy: MaskingStrategy,
    ) -> Result<(), MaskingError> {
        let dpi = self.config().render_dpi;
        let scale = dpi as f32 / 72.0;
        let mut image = doc.render_page(page, dpi)?;
        for (rect, _, _) in regions {
            let px = PixelRect::from_bbox(rect, scale, image.width(), image.height());
            match strategy {
                MaskingStrategy::Pixelate => image.pixelate(px, self.config().pixelate_block),
                _ => image.gaussian_blur(px, self.config().blur_sigma as f64),
            }
        }
        doc.replace_page_image(page, image)
    }
}

#[cfg(test)]
#[path = "paginated_tests.rs"]
mod tests;
