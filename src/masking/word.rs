//! Word-processing document masking.
//!
//! The document library is an external collaborator; [`WordDocument`]
//! exposes the text blocks it can read and rewrite. Each block is masked
//! independently with the same variant substitution as plain text.

use super::strategy::MaskingRequest;
use super::{MaskReport, Masker, MaskingError};
use crate::detection::PIIDetection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    TableCell,
    HeaderFooter,
}

pub trait WordDocument {
    fn block_count(&self) -> usize;
    fn block_kind(&self, index: usize) -> Option<BlockKind>;
    fn block_text(&self, index: usize) -> Result<String, MaskingError>;
    fn set_block_text(&mut self, index: usize, text: String) -> Result<(), MaskingError>;
}

/// In-memory word-processing document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordModel {
    blocks: Vec<(BlockKind, String)>,
}

impl WordModel {
    pub fn new() -> Self { Self::default() }

    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.blocks.push((BlockKind::Paragraph, text.into()));
        self
    }

    pub fn table_cell(mut self, text: impl Into<String>) -> Self {
        self.blocks.push((BlockKind::TableCell, text.into()));
        self
    }

    pub fn header_footer(mut self, text: impl Into<String>) -> Self {
        self.blocks.push((BlockKind::HeaderFooter, text.into()));
        self
    }

    /// All block texts, one per line, in document order.
    pub fn text(&self) -> String {
        self.blocks.iter().map(|(_, t)| t.as_str()).collect::<Vec<_>>().join("\n")
    }

    pub fn blocks(&self) -> &[(BlockKind, String)] { &self.blocks }
}

impl WordDocument for WordModel {
    fn block_count(&self) -> usize { self.blocks.len() }

    fn block_kind(&self, index: usize) -> Option<BlockKind> {
        self.blocks.get(index).map(|(k, _)| *k)
    }

    fn block_text(&self, index: usize) -> Result<String, MaskingError> {
        self.blocks
            .get(index)
            .map(|(_, t)| t.clone())
            .ok_or_else(|| MaskingError::Document(format!("no block {}", index)))
    }

    fn set_block_text(&mut self, index: usize, text: String) -> Result<(), MaskingError> {
        let block = self
            .blocks
            .get_mut(index)
            .ok_or_else(|| MaskingError::Document(format!("no block {}", index)))?;
        block.1 = text;
        Ok(())
    }
}

impl Masker {
    /// Mask every block in place. The returned report carries the hash
    /// metadata; word documents have no sidecar.
    pub fn mask_word(
        &self,
        doc: &mut dyn WordDocument,
        detections: &[PIIDetection],
        request: &MaskingRequest,
    ) -> Result<MaskReport, MaskingError> {
        request.validate()?;
        let selected = request.select(detections);
        let mut report = MaskReport::default();
        let mut found = vec![false; selected.len()];

        for index in 0..doc.block_count() {
            let text = doc.block_text(index)?;
            let before = report.masked;
            let sub = self.substitute(&text, &selected, request, &mut report)?;
            for (f, hit) in found.iter_mut().zip(&sub.found) {
                *f |= *hit;
            }
            if report.masked > before {
                doc.set_block_text(index, sub.text)?;
            }
        }

        for (d, hit) in selected.iter().zip(found) {
            if !hit {
                report.skip(d.pii_type, d.page, "value not found in any block");
            }
        }
        tracing::debug!(
            strategy = %request.strategy,
            blocks = doc.block_count(),
            masked = report.masked,
            skipped = report.skipped.len(),
            "Word document masked"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "word_tests.rs"]
mod tests;
