//! Capability traits an editor exposes to decorators.
//!
//! Decorators never own the document. They read it through [`TextView`] and
//! paint on top of it through [`IndicatorPainter`]. All positions are byte
//! offsets into the document.

use std::ops::Range;

use crate::indicator::{IndicatorError, IndicatorId, IndicatorMask, IndicatorStyle};

/// Read-only access to document text, line layout and the viewport.
pub trait TextView {
    /// Document length in bytes.
    fn length(&self) -> usize;

    fn line_count(&self) -> usize;

    /// First screen row currently shown (a display row, not a document line).
    fn first_visible_line(&self) -> usize;

    /// Maps a display row to the document line drawn on it.
    fn doc_line_from_visible(&self, display_row: usize) -> usize;

    /// Number of screen rows that fit in the view.
    fn lines_on_screen(&self) -> usize;

    /// `false` when the line sits inside a collapsed fold.
    fn line_visible(&self, line: usize) -> bool;

    fn position_from_line(&self, line: usize) -> usize;

    /// End of the line, excluding its terminator.
    fn line_end_position(&self, line: usize) -> usize;

    /// Screen rows the line occupies; at least one.
    fn wrap_count(&self, line: usize) -> usize;

    fn is_fold_header(&self, line: usize) -> bool;

    fn fold_expanded(&self, line: usize) -> bool;

    /// Last line governed by the fold headed by `line`.
    fn last_child(&self, line: usize) -> usize;

    fn text_range(&self, start: usize, end: usize) -> String;

    fn char_at(&self, position: usize) -> Option<u8>;

    /// Case-sensitive search for `needle` within `[start, end)`.
    fn find_text(&self, needle: &str, start: usize, end: usize) -> Option<Range<usize>>;
}

/// Indicator allocation, painting and hit testing.
pub trait IndicatorPainter {
    fn allocate_indicator(&mut self, name: &str) -> Result<IndicatorId, IndicatorError>;

    fn set_indicator_style(&mut self, indicator: IndicatorId, style: IndicatorStyle);

    fn set_indicator_hover_style(&mut self, indicator: IndicatorId, style: IndicatorStyle);

    fn indicator_clear_range(&mut self, indicator: IndicatorId, start: usize, length: usize);

    fn indicator_fill_range(&mut self, indicator: IndicatorId, start: usize, length: usize);

    fn indicator_all_on_for(&self, position: usize) -> IndicatorMask;

    /// Start of the `indicator` span containing `position`, or `position` when there is none.
    fn indicator_start(&self, indicator: IndicatorId, position: usize) -> usize;

    /// End of the `indicator` span containing `position`, or `position` when there is none.
    fn indicator_end(&self, indicator: IndicatorId, position: usize) -> usize;
}
