use std::ops::Range;

use crate::folding::FoldTree;
use crate::host::{IndicatorPainter, TextView};
use crate::indicator::{
    IndicatorError, IndicatorId, IndicatorLayer, IndicatorMask, IndicatorStyle,
};
use crate::notification::{KeyModifiers, ModificationFlags, Notification, UpdateFlags};
use crate::text::{DocumentError, TextDocument};

/// 縮放等級範圍。 / Allowed zoom range, in font points relative to the base size.
pub const MIN_ZOOM: i8 = -9;
pub const MAX_ZOOM: i8 = 20;
const BASE_FONT_SIZE: i32 = 10;

/// 描述目前顯示區域。 / Describes the portion of the document shown on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// 第一個顯示列。 / First display row shown.
    pub first_row: usize,
    /// 縮放為 0 時可容納的列數。 / Rows that fit at zoom level zero.
    pub base_rows: usize,
    /// 自動換行寬度（字元數）。 / Soft-wrap width in characters, if wrapping.
    pub wrap_width: Option<usize>,
    pub zoom: i8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            first_row: 0,
            base_rows: 40,
            wrap_width: None,
            zoom: 0,
        }
    }
}

impl Viewport {
    /// 依縮放計算可容納列數。 / Rows that fit at the current zoom level.
    pub fn rows_on_screen(&self) -> usize {
        let font = BASE_FONT_SIZE + i32::from(self.zoom);
        let rows = self.base_rows as u128 * BASE_FONT_SIZE as u128 / font.max(1) as u128;
        usize::try_from(rows).unwrap_or(usize::MAX).max(1)
    }
}

/// 結合文件、折疊、顯示區與指示器的編輯器視圖。
/// Editor view combining document, folds, viewport and indicators.
///
/// Each mutating call returns the [`Notification`] a real widget would emit so
/// callers can forward it to decorators.
#[derive(Debug, Clone, Default)]
pub struct EditorView {
    document: TextDocument,
    folds: FoldTree,
    viewport: Viewport,
    indicators: IndicatorLayer,
}

impl EditorView {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            document: TextDocument::new(text),
            ..Self::default()
        }
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    pub fn folds(&self) -> &FoldTree {
        &self.folds
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn indicators(&self) -> &IndicatorLayer {
        &self.indicators
    }

    /// 插入文字。 / Inserts text at `position`.
    pub fn insert_text(
        &mut self,
        position: usize,
        text: &str,
    ) -> Result<Notification, DocumentError> {
        let line = self.document.line_from_position(position);
        let added = self.document.insert(position, text)?;
        self.folds.shift_lines(line, added as isize);
        self.indicators.text_inserted(position, text.len());
        Ok(Notification::Modified {
            position,
            length: text.len(),
            modification: ModificationFlags::INSERT_TEXT,
        })
    }

    /// 刪除範圍。 / Deletes the byte range.
    pub fn delete_range(&mut self, range: Range<usize>) -> Result<Notification, DocumentError> {
        let line = self.document.line_from_position(range.start);
        let length = range.end.saturating_sub(range.start);
        let removed = self.document.delete(range.clone())?;
        self.folds.shift_lines(line, -(removed as isize));
        self.indicators.text_deleted(range.start, length);
        Ok(Notification::Modified {
            position: range.start,
            length,
            modification: ModificationFlags::DELETE_TEXT,
        })
    }

    /// 垂直捲動到指定顯示列。 / Scrolls so `first_row` is the top display row.
    pub fn scroll_to(&mut self, first_row: usize) -> Notification {
        let last_row = self.display_row_count().saturating_sub(1);
        self.viewport.first_row = first_row.min(last_row);
        Notification::UpdateUi {
            updated: UpdateFlags::V_SCROLL,
        }
    }

    /// 改變視窗高度（以列計）。 / Resizes the view to fit `rows` rows at zoom zero.
    pub fn resize(&mut self, rows: usize) -> Notification {
        self.viewport.base_rows = rows;
        Notification::Resized
    }

    pub fn set_wrap_width(&mut self, width: Option<usize>) -> Notification {
        self.viewport.wrap_width = width.filter(|&w| w > 0);
        Notification::Resized
    }

    pub fn set_zoom(&mut self, zoom: i8) -> Notification {
        self.viewport.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Notification::Zoom
    }

    pub fn define_fold(&mut self, header: usize, last_line: usize) -> bool {
        self.folds.define_region(header, last_line)
    }

    /// 切換折疊。 / Toggles the fold headed by `line`.
    pub fn toggle_fold(&mut self, line: usize) -> Option<Notification> {
        self.folds.toggle(line)?;
        Some(Notification::FoldChanged { line })
    }

    /// 點擊位置；僅在指示器上點擊時才產生通知。
    /// Clicks at `position`. Only clicks landing on an indicator produce a notification.
    pub fn click(&self, position: usize, modifiers: KeyModifiers) -> Option<Notification> {
        if self.indicators.all_on_for(position).is_empty() {
            return None;
        }
        Some(Notification::IndicatorClick {
            position,
            modifiers,
        })
    }

    fn display_row_count(&self) -> usize {
        (0..self.document.line_count())
            .filter(|&line| self.folds.is_line_visible(line))
            .map(|line| self.wrap_count(line))
            .sum()
    }
}

impl TextView for EditorView {
    fn length(&self) -> usize {
        self.document.len()
    }

    fn line_count(&self) -> usize {
        self.document.line_count()
    }

    fn first_visible_line(&self) -> usize {
        self.viewport.first_row
    }

    fn doc_line_from_visible(&self, display_row: usize) -> usize {
        let mut row = 0;
        let mut last_visible = 0;
        for line in 0..self.document.line_count() {
            if !self.folds.is_line_visible(line) {
                continue;
            }
            last_visible = line;
            row += self.wrap_count(line);
            if row > display_row {
                return line;
            }
        }
        last_visible
    }

    fn lines_on_screen(&self) -> usize {
        self.viewport.rows_on_screen()
    }

    fn line_visible(&self, line: usize) -> bool {
        self.folds.is_line_visible(line)
    }

    fn position_from_line(&self, line: usize) -> usize {
        self.document.line_start(line)
    }

    fn line_end_position(&self, line: usize) -> usize {
        self.document.line_end(line)
    }

    fn wrap_count(&self, line: usize) -> usize {
        match self.viewport.wrap_width {
            Some(width) => {
                let chars = self.document.line_text(line).chars().count();
                chars.div_ceil(width).max(1)
            }
            None => 1,
        }
    }

    fn is_fold_header(&self, line: usize) -> bool {
        self.folds.is_header(line)
    }

    fn fold_expanded(&self, line: usize) -> bool {
        self.folds.is_expanded(line)
    }

    fn last_child(&self, line: usize) -> usize {
        self.folds.last_child(line)
    }

    fn text_range(&self, start: usize, end: usize) -> String {
        self.document.text_range(start, end).to_string()
    }

    fn char_at(&self, position: usize) -> Option<u8> {
        self.document.byte_at(position)
    }

    fn find_text(&self, needle: &str, start: usize, end: usize) -> Option<Range<usize>> {
        self.document.find(needle, start, end)
    }
}

impl IndicatorPainter for EditorView {
    fn allocate_indicator(&mut self, name: &str) -> Result<IndicatorId, IndicatorError> {
        self.indicators.allocate(name)
    }

    fn set_indicator_style(&mut self, indicator: IndicatorId, style: IndicatorStyle) {
        self.indicators.set_style(indicator, style);
    }

    fn set_indicator_hover_style(&mut self, indicator: IndicatorId, style: IndicatorStyle) {
        self.indicators.set_hover_style(indicator, style);
    }

    fn indicator_clear_range(&mut self, indicator: IndicatorId, start: usize, length: usize) {
        self.indicators.clear(indicator, start..start + length);
    }

    fn indicator_fill_range(&mut self, indicator: IndicatorId, start: usize, length: usize) {
        self.indicators.fill(indicator, start..start + length);
    }

    fn indicator_all_on_for(&self, position: usize) -> IndicatorMask {
        self.indicators.all_on_for(position)
    }

    fn indicator_start(&self, indicator: IndicatorId, position: usize) -> usize {
        self.indicators
            .span_at(indicator, position)
            .map(|span| span.start)
            .unwrap_or(position)
    }

    fn indicator_end(&self, indicator: IndicatorId, position: usize) -> usize {
        self.indicators
            .span_at(indicator, position)
            .map(|span| span.end)
            .unwrap_or(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_lines(count: usize) -> String {
        (0..count)
            .map(|n| format!("line {n}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn zoom_changes_rows_on_screen() {
        let mut view = EditorView::new("text").with_viewport(Viewport {
            base_rows: 20,
            ..Viewport::default()
        });
        assert_eq!(view.lines_on_screen(), 20);
        assert_eq!(view.set_zoom(10), Notification::Zoom);
        assert_eq!(view.lines_on_screen(), 10);
        view.set_zoom(-5);
        assert_eq!(view.lines_on_screen(), 40);
        view.set_zoom(i8::MIN);
        assert_eq!(view.viewport().zoom, MIN_ZOOM);
    }

    #[test]
    fn huge_viewport_saturates_instead_of_wrapping() {
        let mut view = EditorView::new("text");
        view.resize(usize::MAX);
        assert_eq!(view.lines_on_screen(), usize::MAX);
        view.set_zoom(MAX_ZOOM);
        assert_eq!(view.lines_on_screen(), usize::MAX / 3);
        view.resize(0);
        assert_eq!(view.lines_on_screen(), 1);
    }

    #[test]
    fn display_rows_skip_collapsed_folds() {
        let mut view = EditorView::new(numbered_lines(10));
        assert!(view.define_fold(2, 5));
        view.toggle_fold(2).unwrap();
        assert_eq!(view.doc_line_from_visible(2), 2);
        assert_eq!(view.doc_line_from_visible(3), 6);
        assert!(!view.line_visible(4));
        assert_eq!(view.doc_line_from_visible(100), 9);
    }

    #[test]
    fn wrapped_lines_occupy_several_rows() {
        let mut view = EditorView::new("abcdefghij\nxy\n");
        assert_eq!(view.wrap_count(0), 1);
        view.set_wrap_width(Some(4));
        assert_eq!(view.wrap_count(0), 3);
        assert_eq!(view.wrap_count(1), 1);
        assert_eq!(view.wrap_count(2), 1);
        assert_eq!(view.doc_line_from_visible(2), 0);
        assert_eq!(view.doc_line_from_visible(3), 1);
    }

    #[test]
    fn scroll_clamps_to_document() {
        let mut view = EditorView::new(numbered_lines(5));
        let note = view.scroll_to(3);
        assert_eq!(
            note,
            Notification::UpdateUi {
                updated: UpdateFlags::V_SCROLL
            }
        );
        assert_eq!(view.first_visible_line(), 3);
        view.scroll_to(50);
        assert_eq!(view.first_visible_line(), 4);
    }

    #[test]
    fn edits_shift_indicators_and_folds() {
        let mut view = EditorView::new("a\nb\nc\nd\n");
        let id = view.allocate_indicator("marks").unwrap();
        view.indicator_fill_range(id, 4, 1);
        assert!(view.define_fold(2, 3));

        let note = view.insert_text(0, "zz\n").unwrap();
        assert_eq!(
            note,
            Notification::Modified {
                position: 0,
                length: 3,
                modification: ModificationFlags::INSERT_TEXT
            }
        );
        assert_eq!(view.indicators().spans(id), &[7..8]);
        assert!(view.is_fold_header(3));

        view.delete_range(0..3).unwrap();
        assert_eq!(view.indicators().spans(id), &[4..5]);
        assert!(view.is_fold_header(2));
    }

    #[test]
    fn clicks_report_only_on_indicators() {
        let mut view = EditorView::new("see https://example.com");
        let id = view.allocate_indicator("links").unwrap();
        view.indicator_fill_range(id, 4, 19);
        assert_eq!(view.click(1, KeyModifiers::CTRL), None);
        assert_eq!(
            view.click(10, KeyModifiers::CTRL),
            Some(Notification::IndicatorClick {
                position: 10,
                modifiers: KeyModifiers::CTRL
            })
        );
        assert_eq!(view.indicator_start(id, 10), 4);
        assert_eq!(view.indicator_end(id, 10), 23);
        assert_eq!(view.indicator_end(id, 1), 1);
    }
}
