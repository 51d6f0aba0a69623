use std::ops::Range;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 最多可配置的指示器數量。 / Maximum number of indicators a layer can allocate.
pub const MAX_INDICATORS: usize = 32;

/// 指示器配置錯誤。 / Error conditions raised by the indicator layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("no free indicator slot left to allocate `{name}`")]
    Exhausted { name: String },
}

/// 不透明的指示器識別碼。 / Opaque indicator identity handed out by [`IndicatorLayer::allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndicatorId(u8);

impl IndicatorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn bit(self) -> u32 {
        1 << self.0
    }
}

/// 某位置上啟用中的指示器集合。 / Set of indicators active at a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicatorMask(u32);

impl IndicatorMask {
    pub fn contains(self, id: IndicatorId) -> bool {
        self.0 & id.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    fn insert(&mut self, id: IndicatorId) {
        self.0 |= id.bit();
    }
}

/// 指示器的繪製樣式。 / Visual kind used to paint an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Plain,
    Squiggle,
    Dots,
    Box,
    Hidden,
}

/// RGB 顏色。 / RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(0xFF, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// 樣式與顏色組合。 / Kind plus colour for a normal or hover state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorStyle {
    pub kind: IndicatorKind,
    pub color: Rgb,
}

impl IndicatorStyle {
    pub const fn new(kind: IndicatorKind, color: Rgb) -> Self {
        Self { kind, color }
    }
}

const DEFAULT_STYLE: IndicatorStyle =
    IndicatorStyle::new(IndicatorKind::Squiggle, Rgb::new(0, 0, 0));

#[derive(Debug, Clone)]
struct IndicatorSlot {
    name: String,
    style: IndicatorStyle,
    hover_style: IndicatorStyle,
    spans: Vec<Range<usize>>,
}

/// 管理具名指示器與其合併後的範圍。 / Named indicators with sorted, coalesced span lists.
#[derive(Debug, Clone, Default)]
pub struct IndicatorLayer {
    slots: Vec<IndicatorSlot>,
}

impl IndicatorLayer {
    /// 依名稱配置指示器；同名重複配置回傳相同識別碼。
    /// Allocates an indicator by name. Allocating an existing name returns the same identity.
    pub fn allocate(&mut self, name: &str) -> Result<IndicatorId, IndicatorError> {
        if let Some(idx) = self.slots.iter().position(|slot| slot.name == name) {
            return Ok(IndicatorId(idx as u8));
        }
        if self.slots.len() >= MAX_INDICATORS {
            return Err(IndicatorError::Exhausted {
                name: name.to_string(),
            });
        }
        self.slots.push(IndicatorSlot {
            name: name.to_string(),
            style: DEFAULT_STYLE,
            hover_style: DEFAULT_STYLE,
            spans: Vec::new(),
        });
        Ok(IndicatorId((self.slots.len() - 1) as u8))
    }

    pub fn name(&self, id: IndicatorId) -> Option<&str> {
        self.slots.get(id.index()).map(|slot| slot.name.as_str())
    }

    pub fn set_style(&mut self, id: IndicatorId, style: IndicatorStyle) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            slot.style = style;
        }
    }

    pub fn set_hover_style(&mut self, id: IndicatorId, style: IndicatorStyle) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            slot.hover_style = style;
        }
    }

    pub fn style(&self, id: IndicatorId) -> Option<IndicatorStyle> {
        self.slots.get(id.index()).map(|slot| slot.style)
    }

    pub fn hover_style(&self, id: IndicatorId) -> Option<IndicatorStyle> {
        self.slots.get(id.index()).map(|slot| slot.hover_style)
    }

    /// 目前的範圍（已排序且不重疊）。 / Current spans, sorted and non-overlapping.
    pub fn spans(&self, id: IndicatorId) -> &[Range<usize>] {
        self.slots
            .get(id.index())
            .map(|slot| slot.spans.as_slice())
            .unwrap_or_default()
    }

    /// 填入範圍；重疊或相鄰的範圍會合併。 / Fills a range, merging with overlapping or adjacent spans.
    pub fn fill(&mut self, id: IndicatorId, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return;
        };
        let mut merged = range;
        let mut kept = Vec::with_capacity(slot.spans.len() + 1);
        for span in slot.spans.drain(..) {
            if span.end < merged.start || span.start > merged.end {
                kept.push(span);
            } else {
                merged = merged.start.min(span.start)..merged.end.max(span.end);
            }
        }
        let at = kept.partition_point(|span| span.start < merged.start);
        kept.insert(at, merged);
        slot.spans = kept;
    }

    /// 清除範圍內的指示器。 / Removes the indicator from the given range, splitting spans as needed.
    pub fn clear(&mut self, id: IndicatorId, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let Some(slot) = self.slots.get_mut(id.index()) else {
            return;
        };
        let mut kept = Vec::with_capacity(slot.spans.len() + 1);
        for span in slot.spans.drain(..) {
            if span.end <= range.start || span.start >= range.end {
                kept.push(span);
                continue;
            }
            if span.start < range.start {
                kept.push(span.start..range.start);
            }
            if span.end > range.end {
                kept.push(range.end..span.end);
            }
        }
        slot.spans = kept;
    }

    /// 位置上啟用的所有指示器。 / All indicators covering `position`.
    pub fn all_on_for(&self, position: usize) -> IndicatorMask {
        let mut mask = IndicatorMask::default();
        for (idx, slot) in self.slots.iter().enumerate() {
            if slot.spans.iter().any(|span| span.contains(&position)) {
                mask.insert(IndicatorId(idx as u8));
            }
        }
        mask
    }

    /// 包含位置的範圍。 / The span of `id` that contains `position`.
    pub fn span_at(&self, id: IndicatorId, position: usize) -> Option<Range<usize>> {
        self.spans(id)
            .iter()
            .find(|span| span.contains(&position))
            .cloned()
    }

    /// 插入文字後平移範圍。 / Shifts spans after `length` bytes were inserted at `position`.
    pub fn text_inserted(&mut self, position: usize, length: usize) {
        for slot in &mut self.slots {
            for span in &mut slot.spans {
                if span.start >= position {
                    span.start += length;
                    span.end += length;
                } else if span.end > position {
                    span.end += length;
                }
            }
        }
    }

    /// 刪除文字後平移範圍。 / Shifts and trims spans after `length` bytes were removed at `position`.
    pub fn text_deleted(&mut self, position: usize, length: usize) {
        let removed_end = position + length;
        let remap = |offset: usize| {
            if offset <= position {
                offset
            } else if offset >= removed_end {
                offset - length
            } else {
                position
            }
        };
        for slot in &mut self.slots {
            for span in &mut slot.spans {
                *span = remap(span.start)..remap(span.end);
            }
            slot.spans.retain(|span| !span.is_empty());
        }
    }
}
