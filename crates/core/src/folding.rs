/// 描述可折疊區塊；`start_line` 為標頭行。 / Represents a foldable region headed by `start_line`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldRegion {
    pub start_line: usize,
    pub end_line: usize,
    pub is_collapsed: bool,
}

impl FoldRegion {
    fn hides(&self, line: usize) -> bool {
        self.is_collapsed && line > self.start_line && line <= self.end_line
    }
}

/// 管理折疊狀態。 / Maintains fold regions for a document.
#[derive(Debug, Default, Clone)]
pub struct FoldTree {
    regions: Vec<FoldRegion>,
}

impl FoldTree {
    /// 建立新的折疊區段；每行最多作為一個區段的標頭。
    /// Defines a region, returning `false` when it is empty, partially overlaps another,
    /// or its header already heads a region.
    pub fn define_region(&mut self, start_line: usize, end_line: usize) -> bool {
        if start_line >= end_line {
            return false;
        }
        if self.region_at(start_line).is_some() || self.conflicts(start_line, end_line) {
            return false;
        }
        self.regions.push(FoldRegion {
            start_line,
            end_line,
            is_collapsed: false,
        });
        self.regions
            .sort_by_key(|region| (region.start_line, region.end_line));
        true
    }

    /// 設定標頭行的折疊狀態。 / Sets the collapsed state of the region headed by `line`.
    pub fn set_collapsed(&mut self, line: usize, collapsed: bool) -> bool {
        match self.region_at_mut(line) {
            Some(region) => {
                region.is_collapsed = collapsed;
                true
            }
            None => false,
        }
    }

    /// 切換折疊狀態並回傳新狀態。 / Toggles the region headed by `line`, returning the new collapsed flag.
    pub fn toggle(&mut self, line: usize) -> Option<bool> {
        let region = self.region_at_mut(line)?;
        region.is_collapsed = !region.is_collapsed;
        Some(region.is_collapsed)
    }

    /// 是否為折疊標頭。 / Whether `line` heads a fold region.
    pub fn is_header(&self, line: usize) -> bool {
        self.region_at(line).is_some()
    }

    /// 標頭行是否展開；非標頭行視為展開。 / Whether the fold headed by `line` is expanded. Non-headers report expanded.
    pub fn is_expanded(&self, line: usize) -> bool {
        self.region_at(line)
            .map(|region| !region.is_collapsed)
            .unwrap_or(true)
    }

    /// 區段最後一行；非標頭行回傳自身。 / Last line governed by the fold headed by `line`, or `line` itself.
    pub fn last_child(&self, line: usize) -> usize {
        self.region_at(line)
            .map(|region| region.end_line)
            .unwrap_or(line)
    }

    /// 檢查行是否可見。 / Checks whether the given line should be visible.
    pub fn is_line_visible(&self, line: usize) -> bool {
        !self.regions.iter().any(|region| region.hides(line))
    }

    /// 在 `after_line` 之後插入或刪除行時平移區段；完全被刪除的區段會被移除。
    /// Shifts regions when lines are inserted (`delta > 0`) or removed (`delta < 0`) after `after_line`.
    /// Regions whose header is removed are dropped.
    pub fn shift_lines(&mut self, after_line: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let removed = after_line as isize + 1..after_line as isize + 1 - delta.min(0);
        self.regions.retain(|region| {
            delta > 0 || !removed.contains(&(region.start_line as isize))
        });
        for region in &mut self.regions {
            if region.start_line > after_line {
                region.start_line = shift(region.start_line, delta, after_line);
            }
            if region.end_line > after_line {
                region.end_line = shift(region.end_line, delta, after_line);
            }
        }
        self.regions.retain(|region| region.start_line < region.end_line);
    }

    /// 列出所有折疊區段。 / Returns all regions.
    pub fn regions(&self) -> &[FoldRegion] {
        &self.regions
    }

    fn region_at(&self, line: usize) -> Option<&FoldRegion> {
        self.regions.iter().find(|region| region.start_line == line)
    }

    fn region_at_mut(&mut self, line: usize) -> Option<&mut FoldRegion> {
        self.regions.iter_mut().find(|region| region.start_line == line)
    }

    fn conflicts(&self, start: usize, end: usize) -> bool {
        self.regions.iter().any(|region| {
            let overlaps = start <= region.end_line && end >= region.start_line;
            let nested = (start >= region.start_line && end <= region.end_line)
                || (start <= region.start_line && end >= region.end_line);
            overlaps && !nested
        })
    }
}

fn shift(line: usize, delta: isize, floor: usize) -> usize {
    let shifted = line as isize + delta;
    shifted.max(floor as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_and_toggle_regions() {
        let mut tree = FoldTree::default();
        assert!(tree.define_region(2, 5));
        assert!(tree.set_collapsed(2, true));
        let visible: Vec<usize> = (0..8).filter(|&line| tree.is_line_visible(line)).collect();
        assert_eq!(visible, vec![0, 1, 2, 6, 7]);
        assert_eq!(tree.toggle(2), Some(false));
        assert_eq!(tree.toggle(3), None);
    }

    #[test]
    fn header_queries() {
        let mut tree = FoldTree::default();
        assert!(tree.define_region(1, 4));
        assert!(tree.is_header(1));
        assert!(!tree.is_header(2));
        assert!(tree.is_expanded(1));
        assert!(tree.is_expanded(2));
        assert_eq!(tree.last_child(1), 4);
        assert_eq!(tree.last_child(3), 3);
        tree.set_collapsed(1, true);
        assert!(!tree.is_expanded(1));
    }

    #[test]
    fn nested_regions_hide_inner_header() {
        let mut tree = FoldTree::default();
        assert!(tree.define_region(0, 6));
        assert!(tree.define_region(2, 4));
        tree.set_collapsed(0, true);
        assert!(!tree.is_line_visible(2));
        assert!(tree.is_line_visible(7));
    }

    #[test]
    fn reject_conflicting_regions() {
        let mut tree = FoldTree::default();
        assert!(tree.define_region(1, 4));
        assert!(tree.define_region(5, 6));
        // partial overlap without nesting should fail
        assert!(!tree.define_region(2, 5));
        // a line heads one region at most
        assert!(!tree.define_region(1, 3));
    }

    #[test]
    fn shifting_follows_line_edits() {
        let mut tree = FoldTree::default();
        assert!(tree.define_region(3, 6));
        tree.shift_lines(1, 2);
        assert_eq!(tree.last_child(5), 8);
        tree.shift_lines(0, -2);
        assert_eq!(tree.last_child(3), 6);
        // removing the header drops the region
        tree.shift_lines(2, -1);
        assert!(tree.regions().is_empty());
    }
}
