use bitflags::bitflags;

bitflags! {
    /// 畫面更新原因。 / What changed in an `UpdateUi` notification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct UpdateFlags: u8 {
        const CONTENT = 0b0001;
        const SELECTION = 0b0010;
        const V_SCROLL = 0b0100;
        const H_SCROLL = 0b1000;
    }
}

bitflags! {
    /// 文件修改種類。 / Kind of document modification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ModificationFlags: u8 {
        const INSERT_TEXT = 0b0001;
        const DELETE_TEXT = 0b0010;
        const CHANGE_STYLE = 0b0100;
        const CHANGE_FOLD = 0b1000;
    }
}

bitflags! {
    /// 點擊時按住的修飾鍵。 / Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct KeyModifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL = 0b0010;
        const ALT = 0b0100;
        const META = 0b1000;
    }
}

/// 編輯器送往裝飾器的事件。 / Editor events forwarded to decorators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// 視窗大小改變。 / The view was resized.
    Resized,
    UpdateUi {
        updated: UpdateFlags,
    },
    Modified {
        position: usize,
        length: usize,
        modification: ModificationFlags,
    },
    /// 縮放等級改變。 / The zoom level changed.
    Zoom,
    /// 折疊標頭被展開或收合。 / A fold header was expanded or collapsed.
    FoldChanged {
        line: usize,
    },
    IndicatorClick {
        position: usize,
        modifiers: KeyModifiers,
    },
}
