pub mod folding;
pub mod host;
pub mod indicator;
pub mod notification;
pub mod text;
pub mod view;

pub use folding::{FoldRegion, FoldTree};
pub use host::{IndicatorPainter, TextView};
pub use indicator::{
    IndicatorError, IndicatorId, IndicatorKind, IndicatorLayer, IndicatorMask, IndicatorStyle,
    Rgb, MAX_INDICATORS,
};
pub use notification::{KeyModifiers, ModificationFlags, Notification, UpdateFlags};
pub use text::{DocumentError, TextDocument};
pub use view::{EditorView, Viewport, MAX_ZOOM, MIN_ZOOM};
