//! Editor decorators that paint indicators on top of a document.
//!
//! Decorators talk to the editor only through the [`nextpad_core::TextView`] and
//! [`nextpad_core::IndicatorPainter`] traits and react to forwarded
//! [`nextpad_core::Notification`]s, so any widget exposing those capabilities
//! can host them.

pub mod config;
pub mod debounce;
pub mod opener;
pub mod url_finder;

pub use config::{ConfigError, UrlFinderConfig};
pub use debounce::Debouncer;
pub use opener::{ensure_web_scheme, OpenError, SystemOpener, UrlOpener};
pub use url_finder::{ClickOutcome, HotspotError, ScanReport, ScanState, UrlFinder};
