//! Clickable URL hotspots for the visible part of a document.
//!
//! [`UrlFinder`] owns one indicator. Whenever the view scrolls, resizes, zooms,
//! folds or its text changes, a short single-shot timer is (re)armed. When the
//! timer fires the indicator is cleared and the lines currently on screen are
//! scanned for `http`/`https` links, each of which gets painted. A Ctrl-click
//! on a painted span opens the link.

use std::ops::Range;
use std::time::Instant;

use nextpad_core::{
    IndicatorError, IndicatorId, IndicatorPainter, KeyModifiers, ModificationFlags,
    Notification, TextView, UpdateFlags,
};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::UrlFinderConfig;
use crate::debounce::Debouncer;
use crate::opener::{OpenError, SystemOpener, UrlOpener};

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\bhttps?://[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b(?:[-a-zA-Z0-9()@:%_+.~#?&/=]*)",
    )
    .expect("url pattern must compile")
});

/// Opening/closing characters whose closing half is dropped from a hotspot.
const ENCLOSING_PAIRS: [(u8, u8); 4] = [(b'(', b')'), (b'[', b']'), (b'<', b'>'), (b'"', b'"')];

#[derive(Debug, Error)]
pub enum HotspotError {
    #[error("invalid url `{text}`: {source}")]
    InvalidUrl {
        text: String,
        #[source]
        source: url::ParseError,
    },
}

/// Whether a rescan is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Armed,
}

/// Summary of one decoration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub first_line: usize,
    pub lines_scanned: usize,
    pub spans_painted: usize,
}

/// What a click on the document resulted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No modifier, no hotspot under the pointer, or the finder is disabled.
    Ignored,
    Opened(Url),
    /// The hotspot text did not parse as a URL.
    InvalidUrl(String),
    /// The opener refused or failed; the failure has been logged.
    OpenFailed(Url),
}

/// Viewport URL scanner and hotspot decorator.
#[derive(Debug)]
pub struct UrlFinder<O = SystemOpener> {
    indicator: IndicatorId,
    config: UrlFinderConfig,
    timer: Debouncer,
    opener: O,
}

impl UrlFinder<SystemOpener> {
    /// Creates a finder with default settings that opens links with the system handler.
    pub fn new<H>(host: &mut H) -> Result<Self, IndicatorError>
    where
        H: IndicatorPainter + ?Sized,
    {
        Self::with_config(host, UrlFinderConfig::default(), SystemOpener)
    }
}

impl<O: UrlOpener> UrlFinder<O> {
    /// Allocates and styles the hotspot indicator on `host`.
    pub fn with_config<H>(
        host: &mut H,
        mut config: UrlFinderConfig,
        opener: O,
    ) -> Result<Self, IndicatorError>
    where
        H: IndicatorPainter + ?Sized,
    {
        config.sanitize();
        let indicator = host.allocate_indicator(&config.indicator_name)?;
        host.set_indicator_style(indicator, config.style);
        host.set_indicator_hover_style(indicator, config.hover_style);
        Ok(Self {
            indicator,
            timer: Debouncer::new(config.debounce_interval()),
            config,
            opener,
        })
    }

    pub fn indicator(&self) -> IndicatorId {
        self.indicator
    }

    pub fn config(&self) -> &UrlFinderConfig {
        &self.config
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    pub fn state(&self) -> ScanState {
        if self.timer.is_armed() {
            ScanState::Armed
        } else {
            ScanState::Idle
        }
    }

    /// Deadline of the pending rescan, for hosts that sleep until the next timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Requests a rescan once the debounce interval has passed without further requests.
    pub fn schedule(&mut self, now: Instant) {
        if self.config.enabled {
            self.timer.arm(now);
        }
    }

    /// Enables or disables hotspots. Disabling drops pending work and wipes the indicator.
    pub fn set_enabled<H>(&mut self, host: &mut H, enabled: bool, now: Instant)
    where
        H: TextView + IndicatorPainter + ?Sized,
    {
        self.config.enabled = enabled;
        if enabled {
            self.timer.arm(now);
        } else {
            self.timer.cancel();
            host.indicator_clear_range(self.indicator, 0, host.length());
        }
    }

    /// Reacts to an editor notification. Clicks are handled immediately; everything
    /// else that can change what is on screen schedules a rescan.
    pub fn notify<H>(
        &mut self,
        host: &H,
        notification: &Notification,
        now: Instant,
    ) -> Option<ClickOutcome>
    where
        H: TextView + IndicatorPainter + ?Sized,
    {
        match *notification {
            Notification::Resized | Notification::Zoom | Notification::FoldChanged { .. } => {
                self.schedule(now);
            }
            Notification::UpdateUi { updated } if updated.contains(UpdateFlags::V_SCROLL) => {
                self.schedule(now);
            }
            Notification::Modified { modification, .. }
                if modification
                    .intersects(ModificationFlags::INSERT_TEXT | ModificationFlags::DELETE_TEXT) =>
            {
                self.schedule(now);
            }
            Notification::IndicatorClick {
                position,
                modifiers,
            } => return Some(self.handle_click(host, position, modifiers)),
            _ => {}
        }
        None
    }

    /// Runs the pending rescan if its deadline has passed.
    pub fn poll<H>(&mut self, host: &mut H, now: Instant) -> Option<ScanReport>
    where
        H: TextView + IndicatorPainter + ?Sized,
    {
        if self.timer.poll(now) {
            Some(self.find_urls(host))
        } else {
            None
        }
    }

    /// Clears the indicator everywhere, then paints every URL on the visible lines.
    pub fn find_urls<H>(&self, host: &mut H) -> ScanReport
    where
        H: TextView + IndicatorPainter + ?Sized,
    {
        host.indicator_clear_range(self.indicator, 0, host.length());

        let first_line = host.doc_line_from_visible(host.first_visible_line());
        let mut report = ScanReport {
            first_line,
            ..ScanReport::default()
        };
        let mut rows_left = isize::try_from(host.lines_on_screen()).unwrap_or(isize::MAX);
        let mut line = first_line;

        while rows_left >= 0 && line < host.line_count() {
            if !host.line_visible(line) {
                line += 1;
                continue;
            }

            let start = host.position_from_line(line);
            let end = host.line_end_position(line);
            let text = host.text_range(start, end);
            report.lines_scanned += 1;

            for matched in distinct_matches(&text) {
                let mut from = start;
                while let Some(found) = host.find_text(matched, from, end) {
                    from = found.end;
                    let span = trim_enclosing(&*host, found);
                    host.indicator_fill_range(self.indicator, span.start, span.len());
                    report.spans_painted += 1;
                }
            }

            rows_left = rows_left
                .saturating_sub(isize::try_from(host.wrap_count(line)).unwrap_or(isize::MAX));

            line = if host.is_fold_header(line) && !host.fold_expanded(line) {
                host.last_child(line) + 1
            } else {
                line + 1
            };
        }

        debug!(
            event = "decorators.url_finder.scan_completed",
            first_line = report.first_line,
            lines_scanned = report.lines_scanned,
            spans_painted = report.spans_painted,
        );
        report
    }

    /// Opens the hotspot under `position` when Ctrl is held.
    pub fn handle_click<H>(
        &self,
        host: &H,
        position: usize,
        modifiers: KeyModifiers,
    ) -> ClickOutcome
    where
        H: TextView + IndicatorPainter + ?Sized,
    {
        if !self.config.enabled || !modifiers.contains(KeyModifiers::CTRL) {
            return ClickOutcome::Ignored;
        }
        if !host.indicator_all_on_for(position).contains(self.indicator) {
            return ClickOutcome::Ignored;
        }

        let url = match self.hotspot_url(host, position) {
            Ok(url) => url,
            Err(err) => {
                warn!(event = "decorators.url_finder.invalid_url", error = %err);
                let HotspotError::InvalidUrl { text, .. } = err;
                return ClickOutcome::InvalidUrl(text);
            }
        };

        info!(event = "decorators.url_finder.hotspot_click", url = %url);
        match self.opener.open(&url) {
            Ok(()) => ClickOutcome::Opened(url),
            Err(err @ OpenError::UnsupportedScheme { .. }) => {
                warn!(event = "decorators.url_finder.open_blocked", error = %err);
                ClickOutcome::OpenFailed(url)
            }
            Err(err) => {
                error!(event = "decorators.url_finder.open_failed", error = %err);
                ClickOutcome::OpenFailed(url)
            }
        }
    }

    /// Parses the full indicator span containing `position` as a URL.
    pub fn hotspot_url<H>(&self, host: &H, position: usize) -> Result<Url, HotspotError>
    where
        H: TextView + IndicatorPainter + ?Sized,
    {
        let start = host.indicator_start(self.indicator, position);
        let end = host.indicator_end(self.indicator, position);
        let text = host.text_range(start, end);
        Url::parse(&text).map_err(|source| HotspotError::InvalidUrl { text, source })
    }
}

/// Non-empty URL matches on a line, first occurrence order, duplicates removed.
fn distinct_matches(line: &str) -> Vec<&str> {
    let mut matches: Vec<&str> = Vec::new();
    for found in URL_PATTERN.find_iter(line) {
        let text = found.as_str();
        if !text.is_empty() && !matches.contains(&text) {
            matches.push(text);
        }
    }
    matches
}

/// Drops the match's last byte when it closes a pair opened right before the match.
fn trim_enclosing<H>(host: &H, found: Range<usize>) -> Range<usize>
where
    H: TextView + ?Sized,
{
    if found.start == 0 || found.is_empty() {
        return found;
    }
    let before = host.char_at(found.start - 1);
    let last = host.char_at(found.end - 1);
    let enclosed = ENCLOSING_PAIRS
        .iter()
        .any(|&(open, close)| before == Some(open) && last == Some(close));
    if enclosed {
        found.start..found.end - 1
    } else {
        found
    }
}
