use std::time::Duration;

use nextpad_core::{IndicatorKind, IndicatorStyle, Rgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_DEBOUNCE_MS: u64 = 5_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse url finder settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for [`UrlFinder`](crate::UrlFinder).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlFinderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_indicator_name")]
    pub indicator_name: String,
    #[serde(default = "default_style")]
    pub style: IndicatorStyle,
    #[serde(default = "default_hover_style")]
    pub hover_style: IndicatorStyle,
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_indicator_name() -> String {
    "url_finder".to_string()
}

fn default_style() -> IndicatorStyle {
    IndicatorStyle::new(IndicatorKind::Plain, Rgb::RED)
}

fn default_hover_style() -> IndicatorStyle {
    IndicatorStyle::new(IndicatorKind::Dots, Rgb::RED)
}

impl Default for UrlFinderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: default_debounce_ms(),
            indicator_name: default_indicator_name(),
            style: default_style(),
            hover_style: default_hover_style(),
        }
    }
}

impl UrlFinderConfig {
    /// Parses settings from JSON and sanitizes them. Missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(input)?;
        config.sanitize();
        Ok(config)
    }

    pub fn sanitize(&mut self) {
        if self.debounce_ms == 0 {
            self.debounce_ms = default_debounce_ms();
        }
        self.debounce_ms = self.debounce_ms.min(MAX_DEBOUNCE_MS);
        if self.indicator_name.trim().is_empty() {
            self.indicator_name = default_indicator_name();
        }
    }

    pub fn debounce_interval(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_hotspot_look() {
        let config = UrlFinderConfig::default();
        assert!(config.enabled);
        assert_eq!(config.debounce_interval(), Duration::from_millis(200));
        assert_eq!(config.indicator_name, "url_finder");
        assert_eq!(config.style.kind, IndicatorKind::Plain);
        assert_eq!(config.hover_style.kind, IndicatorKind::Dots);
        assert_eq!(config.hover_style.color, Rgb::RED);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = UrlFinderConfig::from_json(r#"{ "debounce_ms": 350 }"#).expect("parse");
        assert_eq!(config.debounce_ms, 350);
        assert!(config.enabled);
        assert_eq!(config.indicator_name, "url_finder");
    }

    #[test]
    fn sanitize_repairs_out_of_range_values() {
        let config = UrlFinderConfig::from_json(
            r#"{
                "enabled": false,
                "debounce_ms": 0,
                "indicator_name": "  ",
                "hover_style": { "kind": "box", "color": { "r": 0, "g": 0, "b": 255 } }
            }"#,
        )
        .expect("parse");
        assert!(!config.enabled);
        assert_eq!(config.debounce_ms, 200);
        assert_eq!(config.indicator_name, "url_finder");
        assert_eq!(config.hover_style.kind, IndicatorKind::Box);

        let capped = UrlFinderConfig::from_json(r#"{ "debounce_ms": 60000 }"#).expect("parse");
        assert_eq!(capped.debounce_ms, 5_000);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            UrlFinderConfig::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }
}
