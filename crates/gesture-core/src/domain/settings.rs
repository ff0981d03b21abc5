//! Gesture tuning parameters.
//!
//! [`GestureSettings`] is a plain value object: build it once at startup
//! (from the TOML config or from defaults), call [`validated`](GestureSettings::validated),
//! and hand copies to the adapter and the controller.  Nothing mutates it
//! afterwards.

use std::time::Duration;

use crate::domain::smoothing::MAX_SMOOTHING;

/// All tuning knobs for the adapter and the accumulator controller.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSettings {
    /// Wheel units per unit of stretch-ratio change.
    pub zoom_sensitivity: f64,
    /// Wheel units per unit of roll change.
    pub scroll_sensitivity: f64,
    /// Stretch deltas smaller than this are ignored (0 = no gate).
    pub zoom_threshold: f64,
    /// Roll deltas smaller than this are ignored.
    pub scroll_threshold: f64,
    /// EMA factor in `[0, 1)`; 0 = no smoothing.
    pub position_smoothing: f64,
    pub swipe_debounce: Duration,
    pub clap_debounce: Duration,
    /// Events below this confidence are dropped (except `None` events).
    pub min_confidence: f64,
}

impl Default for GestureSettings {
    /// | Field              | Default |
    /// |--------------------|---------|
    /// | zoom_sensitivity   | 1200    |
    /// | scroll_sensitivity | 120     |
    /// | zoom_threshold     | 0.0     |
    /// | scroll_threshold   | 0.05    |
    /// | position_smoothing | 0.3     |
    /// | swipe_debounce     | 500 ms  |
    /// | clap_debounce      | 800 ms  |
    /// | min_confidence     | 0.7     |
    fn default() -> Self {
        Self {
            zoom_sensitivity: 1200.0,
            scroll_sensitivity: 120.0,
            zoom_threshold: 0.0,
            scroll_threshold: 0.05,
            position_smoothing: 0.3,
            swipe_debounce: Duration::from_millis(500),
            clap_debounce: Duration::from_millis(800),
            min_confidence: 0.7,
        }
    }
}

impl GestureSettings {
    /// Returns a copy with every field forced into its valid range.
    ///
    /// Non-finite numbers fall back to the default value of that field.
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        let finite_or = |v: f64, d: f64| if v.is_finite() { v } else { d };

        Self {
            zoom_sensitivity: finite_or(self.zoom_sensitivity, defaults.zoom_sensitivity),
            scroll_sensitivity: finite_or(self.scroll_sensitivity, defaults.scroll_sensitivity),
            zoom_threshold: finite_or(self.zoom_threshold, defaults.zoom_threshold).max(0.0),
            scroll_threshold: finite_or(self.scroll_threshold, defaults.scroll_threshold).max(0.0),
            position_smoothing: finite_or(self.position_smoothing, defaults.position_smoothing)
                .clamp(0.0, MAX_SMOOTHING),
            swipe_debounce: self.swipe_debounce,
            clap_debounce: self.clap_debounce,
            min_confidence: finite_or(self.min_confidence, defaults.min_confidence)
                .clamp(0.0, 1.0),
        }
    }
}
