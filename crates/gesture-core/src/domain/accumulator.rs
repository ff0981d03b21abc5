//! Delta accumulation with remainder carry.
//!
//! The upstream recogniser reports *cumulative* values: the stretch ratio of
//! two hands (1.0 = neutral) or the roll angle of a thumbs-up.  The OS wants
//! *discrete* wheel notches.  A [`DeltaAccumulator`] bridges the two:
//!
//! ```text
//! value:     1.00  1.03  1.07  1.12  1.20
//! delta:      --   0.03  0.04  0.05  0.08     (first sample only seeds)
//! acc (×1200):     36    84   144→24  120→0
//! steps:            0     0     1      1
//! ```
//!
//! Whatever is not emitted stays in the accumulator, so the sum of emitted
//! `steps × unit` plus the remaining accumulator always equals the sum of
//! scaled deltas.  Nothing is ever truncated away: steps are the floor of
//! `acc / unit`, so the remainder left behind is always in `[0, unit)`
//! unless a single feed hits [`MAX_STEPS_PER_FEED`].

/// One platform wheel notch.
pub const WHEEL_UNIT: f64 = 120.0;

/// Half a wheel notch, the scroll channel's granularity.
pub const HALF_WHEEL_UNIT: f64 = WHEEL_UNIT / 2.0;

/// Upper bound on the steps one [`DeltaAccumulator::feed`] call returns.
///
/// A wild jump in the upstream value would otherwise overflow `i32`.  The
/// excess stays in the accumulator and is emitted by later feeds.
pub const MAX_STEPS_PER_FEED: i32 = i16::MAX as i32;

/// Converts a stream of cumulative values into signed step counts.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaAccumulator {
    unit: f64,
    sensitivity: f64,
    threshold: f64,
    last_value: Option<f64>,
    accumulated: f64,
}

impl DeltaAccumulator {
    /// Creates an accumulator that emits one step per `unit` of scaled delta.
    ///
    /// Deltas whose magnitude is below `threshold` are ignored entirely: they
    /// are not accumulated and do not move the reference value.  Pass `0.0`
    /// to disable the noise gate.
    pub fn new(unit: f64, sensitivity: f64, threshold: f64) -> Self {
        Self {
            unit,
            sensitivity,
            threshold: threshold.max(0.0),
            last_value: None,
            accumulated: 0.0,
        }
    }

    /// Feeds the next cumulative value and returns the steps to emit (may be 0).
    ///
    /// The first value after construction or [`reset`](Self::reset) only
    /// seeds the reference and never emits.
    pub fn feed(&mut self, value: f64) -> i32 {
        if !value.is_finite() {
            return 0;
        }

        let Some(last) = self.last_value else {
            self.last_value = Some(value);
            return 0;
        };

        let delta = value - last;
        if delta.abs() < self.threshold {
            return 0;
        }
        // Finite inputs can still overflow to infinity once scaled.
        let accumulated = self.accumulated + delta * self.sensitivity;
        if !accumulated.is_finite() {
            return 0;
        }
        self.last_value = Some(value);
        self.accumulated = accumulated;

        let limit = f64::from(MAX_STEPS_PER_FEED);
        let steps = (self.accumulated / self.unit).floor().clamp(-limit, limit);
        if steps == 0.0 {
            return 0;
        }
        self.accumulated -= steps * self.unit;
        steps as i32
    }

    /// Clears the accumulator and the first-sample flag.
    pub fn reset(&mut self) {
        self.last_value = None;
        self.accumulated = 0.0;
    }

    /// The carried-over remainder (in wheel units).
    pub fn remainder(&self) -> f64 {
        self.accumulated
    }

    /// `true` until the first value after construction or reset arrives.
    pub fn awaiting_first_sample(&self) -> bool {
        self.last_value.is_none()
    }

    pub fn unit(&self) -> f64 {
        self.unit
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
