//! Exponential moving-average smoothing of normalized pointer positions.

/// Largest smoothing factor accepted; 1.0 would freeze the pointer forever.
pub const MAX_SMOOTHING: f64 = 0.99;

/// EMA smoother: `smoothed = smoothed × alpha + sample × (1 − alpha)`.
///
/// `alpha = 0` disables smoothing.  The first sample after construction or
/// [`reset`](Self::reset) seeds the average directly.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionSmoother {
    alpha: f64,
    smoothed: Option<(f64, f64)>,
}

impl PositionSmoother {
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_finite() {
            alpha.clamp(0.0, MAX_SMOOTHING)
        } else {
            0.0
        };
        Self {
            alpha,
            smoothed: None,
        }
    }

    /// Pushes a sample and returns the smoothed position.
    pub fn push(&mut self, x: f64, y: f64) -> (f64, f64) {
        let next = match self.smoothed {
            None => (x, y),
            Some((sx, sy)) => (
                sx * self.alpha + x * (1.0 - self.alpha),
                sy * self.alpha + y * (1.0 - self.alpha),
            ),
        };
        self.smoothed = Some(next);
        next
    }

    /// Last smoothed position, if any sample has been pushed since the last reset.
    pub fn current(&self) -> Option<(f64, f64)> {
        self.smoothed
    }

    pub fn reset(&mut self) {
        self.smoothed = None;
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}
