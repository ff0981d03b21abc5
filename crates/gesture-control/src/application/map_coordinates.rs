//! CoordinateMapper: normalized gesture coordinates → physical pixels.
//!
//! # Fallback chain (for beginners)
//!
//! A gesture packet says "put the cursor at 40 % across, 60 % down on
//! screen 2".  Screen 2 may not exist: a monitor was unplugged, or the
//! sender is configured for a different desk.  That is never an error the
//! rest of the pipeline has to handle.  [`CoordinateMapper::resolve`] walks
//! a fixed chain and always produces a [`CursorTarget`]:
//!
//! 1. the requested display, if the current layout has it;
//! 2. otherwise the configured default display;
//! 3. otherwise the primary display (index 0);
//! 4. otherwise (no geometry at all) a normalized position on the primary
//!    display, which the injector resolves itself.
//!
//! The strict [`CoordinateMapper::normalized_to_physical`] skips the chain and
//! reports a missing display as a [`MappingError`].

use std::sync::Arc;

use gesture_core::{LogicalPoint, PhysicalPoint, ScreenInfo, ScreenLayout};
use thiserror::Error;
use tracing::debug;

use crate::application::intents::OverlayPlacement;

/// Source of the current display layout.
///
/// Implemented by the infrastructure geometry cache.  Implementations must
/// be cheap to call on every packet and must tolerate concurrent callers.
pub trait ScreenGeometryProvider: Send + Sync {
    /// Returns the current (possibly cached) layout snapshot.
    fn layout(&self) -> Arc<ScreenLayout>;

    /// Invalidates any cached snapshot and returns a freshly built one.
    fn refresh(&self) -> Arc<ScreenLayout>;
}

/// Error returned by the strict mapping call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("screen {index} is not present (layout has {available} screen(s))")]
    ScreenNotFound { index: usize, available: usize },
}

/// The resolved destination of a pointer update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorTarget {
    /// A concrete display was found.
    Screen {
        screen_index: usize,
        physical: PhysicalPoint,
        logical: LogicalPoint,
    },
    /// No display geometry is available.
    PrimaryNormalized { x: f64, y: f64 },
}

impl CursorTarget {
    /// The overlay placement for this target, if it names a concrete display.
    pub fn overlay_placement(&self) -> Option<OverlayPlacement> {
        match *self {
            Self::Screen {
                screen_index,
                physical,
                logical,
            } => Some(OverlayPlacement {
                screen_index,
                physical,
                logical,
            }),
            Self::PrimaryNormalized { .. } => None,
        }
    }

    pub fn screen_index(&self) -> Option<usize> {
        match self {
            Self::Screen { screen_index, .. } => Some(*screen_index),
            Self::PrimaryNormalized { .. } => None,
        }
    }
}

/// Maps normalized coordinates onto the current display layout.
#[derive(Clone)]
pub struct CoordinateMapper {
    geometry: Arc<dyn ScreenGeometryProvider>,
    default_screen: usize,
}

impl CoordinateMapper {
    pub fn new(geometry: Arc<dyn ScreenGeometryProvider>, default_screen: usize) -> Self {
        Self {
            geometry,
            default_screen,
        }
    }

    /// The configured fallback display index.
    pub fn default_screen(&self) -> usize {
        self.default_screen
    }

    /// Forces a geometry rebuild (e.g. after a monitor hot-plug).
    pub fn refresh(&self) -> Arc<ScreenLayout> {
        self.geometry.refresh()
    }

    /// Maps `(x, y)` on display `screen_index` to physical pixels.
    ///
    /// `x` and `y` are clamped to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::ScreenNotFound`] if the layout has no such display.
    pub fn normalized_to_physical(
        &self,
        screen_index: usize,
        x: f64,
        y: f64,
    ) -> Result<PhysicalPoint, MappingError> {
        let layout = self.geometry.layout();
        layout
            .normalized_to_physical(screen_index, x, y)
            .ok_or(MappingError::ScreenNotFound {
                index: screen_index,
                available: layout.len(),
            })
    }

    /// Resolves `(x, y)` on `screen_index`, walking the fallback chain.
    pub fn resolve(&self, screen_index: usize, x: f64, y: f64) -> CursorTarget {
        let layout = self.geometry.layout();
        match self.pick_screen(&layout, screen_index) {
            Some(screen) => {
                let physical = screen.normalized_to_physical(x, y);
                CursorTarget::Screen {
                    screen_index: screen.index,
                    physical,
                    logical: screen.physical_to_logical(physical),
                }
            }
            None => {
                debug!("no display geometry; falling back to primary-normalized positioning");
                CursorTarget::PrimaryNormalized {
                    x: clamp_unit(x),
                    y: clamp_unit(y),
                }
            }
        }
    }

    /// Resolves a pixel offset inside display `screen_index` (`None` = default),
    /// clamped to that display's bounds.  Returns `None` without geometry.
    pub fn resolve_pixel(
        &self,
        screen_index: Option<usize>,
        x: i32,
        y: i32,
    ) -> Option<PhysicalPoint> {
        let layout = self.geometry.layout();
        let screen = self.pick_screen(&layout, screen_index.unwrap_or(self.default_screen))?;
        let max_x = screen.bounds.width.saturating_sub(1) as i32;
        let max_y = screen.bounds.height.saturating_sub(1) as i32;
        Some(PhysicalPoint {
            x: screen.bounds.x + x.clamp(0, max_x),
            y: screen.bounds.y + y.clamp(0, max_y),
        })
    }

    fn pick_screen<'a>(&self, layout: &'a ScreenLayout, requested: usize) -> Option<&'a ScreenInfo> {
        if let Some(screen) = layout.get(requested) {
            return Some(screen);
        }
        let fallback = layout
            .get(self.default_screen)
            .or_else(|| layout.primary());
        if let Some(screen) = fallback {
            debug!(
                requested,
                fallback = screen.index,
                "requested screen not present; using fallback"
            );
        }
        fallback
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
