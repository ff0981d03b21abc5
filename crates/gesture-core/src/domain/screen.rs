//! Physical display geometry.
//!
//! The [`ScreenLayout`] is the domain view of "which displays exist and where
//! they are".  It is built from the raw [`DisplayOutput`] list reported by a
//! platform enumerator and gives every display a stable 0-based index for
//! the lifetime of one layout snapshot.
//!
//! # Ordering rule
//!
//! The primary display is always index 0.  The remaining displays follow
//! left-to-right by their physical X coordinate (ties broken by Y), so
//! "screen 1" means "the next monitor to the right" on a typical desk.
//!
//! # Why logical coordinates use the *primary* DPI scale
//!
//! The overlay window is placed in the host UI framework's logical
//! coordinate space, and that framework anchors every window to the primary
//! monitor's DPI.  A point on a 150 % secondary display next to a 100 %
//! primary display must therefore be divided by 1.0, not by 1.5, to land in
//! the right place.  This is a platform quirk and must be kept for any
//! overlay-positioning consumer.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A rectangle in the physical (device pixel) virtual-desktop space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalRect {
    /// Left edge (may be negative for displays left of the primary).
    pub x: i32,
    /// Top edge (may be negative for displays above the primary).
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PhysicalRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns the rightmost X coordinate (exclusive).
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Returns the bottommost Y coordinate (exclusive).
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// A point in physical device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalPoint {
    pub x: i32,
    pub y: i32,
}

/// A point in the UI framework's logical coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogicalPoint {
    pub x: f64,
    pub y: f64,
}

/// One display as reported by the platform, before ordering.
///
/// Also the shape of a `[[screens.displays]]` entry in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayOutput {
    /// OS device identifier (e.g. `\\.\DISPLAY2`, an X screen number, a CGDirectDisplayID).
    pub device_name: String,
    pub bounds: PhysicalRect,
    /// The display's own DPI scale (1.0 = 96 DPI).
    #[serde(default = "default_dpi_scale")]
    pub dpi_scale: f64,
    #[serde(default)]
    pub is_primary: bool,
}

fn default_dpi_scale() -> f64 {
    1.0
}

/// One display after ordering, with its resolved index.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenInfo {
    pub index: usize,
    pub device_name: String,
    pub bounds: PhysicalRect,
    /// This display's own DPI scale.
    pub dpi_scale: f64,
    /// The primary display's DPI scale (identical for every entry of a layout).
    pub primary_dpi_scale: f64,
    pub is_primary: bool,
}

impl ScreenInfo {
    /// This display's scale relative to the primary display.
    pub fn relative_scale(&self) -> f64 {
        self.dpi_scale / self.primary_dpi_scale
    }

    /// Maps a normalized position to physical pixels on this display.
    ///
    /// Inputs are clamped to `[0, 1]`; non-finite inputs collapse to the centre.
    pub fn normalized_to_physical(&self, x: f64, y: f64) -> PhysicalPoint {
        let x = clamp_unit(x);
        let y = clamp_unit(y);
        PhysicalPoint {
            x: (self.bounds.x as f64 + x * self.bounds.width as f64).round() as i32,
            y: (self.bounds.y as f64 + y * self.bounds.height as f64).round() as i32,
        }
    }

    /// Converts a physical point to UI-framework logical coordinates using
    /// the primary display's scale (see the module docs).
    pub fn physical_to_logical(&self, point: PhysicalPoint) -> LogicalPoint {
        LogicalPoint {
            x: point.x as f64 / self.primary_dpi_scale,
            y: point.y as f64 / self.primary_dpi_scale,
        }
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.5
    }
}

fn sane_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// An ordered, indexed snapshot of the connected displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenLayout {
    screens: Vec<ScreenInfo>,
    generation: u64,
}

impl ScreenLayout {
    /// Orders `outputs` primary-first then left-to-right and assigns indices.
    ///
    /// If no output is flagged primary, the one containing the origin is
    /// promoted; failing that, the left-most one.  `generation` identifies
    /// the cache generation this snapshot belongs to.
    pub fn arrange(mut outputs: Vec<DisplayOutput>, generation: u64) -> Self {
        if outputs.is_empty() {
            return Self {
                screens: Vec::new(),
                generation,
            };
        }

        let flagged = outputs.iter().position(|o| o.is_primary);
        let primary_pos = flagged.unwrap_or_else(|| {
            let promoted = outputs
                .iter()
                .position(|o| o.bounds.contains(0, 0))
                .or_else(|| {
                    outputs
                        .iter()
                        .enumerate()
                        .min_by_key(|(_, o)| (o.bounds.x, o.bounds.y))
                        .map(|(i, _)| i)
                })
                .unwrap_or(0);
            debug!(
                "no display flagged primary; promoting {}",
                outputs[promoted].device_name
            );
            promoted
        });

        // Exactly one primary, even if the platform reported several.
        for (i, o) in outputs.iter_mut().enumerate() {
            o.is_primary = i == primary_pos;
        }

        outputs.sort_by_key(|o| (!o.is_primary, o.bounds.x, o.bounds.y));

        let primary_dpi_scale = sane_scale(outputs[0].dpi_scale);
        let screens = outputs
            .into_iter()
            .enumerate()
            .map(|(index, o)| ScreenInfo {
                index,
                device_name: o.device_name,
                bounds: o.bounds,
                dpi_scale: sane_scale(o.dpi_scale),
                primary_dpi_scale,
                is_primary: index == 0,
            })
            .collect();

        Self {
            screens,
            generation,
        }
    }

    pub fn screens(&self) -> &[ScreenInfo] {
        &self.screens
    }

    pub fn get(&self, index: usize) -> Option<&ScreenInfo> {
        self.screens.get(index)
    }

    pub fn primary(&self) -> Option<&ScreenInfo> {
        self.screens.first()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Maps a normalized position on display `index` to physical pixels.
    ///
    /// Returns `None` when `index` does not name a known display; the caller
    /// decides how to fall back.
    pub fn normalized_to_physical(&self, index: usize, x: f64, y: f64) -> Option<PhysicalPoint> {
        self.get(index).map(|s| s.normalized_to_physical(x, y))
    }

    /// Finds the display containing a physical point.
    pub fn screen_at(&self, point: PhysicalPoint) -> Option<&ScreenInfo> {
        self.screens
            .iter()
            .find(|s| s.bounds.contains(point.x, point.y))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
