//! macOS display enumeration via Core Graphics (`CGDisplay`).
//!
//! Uses `CGGetActiveDisplayList` to enumerate all active displays and
//! `CGDisplayBounds` for each display's position and size.
//!
//! # Implementation notes
//!
//! `CGDisplayBounds` reports points in the global display space, whose origin
//! is the top-left corner of the main display.  The backing scale (2.0 on a
//! Retina panel) is the ratio of the display mode's pixel width to its point
//! width.  Bounds are converted to pixels with each display's own scale so the
//! layout is expressed in the same physical-pixel space as on Windows.

use gesture_core::{DisplayOutput, PhysicalRect};

use super::{PlatformScreenEnumerator, ScreenInfoError};

/// macOS implementation of [`PlatformScreenEnumerator`] via Core Graphics.
pub struct MacosScreenEnumerator;

impl MacosScreenEnumerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacosScreenEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformScreenEnumerator for MacosScreenEnumerator {
    fn enumerate_displays(&self) -> Result<Vec<DisplayOutput>, ScreenInfoError> {
        enumerate_via_core_graphics()
    }
}

/// Enumerates displays using Core Graphics APIs.
///
/// # Errors
///
/// Returns [`ScreenInfoError::PlatformError`] if the Core Graphics call fails
/// or returns zero active displays.
#[cfg(target_os = "macos")]
fn enumerate_via_core_graphics() -> Result<Vec<DisplayOutput>, ScreenInfoError> {
    use core_graphics::display::{CGDisplay, CGDisplayBounds};

    let active_displays = CGDisplay::active_displays()
        .map_err(|e| ScreenInfoError::PlatformError(format!("CGGetActiveDisplayList: {e}")))?;

    if active_displays.is_empty() {
        return Err(ScreenInfoError::PlatformError(
            "CGGetActiveDisplayList returned zero displays".to_string(),
        ));
    }

    let main_id = CGDisplay::main().id;

    Ok(active_displays
        .iter()
        .map(|&display_id| {
            let bounds = CGDisplayBounds(display_id);
            let points_wide = bounds.size.width;
            let display = CGDisplay::new(display_id);
            let pixels_wide = display
                .display_mode()
                .map(|mode| mode.pixel_width())
                .unwrap_or_else(|| display.pixels_wide()) as f64;
            let scale = backing_scale(pixels_wide, points_wide);

            DisplayOutput {
                device_name: format!("cg-{display_id}"),
                bounds: PhysicalRect::new(
                    (bounds.origin.x * scale).round() as i32,
                    (bounds.origin.y * scale).round() as i32,
                    (bounds.size.width * scale).round() as u32,
                    (bounds.size.height * scale).round() as u32,
                ),
                dpi_scale: scale,
                is_primary: display_id == main_id,
            }
        })
        .collect())
}

/// Pixel-to-point ratio, falling back to 1.0 when either side is unusable.
fn backing_scale(pixels_wide: f64, points_wide: f64) -> f64 {
    if points_wide > 0.0 && pixels_wide > 0.0 {
        pixels_wide / points_wide
    } else {
        1.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
