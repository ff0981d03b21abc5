//! Linux display enumeration via the X11 Xlib API (`x11` feature).
//!
//! Queries the X11 display server for its screens.  If the DISPLAY
//! environment variable is not set or Xlib is unavailable an error is
//! returned and the geometry cache keeps serving its last snapshot.
//!
//! # Implementation notes
//!
//! The plain Xlib screen API does not expose per-output offsets without
//! Xrandr, so every screen is reported at the origin.  The DPI scale is
//! derived from the physical size X reports in millimetres and rounded to the
//! nearest quarter step, since those sizes are often approximate.

use gesture_core::{DisplayOutput, PhysicalRect};

use super::{PlatformScreenEnumerator, ScreenInfoError};

const BASE_DPI: f64 = 96.0;
const MM_PER_INCH: f64 = 25.4;

/// Linux X11 implementation of [`PlatformScreenEnumerator`].
pub struct LinuxScreenEnumerator;

impl LinuxScreenEnumerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LinuxScreenEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformScreenEnumerator for LinuxScreenEnumerator {
    fn enumerate_displays(&self) -> Result<Vec<DisplayOutput>, ScreenInfoError> {
        enumerate_via_xlib()
    }
}

/// Enumerates screens using `XOpenDisplay` and `XScreenCount`.
///
/// # Errors
///
/// Returns [`ScreenInfoError::PlatformError`] if the X11 display cannot be
/// opened or reports zero screens.
fn enumerate_via_xlib() -> Result<Vec<DisplayOutput>, ScreenInfoError> {
    use x11::xlib;

    // SAFETY: a null name means "use $DISPLAY".  The returned pointer must be
    // freed by XCloseDisplay.
    let display = unsafe { xlib::XOpenDisplay(std::ptr::null()) };

    if display.is_null() {
        let display_env = std::env::var("DISPLAY").unwrap_or_else(|_| "<unset>".to_string());
        return Err(ScreenInfoError::PlatformError(format!(
            "XOpenDisplay failed; DISPLAY={display_env}"
        )));
    }

    // SAFETY: `display` is a valid non-null pointer returned by XOpenDisplay.
    let screen_count = unsafe { xlib::XScreenCount(display) };
    let default_screen = unsafe { xlib::XDefaultScreen(display) };

    let mut displays = Vec::with_capacity(screen_count.max(0) as usize);

    for screen_num in 0..screen_count {
        // SAFETY: screen_num is in [0, screen_count).
        let (width, height, width_mm) = unsafe {
            (
                xlib::XDisplayWidth(display, screen_num),
                xlib::XDisplayHeight(display, screen_num),
                xlib::XDisplayWidthMM(display, screen_num),
            )
        };

        displays.push(DisplayOutput {
            device_name: format!("x11-screen-{screen_num}"),
            bounds: PhysicalRect::new(0, 0, width.max(0) as u32, height.max(0) as u32),
            dpi_scale: scale_from_physical_size(width, width_mm),
            is_primary: screen_num == default_screen,
        });
    }

    // SAFETY: `display` was successfully opened above and is not used after this.
    unsafe { xlib::XCloseDisplay(display) };

    if displays.is_empty() {
        return Err(ScreenInfoError::PlatformError(
            "X11 reported zero screens".to_string(),
        ));
    }

    Ok(displays)
}

/// DPI scale from pixel width and physical width, quarter-step rounded.
fn scale_from_physical_size(width_px: i32, width_mm: i32) -> f64 {
    if width_px <= 0 || width_mm <= 0 {
        return 1.0;
    }
    let dpi = width_px as f64 / (width_mm as f64 / MM_PER_INCH);
    let scale = (dpi / BASE_DPI * 4.0).round() / 4.0;
    if scale > 0.0 {
        scale
    } else {
        1.0
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
