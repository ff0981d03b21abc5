//! Windows display enumeration via `EnumDisplayMonitors` / `GetDpiForMonitor`.
//!
//! Bounds come from `MONITORINFOEXW::rcMonitor` and the per-display scale
//! from the effective DPI (96 DPI = 1.0).  Both are only accurate when the
//! process is per-monitor DPI aware; otherwise Windows virtualises them to
//! the primary display's DPI.

use gesture_core::{DisplayOutput, PhysicalRect};

use super::{PlatformScreenEnumerator, ScreenInfoError};

#[cfg(target_os = "windows")]
use windows::{
    Win32::Foundation::{BOOL, LPARAM, RECT},
    Win32::Graphics::Gdi::{EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFOEXW},
    Win32::UI::HiDpi::{GetDpiForMonitor, MDT_EFFECTIVE_DPI},
};

const BASE_DPI: f64 = 96.0;

/// Windows implementation of [`PlatformScreenEnumerator`] using Win32 APIs.
pub struct WindowsScreenEnumerator;

impl WindowsScreenEnumerator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsScreenEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformScreenEnumerator for WindowsScreenEnumerator {
    fn enumerate_displays(&self) -> Result<Vec<DisplayOutput>, ScreenInfoError> {
        let mut displays: Vec<DisplayOutput> = Vec::new();

        // SAFETY: `lpfn` is a valid function pointer with the correct signature.
        // `lParam` is a raw pointer to `displays` which outlives this call.
        // The callback is synchronous and called only within `EnumDisplayMonitors`.
        // `HDC::default()` (null) means enumerate all monitors on the virtual desktop.
        unsafe {
            EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(monitor_enum_proc),
                LPARAM(&mut displays as *mut Vec<DisplayOutput> as isize),
            );
        }

        if displays.is_empty() {
            return Err(ScreenInfoError::PlatformError(
                "EnumDisplayMonitors returned no monitors".to_string(),
            ));
        }

        Ok(displays)
    }
}

/// Win32 monitor enumeration callback.
///
/// # Safety
///
/// Called by Win32 inside `EnumDisplayMonitors`. `lparam` must be a valid
/// pointer to `Vec<DisplayOutput>` for the duration of the enumeration call.
#[cfg(target_os = "windows")]
unsafe extern "system" fn monitor_enum_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _lprc_clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let displays = &mut *(lparam.0 as *mut Vec<DisplayOutput>);

    // SAFETY: MONITORINFOEXW is a Plain Old Data struct; zero initialization is valid.
    let mut info: MONITORINFOEXW = std::mem::zeroed();
    info.monitorInfo.cbSize = std::mem::size_of::<MONITORINFOEXW>() as u32;

    // SAFETY: `hmonitor` is a valid handle provided by Win32.
    if GetMonitorInfoW(hmonitor, &mut info.monitorInfo).as_bool() {
        let rc = &info.monitorInfo.rcMonitor;
        let is_primary = (info.monitorInfo.dwFlags & 1) != 0; // MONITORINFOF_PRIMARY = 1

        let mut dpi_x = 0u32;
        let mut dpi_y = 0u32;
        let dpi_scale = match GetDpiForMonitor(hmonitor, MDT_EFFECTIVE_DPI, &mut dpi_x, &mut dpi_y)
        {
            Ok(()) if dpi_x > 0 => dpi_x as f64 / BASE_DPI,
            _ => 1.0,
        };

        displays.push(DisplayOutput {
            device_name: device_name(&info.szDevice),
            bounds: PhysicalRect::new(
                rc.left,
                rc.top,
                (rc.right - rc.left).max(0) as u32,
                (rc.bottom - rc.top).max(0) as u32,
            ),
            dpi_scale,
            is_primary,
        });
    }

    BOOL(1) // continue enumeration
}

/// Converts the NUL-padded UTF-16 `szDevice` buffer (e.g. `\\.\DISPLAY1`).
fn device_name(raw: &[u16]) -> String {
    let len = raw.iter().position(|&c| c == 0).unwrap_or(raw.len());
    String::from_utf16_lossy(&raw[..len])
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_name_stops_at_first_nul() {
        let mut raw = [0u16; 32];
        for (slot, c) in raw.iter_mut().zip(r"\\.\DISPLAY2".encode_utf16()) {
            *slot = c;
        }
        assert_eq!(device_name(&raw), r"\\.\DISPLAY2");
    }

    /// Smoke-tests that the enumerator can be called without panicking.  The
    /// actual count depends on the test machine, so only a minimum of one
    /// display with a positive scale is asserted.
    #[test]
    fn test_windows_screen_enumerator_returns_at_least_one_display() {
        let enumerator = WindowsScreenEnumerator::new();
        let result = enumerator.enumerate_displays();
        assert!(
            result.is_ok(),
            "enumerate_displays must succeed: {:?}",
            result.err()
        );
        let displays = result.unwrap();
        assert!(!displays.is_empty(), "must find at least one display");
        assert!(displays.iter().all(|d| d.dpi_scale > 0.0));
    }

    #[test]
    fn test_windows_screen_enumerator_reports_exactly_one_primary() {
        let enumerator = WindowsScreenEnumerator::new();
        let displays = enumerator.enumerate_displays().expect("enumerate");
        assert_eq!(displays.iter().filter(|d| d.is_primary).count(), 1);
    }
}
