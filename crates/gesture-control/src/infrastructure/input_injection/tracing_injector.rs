//! Log-only collaborators used by the binary when no OS backend is attached.

use std::sync::atomic::{AtomicBool, Ordering};

use gesture_core::SwipeDirection;
use tracing::{debug, info};

use crate::application::intents::{
    InjectionError, InputInjector, OverlayPlacement, OverlayPresenter, PointerButton,
};

/// Logs every injection intent at `debug` (button and visibility changes at `info`).
#[derive(Debug)]
pub struct TracingInjector {
    cursor_visible: AtomicBool,
}

impl TracingInjector {
    pub fn new() -> Self {
        Self {
            cursor_visible: AtomicBool::new(true),
        }
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible.load(Ordering::SeqCst)
    }
}

impl Default for TracingInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputInjector for TracingInjector {
    fn move_cursor_to(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        debug!(x, y, "cursor move");
        Ok(())
    }

    fn move_cursor_by(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        debug!(dx, dy, "cursor move (relative)");
        Ok(())
    }

    fn move_cursor_normalized(&self, x: f64, y: f64) -> Result<(), InjectionError> {
        debug!(x, y, "cursor move (primary, normalized)");
        Ok(())
    }

    fn set_cursor_visible(&self, visible: bool) -> Result<(), InjectionError> {
        self.cursor_visible.store(visible, Ordering::SeqCst);
        info!(visible, "system cursor visibility");
        Ok(())
    }

    fn mouse_button(&self, button: PointerButton, down: bool) -> Result<(), InjectionError> {
        info!(?button, down, "mouse button");
        Ok(())
    }

    fn wheel_scroll(&self, delta: i32) -> Result<(), InjectionError> {
        debug!(delta, "wheel scroll");
        Ok(())
    }

    fn zoom(&self, steps: i32) -> Result<(), InjectionError> {
        debug!(steps, "zoom");
        Ok(())
    }

    fn trigger_swipe_action(&self, direction: SwipeDirection) -> Result<(), InjectionError> {
        info!(%direction, "swipe action");
        Ok(())
    }
}

/// Logs overlay requests; refuses calls after `close`.
#[derive(Debug, Default)]
pub struct TracingOverlay {
    visible: AtomicBool,
    closed: AtomicBool,
}

impl TracingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<(), InjectionError> {
        if self.closed.load(Ordering::SeqCst) {
            Err(InjectionError::Closed)
        } else {
            Ok(())
        }
    }
}

impl OverlayPresenter for TracingOverlay {
    fn show_at(&self, placement: &OverlayPlacement) -> Result<(), InjectionError> {
        self.ensure_open()?;
        self.visible.store(true, Ordering::SeqCst);
        info!(
            screen = placement.screen_index,
            x = placement.logical.x,
            y = placement.logical.y,
            "overlay shown"
        );
        Ok(())
    }

    fn move_to(&self, placement: &OverlayPlacement) -> Result<(), InjectionError> {
        self.ensure_open()?;
        debug!(
            screen = placement.screen_index,
            x = placement.logical.x,
            y = placement.logical.y,
            "overlay move"
        );
        Ok(())
    }

    fn hide(&self) -> Result<(), InjectionError> {
        self.ensure_open()?;
        self.visible.store(false, Ordering::SeqCst);
        info!("overlay hidden");
        Ok(())
    }

    fn close(&self) -> Result<(), InjectionError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.visible.store(false, Ordering::SeqCst);
        info!("overlay closed");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
