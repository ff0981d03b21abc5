//! Outbound ports: the OS input-injection and overlay collaborators.
//!
//! The controller never touches the OS directly.  It emits discrete intents
//! through two traits whose implementations live in the infrastructure layer
//! (or in tests):
//!
//! - [`InputInjector`]: move the cursor, press a button, scroll, zoom,
//!   trigger a swipe action, show/hide the system cursor.
//! - [`OverlayPresenter`]: show, move, hide and close the laser-pointer dot.
//!
//! Both return `Result<(), InjectionError>`.  Callers log failures and carry
//! on; a failed injection never stops the gesture stream.

use gesture_core::{LogicalPoint, PhysicalPoint, SwipeDirection};
use thiserror::Error;

/// Error type for collaborator calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InjectionError {
    /// The OS rejected or failed the call.
    #[error("platform error: {0}")]
    Platform(String),

    /// The collaborator has been closed and accepts no more calls.
    #[error("collaborator closed")]
    Closed,
}

/// Which pointer button a press/release refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
}

/// OS input injection, implemented outside the core pipeline.
pub trait InputInjector: Send + Sync {
    /// Moves the cursor to an absolute physical pixel position.
    fn move_cursor_to(&self, x: i32, y: i32) -> Result<(), InjectionError>;

    /// Moves the cursor relative to its current position.
    fn move_cursor_by(&self, dx: i32, dy: i32) -> Result<(), InjectionError>;

    /// Moves the cursor to a normalized `[0, 1]` position on the primary
    /// display.  Used only when no display geometry is available.
    fn move_cursor_normalized(&self, x: f64, y: f64) -> Result<(), InjectionError>;

    fn set_cursor_visible(&self, visible: bool) -> Result<(), InjectionError>;

    /// Presses (`down = true`) or releases a pointer button.
    fn mouse_button(&self, button: PointerButton, down: bool) -> Result<(), InjectionError>;

    /// Scrolls by a raw wheel delta (120 = one notch, positive = up).
    fn wheel_scroll(&self, delta: i32) -> Result<(), InjectionError>;

    /// Zooms by signed steps (positive = zoom in).
    fn zoom(&self, steps: i32) -> Result<(), InjectionError>;

    /// Performs the action bound to a swipe (e.g. switch window or slide).
    fn trigger_swipe_action(&self, direction: SwipeDirection) -> Result<(), InjectionError>;
}

/// Where to draw the overlay, in both coordinate spaces.
///
/// `logical` is computed with the primary display's DPI scale, which is what
/// the overlay window's UI framework expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPlacement {
    pub screen_index: usize,
    pub physical: PhysicalPoint,
    pub logical: LogicalPoint,
}

/// The laser-pointer overlay, implemented outside the core pipeline.
pub trait OverlayPresenter: Send + Sync {
    fn show_at(&self, placement: &OverlayPlacement) -> Result<(), InjectionError>;

    fn move_to(&self, placement: &OverlayPlacement) -> Result<(), InjectionError>;

    fn hide(&self) -> Result<(), InjectionError>;

    /// Releases the overlay for good.  Called once during shutdown.
    fn close(&self) -> Result<(), InjectionError>;
}
