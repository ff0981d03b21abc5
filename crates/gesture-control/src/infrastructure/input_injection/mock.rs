//! Recording injector and overlay for unit and integration testing.
//!
//! # Why recording collaborators?
//!
//! A real injector moves the cursor of the machine running the tests, and a
//! real overlay needs a desktop session.  Neither can be observed from Rust
//! test code.  [`RecordingInjector`] and [`RecordingOverlay`] replace every OS
//! call with an in-memory record, in call order, so assertions can check
//! exactly what the pipeline emitted.
//!
//! # Usage in tests
//!
//! ```ignore
//! let injector = Arc::new(RecordingInjector::new());
//! let handler = LegacyCommandHandler::new(mapper, injector.clone());
//!
//! handler.handle(&LegacyCommand::Zoom { steps: 2 }).unwrap();
//!
//! assert_eq!(injector.calls(), vec![InjectedCall::Zoom(2)]);
//! ```
//!
//! # Failure simulation
//!
//! `set_failing(true)` makes every method return
//! `InjectionError::Platform` without recording anything.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use gesture_core::SwipeDirection;

use crate::application::intents::{
    InjectionError, InputInjector, OverlayPlacement, OverlayPresenter, PointerButton,
};

/// One recorded [`InputInjector`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum InjectedCall {
    MoveTo(i32, i32),
    MoveBy(i32, i32),
    MoveNormalized(f64, f64),
    CursorVisible(bool),
    Button(PointerButton, bool),
    Wheel(i32),
    Zoom(i32),
    Swipe(SwipeDirection),
}

/// An injector that records calls instead of touching the OS.
#[derive(Default)]
pub struct RecordingInjector {
    calls: Mutex<Vec<InjectedCall>>,
    should_fail: AtomicBool,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every call so far, oldest first.
    pub fn calls(&self) -> Vec<InjectedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    fn record(&self, call: InjectedCall) -> Result<(), InjectionError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(InjectionError::Platform("mock failure".into()));
        }
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        Ok(())
    }
}

impl InputInjector for RecordingInjector {
    fn move_cursor_to(&self, x: i32, y: i32) -> Result<(), InjectionError> {
        self.record(InjectedCall::MoveTo(x, y))
    }

    fn move_cursor_by(&self, dx: i32, dy: i32) -> Result<(), InjectionError> {
        self.record(InjectedCall::MoveBy(dx, dy))
    }

    fn move_cursor_normalized(&self, x: f64, y: f64) -> Result<(), InjectionError> {
        self.record(InjectedCall::MoveNormalized(x, y))
    }

    fn set_cursor_visible(&self, visible: bool) -> Result<(), InjectionError> {
        self.record(InjectedCall::CursorVisible(visible))
    }

    fn mouse_button(&self, button: PointerButton, down: bool) -> Result<(), InjectionError> {
        self.record(InjectedCall::Button(button, down))
    }

    fn wheel_scroll(&self, delta: i32) -> Result<(), InjectionError> {
        self.record(InjectedCall::Wheel(delta))
    }

    fn zoom(&self, steps: i32) -> Result<(), InjectionError> {
        self.record(InjectedCall::Zoom(steps))
    }

    fn trigger_swipe_action(&self, direction: SwipeDirection) -> Result<(), InjectionError> {
        self.record(InjectedCall::Swipe(direction))
    }
}

/// One recorded [`OverlayPresenter`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCall {
    Show(OverlayPlacement),
    Move(OverlayPlacement),
    Hide,
    Close,
}

/// An overlay that records calls; calls after `close` fail with `Closed`.
#[derive(Default)]
pub struct RecordingOverlay {
    calls: Mutex<Vec<OverlayCall>>,
    closed: AtomicBool,
    should_fail: AtomicBool,
}

impl RecordingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<OverlayCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn record(&self, call: OverlayCall) -> Result<(), InjectionError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(InjectionError::Platform("mock failure".into()));
        }
        if self.is_closed() {
            return Err(InjectionError::Closed);
        }
        if call == OverlayCall::Close {
            self.closed.store(true, Ordering::SeqCst);
        }
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
        Ok(())
    }
}

impl OverlayPresenter for RecordingOverlay {
    fn show_at(&self, placement: &OverlayPlacement) -> Result<(), InjectionError> {
        self.record(OverlayCall::Show(*placement))
    }

    fn move_to(&self, placement: &OverlayPlacement) -> Result<(), InjectionError> {
        self.record(OverlayCall::Move(*placement))
    }

    fn hide(&self) -> Result<(), InjectionError> {
        self.record(OverlayCall::Hide)
    }

    fn close(&self) -> Result<(), InjectionError> {
        self.record(OverlayCall::Close)
    }
}
