//! Executes commands from the legacy line-based text protocol.
//!
//! The text protocol predates gesture packets and is stateless: every line is
//! a complete instruction (`LeftClick`, `Move:dx,dy`, `Abs:screen,x,y`, …).
//! Commands bypass the adapter and the accumulators entirely and go straight
//! to the [`InputInjector`].  The only state shared with the gesture pipeline
//! is the display geometry behind the [`CoordinateMapper`].

use std::sync::Arc;

use gesture_core::LegacyCommand;
use tracing::debug;

use crate::application::intents::{InjectionError, InputInjector, PointerButton};
use crate::application::map_coordinates::CoordinateMapper;

pub struct LegacyCommandHandler {
    mapper: CoordinateMapper,
    injector: Arc<dyn InputInjector>,
}

impl LegacyCommandHandler {
    pub fn new(mapper: CoordinateMapper, injector: Arc<dyn InputInjector>) -> Self {
        Self { mapper, injector }
    }

    /// Executes one command.
    ///
    /// # Errors
    ///
    /// Propagates the first [`InjectionError`] from the injector.
    pub fn handle(&self, command: &LegacyCommand) -> Result<(), InjectionError> {
        debug!(%command, "legacy command");
        match *command {
            LegacyCommand::LeftClick => self.click(PointerButton::Left),
            LegacyCommand::RightClick => self.click(PointerButton::Right),
            LegacyCommand::Move { dx, dy } => self.injector.move_cursor_by(dx, dy),
            LegacyCommand::Abs { screen, x, y } => {
                let screen = usize::try_from(screen).ok();
                match self.mapper.resolve_pixel(screen, x, y) {
                    Some(point) => self.injector.move_cursor_to(point.x, point.y),
                    // No geometry: treat the pixel as a virtual-desktop coordinate.
                    None => self.injector.move_cursor_to(x, y),
                }
            }
            LegacyCommand::Scroll { delta } => self.injector.wheel_scroll(delta),
            LegacyCommand::Zoom { steps } => self.injector.zoom(steps),
            LegacyCommand::Pinch { direction, steps } => {
                self.injector.zoom(steps.saturating_mul(i32::from(direction)))
            }
        }
    }

    fn click(&self, button: PointerButton) -> Result<(), InjectionError> {
        self.injector.mouse_button(button, true)?;
        self.injector.mouse_button(button, false)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
