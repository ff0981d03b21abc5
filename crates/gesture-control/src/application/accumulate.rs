//! GestureAccumulatorController: continuous gesture values → discrete intents.
//!
//! The controller owns every piece of long-lived pointer state:
//!
//! - the control **mode** (Cursor or LaserPointer) and the default target display;
//! - the **zoom** and **scroll** [`DeltaAccumulator`]s;
//! - the EMA [`PositionSmoother`];
//! - whether the pointer button is currently held by a pinch;
//! - the reference-counted system-cursor visibility.
//!
//! It consumes [`GestureAction`]s from the state adapter and drives the
//! [`InputInjector`] and [`OverlayPresenter`] collaborators.  Collaborator
//! failures are logged and otherwise ignored; the accumulators themselves
//! never fail.
//!
//! # Mode state machine
//!
//! ```text
//!            set_mode / toggle_mode
//!   Cursor  ───────────────────────▶  LaserPointer
//!     ▲      (release pinch, hide         │
//!     │       cursor, show overlay)       │
//!     └───────────────────────────────────┘
//!            (hide overlay, show cursor)
//!
//!   any ── shutdown() ──▶ disposed (terminal)
//! ```
//!
//! Mode and target-screen changes are announced on a
//! [`tokio::sync::broadcast`] channel, and only when the value actually changes.

use std::sync::Arc;

use gesture_core::{
    ControlMode, DeltaAccumulator, GestureSettings, PositionSmoother, HALF_WHEEL_UNIT, WHEEL_UNIT,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::application::adapt_gestures::GestureAction;
use crate::application::intents::{
    InjectionError, InputInjector, OverlayPlacement, OverlayPresenter, PointerButton,
};
use crate::application::map_coordinates::{CoordinateMapper, CursorTarget};

const NOTIFICATION_CAPACITY: usize = 16;

/// Change notifications published by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerNotification {
    ModeChanged(ControlMode),
    TargetScreenChanged { previous: usize, current: usize },
}

// ── Cursor visibility ─────────────────────────────────────────────────────────

/// Saturating hide counter.
///
/// Every `hide` must be balanced by a `show`; the cursor becomes visible
/// again only when the count returns to zero.  Extra `show` calls at zero are
/// ignored rather than going negative.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CursorVisibility {
    hide_count: u32,
}

impl CursorVisibility {
    /// Records a hide request; returns `true` if the cursor must now be hidden.
    pub fn hide(&mut self) -> bool {
        self.hide_count = self.hide_count.saturating_add(1);
        self.hide_count == 1
    }

    /// Records a show request; returns `true` if the cursor must now be shown.
    pub fn show(&mut self) -> bool {
        if self.hide_count == 0 {
            return false;
        }
        self.hide_count -= 1;
        self.hide_count == 0
    }

    /// Drops all outstanding hides; returns `true` if the cursor was hidden.
    pub fn release_all(&mut self) -> bool {
        let was_hidden = self.hide_count > 0;
        self.hide_count = 0;
        was_hidden
    }

    pub fn is_hidden(&self) -> bool {
        self.hide_count > 0
    }

    pub fn hide_count(&self) -> u32 {
        self.hide_count
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

struct ControllerState {
    mode: ControlMode,
    target_screen_index: usize,
    is_pinch_active: bool,
    zoom: DeltaAccumulator,
    scroll: DeltaAccumulator,
    smoother: PositionSmoother,
    /// Display of the most recent position sample; a change re-seeds the smoother.
    last_requested_screen: Option<usize>,
    last_target: Option<CursorTarget>,
    cursor: CursorVisibility,
}

/// Holds the pointer state and turns adapter actions into collaborator calls.
pub struct GestureAccumulatorController {
    mapper: CoordinateMapper,
    injector: Arc<dyn InputInjector>,
    overlay: Arc<dyn OverlayPresenter>,
    state: ControllerState,
    notifications: broadcast::Sender<ControllerNotification>,
    disposed: bool,
}

impl GestureAccumulatorController {
    /// Creates a controller in Cursor mode targeting the mapper's default display.
    pub fn new(
        settings: &GestureSettings,
        mapper: CoordinateMapper,
        injector: Arc<dyn InputInjector>,
        overlay: Arc<dyn OverlayPresenter>,
    ) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        let target_screen_index = mapper.default_screen();
        Self {
            mapper,
            injector,
            overlay,
            state: ControllerState {
                mode: ControlMode::Cursor,
                target_screen_index,
                is_pinch_active: false,
                zoom: DeltaAccumulator::new(
                    WHEEL_UNIT,
                    settings.zoom_sensitivity,
                    settings.zoom_threshold,
                ),
                scroll: DeltaAccumulator::new(
                    HALF_WHEEL_UNIT,
                    settings.scroll_sensitivity,
                    settings.scroll_threshold,
                ),
                smoother: PositionSmoother::new(settings.position_smoothing),
                last_requested_screen: None,
                last_target: None,
                cursor: CursorVisibility::default(),
            },
            notifications,
            disposed: false,
        }
    }

    /// Subscribes to mode / target-screen change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerNotification> {
        self.notifications.subscribe()
    }

    /// Applies one adapter action.
    pub fn apply(&mut self, action: &GestureAction) {
        match *action {
            GestureAction::MovePointer {
                x, y, screen_index, ..
            } => self.update_position(x, y, screen_index),
            GestureAction::Zoom { stretch } => self.update_zoom(stretch),
            GestureAction::Scroll { roll } => self.update_scroll(roll),
            GestureAction::Swipe(direction) => {
                if !self.disposed {
                    report(self.injector.trigger_swipe_action(direction), "swipe action");
                }
            }
            GestureAction::StartPinch => self.start_pinch(),
            GestureAction::EndPinch => self.end_pinch(),
            GestureAction::ToggleMode => self.toggle_mode(),
            GestureAction::ResetZoom => self.reset_zoom(),
            GestureAction::ResetScroll => self.reset_scroll(),
        }
    }

    // ── Continuous channels ──────────────────────────────────────────────────

    /// Smooths a normalized position and moves the cursor or the overlay.
    ///
    /// `screen_index = None` targets the controller's current target display.
    pub fn update_position(&mut self, x: f64, y: f64, screen_index: Option<usize>) {
        if self.disposed {
            return;
        }

        let screen = screen_index.unwrap_or(self.state.target_screen_index);
        if self.state.last_requested_screen != Some(screen) {
            self.state.smoother.reset();
            self.state.last_requested_screen = Some(screen);
        }
        let (sx, sy) = self.state.smoother.push(x, y);
        let target = self.mapper.resolve(screen, sx, sy);
        self.state.last_target = Some(target);

        match self.state.mode {
            ControlMode::Cursor => match target {
                CursorTarget::Screen { physical, .. } => {
                    report(self.injector.move_cursor_to(physical.x, physical.y), "cursor move");
                }
                CursorTarget::PrimaryNormalized { x, y } => {
                    report(self.injector.move_cursor_normalized(x, y), "cursor move");
                }
            },
            ControlMode::LaserPointer => {
                if let Some(placement) = target.overlay_placement() {
                    report(self.overlay.move_to(&placement), "overlay move");
                }
            }
        }
    }

    /// Feeds the cumulative stretch ratio; emits whole zoom steps.
    pub fn update_zoom(&mut self, stretch: f64) {
        if self.disposed {
            return;
        }
        let steps = self.state.zoom.feed(stretch);
        if steps != 0 {
            debug!(steps, "zoom");
            report(self.injector.zoom(steps), "zoom");
        }
    }

    /// Feeds the roll value; emits half-notch wheel deltas.
    pub fn update_scroll(&mut self, roll: f64) {
        if self.disposed {
            return;
        }
        let steps = self.state.scroll.feed(roll);
        if steps != 0 {
            let delta = steps.saturating_mul(HALF_WHEEL_UNIT as i32);
            debug!(steps, delta, "scroll");
            report(self.injector.wheel_scroll(delta), "wheel scroll");
        }
    }

    pub fn reset_zoom(&mut self) {
        self.state.zoom.reset();
    }

    pub fn reset_scroll(&mut self) {
        self.state.scroll.reset();
    }

    // ── Pinch ────────────────────────────────────────────────────────────────

    /// Presses the left button.  Ignored while held, in LaserPointer mode, or
    /// after shutdown.
    pub fn start_pinch(&mut self) {
        if self.disposed || self.state.is_pinch_active {
            return;
        }
        if self.state.mode == ControlMode::LaserPointer {
            debug!("pinch ignored in laser-pointer mode");
            return;
        }
        self.state.is_pinch_active = true;
        report(
            self.injector.mouse_button(PointerButton::Left, true),
            "pinch press",
        );
    }

    /// Releases the left button if a pinch holds it.
    pub fn end_pinch(&mut self) {
        if !self.state.is_pinch_active {
            return;
        }
        self.state.is_pinch_active = false;
        report(
            self.injector.mouse_button(PointerButton::Left, false),
            "pinch release",
        );
    }

    // ── Mode ─────────────────────────────────────────────────────────────────

    /// Switches mode; a no-op when `mode` is already current.
    pub fn set_mode(&mut self, mode: ControlMode) {
        if self.disposed || mode == self.state.mode {
            return;
        }

        match mode {
            ControlMode::LaserPointer => {
                self.end_pinch();
                self.hide_system_cursor();
                match self.current_overlay_placement() {
                    Some(placement) => report(self.overlay.show_at(&placement), "overlay show"),
                    None => debug!("no display geometry; overlay not shown"),
                }
            }
            ControlMode::Cursor => {
                report(self.overlay.hide(), "overlay hide");
                self.show_system_cursor();
            }
        }

        self.state.mode = mode;
        info!("control mode: {mode}");
        let _ = self.notifications.send(ControllerNotification::ModeChanged(mode));
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.state.mode.toggled());
    }

    // ── Target screen ────────────────────────────────────────────────────────

    /// Changes the display used for packets without an explicit screen index.
    ///
    /// A no-op (and no notification) when `index` is already current.  In
    /// LaserPointer mode the overlay is relocated before the notification fires.
    pub fn set_target_screen_index(&mut self, index: usize) {
        if self.disposed || index == self.state.target_screen_index {
            return;
        }
        let previous = self.state.target_screen_index;
        self.state.target_screen_index = index;

        if self.state.mode == ControlMode::LaserPointer {
            // The normalized point is reused as-is on the new display, even if
            // it was last smoothed for another one.
            let (x, y) = self.state.smoother.current().unwrap_or((0.5, 0.5));
            let target = self.mapper.resolve(index, x, y);
            self.state.last_target = Some(target);
            if let Some(placement) = target.overlay_placement() {
                report(self.overlay.move_to(&placement), "overlay relocate");
            }
        }

        info!(previous, current = index, "target screen changed");
        let _ = self.notifications.send(ControllerNotification::TargetScreenChanged {
            previous,
            current: index,
        });
    }

    // ── Cursor visibility ────────────────────────────────────────────────────

    /// Adds a hide request; hides the cursor on the first one.
    pub fn hide_system_cursor(&mut self) {
        if self.state.cursor.hide() {
            report(self.injector.set_cursor_visible(false), "cursor hide");
        }
    }

    /// Balances one hide request; shows the cursor when none remain.
    pub fn show_system_cursor(&mut self) {
        if self.state.cursor.show() {
            report(self.injector.set_cursor_visible(true), "cursor show");
        }
    }

    // ── Resets and teardown ──────────────────────────────────────────────────

    /// Wholesale reset after tracking loss: releases the pinch and re-seeds
    /// the accumulators and the smoother.  Mode and target are kept.
    pub fn reset_tracking(&mut self) {
        self.end_pinch();
        self.state.zoom.reset();
        self.state.scroll.reset();
        self.state.smoother.reset();
        self.state.last_requested_screen = None;
    }

    /// Terminal cleanup: releases a held pinch, restores the cursor, closes
    /// the overlay.  Each step is attempted even if an earlier one fails.
    /// Idempotent; every other method is a no-op afterwards.
    pub fn shutdown(&mut self) {
        if self.disposed {
            return;
        }

        self.end_pinch();
        if self.state.cursor.release_all() {
            report(self.injector.set_cursor_visible(true), "cursor restore");
        }
        report(self.overlay.close(), "overlay close");

        let was_laser = self.state.mode == ControlMode::LaserPointer;
        self.state.mode = ControlMode::Cursor;
        self.disposed = true;
        if was_laser {
            let _ = self
                .notifications
                .send(ControllerNotification::ModeChanged(ControlMode::Cursor));
        }
        info!("gesture controller shut down");
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn mode(&self) -> ControlMode {
        self.state.mode
    }

    pub fn target_screen_index(&self) -> usize {
        self.state.target_screen_index
    }

    pub fn is_pinch_active(&self) -> bool {
        self.state.is_pinch_active
    }

    pub fn is_cursor_hidden(&self) -> bool {
        self.state.cursor.is_hidden()
    }

    pub fn zoom_remainder(&self) -> f64 {
        self.state.zoom.remainder()
    }

    pub fn scroll_remainder(&self) -> f64 {
        self.state.scroll.remainder()
    }

    pub fn last_target(&self) -> Option<CursorTarget> {
        self.state.last_target
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn current_overlay_placement(&self) -> Option<OverlayPlacement> {
        let (x, y) = self.state.smoother.current().unwrap_or((0.5, 0.5));
        let screen = self
            .state
            .last_requested_screen
            .unwrap_or(self.state.target_screen_index);
        self.mapper.resolve(screen, x, y).overlay_placement()
    }
}

impl Drop for GestureAccumulatorController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn report(result: Result<(), InjectionError>, what: &str) {
    if let Err(e) = result {
        warn!("{what} failed: {e}");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::map_coordinates::ScreenGeometryProvider;
    use crate::infrastructure::input_injection::mock::{
        InjectedCall, OverlayCall, RecordingInjector, RecordingOverlay,
    };
    use gesture_core::{
        DisplayOutput, PhysicalPoint, PhysicalRect, ScreenLayout, MAX_STEPS_PER_FEED,
    };

    struct FixedGeometry(Arc<ScreenLayout>);

    impl ScreenGeometryProvider for FixedGeometry {
        fn layout(&self) -> Arc<ScreenLayout> {
            Arc::clone(&self.0)
        }
        fn refresh(&self) -> Arc<ScreenLayout> {
            Arc::clone(&self.0)
        }
    }

    fn dual_mapper() -> CoordinateMapper {
        let outputs = vec![
            DisplayOutput {
                device_name: "a".into(),
                bounds: PhysicalRect::new(0, 0, 1000, 1000),
                dpi_scale: 1.0,
                is_primary: true,
            },
            DisplayOutput {
                device_name: "b".into(),
                bounds: PhysicalRect::new(1000, 0, 1000, 1000),
                dpi_scale: 1.0,
                is_primary: false,
            },
        ];
        let layout = Arc::new(ScreenLayout::arrange(outputs, 1));
        CoordinateMapper::new(Arc::new(FixedGeometry(layout)), 0)
    }

    struct Fixture {
        controller: GestureAccumulatorController,
        injector: Arc<RecordingInjector>,
        overlay: Arc<RecordingOverlay>,
    }

    fn fixture_with(settings: GestureSettings) -> Fixture {
        let injector = Arc::new(RecordingInjector::new());
        let overlay = Arc::new(RecordingOverlay::new());
        let controller = GestureAccumulatorController::new(
            &settings,
            dual_mapper(),
            injector.clone(),
            overlay.clone(),
        );
        Fixture {
            controller,
            injector,
            overlay,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(GestureSettings {
            position_smoothing: 0.0,
            ..GestureSettings::default()
        })
    }

    #[test]
    fn test_cursor_visibility_is_reference_counted() {
        let mut v = CursorVisibility::default();

        assert!(v.hide());
        assert!(!v.hide());
        assert!(!v.show());
        assert!(v.show());
        assert!(!v.show(), "extra show at zero must be ignored");
        assert_eq!(v.hide_count(), 0);
    }

    #[test]
    fn test_position_moves_cursor_on_target_screen() {
        // Arrange
        let mut f = fixture();

        // Act
        f.controller.update_position(0.5, 0.5, Some(1));

        // Assert
        assert_eq!(f.injector.calls(), vec![InjectedCall::MoveTo(1500, 500)]);
    }

    #[test]
    fn test_position_without_screen_uses_target_screen() {
        let mut f = fixture();
        f.controller.set_target_screen_index(1);

        f.controller.update_position(0.0, 0.0, None);

        assert_eq!(f.injector.calls(), vec![InjectedCall::MoveTo(1000, 0)]);
    }

    #[test]
    fn test_smoothing_seeds_on_first_sample_then_blends() {
        let mut f = fixture_with(GestureSettings {
            position_smoothing: 0.5,
            ..GestureSettings::default()
        });

        f.controller.update_position(0.0, 0.0, Some(0));
        f.controller.update_position(1.0, 1.0, Some(0));

        assert_eq!(
            f.injector.calls(),
            vec![InjectedCall::MoveTo(0, 0), InjectedCall::MoveTo(500, 500)]
        );
    }

    #[test]
    fn test_zoom_emits_whole_steps_and_carries_remainder() {
        // Arrange – default sensitivity 1200: 0.1 stretch = one wheel unit
        let mut f = fixture();

        // Act
        f.controller.update_zoom(1.0);
        f.controller.update_zoom(1.05);
        f.controller.update_zoom(1.25);

        // Assert – 60 → no step; 300 → two steps, 60 carried
        assert_eq!(f.injector.calls(), vec![InjectedCall::Zoom(2)]);
        assert!((f.controller.zoom_remainder() - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_scroll_emits_half_notch_deltas() {
        let mut f = fixture();

        f.controller.update_scroll(0.0);
        f.controller.update_scroll(1.0);

        // 1.0 × 120 = 120 = two half notches → wheel delta 120
        assert_eq!(f.injector.calls(), vec![InjectedCall::Wheel(120)]);
    }

    #[test]
    fn test_zoom_out_by_half_a_notch_floors_to_one_step() {
        let mut f = fixture();

        f.controller.update_zoom(1.0);
        f.controller.update_zoom(0.95);

        // -0.05 × 1200 = -60 → floor(-0.5) = -1, +60 carried
        assert_eq!(f.injector.calls(), vec![InjectedCall::Zoom(-1)]);
        assert!((f.controller.zoom_remainder() - 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_huge_roll_jump_scrolls_a_capped_amount_and_carries_the_rest() {
        // Arrange
        let mut f = fixture();
        f.controller.update_scroll(0.0);

        // Act
        f.controller.update_scroll(1.0e9);

        // Assert
        let half = HALF_WHEEL_UNIT as i32;
        assert_eq!(
            f.injector.calls(),
            vec![InjectedCall::Wheel(MAX_STEPS_PER_FEED * half)]
        );
        let accounted =
            f64::from(MAX_STEPS_PER_FEED) * HALF_WHEEL_UNIT + f.controller.scroll_remainder();
        assert!((accounted - 1.0e9 * 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_scroll_below_threshold_is_ignored() {
        let mut f = fixture();

        f.controller.update_scroll(0.0);
        f.controller.update_scroll(0.04);

        assert!(f.injector.calls().is_empty());
        assert_eq!(f.controller.scroll_remainder(), 0.0);
    }

    #[test]
    fn test_reset_zoom_discards_remainder_and_reseeds() {
        let mut f = fixture();
        f.controller.update_zoom(1.0);
        f.controller.update_zoom(1.08);

        f.controller.reset_zoom();
        f.controller.update_zoom(5.0);

        assert_eq!(f.controller.zoom_remainder(), 0.0);
        assert!(f.injector.calls().is_empty());
    }

    #[test]
    fn test_pinch_presses_and_releases_once() {
        let mut f = fixture();

        f.controller.start_pinch();
        f.controller.start_pinch();
        f.controller.end_pinch();
        f.controller.end_pinch();

        assert_eq!(
            f.injector.calls(),
            vec![
                InjectedCall::Button(PointerButton::Left, true),
                InjectedCall::Button(PointerButton::Left, false),
            ]
        );
    }

    #[test]
    fn test_entering_laser_mode_hides_cursor_and_shows_overlay() {
        // Arrange
        let mut f = fixture();
        f.controller.update_position(0.5, 0.5, Some(0));
        let mut rx = f.controller.subscribe();

        // Act
        f.controller.set_mode(ControlMode::LaserPointer);

        // Assert
        assert!(f.injector.calls().contains(&InjectedCall::CursorVisible(false)));
        assert!(matches!(
            f.overlay.calls().as_slice(),
            [OverlayCall::Show(p)] if p.physical == PhysicalPoint { x: 500, y: 500 }
        ));
        assert_eq!(
            rx.try_recv().ok(),
            Some(ControllerNotification::ModeChanged(ControlMode::LaserPointer))
        );
    }

    #[test]
    fn test_laser_mode_moves_overlay_not_cursor() {
        let mut f = fixture();
        f.controller.set_mode(ControlMode::LaserPointer);
        f.injector.clear();

        f.controller.update_position(0.25, 0.25, Some(1));

        assert!(f.injector.calls().is_empty());
        assert!(matches!(
            f.overlay.calls().last(),
            Some(OverlayCall::Move(p)) if p.screen_index == 1
        ));
    }

    #[test]
    fn test_entering_laser_mode_releases_held_pinch() {
        let mut f = fixture();
        f.controller.start_pinch();

        f.controller.set_mode(ControlMode::LaserPointer);

        assert!(!f.controller.is_pinch_active());
        assert!(f
            .injector
            .calls()
            .contains(&InjectedCall::Button(PointerButton::Left, false)));
    }

    #[test]
    fn test_pinch_is_suppressed_in_laser_mode() {
        let mut f = fixture();
        f.controller.set_mode(ControlMode::LaserPointer);
        f.injector.clear();

        f.controller.start_pinch();

        assert!(!f.controller.is_pinch_active());
        assert!(f.injector.calls().is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_cursor_mode_and_visibility() {
        let mut f = fixture();

        f.controller.toggle_mode();
        f.controller.toggle_mode();

        assert_eq!(f.controller.mode(), ControlMode::Cursor);
        assert!(!f.controller.is_cursor_hidden());
        assert_eq!(
            f.injector.calls(),
            vec![
                InjectedCall::CursorVisible(false),
                InjectedCall::CursorVisible(true)
            ]
        );
        assert_eq!(f.overlay.calls().last(), Some(&OverlayCall::Hide));
    }

    #[test]
    fn test_set_mode_to_current_mode_is_silent() {
        let mut f = fixture();
        let mut rx = f.controller.subscribe();

        f.controller.set_mode(ControlMode::Cursor);

        assert!(rx.try_recv().is_err());
        assert!(f.injector.calls().is_empty());
    }

    #[test]
    fn test_set_target_screen_same_value_is_silent() {
        let mut f = fixture();
        let mut rx = f.controller.subscribe();

        f.controller.set_target_screen_index(0);

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_set_target_screen_in_laser_mode_relocates_overlay_then_notifies() {
        // Arrange
        let mut f = fixture();
        f.controller.set_mode(ControlMode::LaserPointer);
        let mut rx = f.controller.subscribe();

        // Act
        f.controller.set_target_screen_index(1);

        // Assert
        assert!(matches!(
            f.overlay.calls().last(),
            Some(OverlayCall::Move(p)) if p.screen_index == 1
        ));
        assert_eq!(
            rx.try_recv().ok(),
            Some(ControllerNotification::TargetScreenChanged {
                previous: 0,
                current: 1
            })
        );
    }

    #[test]
    fn test_shutdown_releases_everything_in_order() {
        // Arrange
        let mut f = fixture();
        f.controller.start_pinch();
        f.controller.hide_system_cursor();
        f.controller.hide_system_cursor();
        f.injector.clear();

        // Act
        f.controller.shutdown();

        // Assert
        assert_eq!(
            f.injector.calls(),
            vec![
                InjectedCall::Button(PointerButton::Left, false),
                InjectedCall::CursorVisible(true),
            ]
        );
        assert_eq!(f.overlay.calls().last(), Some(&OverlayCall::Close));
    }

    #[test]
    fn test_shutdown_is_terminal_and_idempotent() {
        let mut f = fixture();
        f.controller.shutdown();
        f.injector.clear();
        f.overlay.clear();

        f.controller.shutdown();
        f.controller.update_position(0.5, 0.5, None);
        f.controller.start_pinch();
        f.controller.set_mode(ControlMode::LaserPointer);

        assert!(f.controller.is_disposed());
        assert!(f.injector.calls().is_empty());
        assert!(f.overlay.calls().is_empty());
    }

    #[test]
    fn test_shutdown_continues_after_collaborator_failure() {
        let mut f = fixture();
        f.controller.start_pinch();
        f.controller.hide_system_cursor();
        f.injector.set_failing(true);

        f.controller.shutdown();

        assert_eq!(f.overlay.calls().last(), Some(&OverlayCall::Close));
    }

    #[test]
    fn test_drop_runs_shutdown() {
        let f = fixture();
        let overlay = f.overlay.clone();

        drop(f);

        assert_eq!(overlay.calls().last(), Some(&OverlayCall::Close));
    }

    #[test]
    fn test_reset_tracking_releases_pinch_and_reseeds() {
        let mut f = fixture();
        f.controller.start_pinch();
        f.controller.update_zoom(1.0);
        f.controller.update_zoom(1.05);

        f.controller.reset_tracking();

        assert!(!f.controller.is_pinch_active());
        assert_eq!(f.controller.zoom_remainder(), 0.0);
        assert_eq!(f.controller.mode(), ControlMode::Cursor);
    }
}
