//! End-to-end pipeline properties: decoded packet → adapter → controller →
//! injection port, over a mock display layout.

use std::sync::Arc;
use std::time::{Duration, Instant};

use mockall::predicate::eq;
use mockall::{mock, Sequence};

use gesture_control::application::accumulate::{
    ControllerNotification, GestureAccumulatorController,
};
use gesture_control::application::adapt_gestures::GestureStateAdapter;
use gesture_control::application::intents::{InjectionError, InputInjector, PointerButton};
use gesture_control::application::map_coordinates::CoordinateMapper;
use gesture_control::application::pipeline::GesturePipeline;
use gesture_control::infrastructure::input_injection::mock::{
    InjectedCall, OverlayCall, RecordingInjector, RecordingOverlay,
};
use gesture_control::infrastructure::screen_info::{
    MockScreenEnumerator, PlatformScreenEnumerator, ScreenGeometryCache,
};
use gesture_core::{
    decode_gesture_packet, ControlMode, GestureEvent, GestureSettings, SwipeDirection, WHEEL_UNIT,
};

mock! {
    pub Injector {}

    impl InputInjector for Injector {
        fn move_cursor_to(&self, x: i32, y: i32) -> Result<(), InjectionError>;
        fn move_cursor_by(&self, dx: i32, dy: i32) -> Result<(), InjectionError>;
        fn move_cursor_normalized(&self, x: f64, y: f64) -> Result<(), InjectionError>;
        fn set_cursor_visible(&self, visible: bool) -> Result<(), InjectionError>;
        fn mouse_button(&self, button: PointerButton, down: bool) -> Result<(), InjectionError>;
        fn wheel_scroll(&self, delta: i32) -> Result<(), InjectionError>;
        fn zoom(&self, steps: i32) -> Result<(), InjectionError>;
        fn trigger_swipe_action(&self, direction: SwipeDirection) -> Result<(), InjectionError>;
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn settings() -> GestureSettings {
    GestureSettings {
        position_smoothing: 0.0,
        ..GestureSettings::default()
    }
}

fn pipeline_with(
    injector: Arc<dyn InputInjector>,
    overlay: Arc<RecordingOverlay>,
    enumerator: MockScreenEnumerator,
    default_screen: usize,
) -> GesturePipeline {
    let geometry = Arc::new(ScreenGeometryCache::new(
        Arc::new(enumerator),
        Duration::from_secs(3),
    ));
    let controller = GestureAccumulatorController::new(
        &settings(),
        CoordinateMapper::new(geometry, default_screen),
        injector,
        overlay,
    );
    GesturePipeline::new(GestureStateAdapter::new(&settings()), controller)
}

/// A pipeline over two 2560×1440 displays with recording collaborators.
fn recording_pipeline() -> (GesturePipeline, Arc<RecordingInjector>, Arc<RecordingOverlay>) {
    let injector = Arc::new(RecordingInjector::new());
    let overlay = Arc::new(RecordingOverlay::new());
    let pipeline = pipeline_with(
        injector.clone(),
        overlay.clone(),
        MockScreenEnumerator::dual_1440p(),
        0,
    );
    (pipeline, injector, overlay)
}

fn packet(json: &str, at: Instant) -> GestureEvent {
    decode_gesture_packet(json.as_bytes(), at).expect("test packet must decode")
}

fn zoom_steps(calls: &[InjectedCall]) -> i32 {
    calls
        .iter()
        .map(|c| match c {
            InjectedCall::Zoom(steps) => *steps,
            _ => 0,
        })
        .sum()
}

// ── Properties ────────────────────────────────────────────────────────────────

#[test]
fn test_zoom_steps_plus_remainder_equal_scaled_deltas() {
    // Arrange
    let (mut pipeline, injector, _overlay) = recording_pipeline();
    let stretches = [1.0, 1.03, 1.11, 0.95, 0.90, 1.40, 1.02, 1.021, 0.5];
    let t0 = Instant::now();

    // Act
    for (i, stretch) in stretches.iter().enumerate() {
        let json = format!(r#"{{"type":"two_finger","stretch":{stretch}}}"#);
        pipeline.handle_event(&packet(&json, t0 + Duration::from_millis(i as u64 * 33)));
    }

    // Assert
    let emitted = f64::from(zoom_steps(&injector.calls())) * WHEEL_UNIT;
    let remainder = pipeline.controller().zoom_remainder();
    let scaled_total = (stretches[stretches.len() - 1] - stretches[0]) * 1200.0;
    assert!(
        (emitted + remainder - scaled_total).abs() < 1e-6,
        "emitted {emitted} + remainder {remainder} != scaled deltas {scaled_total}"
    );
    assert!(remainder.abs() < WHEEL_UNIT);
}

#[test]
fn test_swipes_closer_than_debounce_yield_one_action() {
    let (mut pipeline, injector, _overlay) = recording_pipeline();
    let t0 = Instant::now();

    pipeline.handle_event(&packet(r#"{"type":"swipe","swipeDirection":"left"}"#, t0));
    pipeline.handle_event(&packet(
        r#"{"type":"swipe","swipeDirection":"left"}"#,
        t0 + Duration::from_millis(499),
    ));

    assert_eq!(
        injector.calls(),
        vec![InjectedCall::Swipe(SwipeDirection::Left)]
    );
}

#[test]
fn test_swipes_at_debounce_interval_yield_two_actions() {
    let (mut pipeline, injector, _overlay) = recording_pipeline();
    let t0 = Instant::now();

    pipeline.handle_event(&packet(r#"{"type":"swipe","swipeDirection":"left"}"#, t0));
    pipeline.handle_event(&packet(
        r#"{"type":"swipe","swipeDirection":"right"}"#,
        t0 + Duration::from_millis(500),
    ));

    assert_eq!(
        injector.calls(),
        vec![
            InjectedCall::Swipe(SwipeDirection::Left),
            InjectedCall::Swipe(SwipeDirection::Right),
        ]
    );
}

#[test]
fn test_pinch_press_is_preceded_by_position_update() {
    // Arrange – strict ordering: move first, then press
    let mut injector = MockInjector::new();
    let mut seq = Sequence::new();
    injector
        .expect_move_cursor_to()
        .with(eq(640), eq(360))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    injector
        .expect_move_cursor_to()
        .with(eq(1280), eq(720))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    injector
        .expect_mouse_button()
        .with(eq(PointerButton::Left), eq(true))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(()));
    injector
        .expect_mouse_button()
        .with(eq(PointerButton::Left), eq(false))
        .times(1)
        .returning(|_, _| Ok(()));
    let mut pipeline = pipeline_with(
        Arc::new(injector),
        Arc::new(RecordingOverlay::new()),
        MockScreenEnumerator::dual_1440p(),
        0,
    );
    let t0 = Instant::now();

    // Act – hover at 25 %, then press at 50 %
    pipeline.handle_event(&packet(
        r#"{"type":"pinch","x":0.25,"y":0.25,"pinchActive":false}"#,
        t0,
    ));
    pipeline.handle_event(&packet(
        r#"{"type":"pinch","x":0.5,"y":0.5,"pinchActive":true}"#,
        t0 + Duration::from_millis(33),
    ));

    // Assert – the release comes from shutdown; expectations are checked on drop
    pipeline.shutdown();
}

#[test]
fn test_leaving_two_finger_discards_zoom_carry() {
    // Arrange
    let (mut pipeline, injector, _overlay) = recording_pipeline();
    let t0 = Instant::now();
    let at = |ms: u64| t0 + Duration::from_millis(ms);

    // Act – 60 units carried, then an unrelated gesture, then a new stream
    pipeline.handle_event(&packet(r#"{"type":"two_finger","stretch":1.0}"#, at(0)));
    pipeline.handle_event(&packet(r#"{"type":"two_finger","stretch":1.05}"#, at(33)));
    pipeline.handle_event(&packet(r#"{"type":"pointer"}"#, at(66)));
    pipeline.handle_event(&packet(r#"{"type":"two_finger","stretch":2.0}"#, at(99)));
    pipeline.handle_event(&packet(r#"{"type":"two_finger","stretch":2.05}"#, at(132)));

    // Assert – the jump from 1.05 to 2.0 must not be counted
    assert_eq!(zoom_steps(&injector.calls()), 0);
    assert!((pipeline.controller().zoom_remainder() - 60.0).abs() < 1e-6);
}

#[test]
fn test_unknown_screen_falls_back_to_default_display() {
    let (mut pipeline, injector, _overlay) = recording_pipeline();

    pipeline.handle_event(&packet(
        r#"{"type":"pointer","x":0.5,"y":0.5,"screenIndex":5}"#,
        Instant::now(),
    ));

    assert_eq!(injector.calls(), vec![InjectedCall::MoveTo(1280, 720)]);
}

#[test]
fn test_explicit_screen_index_targets_that_display() {
    let (mut pipeline, injector, _overlay) = recording_pipeline();

    pipeline.handle_event(&packet(
        r#"{"type":"pointer","x":0.0,"y":0.0,"screenIndex":1}"#,
        Instant::now(),
    ));

    assert_eq!(injector.calls(), vec![InjectedCall::MoveTo(2560, 0)]);
}

#[test]
fn test_two_claps_within_debounce_toggle_mode_once() {
    // Arrange
    let (mut pipeline, injector, overlay) = recording_pipeline();
    let mut notifications = pipeline.controller().subscribe();
    let t0 = Instant::now();

    // Act
    pipeline.handle_event(&packet(r#"{"type":"clap"}"#, t0));
    pipeline.handle_event(&packet(r#"{"type":"clap"}"#, t0 + Duration::from_millis(400)));

    // Assert
    assert_eq!(pipeline.controller().mode(), ControlMode::LaserPointer);
    assert_eq!(
        notifications.try_recv().ok(),
        Some(ControllerNotification::ModeChanged(ControlMode::LaserPointer))
    );
    assert!(notifications.try_recv().is_err(), "exactly one toggle");
    assert_eq!(injector.calls(), vec![InjectedCall::CursorVisible(false)]);
    assert!(matches!(overlay.calls().as_slice(), [OverlayCall::Show(_)]));
    assert_eq!(pipeline.adapter_stats().claps_debounced, 1);
}

#[test]
fn test_low_confidence_pointer_is_dropped_but_none_releases_pinch() {
    // Arrange – any unexpected injector call fails the test
    let mut injector = MockInjector::new();
    injector
        .expect_move_cursor_to()
        .times(1)
        .returning(|_, _| Ok(()));
    injector
        .expect_mouse_button()
        .with(eq(PointerButton::Left), eq(true))
        .times(1)
        .returning(|_, _| Ok(()));
    injector
        .expect_mouse_button()
        .with(eq(PointerButton::Left), eq(false))
        .times(1)
        .returning(|_, _| Ok(()));
    let mut pipeline = pipeline_with(
        Arc::new(injector),
        Arc::new(RecordingOverlay::new()),
        MockScreenEnumerator::single_1080p(),
        0,
    );
    let t0 = Instant::now();

    // Act
    pipeline.handle_event(&packet(r#"{"type":"pinch","pinchActive":true}"#, t0));
    pipeline.handle_event(&packet(
        r#"{"type":"pointer","x":0.1,"y":0.1,"confidence":0.5}"#,
        t0 + Duration::from_millis(33),
    ));
    pipeline.handle_event(&packet(
        r#"{"type":"none","confidence":0.5}"#,
        t0 + Duration::from_millis(66),
    ));

    // Assert
    assert!(!pipeline.controller().is_pinch_active());
    assert_eq!(pipeline.adapter_stats().confidence_rejected, 1);
}

#[test]
fn test_thumbs_up_roll_scrolls_in_half_notches() {
    let (mut pipeline, injector, _overlay) = recording_pipeline();
    let t0 = Instant::now();

    pipeline.handle_event(&packet(r#"{"type":"thumbs_up","roll":0.0}"#, t0));
    pipeline.handle_event(&packet(
        r#"{"type":"thumbs_up","roll":-0.5}"#,
        t0 + Duration::from_millis(33),
    ));

    // -0.5 × 120 = -60 = one half notch down
    assert_eq!(injector.calls(), vec![InjectedCall::Wheel(-60)]);
}

#[test]
fn test_laser_mode_routes_positions_to_overlay() {
    // Arrange
    let (mut pipeline, injector, overlay) = recording_pipeline();
    let t0 = Instant::now();
    pipeline.handle_event(&packet(r#"{"type":"clap"}"#, t0));
    injector.clear();

    // Act
    pipeline.handle_event(&packet(
        r#"{"type":"pointer","x":0.5,"y":0.5,"screenIndex":1}"#,
        t0 + Duration::from_millis(33),
    ));

    // Assert
    assert!(injector.calls().is_empty());
    match overlay.calls().last() {
        Some(OverlayCall::Move(p)) => {
            assert_eq!(p.screen_index, 1);
            assert_eq!((p.physical.x, p.physical.y), (3840, 720));
        }
        other => panic!("expected an overlay move, got {other:?}"),
    }
}

#[test]
fn test_tracking_loss_then_shutdown_release_in_order() {
    // Arrange
    let (mut pipeline, injector, overlay) = recording_pipeline();
    let t0 = Instant::now();
    pipeline.handle_event(&packet(r#"{"type":"pinch","pinchActive":true}"#, t0));
    injector.clear();

    // Act
    pipeline.on_tracking_lost();
    pipeline.shutdown();
    pipeline.shutdown();

    // Assert
    assert_eq!(
        injector.calls(),
        vec![InjectedCall::Button(PointerButton::Left, false)]
    );
    assert_eq!(overlay.calls(), vec![OverlayCall::Close]);
    assert!(overlay.is_closed());
}

#[test]
fn test_hot_plug_is_picked_up_after_refresh() {
    // Arrange
    let enumerator = Arc::new(MockScreenEnumerator::single_1080p());
    let geometry = Arc::new(ScreenGeometryCache::new(
        enumerator.clone(),
        Duration::from_secs(5),
    ));
    let mapper = CoordinateMapper::new(geometry, 0);
    assert_eq!(
        mapper.resolve(1, 0.5, 0.5).screen_index(),
        Some(0),
        "screen 1 absent before hot-plug"
    );

    // Act
    let dual = MockScreenEnumerator::dual_1440p()
        .enumerate_displays()
        .expect("mock enumeration succeeds");
    enumerator.set_displays(dual);
    mapper.refresh();

    // Assert
    assert_eq!(mapper.resolve(1, 0.5, 0.5).screen_index(), Some(1));
}
