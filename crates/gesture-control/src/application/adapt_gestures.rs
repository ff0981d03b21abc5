//! GestureStateAdapter: per-event gating, debouncing and transition handling.
//!
//! The adapter is the first stateful stage after the listener.  It turns each
//! [`GestureEvent`] into zero or more [`GestureAction`]s for the accumulator
//! controller, in this order:
//!
//! 1. **Confidence gate.**  Events below the minimum confidence are dropped,
//!    except `None` events, which always pass so that held state (a pinch)
//!    is released even when the recogniser is unsure.
//! 2. **Transition table.**  When the gesture type changes, state owned by
//!    the previous type is released:
//!
//!    | From → To                        | Action                              |
//!    |----------------------------------|-------------------------------------|
//!    | Pinch → anything else            | `EndPinch` if the pinch was active  |
//!    | TwoFingerPointer → anything else | `ResetZoom`                         |
//!    | ThumbsUp → anything else         | `ResetScroll`                       |
//!    | anything → None                  | `EndPinch` if the pinch was active  |
//!
//! 3. **Dispatch** by type (see [`GestureStateAdapter::process`]).
//!
//! # Pinch pre-positioning
//!
//! On the rising edge of a pinch the adapter emits `MovePointer` *before*
//! `StartPinch`.  Without it the button-down lands at the previous frame's
//! cursor position and the first drag frame jumps.

use std::time::{Duration, Instant};

use gesture_core::{GestureEvent, GestureSettings, GestureType, SwipeDirection};
use tracing::{debug, trace};

/// A discrete instruction for the accumulator controller.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureAction {
    /// Move the pointer (or the overlay) to a normalized position.
    MovePointer {
        x: f64,
        y: f64,
        finger_count: u8,
        screen_index: Option<usize>,
    },
    /// Feed the cumulative stretch ratio to the zoom channel.
    Zoom { stretch: f64 },
    /// Feed the roll value to the scroll channel.
    Scroll { roll: f64 },
    Swipe(SwipeDirection),
    StartPinch,
    EndPinch,
    ToggleMode,
    /// Clear the zoom accumulator and re-seed on the next sample.
    ResetZoom,
    /// Clear the scroll accumulator and re-seed on the next sample.
    ResetScroll,
}

/// Counters for diagnosing a stream that "silently stops" producing intents.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AdapterStats {
    pub processed: u64,
    pub confidence_rejected: u64,
    pub swipes_debounced: u64,
    pub claps_debounced: u64,
}

/// Gesture-type state machine.
pub struct GestureStateAdapter {
    swipe_debounce: Duration,
    clap_debounce: Duration,
    min_confidence: f64,
    last_gesture_type: GestureType,
    was_pinch_active: bool,
    last_swipe_at: Option<Instant>,
    last_clap_at: Option<Instant>,
    stats: AdapterStats,
}

impl GestureStateAdapter {
    pub fn new(settings: &GestureSettings) -> Self {
        Self {
            swipe_debounce: settings.swipe_debounce,
            clap_debounce: settings.clap_debounce,
            min_confidence: settings.min_confidence,
            last_gesture_type: GestureType::None,
            was_pinch_active: false,
            last_swipe_at: None,
            last_clap_at: None,
            stats: AdapterStats::default(),
        }
    }

    /// Processes one event and returns the actions it produces, in order.
    ///
    /// Dispatch by type:
    ///
    /// - `Pointer`: `MovePointer` with one finger.
    /// - `TwoFingerPointer`: `MovePointer` with two fingers, then `Zoom`.
    /// - `Swipe`: `Swipe` unless within the swipe debounce interval.
    /// - `Pinch`: rising edge → `MovePointer` then `StartPinch`; falling edge
    ///   → `EndPinch`; otherwise `MovePointer` (drag or hover).
    /// - `ThumbsUp`: `Scroll`.
    /// - `Clap`: `ToggleMode` unless within the clap debounce interval.
    /// - `None`: releases an active pinch, otherwise nothing.
    pub fn process(&mut self, event: &GestureEvent) -> Vec<GestureAction> {
        self.stats.processed += 1;

        // NaN confidence fails the comparison and is rejected too.
        if event.gesture_type != GestureType::None && !(event.confidence >= self.min_confidence) {
            self.stats.confidence_rejected += 1;
            trace!(
                gesture = %event.gesture_type,
                confidence = event.confidence,
                "below minimum confidence; dropped"
            );
            return Vec::new();
        }

        let mut actions = Vec::with_capacity(3);
        self.apply_transition(event.gesture_type, &mut actions);

        match event.gesture_type {
            GestureType::Pointer => actions.push(move_pointer(event, 1)),
            GestureType::TwoFingerPointer => {
                actions.push(move_pointer(event, 2));
                actions.push(GestureAction::Zoom {
                    stretch: event.stretch,
                });
            }
            GestureType::Swipe => {
                if debounce_passes(&mut self.last_swipe_at, self.swipe_debounce, event.received_at) {
                    actions.push(GestureAction::Swipe(event.swipe_direction));
                } else {
                    self.stats.swipes_debounced += 1;
                    debug!("swipe {} debounced", event.swipe_direction);
                }
            }
            GestureType::Pinch => match (self.was_pinch_active, event.pinch_active) {
                (false, true) => {
                    actions.push(move_pointer(event, event.finger_count));
                    actions.push(GestureAction::StartPinch);
                    self.was_pinch_active = true;
                }
                (true, false) => {
                    actions.push(GestureAction::EndPinch);
                    self.was_pinch_active = false;
                }
                _ => actions.push(move_pointer(event, event.finger_count)),
            },
            GestureType::ThumbsUp => actions.push(GestureAction::Scroll { roll: event.roll }),
            GestureType::Clap => {
                if debounce_passes(&mut self.last_clap_at, self.clap_debounce, event.received_at) {
                    actions.push(GestureAction::ToggleMode);
                } else {
                    self.stats.claps_debounced += 1;
                    debug!("clap debounced");
                }
            }
            GestureType::None => {
                if self.was_pinch_active {
                    actions.push(GestureAction::EndPinch);
                    self.was_pinch_active = false;
                }
            }
        }

        actions
    }

    /// Releases everything the adapter holds (tracking loss, shutdown).
    ///
    /// Debounce timestamps are kept, so a clap right before tracking loss
    /// cannot fire again right after it.
    pub fn reset(&mut self) -> Vec<GestureAction> {
        let mut actions = Vec::new();
        self.apply_transition(GestureType::None, &mut actions);
        if self.was_pinch_active {
            actions.push(GestureAction::EndPinch);
            self.was_pinch_active = false;
        }
        actions
    }

    pub fn last_gesture_type(&self) -> GestureType {
        self.last_gesture_type
    }

    pub fn is_pinch_active(&self) -> bool {
        self.was_pinch_active
    }

    pub fn stats(&self) -> AdapterStats {
        self.stats
    }

    fn apply_transition(&mut self, next: GestureType, actions: &mut Vec<GestureAction>) {
        let previous = self.last_gesture_type;
        self.last_gesture_type = next;
        if previous == next {
            return;
        }

        debug!(from = %previous, to = %next, "gesture type changed");
        match previous {
            GestureType::Pinch if self.was_pinch_active => {
                actions.push(GestureAction::EndPinch);
                self.was_pinch_active = false;
            }
            GestureType::TwoFingerPointer => actions.push(GestureAction::ResetZoom),
            GestureType::ThumbsUp => actions.push(GestureAction::ResetScroll),
            _ => {}
        }
    }
}

fn move_pointer(event: &GestureEvent, finger_count: u8) -> GestureAction {
    GestureAction::MovePointer {
        x: event.x,
        y: event.y,
        finger_count,
        screen_index: event.screen_index,
    }
}

/// Returns `true` and records `now` if at least `interval` has passed since
/// the last accepted occurrence.  An event stamped earlier than the last
/// accepted one counts as zero elapsed time.
fn debounce_passes(last: &mut Option<Instant>, interval: Duration, now: Instant) -> bool {
    if let Some(previous) = *last {
        if now.saturating_duration_since(previous) < interval {
            return false;
        }
    }
    *last = Some(now);
    true
}

// ── Tests ─────────────────────────────────────────────────────────────────────
