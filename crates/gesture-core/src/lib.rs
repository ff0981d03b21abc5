//! # gesture-core
//!
//! Shared library for gesture-driven pointer control containing the gesture
//! event model, the multi-monitor geometry model, the delta accumulators that
//! turn continuous motion into discrete wheel steps, and the two wire codecs.
//!
//! It has zero dependencies on OS APIs, UI frameworks, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! An upstream vision module watches the user's hands and sends one small
//! JSON datagram per observation: where the index finger points (as a
//! normalized `[0, 1]` coordinate), how many fingers are up, how far two
//! hands are stretched apart, and so on.  The controller application turns
//! that noisy stream into a handful of discrete OS actions: move the cursor,
//! press the button, scroll one notch, zoom one step, switch windows.
//!
//! This crate (`gesture-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Pure logic with no OS dependencies: the [`GestureEvent`]
//!   type, the sorted [`ScreenLayout`] of physical displays, the
//!   [`DeltaAccumulator`] that converts stretch/roll deltas into wheel steps
//!   without drift, and the [`PositionSmoother`].
//!
//! - **`protocol`** – How bytes travel over UDP.  The JSON gesture packet
//!   codec and the legacy single-line text command codec.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `gesture_core::GestureEvent` instead of `gesture_core::domain::gesture::GestureEvent`.
pub use domain::accumulator::{DeltaAccumulator, HALF_WHEEL_UNIT, MAX_STEPS_PER_FEED, WHEEL_UNIT};
pub use domain::gesture::{GestureEvent, GestureType, SwipeDirection};
pub use domain::mode::ControlMode;
pub use domain::screen::{
    DisplayOutput, LogicalPoint, PhysicalPoint, PhysicalRect, ScreenInfo, ScreenLayout,
};
pub use domain::settings::GestureSettings;
pub use domain::smoothing::PositionSmoother;
pub use protocol::gesture_packet::{decode_gesture_packet, encode_gesture_packet, PacketError};
pub use protocol::legacy::{LegacyCommand, LegacyParseError};
