//! Application layer use cases for the gesture controller.
//!
//! # What use cases does the controller have?
//!
//! - **`intents`** – The outbound ports.  `InputInjector` and
//!   `OverlayPresenter` are the only way the pipeline touches the OS; their
//!   implementations are injected at construction time.
//!
//! - **`map_coordinates`** – Resolves normalized gesture coordinates onto the
//!   current display layout, with a fixed fallback chain for displays that
//!   are missing.  The layout comes from a `ScreenGeometryProvider`.
//!
//! - **`adapt_gestures`** – Gates events by confidence, debounces swipes and
//!   claps, and turns gesture-type changes into explicit release actions.
//!
//! - **`accumulate`** – Owns the control mode, the zoom/scroll accumulators,
//!   the position smoother and the pinch state, and emits discrete intents.
//!
//! - **`pipeline`** – Glues the adapter to the controller and handles
//!   tracking loss.
//!
//! - **`legacy_commands`** – Executes one-line text-protocol commands
//!   directly against the injector.

pub mod accumulate;
pub mod adapt_gestures;
pub mod intents;
pub mod legacy_commands;
pub mod map_coordinates;
pub mod pipeline;
