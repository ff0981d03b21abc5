//! Infrastructure layer for the gesture controller.
//!
//! Contains OS-facing adapters: UDP sockets, display enumeration, the clock,
//! the injection collaborators and config-file storage.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `gesture_core`, but MUST NOT be imported by the `application` or domain
//! layers.  Where the application needs something from here (the display
//! layout) it declares a trait (`ScreenGeometryProvider`) and this layer
//! implements it.
//!
//! # Sub-modules
//!
//! - **`network`** – Tokio UDP receive loop shared by the gesture-packet
//!   listener and the legacy text-command listener, plus the device and
//!   screen filters.
//!
//! - **`screen_info`** – OS-specific display enumeration (`EnumDisplayMonitors`
//!   on Windows, Xlib on Linux with the `x11` feature, `CGDisplay` on macOS)
//!   and the TTL-bounded `ScreenGeometryCache`.  A `MockScreenEnumerator` is
//!   always compiled for tests.
//!
//! - **`input_injection`** – Log-only default collaborators and the
//!   recording mocks used by tests.
//!
//! - **`clock`** – Time source abstraction so cache expiry can be tested
//!   without sleeping.
//!
//! - **`storage`** – TOML configuration persistence.

pub mod clock;
pub mod input_injection;
pub mod network;
pub mod screen_info;
pub mod storage;
