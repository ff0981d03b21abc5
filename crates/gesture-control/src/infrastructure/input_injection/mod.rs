//! Implementations of the outbound injection and overlay ports.
//!
//! OS-level injection (`SendInput`, XTest, `CGEvent`) and the overlay window
//! are provided by the embedding desktop shell.  This crate ships two sets of
//! collaborators:
//!
//! - **`tracing_injector`** – `TracingInjector` / `TracingOverlay`, the
//!   binary's defaults.  They log every intent and track the state a real
//!   implementation would hold, so the daemon can be run headless.
//!
//! - **`mock`** – `RecordingInjector` / `RecordingOverlay`, which record calls
//!   in order for tests.  Always compiled so integration tests can use them.

pub mod mock;
pub mod tracing_injector;
