//! gesture-control library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does gesture-control do? (for beginners)
//!
//! A hand-tracking sender (a phone, a camera box, a script) recognises
//! gestures and sends one small JSON packet per video frame over UDP:
//! "pinch at 42 % / 61 % on screen 1".  This process turns that stream into
//! ordinary pointer input on the machine it runs on:
//!
//! 1. The **listener** receives datagrams, decodes them, and drops packets
//!    addressed to another device or display.
//! 2. The **state adapter** discards low-confidence frames, debounces swipes
//!    and claps, and notices when the gesture type changes so held state
//!    (a pressed button) is released.
//! 3. The **accumulator controller** smooths the pointer position, turns
//!    continuous zoom and scroll values into whole wheel steps, and decides
//!    whether a position moves the cursor or the laser-pointer overlay.
//! 4. The **coordinate mapper** converts normalized positions into physical
//!    pixels on the right monitor, using a short-lived cache of the display
//!    layout.
//!
//! A second listener accepts the older one-line text protocol
//! (`Move:10,-5`, `LeftClick`, ...) and executes those commands directly.

/// Application layer: use cases and outbound ports.
pub mod application;

/// Infrastructure layer: sockets, display enumeration, collaborators, storage.
pub mod infrastructure;
