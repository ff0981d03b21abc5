//! Gesture packet listener: JSON decoding plus device and screen filters.
//!
//! # Filters
//!
//! | Filter          | Wildcard           | Rejects when                                   |
//! |-----------------|--------------------|------------------------------------------------|
//! | device id       | empty string       | packet carries a non-empty, different id       |
//! | screen index    | negative number    | packet carries an index and it differs         |
//!
//! A packet without a device id or without a screen index is never rejected
//! by the corresponding filter.

use std::time::Instant;

use gesture_core::{decode_gesture_packet, GestureEvent};
use tokio::sync::mpsc;
use tracing::info;

use super::{
    start_listener, DatagramDecoder, ListenerConfig, ListenerError, ListenerEvent, ListenerHandle,
    Rejection,
};

/// Identity filters applied after decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GestureFilter {
    device_id: Option<String>,
    screen_index: Option<usize>,
}

impl GestureFilter {
    /// Builds a filter from configuration values: an empty `device_id` and a
    /// negative `screen_index` are wildcards.
    pub fn new(device_id: &str, screen_index: i32) -> Self {
        let device_id = device_id.trim();
        Self {
            device_id: (!device_id.is_empty()).then(|| device_id.to_string()),
            screen_index: usize::try_from(screen_index).ok(),
        }
    }

    /// Accepts every packet.
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    pub fn screen_index(&self) -> Option<usize> {
        self.screen_index
    }

    /// Checks `event` against both filters.
    ///
    /// # Errors
    ///
    /// Returns the first mismatch as a [`Rejection`].
    pub fn check(&self, event: &GestureEvent) -> Result<(), Rejection> {
        if let (Some(expected), Some(actual)) = (&self.device_id, &event.device_id) {
            if expected != actual {
                return Err(Rejection::DeviceMismatch {
                    expected: expected.clone(),
                    actual: actual.clone(),
                });
            }
        }
        if let (Some(expected), Some(actual)) = (self.screen_index, event.screen_index) {
            if expected != actual {
                return Err(Rejection::ScreenMismatch { expected, actual });
            }
        }
        Ok(())
    }
}

/// [`DatagramDecoder`] for JSON gesture packets.
#[derive(Debug, Clone, Default)]
pub struct GestureDatagramDecoder {
    filter: GestureFilter,
}

impl GestureDatagramDecoder {
    pub fn new(filter: GestureFilter) -> Self {
        Self { filter }
    }
}

impl DatagramDecoder for GestureDatagramDecoder {
    type Output = GestureEvent;

    fn decode(&self, datagram: &[u8], received_at: Instant) -> Result<GestureEvent, Rejection> {
        let event = decode_gesture_packet(datagram, received_at)
            .map_err(|e| Rejection::Malformed(e.to_string()))?;
        self.filter.check(&event)?;
        Ok(event)
    }
}

/// Starts the gesture packet listener.
///
/// # Errors
///
/// Returns [`ListenerError::BindFailed`] if the port is unavailable.
pub async fn start_gesture_listener(
    config: &ListenerConfig,
    filter: GestureFilter,
) -> Result<(ListenerHandle, mpsc::Receiver<ListenerEvent<GestureEvent>>), ListenerError> {
    match filter.device_id() {
        Some(id) => info!("gesture listener: accepting packets from device '{id}' only"),
        None => info!("gesture listener: accepting packets from any device"),
    }
    match filter.screen_index() {
        Some(index) => info!("gesture listener: accepting packets for screen {index} only"),
        None => info!("gesture listener: accepting packets for any screen"),
    }
    start_listener(config, GestureDatagramDecoder::new(filter)).await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
