//! Legacy text-command listener (one command per datagram, default port 8080).

use std::time::Instant;

use gesture_core::LegacyCommand;
use tokio::sync::mpsc;

use super::{
    start_listener, DatagramDecoder, ListenerConfig, ListenerError, ListenerEvent, ListenerHandle,
    Rejection,
};

/// Default UDP port of the text protocol.
pub const DEFAULT_LEGACY_PORT: u16 = 8080;

/// [`DatagramDecoder`] for UTF-8 text commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyDatagramDecoder;

impl DatagramDecoder for LegacyDatagramDecoder {
    type Output = LegacyCommand;

    fn decode(&self, datagram: &[u8], _received_at: Instant) -> Result<LegacyCommand, Rejection> {
        let line = std::str::from_utf8(datagram)
            .map_err(|e| Rejection::Malformed(format!("not UTF-8: {e}")))?;
        line.parse::<LegacyCommand>()
            .map_err(|e| Rejection::Malformed(e.to_string()))
    }
}

/// Starts the legacy text-command listener.
///
/// # Errors
///
/// Returns [`ListenerError::BindFailed`] if the port is unavailable.
pub async fn start_legacy_listener(
    config: &ListenerConfig,
) -> Result<(ListenerHandle, mpsc::Receiver<ListenerEvent<LegacyCommand>>), ListenerError> {
    start_listener(config, LegacyDatagramDecoder).await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
