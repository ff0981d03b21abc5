//! UDP datagram listeners.
//!
//! Both wire protocols (JSON gesture packets and legacy text commands) are
//! one-datagram-per-message, so they share a single receive loop.  What
//! differs is the [`DatagramDecoder`] plugged into it:
//!
//! - [`gesture_listener`] decodes gesture packets and applies the device and
//!   screen filters;
//! - [`legacy_listener`] parses one text command per datagram.
//!
//! # How the receive loop works (for beginners)
//!
//! [`start_listener`] binds a Tokio `UdpSocket` and spawns one task that
//! repeatedly awaits `recv_from`.  Awaiting never blocks the runtime, so any
//! number of listeners run side by side on the same threads.  Every datagram
//! is decoded immediately; accepted items are sent in arrival order on an
//! `mpsc` channel to the single consumer in `main.rs`.
//!
//! ```text
//!  UDP ──▶ recv_from ──▶ decoder ──▶ Ok(item) ──▶ mpsc ──▶ consumer
//!                            │
//!                            └──▶ Err(rejection) ──▶ stats + debug! log
//! ```
//!
//! There is no receive timeout.  The loop ends only when
//! [`ListenerHandle::stop`] is called (or the handle or the receiver is
//! dropped).  `stop` signals the task over a `watch` channel, which wins the
//! `select!` against a pending `recv_from`, awaits the task, and the socket is
//! closed when the task returns.

pub mod gesture_listener;
pub mod legacy_listener;

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use thiserror::Error;
use tokio::io::ReadBuf;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Largest datagram the listener reads; longer datagrams are truncated by the OS.
pub const DEFAULT_RECV_BUFFER: usize = 64 * 1024;

/// Capacity of the listener → consumer channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Error type for listener startup.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The UDP socket could not be bound.
    #[error("failed to bind UDP socket on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    /// Any other socket error during startup.
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a datagram was not forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The payload could not be decoded.
    #[error("malformed datagram: {0}")]
    Malformed(String),
    /// The packet names a different sending device.
    #[error("device '{actual}' does not match filter '{expected}'")]
    DeviceMismatch { expected: String, actual: String },
    /// The packet targets a different display.
    #[error("screen {actual} does not match filter {expected}")]
    ScreenMismatch { expected: usize, actual: usize },
}

impl Rejection {
    /// `true` for a well-formed datagram dropped by a filter.
    pub fn is_filtered(&self) -> bool {
        !matches!(self, Self::Malformed(_))
    }
}

/// Turns one datagram into one item, or rejects it.
///
/// Decoders run on the listener task and must not block.
pub trait DatagramDecoder: Send + Sync + 'static {
    type Output: Send + 'static;

    fn decode(&self, datagram: &[u8], received_at: Instant) -> Result<Self::Output, Rejection>;
}

/// Socket and channel settings for one listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Short name used in log lines (`"gesture"`, `"legacy"`).
    pub name: String,
    pub bind_addr: IpAddr,
    /// UDP port; 0 asks the OS for a free one.
    pub port: u16,
    pub recv_buffer: usize,
    pub channel_capacity: usize,
}

impl ListenerConfig {
    pub fn new(name: impl Into<String>, bind_addr: IpAddr, port: u16) -> Self {
        Self {
            name: name.into(),
            bind_addr,
            port,
            recv_buffer: DEFAULT_RECV_BUFFER,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self::new("gesture", IpAddr::V4(Ipv4Addr::UNSPECIFIED), 9090)
    }
}

/// Events delivered to the consumer, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerEvent<T> {
    /// A datagram was decoded and passed every filter.
    Received(T),
    /// A datagram was dropped.  Best-effort: skipped when the channel is full.
    Rejected { from: SocketAddr, rejection: Rejection },
    /// `recv_from` failed; the loop keeps running.  Best-effort like `Rejected`.
    TransportError(String),
}

// ── Statistics ────────────────────────────────────────────────────────────────

/// Live counters, updated by the listener task.
#[derive(Debug, Default)]
pub struct ListenerStats {
    received: AtomicU64,
    forwarded: AtomicU64,
    filtered: AtomicU64,
    decode_failures: AtomicU64,
    transport_errors: AtomicU64,
}

/// A point-in-time copy of [`ListenerStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStatsSnapshot {
    pub received: u64,
    pub forwarded: u64,
    pub filtered: u64,
    pub decode_failures: u64,
    pub transport_errors: u64,
}

impl ListenerStats {
    pub fn snapshot(&self) -> ListenerStatsSnapshot {
        ListenerStatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            forwarded: self.forwarded.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            transport_errors: self.transport_errors.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

// ── Handle ────────────────────────────────────────────────────────────────────

/// Owns a running listener task.
///
/// Dropping the handle signals the task to stop without waiting for it; call
/// [`stop`](Self::stop) to wait for the socket to be released.
pub struct ListenerHandle {
    name: String,
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    stats: Arc<ListenerStats>,
}

impl ListenerHandle {
    /// The bound address (useful when the configured port was 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn stats(&self) -> ListenerStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops the loop, waits for it to exit and returns the final counters.
    ///
    /// Safe to call while a `recv_from` is pending.
    pub async fn stop(mut self) -> ListenerStatsSnapshot {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("{} listener task ended abnormally: {e}", self.name);
            }
        }
        self.stats.snapshot()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

// ── Receive loop ──────────────────────────────────────────────────────────────

/// Source of datagrams for the receive loop.
///
/// Implemented for Tokio's [`UdpSocket`]; tests plug in a scripted source to
/// drive error paths a real socket cannot produce on demand.
pub(crate) trait DatagramSocket: Send + Sync + 'static {
    fn poll_recv_from(
        &self,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<SocketAddr>>;
}

impl DatagramSocket for UdpSocket {
    fn poll_recv_from(
        &self,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<SocketAddr>> {
        UdpSocket::poll_recv_from(self, cx, buf)
    }
}

/// Binds `config.socket_addr()` and spawns the receive loop.
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns [`ListenerError::BindFailed`] if the socket cannot be bound.
pub async fn start_listener<D: DatagramDecoder>(
    config: &ListenerConfig,
    decoder: D,
) -> Result<(ListenerHandle, mpsc::Receiver<ListenerEvent<D::Output>>), ListenerError> {
    let addr = config.socket_addr();
    let socket = UdpSocket::bind(addr)
        .await
        .map_err(|source| ListenerError::BindFailed { addr, source })?;
    let local_addr = socket.local_addr()?;

    let started = spawn_receive_loop(socket, local_addr, config, decoder);
    info!("{} listener bound on UDP {local_addr}", config.name);
    Ok(started)
}

fn spawn_receive_loop<S: DatagramSocket, D: DatagramDecoder>(
    socket: S,
    local_addr: SocketAddr,
    config: &ListenerConfig,
    decoder: D,
) -> (ListenerHandle, mpsc::Receiver<ListenerEvent<D::Output>>) {
    let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let stats = Arc::new(ListenerStats::default());

    let task = tokio::spawn(receive_loop(
        socket,
        decoder,
        tx,
        shutdown_rx,
        Arc::clone(&stats),
        config.name.clone(),
        config.recv_buffer.max(1),
    ));

    (
        ListenerHandle {
            name: config.name.clone(),
            local_addr,
            shutdown: shutdown_tx,
            task: Some(task),
            stats,
        },
        rx,
    )
}

async fn recv_from<S: DatagramSocket>(
    socket: &S,
    buf: &mut [u8],
) -> io::Result<(usize, SocketAddr)> {
    let mut read_buf = ReadBuf::new(buf);
    let from = std::future::poll_fn(|cx| socket.poll_recv_from(cx, &mut read_buf)).await?;
    Ok((read_buf.filled().len(), from))
}

async fn receive_loop<S: DatagramSocket, D: DatagramDecoder>(
    socket: S,
    decoder: D,
    tx: mpsc::Sender<ListenerEvent<D::Output>>,
    mut shutdown: watch::Receiver<bool>,
    stats: Arc<ListenerStats>,
    name: String,
    recv_buffer: usize,
) {
    let mut buf = vec![0u8; recv_buffer];

    while !*shutdown.borrow() {
        let (len, from) = tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            result = recv_from(&socket, &mut buf) => match result {
                Ok(pair) => pair,
                Err(e) => {
                    ListenerStats::bump(&stats.transport_errors);
                    warn!("{name} recv error: {e}");
                    let _ = tx.try_send(ListenerEvent::TransportError(e.to_string()));
                    continue;
                }
            },
        };

        ListenerStats::bump(&stats.received);
        match decoder.decode(&buf[..len], Instant::now()) {
            Ok(item) => {
                let delivered = tokio::select! {
                    biased;
                    _ = shutdown.changed() => false,
                    sent = tx.send(ListenerEvent::Received(item)) => sent.is_ok(),
                };
                if !delivered {
                    break;
                }
                ListenerStats::bump(&stats.forwarded);
            }
            Err(rejection) => {
                if rejection.is_filtered() {
                    ListenerStats::bump(&stats.filtered);
                } else {
                    ListenerStats::bump(&stats.decode_failures);
                }
                debug!("{name}: dropped datagram from {from}: {rejection}");
                let _ = tx.try_send(ListenerEvent::Rejected { from, rejection });
            }
        }
    }

    drop(socket);
    info!("{name} listener stopped");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
