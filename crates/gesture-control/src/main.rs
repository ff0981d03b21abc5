//! Gesture Control daemon entry point.
//!
//! Loads the configuration, wires the geometry cache, the pipeline and the
//! two UDP listeners together, then runs the dispatch loop until Ctrl+C.
//!
//! # Usage
//!
//! ```text
//! gesture-control [OPTIONS]
//!
//! Options:
//!   --config <PATH>            Config file [default: platform config dir]
//!   --bind <IP>                Gesture listener bind address [default: 0.0.0.0]
//!   --port <PORT>              Gesture listener port [default: 9090]
//!   --device-id <ID>           Accept packets from this device only
//!   --screen-filter <INDEX>    Accept packets for this screen only (-1 = any)
//!   --default-screen <INDEX>   Display used when a packet names none
//!   --legacy-port <PORT>       Text-protocol port [default: 8080]
//!   --no-legacy                Do not start the text-protocol listener
//!   --log-level <LEVEL>        error | warn | info | debug | trace
//!   --write-default-config     Write the effective config file and exit
//! ```
//!
//! Every option can also be set through the `GESTURE_*` environment variable
//! of the same name.  CLI and environment values override the config file.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  ├─ ScreenGeometryCache        -- shared by both consumers below
//!  ├─ gesture listener (UDP 9090) ──▶ GesturePipeline ──▶ TracingInjector / TracingOverlay
//!  ├─ legacy listener  (UDP 8080) ──▶ LegacyCommandHandler ──▶ TracingInjector
//!  └─ dispatch loop
//!       ├─ gesture event   -> pipeline.handle_event, re-arm tracking deadline
//!       ├─ legacy command  -> legacy handler
//!       ├─ deadline fires  -> pipeline.on_tracking_lost
//!       └─ Ctrl+C          -> ordered teardown
//! ```
//!
//! # Teardown order
//!
//! 1. Stop the gesture listener (no new events).
//! 2. Stop the legacy listener.
//! 3. Shut the controller down: release a held pinch, restore the cursor,
//!    close the overlay.
//!
//! Each step logs its own failure and the next step still runs.

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gesture_control::application::accumulate::GestureAccumulatorController;
use gesture_control::application::adapt_gestures::GestureStateAdapter;
use gesture_control::application::legacy_commands::LegacyCommandHandler;
use gesture_control::application::map_coordinates::CoordinateMapper;
use gesture_control::application::pipeline::GesturePipeline;
use gesture_control::infrastructure::input_injection::tracing_injector::{
    TracingInjector, TracingOverlay,
};
use gesture_control::infrastructure::network::gesture_listener::{
    start_gesture_listener, GestureFilter,
};
use gesture_control::infrastructure::network::legacy_listener::start_legacy_listener;
use gesture_control::infrastructure::network::{ListenerConfig, ListenerEvent};
use gesture_control::infrastructure::screen_info::{
    native_enumerator, PlatformScreenEnumerator, ScreenGeometryCache, StaticScreenEnumerator,
};
use gesture_control::infrastructure::storage::config::{
    config_file_path, load_config_from, save_config_to, AppConfig, ScreensSection,
};

/// Placeholder deadline while the tracking-loss reset is disabled.
const IDLE_DEADLINE: Duration = Duration::from_secs(24 * 60 * 60);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Gesture-driven pointer control.
///
/// Listens for gesture packets over UDP and turns them into cursor movement,
/// clicks, scrolling and zooming on this machine.
#[derive(Debug, Parser)]
#[command(
    name = "gesture-control",
    about = "Gesture packet listener and pointer controller",
    version
)]
struct Cli {
    /// Path of the TOML config file.
    #[arg(long, env = "GESTURE_CONFIG")]
    config: Option<PathBuf>,

    /// IP address the gesture listener binds to.
    #[arg(long, env = "GESTURE_BIND")]
    bind: Option<String>,

    /// UDP port of the gesture listener.
    #[arg(long, env = "GESTURE_PORT")]
    port: Option<u16>,

    /// Accept packets from this device id only (empty = any device).
    #[arg(long, env = "GESTURE_DEVICE_ID")]
    device_id: Option<String>,

    /// Accept packets for this screen index only (negative = any screen).
    #[arg(long, env = "GESTURE_SCREEN_FILTER", allow_negative_numbers = true)]
    screen_filter: Option<i32>,

    /// Display used when a packet carries no screen index.
    #[arg(long, env = "GESTURE_DEFAULT_SCREEN")]
    default_screen: Option<usize>,

    /// UDP port of the legacy text-command listener.
    #[arg(long, env = "GESTURE_LEGACY_PORT")]
    legacy_port: Option<u16>,

    /// Do not start the legacy text-command listener.
    #[arg(long, env = "GESTURE_NO_LEGACY")]
    no_legacy: bool,

    /// `tracing` level; `RUST_LOG` takes precedence when set.
    #[arg(long, env = "GESTURE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Write the effective configuration to the config path and exit.
    #[arg(long)]
    write_default_config: bool,
}

impl Cli {
    /// Applies every option that was given on top of `config`.
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(device_id) = &self.device_id {
            config.listener.device_id = device_id.clone();
        }
        if let Some(screen) = self.screen_filter {
            config.listener.screen_index = screen;
        }
        if let Some(screen) = self.default_screen {
            config.screens.default_screen = screen;
        }
        if let Some(port) = self.legacy_port {
            config.legacy.port = port;
        }
        if self.no_legacy {
            config.legacy.enabled = false;
        }
        if let Some(level) = &self.log_level {
            config.runtime.log_level = level.clone();
        }
    }

    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config_file_path().context("no --config given"),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config_path()?;
    let mut config = load_config_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    cli.apply_to(&mut config);

    if cli.write_default_config {
        save_config_to(&config, &config_path)
            .with_context(|| format!("failed to write {}", config_path.display()))?;
        println!("wrote {}", config_path.display());
        return Ok(());
    }

    // `RUST_LOG` wins; otherwise the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.runtime.log_level)),
        )
        .init();

    info!("Gesture Control starting (config: {})", config_path.display());

    // ── Display geometry ──────────────────────────────────────────────────────
    let geometry = Arc::new(ScreenGeometryCache::new(
        select_enumerator(&config.screens),
        Duration::from_millis(config.screens.cache_ttl_ms),
    ));
    let layout = geometry.get();
    for screen in layout.screens() {
        info!(
            "screen {}: {} {}x{} at ({}, {}) scale {:.2}{}",
            screen.index,
            screen.device_name,
            screen.bounds.width,
            screen.bounds.height,
            screen.bounds.x,
            screen.bounds.y,
            screen.dpi_scale,
            if screen.is_primary { " (primary)" } else { "" }
        );
    }
    let mapper = CoordinateMapper::new(geometry, config.screens.default_screen);

    // ── Pipeline and collaborators ────────────────────────────────────────────
    let settings = config.gesture.to_settings();
    let injector = Arc::new(TracingInjector::new());
    let controller = GestureAccumulatorController::new(
        &settings,
        mapper.clone(),
        injector.clone(),
        Arc::new(TracingOverlay::new()),
    );
    let mut pipeline = GesturePipeline::new(GestureStateAdapter::new(&settings), controller);
    let legacy_handler = LegacyCommandHandler::new(mapper, injector);

    // ── Listeners ─────────────────────────────────────────────────────────────
    let bind_ip: IpAddr = config.listener.bind_ip()?;
    let gesture_config = ListenerConfig::new("gesture", bind_ip, config.listener.port);
    let filter = GestureFilter::new(&config.listener.device_id, config.listener.screen_index);
    let (gesture_handle, mut gesture_rx) = start_gesture_listener(&gesture_config, filter)
        .await
        .context("failed to start gesture listener")?;

    let (legacy_handle, mut legacy_rx) = if config.legacy.enabled {
        let legacy_config = ListenerConfig::new("legacy", bind_ip, config.legacy.port);
        match start_legacy_listener(&legacy_config).await {
            Ok((handle, rx)) => (Some(handle), Some(rx)),
            Err(e) => {
                warn!("legacy listener disabled: {e}");
                (None, None)
            }
        }
    } else {
        info!("legacy listener disabled by configuration");
        (None, None)
    };

    // ── Dispatch loop ─────────────────────────────────────────────────────────
    let tracking_timeout = config.runtime.tracking_timeout();
    // Disarmed until the first event; the branch is also guarded below.
    let tracking_deadline = tokio::time::sleep(tracking_timeout.unwrap_or(IDLE_DEADLINE));
    tokio::pin!(tracking_deadline);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!("Gesture Control ready");

    loop {
        tokio::select! {
            event = gesture_rx.recv() => match event {
                Some(ListenerEvent::Received(event)) => {
                    pipeline.handle_event(&event);
                    if let Some(timeout) = tracking_timeout {
                        tracking_deadline
                            .as_mut()
                            .reset(tokio::time::Instant::now() + timeout);
                    }
                }
                // Already counted and logged by the listener.
                Some(ListenerEvent::Rejected { .. } | ListenerEvent::TransportError(_)) => {}
                None => {
                    warn!("gesture listener stopped unexpectedly");
                    break;
                }
            },
            command = recv_or_pending(&mut legacy_rx) => match command {
                Some(ListenerEvent::Received(command)) => {
                    if let Err(e) = legacy_handler.handle(&command) {
                        warn!("legacy command '{command}' failed: {e}");
                    }
                }
                Some(_) => {}
                None => {
                    warn!("legacy listener stopped unexpectedly");
                    legacy_rx = None;
                }
            },
            () = &mut tracking_deadline, if tracking_timeout.is_some() && pipeline.is_tracking() => {
                pipeline.on_tracking_lost();
            }
            signal = &mut ctrl_c => {
                match signal {
                    Ok(()) => info!("received Ctrl+C; shutting down"),
                    Err(e) => warn!("failed to listen for Ctrl+C: {e}; shutting down"),
                }
                break;
            }
        }
    }

    // ── Ordered teardown ──────────────────────────────────────────────────────
    let stats = gesture_handle.stop().await;
    info!(
        "gesture listener: {} received, {} forwarded, {} filtered, {} malformed",
        stats.received, stats.forwarded, stats.filtered, stats.decode_failures
    );
    if let Some(handle) = legacy_handle {
        let stats = handle.stop().await;
        info!(
            "legacy listener: {} received, {} malformed",
            stats.received, stats.decode_failures
        );
    }
    let adapter_stats = pipeline.adapter_stats();
    info!(
        "adapter: {} processed, {} low-confidence, {} swipes and {} claps debounced",
        adapter_stats.processed,
        adapter_stats.confidence_rejected,
        adapter_stats.swipes_debounced,
        adapter_stats.claps_debounced
    );
    pipeline.shutdown();

    info!("Gesture Control stopped");
    Ok(())
}

/// Picks the display source: the configured list, else the platform, else a
/// single 1080p display.
fn select_enumerator(screens: &ScreensSection) -> Arc<dyn PlatformScreenEnumerator> {
    if !screens.displays.is_empty() {
        info!(
            "using {} display(s) from the [screens] config section",
            screens.displays.len()
        );
        return Arc::new(StaticScreenEnumerator::new(screens.displays.clone()));
    }
    native_enumerator().unwrap_or_else(|| {
        warn!("no native display enumeration on this platform; assuming one 1920x1080 display");
        Arc::new(StaticScreenEnumerator::fallback_1080p())
    })
}

/// Receives from `rx`, or never resolves when there is no receiver.
async fn recv_or_pending<T>(rx: &mut Option<mpsc::Receiver<T>>) -> Option<T> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
