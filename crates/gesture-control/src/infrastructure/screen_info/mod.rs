//! Platform-specific display enumeration and the shared geometry cache.
//!
//! # Why is there a cache at all?
//!
//! Every pointer packet (30–60 per second) needs the physical bounds of its
//! target display.  Asking the OS for the monitor list that often is wasteful,
//! and the list almost never changes.  The [`ScreenGeometryCache`] keeps one
//! ordered [`ScreenLayout`] snapshot for a short time-to-live (2–5 s) and
//! rebuilds it on the first read after expiry.  An explicit
//! [`refresh`](ScreenGeometryCache::refresh) rebuilds it immediately, for
//! example after a monitor hot-plug.
//!
//! Snapshots are handed out as `Arc<ScreenLayout>`.  A refresh swaps in a new
//! `Arc`; readers still holding the old one keep using it until they next
//! call [`get`](ScreenGeometryCache::get).  Display indices are only stable
//! within one snapshot, which is why every layout carries a generation number.
//!
//! # Platform implementations
//!
//! Each platform implements [`PlatformScreenEnumerator`]; the correct one is
//! selected at compile time via `#[cfg(...)]` and re-exported as
//! `NativeScreenEnumerator`:
//!
//! | Module    | OS      | API used                                          |
//! |-----------|---------|---------------------------------------------------|
//! | `windows` | Windows | `EnumDisplayMonitors` + `GetDpiForMonitor`        |
//! | `linux`   | Linux   | `XOpenDisplay` + `XScreenCount` (`x11` feature)   |
//! | `macos`   | macOS   | `CGGetActiveDisplayList` + `CGDisplayBounds`      |
//!
//! Without a native enumerator (Linux without the `x11` feature, headless
//! hosts) the [`StaticScreenEnumerator`] serves the display list from the
//! config file.  A [`MockScreenEnumerator`] is always compiled (not guarded
//! by `#[cfg]`) so tests on any platform can use it without a physical display.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use gesture_core::{DisplayOutput, PhysicalRect, ScreenLayout};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::map_coordinates::ScreenGeometryProvider;
use crate::infrastructure::clock::{Clock, SystemClock};

/// Shortest accepted cache lifetime.
pub const MIN_CACHE_TTL: Duration = Duration::from_secs(2);
/// Longest accepted cache lifetime.
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(5);
/// Cache lifetime used when the config does not specify one.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3);

/// Error type for display enumeration.
#[derive(Debug, Error)]
pub enum ScreenInfoError {
    /// The platform API call to enumerate displays failed.
    ///
    /// The inner string contains a human-readable description of the OS error,
    /// e.g. "XOpenDisplay failed; DISPLAY=<unset>".
    #[error("platform API error while enumerating displays: {0}")]
    PlatformError(String),

    /// Enumeration succeeded but reported no displays.
    #[error("no displays available")]
    NoDisplays,
}

/// Trait for enumerating displays on the current platform.
///
/// Implementors report every connected display in any order; ordering and
/// indexing are done by [`ScreenLayout::arrange`].
pub trait PlatformScreenEnumerator: Send + Sync {
    /// Returns the connected displays.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenInfoError`] if the OS API call fails.
    fn enumerate_displays(&self) -> Result<Vec<DisplayOutput>, ScreenInfoError>;
}

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsScreenEnumerator as NativeScreenEnumerator;

// ── Linux implementation ──────────────────────────────────────────────────────

#[cfg(all(target_os = "linux", feature = "x11"))]
pub mod linux;

#[cfg(all(target_os = "linux", feature = "x11"))]
pub use linux::LinuxScreenEnumerator as NativeScreenEnumerator;

// ── macOS implementation ──────────────────────────────────────────────────────

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "macos")]
pub use macos::MacosScreenEnumerator as NativeScreenEnumerator;

/// Returns the native enumerator when this build has one, else `None`.
pub fn native_enumerator() -> Option<Arc<dyn PlatformScreenEnumerator>> {
    #[cfg(any(
        target_os = "windows",
        target_os = "macos",
        all(target_os = "linux", feature = "x11")
    ))]
    {
        Some(Arc::new(NativeScreenEnumerator::new()))
    }
    #[cfg(not(any(
        target_os = "windows",
        target_os = "macos",
        all(target_os = "linux", feature = "x11")
    )))]
    {
        None
    }
}

// ── Static implementation (config-driven) ─────────────────────────────────────

/// Serves a fixed display list, typically from the `[screens]` config section.
#[derive(Debug, Clone)]
pub struct StaticScreenEnumerator {
    displays: Vec<DisplayOutput>,
}

impl StaticScreenEnumerator {
    pub fn new(displays: Vec<DisplayOutput>) -> Self {
        Self { displays }
    }

    /// A single 1920×1080 display at 100 %, used when nothing else is known.
    pub fn fallback_1080p() -> Self {
        Self::new(vec![DisplayOutput {
            device_name: "static-0".to_string(),
            bounds: PhysicalRect::new(0, 0, 1920, 1080),
            dpi_scale: 1.0,
            is_primary: true,
        }])
    }
}

impl PlatformScreenEnumerator for StaticScreenEnumerator {
    fn enumerate_displays(&self) -> Result<Vec<DisplayOutput>, ScreenInfoError> {
        if self.displays.is_empty() {
            return Err(ScreenInfoError::NoDisplays);
        }
        Ok(self.displays.clone())
    }
}

// ── Mock implementation (always compiled for tests) ───────────────────────────

/// A mock enumerator whose display list can be swapped at runtime to
/// simulate hot-plug, and which can be told to fail.
///
/// # Example
///
/// ```ignore
/// let enumerator = Arc::new(MockScreenEnumerator::dual_1440p());
/// let cache = ScreenGeometryCache::new(enumerator.clone(), DEFAULT_CACHE_TTL);
/// assert_eq!(cache.get().len(), 2);
/// ```
#[derive(Debug)]
pub struct MockScreenEnumerator {
    displays: Mutex<Vec<DisplayOutput>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl MockScreenEnumerator {
    pub fn new(displays: Vec<DisplayOutput>) -> Self {
        Self {
            displays: Mutex::new(displays),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// One 1920×1080 primary display at 100 %.
    pub fn single_1080p() -> Self {
        Self::new(vec![display("mock-0", 0, 1920, 1080, 1.0, true)])
    }

    /// Two 2560×1440 displays side by side at 100 %.
    pub fn dual_1440p() -> Self {
        Self::new(vec![
            display("mock-0", 0, 2560, 1440, 1.0, true),
            display("mock-1", 2560, 2560, 1440, 1.0, false),
        ])
    }

    /// A 100 % 1080p primary with a 150 % 2880×1620 display to its right,
    /// reported secondary-first to exercise the ordering rule.
    pub fn mixed_dpi() -> Self {
        Self::new(vec![
            display("mock-hidpi", 1920, 2880, 1620, 1.5, false),
            display("mock-0", 0, 1920, 1080, 1.0, true),
        ])
    }

    /// Replaces the reported display list (simulates a hot-plug).
    pub fn set_displays(&self, displays: Vec<DisplayOutput>) {
        *self.displays.lock().unwrap_or_else(PoisonError::into_inner) = displays;
    }

    /// Makes subsequent enumerations fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of times the enumerator has been queried.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PlatformScreenEnumerator for MockScreenEnumerator {
    fn enumerate_displays(&self) -> Result<Vec<DisplayOutput>, ScreenInfoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ScreenInfoError::PlatformError("mock failure".to_string()));
        }
        Ok(self
            .displays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

fn display(name: &str, x: i32, width: u32, height: u32, scale: f64, primary: bool) -> DisplayOutput {
    DisplayOutput {
        device_name: name.to_string(),
        bounds: PhysicalRect::new(x, 0, width, height),
        dpi_scale: scale,
        is_primary: primary,
    }
}

// ── Geometry cache ────────────────────────────────────────────────────────────

struct CachedLayout {
    layout: Arc<ScreenLayout>,
    fetched_at: Instant,
    /// Set by `invalidate`; forces a rebuild regardless of age.
    expired: bool,
}

/// Time-limited cache of the ordered display layout.
///
/// Shared (via `Arc`) between the gesture pipeline and the legacy command
/// handler; it is the only mutable state the two listeners have in common.
/// [`get`](Self::get) never fails: on an enumeration error it keeps serving
/// the previous snapshot, or an empty layout if there never was one, and
/// callers fall back to primary-normalized positioning.
pub struct ScreenGeometryCache {
    enumerator: Arc<dyn PlatformScreenEnumerator>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slot: RwLock<Option<CachedLayout>>,
    generation: AtomicU64,
}

impl ScreenGeometryCache {
    /// Creates a cache over `enumerator`.  `ttl` is clamped to 2–5 s.
    pub fn new(enumerator: Arc<dyn PlatformScreenEnumerator>, ttl: Duration) -> Self {
        Self::with_clock(enumerator, ttl, Arc::new(SystemClock))
    }

    /// Like [`new`](Self::new) with an explicit time source.
    pub fn with_clock(
        enumerator: Arc<dyn PlatformScreenEnumerator>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            enumerator,
            clock,
            ttl: ttl.clamp(MIN_CACHE_TTL, MAX_CACHE_TTL),
            slot: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Returns the current layout, rebuilding it if the TTL has expired.
    pub fn get(&self) -> Arc<ScreenLayout> {
        let now = self.clock.now();
        {
            let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = slot.as_ref() {
                let fresh = now.saturating_duration_since(cached.fetched_at) < self.ttl;
                if fresh && !cached.expired {
                    return Arc::clone(&cached.layout);
                }
            }
        }
        self.reload(now)
    }

    /// Rebuilds the layout immediately.
    ///
    /// The previous snapshot stays in place while the platform is queried,
    /// so concurrent readers never see an empty slot, and it is kept if the
    /// enumeration fails.
    pub fn refresh(&self) -> Arc<ScreenLayout> {
        self.reload(self.clock.now())
    }

    /// Marks the cached layout as expired; the next [`get`](Self::get)
    /// rebuilds it.  The snapshot itself is kept as the failure fallback.
    pub fn invalidate(&self) {
        if let Some(cached) = self
            .slot
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
        {
            cached.expired = true;
        }
    }

    /// The clamped time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generation number of the most recently built layout (0 = none yet).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn reload(&self, now: Instant) -> Arc<ScreenLayout> {
        match self.enumerator.enumerate_displays() {
            Ok(outputs) => {
                let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
                let layout = Arc::new(ScreenLayout::arrange(outputs, generation));
                if generation == 1 {
                    info!(displays = layout.len(), "display layout loaded");
                } else {
                    debug!(displays = layout.len(), generation, "display layout rebuilt");
                }
                let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
                *slot = Some(CachedLayout {
                    layout: Arc::clone(&layout),
                    fetched_at: now,
                    expired: false,
                });
                layout
            }
            Err(e) => {
                warn!("display enumeration failed: {e}");
                let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
                // Keep serving whatever we had and wait a full TTL before retrying.
                let layout = slot
                    .as_ref()
                    .map(|c| Arc::clone(&c.layout))
                    .unwrap_or_else(|| Arc::new(ScreenLayout::default()));
                *slot = Some(CachedLayout {
                    layout: Arc::clone(&layout),
                    fetched_at: now,
                    expired: false,
                });
                layout
            }
        }
    }
}

impl ScreenGeometryProvider for ScreenGeometryCache {
    fn layout(&self) -> Arc<ScreenLayout> {
        self.get()
    }

    fn refresh(&self) -> Arc<ScreenLayout> {
        ScreenGeometryCache::refresh(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
