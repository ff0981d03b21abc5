//! The gesture observation model.
//!
//! A [`GestureEvent`] is produced once per datagram by the packet decoder,
//! consumed exactly once by the state adapter, and never mutated afterwards.

use std::fmt;
use std::time::Instant;

/// The discrete gesture classes the upstream recogniser can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GestureType {
    /// No hand / no recognised gesture.  Always releases held state.
    #[default]
    None,
    /// Single extended finger: moves the cursor.
    Pointer,
    /// Two extended fingers: moves the cursor and drives the zoom channel.
    TwoFingerPointer,
    /// A directional swipe (window switching).
    Swipe,
    /// Thumb/index pinch: click-and-hold for dragging.
    Pinch,
    /// Thumbs-up with a roll angle: drives the scroll channel.
    ThumbsUp,
    /// Two-hand clap: toggles the control mode.
    Clap,
}

impl GestureType {
    /// Resolves a wire `type` string against the alias table.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Unrecognised strings map to [`GestureType::None`].
    pub fn from_alias(alias: &str) -> Self {
        match alias.trim().to_ascii_lowercase().as_str() {
            "pointer" | "point" | "single" => Self::Pointer,
            "two_finger" | "twofinger" | "zoom" => Self::TwoFingerPointer,
            "swipe" => Self::Swipe,
            "pinch" | "grab" => Self::Pinch,
            "thumbs_up" | "thumbsup" | "thumb" => Self::ThumbsUp,
            "clap" => Self::Clap,
            _ => Self::None,
        }
    }

    /// Canonical wire name (the first alias of each table row).
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Pointer => "pointer",
            Self::TwoFingerPointer => "two_finger",
            Self::Swipe => "swipe",
            Self::Pinch => "pinch",
            Self::ThumbsUp => "thumbs_up",
            Self::Clap => "clap",
        }
    }
}

impl fmt::Display for GestureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Direction of a swipe gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwipeDirection {
    Left,
    #[default]
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    /// Parses `left|right|up|down` case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One decoded gesture observation.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    pub gesture_type: GestureType,
    /// Normalized X in `[0, 1]` (0 = left edge of the target display).
    pub x: f64,
    /// Normalized Y in `[0, 1]` (0 = top edge of the target display).
    pub y: f64,
    pub finger_count: u8,
    /// Target display index; `None` means "use the configured default".
    pub screen_index: Option<usize>,
    /// Sending device; `None` means "any device".
    pub device_id: Option<String>,
    /// Cumulative two-hand stretch ratio, 1.0 = neutral.
    pub stretch: f64,
    /// Thumbs-up roll value; changes drive scrolling.
    pub roll: f64,
    pub swipe_direction: SwipeDirection,
    pub pinch_active: bool,
    /// Recogniser confidence in `[0, 1]`.
    pub confidence: f64,
    /// Local arrival time; debounce intervals are measured against this.
    pub received_at: Instant,
}

impl GestureEvent {
    /// Creates an event of `gesture_type` with every other field at its wire default.
    pub fn new(gesture_type: GestureType, received_at: Instant) -> Self {
        Self {
            gesture_type,
            x: 0.5,
            y: 0.5,
            finger_count: 1,
            screen_index: None,
            device_id: None,
            stretch: 1.0,
            roll: 0.0,
            swipe_direction: SwipeDirection::Right,
            pinch_active: false,
            confidence: 1.0,
            received_at,
        }
    }

    /// Returns a copy positioned at `(x, y)`.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Returns a copy with the given confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
