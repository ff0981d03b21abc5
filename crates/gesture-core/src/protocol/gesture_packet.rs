//! JSON codec for gesture datagrams.
//!
//! Wire format: one JSON object per UDP datagram, UTF-8 encoded.
//!
//! ```text
//! {"type":"pinch","x":0.42,"y":0.61,"fingerCount":1,"screenIndex":1,
//!  "deviceId":"cam-left","stretch":1.0,"roll":0.0,"swipeDirection":"right",
//!  "pinchActive":true,"confidence":0.93}
//! ```
//!
//! Decoding is deliberately lenient.  The payload is first parsed into an
//! untyped [`serde_json::Value`] map and a fully-defaulted [`GestureEvent`]
//! is then filled in field by field, so a missing *or* wrongly-typed field
//! simply keeps its default instead of rejecting the whole packet:
//!
//! | Field            | Default  | Notes                                  |
//! |------------------|----------|----------------------------------------|
//! | `type`           | `none`   | alias table, case-insensitive          |
//! | `x`, `y`         | 0.5      |                                        |
//! | `fingerCount`    | 1        | saturates at 255                       |
//! | `screenIndex`    | -1       | negative = use the configured default  |
//! | `deviceId`       | empty    | empty = any device                     |
//! | `stretch`        | 1.0      |                                        |
//! | `roll`           | 0.0      |                                        |
//! | `swipeDirection` | `right`  | `left`/`right`/`up`/`down`             |
//! | `pinchActive`    | false    |                                        |
//! | `confidence`     | 1.0      |                                        |
//!
//! Each camelCase field is also accepted in snake_case (`screen_index`, ...).
//! Unknown fields are ignored.  Only a payload that is not a JSON object at
//! all yields a [`PacketError`].

use std::time::Instant;

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::domain::gesture::{GestureEvent, GestureType, SwipeDirection};

/// Errors produced while decoding a gesture datagram.
///
/// Callers drop the datagram; none of these are fatal.
#[derive(Debug, Error)]
pub enum PacketError {
    /// The payload is not valid JSON (or not valid UTF-8).
    #[error("malformed gesture packet: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is valid JSON but not an object.
    #[error("gesture packet is not a JSON object")]
    NotAnObject,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes one datagram into a [`GestureEvent`] stamped with `received_at`.
///
/// # Errors
///
/// Returns [`PacketError`] if the payload is not a JSON object.
///
/// # Examples
///
/// ```rust
/// use std::time::Instant;
/// use gesture_core::{decode_gesture_packet, GestureType};
///
/// let event = decode_gesture_packet(br#"{"type":"pointer"}"#, Instant::now()).unwrap();
/// assert_eq!(event.gesture_type, GestureType::Pointer);
/// assert_eq!((event.x, event.y), (0.5, 0.5));
/// assert_eq!(event.screen_index, None);
/// ```
pub fn decode_gesture_packet(
    payload: &[u8],
    received_at: Instant,
) -> Result<GestureEvent, PacketError> {
    let value: Value = serde_json::from_slice(payload)?;
    let Value::Object(map) = value else {
        return Err(PacketError::NotAnObject);
    };

    let fields = Fields(&map);
    let gesture_type = fields
        .str("type", "type")
        .map(GestureType::from_alias)
        .unwrap_or_default();

    let mut event = GestureEvent::new(gesture_type, received_at);

    if let Some(x) = fields.f64("x", "x") {
        event.x = x;
    }
    if let Some(y) = fields.f64("y", "y") {
        event.y = y;
    }
    if let Some(count) = fields.i64("fingerCount", "finger_count") {
        event.finger_count = count.clamp(0, u8::MAX as i64) as u8;
    }
    if let Some(index) = fields.i64("screenIndex", "screen_index") {
        event.screen_index = usize::try_from(index).ok();
    }
    if let Some(id) = fields.str("deviceId", "device_id") {
        if !id.is_empty() {
            event.device_id = Some(id.to_string());
        }
    }
    if let Some(stretch) = fields.f64("stretch", "stretch") {
        event.stretch = stretch;
    }
    if let Some(roll) = fields.f64("roll", "roll") {
        event.roll = roll;
    }
    if let Some(direction) = fields
        .str("swipeDirection", "swipe_direction")
        .and_then(SwipeDirection::parse)
    {
        event.swipe_direction = direction;
    }
    if let Some(active) = fields.bool("pinchActive", "pinch_active") {
        event.pinch_active = active;
    }
    if let Some(confidence) = fields.f64("confidence", "confidence") {
        event.confidence = confidence;
    }

    Ok(event)
}

/// Encodes a [`GestureEvent`] in the canonical camelCase wire form.
///
/// `received_at` is local metadata and is not transmitted.  An event with no
/// screen index is written as `screenIndex: -1` and no device id as `""`.
pub fn encode_gesture_packet(event: &GestureEvent) -> Vec<u8> {
    let screen_index = event.screen_index.map(|i| i as i64).unwrap_or(-1);
    let packet = json!({
        "type": event.gesture_type.wire_name(),
        "x": event.x,
        "y": event.y,
        "fingerCount": event.finger_count,
        "screenIndex": screen_index,
        "deviceId": event.device_id.as_deref().unwrap_or(""),
        "stretch": event.stretch,
        "roll": event.roll,
        "swipeDirection": event.swipe_direction.wire_name(),
        "pinchActive": event.pinch_active,
        "confidence": event.confidence,
    });
    packet.to_string().into_bytes()
}

// ── Field access helpers ──────────────────────────────────────────────────────

/// Typed, alias-aware lookups over the untyped JSON map.
///
/// Every accessor returns `None` when the field is absent *or* has the wrong
/// type, which the decoder treats identically.
struct Fields<'a>(&'a Map<String, Value>);

impl<'a> Fields<'a> {
    fn get(&self, camel: &str, snake: &str) -> Option<&'a Value> {
        self.0.get(camel).or_else(|| self.0.get(snake))
    }

    fn str(&self, camel: &str, snake: &str) -> Option<&'a str> {
        self.get(camel, snake).and_then(Value::as_str)
    }

    fn f64(&self, camel: &str, snake: &str) -> Option<f64> {
        self.get(camel, snake)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    }

    /// Integers may arrive as `2` or `2.0` depending on the sender's JSON library.
    fn i64(&self, camel: &str, snake: &str) -> Option<i64> {
        let value = self.get(camel, snake)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
    }

    fn bool(&self, camel: &str, snake: &str) -> Option<bool> {
        match self.get(camel, snake)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|v| v != 0.0),
            _ => None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
