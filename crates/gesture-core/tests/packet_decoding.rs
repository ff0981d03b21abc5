//! Integration tests for the gesture-core wire codecs.
//!
//! These tests go through the crate's public re-exports only and check the
//! documented per-field defaults against payloads shaped like those real
//! senders produce.

use std::time::{Duration, Instant};

use gesture_core::{
    decode_gesture_packet, encode_gesture_packet, GestureEvent, GestureType, LegacyCommand,
    LegacyParseError, PacketError, SwipeDirection,
};

fn decode(payload: &str) -> GestureEvent {
    decode_gesture_packet(payload.as_bytes(), Instant::now()).expect("decode must succeed")
}

#[test]
fn test_pointer_with_only_type_gets_documented_defaults() {
    // Act
    let e = decode(r#"{"type":"pointer"}"#);

    // Assert
    assert_eq!(e.gesture_type, GestureType::Pointer);
    assert_eq!(e.x, 0.5);
    assert_eq!(e.y, 0.5);
    assert_eq!(e.finger_count, 1);
    assert_eq!(e.screen_index, None, "missing screenIndex means -1 / default");
    assert_eq!(e.confidence, 1.0);
}

#[test]
fn test_each_optional_field_missing_alone_takes_its_default() {
    // A complete packet; each iteration removes exactly one field.
    let full = serde_json::json!({
        "type": "swipe", "x": 0.1, "y": 0.2, "fingerCount": 3, "screenIndex": 2,
        "deviceId": "dev", "stretch": 1.4, "roll": 0.6, "swipeDirection": "left",
        "pinchActive": true, "confidence": 0.8
    });
    let defaults = GestureEvent::new(GestureType::None, Instant::now());

    for field in [
        "type", "x", "y", "fingerCount", "screenIndex", "deviceId", "stretch", "roll",
        "swipeDirection", "pinchActive", "confidence",
    ] {
        let mut packet = full.clone();
        packet
            .as_object_mut()
            .expect("fixture is an object")
            .remove(field);

        let e = decode(&packet.to_string());

        match field {
            "type" => assert_eq!(e.gesture_type, defaults.gesture_type),
            "x" => assert_eq!(e.x, defaults.x),
            "y" => assert_eq!(e.y, defaults.y),
            "fingerCount" => assert_eq!(e.finger_count, defaults.finger_count),
            "screenIndex" => assert_eq!(e.screen_index, defaults.screen_index),
            "deviceId" => assert_eq!(e.device_id, defaults.device_id),
            "stretch" => assert_eq!(e.stretch, defaults.stretch),
            "roll" => assert_eq!(e.roll, defaults.roll),
            "swipeDirection" => assert_eq!(e.swipe_direction, SwipeDirection::Right),
            "pinchActive" => assert!(!e.pinch_active),
            "confidence" => assert_eq!(e.confidence, defaults.confidence),
            _ => unreachable!(),
        }
    }
}

#[test]
fn test_sender_style_payloads_decode() {
    // Shapes produced by the Python sender helpers.
    let pointer = decode(
        r#"{"type": "pointer", "x": 0.5, "y": 0.5, "fingerCount": 1, "screenIndex": 1, "confidence": 0.95}"#,
    );
    let zoom = decode(
        r#"{"type": "two_finger", "x": 0.4, "y": 0.6, "fingerCount": 2, "screenIndex": 0, "stretch": 1.35}"#,
    );
    let none = decode(r#"{"type": "none"}"#);

    assert_eq!(pointer.screen_index, Some(1));
    assert_eq!(zoom.gesture_type, GestureType::TwoFingerPointer);
    assert_eq!(zoom.finger_count, 2);
    assert_eq!(zoom.stretch, 1.35);
    assert_eq!(none.gesture_type, GestureType::None);
}

#[test]
fn test_type_aliases_are_case_insensitive_on_the_wire() {
    assert_eq!(decode(r#"{"type":"GRAB"}"#).gesture_type, GestureType::Pinch);
    assert_eq!(decode(r#"{"type":"ThumbsUp"}"#).gesture_type, GestureType::ThumbsUp);
    assert_eq!(decode(r#"{"type":"Zoom"}"#).gesture_type, GestureType::TwoFingerPointer);
    assert_eq!(decode(r#"{"type":"fist"}"#).gesture_type, GestureType::None);
}

#[test]
fn test_received_at_is_stamped_by_the_caller() {
    let stamp = Instant::now() + Duration::from_secs(3);
    let e = decode_gesture_packet(br#"{"type":"clap"}"#, stamp).expect("decode");
    assert_eq!(e.received_at, stamp);
}

#[test]
fn test_malformed_payloads_are_errors_not_panics() {
    let now = Instant::now();
    let inputs: [&[u8]; 5] = [b"", b"LeftClick", b"{", b"null", b"42"];

    for input in inputs {
        let result = decode_gesture_packet(input, now);
        assert!(
            matches!(result, Err(PacketError::Json(_)) | Err(PacketError::NotAnObject)),
            "input {:?} must fail to decode",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn test_encoded_packet_is_accepted_by_decoder() {
    let mut event = GestureEvent::new(GestureType::Pinch, Instant::now()).at(0.9, 0.1);
    event.pinch_active = true;
    event.confidence = 0.75;

    let decoded = decode_gesture_packet(&encode_gesture_packet(&event), event.received_at)
        .expect("decode");

    assert_eq!(decoded, event);
}

#[test]
fn test_legacy_commands_from_sender_helpers_parse() {
    let lines = [
        "LeftClick",
        "RightClick",
        "Move:10,-5",
        "Abs:0,960,540",
        "Scroll:120",
        "Scroll:-120",
        "Zoom:-3",
        "Pinch:1,2",
        "Pinch:-1,3",
    ];

    for line in lines {
        let parsed: LegacyCommand = line.parse().expect("sender line must parse");
        assert_eq!(parsed.to_string(), line);
    }
}

#[test]
fn test_legacy_json_datagram_is_rejected() {
    let result = r#"{"type":"pointer"}"#.parse::<LegacyCommand>();
    assert!(matches!(result, Err(LegacyParseError::UnknownCommand(_))));
}
