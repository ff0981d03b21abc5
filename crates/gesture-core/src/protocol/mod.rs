//! Wire codecs: the JSON gesture packet and the legacy text command line.

pub mod gesture_packet;
pub mod legacy;

pub use gesture_packet::{decode_gesture_packet, encode_gesture_packet, PacketError};
pub use legacy::{LegacyCommand, LegacyParseError};
