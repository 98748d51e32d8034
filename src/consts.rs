//! Constants used across the telemetry core.
//!
//! This module defines the protocol-wide constants used for buffer sizing,
//! sentence framing, the receiver handshake, and radio character framing.
//!
//! ## Key Concepts
//!
//! - **Sentences**: NMEA records begin with `$`, end with `*`, and never exceed
//!   [`MAX_SENTENCE_LEN`] bytes.
//! - **Acknowledgment**: the receiver answers a configuration command with a
//!   fixed-length UBX-ACK-ACK packet of [`UBX_ACK_LEN`] bytes.
//! - **Datastring**: the outbound RTTY message is bounded by [`MAX_DATASTRING_LEN`].
//! - **Frames**: every radio character occupies [`FRAME_BITS`] bit periods.
//!
//! These values should be used wherever framing or buffer logic is implemented to ensure
//! consistent message boundaries.

/// Maximum length of an NMEA 0183 sentence, including `$` and the line terminator.
pub const MAX_SENTENCE_LEN: usize = 82;

/// Byte that starts every NMEA sentence.
pub const SENTENCE_START: u8 = b'$';

/// Byte that ends the data portion of an NMEA sentence (the checksum follows it).
pub const SENTENCE_END: u8 = b'*';

/// Field delimiter inside NMEA sentences and the outbound datastring.
pub const FIELD_DELIMITER: u8 = b',';

/// Number of bytes needed before the talker and sentence id can be checked (`$GPGGA`).
pub const SENTENCE_TYPE_LEN: usize = 6;

/// Length of the prefix the field parser skips (`$GPGGA,`).
pub const SENTENCE_PREFIX_LEN: usize = SENTENCE_TYPE_LEN + 1;

/// UBX sync characters that start every packet from the receiver.
pub const UBX_SYNC: [u8; 2] = [0xB5, 0x62];

/// UBX message class of acknowledgment packets.
pub const UBX_CLASS_ACK: u8 = 0x05;

/// UBX message id of a positive acknowledgment (ACK-ACK).
pub const UBX_ID_ACK_ACK: u8 = 0x01;

/// Length in bytes of the UBX-ACK-ACK packet the handshake waits for.
pub const UBX_ACK_LEN: usize = 10;

/// UBX-CFG-NAV5 command selecting the "airborne <1g" dynamic model.
///
/// Sent once at startup. The receiver must answer with an ACK-ACK for
/// class `0x06`, id `0x24` before fixes are trusted.
pub const UBX_CFG_NAV5_AIRBORNE: [u8; 44] = [
    0xB5, 0x62, 0x06, 0x24, 0x24, 0x00, 0xFF, 0xFF, 0x06, 0x03, 0x00, 0x00, 0x00, 0x00, 0x10,
    0x27, 0x00, 0x00, 0x05, 0x00, 0xFA, 0x00, 0xFA, 0x00, 0x64, 0x00, 0x2C, 0x01, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x16, 0xDC,
];

/// Maximum length (in bytes) of the outbound datastring, trailer included.
pub const MAX_DATASTRING_LEN: usize = 256;

/// Marker that starts every outbound datastring.
pub const DATASTRING_START: &str = "$$";

/// Length of the checksum trailer: `*`, four hex digits, and `\n`.
pub const DATASTRING_TRAILER_LEN: usize = 6;

/// Maximum length of the vehicle callsign.
pub const MAX_CALLSIGN_LEN: usize = 8;

/// The callsign used when none is configured.
pub const DEFAULT_CALLSIGN: &str = "ASTL1";

/// Number of bit periods per radio character: 1 start, 8 data, 2 stop.
pub const FRAME_BITS: usize = 11;

/// Number of data bits per radio character.
pub const DATA_BITS: u8 = 8;

/// Bits per byte on the receiver's 8N1 serial link (start, 8 data, stop).
pub const UART_FRAME_BITS: u32 = 10;
