//! Error type for the telemetry core.
//!
//! Protocol-level faults (a wrong acknowledgment byte, an unwanted or oversized
//! sentence) are recovered locally and never surface here. These variants cover
//! the hardware seams and invalid configuration only.

use thiserror::Error;

/// Errors returned by fallible telemetry operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial link to the navigation receiver refused a byte.
    #[error("navigation receiver link write failed")]
    ReceiverLink,

    /// The radio output pin could not be driven.
    #[error("radio output pin could not be driven")]
    RadioPin,

    /// The status LED pin could not be driven.
    #[error("status LED pin could not be driven")]
    StatusLed,

    /// The receiver configuration command is too short to carry a class and id.
    #[error("configuration command is {len} bytes, at least 4 are required")]
    CommandTooShort {
        /// Length of the rejected command.
        len: usize,
    },

    /// The callsign is empty, too long, or contains a reserved character.
    #[error("callsign must be 1 to {max} printable characters without ',' or '*'")]
    InvalidCallsign {
        /// Maximum accepted callsign length.
        max: usize,
    },

    /// The radio symbol rate or the receiver baud rate is zero.
    #[error("symbol and receiver baud rates must be non-zero")]
    ZeroRate,
}
