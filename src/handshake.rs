//! One-time configuration handshake with the navigation receiver.
//!
//! At startup the receiver is sent a UBX configuration command. It must answer
//! with a UBX-ACK-ACK naming the command's class and id:
//!
//! ```text
//! B5 62 05 01 02 00 <class> <id> <ck_a> <ck_b>
//! ```
//!
//! where `ck_a`/`ck_b` is the UBX checksum over bytes 2..=7. Received bytes are
//! compared one at a time against that pattern. A mismatch restarts the match
//! from the first byte and re-sends the command. There is no timeout: a silent or
//! misbehaving receiver keeps the vehicle in initialization indefinitely.

use embedded_hal_nb::serial::Write;
use nb::block;

use crate::consts::{UBX_ACK_LEN, UBX_CLASS_ACK, UBX_ID_ACK_ACK, UBX_SYNC};
use crate::crc::ubx_checksum;
use crate::error::Error;

/// Builds the acknowledgment the receiver sends for `command`.
///
/// `command` must be a full UBX packet (sync, class, id, ...), at least 4 bytes.
///
/// # Example
/// ```rust
/// use rtty_telemetry::consts::UBX_CFG_NAV5_AIRBORNE;
/// use rtty_telemetry::handshake::expected_ack;
///
/// assert_eq!(
///     expected_ack(&UBX_CFG_NAV5_AIRBORNE).unwrap(),
///     [0xB5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x06, 0x24, 0x32, 0x5B]
/// );
/// ```
pub fn expected_ack(command: &[u8]) -> Result<[u8; UBX_ACK_LEN], Error> {
    let &[_, _, class, id, ..] = command else {
        return Err(Error::CommandTooShort { len: command.len() });
    };
    let mut ack = [
        UBX_SYNC[0],
        UBX_SYNC[1],
        UBX_CLASS_ACK,
        UBX_ID_ACK_ACK,
        0x02,
        0x00,
        class,
        id,
        0,
        0,
    ];
    let (ck_a, ck_b) = ubx_checksum(&ack[2..8]);
    ack[8] = ck_a;
    ack[9] = ck_b;
    Ok(ack)
}

/// Outcome of feeding one byte to the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeStatus {
    /// The byte matched; this many acknowledgment bytes have matched so far.
    Progress(u8),
    /// The byte did not match; progress was reset and the command must be re-sent.
    Mismatch,
    /// All acknowledgment bytes matched. Permanent.
    Initialized,
}

/// Acknowledgment matcher for one configuration command.
#[derive(Debug, Clone)]
pub struct ReceiverHandshake {
    command: &'static [u8],
    expected: [u8; UBX_ACK_LEN],
    progress: u8,
    initialized: bool,
    attempts: u16,
}

impl ReceiverHandshake {
    /// Prepares the handshake for `command`.
    pub fn new(command: &'static [u8]) -> Result<Self, Error> {
        Ok(Self {
            command,
            expected: expected_ack(command)?,
            progress: 0,
            initialized: false,
            attempts: 0,
        })
    }

    /// The acknowledgment being waited for.
    pub fn expected(&self) -> &[u8; UBX_ACK_LEN] {
        &self.expected
    }

    /// Number of acknowledgment bytes matched so far (0..=10).
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Whether the acknowledgment has been fully received.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of times the command has been sent (saturating).
    pub fn attempts(&self) -> u16 {
        self.attempts
    }

    /// Sends the configuration command, blocking until every byte is accepted
    /// and the link is flushed.
    pub fn send_command<S>(&mut self, link: &mut S) -> Result<(), Error>
    where
        S: Write<u8>,
    {
        self.attempts = self.attempts.saturating_add(1);
        debug!("sending receiver command, attempt {}", self.attempts);
        for &byte in self.command {
            block!(link.write(byte)).map_err(|_| Error::ReceiverLink)?;
        }
        block!(link.flush()).map_err(|_| Error::ReceiverLink)
    }

    /// Matches one received byte against the acknowledgment.
    ///
    /// A mismatching byte resets progress to zero; it is not re-tested against
    /// the first acknowledgment byte.
    pub fn feed(&mut self, byte: u8) -> HandshakeStatus {
        if self.initialized {
            return HandshakeStatus::Initialized;
        }
        if byte != self.expected[usize::from(self.progress)] {
            trace!("ack mismatch at byte {}", self.progress);
            self.progress = 0;
            return HandshakeStatus::Mismatch;
        }
        self.progress += 1;
        if usize::from(self.progress) == UBX_ACK_LEN {
            self.initialized = true;
            info!("receiver acknowledged configuration");
            return HandshakeStatus::Initialized;
        }
        HandshakeStatus::Progress(self.progress)
    }

    /// Matches one received byte and re-sends the command on a mismatch.
    pub fn on_byte<S>(&mut self, byte: u8, link: &mut S) -> Result<HandshakeStatus, Error>
    where
        S: Write<u8>,
    {
        let status = self.feed(byte);
        if status == HandshakeStatus::Mismatch {
            self.send_command(link)?;
        }
        Ok(status)
    }
}
