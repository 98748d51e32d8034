//! Outbound telemetry datastring formatting.
//!
//! Every datastring has the UKHAS layout:
//!
//! ```text
//! $$ASTL1,12,123519,4807.038,N,01131.000,E,545.4,M*XXXX\n
//! ```
//!
//! The CRC-16 covers everything between `$$` and `*` and is written as four
//! uppercase hex digits. The payload is cut, character by character, so the
//! trailer always fits in the buffer.

use core::fmt::{self, Write};

use heapless::String;

use crate::config::CounterPolicy;
use crate::consts::{
    DATASTRING_START, DATASTRING_TRAILER_LEN, MAX_CALLSIGN_LEN, MAX_DATASTRING_LEN, SENTENCE_END,
};
use crate::crc::crc16_xmodem;
use crate::error::Error;
use crate::fix::TelemetryFix;

/// The bounded buffer holding the datastring currently on air.
pub type OutboundMessage = String<MAX_DATASTRING_LEN>;

/// Writes into a `heapless::String`, silently dropping whatever exceeds `limit` bytes.
struct Truncating<'a, const N: usize> {
    out: &'a mut String<N>,
    limit: usize,
}

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.out.len() + ch.len_utf8() > self.limit {
                break;
            }
            let _ = self.out.push(ch);
        }
        Ok(())
    }
}

/// Formats fixes into datastrings and owns the message counter.
#[derive(Debug, Clone)]
pub struct DatastringBuilder {
    callsign: String<MAX_CALLSIGN_LEN>,
    counter: u16,
    policy: CounterPolicy,
}

impl DatastringBuilder {
    /// Creates a builder for `callsign`, starting the counter at `initial_counter`.
    ///
    /// # Errors
    /// [`Error::InvalidCallsign`] when the callsign is empty, longer than
    /// [`MAX_CALLSIGN_LEN`], or contains a delimiter or non-printable character.
    pub fn new(callsign: &str, policy: CounterPolicy, initial_counter: u16) -> Result<Self, Error> {
        let invalid = Error::InvalidCallsign {
            max: MAX_CALLSIGN_LEN,
        };
        let valid_chars = callsign
            .bytes()
            .all(|b| b.is_ascii_graphic() && b != b',' && b != SENTENCE_END);
        if callsign.is_empty() || !valid_chars {
            return Err(invalid);
        }
        let mut owned = String::new();
        owned.push_str(callsign).map_err(|_| invalid)?;
        Ok(Self {
            callsign: owned,
            counter: initial_counter,
            policy,
        })
    }

    /// The counter value the next datastring will carry.
    pub fn counter(&self) -> u16 {
        self.counter
    }

    /// The configured callsign.
    pub fn callsign(&self) -> &str {
        &self.callsign
    }

    /// Builds the next datastring from `fix` into the outbound buffer.
    pub fn build(&mut self, fix: &TelemetryFix, out: &mut OutboundMessage) {
        self.build_into(fix, out);
    }

    /// Builds the next datastring into any bounded buffer.
    ///
    /// The buffer is cleared first. If the payload would not leave room for the
    /// trailer it is truncated; the checksum covers the truncated payload.
    pub fn build_into<const N: usize>(&mut self, fix: &TelemetryFix, out: &mut String<N>) {
        out.clear();
        let limit = N.saturating_sub(DATASTRING_TRAILER_LEN);
        let mut payload = Truncating {
            out: &mut *out,
            limit,
        };
        let _ = write!(
            payload,
            "{}{},{},{},{},{},{},{},{},{}",
            DATASTRING_START,
            self.callsign,
            self.counter,
            fix.time,
            fix.latitude,
            fix.latitude_dir,
            fix.longitude,
            fix.longitude_dir,
            fix.altitude,
            fix.altitude_unit,
        );

        let start = DATASTRING_START.len().min(out.len());
        let crc = crc16_xmodem(&out.as_bytes()[start..]);
        let mut trailer = Truncating {
            out: &mut *out,
            limit: N,
        };
        let _ = writeln!(trailer, "*{:04X}", crc);

        debug!("datastring {} built, {} bytes", self.counter, out.len());
        if self.policy == CounterPolicy::Increment {
            self.counter = self.counter.wrapping_add(1);
        }
    }
}
