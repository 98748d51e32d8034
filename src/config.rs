//! Runtime configuration for the telemetry core.
//!
//! All state is volatile; a [`Config`] is built once at power-on and handed to
//! [`FlightComputer::new`](crate::scheduler::FlightComputer::new). Every field has a
//! default matching the stock vehicle so `Config::default()` is ready to fly.
//!
//! ```rust
//! use rtty_telemetry::config::{Config, CounterPolicy};
//!
//! let config = Config::default()
//!     .with_callsign("HAB7")
//!     .with_counter_policy(CounterPolicy::Hold);
//! assert_eq!(config.callsign, "HAB7");
//! ```

use crate::consts::{DEFAULT_CALLSIGN, UBX_CFG_NAV5_AIRBORNE};
use crate::sentence::SentenceFilter;
use crate::timer;

/// Default radio symbol rate in baud.
pub const DEFAULT_SYMBOL_RATE: u32 = 50;

/// Default baud rate of the navigation receiver's serial link.
pub const DEFAULT_RECEIVER_BAUD: u32 = 9_600;

/// How the message counter moves between datastrings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CounterPolicy {
    /// The counter increases by one after every built datastring, wrapping at `u16::MAX`.
    #[default]
    Increment,
    /// The counter stays at its initial value.
    Hold,
}

/// Telemetry core configuration.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Vehicle callsign placed after `$$` in every datastring.
    pub callsign: &'static str,
    /// Message counter behaviour.
    pub counter_policy: CounterPolicy,
    /// Counter value of the first datastring.
    pub initial_counter: u16,
    /// The one NMEA sentence type retained by the synchronizer.
    pub sentence_filter: SentenceFilter,
    /// UBX command sent to the receiver at startup; its acknowledgment gates initialization.
    pub receiver_command: &'static [u8],
    /// Radio symbol rate in baud. Sets the tick interval of
    /// [`run_tick_loop`](crate::timer) and should be used to program a hardware
    /// timer (see [`compute_timer_reload`](crate::timer::compute_timer_reload)).
    pub symbol_rate: u32,
    /// Baud rate of the receiver link. Bounds how long the main loop may wait
    /// between polls.
    pub receiver_baud: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            callsign: DEFAULT_CALLSIGN,
            counter_policy: CounterPolicy::default(),
            initial_counter: 0,
            sentence_filter: SentenceFilter::GGA,
            receiver_command: &UBX_CFG_NAV5_AIRBORNE,
            symbol_rate: DEFAULT_SYMBOL_RATE,
            receiver_baud: DEFAULT_RECEIVER_BAUD,
        }
    }
}

impl Config {
    /// Sets the callsign.
    pub const fn with_callsign(mut self, callsign: &'static str) -> Self {
        self.callsign = callsign;
        self
    }

    /// Sets the counter policy.
    pub const fn with_counter_policy(mut self, policy: CounterPolicy) -> Self {
        self.counter_policy = policy;
        self
    }

    /// Sets the counter value of the first datastring.
    pub const fn with_initial_counter(mut self, counter: u16) -> Self {
        self.initial_counter = counter;
        self
    }

    /// Sets the retained sentence type.
    pub const fn with_sentence_filter(mut self, filter: SentenceFilter) -> Self {
        self.sentence_filter = filter;
        self
    }

    /// Sets the receiver configuration command.
    pub const fn with_receiver_command(mut self, command: &'static [u8]) -> Self {
        self.receiver_command = command;
        self
    }

    /// Sets the radio symbol rate.
    pub const fn with_symbol_rate(mut self, baud: u32) -> Self {
        self.symbol_rate = baud;
        self
    }

    /// Sets the receiver link baud rate.
    pub const fn with_receiver_baud(mut self, baud: u32) -> Self {
        self.receiver_baud = baud;
        self
    }

    /// Duration of one radio bit in microseconds, `None` for a zero symbol rate.
    pub const fn bit_period_us(&self) -> Option<u32> {
        timer::bit_period_us(self.symbol_rate)
    }

    /// Duration of one received byte in microseconds, `None` for a zero baud rate.
    pub const fn receive_byte_period_us(&self) -> Option<u32> {
        timer::byte_period_us(self.receiver_baud)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.callsign, "ASTL1");
        assert_eq!(config.counter_policy, CounterPolicy::Increment);
        assert_eq!(config.receiver_command.len(), 44);
        assert_eq!(config.symbol_rate, 50);
        assert_eq!(config.bit_period_us(), Some(20_000));
        assert_eq!(config.receive_byte_period_us(), Some(1_041));
    }

    #[test]
    fn test_zero_rates_have_no_period() {
        let config = Config::default().with_symbol_rate(0).with_receiver_baud(0);
        assert_eq!(config.bit_period_us(), None);
        assert_eq!(config.receive_byte_period_us(), None);
    }

    #[test]
    fn test_builder_chain() {
        let config = Config::default()
            .with_callsign("X1")
            .with_initial_counter(9)
            .with_symbol_rate(100)
            .with_sentence_filter(SentenceFilter::new(b'G', *b"RMC"));
        assert_eq!(config.callsign, "X1");
        assert_eq!(config.initial_counter, 9);
        assert_eq!(config.bit_period_us(), Some(10_000));
        assert_eq!(config.sentence_filter, SentenceFilter::new(b'G', *b"RMC"));
    }
}
