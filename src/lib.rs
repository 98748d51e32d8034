//! # rtty-telemetry
//!
//! A portable, no_std flight-telemetry core for small airborne vehicles: it takes
//! position fixes from a u-blox style navigation receiver and sends them to the
//! ground as slow, bit-banged RTTY over a narrowband radio transmitter.
//!
//! The core is made of three tightly coupled pieces, all driven from two interrupt
//! sources and one polling loop:
//! - a receiver handshake that sends a configuration command and validates the
//!   10-byte UBX acknowledgment
//! - a sentence synchronizer and field parser that pull `$GxGGA` fixes out of a
//!   noisy, continuous NMEA byte stream
//! - a timer-driven software serial transmitter that frames every character as
//!   1 start bit, 8 data bits (LSB first) and 2 stop bits
//!
//! ## Crate features
//! | Feature      | Description |
//! |--------------|-------------|
//! | `std`        | Disables `#![no_std]` and enables the `critical-section` std implementation |
//! | `delay-loop` | Adds [`timer::run_tick_loop`] which drives bit timing from an `embedded_hal::delay::DelayNs` |
//! | `defmt-0-3`  | Uses `defmt` logging |
//! | `log`        | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rtty_telemetry::{config::Config, mailbox::Events, scheduler::FlightComputer};
//!
//! static EVENTS: Events = Events::new();
//!
//! #[interrupt]
//! fn USART_RX() {
//!     EVENTS.on_rx_complete(read_udr());
//! }
//!
//! #[interrupt]
//! fn TIMER1_OVF() {
//!     reload_timer();
//!     EVENTS.on_timer_tick();
//! }
//!
//! let mut computer = FlightComputer::new(Config::default(), radio_pin, gps_uart, Some(led))?;
//! computer.start()?;
//! computer.run(&EVENTS)?;
//! ```
//!
//! ## Integration Notes
//!
//! - The timer interval must match the radio symbol rate exactly (20 ms at 50 baud);
//!   see [`timer::const_timer_reload`]
//! - The main loop must consume every byte and tick before the next interrupt
//!   overwrites it. Overwrites are counted by [`mailbox::Mailbox::overruns`]
//! - The handshake has no timeout; an absent receiver keeps the vehicle in
//!   initialization forever
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub use critical_section;
pub use heapless;

#[macro_use]
mod fmt;

pub mod config;
pub mod consts;
pub mod crc;
pub mod datastring;
pub mod error;
pub mod fix;
pub mod handshake;
pub mod mailbox;
pub mod parser;
pub mod scheduler;
pub mod sentence;
pub mod serializer;
pub mod timer;

pub use error::Error;
