//! The cooperative main loop.
//!
//! [`FlightComputer`] owns every piece of mutable state in the core: the
//! handshake, the sentence synchronizer and latest reading, the current fix, the
//! datastring builder and outbound message, and the radio serializer. Interrupt
//! handlers only post into [`Events`]; [`poll`](FlightComputer::poll) drains them.
//!
//! ## Dispatch
//!
//! - a received byte goes to the handshake until the receiver has acknowledged
//!   its configuration, and to the sentence synchronizer afterwards
//! - a timer tick sends one bit; when the message is fully sent, the next
//!   datastring is built from the current fix before the following tick
//! - a captured but unparsed sentence is parsed into the fix
//!
//! ## Timing constraint
//!
//! Each `poll` handles at most one byte and one tick. The loop must come round
//! faster than one receive byte period (about 1 ms at 9600 baud) or bytes are
//! overwritten in their mailbox and lost; see [`Mailbox::overruns`](crate::mailbox::Mailbox::overruns).

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use embedded_hal_nb::serial::Write;

use crate::config::Config;
use crate::datastring::{DatastringBuilder, OutboundMessage};
use crate::error::Error;
use crate::fix::TelemetryFix;
use crate::handshake::{HandshakeStatus, ReceiverHandshake};
use crate::mailbox::Events;
use crate::parser;
use crate::sentence::{LatestReading, SentenceSync, SyncEvent};
use crate::serializer::{RadioSerializer, TickOutcome};

/// The flight computer's telemetry context.
///
/// ## Type Parameters
///
/// - `RADIO`: [`OutputPin`] keying the radio transmitter
/// - `GPS`: [`embedded_hal_nb::serial::Write`] link to the navigation receiver
/// - `LED`: [`OutputPin`] for the optional "receiver initialized" indicator
#[derive(Debug)]
pub struct FlightComputer<RADIO, GPS, LED>
where
    RADIO: OutputPin,
    GPS: Write<u8>,
    LED: OutputPin,
{
    handshake: ReceiverHandshake,
    sync: SentenceSync,
    latest: LatestReading,
    fix: TelemetryFix,
    builder: DatastringBuilder,
    message: OutboundMessage,
    radio: RadioSerializer<RADIO>,
    gps: GPS,
    led: Option<LED>,
}

impl<RADIO, GPS, LED> FlightComputer<RADIO, GPS, LED>
where
    RADIO: OutputPin,
    GPS: Write<u8>,
    LED: OutputPin,
{
    /// Builds the context from `config` and the three peripherals.
    ///
    /// The radio line is driven to mark, the LED off, and a first datastring
    /// (with an empty fix) is prepared so the radio carries telemetry from the
    /// very first tick.
    pub fn new(config: Config, radio: RADIO, gps: GPS, led: Option<LED>) -> Result<Self, Error> {
        let mut builder =
            DatastringBuilder::new(config.callsign, config.counter_policy, config.initial_counter)?;
        let fix = TelemetryFix::default();
        let mut message = OutboundMessage::new();
        builder.build(&fix, &mut message);

        let mut led = led;
        if let Some(led) = led.as_mut() {
            led.set_low().map_err(|_| Error::StatusLed)?;
        }

        Ok(Self {
            handshake: ReceiverHandshake::new(config.receiver_command)?,
            sync: SentenceSync::new(config.sentence_filter),
            latest: LatestReading::new(),
            fix,
            builder,
            message,
            radio: RadioSerializer::new(radio)?,
            gps,
            led,
        })
    }

    /// Sends the receiver configuration command. Call once before polling.
    pub fn start(&mut self) -> Result<(), Error> {
        self.handshake.send_command(&mut self.gps)
    }

    /// Whether the receiver has acknowledged its configuration.
    pub fn is_initialized(&self) -> bool {
        self.handshake.is_initialized()
    }

    /// The receiver handshake.
    pub fn handshake(&self) -> &ReceiverHandshake {
        &self.handshake
    }

    /// The most recently parsed fix.
    pub fn fix(&self) -> &TelemetryFix {
        &self.fix
    }

    /// The latest captured sentence.
    pub fn latest(&self) -> &LatestReading {
        &self.latest
    }

    /// The datastring currently being transmitted.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The radio serializer.
    pub fn radio(&self) -> &RadioSerializer<RADIO> {
        &self.radio
    }

    /// Handles one received byte.
    pub fn on_byte(&mut self, byte: u8) -> Result<(), Error> {
        if !self.handshake.is_initialized() {
            let status = self.handshake.on_byte(byte, &mut self.gps)?;
            if status == HandshakeStatus::Initialized {
                if let Some(led) = self.led.as_mut() {
                    led.set_high().map_err(|_| Error::StatusLed)?;
                }
            }
            return Ok(());
        }

        if self.sync.feed(byte, &mut self.latest) == SyncEvent::Captured {
            trace!("new sentence awaiting parse");
        }
        Ok(())
    }

    /// Handles one bit-clock tick, rebuilding the datastring once it has been sent.
    pub fn on_tick(&mut self) -> Result<TickOutcome, Error> {
        let outcome = self.radio.tick(self.message.as_bytes())?;
        if outcome.message_sent {
            self.builder.build(&self.fix, &mut self.message);
        }
        Ok(outcome)
    }

    /// Parses the latest sentence if it is new. Returns whether the fix changed.
    pub fn service(&mut self) -> bool {
        parser::parse(&mut self.latest, &mut self.fix)
    }

    /// One pass of the main loop: at most one byte, at most one tick, then parsing.
    pub fn poll(&mut self, events: &Events) -> Result<(), Error> {
        if let Some(byte) = events.rx.take() {
            self.on_byte(byte)?;
        }
        if events.tick.take().is_some() {
            let _ = self.on_tick()?;
        }
        let _ = self.service();
        Ok(())
    }

    /// Runs the main loop forever. Only returns on a pin or link error.
    pub fn run(&mut self, events: &Events) -> Result<Infallible, Error> {
        loop {
            self.poll(events)?;
        }
    }

    /// Gives the peripherals back.
    pub fn release(self) -> (RADIO, GPS, Option<LED>) {
        (self.radio.release(), self.gps, self.led)
    }
}
