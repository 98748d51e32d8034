//! Timer-driven software serial transmitter for the radio link.
//!
//! This module provides [`RadioSerializer`], which bit-bangs the outbound datastring
//! onto a digital output pin driving the radio's FSK/RTTY modulation input. It
//! operates independently of the CPU clock, provided that
//! [`tick()`](RadioSerializer::tick) is called exactly once per bit period.
//!
//! ## Framing
//!
//! Every character is sent as an 11-bit frame:
//!
//! | Phase        | Level |
//! |--------------|-------|
//! | `Start`      | low   |
//! | `Data(0..8)` | bit `n` of the character, LSB first |
//! | `Stop1`      | high  |
//! | `Stop2`      | high  |
//!
//! The pin holds its last level between ticks; there is no separate idle logic
//! beyond the stop bits.

use embedded_hal::digital::OutputPin;

use crate::consts::DATA_BITS;
use crate::error::Error;

/// Position inside one character frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FramePhase {
    /// The start bit (space).
    #[default]
    Start,
    /// Data bit `n`, least significant first.
    Data(u8),
    /// The first stop bit (mark).
    Stop1,
    /// The second stop bit (mark).
    Stop2,
}

impl FramePhase {
    /// Line level emitted in this phase while sending `ch`; `true` is high (mark).
    pub fn level(self, ch: u8) -> bool {
        match self {
            FramePhase::Start => false,
            FramePhase::Data(n) => (ch >> n) & 1 == 1,
            FramePhase::Stop1 | FramePhase::Stop2 => true,
        }
    }

    /// The phase after this one. `Stop2` wraps to `Start` of the next character.
    pub fn next(self) -> Self {
        match self {
            FramePhase::Start => FramePhase::Data(0),
            FramePhase::Data(n) if n + 1 < DATA_BITS => FramePhase::Data(n + 1),
            FramePhase::Data(_) => FramePhase::Stop1,
            FramePhase::Stop1 => FramePhase::Stop2,
            FramePhase::Stop2 => FramePhase::Start,
        }
    }
}

/// Result of one serializer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Level written to the radio line.
    pub level: bool,
    /// The final stop bit of the final character was just sent; the next tick
    /// starts over from the first character of whatever message it is given.
    pub message_sent: bool,
}

/// Bit-level transmitter state: a character cursor and a frame phase.
///
/// ## Example
///
/// ```rust
/// # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
/// use rtty_telemetry::serializer::RadioSerializer;
///
/// # let pin = Pin::new(&[PinTransaction::set(PinState::High), PinTransaction::set(PinState::Low)]);
/// let mut radio = RadioSerializer::new(pin).unwrap();
/// let outcome = radio.tick(b"$").unwrap(); // called from the bit-clock timer
/// assert!(!outcome.level);
/// # radio.release().done();
/// ```
#[derive(Debug)]
pub struct RadioSerializer<TX>
where
    TX: OutputPin,
{
    tx: TX,
    char_index: usize,
    phase: FramePhase,
    frames_sent: u32,
}

impl<TX> RadioSerializer<TX>
where
    TX: OutputPin,
{
    /// Takes ownership of the radio data pin and drives it high (mark) so the
    /// ground station sees an idle carrier until the first start bit.
    pub fn new(tx: TX) -> Result<Self, Error> {
        let mut tx = tx;
        tx.set_high().map_err(|_| Error::RadioPin)?;
        Ok(Self {
            tx,
            char_index: 0,
            phase: FramePhase::Start,
            frames_sent: 0,
        })
    }

    /// Index of the character currently on air.
    pub fn char_index(&self) -> usize {
        self.char_index
    }

    /// Phase of the next bit to send.
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Number of complete characters sent since power-on (wrapping).
    pub fn frames_sent(&self) -> u32 {
        self.frames_sent
    }

    /// Whether the next tick begins a new message.
    pub fn at_message_start(&self) -> bool {
        self.char_index == 0 && self.phase == FramePhase::Start
    }

    /// Gives the pin back.
    pub fn release(self) -> TX {
        self.tx
    }

    /// Emits exactly one bit of `message`.
    ///
    /// Must be called once per bit period, from the timer tick. `message` must not
    /// change while a message is in flight; replace it only after a tick reports
    /// [`message_sent`](TickOutcome::message_sent).
    ///
    /// An empty message emits a mark and reports `message_sent` so the caller can
    /// supply one.
    pub fn tick(&mut self, message: &[u8]) -> Result<TickOutcome, Error> {
        let Some(&ch) = message.get(self.char_index) else {
            self.char_index = 0;
            self.phase = FramePhase::Start;
            self.write(true)?;
            return Ok(TickOutcome {
                level: true,
                message_sent: true,
            });
        };

        let level = self.phase.level(ch);
        self.write(level)?;

        let mut message_sent = false;
        if self.phase == FramePhase::Stop2 {
            self.char_index += 1;
            self.frames_sent = self.frames_sent.wrapping_add(1);
            if self.char_index >= message.len() {
                self.char_index = 0;
                message_sent = true;
            }
        }
        self.phase = self.phase.next();

        Ok(TickOutcome {
            level,
            message_sent,
        })
    }

    fn write(&mut self, level: bool) -> Result<(), Error> {
        let result = if level {
            self.tx.set_high()
        } else {
            self.tx.set_low()
        };
        result.map_err(|_| Error::RadioPin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_BITS;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    fn expected_levels(message: &[u8]) -> Vec<bool> {
        let mut levels = Vec::new();
        for &ch in message {
            levels.push(false);
            for bit in 0..8 {
                levels.push((ch >> bit) & 1 == 1);
            }
            levels.push(true);
            levels.push(true);
        }
        levels
    }

    fn pin_for(levels: &[bool]) -> PinMock {
        let mut transactions = vec![PinTransaction::set(PinState::High)];
        transactions.extend(levels.iter().map(|&high| {
            PinTransaction::set(if high { PinState::High } else { PinState::Low })
        }));
        PinMock::new(&transactions)
    }

    #[test]
    fn test_phase_sequence_is_eleven_steps() {
        let mut phase = FramePhase::Start;
        let mut seen = Vec::new();
        for _ in 0..FRAME_BITS {
            seen.push(phase);
            phase = phase.next();
        }
        assert_eq!(phase, FramePhase::Start);
        assert_eq!(seen[1], FramePhase::Data(0));
        assert_eq!(seen[8], FramePhase::Data(7));
        assert_eq!(seen[9], FramePhase::Stop1);
        assert_eq!(seen[10], FramePhase::Stop2);
    }

    #[test]
    fn test_single_character_frame() {
        // 'A' = 0x41 = 0b0100_0001
        let levels = [
            false, true, false, false, false, false, false, true, false, true, true,
        ];
        let mut radio = RadioSerializer::new(pin_for(&levels)).unwrap();

        for (i, &want) in levels.iter().enumerate() {
            let outcome = radio.tick(b"A").unwrap();
            assert_eq!(outcome.level, want, "bit {}", i);
            assert_eq!(outcome.message_sent, i == FRAME_BITS - 1);
        }
        assert!(radio.at_message_start());
        radio.release().done();
    }

    #[test]
    fn test_message_emits_eleven_bits_per_character() {
        let message = b"$$ASTL1,0,,,,,,,*ABCD\n";
        let levels = expected_levels(message);
        assert_eq!(levels.len(), FRAME_BITS * message.len());
        let mut radio = RadioSerializer::new(pin_for(&levels)).unwrap();

        let mut emitted = Vec::new();
        let mut completions = 0;
        for _ in 0..levels.len() {
            let outcome = radio.tick(message).unwrap();
            emitted.push(outcome.level);
            if outcome.message_sent {
                completions += 1;
            }
        }

        assert_eq!(emitted, levels);
        assert_eq!(completions, 1);
        for frame in emitted.chunks(FRAME_BITS) {
            assert!(!frame[0]);
            assert!(frame[9]);
            assert!(frame[10]);
        }
        assert_eq!(radio.frames_sent(), message.len() as u32);
        radio.release().done();
    }

    #[test]
    fn test_empty_message_holds_mark() {
        let mut radio = RadioSerializer::new(pin_for(&[true, true])).unwrap();
        for _ in 0..2 {
            let outcome = radio.tick(&[]).unwrap();
            assert!(outcome.level);
            assert!(outcome.message_sent);
        }
        radio.release().done();
    }
}
