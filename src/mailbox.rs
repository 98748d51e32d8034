//! Single-slot mailboxes between interrupt handlers and the main loop.
//!
//! Each interrupt source owns one [`Mailbox`]: the handler posts, the main loop
//! takes. The slot is guarded by a `critical_section::Mutex`, so handlers and the
//! main loop never share anything else.
//!
//! ## Overwrite policy
//!
//! A mailbox holds one value. Posting into a full slot replaces the old value and
//! increments [`Mailbox::overruns`]. The main loop must therefore take every value
//! within one byte (receive) or one bit (timer) period; a nonzero overrun count
//! means bytes or bits were lost.

use core::cell::Cell;
use core::fmt;
use critical_section::Mutex;

/// A single-producer, single-consumer, one-value slot shared with an interrupt handler.
pub struct Mailbox<T> {
    slot: Mutex<Cell<Option<T>>>,
    overruns: Mutex<Cell<u16>>,
}

impl<T: Copy> Mailbox<T> {
    /// Creates an empty mailbox. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
            overruns: Mutex::new(Cell::new(0)),
        }
    }

    /// Stores `value`, replacing any value not yet taken.
    ///
    /// Returns `false` when an unconsumed value was overwritten.
    pub fn post(&self, value: T) -> bool {
        critical_section::with(|cs| {
            let overwritten = self.slot.borrow(cs).replace(Some(value)).is_some();
            if overwritten {
                let overruns = self.overruns.borrow(cs);
                overruns.set(overruns.get().saturating_add(1));
            }
            !overwritten
        })
    }

    /// Takes the pending value, leaving the slot empty.
    pub fn take(&self) -> Option<T> {
        critical_section::with(|cs| self.slot.borrow(cs).take())
    }

    /// Whether a value is waiting.
    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).get().is_some())
    }

    /// Number of values overwritten before they were taken (saturating).
    pub fn overruns(&self) -> u16 {
        critical_section::with(|cs| self.overruns.borrow(cs).get())
    }
}

impl<T: Copy> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> fmt::Debug for Mailbox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox")
            .field("pending", &self.is_pending())
            .field("overruns", &self.overruns())
            .finish()
    }
}

/// The two interrupt event sources of the telemetry core.
///
/// Declare one as a `static` and call [`on_rx_complete`](Events::on_rx_complete)
/// from the receiver UART interrupt and [`on_timer_tick`](Events::on_timer_tick)
/// from the bit-clock timer interrupt.
///
/// ```rust
/// use rtty_telemetry::mailbox::Events;
///
/// static EVENTS: Events = Events::new();
///
/// EVENTS.on_rx_complete(b'$');
/// assert_eq!(EVENTS.rx.take(), Some(b'$'));
/// ```
#[derive(Debug, Default)]
pub struct Events {
    /// Bytes received from the navigation receiver.
    pub rx: Mailbox<u8>,
    /// Bit-clock ticks for the radio serializer.
    pub tick: Mailbox<()>,
}

impl Events {
    /// Creates both mailboxes empty.
    pub const fn new() -> Self {
        Self {
            rx: Mailbox::new(),
            tick: Mailbox::new(),
        }
    }

    /// Receive-complete handler body: posts the received byte.
    pub fn on_rx_complete(&self, byte: u8) {
        if !self.rx.post(byte) {
            trace!("rx overrun");
        }
    }

    /// Timer handler body: posts one bit tick.
    pub fn on_timer_tick(&self) {
        if !self.tick.post(()) {
            trace!("tick overrun");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_consumes_once() {
        let mailbox: Mailbox<u8> = Mailbox::new();
        assert!(mailbox.post(7));
        assert!(mailbox.is_pending());
        assert_eq!(mailbox.take(), Some(7));
        assert_eq!(mailbox.take(), None);
        assert_eq!(mailbox.overruns(), 0);
    }

    #[test]
    fn test_newest_value_wins_and_overrun_counted() {
        let mailbox: Mailbox<u8> = Mailbox::new();
        assert!(mailbox.post(1));
        assert!(!mailbox.post(2));
        assert!(!mailbox.post(3));
        assert_eq!(mailbox.take(), Some(3));
        assert_eq!(mailbox.overruns(), 2);
    }

    #[test]
    fn test_events_sources_are_independent() {
        let events = Events::new();
        events.on_rx_complete(b'G');
        events.on_timer_tick();
        events.on_timer_tick();
        assert_eq!(events.rx.take(), Some(b'G'));
        assert_eq!(events.tick.take(), Some(()));
        assert_eq!(events.tick.overruns(), 1);
        assert_eq!(events.rx.overruns(), 0);
    }
}
