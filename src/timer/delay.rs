use core::convert::Infallible;

use crate::config::Config;
use crate::error::Error;
use crate::mailbox::Events;
use crate::scheduler::FlightComputer;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal_nb::serial::Write;

/// Runs a blocking loop that drives the radio bit clock from a delay provider.
///
/// This is a simple timing loop for use where a hardware timer interrupt is
/// unavailable. Each bit period of `config.symbol_rate` raises one tick on
/// `events`. The period is waited out in slices no longer than one received
/// byte at `config.receiver_baud`, polling the flight computer after each
/// slice, so bytes posted by the receive interrupt are taken before the next
/// one lands in the mailbox.
///
/// # Arguments
/// - `computer`: the flight computer to drive
/// - `events`: the event mailboxes shared with the receive interrupt
/// - `delay`: a delay provider implementing `DelayNs`, typically from the HAL
/// - `config`: supplies the symbol rate and the receiver baud rate
///
/// # Notes
/// - Loop overhead adds to each bit period, so the link runs slightly slow.
///   Prefer a timer interrupt when the ground station is sensitive to drift.
/// - Only returns on a pin or link error, or [`Error::ZeroRate`].
pub fn run_tick_loop<D, RADIO, GPS, LED>(
    computer: &mut FlightComputer<RADIO, GPS, LED>,
    events: &Events,
    delay: &mut D,
    config: &Config,
) -> Result<Infallible, Error>
where
    D: DelayNs,
    RADIO: OutputPin,
    GPS: Write<u8>,
    LED: OutputPin,
{
    let tick_us = config.bit_period_us().ok_or(Error::ZeroRate)?;
    let slice_us = config
        .receive_byte_period_us()
        .ok_or(Error::ZeroRate)?
        .clamp(1, tick_us.max(1));
    debug!("tick loop: {} us per bit, polling every {} us", tick_us, slice_us);

    loop {
        events.on_timer_tick();
        computer.poll(events)?;

        let mut waited = 0;
        while waited < tick_us {
            let step = slice_us.min(tick_us - waited);
            delay.delay_us(step);
            waited += step;
            computer.poll(events)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FRAME_BITS, UBX_CFG_NAV5_AIRBORNE};
    use embedded_hal::digital::{ErrorKind, ErrorType};

    const ACK: [u8; 10] = [0xB5, 0x62, 0x05, 0x01, 0x02, 0x00, 0x06, 0x24, 0x32, 0x5B];
    const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

    /// Radio line that fails once its write budget is spent, ending the loop.
    #[derive(Debug)]
    struct BudgetedLine {
        writes_left: usize,
    }

    impl ErrorType for BudgetedLine {
        type Error = ErrorKind;
    }

    impl OutputPin for BudgetedLine {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.spend()
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.spend()
        }
    }

    impl BudgetedLine {
        fn spend(&mut self) -> Result<(), ErrorKind> {
            if self.writes_left == 0 {
                return Err(ErrorKind::Other);
            }
            self.writes_left -= 1;
            Ok(())
        }
    }

    /// Receiver link that records the command bytes it is sent.
    #[derive(Debug, Default)]
    struct ReceiverLink {
        sent: Vec<u8>,
    }

    impl embedded_hal_nb::serial::ErrorType for ReceiverLink {
        type Error = Infallible;
    }

    impl Write<u8> for ReceiverLink {
        fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
            self.sent.push(word);
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Delay that plays a receiver byte stream into `events` at a fixed byte period
    /// while time passes.
    struct StreamingDelay<'a> {
        events: &'a Events,
        stream: Vec<u8>,
        next: usize,
        byte_period_ns: u64,
        elapsed_ns: u64,
    }

    impl DelayNs for StreamingDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.elapsed_ns += u64::from(ns);
            while self.next < self.stream.len()
                && (self.next as u64 + 1) * self.byte_period_ns <= self.elapsed_ns
            {
                let _ = self.events.rx.post(self.stream[self.next]);
                self.next += 1;
            }
        }
    }

    #[test]
    fn test_tick_loop_keeps_up_with_receiver() {
        let events = Events::new();
        let config = Config::default();
        let ticks = 40;
        // One write at construction, then one per tick.
        let radio = BudgetedLine {
            writes_left: 1 + ticks,
        };
        let mut computer: FlightComputer<_, _, BudgetedLine> =
            FlightComputer::new(config, radio, ReceiverLink::default(), None).unwrap();
        computer.start().unwrap();

        let mut stream = ACK.to_vec();
        for _ in 0..5 {
            stream.extend_from_slice(GGA);
        }
        let total = stream.len();
        // 9600 baud 8N1: one byte every 1041.67 us.
        let mut delay = StreamingDelay {
            events: &events,
            stream,
            next: 0,
            byte_period_ns: 1_041_667,
            elapsed_ns: 0,
        };

        let result = run_tick_loop(&mut computer, &events, &mut delay, &config);

        assert_eq!(result, Err(Error::RadioPin));
        assert_eq!(delay.next, total);
        assert_eq!(events.rx.overruns(), 0);
        assert!(computer.is_initialized());
        assert_eq!(computer.handshake().attempts(), 1);
        assert_eq!(computer.fix().time, "123519");
        assert_eq!(computer.fix().altitude, "545.4");
        assert_eq!(computer.radio().char_index(), ticks / FRAME_BITS);

        let (_, link, _) = computer.release();
        assert_eq!(link.sent, UBX_CFG_NAV5_AIRBORNE);
    }

    #[test]
    fn test_tick_loop_rejects_zero_symbol_rate() {
        let events = Events::new();
        let config = Config::default().with_symbol_rate(0);
        let radio = BudgetedLine { writes_left: 1 };
        let mut computer: FlightComputer<_, _, BudgetedLine> =
            FlightComputer::new(config, radio, ReceiverLink::default(), None).unwrap();
        let mut delay = StreamingDelay {
            events: &events,
            stream: Vec::new(),
            next: 0,
            byte_period_ns: 1_000_000,
            elapsed_ns: 0,
        };

        assert_eq!(
            run_tick_loop(&mut computer, &events, &mut delay, &config),
            Err(Error::ZeroRate)
        );
        assert_eq!(delay.elapsed_ns, 0);
    }
}
