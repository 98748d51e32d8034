//! Timer and tick-loop utilities for the radio bit clock.
//!
//! The radio serializer advances exactly one bit per tick, so the tick interval
//! is the bit period of the link. Any drift or jitter here desynchronizes the
//! ground station decoder, so the interval should come from a hardware timer.
//!
//! Contains helpers for both scheduling approaches:
//! - `compute_timer_reload`: runtime reload calculator for an overflowing 16-bit timer
//! - `const_timer_reload`: compile-time reload calculator
//! - `run_tick_loop`: blocking driver loop for `DelayNs` (feature `delay-loop`)
//!
//! Common setups at 50 baud (20 ms per bit):
//!
//! | F_CPU  | PRESCALER | Timer counts | Reload |
//! |--------|-----------|--------------|--------|
//! | 8 MHz  |         8 |        20000 |  45536 |
//! | 16 MHz |        64 |         5000 |  60536 |
//! | 1 MHz  |         1 |        20000 |  45536 |

use libm::round;

use crate::consts::UART_FRAME_BITS;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg(feature = "delay-loop")]
pub use delay::*;

/// Microseconds per second.
pub const MICROSECONDS_PER_SECOND: u32 = 1_000_000;

/// Number of counts before a 16-bit timer overflows.
pub const TIMER16_OVERFLOW: u32 = 1 << 16;

/// Duration of one radio bit in microseconds for the given symbol rate, or
/// `None` for a rate of zero.
pub const fn bit_period_us(baud: u32) -> Option<u32> {
    MICROSECONDS_PER_SECOND.checked_div(baud)
}

/// Time the receiver takes to deliver one 8N1 byte at `baud`, truncated to whole
/// microseconds, or `None` for a rate of zero.
///
/// The main loop must come round within this period or received bytes overrun
/// their mailbox.
pub const fn byte_period_us(baud: u32) -> Option<u32> {
    (UART_FRAME_BITS * MICROSECONDS_PER_SECOND).checked_div(baud)
}

/// Computes the reload value for a 16-bit overflow timer.
///
/// The timer counts up from the reload value and interrupts on overflow, so the
/// reload is `65536 - counts_per_bit`.
///
/// # Arguments
/// - `f_cpu`: CPU frequency in Hz
/// - `prescaler`: timer prescaler (e.g., 1, 8, 64)
/// - `baud`: radio symbol rate
///
/// # Returns
/// - The reload value (rounded to the nearest count), or `None` if one bit does not
///   fit in 16 bits of timer counts
pub fn compute_timer_reload(f_cpu: u32, prescaler: u32, baud: u32) -> Option<u16> {
    let counts_per_second = f_cpu as f64 / prescaler as f64;
    let counts_per_bit = round(counts_per_second / baud as f64) as u32;
    if counts_per_bit == 0 || counts_per_bit > TIMER16_OVERFLOW {
        return None;
    }
    u16::try_from(TIMER16_OVERFLOW - counts_per_bit).ok()
}

/// Compile-time reload value calculator.
///
/// Integer version of [`compute_timer_reload`]; truncates instead of rounding and
/// saturates to `0` when one bit does not fit in the timer or `prescaler` or
/// `baud` is zero.
///
/// # Example
/// ```rust
/// use rtty_telemetry::timer::const_timer_reload;
///
/// const RELOAD: u16 = const_timer_reload(8_000_000, 8, 50);
/// assert_eq!(RELOAD, 45_536);
/// ```
pub const fn const_timer_reload(f_cpu: u32, prescaler: u32, baud: u32) -> u16 {
    let counts_per_bit = match f_cpu.checked_div(prescaler) {
        Some(counts_per_second) => match counts_per_second.checked_div(baud) {
            Some(counts) => counts,
            None => return 0,
        },
        None => return 0,
    };
    if counts_per_bit == 0 || counts_per_bit >= TIMER16_OVERFLOW {
        0
    } else {
        (TIMER16_OVERFLOW - counts_per_bit) as u16
    }
}
