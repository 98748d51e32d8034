//! Logging shims.
//!
//! Each macro forwards to `defmt` when `defmt-0-3` is enabled, otherwise to `log`
//! when `log` is enabled, and otherwise only borrows its arguments so the call
//! site still type-checks.

#![allow(unused_macros)]

macro_rules! trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::trace!($fmt $(, $arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::trace!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        {
            $( let _ = &$arg; )*
        }
    }};
}

macro_rules! debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::debug!($fmt $(, $arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::debug!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        {
            $( let _ = &$arg; )*
        }
    }};
}

macro_rules! info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::info!($fmt $(, $arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::info!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        {
            $( let _ = &$arg; )*
        }
    }};
}

macro_rules! warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt-0-3")]
        ::defmt::warn!($fmt $(, $arg)*);
        #[cfg(all(feature = "log", not(feature = "defmt-0-3")))]
        ::log::warn!($fmt $(, $arg)*);
        #[cfg(not(any(feature = "log", feature = "defmt-0-3")))]
        {
            $( let _ = &$arg; )*
        }
    }};
}
