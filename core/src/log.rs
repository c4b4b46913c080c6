//! Internal logging shim.
//!
//! Mirrors the optional `defmt`/`log` feature split used throughout this
//! codebase's `no_std` crates: with neither feature enabled these macros
//! compile away to nothing (their arguments are still evaluated so unused
//! bindings don't produce warnings), keeping the coordination core free of
//! any logging overhead by default.

#![allow(unused_macros)]

macro_rules! trace {
    ($($arg:tt)*) => {
        {
            #[cfg(feature = "defmt")]
            defmt::trace!($($arg)*);
            #[cfg(all(feature = "log", not(feature = "defmt")))]
            log::trace!($($arg)*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($($arg)*,);
        }
    };
}

macro_rules! debug {
    ($($arg:tt)*) => {
        {
            #[cfg(feature = "defmt")]
            defmt::debug!($($arg)*);
            #[cfg(all(feature = "log", not(feature = "defmt")))]
            log::debug!($($arg)*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($($arg)*,);
        }
    };
}

macro_rules! warn {
    ($($arg:tt)*) => {
        {
            #[cfg(feature = "defmt")]
            defmt::warn!($($arg)*);
            #[cfg(all(feature = "log", not(feature = "defmt")))]
            log::warn!($($arg)*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($($arg)*,);
        }
    };
}

pub(crate) use debug;
#[allow(unused_imports)]
pub(crate) use trace;
#[allow(unused_imports)]
pub(crate) use warn;
