//! Millisecond timestamp arithmetic tolerant of a single `u32` wrap.
//!
//! A thin newtype over the platform's free-running clock, with difference
//! and comparison always expressed via wrapping arithmetic so a single wrap
//! of the underlying counter within a window or hold interval can't be
//! mistaken for a huge elapsed time.
//!
//! The free-running clock itself (`millis()`) is an external collaborator —
//! out of scope for this crate, see `fhss-radio-hal` — so every API here
//! takes the current time as an explicit `u32` parameter rather than reading
//! a clock.

/// A point in time, in milliseconds, from an unspecified free-running epoch.
///
/// [`Millis::elapsed_since`] is the only way to compare two instants; it is
/// defined so that a single wrap of the underlying `u32` counter does not
/// produce a spurious huge duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Millis {
    /// Milliseconds elapsed from `earlier` to `self`, tolerant of one wrap.
    pub const fn elapsed_since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// `true` iff at least `duration_ms` has elapsed from `earlier` to `self`.
    pub const fn has_elapsed(self, earlier: Millis, duration_ms: u32) -> bool {
        self.elapsed_since(earlier) >= duration_ms
    }
}

impl From<u32> for Millis {
    fn from(raw: u32) -> Self {
        Millis(raw)
    }
}

/// Free-function form of [`Millis::elapsed_since`] for call sites that carry
/// raw `u32` timestamps rather than wrapping them in [`Millis`] — every
/// public timestamp parameter in this crate is a raw `u32` to match the
/// wire/timer convention described in the crate's external interfaces, so
/// the internal state machines use this directly.
pub(crate) const fn elapsed(now: u32, earlier: u32) -> u32 {
    now.wrapping_sub(earlier)
}

/// Free-function form of [`Millis::has_elapsed`].
pub(crate) const fn has_elapsed(now: u32, earlier: u32, duration_ms: u32) -> bool {
    elapsed(now, earlier) >= duration_ms
}
