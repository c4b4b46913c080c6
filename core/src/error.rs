//! Shared result vocabulary for the permission and configuration surfaces.
//!
//! Every operation that can be denied, no-op, or rejected for malformed
//! input returns one of these four outcomes instead of a `Result` — none of
//! the cases here are exceptional in the sense `?` propagation implies, they
//! are the routine vocabulary of the switch's permission layer and the
//! detector's reconfiguration path (see `modeswitch` and `antijam::configure`).

/// Result of a state-changing operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The operation was well-formed, permitted, and changed state.
    Ok,
    /// The operation was well-formed and permitted but was already the
    /// current value, or was suppressed by debounce.
    NoChange,
    /// The operation was well-formed but not permitted in the current
    /// policy (e.g. a local mode change while controller-only is set).
    Denied,
    /// The operation carried an out-of-range value or an unsatisfiable
    /// reconfiguration request.
    Invalid,
}

impl Outcome {
    /// `true` if the operation actually changed state.
    pub const fn changed(self) -> bool {
        matches!(self, Outcome::Ok)
    }
}
