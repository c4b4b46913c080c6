//! Enable/mode policy layer: arbitrates local vs. controller authority over
//! the link's enabled flag and operating mode.

use crate::error::Outcome;
use crate::log::debug;
use crate::time::has_elapsed;

/// Operating mode, set either locally or by an authenticated controller
/// command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Auto,
    Low,
    High,
}

impl Mode {
    /// Decode the two mode bits of a controller command byte. `0b11` maps
    /// back to `Auto`, matching the wire convention's "11=AUTO" fallback.
    fn from_bits(bits: u8) -> Mode {
        match bits & 0b11 {
            0b01 => Mode::Low,
            0b10 => Mode::High,
            _ => Mode::Auto,
        }
    }

    fn to_bits(self) -> u8 {
        match self {
            Mode::Auto => 0b00,
            Mode::Low => 0b01,
            Mode::High => 0b10,
        }
    }
}

/// Tunable parameters for one [`ModeSwitch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SwitchConfig {
    /// Minimum interval, in ms, between two changes that fire notify. A
    /// well-formed change arriving before this interval elapses is reported
    /// as [`Outcome::NoChange`] rather than applied — see the struct docs on
    /// [`ModeSwitch`] for why this doesn't violate the "deterministic
    /// function of inputs" failure semantics.
    pub min_change_interval_ms: u32,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        SwitchConfig { min_change_interval_ms: 0 }
    }
}

/// The result of applying a decoded controller command byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerApply {
    /// Outcome of the combined apply. `Ok` if either field changed,
    /// `NoChange` if neither did.
    pub outcome: Outcome,
    /// Resulting enabled flag.
    pub enabled: bool,
    /// Resulting mode.
    pub mode: Mode,
}

/// Enable/mode state with local-vs-controller permission, debounce and
/// change notification.
///
/// `min_change_interval_ms` in [`SwitchConfig`] is a deliberate elaboration:
/// debounce turning a well-formed change into [`Outcome::NoChange`] is
/// still a deterministic function of `(state, input, now)`, so it doesn't
/// introduce the transient failures the switch is documented to never
/// produce.
pub struct ModeSwitch {
    config: SwitchConfig,
    enabled: bool,
    mode: Mode,
    controller_only: bool,
    last_change_ms: u32,
    has_changed_once: bool,
}

impl ModeSwitch {
    /// Build a switch. Starts disabled, in `Auto` mode, with no controller
    /// lock.
    pub fn new(config: SwitchConfig) -> Self {
        ModeSwitch {
            config,
            enabled: false,
            mode: Mode::Auto,
            controller_only: false,
            last_change_ms: 0,
            has_changed_once: false,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn controller_only(&self) -> bool {
        self.controller_only
    }

    fn debounced(&self, now_ms: u32) -> bool {
        self.has_changed_once && !has_elapsed(now_ms, self.last_change_ms, self.config.min_change_interval_ms)
    }

    fn apply_enable(&mut self, enabled: bool, now_ms: u32) -> bool {
        if self.enabled == enabled {
            return false;
        }
        self.enabled = enabled;
        self.last_change_ms = now_ms;
        self.has_changed_once = true;
        true
    }

    fn apply_mode(&mut self, mode: Mode, now_ms: u32) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.last_change_ms = now_ms;
        self.has_changed_once = true;
        true
    }

    /// Set the enabled flag. Always permitted regardless of
    /// `controller_only`.
    pub fn set_enabled(&mut self, enabled: bool, now_ms: u32) -> Outcome {
        if self.enabled == enabled {
            return Outcome::NoChange;
        }
        if self.debounced(now_ms) {
            return Outcome::NoChange;
        }
        self.apply_enable(enabled, now_ms);
        debug!("mode switch: enabled -> {}", enabled);
        Outcome::Ok
    }

    /// Set the mode from a local (receiver-side) input. Denied while
    /// `controller_only` is set.
    pub fn set_mode_local(&mut self, mode: Mode, now_ms: u32) -> Outcome {
        if self.controller_only {
            return Outcome::Denied;
        }
        if self.mode == mode {
            return Outcome::NoChange;
        }
        if self.debounced(now_ms) {
            return Outcome::NoChange;
        }
        self.apply_mode(mode, now_ms);
        debug!("mode switch: local mode -> {}", mode.to_bits());
        Outcome::Ok
    }

    /// Set the mode from an authenticated controller command. Bypasses
    /// `controller_only`.
    pub fn set_mode_from_controller(&mut self, mode: Mode, now_ms: u32) -> Outcome {
        if self.mode == mode {
            return Outcome::NoChange;
        }
        if self.debounced(now_ms) {
            return Outcome::NoChange;
        }
        self.apply_mode(mode, now_ms);
        debug!("mode switch: controller mode -> {}", mode.to_bits());
        Outcome::Ok
    }

    /// Request the enabled flag from an authenticated controller command.
    /// Bypasses `controller_only`.
    pub fn request_enable_from_controller(&mut self, enabled: bool, now_ms: u32) -> Outcome {
        self.set_enabled(enabled, now_ms)
    }

    /// Lock or unlock local mode changes. Always permitted, never fires
    /// notify.
    pub fn set_controller_only(&mut self, locked: bool) -> Outcome {
        if self.controller_only == locked {
            return Outcome::NoChange;
        }
        self.controller_only = locked;
        Outcome::Ok
    }

    /// Apply a pre-validated controller command byte: bit0 is the enabled
    /// flag, bits1..2 are the mode (`0b11` falls back to `Auto`). Both
    /// fields are applied atomically; the caller sees a single combined
    /// outcome and, in the façade, a single notify fires iff either field
    /// changed.
    pub fn apply_controller_command(&mut self, command: u8, now_ms: u32) -> ControllerApply {
        let enabled = command & 0b1 != 0;
        let mode = Mode::from_bits(command >> 1);

        // Snapshot debounce once: applying the enable half must not affect
        // whether the mode half (of the same command) is considered
        // debounced, or vice versa.
        let was_debounced = self.debounced(now_ms);

        let enable_changed = if self.enabled != enabled && !was_debounced {
            self.apply_enable(enabled, now_ms)
        } else {
            false
        };
        let mode_changed = if self.mode != mode && !was_debounced {
            self.apply_mode(mode, now_ms)
        } else {
            false
        };

        let outcome = if enable_changed || mode_changed { Outcome::Ok } else { Outcome::NoChange };
        if outcome == Outcome::Ok {
            debug!("mode switch: controller command applied, enabled={}", self.enabled);
        }
        ControllerApply { outcome, enabled: self.enabled, mode: self.mode }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_change_denied_under_controller_only() {
        let mut sw = ModeSwitch::new(SwitchConfig::default());
        sw.set_controller_only(true);
        let outcome = sw.set_mode_local(Mode::High, 0);
        assert_eq!(outcome, Outcome::Denied);
        assert_eq!(sw.mode(), Mode::Auto);
    }

    #[test]
    fn controller_change_bypasses_lock() {
        let mut sw = ModeSwitch::new(SwitchConfig::default());
        sw.set_controller_only(true);
        let outcome = sw.set_mode_from_controller(Mode::High, 0);
        assert_eq!(outcome, Outcome::Ok);
        assert_eq!(sw.mode(), Mode::High);
    }

    #[test]
    fn setting_current_value_is_nochange() {
        let mut sw = ModeSwitch::new(SwitchConfig::default());
        assert_eq!(sw.set_mode_local(Mode::Auto, 0), Outcome::NoChange);
        assert_eq!(sw.set_enabled(false, 0), Outcome::NoChange);
    }

    #[test]
    fn controller_lock_scenario() {
        let mut sw = ModeSwitch::new(SwitchConfig::default());
        sw.set_controller_only(true);

        let outcome = sw.set_mode_local(Mode::High, 10);
        assert_eq!(outcome, Outcome::Denied);
        assert_eq!(sw.mode(), Mode::Auto);

        let outcome = sw.set_mode_from_controller(Mode::High, 20);
        assert_eq!(outcome, Outcome::Ok);
        assert_eq!(sw.mode(), Mode::High);
    }

    #[test]
    fn debounce_turns_rapid_change_into_nochange() {
        let mut sw = ModeSwitch::new(SwitchConfig { min_change_interval_ms: 100 });
        assert_eq!(sw.set_enabled(true, 0), Outcome::Ok);
        assert_eq!(sw.set_enabled(false, 50), Outcome::NoChange);
        assert_eq!(sw.enabled(), true);
        assert_eq!(sw.set_enabled(false, 150), Outcome::Ok);
        assert_eq!(sw.enabled(), false);
    }

    #[test]
    fn controller_command_decodes_bits_and_applies_atomically() {
        let mut sw = ModeSwitch::new(SwitchConfig::default());
        // bit0=1 (enabled), bits1..2=0b10 (High) => 0b101 = 5
        let apply = sw.apply_controller_command(0b101, 0);
        assert_eq!(apply.outcome, Outcome::Ok);
        assert!(apply.enabled);
        assert_eq!(apply.mode, Mode::High);
        assert_eq!(sw.enabled(), true);
        assert_eq!(sw.mode(), Mode::High);
    }

    #[test]
    fn controller_command_mode_bits_11_falls_back_to_auto() {
        let mut sw = ModeSwitch::new(SwitchConfig::default());
        sw.set_mode_from_controller(Mode::High, 0);
        let apply = sw.apply_controller_command(0b110, 10); // bits1..2 = 0b11
        assert_eq!(apply.mode, Mode::Auto);
    }

    #[test]
    fn controller_command_identical_state_is_nochange() {
        let mut sw = ModeSwitch::new(SwitchConfig::default());
        let apply = sw.apply_controller_command(0b000, 0);
        assert_eq!(apply.outcome, Outcome::NoChange);
    }

    #[test]
    fn controller_command_applies_both_fields_under_debounce() {
        // With min_change_interval_ms > 0, applying the enable half must not
        // cause the mode half of the same command to be seen as debounced.
        let mut sw = ModeSwitch::new(SwitchConfig { min_change_interval_ms: 100 });
        // bit0=1 (enabled), bits1..2=0b10 (High) => 0b101 = 5
        let apply = sw.apply_controller_command(0b101, 0);
        assert_eq!(apply.outcome, Outcome::Ok);
        assert!(apply.enabled);
        assert_eq!(apply.mode, Mode::High, "mode half must apply even though enable changed first");
        assert_eq!(sw.mode(), Mode::High);
    }
}
