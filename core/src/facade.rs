//! Integration façade: wires the mode switch's notifications to the
//! anti-jam detector's lifecycle, and the detector's hop recommendations to
//! the Glock barrier.
//!
//! This is the only type most callers need to touch directly — it owns
//! non-owning references to one anti-jam context and one switch, and a
//! reference to the shared barrier.

use crate::antijam::AntiJamContext;
use crate::error::Outcome;
use crate::glock::{Glock, RadioId};
use crate::log::debug;
use crate::modeswitch::{ControllerApply, Mode, ModeSwitch};

/// What happened on a packet registration pass through the façade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HopOutcome {
    /// No hop recommendation fired, or the link is disabled.
    NoHop,
    /// A hop recommendation fired and both radios advanced.
    Hopped {
        /// Frequency radio 1 landed on.
        freq1: u32,
        /// Frequency radio 2 landed on.
        freq2: u32,
    },
}

/// Ties a [`ModeSwitch`], an [`AntiJamContext`] and a [`Glock`] together.
///
/// Lifetimes: `'a` is the barrier's own band/sequence borrows (see
/// [`Glock`]); `'b` is the lifetime of the switch and detector this façade
/// borrows. The façade itself owns none of the three — they're caller-owned
/// buffers, per the no-allocation-after-init contract.
pub struct Facade<'a, 'b, const CAP: usize> {
    glock: &'b Glock<'a>,
    switch: &'b mut ModeSwitch,
    antijam: &'b mut AntiJamContext<CAP>,
}

impl<'a, 'b, const CAP: usize> Facade<'a, 'b, CAP> {
    pub fn new(
        glock: &'b Glock<'a>,
        switch: &'b mut ModeSwitch,
        antijam: &'b mut AntiJamContext<CAP>,
    ) -> Self {
        Facade { glock, switch, antijam }
    }

    pub fn switch(&self) -> &ModeSwitch {
        self.switch
    }

    pub fn antijam(&self) -> &AntiJamContext<CAP> {
        self.antijam
    }

    fn on_enabled_changed(&mut self, enabled: bool) {
        if enabled {
            self.antijam.reset();
            debug!("facade: link enabled, anti-jam context reset");
        } else {
            debug!("facade: link disabled");
        }
    }

    /// Set the enabled flag from a local input, running the switch's
    /// notify wiring on a change.
    pub fn set_enabled(&mut self, enabled: bool, now_ms: u32) -> Outcome {
        let outcome = self.switch.set_enabled(enabled, now_ms);
        if outcome == Outcome::Ok {
            self.on_enabled_changed(enabled);
        }
        outcome
    }

    /// Set the mode from a local input. Denied under `controller_only`;
    /// never touches the anti-jam context (only the enabled transition
    /// does).
    pub fn set_mode_local(&mut self, mode: Mode, now_ms: u32) -> Outcome {
        self.switch.set_mode_local(mode, now_ms)
    }

    /// Apply a pre-validated controller command byte, running the switch's
    /// notify wiring if the enabled flag changed.
    pub fn apply_controller_command(&mut self, command: u8, now_ms: u32) -> ControllerApply {
        let was_enabled = self.switch.enabled();
        let apply = self.switch.apply_controller_command(command, now_ms);
        if apply.outcome == Outcome::Ok && apply.enabled != was_enabled {
            self.on_enabled_changed(apply.enabled);
        }
        apply
    }

    /// Register one packet's outcome. If the link is enabled and a hop
    /// recommendation fires, opens a Glock cycle and advances both radios.
    pub fn register_packet(&mut self, good: bool, now_ms: u32) -> HopOutcome {
        let suggestion = self.antijam.register_packet(good, now_ms);
        self.maybe_hop(suggestion)
    }

    /// Register an externally-confirmed jamming event, with the same
    /// hop-on-recommendation wiring as [`Self::register_packet`].
    pub fn register_external_jam(&mut self, now_ms: u32) -> HopOutcome {
        let suggestion = self.antijam.register_external_jam(now_ms);
        self.maybe_hop(suggestion)
    }

    /// Age out the anti-jam window without registering a packet. Never
    /// triggers a hop.
    pub fn tick(&mut self, now_ms: u32) {
        self.antijam.tick(now_ms);
    }

    fn maybe_hop(&mut self, suggestion: Option<crate::antijam::HopSuggestion>) -> HopOutcome {
        if suggestion.is_none() || !self.switch.enabled() {
            return HopOutcome::NoHop;
        }
        debug!("facade: hop recommendation accepted");
        self.glock.begin_cycle();
        let freq1 = self.glock.next_synced(RadioId::Radio1);
        let freq2 = self.glock.next_synced(RadioId::Radio2);
        HopOutcome::Hopped { freq1, freq2 }
    }

    /// Force a hop cycle regardless of the detector's recommendation, as
    /// long as the link is enabled. Used for manual or schedule-driven hops
    /// that bypass anti-jam entirely.
    pub fn force_synced_hop(&mut self) -> HopOutcome {
        if !self.switch.enabled() {
            return HopOutcome::NoHop;
        }
        self.glock.begin_cycle();
        let freq1 = self.glock.next_synced(RadioId::Radio1);
        let freq2 = self.glock.next_synced(RadioId::Radio2);
        HopOutcome::Hopped { freq1, freq2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::antijam::AntiJamConfig;
    use crate::band::Band;
    use crate::freqmap::{FrequencyMap, SPREAD_SCALE_DIRECT_HZ};
    use crate::modeswitch::SwitchConfig;
    use crate::sequence::generate_sequence;

    const BAND: Band = Band::new("test", 2_400_000_000, 2_480_000_000, 41, 2_440_000_000);

    #[test]
    fn disabled_link_never_hops() {
        let seq = generate_sequence(1, 41, 0);
        let glock = Glock::new_single_band(FrequencyMap::new(SPREAD_SCALE_DIRECT_HZ), &BAND, &seq, 256);
        let mut switch = ModeSwitch::new(SwitchConfig::default());
        let mut antijam: AntiJamContext<100> = AntiJamContext::new(AntiJamConfig {
            window_size_packets: 10,
            jam_threshold_percent: 10,
            min_bad_packets: 1,
            consecutive_windows_to_jam: 1,
            jam_state_hold_time_ms: 0,
            min_time_between_reco_ms: 0,
            ..AntiJamConfig::default()
        });
        let mut facade = Facade::new(&glock, &mut switch, &mut antijam);

        let mut last = HopOutcome::NoHop;
        for i in 0..10u32 {
            last = facade.register_packet(i != 0, i);
        }
        assert_eq!(last, HopOutcome::NoHop);
    }

    #[test]
    fn enabling_resets_antijam_and_jam_recommendation_drives_both_radios() {
        let seq = generate_sequence(1, 41, 0);
        let glock = Glock::new_single_band(FrequencyMap::new(SPREAD_SCALE_DIRECT_HZ), &BAND, &seq, 256);
        let mut switch = ModeSwitch::new(SwitchConfig::default());
        let mut antijam: AntiJamContext<100> = AntiJamContext::new(AntiJamConfig {
            window_size_packets: 10,
            jam_threshold_percent: 10,
            min_bad_packets: 1,
            consecutive_windows_to_jam: 1,
            jam_state_hold_time_ms: 0,
            min_time_between_reco_ms: 0,
            ..AntiJamConfig::default()
        });
        let mut facade = Facade::new(&glock, &mut switch, &mut antijam);

        facade.set_enabled(true, 0);
        assert_eq!(facade.antijam().report().count, 0);

        let mut last = HopOutcome::NoHop;
        for i in 0..10u32 {
            last = facade.register_packet(i != 0, i);
        }
        match last {
            HopOutcome::Hopped { freq1, freq2 } => assert_eq!(freq1, freq2),
            HopOutcome::NoHop => panic!("expected a hop recommendation to fire"),
        }
        assert_eq!(glock.epoch(), 1);
    }

    #[test]
    fn force_synced_hop_bypasses_detector_but_honors_enabled() {
        let seq = generate_sequence(1, 41, 0);
        let glock = Glock::new_single_band(FrequencyMap::new(SPREAD_SCALE_DIRECT_HZ), &BAND, &seq, 256);
        let mut switch = ModeSwitch::new(SwitchConfig::default());
        let mut antijam: AntiJamContext<16> = AntiJamContext::new(AntiJamConfig::default());
        let mut facade = Facade::new(&glock, &mut switch, &mut antijam);

        assert_eq!(facade.force_synced_hop(), HopOutcome::NoHop);

        facade.set_enabled(true, 0);
        match facade.force_synced_hop() {
            HopOutcome::Hopped { .. } => {}
            HopOutcome::NoHop => panic!("expected force_synced_hop to hop while enabled"),
        }
        assert_eq!(glock.epoch(), 1);
    }

    #[test]
    fn controller_command_enabling_resets_antijam() {
        let seq = generate_sequence(1, 41, 0);
        let glock = Glock::new_single_band(FrequencyMap::new(SPREAD_SCALE_DIRECT_HZ), &BAND, &seq, 256);
        let mut switch = ModeSwitch::new(SwitchConfig::default());
        let mut antijam: AntiJamContext<16> = AntiJamContext::new(AntiJamConfig::default());
        let mut facade = Facade::new(&glock, &mut switch, &mut antijam);

        facade.register_packet(false, 0);
        assert_eq!(facade.antijam().report().count, 1);

        let apply = facade.apply_controller_command(0b001, 10);
        assert!(apply.enabled);
        assert_eq!(facade.antijam().report().count, 0);
    }
}
