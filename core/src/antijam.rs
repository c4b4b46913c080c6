//! Sliding-window packet-quality monitor with a debounced jam state machine
//! and rate-limited hop recommendations.

use heapless::Deque;

use crate::error::Outcome;
use crate::log::debug;
use crate::time::{elapsed, has_elapsed};

/// Default duration, in ms, the external-jam sticky flag stays set in
/// `BY_COUNT` mode — the original's window has no natural duration there.
pub const DEFAULT_EXT_JAM_WINDOW_MS: u32 = 1000;

/// How window boundaries are detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WindowMode {
    /// A boundary occurs every `window_size_packets` registered packets.
    ByCount,
    /// A boundary occurs every `window_duration_ms` of wall-clock time.
    ByTime,
}

/// The detector's jam state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JamState {
    /// No jamming observed recently.
    NotJammed,
    /// Jamming observed but not yet debounced into [`JamState::Jammed`].
    Suspect,
    /// Jamming confirmed across `consecutive_windows_to_jam` boundaries.
    Jammed,
}

/// Tunable parameters for one [`AntiJamContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AntiJamConfig {
    /// Number of packets that make up one window (`BY_COUNT`) — also the
    /// logical ring capacity; must not exceed the context's compiled-in
    /// buffer size.
    pub window_size_packets: u16,
    /// Duration of one window, in ms (`BY_TIME`).
    pub window_duration_ms: u32,
    /// Which of the two window semantics is active.
    pub window_mode: WindowMode,
    /// Bad-packet percentage (1..=100) a window must meet to be jammy.
    pub jam_threshold_percent: u8,
    /// Absolute floor on bad packets before a window can be jammy, even if
    /// the percentage alone would qualify.
    pub min_bad_packets: u16,
    /// Debounce: consecutive jammy boundaries required to reach `Jammed`.
    pub consecutive_windows_to_jam: u8,
    /// Minimum dwell time in `Jammed` before softening to `Suspect`.
    pub jam_state_hold_time_ms: u32,
    /// Floor on the interval between two fired hop recommendations.
    pub min_time_between_reco_ms: u32,
    /// Enables the `suggest_group_switch` hint on fired recommendations.
    pub allow_group_switch_suggestions: bool,
}

impl AntiJamConfig {
    /// Clamp every field into its documented soft bound. Called on
    /// construction and reconfiguration; out-of-range inputs are silently
    /// clamped rather than rejected (see the crate's error-handling design).
    pub fn clamped(mut self) -> Self {
        self.window_size_packets = self.window_size_packets.max(1);
        self.window_duration_ms = self.window_duration_ms.max(1);
        self.jam_threshold_percent = self.jam_threshold_percent.clamp(1, 100);
        self.consecutive_windows_to_jam = self.consecutive_windows_to_jam.max(1);
        self.min_time_between_reco_ms = self.min_time_between_reco_ms.max(1);
        self
    }
}

impl Default for AntiJamConfig {
    fn default() -> Self {
        AntiJamConfig {
            window_size_packets: 100,
            window_duration_ms: 1000,
            window_mode: WindowMode::ByCount,
            jam_threshold_percent: 30,
            min_bad_packets: 5,
            consecutive_windows_to_jam: 3,
            jam_state_hold_time_ms: 2000,
            min_time_between_reco_ms: 500,
            allow_group_switch_suggestions: true,
        }
    }
}

/// A point-in-time snapshot of the detector's assessment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AntiJamReport {
    /// Current jam state.
    pub state: JamState,
    /// Bad-packet percentage of the current window, 0..=100 (includes the
    /// external-jam bonus).
    pub score: u8,
    /// Confidence in `score`, 0..=100.
    pub confidence: u8,
    /// `score` rescaled to a full byte, for compact wire reporting.
    pub hint: u8,
    /// Packets currently tracked in the window.
    pub count: u16,
    /// Bad packets currently tracked in the window.
    pub bad_count: u16,
}

impl Default for JamState {
    fn default() -> Self {
        JamState::NotJammed
    }
}

/// A fired hop recommendation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HopSuggestion {
    /// Confidence behind the recommendation, 0..=100.
    pub confidence: u8,
    /// `score` rescaled to a full byte.
    pub hint: u8,
    /// Hint that the whole group (not just this receiver) should consider
    /// switching, when [`AntiJamConfig::allow_group_switch_suggestions`] is
    /// set and the jamming looks severe or externally confirmed.
    pub suggest_group_switch: bool,
}

#[derive(Clone, Copy)]
struct RingEntry {
    good: bool,
    ts: u32,
}

/// Sliding-window packet-quality monitor.
///
/// `CAP` is the compile-time ceiling on the ring buffer — the largest
/// `window_size_packets` this context will ever be asked to track.
/// [`AntiJamContext::configure`] may shrink `window_size_packets` below
/// `CAP` freely but rejects growing it back past `CAP` with
/// [`Outcome::Invalid`], since the original's flexible-array layout can't
/// grow its backing storage at runtime and this port keeps the same
/// constraint rather than risk callers under-sizing their buffer.
pub struct AntiJamContext<const CAP: usize> {
    config: AntiJamConfig,
    entries: Deque<RingEntry, CAP>,
    bad_count: u16,
    packets_since_boundary: u16,
    window_start_ms: u32,
    last_now_ms: u32,
    state: JamState,
    streak: u8,
    last_jam_change_ms: u32,
    ext_jam_sticky: bool,
    ext_jam_ts: u32,
    last_reco_ms: Option<u32>,
    last_report: AntiJamReport,
}

impl<const CAP: usize> AntiJamContext<CAP> {
    /// Build a new context. `config.window_size_packets` is clamped to at
    /// most `CAP` (the context has nowhere else to put the rest).
    pub fn new(config: AntiJamConfig) -> Self {
        let mut config = config.clamped();
        if config.window_size_packets as usize > CAP {
            config.window_size_packets = CAP as u16;
        }
        AntiJamContext {
            config,
            entries: Deque::new(),
            bad_count: 0,
            packets_since_boundary: 0,
            window_start_ms: 0,
            last_now_ms: 0,
            state: JamState::NotJammed,
            streak: 0,
            last_jam_change_ms: 0,
            ext_jam_sticky: false,
            ext_jam_ts: 0,
            last_reco_ms: None,
            last_report: AntiJamReport::default(),
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &AntiJamConfig {
        &self.config
    }

    /// Most recently computed report (also returned by [`Self::tick`] and
    /// every register call).
    pub fn report(&self) -> AntiJamReport {
        self.last_report
    }

    /// Current jam state.
    pub fn state(&self) -> JamState {
        self.state
    }

    /// Replace the configuration. Resets the streak debounce and, if
    /// `window_size_packets` changed, prunes the ring down to the new size
    /// (shrink only — see the struct docs).
    pub fn configure(&mut self, config: AntiJamConfig) -> Outcome {
        let config = config.clamped();
        if config.window_size_packets as usize > CAP {
            return Outcome::Invalid;
        }
        let size_changed = config.window_size_packets != self.config.window_size_packets;
        self.config = config;
        if size_changed {
            while self.entries.len() > self.config.window_size_packets as usize {
                if let Some(evicted) = self.entries.pop_back() {
                    if !evicted.good {
                        self.bad_count -= 1;
                    }
                }
            }
            self.packets_since_boundary = 0;
        }
        self.streak = 0;
        self.window_start_ms = self.last_now_ms;
        debug!("anti-jam: reconfigured, window={}", self.config.window_size_packets);
        Outcome::Ok
    }

    /// Discard all tracked packets and return to `NotJammed`. The façade
    /// calls this when the link is (re-)enabled, so stale packet history
    /// can't trigger an immediate spurious hop.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.bad_count = 0;
        self.packets_since_boundary = 0;
        self.window_start_ms = self.last_now_ms;
        self.state = JamState::NotJammed;
        self.streak = 0;
        self.ext_jam_sticky = false;
        self.last_reco_ms = None;
        self.last_report = AntiJamReport::default();
    }

    /// Record one packet's outcome. Returns `Some` when this registration
    /// newly recommends a hop.
    pub fn register_packet(&mut self, good: bool, now_ms: u32) -> Option<HopSuggestion> {
        self.last_now_ms = now_ms;
        self.evict_stale(now_ms);
        if self.entries.len() >= self.config.window_size_packets as usize {
            if let Some(evicted) = self.entries.pop_back() {
                if !evicted.good {
                    self.bad_count -= 1;
                }
            }
        }
        let _ = self.entries.push_front(RingEntry { good, ts: now_ms });
        if !good {
            self.bad_count += 1;
        }

        let boundary = match self.config.window_mode {
            WindowMode::ByCount => {
                self.packets_since_boundary += 1;
                if self.packets_since_boundary >= self.config.window_size_packets {
                    self.packets_since_boundary = 0;
                    true
                } else {
                    false
                }
            }
            WindowMode::ByTime => {
                if has_elapsed(now_ms, self.window_start_ms, self.config.window_duration_ms) {
                    self.window_start_ms = now_ms;
                    true
                } else {
                    false
                }
            }
        };
        if boundary {
            self.on_boundary(now_ms);
        }
        self.refresh_report(now_ms);
        self.maybe_recommend(now_ms)
    }

    /// Record an externally-confirmed jamming event (e.g. from telemetry
    /// reported by the paired transmitter). Bumps the score for one window
    /// duration and may itself trigger a recommendation.
    pub fn register_external_jam(&mut self, now_ms: u32) -> Option<HopSuggestion> {
        self.last_now_ms = now_ms;
        self.ext_jam_sticky = true;
        self.ext_jam_ts = now_ms;
        self.refresh_report(now_ms);
        self.maybe_recommend(now_ms)
    }

    /// Age out stale entries and the external-jam flag without registering
    /// a new packet. Never fires a recommendation — only `register_*` does.
    /// Idempotent: calling this twice with the same `now_ms` leaves the
    /// report unchanged.
    pub fn tick(&mut self, now_ms: u32) -> AntiJamReport {
        self.last_now_ms = now_ms;
        self.evict_stale(now_ms);
        if self.ext_jam_sticky && !self.external_jam_recent(now_ms) {
            self.ext_jam_sticky = false;
        }
        self.refresh_report(now_ms);
        self.last_report
    }

    fn evict_stale(&mut self, now_ms: u32) {
        if self.config.window_mode != WindowMode::ByTime {
            return;
        }
        while let Some(oldest) = self.entries.back() {
            if elapsed(now_ms, oldest.ts) > self.config.window_duration_ms {
                if let Some(evicted) = self.entries.pop_back() {
                    if !evicted.good {
                        self.bad_count -= 1;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn on_boundary(&mut self, now_ms: u32) {
        let count = self.entries.len() as u16;
        let score = self.score(count, now_ms);
        let jammy =
            self.bad_count >= self.config.min_bad_packets && score >= self.config.jam_threshold_percent;

        if jammy {
            self.streak = self.streak.saturating_add(1);
            let reached_threshold = self.streak >= self.config.consecutive_windows_to_jam;
            match self.state {
                JamState::NotJammed | JamState::Suspect if reached_threshold => {
                    self.transition(JamState::Jammed, now_ms);
                }
                JamState::NotJammed => {
                    self.transition(JamState::Suspect, now_ms);
                }
                JamState::Suspect | JamState::Jammed => {}
            }
        } else {
            self.streak = 0;
            match self.state {
                JamState::Jammed => {
                    if has_elapsed(now_ms, self.last_jam_change_ms, self.config.jam_state_hold_time_ms) {
                        self.transition(JamState::Suspect, now_ms);
                    }
                }
                JamState::Suspect => {
                    if count == 0 || (score as u16) < self.config.jam_threshold_percent as u16 / 2 {
                        self.transition(JamState::NotJammed, now_ms);
                    }
                }
                JamState::NotJammed => {}
            }
        }
    }

    fn transition(&mut self, to: JamState, now_ms: u32) {
        if self.state != to {
            debug!("anti-jam: state {} -> {}", self.state as u8, to as u8);
            self.state = to;
            self.last_jam_change_ms = now_ms;
        }
    }

    fn score(&self, count: u16, now_ms: u32) -> u8 {
        let raw = if count > 0 { (self.bad_count as u32 * 100 / count as u32) as u8 } else { 0 };
        if self.external_jam_recent(now_ms) {
            raw.saturating_add(10).min(100)
        } else {
            raw
        }
    }

    fn external_jam_recent(&self, now_ms: u32) -> bool {
        if !self.ext_jam_sticky {
            return false;
        }
        let window = if self.config.window_mode == WindowMode::ByTime {
            self.config.window_duration_ms
        } else {
            DEFAULT_EXT_JAM_WINDOW_MS
        };
        !has_elapsed(now_ms, self.ext_jam_ts, window)
    }

    fn refresh_report(&mut self, now_ms: u32) {
        let count = self.entries.len() as u16;
        let score = self.score(count, now_ms);
        let conf_base = count.min(100) / 2;
        let over = score.saturating_sub(self.config.jam_threshold_percent);
        let confidence = (conf_base as u16 + over as u16).min(100) as u8;
        let hint = ((score as u16 * 255) / 100) as u8;
        self.last_report =
            AntiJamReport { state: self.state, score, confidence, hint, count, bad_count: self.bad_count };
    }

    fn maybe_recommend(&mut self, now_ms: u32) -> Option<HopSuggestion> {
        let report = self.last_report;
        let wants_hop = match report.state {
            JamState::Jammed => true,
            JamState::Suspect => report.score >= self.config.jam_threshold_percent.saturating_add(10),
            JamState::NotJammed => false,
        };
        if !wants_hop {
            return None;
        }
        let paced = match self.last_reco_ms {
            None => true,
            Some(prev) => has_elapsed(now_ms, prev, self.config.min_time_between_reco_ms),
        };
        if !paced {
            return None;
        }
        self.last_reco_ms = Some(now_ms);
        let ext_recent = self.external_jam_recent(now_ms);
        debug!("anti-jam: hop recommended, confidence={}", report.confidence);
        Some(HopSuggestion {
            confidence: report.confidence,
            hint: report.hint,
            suggest_group_switch: self.config.allow_group_switch_suggestions && (report.score >= 80 || ext_recent),
        })
    }
}
