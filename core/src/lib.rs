//! Coordination core for a dual-radio frequency-hopping spread-spectrum (FHSS) link.
//!
//! This crate is the platform-agnostic half of a radio-control receiver's hop
//! logic. It does not touch registers, SPI buses or GPIOs — see
//! `fhss-radio-hal` for the adapter layer that connects this crate to actual
//! radio chips and RC-channel decoding. `fhss-core` itself only:
//!
//! - generates the deterministic hop [`sequence`] shared with the transmitter,
//! - maps a sequence index to a carrier [`freqmap::FrequencyMap`] value,
//! - arbitrates which of two radios advances the shared cursor each cycle
//!   ([`glock`]),
//! - watches packet quality and debounces hop recommendations ([`antijam`]),
//! - and arbitrates local vs. controller permission over enable/mode state
//!   ([`modeswitch`]).
//!
//! [`facade`] wires the last two together: it is the only type most callers
//! need to touch directly.
#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
mod log;

pub mod antijam;
pub mod band;
pub mod error;
pub mod facade;
pub mod freqmap;
pub mod glock;
pub mod modeswitch;
pub mod sequence;
pub mod time;

pub use antijam::{AntiJamConfig, AntiJamContext, AntiJamReport, HopSuggestion, JamState, WindowMode};
pub use band::Band;
pub use error::Outcome;
pub use facade::{Facade, HopOutcome};
pub use freqmap::FrequencyMap;
pub use glock::{Glock, RadioId};
pub use modeswitch::{ControllerApply, Mode, ModeSwitch, SwitchConfig};
pub use sequence::SEQUENCE_LEN;
