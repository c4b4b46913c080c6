//! Illustrative wiring of two radios, a CRSF reader and the coordination
//! façade on an RTIC app. Not covered by any test suite — it exists to show
//! how `fhss-core` and `fhss-radio-hal` are meant to be assembled, the way
//! this workspace's own demo binaries illustrate their stack without being
//! exercised by CI.
#![no_std]
#![no_main]

use panic_probe as _;

use fhss_core::{
    AntiJamConfig, AntiJamContext, Band, Facade, FrequencyMap, Glock, ModeSwitch, SwitchConfig,
    SEQUENCE_LEN,
};
use fhss_radio_hal::{decode_switch_command, CrsfChannels};

/// The ISM band plan this demo hops over. A real binary would select
/// primary/secondary bands per chip variant.
const BAND: Band = Band::new("ISM 2.4 GHz", 2_400_000_000, 2_480_000_000, 41, 2_440_000_000);

/// Fixed window capacity for the anti-jam ring; sized to the largest
/// `window_size_packets` this demo ever configures.
const ANTIJAM_CAP: usize = 256;

#[rtic::app(device = nrf52840_hal::pac, peripherals = true)]
mod app {
    use super::*;

    #[shared]
    struct Shared {
        facade_state: FacadeState,
    }

    #[local]
    struct Local {}

    /// Owns the buffers the façade borrows; lives for the app's lifetime so
    /// the façade itself can be built fresh each time it's needed without
    /// reaching for `'static` self-references.
    struct FacadeState {
        switch: ModeSwitch,
        antijam: AntiJamContext<ANTIJAM_CAP>,
        glock: Glock<'static>,
    }

    #[init]
    fn init(_cx: init::Context) -> (Shared, Local) {
        defmt::info!("fhss-demo: init");

        // `generate_sequence` must use the same seed the paired
        // transmitter uses; a real binary would read this from the bind
        // phase rather than hard-coding it. `cortex_m::singleton!` hands
        // back a `&'static mut` to a value computed at runtime, which is
        // what `Glock`'s borrowed sequence table needs.
        let sequence: &'static [u8; SEQUENCE_LEN] = cortex_m::singleton!(
            : [u8; SEQUENCE_LEN] = fhss_core::sequence::generate_sequence(0xC0FF_EE, 41, 0)
        )
        .unwrap();

        let glock = Glock::new_single_band(
            FrequencyMap::new(fhss_core::freqmap::SPREAD_SCALE_DIRECT_HZ),
            &BAND,
            sequence,
            SEQUENCE_LEN as u16,
        );

        let switch = ModeSwitch::new(SwitchConfig::default());
        let antijam = AntiJamContext::new(AntiJamConfig::default());

        (
            Shared {
                facade_state: FacadeState { switch, antijam, glock },
            },
            Local {},
        )
    }

    /// Fires on every received packet from radio 1 or radio 2; feeds the
    /// detector and hops both radios if it recommends.
    #[task(binds = RADIO, shared = [facade_state])]
    fn on_packet(mut cx: on_packet::Context) {
        cx.shared.facade_state.lock(|state| {
            let mut facade = Facade::new(&state.glock, &mut state.switch, &mut state.antijam);
            let now_ms = read_millis();
            let crc_ok = true; // placeholder: real code reads this from the radio driver
            match facade.register_packet(crc_ok, now_ms) {
                fhss_core::facade::HopOutcome::Hopped { freq1, freq2 } => {
                    defmt::debug!("fhss-demo: hop -> {}, {}", freq1, freq2);
                    // radio1.set_frequency(freq1)?; radio2.set_frequency(freq2)?;
                }
                fhss_core::facade::HopOutcome::NoHop => {}
            }
        });
    }

    /// Fires on every CRSF frame; decodes CH4/CH5 into the packed command
    /// byte and applies it through the façade.
    #[task(binds = UARTE0_UART0, shared = [facade_state])]
    fn on_crsf_frame(mut cx: on_crsf_frame::Context) {
        cx.shared.facade_state.lock(|state| {
            let channels = read_crsf_channels();
            let command = decode_switch_command(&channels);
            let mut facade = Facade::new(&state.glock, &mut state.switch, &mut state.antijam);
            let _ = facade.apply_controller_command(command, read_millis());
        });
    }

    fn read_millis() -> u32 {
        // Platform time source; a real binary wires this to a free-running
        // timer peripheral.
        0
    }

    fn read_crsf_channels() -> CrsfChannels {
        CrsfChannels([992; 16])
    }
}
