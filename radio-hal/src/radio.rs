//! The `Radio` trait: the minimal surface `fhss-core`'s external-interfaces
//! section expects from a driver chip, generalized over any
//! `embedded-hal`-backed transceiver.

use hal::blocking::spi::{Transfer, Write};
use hal::digital::v2::OutputPin;

/// Errors a [`Radio`] implementation may surface, generic over the
/// underlying SPI and GPIO error associated types — the same shape this
/// workspace's driver crates use for their own chip errors.
#[derive(Debug)]
pub enum Error<SpiE, GpioE> {
    /// The SPI transaction itself failed.
    Spi(SpiE),
    /// A chip-select or reset pin operation failed.
    Gpio(GpioE),
    /// The chip reported a state inconsistent with the requested operation
    /// (e.g. asked to set frequency while mid-transmission).
    InvalidState,
}

/// What `fhss-core` needs from a radio chip: program a frequency, and
/// report whether the most recently received packet passed its CRC.
///
/// A concrete driver (SX127x, SX128x, LR1121, or any `embedded-hal`
/// SPI/GPIO-backed transceiver) implements this over its own register
/// access; `fhss-core` never sees the SPI bus.
pub trait Radio<SPI, CS, GpioE>
where
    SPI: Transfer<u8> + Write<u8>,
    CS: OutputPin<Error = GpioE>,
{
    /// Program the chip's carrier frequency, in Hz.
    fn set_frequency(&mut self, hz: u32) -> Result<(), Error<<SPI as Transfer<u8>>::Error, GpioE>>;

    /// Whether the most recently received packet passed CRC. `false` once a
    /// bad packet has been consumed; implementations typically latch this
    /// until the next receive.
    fn last_packet_crc_ok(&mut self) -> Result<bool, Error<<SPI as Transfer<u8>>::Error, GpioE>>;

    /// Apply an externally-estimated frequency correction (e.g. from AFC),
    /// in the same units `fhss_core::FrequencyMap::frequency`'s correction
    /// parameter expects.
    fn set_correction(&mut self, correction: i32) -> Result<(), Error<<SPI as Transfer<u8>>::Error, GpioE>>;
}
