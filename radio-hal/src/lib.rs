//! Hardware adapter layer for `fhss-core`: a generic radio trait over
//! `embedded-hal` and a CRSF RC-channel reader that decodes the
//! controller-command byte the core's mode switch consumes.
//!
//! `fhss-core` itself never touches a register, a SPI bus or a GPIO pin;
//! this crate is where a concrete driver (SX127x/SX128x/LR1121-class chips)
//! plugs in.
#![no_std]

extern crate embedded_hal as hal;

pub mod radio;
pub mod rc;

pub use radio::{Error, Radio};
pub use rc::{decode_switch_command, CrsfChannels};
