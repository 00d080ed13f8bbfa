#![deny(
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    unused_variables,
    unreachable_code,
    unused_comparisons,
    unused_imports,
    unused_must_use
)]
#![no_std]

//! A platform agnostic Rust reader for the button status of the FT6x36 touch
//! controller found on ILI9488 panels, based on the
//! [`embedded-hal`](https://github.com/rust-embedded/embedded-hal) traits.
//!

pub use crate::{
    error::Error,
    wire::{HalWire, TwoWire},
};

pub mod error;
pub mod wire;

/// Bus address of the touch controller
pub const TOUCH_I2C_ADDR: u8 = 0x38;
/// Touch point 1 X high register, the top two bits hold the event flag
pub const TOUCH_REG_XH: u8 = 0x03;

/// Read a single register of the touch controller.
///
/// Returns 0 when the controller sent nothing back, which can not be told
/// apart from a register that holds 0.
pub fn read_touch_reg<W: TwoWire>(wire: &mut W, reg: u8) -> u8 {
    wire.begin_transmission(TOUCH_I2C_ADDR);
    wire.write(reg);
    // The read is issued even if the register pointer write failed
    let _ = wire.end_transmission();
    wire.request_from(TOUCH_I2C_ADDR, 1);
    if wire.available() > 0 {
        wire.read().unwrap_or(0)
    } else {
        0
    }
}

/// Button state from the event flag of [`TOUCH_REG_XH`].
///
/// Returns 0 when the flag reads `0b01`, 1 for any other value (including a
/// failed read).
pub fn get_button<W: TwoWire>(wire: &mut W) -> u8 {
    let status = read_touch_reg(wire, TOUCH_REG_XH);
    if status >> 6 == 1 {
        0
    } else {
        1
    }
}
