//! Error definition for the crate

#[cfg(feature = "with_defmt")]
use defmt::{write, Format, Formatter};

#[derive(Debug)]
pub enum Error<E> {
    /// I2C bus error
    Bus(E),
    /// More bytes were queued than the transmit buffer holds
    Overflow,
    /// `end_transmission` called without a matching `begin_transmission`
    NoTransmission,
}

#[cfg(feature = "with_defmt")]
impl<E> Format for Error<E> {
    fn format(&self, fmt: Formatter) {
        match self {
            Error::Bus(_) => write!(fmt, "Bus error"),
            Error::Overflow => write!(fmt, "Transmit buffer overflow"),
            Error::NoTransmission => write!(fmt, "No transmission in progress"),
        }
    }
}
