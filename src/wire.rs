//! Two-wire transport definition

use crate::error::Error;
use embedded_hal::i2c::I2c;
use heapless::Vec;

/// Default size of the transmit and receive buffers
pub const BUFFER_LENGTH: usize = 32;

/// Byte oriented view of a two-wire bus.
///
/// Bytes written between `begin_transmission` and `end_transmission` are
/// queued and sent as a single write. `request_from` fills a receive buffer
/// that is then drained one byte at a time with `read`.
///
/// Any `embedded_hal::i2c::I2c` bus can be used through [`HalWire`]. Boards
/// with their own byte-queue driver can implement the trait directly:
///
/// ```ignore
/// impl TwoWire for MyWire {
///     type Error = MyError;
///     fn begin_transmission(&mut self, address: u8) {
///         self.0.begin(address);
///     }
///     fn write(&mut self, byte: u8) -> usize {
///         self.0.push(byte)
///     }
///     fn end_transmission(&mut self) -> Result<(), Self::Error> {
///         self.0.flush()
///     }
///     fn request_from(&mut self, address: u8, count: usize) -> usize {
///         self.0.fetch(address, count)
///     }
///     fn available(&self) -> usize {
///         self.0.pending()
///     }
///     fn read(&mut self) -> Option<u8> {
///         self.0.pop()
///     }
/// }
/// ```
pub trait TwoWire {
    type Error;
    fn begin_transmission(&mut self, address: u8);
    /// Queue one byte, returns the number of bytes accepted
    fn write(&mut self, byte: u8) -> usize;
    fn end_transmission(&mut self) -> Result<(), Self::Error>;
    /// Returns the number of bytes that arrived
    fn request_from(&mut self, address: u8, count: usize) -> usize;
    fn available(&self) -> usize;
    fn read(&mut self) -> Option<u8>;
}

/// [`TwoWire`] on top of an `embedded-hal` I2C bus
#[derive(Debug)]
pub struct HalWire<I2C, const N: usize = BUFFER_LENGTH> {
    /// The I2C interface
    i2c: I2C,
    /// Target of the pending transmission
    address: Option<u8>,
    /// Set when a byte did not fit in `tx`
    overflow: bool,
    tx: Vec<u8, N>,
    rx: Vec<u8, N>,
    /// Next unread byte in `rx`
    rx_pos: usize,
}

impl<I2C, const N: usize> HalWire<I2C, N>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: None,
            overflow: false,
            tx: Vec::new(),
            rx: Vec::new(),
            rx_pos: 0,
        }
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, const N: usize> TwoWire for HalWire<I2C, N>
where
    I2C: I2c,
{
    type Error = Error<I2C::Error>;

    fn begin_transmission(&mut self, address: u8) {
        self.address = Some(address);
        self.overflow = false;
        self.tx.clear();
    }

    fn write(&mut self, byte: u8) -> usize {
        match self.tx.push(byte) {
            Ok(()) => 1,
            Err(_) => {
                self.overflow = true;
                0
            }
        }
    }

    fn end_transmission(&mut self) -> Result<(), Self::Error> {
        let address = self.address.take().ok_or(Error::NoTransmission)?;
        let overflow = core::mem::replace(&mut self.overflow, false);
        let res = if overflow {
            Err(Error::Overflow)
        } else {
            self.i2c.write(address, &self.tx).map_err(Error::Bus)
        };
        self.tx.clear();
        res
    }

    fn request_from(&mut self, address: u8, count: usize) -> usize {
        let count = count.min(N);
        self.rx.clear();
        self.rx_pos = 0;
        if self.rx.resize(count, 0).is_err() {
            return 0;
        }
        match self.i2c.read(address, &mut self.rx) {
            Ok(()) => count,
            Err(_) => {
                #[cfg(feature = "with_defmt")]
                defmt::warn!("read of {} bytes from {=u8:#x} failed", count, address);
                self.rx.clear();
                0
            }
        }
    }

    fn available(&self) -> usize {
        self.rx.len() - self.rx_pos
    }

    fn read(&mut self) -> Option<u8> {
        let byte = self.rx.get(self.rx_pos).copied()?;
        self.rx_pos += 1;
        Some(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    /// Bus that answers reads with 0xA0, 0xA1, ... and counts writes
    struct CountingBus {
        writes: usize,
        fail: bool,
    }

    impl ErrorType for CountingBus {
        type Error = ErrorKind;
    }

    impl I2c for CountingBus {
        fn transaction(
            &mut self,
            _address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Write(_) => self.writes += 1,
                    Operation::Read(buf) => {
                        for (i, b) in buf.iter_mut().enumerate() {
                            *b = 0xA0 + i as u8;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    fn wire<const N: usize>(fail: bool) -> HalWire<CountingBus, N> {
        HalWire::new(CountingBus { writes: 0, fail })
    }

    #[test]
    fn end_without_begin() {
        let mut w = wire::<4>(false);
        assert!(matches!(w.end_transmission(), Err(Error::NoTransmission)));
        assert_eq!(w.release().writes, 0);
    }

    #[test]
    fn overflow_is_reported_and_nothing_sent() {
        let mut w = wire::<2>(false);
        w.begin_transmission(0x38);
        assert_eq!(w.write(1), 1);
        assert_eq!(w.write(2), 1);
        assert_eq!(w.write(3), 0);
        assert!(matches!(w.end_transmission(), Err(Error::Overflow)));

        // next transmission starts clean
        w.begin_transmission(0x38);
        w.write(4);
        assert!(w.end_transmission().is_ok());
        assert_eq!(w.release().writes, 1);
    }

    #[test]
    fn request_is_clamped_to_buffer() {
        let mut w = wire::<3>(false);
        assert_eq!(w.request_from(0x38, 10), 3);
        assert_eq!(w.available(), 3);
        assert_eq!(w.read(), Some(0xA0));
        assert_eq!(w.read(), Some(0xA1));
        assert_eq!(w.read(), Some(0xA2));
        assert_eq!(w.available(), 0);
        assert_eq!(w.read(), None);
    }

    #[test]
    fn new_request_drops_unread_bytes() {
        let mut w = wire::<4>(false);
        w.request_from(0x38, 4);
        w.read();
        assert_eq!(w.request_from(0x38, 1), 1);
        assert_eq!(w.available(), 1);
        assert_eq!(w.read(), Some(0xA0));
    }

    #[test]
    fn failed_read_leaves_nothing_available() {
        let mut w = wire::<4>(true);
        assert_eq!(w.request_from(0x38, 1), 0);
        assert_eq!(w.available(), 0);
        assert_eq!(w.read(), None);
    }

    #[test]
    fn failed_write_is_a_bus_error() {
        let mut w = wire::<4>(true);
        w.begin_transmission(0x38);
        w.write(0x03);
        assert!(matches!(
            w.end_transmission(),
            Err(Error::Bus(ErrorKind::NoAcknowledge(_)))
        ));
    }
}
