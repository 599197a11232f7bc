//! Bus transaction layer.
//!
//! Two logical endpoints share one physical I2C bus: the MPU9250 itself and
//! the AK8963 magnetometer, which only acknowledges its own address while
//! the MPU's bypass bit is set. [`Device`] and [`Ak8963`] carry identical
//! transaction semantics; only the target address differs.

use embedded_hal::blocking::i2c;

use crate::ak8963;
use crate::Register;

/// Releasable describes a type that can be destroyed
/// with a released asset.
pub trait Releasable {
    /// The type to be released
    type Released;

    /// Release the underlying asset
    fn release(self) -> Self::Released;
}

/// Register access to the primary device.
///
/// Every method performs exactly one blocking addressed transaction and
/// reports the transport outcome; no retries, no timeouts. Multi-byte reads
/// rely on the device's register auto-increment.
pub trait Device: Releasable {
    /// The type of error for all results
    type Error;

    /// Read `buffer.len()` consecutive registers starting at `reg`
    fn read_many(&mut self,
                 reg: Register,
                 buffer: &mut [u8])
                 -> Result<(), Self::Error>;

    /// Write the provided value to register
    fn write(&mut self, reg: Register, val: u8) -> Result<(), Self::Error>;

    /// Read a single value from the register
    fn read(&mut self, reg: Register) -> Result<u8, Self::Error> {
        let mut buffer = [0; 1];
        self.read_many(reg, &mut buffer)?;
        Ok(buffer[0])
    }
}

/// Register access to the magnetometer endpoint.
///
/// Valid only after bypass has been enabled on the primary device; before
/// that the transport reports an address-not-acknowledged failure.
pub trait Ak8963 {
    /// The type of error for all results
    type Error;

    /// Read a single magnetometer register
    fn mag_read(&mut self, reg: ak8963::Register) -> Result<u8, Self::Error>;

    /// Read consecutive magnetometer registers starting at `reg`
    fn mag_read_many(&mut self,
                     reg: ak8963::Register,
                     buffer: &mut [u8])
                     -> Result<(), Self::Error>;

    /// Write the provided value to a magnetometer register
    fn mag_write(&mut self,
                 reg: ak8963::Register,
                 val: u8)
                 -> Result<(), Self::Error>;
}

/// AD0 strap input, selecting the primary device's bus address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressStrap {
    /// AD0 tied low, address 0x68.
    Low,
    /// AD0 tied high, address 0x69.
    High,
}

impl AddressStrap {
    fn addr(self) -> u8 {
        match self {
            AddressStrap::Low => 0x68,
            AddressStrap::High => 0x69,
        }
    }
}

/// An I2C device. Both endpoints run over the same peripheral; the
/// magnetometer methods target the fixed sub-address.
pub struct I2cDevice<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<E, I2C> I2cDevice<I2C>
    where I2C: i2c::Write<Error = E> + i2c::WriteRead<Error = E>
{
    /// Create a new I2C device with the address selected by `strap`
    pub fn new(i2c: I2C, strap: AddressStrap) -> Self {
        I2cDevice { i2c,
                    addr: strap.addr(), }
    }
}

impl<E, I2C> Releasable for I2cDevice<I2C>
    where I2C: i2c::Write<Error = E> + i2c::WriteRead<Error = E>
{
    type Released = I2C;

    fn release(self) -> I2C {
        self.i2c
    }
}

impl<E, I2C> Device for I2cDevice<I2C>
    where I2C: i2c::Write<Error = E> + i2c::WriteRead<Error = E>
{
    type Error = E;

    fn read_many(&mut self,
                 reg: Register,
                 buffer: &mut [u8])
                 -> Result<(), Self::Error> {
        self.i2c.write_read(self.addr, &[reg as u8], buffer)?;
        Ok(())
    }

    fn write(&mut self, reg: Register, val: u8) -> Result<(), Self::Error> {
        let buff: [u8; 2] = [reg as u8, val];
        self.i2c.write(self.addr, &buff)?;
        Ok(())
    }
}

impl<E, I2C> Ak8963 for I2cDevice<I2C>
    where I2C: i2c::Write<Error = E> + i2c::WriteRead<Error = E>
{
    type Error = E;

    fn mag_read(&mut self, reg: ak8963::Register) -> Result<u8, Self::Error> {
        let mut buffer = [0; 1];
        self.i2c
            .write_read(ak8963::I2C_ADDRESS, &[reg.addr()], &mut buffer)?;
        Ok(buffer[0])
    }

    fn mag_read_many(&mut self,
                     reg: ak8963::Register,
                     buffer: &mut [u8])
                     -> Result<(), Self::Error> {
        self.i2c.write_read(ak8963::I2C_ADDRESS, &[reg.addr()], buffer)?;
        Ok(())
    }

    fn mag_write(&mut self,
                 reg: ak8963::Register,
                 val: u8)
                 -> Result<(), Self::Error> {
        let buff: [u8; 2] = [reg.addr(), val];
        self.i2c.write(ak8963::I2C_ADDRESS, &buff)?;
        Ok(())
    }
}
