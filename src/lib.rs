//! A no_std I2C driver for the MPU9250 (accelerometer + gyroscope +
//! magnetometer IMU) and its onboard AK8963 magnetometer.
//!
//! The magnetometer sits behind a secondary bus address that is only
//! reachable while the MPU's bypass bit is set; [`Mpu9250::init`]
//! establishes bypass for the lifetime of the driver. After
//! initialization the device is placed in one of four [`OperatingMode`]
//! classes trading sampling rate against power draw, and the readers gate
//! themselves on the mode actually configured: a read from a powered-down
//! subsystem reports a dedicated status instead of stale register bytes.
//!
//! ## Usage
//!
//! ```
//! use mpu9250_i2c::{AddressStrap, Mpu9250};
//! # use embedded_hal_mock::i2c::{Mock as I2cMock, Transaction};
//! # let i2c = I2cMock::new(&[Transaction::write_read(0x68,
//! #                                                  vec![0x75],
//! #                                                  vec![0x71])]);
//! let mut mpu = Mpu9250::i2c(i2c, AddressStrap::Low);
//! assert!(mpu.check_identity());
//! ```

#![deny(missing_docs)]
#![no_std]

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c;

pub mod ak8963;
mod conf;
mod device;
mod types;

pub use crate::conf::{AccelScale, Dlpf, GyroScale, InterruptConfig,
                      LpAccelOdr, MagSampling, MagScale, OperatingMode,
                      PwrMgmt1, PwrMgmt2};
pub use crate::device::{AddressStrap, Ak8963, Device, I2cDevice, Releasable};
pub use crate::types::{Error, GyroReading, I16x3, MagReading};

/// Expected WHO_AM_I value.
pub const DEVICE_ID: u8 = 0x71;

/// MPU9250 driver.
///
/// `DEV` provides the two bus endpoints ([`Device`] + [`Ak8963`]); `PIN` is
/// an optional data-ready notifier the driver stores for the caller but
/// never drives or polls itself. The driver owns the effective
/// configuration; callers sharing one instance across execution contexts
/// must serialize access externally.
pub struct Mpu9250<DEV, PIN> {
    dev: DEV,
    irq: Option<PIN>,
    mode: OperatingMode,
    mag_scale: MagScale,
    accel_bias: I16x3,
}

impl<E, I2C> Mpu9250<I2cDevice<I2C>, ()>
    where I2C: i2c::Write<Error = E> + i2c::WriteRead<Error = E>
{
    /// Creates a driver directly from an I2C peripheral and the AD0 strap
    /// selection.
    pub fn i2c(i2c: I2C, strap: AddressStrap) -> Self {
        Mpu9250::new(I2cDevice::new(i2c, strap))
    }
}

impl<E, DEV> Mpu9250<DEV, ()>
    where DEV: Device<Error = E> + Ak8963<Error = E>
{
    /// Creates a driver from a device, without a data-ready pin.
    pub fn new(dev: DEV) -> Self {
        Self::with_parts(dev, None)
    }
}

impl<E, DEV, PIN> Mpu9250<DEV, PIN>
    where DEV: Device<Error = E> + Ak8963<Error = E>
{
    /// Creates a driver from a device and a data-ready pin. The pin is
    /// held for the caller; this driver never registers callbacks on it.
    pub fn with_irq_pin(dev: DEV, irq: PIN) -> Self {
        Self::with_parts(dev, Some(irq))
    }

    fn with_parts(dev: DEV, irq: Option<PIN>) -> Self {
        // Until set_parameters succeeds, gate reads by the most
        // conservative profile.
        Mpu9250 { dev,
                  irq,
                  mode: OperatingMode::VeryLowPowerAccelOnly,
                  mag_scale: MagScale::default(),
                  accel_bias: I16x3::default(), }
    }

    /// Brings the device out of reset: soft reset, auto-PLL clock with the
    /// sleep bit cleared, internal I2C master disabled, bypass enabled so
    /// the magnetometer becomes addressable, then identity validation.
    ///
    /// Fails with [`Error::InvalidDevice`] when WHO_AM_I mismatches; the
    /// caller should not proceed to [`Mpu9250::set_parameters`] on failure.
    pub fn init<D: DelayMs<u8>>(&mut self,
                                delay: &mut D)
                                -> Result<(), Error<E>> {
        self.dev.write(Register::PWR_MGMT_1, PwrMgmt1::H_RESET.bits())?;
        delay.delay_ms(100);

        self.dev.write(Register::PWR_MGMT_1, conf::CLKSEL_AUTO)?;
        delay.delay_ms(10);

        // The internal I2C master must be off for bypass to take effect.
        self.dev.write(Register::USER_CTRL, 0x00)?;
        self.dev.write(Register::INT_PIN_CFG,
                       (InterruptConfig::LATCH_INT_EN
                        | InterruptConfig::INT_ANYRD_CLEAR
                        | InterruptConfig::ACL
                        | InterruptConfig::BYPASS_EN)
                                                     .bits())?;
        delay.delay_ms(10);

        let id = self.dev.read(Register::WHO_AM_I)?;
        if id != DEVICE_ID {
            return Err(Error::InvalidDevice(id));
        }
        Ok(())
    }

    /// Reads WHO_AM_I and compares it to the one known-good value.
    /// An unreadable register counts as a mismatch.
    pub fn check_identity(&mut self) -> bool {
        match self.dev.read(Register::WHO_AM_I) {
            Ok(id) => id == DEVICE_ID,
            Err(_) => false,
        }
    }

    /// Reads the raw WHO_AM_I register; should return [`DEVICE_ID`].
    pub fn who_am_i(&mut self) -> Result<u8, Error<E>> {
        Ok(self.dev.read(Register::WHO_AM_I)?)
    }

    /// Reads the magnetometer WIA register; should return
    /// [`ak8963::DEVICE_ID`].
    pub fn mag_who_am_i(&mut self) -> Result<u8, Error<E>> {
        Ok(self.dev.mag_read(ak8963::Register::WIA)?)
    }

    /// Applies the full register recipe for `mode` plus the three scale
    /// selections, across both bus endpoints.
    ///
    /// The held mode and magnetometer resolution are committed only after
    /// every write succeeded; a transport failure partway through leaves
    /// the previously effective configuration in force and the readers
    /// keep gating by it.
    pub fn set_parameters(&mut self,
                          mode: OperatingMode,
                          accel_scale: AccelScale,
                          mag_scale: MagScale,
                          gyro_scale: GyroScale)
                          -> Result<(), Error<E>> {
        let profile = mode.profile();

        self.dev.write(Register::PWR_MGMT_1, profile.pwr_mgmt_1)?;
        let pwr2 = if profile.gyro_enabled {
            0x00
        } else {
            PwrMgmt2::DISABLE_GYRO.bits()
        };
        self.dev.write(Register::PWR_MGMT_2, pwr2)?;

        self.dev.write(Register::SMPLRT_DIV, profile.smplrt_div)?;
        self.dev.write(Register::CONFIG, profile.gyro_dlpf as u8)?;
        self.dev.write(Register::GYRO_CONFIG, gyro_scale.config_bits())?;
        self.dev.write(Register::ACCEL_CONFIG, accel_scale.config_bits())?;
        self.dev
            .write(Register::ACCEL_CONFIG_2, profile.accel_dlpf as u8)?;
        if let Some(odr) = profile.lp_accel_odr {
            self.dev.write(Register::LP_ACCEL_ODR, odr as u8)?;
        }

        self.dev.mag_write(ak8963::Register::CNTL1,
                           mag_scale.cntl1_bits()
                           | profile.mag_sampling as u8)?;

        self.mode = mode;
        self.mag_scale = mag_scale;
        Ok(())
    }

    /// Accelerometer measurement, big-endian decode. The accelerometer is
    /// active in every supported mode.
    pub fn accel(&mut self) -> Result<I16x3, Error<E>> {
        let mut buffer = [0; 6];
        self.dev.read_many(Register::ACCEL_XOUT_H, &mut buffer)?;
        Ok(I16x3::from_be_bytes(buffer))
    }

    /// Gyroscope measurement, big-endian decode.
    ///
    /// When the configured mode keeps the gyroscope powered down this
    /// returns [`GyroReading::Disabled`] without touching the bus, rather
    /// than handing back garbage from a dead subsystem.
    pub fn gyro(&mut self) -> Result<GyroReading, Error<E>> {
        if !self.mode.profile().gyro_enabled {
            return Ok(GyroReading::Disabled);
        }
        let mut buffer = [0; 6];
        self.dev.read_many(Register::GYRO_XOUT_H, &mut buffer)?;
        Ok(GyroReading::Sample(I16x3::from_be_bytes(buffer)))
    }

    /// Magnetometer measurement, little-endian decode.
    ///
    /// Returns [`MagReading::NotReady`] when no conversion has completed,
    /// without reading the data registers. A ready sample is discarded as
    /// [`MagReading::Overflow`] when ST2 flags sensor overflow. In
    /// single-shot modes a successful read re-arms the next conversion so
    /// a fresh sample is in flight for the following call.
    pub fn mag(&mut self) -> Result<MagReading, Error<E>> {
        let st1 = self.dev.mag_read(ak8963::Register::ST1)?;
        if st1 & ak8963::ST1_DRDY == 0 {
            return Ok(MagReading::NotReady);
        }

        let mut buffer = [0; 6];
        self.dev.mag_read_many(ak8963::Register::HXL, &mut buffer)?;

        // ST2 must be read to unlatch the sample; it also carries the
        // overflow flag invalidating it.
        let st2 = self.dev.mag_read(ak8963::Register::ST2)?;
        if st2 & ak8963::ST2_HOFL != 0 {
            return Ok(MagReading::Overflow);
        }

        let profile = self.mode.profile();
        if profile.mag_sampling.is_single_shot() {
            self.dev.mag_write(ak8963::Register::CNTL1,
                               self.mag_scale.cntl1_bits()
                               | MagSampling::Single as u8)?;
        }

        Ok(MagReading::Sample(I16x3::from_le_bytes(buffer)))
    }

    /// Die temperature, raw big-endian value. Meaningless in
    /// [`OperatingMode::VeryLowPowerAccelOnly`], which powers the
    /// temperature sensor down.
    pub fn temp(&mut self) -> Result<i16, Error<E>> {
        let mut buffer = [0; 2];
        self.dev.read_many(Register::TEMP_OUT_H, &mut buffer)?;
        Ok(i16::from_be_bytes(buffer))
    }

    /// The most recently committed operating mode.
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Stored accelerometer bias. Inert: the driver never computes or
    /// applies it, it is kept for host-side calibration.
    pub fn accel_bias(&self) -> I16x3 {
        self.accel_bias
    }

    /// Stores an accelerometer bias computed by the host.
    pub fn set_accel_bias(&mut self, bias: I16x3) {
        self.accel_bias = bias;
    }

    /// The data-ready pin handed over at construction, if any.
    pub fn irq_pin(&mut self) -> Option<&mut PIN> {
        self.irq.as_mut()
    }

    /// Destroys the driver, recovering the bus peripheral and the
    /// data-ready pin.
    pub fn release(self) -> (<DEV as Releasable>::Released, Option<PIN>) {
        (self.dev.release(), self.irq)
    }
}

/// MPU9250 register map, the subset this driver touches.
#[allow(dead_code)]
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug)]
pub enum Register {
    /// Sample rate divider over the 1 kHz internal rate.
    SMPLRT_DIV = 0x19,
    /// Gyro and temperature digital low pass filter.
    CONFIG = 0x1a,
    /// Gyroscope full scale selection.
    GYRO_CONFIG = 0x1b,
    /// Accelerometer full scale selection.
    ACCEL_CONFIG = 0x1c,
    /// Accelerometer digital low pass filter.
    ACCEL_CONFIG_2 = 0x1d,
    /// Accelerometer output rate in low-power cycle mode.
    LP_ACCEL_ODR = 0x1e,
    /// Interrupt pin behavior and bypass enable.
    INT_PIN_CFG = 0x37,
    /// Interrupt source enables.
    INT_ENABLE = 0x38,
    /// Interrupt status.
    INT_STATUS = 0x3a,
    /// Accelerometer output, X high byte; X/Y/Z follow big-endian.
    ACCEL_XOUT_H = 0x3b,
    /// Temperature output, high byte.
    TEMP_OUT_H = 0x41,
    /// Gyroscope output, X high byte; X/Y/Z follow big-endian.
    GYRO_XOUT_H = 0x43,
    /// User control: DMP, FIFO and internal I2C master enables.
    USER_CTRL = 0x6a,
    /// Power management 1: reset, sleep, cycle, clock selection.
    PWR_MGMT_1 = 0x6b,
    /// Power management 2: per-axis enables.
    PWR_MGMT_2 = 0x6c,
    /// Device identification, reads [`DEVICE_ID`].
    WHO_AM_I = 0x75,
}
