//! AK8963, the magnetometer behind the MPU9250's bypass bus.

/// I2C slave address of the magnetometer. Fixed, not strap-selectable,
/// and only acknowledged while BYPASS_EN is set on the MPU9250.
pub const I2C_ADDRESS: u8 = 0x0c;

/// Expected WIA (who-am-i) value.
pub const DEVICE_ID: u8 = 0x48;

/// ST1: a conversion has finished and the data registers hold a fresh sample.
pub const ST1_DRDY: u8 = 0x01;

/// ST2: magnetic sensor overflow, the sample is invalid.
pub const ST2_HOFL: u8 = 0x08;

/// AK8963 register map.
#[allow(dead_code)]
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug)]
pub enum Register {
    /// Device identification, reads [`DEVICE_ID`].
    WIA = 0x00,
    /// Device information.
    INFO = 0x01,
    /// Status 1, data ready flag.
    ST1 = 0x02,
    /// Measurement data, X axis low byte; X/Y/Z follow little-endian.
    HXL = 0x03,
    /// Status 2, overflow flag. Reading it also unlatches the sample.
    ST2 = 0x09,
    /// Control 1, bit resolution and sampling mode.
    CNTL1 = 0x0a,
    /// Control 2, soft reset.
    CNTL2 = 0x0b,
    /// Self test control.
    ASTC = 0x0c,
    /// I2C disable.
    I2CDIS = 0x0f,
}

impl Register {
    pub(crate) fn addr(self) -> u8 {
        self as u8
    }
}
