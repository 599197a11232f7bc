//! Measurement and status types.

/// One raw 3-axis sample, signed 16-bit per axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct I16x3 {
    /// X component
    pub x: i16,
    /// Y component
    pub y: i16,
    /// Z component
    pub z: i16,
}

impl I16x3 {
    /// Decodes three big-endian pairs, the MPU9250's output register order.
    pub fn from_be_bytes(buffer: [u8; 6]) -> Self {
        I16x3 { x: i16::from_be_bytes([buffer[0], buffer[1]]),
                y: i16::from_be_bytes([buffer[2], buffer[3]]),
                z: i16::from_be_bytes([buffer[4], buffer[5]]), }
    }

    /// Decodes three little-endian pairs, the AK8963's output register order.
    pub fn from_le_bytes(buffer: [u8; 6]) -> Self {
        I16x3 { x: i16::from_le_bytes([buffer[0], buffer[1]]),
                y: i16::from_le_bytes([buffer[2], buffer[3]]),
                z: i16::from_le_bytes([buffer[4], buffer[5]]), }
    }
}

/// Outcome of a gyroscope read.
///
/// `Disabled` is not a bus failure: the configured operating mode keeps the
/// gyroscope powered down and no transaction was issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GyroReading {
    /// Decoded sample.
    Sample(I16x3),
    /// The gyroscope is off in the current operating mode.
    Disabled,
}

/// Outcome of a magnetometer read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MagReading {
    /// Decoded sample, ready and not overflowed.
    Sample(I16x3),
    /// No conversion has completed since the last read.
    NotReady,
    /// The field exceeded the measurable range; the sample was discarded.
    Overflow,
}

/// Driver error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// Underlying bus transaction failed.
    BusError(E),
    /// WHO_AM_I returned something other than the expected identity.
    InvalidDevice(u8),
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Error::BusError(error)
    }
}

#[cfg(test)]
mod tests {
    use super::I16x3;

    #[test]
    fn big_endian_decode() {
        let raw = [0x12, 0x34, 0xff, 0xfe, 0x80, 0x00];
        assert_eq!(I16x3::from_be_bytes(raw),
                   I16x3 { x: 0x1234,
                           y: -2,
                           z: -32768, });
    }

    #[test]
    fn little_endian_decode() {
        let raw = [0x34, 0x12, 0xfe, 0xff, 0x00, 0x80];
        assert_eq!(I16x3::from_le_bytes(raw),
                   I16x3 { x: 0x1234,
                           y: -2,
                           z: -32768, });
    }

    #[test]
    fn endianness_is_not_interchangeable() {
        let raw = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        assert_ne!(I16x3::from_be_bytes(raw), I16x3::from_le_bytes(raw));
    }
}
