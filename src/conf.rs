//! Configuration tables for the MPU9250.
//!
//! The chip exposes dozens of independent rate/power bits; the driver only
//! supports a small set of [`OperatingMode`] classes, each of which maps to
//! one [`ModeProfile`] row. The configurator writes a profile, the readers
//! consult the same profile to gate powered-down subsystems.

use bitflags::bitflags;

/// CLKSEL value selecting the auto PLL reference, falling back to the
/// internal oscillator when the reference is unavailable.
pub(crate) const CLKSEL_AUTO: u8 = 0x01;

/// Operating mode classes, trading sampling rate against power draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperatingMode {
    /// Accelerometer only, low-power cycle sampling at 7.81 Hz.
    /// Gyroscope, magnetometer and temperature sensor are powered down.
    VeryLowPowerAccelOnly,
    /// Accelerometer at 15.63 Hz plus single-shot magnetometer.
    /// Gyroscope stays powered down.
    LowPowerAccelMag,
    /// All sensors on: accelerometer and gyroscope at 50 Hz,
    /// magnetometer continuous at 8 Hz.
    HighPowerAll,
    /// All sensors on at speed: accelerometer and gyroscope at 250 Hz,
    /// magnetometer continuous at 100 Hz.
    PerformanceAll,
}

impl OperatingMode {
    /// The register recipe realizing this mode.
    pub(crate) fn profile(self) -> ModeProfile {
        match self {
            OperatingMode::VeryLowPowerAccelOnly => ModeProfile {
                pwr_mgmt_1: (PwrMgmt1::CYCLE | PwrMgmt1::TEMP_DIS).bits()
                            | CLKSEL_AUTO,
                smplrt_div: 0,
                gyro_dlpf: Dlpf::_6,
                accel_dlpf: Dlpf::_5,
                lp_accel_odr: Some(LpAccelOdr::_7_81HZ),
                gyro_enabled: false,
                mag_sampling: MagSampling::PowerDown,
            },
            OperatingMode::LowPowerAccelMag => ModeProfile {
                pwr_mgmt_1: PwrMgmt1::CYCLE.bits() | CLKSEL_AUTO,
                smplrt_div: 0,
                gyro_dlpf: Dlpf::_6,
                accel_dlpf: Dlpf::_5,
                lp_accel_odr: Some(LpAccelOdr::_15_63HZ),
                gyro_enabled: false,
                mag_sampling: MagSampling::Single,
            },
            OperatingMode::HighPowerAll => ModeProfile {
                pwr_mgmt_1: CLKSEL_AUTO,
                // 1 kHz / (1 + 19) = 50 Hz
                smplrt_div: 19,
                gyro_dlpf: Dlpf::_4,
                accel_dlpf: Dlpf::_4,
                lp_accel_odr: None,
                gyro_enabled: true,
                mag_sampling: MagSampling::Continuous8Hz,
            },
            OperatingMode::PerformanceAll => ModeProfile {
                pwr_mgmt_1: CLKSEL_AUTO,
                // 1 kHz / (1 + 3) = 250 Hz
                smplrt_div: 3,
                gyro_dlpf: Dlpf::_2,
                accel_dlpf: Dlpf::_2,
                lp_accel_odr: None,
                gyro_enabled: true,
                mag_sampling: MagSampling::Continuous100Hz,
            },
        }
    }
}

/// One row of the per-mode register recipe.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ModeProfile {
    /// PWR_MGMT_1 byte: cycle/temperature bits plus clock selection.
    pub pwr_mgmt_1: u8,
    /// Internal sample rate divider.
    pub smplrt_div: u8,
    /// CONFIG low pass filter setting for gyro and temperature.
    pub gyro_dlpf: Dlpf,
    /// ACCEL_CONFIG_2 low pass filter setting.
    pub accel_dlpf: Dlpf,
    /// Low-power accelerometer output rate; `None` outside cycle mode.
    pub lp_accel_odr: Option<LpAccelOdr>,
    /// Whether the gyroscope is powered in this mode.
    pub gyro_enabled: bool,
    /// Magnetometer sampling submode.
    pub mag_sampling: MagSampling,
}

/// AK8963 sampling submode, the low nibble of CNTL1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MagSampling {
    /// Powered down.
    PowerDown = 0x00,
    /// One conversion, then automatic power-down until re-triggered.
    Single = 0x01,
    /// Free-running at 8 Hz.
    Continuous8Hz = 0x02,
    /// Free-running at 100 Hz.
    Continuous100Hz = 0x06,
}

impl MagSampling {
    /// Single-shot modes need a re-trigger after every completed read.
    pub(crate) fn is_single_shot(self) -> bool {
        self == MagSampling::Single
    }
}

/// Digital low pass filter setting, shared numbering between the gyro
/// CONFIG register and ACCEL_CONFIG_2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dlpf {
    /// Gyro bandwidth 250 Hz; accel 218.1 Hz.
    _0 = 0,
    /// Gyro bandwidth 184 Hz; accel 218.1 Hz.
    _1 = 1,
    /// Gyro bandwidth 92 Hz; accel 99 Hz.
    _2 = 2,
    /// Gyro bandwidth 41 Hz; accel 44.8 Hz.
    _3 = 3,
    /// Gyro bandwidth 20 Hz; accel 21.2 Hz.
    _4 = 4,
    /// Gyro bandwidth 10 Hz; accel 10.2 Hz.
    _5 = 5,
    /// Gyro bandwidth 5 Hz; accel 5.05 Hz.
    _6 = 6,
    /// Gyro bandwidth 3600 Hz; accel 420 Hz.
    _7 = 7,
}

/// Accelerometer output data rate while in low-power cycle mode
/// (LP_ACCEL_ODR register).
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LpAccelOdr {
    /// 0.24 Hz
    _0_24HZ = 0x00,
    /// 0.49 Hz
    _0_49HZ = 0x01,
    /// 0.98 Hz
    _0_98HZ = 0x02,
    /// 1.95 Hz
    _1_95HZ = 0x03,
    /// 3.91 Hz
    _3_91HZ = 0x04,
    /// 7.81 Hz
    _7_81HZ = 0x05,
    /// 15.63 Hz
    _15_63HZ = 0x06,
    /// 31.25 Hz
    _31_25HZ = 0x07,
    /// 62.50 Hz
    _62_50HZ = 0x08,
    /// 125 Hz
    _125HZ = 0x09,
    /// 250 Hz
    _250HZ = 0x0a,
    /// 500 Hz
    _500HZ = 0x0b,
}

/// Gyroscope full scale range; default +250 dps.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GyroScale {
    /// +250 dps
    _250DPS = 0,
    /// +500 dps
    _500DPS = 1,
    /// +1000 dps
    _1000DPS = 2,
    /// +2000 dps
    _2000DPS = 3,
}

impl GyroScale {
    /// GYRO_CONFIG full scale field.
    pub(crate) fn config_bits(self) -> u8 {
        (self as u8) << 3
    }

    /// Degrees per second per LSB.
    pub fn resolution(self) -> f32 {
        match self {
            GyroScale::_250DPS => 250.0 / 32768.0,
            GyroScale::_500DPS => 500.0 / 32768.0,
            GyroScale::_1000DPS => 1000.0 / 32768.0,
            GyroScale::_2000DPS => 2000.0 / 32768.0,
        }
    }
}

impl Default for GyroScale {
    fn default() -> Self {
        GyroScale::_250DPS
    }
}

/// Accelerometer full scale range; default +2 g.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccelScale {
    /// +2g
    _2G = 0,
    /// +4g
    _4G = 1,
    /// +8g
    _8G = 2,
    /// +16g
    _16G = 3,
}

impl AccelScale {
    /// ACCEL_CONFIG full scale field.
    pub(crate) fn config_bits(self) -> u8 {
        (self as u8) << 3
    }

    /// G per LSB.
    pub fn resolution(self) -> f32 {
        match self {
            AccelScale::_2G => 2.0 / 32768.0,
            AccelScale::_4G => 4.0 / 32768.0,
            AccelScale::_8G => 8.0 / 32768.0,
            AccelScale::_16G => 16.0 / 32768.0,
        }
    }
}

impl Default for AccelScale {
    fn default() -> Self {
        AccelScale::_2G
    }
}

/// Magnetometer bit resolution; default 14 bits.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MagScale {
    /// 14 bits, 0.6 mG per LSB.
    _14BITS = 0,
    /// 16 bits, 0.15 mG per LSB.
    _16BITS = 1,
}

impl MagScale {
    /// CNTL1 output bit setting (BIT, bit 4).
    pub(crate) fn cntl1_bits(self) -> u8 {
        (self as u8) << 4
    }

    /// Milligauss per LSB.
    pub fn resolution(self) -> f32 {
        match self {
            MagScale::_14BITS => 10. * 4912. / 8190.,
            MagScale::_16BITS => 10. * 4912. / 32760.,
        }
    }
}

impl Default for MagScale {
    fn default() -> Self {
        MagScale::_14BITS
    }
}

bitflags! {
    /// PWR_MGMT_1 control bits. The low three bits are the CLKSEL field
    /// and are combined separately.
    pub struct PwrMgmt1: u8 {
        /// Reset all registers to power-on defaults.
        const H_RESET = 0b1000_0000;
        /// Put the device to sleep.
        const SLEEP = 0b0100_0000;
        /// Cycle between sleep and single accelerometer samples at the
        /// LP_ACCEL_ODR rate.
        const CYCLE = 0b0010_0000;
        /// Keep the gyro drive circuitry on while the sense paths sleep.
        const GYRO_STANDBY = 0b0001_0000;
        /// Disable the temperature sensor.
        const TEMP_DIS = 0b0000_1000;
    }
}

bitflags! {
    /// PWR_MGMT_2 axis disable bits.
    pub struct PwrMgmt2: u8 {
        /// Disable all three accelerometer axes.
        const DISABLE_ACCEL = 0b0011_1000;
        /// Disable all three gyroscope axes.
        const DISABLE_GYRO = 0b0000_0111;
    }
}

bitflags! {
    /// INT_PIN_CFG, interrupt pin behavior and bypass control.
    #[allow(non_camel_case_types)]
    pub struct InterruptConfig: u8 {
        /// INT pin is active low (active high if not set).
        const ACL = 0b1000_0000;
        /// INT pin is open drain (push-pull if not set).
        const OPEN = 0b0100_0000;
        /// INT pin level held until the interrupt status is cleared.
        const LATCH_INT_EN = 0b0010_0000;
        /// Any read clears the interrupt status (only reading INT_STATUS
        /// clears it if not set).
        const INT_ANYRD_CLEAR = 0b0001_0000;
        /// FSYNC pin as an interrupt is active low.
        const ACTL_FSYNC = 0b0000_1000;
        /// Enable the FSYNC pin as an interrupt source.
        const FSYNC_INT_MODE_EN = 0b0000_0100;
        /// Route the auxiliary bus pins (ES_CL, ES_DA) straight to the host
        /// bus while the internal I2C master is disabled, making the
        /// magnetometer directly addressable.
        const BYPASS_EN = 0b0000_0010;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gyro_powered_only_in_high_power_modes() {
        assert!(!OperatingMode::VeryLowPowerAccelOnly.profile().gyro_enabled);
        assert!(!OperatingMode::LowPowerAccelMag.profile().gyro_enabled);
        assert!(OperatingMode::HighPowerAll.profile().gyro_enabled);
        assert!(OperatingMode::PerformanceAll.profile().gyro_enabled);
    }

    #[test]
    fn single_shot_mag_only_in_low_power_accel_mag() {
        assert!(OperatingMode::LowPowerAccelMag.profile()
                                               .mag_sampling
                                               .is_single_shot());
        for mode in [OperatingMode::VeryLowPowerAccelOnly,
                     OperatingMode::HighPowerAll,
                     OperatingMode::PerformanceAll]
            .iter()
        {
            assert!(!mode.profile().mag_sampling.is_single_shot());
        }
    }

    #[test]
    fn sample_rate_divider_hits_rate_targets() {
        // 1 kHz internal rate divided down to 50 Hz and 250 Hz.
        assert_eq!(OperatingMode::HighPowerAll.profile().smplrt_div, 19);
        assert_eq!(OperatingMode::PerformanceAll.profile().smplrt_div, 3);
    }

    #[test]
    fn low_power_modes_cycle_with_lp_odr() {
        let vlp = OperatingMode::VeryLowPowerAccelOnly.profile();
        assert_eq!(vlp.pwr_mgmt_1 & PwrMgmt1::CYCLE.bits(),
                   PwrMgmt1::CYCLE.bits());
        assert_eq!(vlp.pwr_mgmt_1 & PwrMgmt1::TEMP_DIS.bits(),
                   PwrMgmt1::TEMP_DIS.bits());
        assert_eq!(vlp.lp_accel_odr, Some(LpAccelOdr::_7_81HZ));

        let lp = OperatingMode::LowPowerAccelMag.profile();
        assert_eq!(lp.lp_accel_odr, Some(LpAccelOdr::_15_63HZ));
        assert_eq!(OperatingMode::HighPowerAll.profile().lp_accel_odr, None);
    }

    #[test]
    fn scale_register_fields() {
        assert_eq!(AccelScale::_2G.config_bits(), 0x00);
        assert_eq!(AccelScale::_16G.config_bits(), 0x18);
        assert_eq!(GyroScale::_250DPS.config_bits(), 0x00);
        assert_eq!(GyroScale::_2000DPS.config_bits(), 0x18);
        assert_eq!(MagScale::_14BITS.cntl1_bits(), 0x00);
        assert_eq!(MagScale::_16BITS.cntl1_bits(), 0x10);
    }

    #[test]
    fn mag_sampling_cntl1_nibbles() {
        assert_eq!(MagSampling::PowerDown as u8, 0x00);
        assert_eq!(MagSampling::Single as u8, 0x01);
        assert_eq!(MagSampling::Continuous8Hz as u8, 0x02);
        assert_eq!(MagSampling::Continuous100Hz as u8, 0x06);
    }
}
