use crate::error::InvalidGain;

/// ADS1256 Commands
pub const CMD_WAKEUP: u8 = 0x00;
pub const CMD_RDATA: u8 = 0x01;
pub const CMD_RDATAC: u8 = 0x03;
pub const CMD_SDATAC: u8 = 0x0F;
pub const CMD_RREG: u8 = 0x10;
pub const CMD_WREG: u8 = 0x50;
pub const CMD_SELFCAL: u8 = 0xF0;
pub const CMD_SELFOCAL: u8 = 0xF1;
pub const CMD_SELFGCAL: u8 = 0xF2;
pub const CMD_SYSOCAL: u8 = 0xF3;
pub const CMD_SYSGCAL: u8 = 0xF4;
pub const CMD_SYNC: u8 = 0xFC;
pub const CMD_STANDBY: u8 = 0xFD;
pub const CMD_RESET: u8 = 0xFE;

/// ADS1256 Registers
pub const REG_STATUS: u8 = 0x00;
pub const REG_MUX: u8 = 0x01;
pub const REG_ADCON: u8 = 0x02;
pub const REG_DRATE: u8 = 0x03;
pub const REG_IO: u8 = 0x04;
pub const REG_OFC0: u8 = 0x05;
pub const REG_OFC1: u8 = 0x06;
pub const REG_OFC2: u8 = 0x07;
pub const REG_FSC0: u8 = 0x08;
pub const REG_FSC1: u8 = 0x09;
pub const REG_FSC2: u8 = 0x0A;

pub(crate) const REGISTER_COUNT: usize = 11;

/// STATUS.BUFEN. ORDER (bit 3) and ACAL (bit 2) are left cleared.
pub(crate) const STATUS_BUFEN: u8 = 1 << 1;

/// MUX selector code for AINCOM.
pub(crate) const MUX_AINCOM: u8 = 0x08;

/// Chip identity held in the upper nibble of STATUS.
pub const ADS1256_ID: u8 = 0x03;

/// Worst-case number of DRDY polls before giving up.
pub const DEFAULT_TIMEOUT_POLLS: u32 = 4_000_000;

/// Reference span (VREFP - VREFN) of the usual 5 V / AGND wiring.
pub const DEFAULT_VREF_SPAN: f64 = 5.0;

/// Discard nothing: read the first conversion after a MUX change.
pub const SETTLE_FAST: u8 = 1;
/// Discard four conversions after a MUX change so the front end settles.
pub const SETTLE_ACCURATE: u8 = 5;

/// Microsecond delays from the datasheet timing tables, rounded up.
pub(crate) const RESET_EDGE_US: u64 = 200_000;
pub(crate) const CONFIG_SETTLE_US: u64 = 1_000;
pub(crate) const SYNC_WAKEUP_US: u64 = 5;
pub(crate) const WAKEUP_SETTLE_US: u64 = 1;
pub(crate) const T6_US: u64 = 7;

/// Gain settings for the ADS1256 programmable gain amplifier (PGA)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Gain {
    #[default]
    Gain1 = 0b000,
    Gain2 = 0b001,
    Gain4 = 0b010,
    Gain8 = 0b011,
    Gain16 = 0b100,
    Gain32 = 0b101,
    Gain64 = 0b110,
}

impl Gain {
    /// Returns the gain value as a floating-point number
    pub fn multiplier(&self) -> f64 {
        match self {
            Gain::Gain1 => 1.0,
            Gain::Gain2 => 2.0,
            Gain::Gain4 => 4.0,
            Gain::Gain8 => 8.0,
            Gain::Gain16 => 16.0,
            Gain::Gain32 => 32.0,
            Gain::Gain64 => 64.0,
        }
    }

    /// PGA field of the ADCON register.
    pub fn bits(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Gain {
    type Error = InvalidGain;

    /// Parses a PGA multiplier (1, 2, 4, ... 64).
    fn try_from(multiplier: u8) -> Result<Self, Self::Error> {
        match multiplier {
            1 => Ok(Gain::Gain1),
            2 => Ok(Gain::Gain2),
            4 => Ok(Gain::Gain4),
            8 => Ok(Gain::Gain8),
            16 => Ok(Gain::Gain16),
            32 => Ok(Gain::Gain32),
            64 => Ok(Gain::Gain64),
            other => Err(InvalidGain(other)),
        }
    }
}

/// Data rates for the ADS1256
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DataRate {
    Sps30000,
    Sps15000,
    Sps7500,
    Sps3750,
    Sps2000,
    #[default]
    Sps1000,
    Sps500,
    Sps100,
    Sps60,
    Sps50,
    Sps30,
    Sps25,
    Sps15,
    Sps10,
    Sps5,
    Sps2_5,
}

/// DRATE register values, indexed by `DataRate` discriminant.
const DRATE_TABLE: [u8; 16] = [
    0xF0, 0xE0, 0xD0, 0xC0, 0xB0, 0xA1, 0x92, 0x82, 0x72, 0x63, 0x53, 0x43, 0x33, 0x23, 0x13,
    0x03,
];

impl DataRate {
    pub const ALL: [DataRate; 16] = [
        DataRate::Sps30000,
        DataRate::Sps15000,
        DataRate::Sps7500,
        DataRate::Sps3750,
        DataRate::Sps2000,
        DataRate::Sps1000,
        DataRate::Sps500,
        DataRate::Sps100,
        DataRate::Sps60,
        DataRate::Sps50,
        DataRate::Sps30,
        DataRate::Sps25,
        DataRate::Sps15,
        DataRate::Sps10,
        DataRate::Sps5,
        DataRate::Sps2_5,
    ];

    /// Byte written to the DRATE register.
    pub fn register_value(self) -> u8 {
        DRATE_TABLE[self as usize]
    }

    /// Nominal output rate in samples per second.
    pub fn sps(self) -> f64 {
        match self {
            DataRate::Sps30000 => 30000.0,
            DataRate::Sps15000 => 15000.0,
            DataRate::Sps7500 => 7500.0,
            DataRate::Sps3750 => 3750.0,
            DataRate::Sps2000 => 2000.0,
            DataRate::Sps1000 => 1000.0,
            DataRate::Sps500 => 500.0,
            DataRate::Sps100 => 100.0,
            DataRate::Sps60 => 60.0,
            DataRate::Sps50 => 50.0,
            DataRate::Sps30 => 30.0,
            DataRate::Sps25 => 25.0,
            DataRate::Sps15 => 15.0,
            DataRate::Sps10 => 10.0,
            DataRate::Sps5 => 5.0,
            DataRate::Sps2_5 => 2.5,
        }
    }
}

/// How logical channel indices map onto the input multiplexer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// AIN0..AIN7, each measured against AINCOM.
    #[default]
    SingleEnded,
    /// Pairs AIN0-AIN1, AIN2-AIN3, AIN4-AIN5, AIN6-AIN7.
    Differential,
}

impl ScanMode {
    /// Number of logical channels in this mode.
    pub fn channel_count(self) -> u8 {
        match self {
            ScanMode::SingleEnded => 8,
            ScanMode::Differential => 4,
        }
    }

    /// MUX register value for `index`, or `None` if the index is out of range.
    pub fn mux_value(self, index: u8) -> Option<u8> {
        if index >= self.channel_count() {
            return None;
        }
        let mux = match self {
            ScanMode::SingleEnded => (index << 4) | MUX_AINCOM,
            ScanMode::Differential => {
                let positive = index * 2;
                (positive << 4) | (positive + 1)
            }
        };
        Some(mux)
    }
}

/// Driver configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub gain: Gain,
    pub data_rate: DataRate,
    /// Analog input buffer (STATUS.BUFEN).
    pub buffer_enabled: bool,
    /// VREFP - VREFN in volts.
    pub vref_span: f64,
    /// DRDY poll budget used by every internal wait.
    pub timeout_polls: u32,
}

impl Config {
    pub fn new(gain: Gain, data_rate: DataRate) -> Self {
        Config {
            gain,
            data_rate,
            ..Default::default()
        }
    }

    pub fn with_buffer(mut self, enabled: bool) -> Self {
        self.buffer_enabled = enabled;
        self
    }

    pub fn with_vref_span(mut self, volts: f64) -> Self {
        self.vref_span = volts;
        self
    }

    pub fn with_timeout_polls(mut self, polls: u32) -> Self {
        self.timeout_polls = polls;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gain: Gain::Gain1,
            data_rate: DataRate::Sps1000,
            buffer_enabled: true,
            vref_span: DEFAULT_VREF_SPAN,
            timeout_polls: DEFAULT_TIMEOUT_POLLS,
        }
    }
}
