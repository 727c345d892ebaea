//! Acquisition driver for the TI ADS1256 8-channel, 24-bit delta-sigma ADC.
//!
//! The driver speaks the register protocol only. Pins, the SPI bus and the
//! delay source come from a [`HardwareAccess`] implementation; use
//! [`HalInterface`] to build one from any `embedded-hal` 1.0 platform crate.
//!
//! ```ignore
//! let hw = HalInterface::new(spi, cs, reset, drdy, delay);
//! let mut adc = Ads1256::new(hw, Config::default());
//!
//! adc.reset_and_identify()?;
//! adc.configure(Gain::Gain1, DataRate::Sps1000)?;
//!
//! let samples = adc.scan_channels(ScanMode::SingleEnded, &[0, 1, 2], SETTLE_ACCURATE)?;
//! ```
//!
//! [ADS1256 datasheet](https://www.ti.com/lit/ds/symlink/ads1256.pdf)
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod constants;
mod conversion;
mod driver;
mod error;
mod interface;
mod monitor;

#[cfg(test)]
mod mock;

pub use constants::{
    Config, DataRate, Gain, ScanMode, ADS1256_ID, DEFAULT_TIMEOUT_POLLS, DEFAULT_VREF_SPAN,
    SETTLE_ACCURATE, SETTLE_FAST,
};
pub use conversion::{raw_to_voltage, sign_extend, FULL_SCALE};
pub use driver::{Ads1256, DriverState};
pub use error::{DriverError, InterfaceError, InvalidGain};
pub use interface::{HalInterface, HardwareAccess, PinId};
pub use monitor::{AcquisitionObserver, PerformanceMonitor, PerformanceReport, Rating};

/// Register addresses and command opcodes, for callers using the raw
/// [`Ads1256::read_register`] / [`Ads1256::write_register`] accessors.
pub mod registers {
    pub use crate::constants::{
        CMD_RDATA, CMD_RDATAC, CMD_RESET, CMD_RREG, CMD_SDATAC, CMD_SELFCAL, CMD_SELFGCAL,
        CMD_SELFOCAL, CMD_STANDBY, CMD_SYNC, CMD_SYSGCAL, CMD_SYSOCAL, CMD_WAKEUP, CMD_WREG,
        REG_ADCON, REG_DRATE, REG_FSC0, REG_FSC1, REG_FSC2, REG_IO, REG_MUX, REG_OFC0, REG_OFC1,
        REG_OFC2, REG_STATUS,
    };
}
