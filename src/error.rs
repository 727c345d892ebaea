use core::fmt;

use crate::constants::ScanMode;
use crate::interface::PinId;

/// Errors returned by [`Ads1256`](crate::Ads1256) operations.
///
/// `E` is the error type of the [`HardwareAccess`](crate::HardwareAccess)
/// implementation.
#[derive(Debug, PartialEq)]
pub enum DriverError<E> {
    /// A pin or SPI primitive failed. Not retried.
    Transport(E),
    /// DRDY stayed high for the whole poll budget.
    Timeout,
    /// STATUS did not report the expected chip id after reset.
    IdentityMismatch { expected: u8, found: u8 },
    /// Channel index out of range for the scan mode. No hardware was touched.
    InvalidChannel { mode: ScanMode, index: u8 },
    /// `len` registers from `reg` do not fit in the register map. No hardware
    /// was touched.
    InvalidRegister { reg: u8, len: usize },
}

impl<E: fmt::Debug> fmt::Display for DriverError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {e:?}"),
            Self::Timeout => f.write_str("timed out waiting for DRDY"),
            Self::IdentityMismatch { expected, found } => {
                write!(f, "chip id mismatch: expected {expected}, found {found}")
            }
            Self::InvalidChannel { mode, index } => {
                write!(f, "channel {index} is not valid in {mode:?} mode")
            }
            Self::InvalidRegister { reg, len } => {
                write!(f, "{len} registers from 0x{reg:02X} run past FSC2")
            }
        }
    }
}

impl<E: fmt::Debug> core::error::Error for DriverError<E> {}

/// Error of the embedded-hal backed [`HalInterface`](crate::HalInterface).
#[derive(Debug, PartialEq)]
pub enum InterfaceError<SpiError, GpioError> {
    Spi(SpiError),
    Gpio(GpioError),
    /// Write to an input pin, or read of an output pin.
    WrongDirection(PinId),
}

impl<S: fmt::Debug, G: fmt::Debug> fmt::Display for InterfaceError<S, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI: {e:?}"),
            Self::Gpio(e) => write!(f, "GPIO: {e:?}"),
            Self::WrongDirection(pin) => write!(f, "{pin:?} cannot be used in that direction"),
        }
    }
}

impl<S: fmt::Debug, G: fmt::Debug> core::error::Error for InterfaceError<S, G> {}

/// A PGA multiplier outside {1, 2, 4, 8, 16, 32, 64}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidGain(pub u8);

impl fmt::Display for InvalidGain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid PGA gain {}", self.0)
    }
}

impl core::error::Error for InvalidGain {}
