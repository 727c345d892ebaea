use crate::error::InterfaceError;

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

/// Pins the driver drives or samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinId {
    /// RESET, output, active low.
    Reset,
    /// CS, output, active low.
    ChipSelect,
    /// DRDY, input, low when a conversion result is available.
    DataReady,
}

/// Pin, SPI and timing primitives the driver is built on.
///
/// Implementations own the opened GPIO lines and SPI device for the
/// lifetime of the driver and release them on drop.
pub trait HardwareAccess {
    type Error;

    /// Drives an output pin. `true` is logic high.
    fn digital_write(&mut self, pin: PinId, level: bool) -> Result<(), Self::Error>;

    /// Samples an input pin. `true` is logic high.
    fn digital_read(&mut self, pin: PinId) -> Result<bool, Self::Error>;

    /// Clocks `tx` out on MOSI. An empty `rx` makes this write-only,
    /// otherwise `rx.len() == tx.len()` and MISO is captured into it.
    fn spi_transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error>;

    /// Blocks the calling thread.
    fn delay_us(&mut self, microseconds: u64);
}

/// [`HardwareAccess`] over `embedded-hal` 1.0 traits.
///
/// Chip select is a plain GPIO toggled by the driver, so `spi` should not
/// drive the ADS1256 CS line itself (e.g. a spidev opened with `SPI_NO_CS`
/// or wired to an unused CE).
pub struct HalInterface<SPI, CS, RST, DRDY, DELAY> {
    spi: SPI,
    cs: CS,
    reset: RST,
    drdy: DRDY,
    delay: DELAY,
}

impl<SPI, CS, RST, DRDY, DELAY> HalInterface<SPI, CS, RST, DRDY, DELAY> {
    pub fn new(spi: SPI, cs: CS, reset: RST, drdy: DRDY, delay: DELAY) -> Self {
        HalInterface {
            spi,
            cs,
            reset,
            drdy,
            delay,
        }
    }

    /// Returns the owned peripherals.
    pub fn release(self) -> (SPI, CS, RST, DRDY, DELAY) {
        (self.spi, self.cs, self.reset, self.drdy, self.delay)
    }
}

impl<SPI, CS, RST, DRDY, DELAY, SpiError, GpioError> HardwareAccess
    for HalInterface<SPI, CS, RST, DRDY, DELAY>
where
    SPI: SpiDevice<Error = SpiError>,
    CS: OutputPin<Error = GpioError>,
    RST: OutputPin<Error = GpioError>,
    DRDY: InputPin<Error = GpioError>,
    DELAY: DelayNs,
{
    type Error = InterfaceError<SpiError, GpioError>;

    fn digital_write(&mut self, pin: PinId, level: bool) -> Result<(), Self::Error> {
        let result = match (pin, level) {
            (PinId::ChipSelect, true) => self.cs.set_high(),
            (PinId::ChipSelect, false) => self.cs.set_low(),
            (PinId::Reset, true) => self.reset.set_high(),
            (PinId::Reset, false) => self.reset.set_low(),
            (PinId::DataReady, _) => return Err(InterfaceError::WrongDirection(pin)),
        };
        result.map_err(InterfaceError::Gpio)
    }

    fn digital_read(&mut self, pin: PinId) -> Result<bool, Self::Error> {
        match pin {
            PinId::DataReady => self.drdy.is_high().map_err(InterfaceError::Gpio),
            PinId::ChipSelect | PinId::Reset => Err(InterfaceError::WrongDirection(pin)),
        }
    }

    fn spi_transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error> {
        if rx.is_empty() {
            self.spi.write(tx)
        } else {
            self.spi.transfer(rx, tx)
        }
        .map_err(InterfaceError::Spi)
    }

    fn delay_us(&mut self, microseconds: u64) {
        let mut remaining = microseconds;
        while remaining > 0 {
            let chunk = remaining.min(u32::MAX as u64);
            self.delay.delay_us(chunk as u32);
            remaining -= chunk;
        }
    }
}
