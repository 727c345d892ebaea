//! Recording `HardwareAccess` double for driver tests.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::interface::{HardwareAccess, PinId};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Write(PinId, bool),
    Read(PinId),
    Transfer(Vec<u8>),
    Delay(u64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockError;

pub struct MockHardware {
    pub calls: Vec<Call>,
    /// DRDY levels returned before falling back to `drdy_idle`.
    drdy_levels: VecDeque<bool>,
    drdy_idle: bool,
    /// Bytes shifted into non-empty receive buffers, zero once drained.
    miso: VecDeque<u8>,
    fail_transfer: Option<usize>,
}

impl MockHardware {
    /// DRDY reads low (ready) on every poll.
    pub fn ready() -> Self {
        MockHardware {
            calls: Vec::new(),
            drdy_levels: VecDeque::new(),
            drdy_idle: false,
            miso: VecDeque::new(),
            fail_transfer: None,
        }
    }

    /// DRDY never goes low.
    pub fn stuck_busy() -> Self {
        MockHardware {
            drdy_idle: true,
            ..Self::ready()
        }
    }

    pub fn with_miso(mut self, bytes: &[u8]) -> Self {
        self.miso.extend(bytes.iter().copied());
        self
    }

    pub fn with_drdy_levels(mut self, levels: &[bool]) -> Self {
        self.drdy_levels.extend(levels.iter().copied());
        self
    }

    /// The `n`th SPI transfer (0-based) fails.
    pub fn failing_transfer(mut self, n: usize) -> Self {
        self.fail_transfer = Some(n);
        self
    }

    pub fn reads_of(&self, pin: PinId) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == Call::Read(pin))
            .count()
    }

    pub fn transfers(&self) -> Vec<&[u8]> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Transfer(tx) => Some(tx.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Number of single-byte command frames equal to `command`.
    ///
    /// Payload that follows a WREG header is register data, not a command.
    pub fn commands(&self, command: u8) -> usize {
        let transfers = self.transfers();
        transfers
            .iter()
            .enumerate()
            .filter(|(i, tx)| {
                let after_wreg = i
                    .checked_sub(1)
                    .map(|prev| is_wreg_header(transfers[prev]))
                    .unwrap_or(false);
                **tx == [command] && !after_wreg
            })
            .count()
    }
}

fn is_wreg_header(tx: &[u8]) -> bool {
    tx.len() == 2 && tx[0] & 0xF0 == crate::constants::CMD_WREG
}

impl HardwareAccess for MockHardware {
    type Error = MockError;

    fn digital_write(&mut self, pin: PinId, level: bool) -> Result<(), Self::Error> {
        self.calls.push(Call::Write(pin, level));
        Ok(())
    }

    fn digital_read(&mut self, pin: PinId) -> Result<bool, Self::Error> {
        self.calls.push(Call::Read(pin));
        Ok(self.drdy_levels.pop_front().unwrap_or(self.drdy_idle))
    }

    fn spi_transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), Self::Error> {
        let index = self.transfers().len();
        self.calls.push(Call::Transfer(tx.to_vec()));
        if self.fail_transfer == Some(index) {
            return Err(MockError);
        }
        for byte in rx.iter_mut() {
            *byte = self.miso.pop_front().unwrap_or(0);
        }
        Ok(())
    }

    fn delay_us(&mut self, microseconds: u64) {
        self.calls.push(Call::Delay(microseconds));
    }
}
