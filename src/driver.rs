use alloc::vec::Vec;

use crate::constants::*;
use crate::conversion::{raw_to_voltage, sample_from_bytes, sign_extend};
use crate::error::DriverError;
use crate::interface::{HardwareAccess, PinId};
use crate::monitor::AcquisitionObserver;

/// Lifecycle of an [`Ads1256`] instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Constructed, or the last identity check failed.
    Uninitialized,
    /// Chip identified; register configuration may be (re)applied.
    Configured,
    /// Inside a continuous (RDATAC) acquisition.
    Scanning,
}

/// ADS1256 driver
///
/// Owns the hardware handle exclusively. Every operation blocks until the
/// SPI traffic and DRDY waits it needs have completed, so a single owner
/// must serialize all access.
pub struct Ads1256<HW> {
    hw: HW,
    config: Config,
    state: DriverState,
}

impl<HW: HardwareAccess> Ads1256<HW> {
    /// Creates a new ADS1256 driver instance
    pub fn new(hw: HW, config: Config) -> Self {
        Ads1256 {
            hw,
            config,
            state: DriverState::Uninitialized,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gives back the hardware handle.
    pub fn release(self) -> HW {
        self.hw
    }

    /// Pulses RESET and checks the chip id in STATUS.
    ///
    /// Returns the id nibble. A mismatch leaves the driver uninitialized;
    /// it usually means a wiring fault or a different part on the bus.
    pub fn reset_and_identify(&mut self) -> Result<u8, DriverError<HW::Error>> {
        for level in [true, false, true] {
            self.hw
                .digital_write(PinId::Reset, level)
                .map_err(DriverError::Transport)?;
            self.hw.delay_us(RESET_EDGE_US);
        }

        let mut status = [0u8; 1];
        self.read_register(REG_STATUS, &mut status)?;
        let id = status[0] >> 4;
        if id != ADS1256_ID {
            self.state = DriverState::Uninitialized;
            return Err(DriverError::IdentityMismatch {
                expected: ADS1256_ID,
                found: id,
            });
        }

        log::debug!("ADS1256 identified, STATUS 0x{:02X}", status[0]);
        self.state = DriverState::Configured;
        Ok(id)
    }

    /// Writes STATUS, MUX, ADCON and DRATE in one transaction.
    ///
    /// STATUS gets MSB-first order, auto-calibration off and the input buffer
    /// from [`Config::buffer_enabled`]. MUX is reset to AIN0 vs AINCOM. Safe to
    /// call again at any time to change gain or data rate.
    pub fn configure(
        &mut self,
        gain: Gain,
        data_rate: DataRate,
    ) -> Result<(), DriverError<HW::Error>> {
        self.wait_ready(self.config.timeout_polls)?;

        // ORDER = MSB first, ACAL off
        let mut status = 0x00;
        if self.config.buffer_enabled {
            status |= STATUS_BUFEN;
        }
        let mux = MUX_AINCOM; // AINP = AIN0, AINN = AINCOM
        let adcon = gain.bits(); // clock out off, sensor detect off
        let drate = data_rate.register_value();

        self.write_register(REG_STATUS, &[status, mux, adcon, drate])?;
        self.hw.delay_us(CONFIG_SETTLE_US);

        log::debug!(
            "Configured gain {:?}, data rate {:?} (ADCON 0x{:02X}, DRATE 0x{:02X})",
            gain,
            data_rate,
            adcon,
            drate
        );
        self.config.gain = gain;
        self.config.data_rate = data_rate;
        Ok(())
    }

    /// Polls DRDY until it reads low, at most `timeout_polls` times.
    pub fn wait_ready(&mut self, timeout_polls: u32) -> Result<(), DriverError<HW::Error>> {
        for _ in 0..timeout_polls {
            let busy = self
                .hw
                .digital_read(PinId::DataReady)
                .map_err(DriverError::Transport)?;
            if !busy {
                return Ok(());
            }
        }
        Err(DriverError::Timeout)
    }

    /// Points the input multiplexer at logical channel `index` of `mode`.
    ///
    /// Conversions on the new input only start after [`Self::sync_and_wake`].
    pub fn select_channel(
        &mut self,
        mode: ScanMode,
        index: u8,
    ) -> Result<(), DriverError<HW::Error>> {
        let mux = mode
            .mux_value(index)
            .ok_or(DriverError::InvalidChannel { mode, index })?;
        log::trace!("MUX 0x{:02X} ({:?} channel {})", mux, mode, index);
        self.write_register(REG_MUX, &[mux])
    }

    /// Restarts conversion with SYNC followed by WAKEUP.
    pub fn sync_and_wake(&mut self) -> Result<(), DriverError<HW::Error>> {
        self.send_command(CMD_SYNC)?;
        // t11: at least 4 CLKIN periods
        self.hw.delay_us(SYNC_WAKEUP_US);
        self.send_command(CMD_WAKEUP)?;
        self.hw.delay_us(WAKEUP_SETTLE_US);
        Ok(())
    }

    /// Issues RDATA and reads one sign-extended 24-bit result.
    ///
    /// Does not wait for DRDY; the caller must already have seen it low.
    pub fn read_raw_sample(&mut self) -> Result<i32, DriverError<HW::Error>> {
        self.select()?;
        self.transfer(&[CMD_RDATA], &mut [])?;
        self.hw.delay_us(T6_US);

        let mut buffer = [0u8; 3];
        self.transfer(&[0xFF; 3], &mut buffer)?;
        self.deselect()?;

        log::trace!(
            "Raw data: {:02X} {:02X} {:02X}",
            buffer[0],
            buffer[1],
            buffer[2]
        );
        Ok(sample_from_bytes(buffer))
    }

    /// Selects a channel, restarts conversion and reads one settled sample.
    ///
    /// DRDY is awaited `settle_cycles` times (at least once) and only the
    /// last conversion is read. Use [`SETTLE_FAST`] for throughput or
    /// [`SETTLE_ACCURATE`] to let the analog front end settle after the
    /// input change.
    pub fn read_channel(
        &mut self,
        mode: ScanMode,
        index: u8,
        settle_cycles: u8,
    ) -> Result<i32, DriverError<HW::Error>> {
        self.select_channel(mode, index)?;
        self.sync_and_wake()?;
        for _ in 0..settle_cycles.max(1) {
            self.wait_ready(self.config.timeout_polls)?;
        }
        self.read_raw_sample()
    }

    /// Reads each of `indices` in order. Fails on the first bad index or
    /// transport error without reading the remaining channels.
    pub fn scan_channels(
        &mut self,
        mode: ScanMode,
        indices: &[u8],
        settle_cycles: u8,
    ) -> Result<Vec<i32>, DriverError<HW::Error>> {
        self.scan_channels_observed(mode, indices, settle_cycles, &mut ())
    }

    /// [`Self::scan_channels`], reporting each completed scan to `observer`.
    pub fn scan_channels_observed<O: AcquisitionObserver>(
        &mut self,
        mode: ScanMode,
        indices: &[u8],
        settle_cycles: u8,
        observer: &mut O,
    ) -> Result<Vec<i32>, DriverError<HW::Error>> {
        let mut samples = Vec::with_capacity(indices.len());
        for &index in indices {
            samples.push(self.read_channel(mode, index, settle_cycles)?);
        }
        observer.on_scan(samples.len());
        Ok(samples)
    }

    /// Reads one channel and converts it with the configured gain and
    /// reference span.
    pub fn read_voltage(
        &mut self,
        mode: ScanMode,
        index: u8,
        settle_cycles: u8,
    ) -> Result<f64, DriverError<HW::Error>> {
        let raw = self.read_channel(mode, index, settle_cycles)?;
        Ok(raw_to_voltage(raw, self.config.gain, self.config.vref_span))
    }

    /// Acquires `count` consecutive conversions from one channel in
    /// Read Data Continuous mode.
    ///
    /// CS stays asserted for the whole run. On failure SDATAC is still
    /// attempted so the chip is left in command mode.
    pub fn read_continuous(
        &mut self,
        mode: ScanMode,
        index: u8,
        count: usize,
    ) -> Result<Vec<i32>, DriverError<HW::Error>> {
        self.select_channel(mode, index)?;
        self.sync_and_wake()?;

        let previous = self.state;
        self.state = DriverState::Scanning;
        let result = self.continuous_samples(count);
        if result.is_err() {
            let _ = self.hw.spi_transfer(&[CMD_SDATAC], &mut []);
            let _ = self.hw.digital_write(PinId::ChipSelect, true);
        }
        self.state = previous;
        result
    }

    fn continuous_samples(&mut self, count: usize) -> Result<Vec<i32>, DriverError<HW::Error>> {
        let polls = self.config.timeout_polls;
        let mut samples = Vec::new();

        self.select()?;
        self.wait_ready(polls)?;
        self.transfer(&[CMD_RDATAC], &mut [])?;
        self.hw.delay_us(T6_US);

        for _ in 0..count {
            self.wait_ready(polls)?;
            let mut buffer = [0u8; 3];
            self.transfer(&[0xFF; 3], &mut buffer)?;
            samples.push(sample_from_bytes(buffer));
        }

        self.wait_ready(polls)?;
        self.transfer(&[CMD_SDATAC], &mut [])?;
        self.deselect()?;
        Ok(samples)
    }

    /// Enables or disables the analog input buffer (STATUS.BUFEN).
    ///
    /// Run a self-calibration afterwards; the buffer shifts the offset.
    pub fn set_buffer(&mut self, enabled: bool) -> Result<(), DriverError<HW::Error>> {
        let mut status = [0u8; 1];
        self.read_register(REG_STATUS, &mut status)?;
        if enabled {
            status[0] |= STATUS_BUFEN;
        } else {
            status[0] &= !STATUS_BUFEN;
        }
        // Upper nibble and DRDY bit are read-only.
        self.write_register(REG_STATUS, &[status[0] & 0x0E])?;
        self.config.buffer_enabled = enabled;
        Ok(())
    }

    /// Enters standby. Leave with [`Self::wakeup`].
    pub fn standby(&mut self) -> Result<(), DriverError<HW::Error>> {
        self.send_command(CMD_STANDBY)
    }

    pub fn wakeup(&mut self) -> Result<(), DriverError<HW::Error>> {
        self.send_command(CMD_WAKEUP)
    }

    /// Reads every register, STATUS through FSC2.
    pub fn read_registers(&mut self) -> Result<[u8; REGISTER_COUNT], DriverError<HW::Error>> {
        const NAMES: [&str; REGISTER_COUNT] = [
            "STATUS", "MUX", "ADCON", "DRATE", "IO", "OFC0", "OFC1", "OFC2", "FSC0", "FSC1",
            "FSC2",
        ];

        let mut registers = [0u8; REGISTER_COUNT];
        self.read_register(REG_STATUS, &mut registers)?;
        for (name, value) in NAMES.iter().zip(registers.iter()) {
            log::debug!("Register {}: 0x{:02X}", name, value);
        }
        Ok(registers)
    }

    /// Writes `data` to consecutive registers starting at `reg`.
    ///
    /// The run must stay inside the register map (STATUS..FSC2); otherwise
    /// `InvalidRegister` is returned before any SPI traffic.
    pub fn write_register(&mut self, reg: u8, data: &[u8]) -> Result<(), DriverError<HW::Error>> {
        check_register_run::<HW::Error>(reg, data.len())?;
        if data.is_empty() {
            return Ok(());
        }
        let command = CMD_WREG | reg;
        let count = (data.len() - 1) as u8;

        self.select()?;
        self.transfer(&[command, count], &mut [])?;
        self.transfer(data, &mut [])?;
        self.deselect()
    }

    /// Reads consecutive registers starting at `reg`, filling all of `buffer`.
    ///
    /// Same bounds as [`write_register`](Self::write_register).
    pub fn read_register(
        &mut self,
        reg: u8,
        buffer: &mut [u8],
    ) -> Result<(), DriverError<HW::Error>> {
        check_register_run::<HW::Error>(reg, buffer.len())?;
        let len = buffer.len();
        if len == 0 {
            return Ok(());
        }
        let command = CMD_RREG | reg;
        let count = (len - 1) as u8;

        self.select()?;
        self.transfer(&[command, count], &mut [])?;
        self.hw.delay_us(T6_US);
        self.transfer(&[0xFF; REGISTER_COUNT][..len], buffer)?;
        self.deselect()
    }

    /// Sends a command to the ADS1256
    fn send_command(&mut self, command: u8) -> Result<(), DriverError<HW::Error>> {
        self.select()?;
        log::trace!("Sending command: 0x{:02X}", command);
        self.transfer(&[command], &mut [])?;
        self.deselect()
    }

    fn select(&mut self) -> Result<(), DriverError<HW::Error>> {
        self.hw
            .digital_write(PinId::ChipSelect, false)
            .map_err(DriverError::Transport)
    }

    fn deselect(&mut self) -> Result<(), DriverError<HW::Error>> {
        self.hw
            .digital_write(PinId::ChipSelect, true)
            .map_err(DriverError::Transport)
    }

    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), DriverError<HW::Error>> {
        self.hw.spi_transfer(tx, rx).map_err(DriverError::Transport)
    }
}

// Calibration
impl<HW: HardwareAccess> Ads1256<HW> {
    /// Offset and gain self-calibration.
    pub fn self_calibrate(&mut self) -> Result<(), DriverError<HW::Error>> {
        self.calibrate(CMD_SELFCAL)
    }

    pub fn self_offset_calibrate(&mut self) -> Result<(), DriverError<HW::Error>> {
        self.calibrate(CMD_SELFOCAL)
    }

    pub fn self_gain_calibrate(&mut self) -> Result<(), DriverError<HW::Error>> {
        self.calibrate(CMD_SELFGCAL)
    }

    /// System offset calibration. The selected input must be at zero
    /// differential voltage.
    pub fn system_offset_calibrate(&mut self) -> Result<(), DriverError<HW::Error>> {
        self.calibrate(CMD_SYSOCAL)
    }

    /// System gain calibration. The selected input must be at full scale,
    /// i.e. `vref_span / gain`.
    pub fn system_gain_calibrate(&mut self) -> Result<(), DriverError<HW::Error>> {
        self.calibrate(CMD_SYSGCAL)
    }

    fn calibrate(&mut self, command: u8) -> Result<(), DriverError<HW::Error>> {
        self.send_command(command)?;
        self.wait_ready(self.config.timeout_polls)
    }

    /// Signed offset coefficient from OFC0..OFC2 (OFC0 is the low byte).
    pub fn offset_calibration(&mut self) -> Result<i32, DriverError<HW::Error>> {
        let mut buffer = [0u8; 3];
        self.read_register(REG_OFC0, &mut buffer)?;
        Ok(sign_extend(u32::from_le_bytes([buffer[0], buffer[1], buffer[2], 0])))
    }

    /// Unsigned full-scale coefficient from FSC0..FSC2 (FSC0 is the low byte).
    pub fn full_scale_calibration(&mut self) -> Result<u32, DriverError<HW::Error>> {
        let mut buffer = [0u8; 3];
        self.read_register(REG_FSC0, &mut buffer)?;
        Ok(u32::from_le_bytes([buffer[0], buffer[1], buffer[2], 0]))
    }

    pub fn set_offset_calibration(&mut self, value: i32) -> Result<(), DriverError<HW::Error>> {
        let bytes = value.to_le_bytes();
        self.write_register(REG_OFC0, &bytes[..3])
    }

    pub fn set_full_scale_calibration(&mut self, value: u32) -> Result<(), DriverError<HW::Error>> {
        let bytes = value.to_le_bytes();
        self.write_register(REG_FSC0, &bytes[..3])
    }
}

/// Rejects register runs that start or end outside STATUS..FSC2.
fn check_register_run<E>(reg: u8, len: usize) -> Result<(), DriverError<E>> {
    let start = usize::from(reg);
    if start >= REGISTER_COUNT || len > REGISTER_COUNT - start {
        return Err(DriverError::InvalidRegister { reg, len });
    }
    Ok(())
}
