use ads1256::{
    registers::{CMD_RDATA, CMD_SYNC, CMD_WAKEUP},
    Ads1256, Config, DataRate, DriverError, DriverState, Gain, HalInterface, HardwareAccess,
    InterfaceError, PinId, ScanMode,
};
use embedded_hal_mock::eh1::{
    delay::NoopDelay,
    digital::{Mock as PinMock, State, Transaction as PinTransaction},
    spi::{Mock as SpiMock, Transaction as SpiTransaction},
};

fn spi_write(bytes: &[u8]) -> [SpiTransaction<u8>; 3] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(bytes.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

fn spi_read(response: &[u8]) -> [SpiTransaction<u8>; 3] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::transfer(vec![0xFF; response.len()], response.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

/// CS low/high around each of `frames` chip-select windows.
fn cs_frames(frames: usize) -> Vec<PinTransaction> {
    (0..frames)
        .flat_map(|_| {
            [
                PinTransaction::set(State::Low),
                PinTransaction::set(State::High),
            ]
        })
        .collect()
}

#[test]
fn identify_configure_and_read() {
    let mut spi_expectations = Vec::new();
    // reset_and_identify: RREG STATUS
    spi_expectations.extend(spi_write(&[0x10, 0x00]));
    spi_expectations.extend(spi_read(&[0x30]));
    // configure: WREG STATUS..DRATE
    spi_expectations.extend(spi_write(&[0x50, 0x03]));
    spi_expectations.extend(spi_write(&[0x02, 0x08, 0x01, 0xA1]));
    // read_channel: MUX, SYNC, WAKEUP, RDATA
    spi_expectations.extend(spi_write(&[0x51, 0x00]));
    spi_expectations.extend(spi_write(&[0x28]));
    spi_expectations.extend(spi_write(&[CMD_SYNC]));
    spi_expectations.extend(spi_write(&[CMD_WAKEUP]));
    spi_expectations.extend(spi_write(&[CMD_RDATA]));
    spi_expectations.extend(spi_read(&[0x80, 0x00, 0x01]));

    let reset_expectations = [
        PinTransaction::set(State::High),
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ];
    let drdy_expectations = [
        // configure
        PinTransaction::get(State::Low),
        // two settle cycles, the first one busy once
        PinTransaction::get(State::High),
        PinTransaction::get(State::Low),
        PinTransaction::get(State::Low),
    ];

    let spi = SpiMock::new(&spi_expectations);
    let cs = PinMock::new(&cs_frames(6));
    let reset = PinMock::new(&reset_expectations);
    let drdy = PinMock::new(&drdy_expectations);
    let hw = HalInterface::new(spi, cs, reset, drdy, NoopDelay::new());

    let mut adc = Ads1256::new(hw, Config::default().with_timeout_polls(10));
    assert_eq!(adc.reset_and_identify().unwrap(), 3);
    assert_eq!(adc.state(), DriverState::Configured);
    adc.configure(Gain::Gain2, DataRate::Sps1000).unwrap();
    assert_eq!(
        adc.read_channel(ScanMode::SingleEnded, 2, 2).unwrap(),
        -8_388_607
    );

    let (mut spi, mut cs, mut reset, mut drdy, _) = adc.release().release();
    spi.done();
    cs.done();
    reset.done();
    drdy.done();
}

#[test]
fn invalid_differential_pair_is_rejected_without_io() {
    let spi = SpiMock::<u8>::new(&[]);
    let cs = PinMock::new(&[]);
    let reset = PinMock::new(&[]);
    let drdy = PinMock::new(&[]);
    let hw = HalInterface::new(spi, cs, reset, drdy, NoopDelay::new());

    let mut adc = Ads1256::new(hw, Config::default());
    let result = adc.scan_channels(ScanMode::Differential, &[4, 0], 1);
    assert!(matches!(
        result,
        Err(DriverError::InvalidChannel {
            mode: ScanMode::Differential,
            index: 4
        })
    ));

    let (mut spi, mut cs, mut reset, mut drdy, _) = adc.release().release();
    spi.done();
    cs.done();
    reset.done();
    drdy.done();
}

#[test]
fn pins_used_against_their_direction_are_errors() {
    let spi = SpiMock::<u8>::new(&[]);
    let cs = PinMock::new(&[]);
    let reset = PinMock::new(&[]);
    let drdy = PinMock::new(&[]);
    let mut hw = HalInterface::new(spi, cs, reset, drdy, NoopDelay::new());

    assert!(matches!(
        hw.digital_write(PinId::DataReady, true),
        Err(InterfaceError::WrongDirection(PinId::DataReady))
    ));
    assert!(matches!(
        hw.digital_read(PinId::Reset),
        Err(InterfaceError::WrongDirection(PinId::Reset))
    ));
    assert!(matches!(
        hw.digital_read(PinId::ChipSelect),
        Err(InterfaceError::WrongDirection(PinId::ChipSelect))
    ));

    let (mut spi, mut cs, mut reset, mut drdy, _) = hw.release();
    spi.done();
    cs.done();
    reset.done();
    drdy.done();
}
