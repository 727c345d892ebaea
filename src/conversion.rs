use crate::constants::Gain;

/// 2^23: magnitude of the most negative 24-bit code.
pub const FULL_SCALE: f64 = 8_388_608.0;

/// Widens a 24-bit two's-complement code to `i32`.
///
/// Bits above 23 in `raw` are ignored.
pub fn sign_extend(raw: u32) -> i32 {
    // Move bit 23 into the sign position, then shift back arithmetically.
    ((raw << 8) as i32) >> 8
}

/// Assembles three MSB-first bytes into a sign-extended sample.
pub(crate) fn sample_from_bytes(bytes: [u8; 3]) -> i32 {
    sign_extend(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
}

/// Converts a raw code to volts: `raw / 2^23 * vref_span / gain`.
pub fn raw_to_voltage(raw: i32, gain: Gain, vref_span: f64) -> f64 {
    (raw as f64 / FULL_SCALE) * (vref_span / gain.multiplier())
}
