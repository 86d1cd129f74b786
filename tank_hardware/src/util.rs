//! Timing and framing helpers shared by the device drivers.
//!
//! Kept free of GPIO types so they can be exercised without a board.

use std::time::{Duration, Instant};

use crate::error::{HwError, Result};

/// Speed of sound expressed as microseconds per centimeter (round trip halved
/// by the caller).
pub const US_PER_CM: f32 = 29.1;

/// Highest code a 12-bit converter produces.
pub const MCP3208_MAX_CODE: u16 = 4095;

/// Spin (or sleep, if `poll_interval` is non-zero) while `cond` holds, returning
/// the instant it stopped holding. Fails with `EchoTimeout` at `deadline`.
pub fn wait_while_with_deadline(
    mut cond: impl FnMut() -> bool,
    deadline: Instant,
    poll_interval: Duration,
) -> Result<Instant> {
    while cond() {
        if Instant::now() >= deadline {
            return Err(HwError::EchoTimeout);
        }
        if poll_interval.is_zero() {
            std::hint::spin_loop();
        } else {
            std::thread::sleep(poll_interval);
        }
    }
    Ok(Instant::now())
}

/// Convert an HC-SR04 echo pulse width into centimeters.
///
/// The pulse covers the round trip, so half of it is divided by the
/// per-centimeter travel time.
#[inline]
pub fn echo_us_to_cm(pulse_us: u64) -> f32 {
    (pulse_us as f32 / 2.0) / US_PER_CM
}

/// Three-byte MCP3208 single-ended conversion request for `channel` (0..=7).
pub fn mcp3208_request(channel: u8) -> Result<[u8; 3]> {
    if channel > 7 {
        return Err(HwError::InvalidChannel(channel));
    }
    // start bit + single-ended, then D2 in byte 0 and D1/D0 in the top of byte 1
    Ok([0x06 | (channel >> 2), (channel & 0x03) << 6, 0x00])
}

/// Extract the 12-bit result from an MCP3208 reply.
#[inline]
pub fn mcp3208_decode(reply: [u8; 3]) -> u16 {
    (u16::from(reply[1] & 0x0F) << 8) | u16::from(reply[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0.0)]
    #[case(582, 10.0)]
    #[case(23_280, 400.0)]
    fn echo_width_converts_to_cm(#[case] us: u64, #[case] cm: f32) {
        assert!((echo_us_to_cm(us) - cm).abs() < 0.01, "{us}us -> {}", echo_us_to_cm(us));
    }

    #[test]
    fn request_encodes_channel_bits() {
        assert_eq!(mcp3208_request(0).unwrap(), [0x06, 0x00, 0x00]);
        assert_eq!(mcp3208_request(1).unwrap(), [0x06, 0x40, 0x00]);
        assert_eq!(mcp3208_request(5).unwrap(), [0x07, 0x40, 0x00]);
        assert_eq!(mcp3208_request(7).unwrap(), [0x07, 0xC0, 0x00]);
    }

    #[test]
    fn request_rejects_missing_channel() {
        match mcp3208_request(8) {
            Err(HwError::InvalidChannel(8)) => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn decode_masks_null_bits() {
        assert_eq!(mcp3208_decode([0xFF, 0xFF, 0xFF]), MCP3208_MAX_CODE);
        assert_eq!(mcp3208_decode([0x00, 0x08, 0x00]), 2048);
        assert_eq!(mcp3208_decode([0x00, 0xE0, 0x01]), 1);
    }
}
