//! Checksums used on both links.
//!
//! - [`crc16_xmodem`] stamps outbound datastrings (CRC-16/XMODEM update step with
//!   the register seeded to `0xFFFF`, as expected by UKHAS ground stations).
//! - [`ubx_checksum`] is the 8-bit Fletcher sum carried by every UBX packet.

const XMODEM_POLY: u16 = 0x1021;

/// Register value every datastring checksum starts from.
pub const CRC16_INIT: u16 = 0xFFFF;

/// Feeds one byte into a CRC-16/XMODEM register, MSB first, no final XOR.
pub fn crc_xmodem_update(crc: u16, data: u8) -> u16 {
    let mut crc = crc ^ (u16::from(data) << 8);
    for _ in 0..8 {
        crc = if crc & 0x8000 != 0 {
            (crc << 1) ^ XMODEM_POLY
        } else {
            crc << 1
        };
    }
    crc
}

/// Computes the CRC-16 of `data` starting from [`CRC16_INIT`].
///
/// # Example
/// ```rust
/// use rtty_telemetry::crc::crc16_xmodem;
///
/// assert_eq!(crc16_xmodem(b"123456789"), 0x29B1);
/// ```
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    data.iter()
        .fold(CRC16_INIT, |crc, &byte| crc_xmodem_update(crc, byte))
}

/// Calculates the UBX checksum (8-bit Fletcher) over `data`.
///
/// Returns `(ck_a, ck_b)` where `ck_a` is the running sum of the bytes and
/// `ck_b` the running sum of `ck_a`, both wrapping.
pub fn ubx_checksum(data: &[u8]) -> (u8, u8) {
    let mut ck_a: u8 = 0;
    let mut ck_b: u8 = 0;

    for &byte in data {
        ck_a = ck_a.wrapping_add(byte);
        ck_b = ck_b.wrapping_add(ck_a);
    }

    (ck_a, ck_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bitwise reference straight from the polynomial, no shortcuts.
    fn reference_crc(data: &[u8]) -> u16 {
        let mut crc: u32 = 0xFFFF;
        for &byte in data {
            for bit in (0..8).rev() {
                let input = u32::from((byte >> bit) & 1);
                let top = (crc >> 15) & 1;
                crc = (crc << 1) & 0xFFFF;
                if top ^ input == 1 {
                    crc ^= 0x1021;
                }
            }
        }
        crc as u16
    }

    #[test]
    fn test_crc16_check_value() {
        assert_eq!(crc16_xmodem(b"123456789"), 0x29B1);
    }

    #[test]
    fn test_crc16_empty_is_init() {
        assert_eq!(crc16_xmodem(&[]), CRC16_INIT);
    }

    #[test]
    fn test_crc16_matches_reference() {
        let inputs: [&[u8]; 4] = [
            b"ASTL1,0,,,,,,,",
            b"ASTL1,12,123519,4807.038,N,01131.000,E,545.4,M",
            &[0x00, 0xFF, 0x80, 0x01],
            b"$",
        ];
        for input in inputs {
            assert_eq!(crc16_xmodem(input), reference_crc(input));
        }
    }

    #[test]
    fn test_ubx_checksum_cfg_msg() {
        let data = [0x06, 0x01, 0x03, 0x00, 0xF0, 0x00, 0x01];
        assert_eq!(ubx_checksum(&data), (0xFB, 0x10));
    }

    #[test]
    fn test_ubx_checksum_is_deterministic() {
        let data = [0x05, 0x01, 0x02, 0x00, 0x06, 0x24];
        assert_eq!(ubx_checksum(&data), ubx_checksum(&data));
        assert_eq!(ubx_checksum(&data), (0x32, 0x5B));
    }
}
