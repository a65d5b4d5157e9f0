// src/common/checksum.rs

/// Calculates the frame checksum: the sum of every character code in `text`, modulo 256.
///
/// The calculation covers everything from the first address digit up to the byte *before*
/// the three checksum digits. On the wire the result is always written as exactly three
/// zero-padded decimal digits.
#[inline]
pub fn checksum(text: &str) -> u8 {
    checksum_bytes(text.as_bytes())
}

/// Same as [`checksum`], over raw bytes.
#[inline]
pub fn checksum_bytes(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Encodes a checksum as its three ASCII digits.
pub fn encode_checksum_ascii(value: u8) -> [u8; 3] {
    [
        b'0' + value / 100,
        b'0' + (value / 10) % 10,
        b'0' + value % 10,
    ]
}

/// Decodes three ASCII checksum digits. Returns `None` if any byte is not a digit
/// or the number does not fit a checksum (greater than 255).
pub fn decode_checksum_ascii(digits: &[u8]) -> Option<u8> {
    if digits.len() != 3 {
        return None;
    }
    let mut value: u16 = 0;
    for &d in digits {
        if !d.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u16::from(d - b'0');
    }
    u8::try_from(value).ok()
}
