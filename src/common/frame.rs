//! Frame layout, encoding and decoding.
//!
//! Every frame is plain ASCII terminated by a single carriage return:
//!
//! | Field     | Offset       | Width | Notes                           |
//! |-----------|--------------|-------|---------------------------------|
//! | address   | 0            | 3     | `000`..`999`                    |
//! | direction | 3            | 1     | `0` data request, `1` control   |
//! | pad       | 4            | 1     | always `0`                      |
//! | parameter | 5            | 3     | parameter number                |
//! | length    | 8            | 2     | payload length `LL`             |
//! | data      | 10           | LL    | `=?` for data requests          |
//! | checksum  | 10 + LL      | 3     | sum of all prior bytes mod 256  |
//! | `\r`      | 13 + LL      | 1     |                                 |

use arrayvec::ArrayString;

use super::address::GaugeAddr;
use super::checksum::{checksum_bytes, decode_checksum_ascii, encode_checksum_ascii};
use super::error::FrameError;
use super::parameter::{Direction, Parameter};

pub const TERMINATOR: u8 = b'\r';
/// Header plus checksum and terminator, i.e. a frame with an empty payload.
pub const MIN_FRAME_LEN: usize = 14;
pub const MAX_PAYLOAD_LEN: usize = 99;
pub const MAX_FRAME_LEN: usize = MIN_FRAME_LEN + MAX_PAYLOAD_LEN;

/// Payload of every data request.
pub const QUERY_PAYLOAD: &str = "=?";

/// Sentinel payloads a gauge sends instead of data.
pub const NAK_UNDEFINED: &str = "NO_DEF";
pub const NAK_RANGE: &str = "_RANGE";
pub const NAK_LOGIC: &str = "_LOGIC";

/// Buffer holding one encoded outgoing frame.
pub type FrameBuf = ArrayString<MAX_FRAME_LEN>;

/// A fixed-width field, located by offset from the start of the frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub start: usize,
    pub width: usize,
}

impl Field {
    pub const fn end(&self) -> usize {
        self.start + self.width
    }
}

pub mod layout {
    use super::Field;

    pub const ADDRESS: Field = Field { name: "address", start: 0, width: 3 };
    pub const DIRECTION: Field = Field { name: "direction", start: 3, width: 1 };
    pub const PAD: Field = Field { name: "pad", start: 4, width: 1 };
    pub const PARAMETER: Field = Field { name: "parameter", start: 5, width: 3 };
    pub const DATA_LENGTH: Field = Field { name: "length", start: 8, width: 2 };

    /// Offset of the first payload character.
    pub const DATA_START: usize = 10;
    pub const CHECKSUM_WIDTH: usize = 3;
    /// Checksum digits plus terminator, counted back from the end of the frame.
    pub const TRAILER_LEN: usize = CHECKSUM_WIDTH + 1;
}

/// Parses a run of ASCII decimal digits. Empty input, any other character,
/// or more than nine digits yields `None`.
pub fn parse_digits(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > 9 {
        return None;
    }
    text.bytes().try_fold(0u32, |acc, b| {
        if b.is_ascii_digit() {
            Some(acc * 10 + u32::from(b - b'0'))
        } else {
            None
        }
    })
}

/// Reads fixed-width decimal fields out of a frame.
struct FieldReader<'a> {
    text: &'a str,
}

impl<'a> FieldReader<'a> {
    fn new(text: &'a str) -> Self {
        Self { text }
    }

    fn digits(&self, field: Field) -> Result<u16, FrameError> {
        self.text
            .get(field.start..field.end())
            .and_then(parse_digits)
            .and_then(|v| u16::try_from(v).ok())
            .ok_or(FrameError::MalformedField { field: field.name })
    }
}

/// Appends fixed-width fields to a frame buffer, then seals it with checksum and terminator.
struct FieldWriter {
    buf: FrameBuf,
}

impl FieldWriter {
    fn new() -> Self {
        Self { buf: FrameBuf::new() }
    }

    fn digits(&mut self, field: Field, value: u16) -> &mut Self {
        let mut divisor = 10u16.pow(field.width as u32 - 1);
        debug_assert!(u32::from(value) < u32::from(divisor) * 10, "{} overflows", field.name);
        for _ in 0..field.width {
            self.buf.push(char::from(b'0' + ((value / divisor) % 10) as u8));
            divisor /= 10;
        }
        self
    }

    fn text(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }

    fn finish(&mut self) -> FrameBuf {
        let sum = checksum_bytes(self.buf.as_bytes());
        for digit in encode_checksum_ascii(sum) {
            self.buf.push(char::from(digit));
        }
        self.buf.push(char::from(TERMINATOR));
        self.buf
    }
}

/// Encodes a complete frame.
///
/// # Panics
///
/// Panics if `payload` is longer than [`MAX_PAYLOAD_LEN`] characters, is not ASCII,
/// or `parameter` does not fit three digits. These are programming errors: payloads are
/// formatted to the parameter's fixed width before reaching the encoder.
pub fn encode_frame(
    address: GaugeAddr,
    direction: Direction,
    parameter: u16,
    payload: &str,
) -> FrameBuf {
    assert!(payload.len() <= MAX_PAYLOAD_LEN, "payload longer than {} characters", MAX_PAYLOAD_LEN);
    assert!(payload.is_ascii(), "payload must be ASCII");
    assert!(parameter <= 999, "parameter number must fit three digits");

    FieldWriter::new()
        .digits(layout::ADDRESS, address.value())
        .digits(layout::DIRECTION, u16::from(direction.digit()))
        .digits(layout::PAD, 0)
        .digits(layout::PARAMETER, parameter)
        .digits(layout::DATA_LENGTH, payload.len() as u16)
        .text(payload)
        .finish()
}

/// Encodes a data request (`=?` query) for `parameter`.
pub fn encode_request(address: GaugeAddr, parameter: Parameter) -> FrameBuf {
    encode_frame(address, Direction::Request, parameter.number(), QUERY_PAYLOAD)
}

/// Encodes a control command writing `payload` to `parameter`.
///
/// # Panics
///
/// Panics if `payload` is longer than [`MAX_PAYLOAD_LEN`] characters or not ASCII.
pub fn encode_command(address: GaugeAddr, parameter: Parameter, payload: &str) -> FrameBuf {
    encode_frame(address, Direction::Control, parameter.number(), payload)
}

/// A structurally valid frame, borrowing its payload from the receive buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    pub address: u16,
    /// Direction digit as received. See [`Frame::direction`].
    pub direction_digit: u8,
    pub parameter: u16,
    /// Length field as declared by the sender. Not checked against `data` here.
    pub declared_len: u16,
    pub data: &'a str,
}

impl<'a> Frame<'a> {
    /// Validates length, termination and checksum, then extracts the fields.
    ///
    /// Sentinel payloads are returned as data; use [`decode_frame`] to have them
    /// classified as errors.
    pub fn parse(raw: &'a str) -> Result<Self, FrameError> {
        let bytes = raw.as_bytes();
        let len = bytes.len();

        if len < MIN_FRAME_LEN {
            return Err(FrameError::TooShort { len });
        }
        if bytes[len - 1] != TERMINATOR {
            return Err(FrameError::BadTermination);
        }

        let checksum_start = len - layout::TRAILER_LEN;
        let calculated = checksum_bytes(&bytes[..checksum_start]);
        let digits = &bytes[checksum_start..len - 1];
        if decode_checksum_ascii(digits) != Some(calculated) {
            let received = decode_digits_u16(digits);
            return Err(FrameError::BadChecksum { received, calculated });
        }

        if !raw.is_ascii() {
            return Err(FrameError::MalformedField { field: "data" });
        }

        let fields = FieldReader::new(raw);
        let address = fields.digits(layout::ADDRESS)?;
        let direction_digit = fields.digits(layout::DIRECTION)? as u8;
        let parameter = fields.digits(layout::PARAMETER)?;
        let declared_len = fields.digits(layout::DATA_LENGTH)?;
        let data = &raw[layout::DATA_START..checksum_start];

        Ok(Frame {
            address,
            direction_digit,
            parameter,
            declared_len,
            data,
        })
    }

    /// Direction of the frame, or `None` for digits other than 0 and 1.
    pub fn direction(&self) -> Option<Direction> {
        Direction::from_digit(self.direction_digit)
    }

    /// Known parameter this frame addresses, if any.
    pub fn known_parameter(&self) -> Option<Parameter> {
        Parameter::from_number(self.parameter)
    }
}

fn decode_digits_u16(digits: &[u8]) -> Option<u16> {
    core::str::from_utf8(digits)
        .ok()
        .and_then(parse_digits)
        .and_then(|v| u16::try_from(v).ok())
}

/// Maps a sentinel payload to the negative acknowledgment it stands for.
pub fn classify_nak(data: &str) -> Option<FrameError> {
    match data {
        NAK_UNDEFINED => Some(FrameError::UndefinedParameter),
        NAK_RANGE => Some(FrameError::OutOfRange),
        NAK_LOGIC => Some(FrameError::LogicViolation),
        _ => None,
    }
}

/// Decodes a raw response frame.
///
/// Checks run in order and the first failure wins: length, termination, checksum,
/// numeric fields. A frame whose payload is a sentinel (`NO_DEF`, `_RANGE`, `_LOGIC`)
/// decodes to the matching error instead of data.
pub fn decode_frame(raw: &str) -> Result<Frame<'_>, FrameError> {
    let frame = Frame::parse(raw)?;
    match classify_nak(frame.data) {
        Some(nak) => Err(nak),
        None => Ok(frame),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::checksum::checksum;
    use proptest::prelude::*;

    fn addr(v: u16) -> GaugeAddr {
        GaugeAddr::new(v).unwrap()
    }

    #[test]
    fn test_encode_request() {
        assert_eq!(encode_request(addr(1), Parameter::Pressure).as_str(), "0010074002=?106\r");
        assert_eq!(encode_request(addr(1), Parameter::ErrorCode).as_str().len(), 16);
    }

    #[test]
    fn test_encode_command() {
        assert_eq!(
            encode_command(addr(1), Parameter::CorrectionValue, "000150").as_str(),
            "0011074206000150027\r"
        );
        let empty = encode_command(addr(2), Parameter::PressureSetpoint, "");
        assert_eq!(empty.len(), MIN_FRAME_LEN);
        assert!(empty.starts_with("0021074100"));
    }

    #[test]
    #[should_panic]
    fn test_encode_oversized_payload_panics() {
        let payload = [b'1'; MAX_PAYLOAD_LEN + 1];
        let payload = core::str::from_utf8(&payload).unwrap();
        let _ = encode_command(addr(1), Parameter::CorrectionValue, payload);
    }

    #[test]
    fn test_encode_max_payload() {
        let payload = [b'7'; MAX_PAYLOAD_LEN];
        let payload = core::str::from_utf8(&payload).unwrap();
        let frame = encode_command(addr(999), Parameter::CorrectionValue, payload);
        assert_eq!(frame.len(), MAX_FRAME_LEN);
        assert!(frame.starts_with("999107429977"));
    }

    #[test]
    fn test_decode_known_response() {
        let frame = decode_frame("0011074006100023025\r").unwrap();
        assert_eq!(frame.address, 1);
        assert_eq!(frame.direction(), Some(Direction::Control));
        assert_eq!(frame.parameter, 740);
        assert_eq!(frame.known_parameter(), Some(Parameter::Pressure));
        assert_eq!(frame.declared_len, 6);
        assert_eq!(frame.data, "100023");
    }

    #[test]
    fn test_decode_too_short() {
        // Valid 14-byte frame minus its first character.
        let full = encode_command(addr(1), Parameter::PressureSetpoint, "");
        assert_eq!(decode_frame(&full[1..]), Err(FrameError::TooShort { len: 13 }));
        assert_eq!(decode_frame(""), Err(FrameError::TooShort { len: 0 }));
        assert!(decode_frame(&full).is_ok());
    }

    #[test]
    fn test_decode_bad_termination() {
        assert_eq!(decode_frame("0011074006100023025\n"), Err(FrameError::BadTermination));
        assert_eq!(decode_frame("0011074006100023025X"), Err(FrameError::BadTermination));
    }

    #[test]
    fn test_decode_bad_checksum() {
        assert_eq!(
            decode_frame("0011074006100023026\r"),
            Err(FrameError::BadChecksum { received: Some(26), calculated: 25 })
        );
        // Payload altered, checksum left untouched.
        assert!(matches!(
            decode_frame("0011074006100024025\r"),
            Err(FrameError::BadChecksum { .. })
        ));
        // Checksum field that is not three digits.
        assert_eq!(
            decode_frame("00110740061000230x5\r"),
            Err(FrameError::BadChecksum { received: None, calculated: 25 })
        );
        assert_eq!(
            decode_frame("0011074006100023 25\r"),
            Err(FrameError::BadChecksum { received: None, calculated: 25 })
        );
    }

    #[test]
    fn test_decode_checks_run_in_order() {
        // Short and unterminated: length wins.
        assert!(matches!(decode_frame("001107400"), Err(FrameError::TooShort { .. })));
        // Unterminated and bad checksum: termination wins.
        assert_eq!(decode_frame("0011074006100023999X"), Err(FrameError::BadTermination));
    }

    #[test]
    fn test_decode_malformed_header() {
        // Valid checksum, non-numeric address.
        let body = "0A11074006100023";
        let mut raw = FrameBuf::new();
        raw.push_str(body);
        for d in encode_checksum_ascii(checksum(body)) {
            raw.push(char::from(d));
        }
        raw.push('\r');
        assert_eq!(decode_frame(&raw), Err(FrameError::MalformedField { field: "address" }));
    }

    #[test]
    fn test_decode_sentinels() {
        assert_eq!(decode_frame("0011074206NO_DEF192\r"), Err(FrameError::UndefinedParameter));
        assert_eq!(decode_frame("0011074106_RANGE192\r"), Err(FrameError::OutOfRange));
        let logic = encode_frame(addr(1), Direction::Control, 740, NAK_LOGIC);
        assert_eq!(decode_frame(&logic), Err(FrameError::LogicViolation));
        // Frame::parse leaves sentinels as data.
        assert_eq!(Frame::parse("0011074106_RANGE192\r").unwrap().data, "_RANGE");
    }

    #[test]
    fn test_declared_length_not_cross_checked() {
        // Length field says 05 but six payload characters follow.
        let body = "0011074005100023";
        let mut raw = FrameBuf::new();
        raw.push_str(body);
        for d in encode_checksum_ascii(checksum(body)) {
            raw.push(char::from(d));
        }
        raw.push('\r');
        let frame = decode_frame(&raw).unwrap();
        assert_eq!(frame.declared_len, 5);
        assert_eq!(frame.data, "100023");
    }

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits("000"), Some(0));
        assert_eq!(parse_digits("742"), Some(742));
        assert_eq!(parse_digits(""), None);
        assert_eq!(parse_digits("+12"), None);
        assert_eq!(parse_digits(" 12"), None);
        assert_eq!(parse_digits("1234567890"), None);
    }

    proptest! {
        #[test]
        fn prop_command_round_trips(
            address in 0u16..=999,
            parameter in prop::sample::select(Parameter::ALL.to_vec()),
            payload in "[ -~]{0,99}",
        ) {
            // Sentinel payloads are decoded as errors by design.
            prop_assume!(classify_nak(&payload).is_none());
            let encoded = encode_command(addr(address), parameter, &payload);
            prop_assert_eq!(encoded.len(), MIN_FRAME_LEN + payload.len());
            let frame = decode_frame(&encoded).unwrap();
            prop_assert_eq!(frame.address, address);
            prop_assert_eq!(frame.direction(), Some(Direction::Control));
            prop_assert_eq!(frame.parameter, parameter.number());
            prop_assert_eq!(frame.declared_len as usize, payload.len());
            prop_assert_eq!(frame.data, payload.as_str());
        }

        #[test]
        fn prop_flipped_character_is_rejected(
            payload in "[0-9A-Z]{6}",
            index in 0usize..16,
            replacement in 0x20u8..0x7f,
        ) {
            let encoded = encode_command(addr(1), Parameter::CorrectionValue, &payload);
            let mut bytes: std::vec::Vec<u8> = encoded.as_bytes().to_vec();
            prop_assume!(bytes[index] != replacement);
            bytes[index] = replacement;
            let tampered = core::str::from_utf8(&bytes).unwrap();
            let rejected = matches!(decode_frame(tampered), Err(FrameError::BadChecksum { .. }));
            prop_assert!(rejected, "tampered frame accepted: {:?}", tampered);
        }
    }
}
