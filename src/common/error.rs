// src/common/error.rs

use core::fmt;

/// Failures of the frame codec itself. None of these involve I/O, so the decoder can
/// return them without knowing anything about the transport.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Fewer characters than the smallest possible frame (14).
    #[error("Frame too short: {len} characters")]
    TooShort { len: usize },

    /// Last character is not a carriage return.
    #[error("Frame not terminated by carriage return")]
    BadTermination,

    /// Checksum digits disagree with the sum over the frame. `received` is `None` when
    /// the checksum field does not hold three digits.
    #[error("Checksum mismatch: received {}, calculated {calculated:03}", ReceivedChecksum(.received))]
    BadChecksum { received: Option<u16>, calculated: u8 },

    /// A fixed-width numeric field did not hold digits.
    #[error("Malformed {field} field")]
    MalformedField { field: &'static str },

    /// Device answered `NO_DEF`: parameter number unknown to it.
    #[error("Undefined parameter number")]
    UndefinedParameter,

    /// Device answered `_RANGE`: data out of range.
    #[error("Data out of range")]
    OutOfRange,

    /// Device answered `_LOGIC`: write rejected by its access rules.
    #[error("Logic access violation")]
    LogicViolation,
}

struct ReceivedChecksum<'a>(&'a Option<u16>);

impl fmt::Display for ReceivedChecksum<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{:03}", value),
            None => f.write_str("non-numeric"),
        }
    }
}

impl FrameError {
    /// True for the negative acknowledgments a device sends inside an otherwise
    /// well-formed frame.
    pub fn is_nak(&self) -> bool {
        matches!(
            self,
            FrameError::UndefinedParameter | FrameError::OutOfRange | FrameError::LogicViolation
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GaugeError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the transport.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// Non-ASCII byte received while the invalid-character filter was disabled.
    #[error("Invalid character received: {0:#04x}")]
    InvalidCharacter(u8),

    /// The response frame failed validation or carried a negative acknowledgment.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Response address, direction or parameter does not match the request.
    #[error("Invalid response from gauge")]
    InvalidResponse,

    /// Payload well formed but not one of the known values for the parameter.
    #[error("Unexpected value from gauge")]
    UnexpectedValue,

    /// Gauge type code not in the model table.
    #[error("Unrecognized gauge type")]
    UnrecognizedType,

    /// A write was answered with a payload different from the one sent.
    #[error("Invalid acknowledgment from gauge")]
    AcknowledgmentMismatch,

    /// Value cannot be represented in the parameter's payload field.
    #[error("Value cannot be encoded for this parameter")]
    Unencodable,
}

impl<E: core::fmt::Debug> GaugeError<E> {
    /// The codec failure behind this error, if there is one.
    pub fn frame_error(&self) -> Option<FrameError> {
        match self {
            GaugeError::Frame(e) => Some(*e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[derive(Debug)]
    struct MockIoError;

    #[test]
    fn test_nak_classification() {
        assert!(FrameError::UndefinedParameter.is_nak());
        assert!(FrameError::OutOfRange.is_nak());
        assert!(FrameError::LogicViolation.is_nak());
        assert!(!FrameError::BadTermination.is_nak());
        assert!(!FrameError::TooShort { len: 3 }.is_nak());
    }

    #[test]
    fn test_frame_error_conversion() {
        let err: GaugeError<MockIoError> = FrameError::OutOfRange.into();
        assert_eq!(err.frame_error(), Some(FrameError::OutOfRange));
        let io: GaugeError<MockIoError> = GaugeError::Io(MockIoError);
        assert_eq!(io.frame_error(), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            FrameError::BadChecksum { received: Some(14), calculated: 15 }.to_string(),
            "Checksum mismatch: received 014, calculated 015"
        );
        assert_eq!(
            FrameError::BadChecksum { received: None, calculated: 25 }.to_string(),
            "Checksum mismatch: received non-numeric, calculated 025"
        );
        let err: GaugeError = GaugeError::InvalidCharacter(0xff);
        assert_eq!(err.to_string(), "Invalid character received: 0xff");
        let wrapped: GaugeError = FrameError::BadTermination.into();
        assert_eq!(wrapped.to_string(), "Frame not terminated by carriage return");
    }
}
