// src/common/types.rs

use arrayvec::ArrayString;
use core::fmt;

use super::error::FrameError;
use super::frame::parse_digits;

/// Widest payload any known parameter carries.
pub const VALUE_WIDTH: usize = 6;

/// A formatted parameter payload.
pub type Payload = ArrayString<VALUE_WIDTH>;

// --- Error state (parameter 303) ---

/// Low-level error state of the transmitter.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    NoError,
    DefectiveTransmitter,
    DefectiveMemory,
}

impl ErrorCode {
    pub fn from_payload(data: &str) -> Option<Self> {
        match data {
            "000000" => Some(ErrorCode::NoError),
            "Err001" => Some(ErrorCode::DefectiveTransmitter),
            "Err002" => Some(ErrorCode::DefectiveMemory),
            _ => None,
        }
    }

    pub const fn payload(self) -> &'static str {
        match self {
            ErrorCode::NoError => "000000",
            ErrorCode::DefectiveTransmitter => "Err001",
            ErrorCode::DefectiveMemory => "Err002",
        }
    }
}

// --- Gauge model (parameter 349) ---

/// Transmitter models, identified by a space-padded 6-character code.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GaugeType {
    Cpt100,
    Rpt100,
    Ppt100,
    Hpt100,
    Mpt100,
}

impl GaugeType {
    pub const ALL: [GaugeType; 5] = [
        GaugeType::Cpt100,
        GaugeType::Rpt100,
        GaugeType::Ppt100,
        GaugeType::Hpt100,
        GaugeType::Mpt100,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            GaugeType::Cpt100 => "    A1",
            GaugeType::Rpt100 => "    A2",
            GaugeType::Ppt100 => "    A3",
            GaugeType::Hpt100 => "    A4",
            GaugeType::Mpt100 => "    A5",
        }
    }

    /// Canonical model name, e.g. `"PPT 100"`.
    pub const fn name(self) -> &'static str {
        match self {
            GaugeType::Cpt100 => "CPT 100",
            GaugeType::Rpt100 => "RPT 100",
            GaugeType::Ppt100 => "PPT 100",
            GaugeType::Hpt100 => "HPT 100",
            GaugeType::Mpt100 => "MPT 100",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }
}

impl fmt::Display for GaugeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// --- Firmware version (parameter 312) ---

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SoftwareVersion {
    pub major: u8,
    pub minor: u8,
    pub sub_minor: u8,
}

impl SoftwareVersion {
    /// Parses the `MMmmss` payload.
    pub fn parse(data: &str) -> Result<Self, FrameError> {
        const MALFORMED: FrameError = FrameError::MalformedField { field: "version" };
        if data.len() != VALUE_WIDTH {
            return Err(MALFORMED);
        }
        let part = |range: core::ops::Range<usize>| {
            data.get(range)
                .and_then(parse_digits)
                .map(|v| v as u8)
                .ok_or(MALFORMED)
        };
        Ok(SoftwareVersion {
            major: part(0..2)?,
            minor: part(2..4)?,
            sub_minor: part(4..6)?,
        })
    }

    pub fn as_tuple(&self) -> (u8, u8, u8) {
        (self.major, self.minor, self.sub_minor)
    }

    /// Formats the `MMmmss` payload. Parts above 99 keep their last two digits.
    pub fn payload(&self) -> Payload {
        let mut payload = Payload::new();
        for part in [self.major, self.minor, self.sub_minor] {
            push_padded(&mut payload, u32::from(part), 2);
        }
        payload
    }
}

impl fmt::Display for SoftwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}.{:02}", self.major, self.minor, self.sub_minor)
    }
}

// --- Pressure (parameter 740) ---

/// Offset applied to the 2-digit exponent field.
pub const PRESSURE_EXPONENT_BIAS: i32 = 26;

/// Multiplies `value` by 10^`exp` using exact powers of ten where possible.
fn scale_pow10(value: f64, exp: i32) -> f64 {
    let mut factor = 1.0f64;
    for _ in 0..exp.unsigned_abs() {
        factor *= 10.0;
    }
    if exp >= 0 {
        value * factor
    } else {
        value / factor
    }
}

/// Decodes a `mmmmee` pressure payload into bar: `mmmm * 10^(ee - 26)`.
pub fn decode_pressure(data: &str) -> Result<f64, FrameError> {
    const MALFORMED: FrameError = FrameError::MalformedField { field: "pressure" };
    if data.len() != VALUE_WIDTH {
        return Err(MALFORMED);
    }
    let mantissa = data.get(0..4).and_then(parse_digits).ok_or(MALFORMED)?;
    let exponent = data.get(4..6).and_then(parse_digits).ok_or(MALFORMED)?;
    Ok(scale_pow10(f64::from(mantissa), exponent as i32 - PRESSURE_EXPONENT_BIAS))
}

/// Encodes a pressure in bar as a `mmmmee` payload with a 4-digit normalised mantissa.
///
/// Returns `None` for negative or non-finite values and for magnitudes the exponent
/// field cannot reach.
pub fn encode_pressure(bar: f64) -> Option<Payload> {
    if !bar.is_finite() || bar < 0.0 {
        return None;
    }
    let mut payload = Payload::new();
    if bar == 0.0 {
        payload.push_str("000000");
        return Some(payload);
    }

    let mut mantissa = bar;
    let mut exponent = PRESSURE_EXPONENT_BIAS;
    while mantissa >= 9999.5 {
        mantissa /= 10.0;
        exponent += 1;
    }
    while mantissa < 999.5 {
        mantissa *= 10.0;
        exponent -= 1;
    }
    if !(0..=99).contains(&exponent) {
        return None;
    }
    push_padded(&mut payload, round_half_up(mantissa), 4);
    push_padded(&mut payload, exponent as u32, 2);
    Some(payload)
}

// --- Correction value (parameter 742) ---

/// Decodes the correction factor: payload integer with two implied decimals.
pub fn decode_correction(data: &str) -> Result<f64, FrameError> {
    parse_digits(data)
        .map(|v| f64::from(v) / 100.0)
        .ok_or(FrameError::MalformedField { field: "correction" })
}

/// Encodes a correction factor as `round(value * 100)`, 6 digits zero-padded.
///
/// Returns `None` if the scaled value is negative, non-finite, or needs more than 6 digits.
pub fn encode_correction(value: f64) -> Option<Payload> {
    let scaled = value * 100.0;
    if !scaled.is_finite() || scaled < 0.0 || scaled >= 999_999.5 {
        return None;
    }
    let mut payload = Payload::new();
    push_padded(&mut payload, round_half_up(scaled), VALUE_WIDTH);
    Some(payload)
}

// --- Pressure setpoint (parameter 741) ---

/// Encodes a setpoint as the 3-digit field the gauge expects. Only 0 and 1 are accepted
/// by the device; other values are still encodable so the device can reject them.
pub fn encode_setpoint(value: u8) -> Payload {
    let mut payload = Payload::new();
    push_padded(&mut payload, u32::from(value), 3);
    payload
}

fn round_half_up(value: f64) -> u32 {
    (value + 0.5) as u32
}

fn push_padded(out: &mut Payload, value: u32, width: usize) {
    let mut divisor = 10u32.pow(width as u32 - 1);
    for _ in 0..width {
        out.push(char::from(b'0' + ((value / divisor) % 10) as u8));
        divisor /= 10;
    }
}
