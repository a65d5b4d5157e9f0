//! Parameter registry and direction codes of the gauge protocol.

use core::fmt;

/// Direction digit of a frame.
///
/// Requests carry `0` (data request) or `1` (control command). Gauges answer every
/// request, read or write, with direction `1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    /// Data request (`00` action field), payload `=?`.
    Request = 0,
    /// Control command (`10` action field) and every gauge reply.
    Control = 1,
}

impl Direction {
    pub const fn digit(self) -> u8 {
        self as u8
    }

    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(Direction::Request),
            1 => Some(Direction::Control),
            _ => None,
        }
    }
}

/// Parameter numbers this library knows how to read or write.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parameter {
    /// `303`: transmitter error state.
    ErrorCode,
    /// `312`: firmware version.
    SoftwareVersion,
    /// `349`: gauge model code.
    GaugeType,
    /// `740`: measured pressure.
    Pressure,
    /// `741`: vacuum setpoint (signal processing regime).
    PressureSetpoint,
    /// `742`: gas correction factor.
    CorrectionValue,
}

impl Parameter {
    pub const ALL: [Parameter; 6] = [
        Parameter::ErrorCode,
        Parameter::SoftwareVersion,
        Parameter::GaugeType,
        Parameter::Pressure,
        Parameter::PressureSetpoint,
        Parameter::CorrectionValue,
    ];

    /// The 3-digit number carried on the wire.
    pub const fn number(self) -> u16 {
        match self {
            Parameter::ErrorCode => 303,
            Parameter::SoftwareVersion => 312,
            Parameter::GaugeType => 349,
            Parameter::Pressure => 740,
            Parameter::PressureSetpoint => 741,
            Parameter::CorrectionValue => 742,
        }
    }

    pub fn from_number(number: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.number() == number)
    }

    /// Width of the payload a control command for this parameter carries,
    /// or `None` for parameters that are read-only.
    pub const fn write_width(self) -> Option<usize> {
        match self {
            Parameter::PressureSetpoint => Some(3),
            Parameter::CorrectionValue => Some(6),
            _ => None,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.number())
    }
}
