// src/gauge/sim.rs

use core::convert::Infallible;

use heapless::{Deque, Vec};

use super::parser::{parse_request, RequestKind};
use crate::common::{
    address::GaugeAddr,
    error::GaugeError,
    frame::{encode_frame, parse_digits, FrameBuf, MAX_FRAME_LEN, NAK_LOGIC, NAK_RANGE, NAK_UNDEFINED},
    hal_traits::GaugeSerial,
    line::LineSettings,
    parameter::{Direction, Parameter},
    types::{self, ErrorCode, GaugeType, Payload, SoftwareVersion},
};

/// Number of `0xFF` bytes a noisy gauge sends ahead of each answer.
pub const NOISE_LEN: usize = 40;

const OUTPUT_CAPACITY: usize = 256;

/// A PPT 100 transmitter on the other end of a [`GaugeSerial`] link.
///
/// Bytes written to it are collected until a carriage return, then handled as one request.
/// The answer is queued for reading. Frames a real transmitter would ignore (bad checksum,
/// other address, wrong length field) produce no answer at all, and nothing can be read
/// while the port's line settings differ from the gauge's.
#[derive(Debug)]
pub struct SimulatedGauge {
    address: GaugeAddr,
    error_code: ErrorCode,
    version: SoftwareVersion,
    gauge_type: GaugeType,
    pressure: Payload,
    correction: Payload,
    setpoint: u8,
    noise: bool,
    line: LineSettings,
    port_line: LineSettings,
    input: Vec<u8, MAX_FRAME_LEN>,
    output: Deque<u8, OUTPUT_CAPACITY>,
}

impl Default for SimulatedGauge {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedGauge {
    /// Gauge at address 1 reading 1 bar, no error, firmware 1.1.0, correction 1.0.
    pub fn new() -> Self {
        SimulatedGauge {
            address: GaugeAddr::default(),
            error_code: ErrorCode::NoError,
            version: SoftwareVersion { major: 1, minor: 1, sub_minor: 0 },
            gauge_type: GaugeType::Ppt100,
            pressure: payload("100023"),
            correction: payload("000100"),
            setpoint: 0,
            noise: false,
            line: LineSettings::FACTORY,
            port_line: LineSettings::FACTORY,
            input: Vec::new(),
            output: Deque::new(),
        }
    }

    pub fn with_address(mut self, address: GaugeAddr) -> Self {
        self.address = address;
        self
    }

    pub fn with_error_code(mut self, error_code: ErrorCode) -> Self {
        self.error_code = error_code;
        self
    }

    pub fn with_version(mut self, version: SoftwareVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_gauge_type(mut self, gauge_type: GaugeType) -> Self {
        self.gauge_type = gauge_type;
        self
    }

    /// Prefix every answer with [`NOISE_LEN`] bytes of `0xFF`, as some transmitters do.
    pub fn with_noise(mut self, noise: bool) -> Self {
        self.noise = noise;
        self
    }

    /// Line settings the gauge itself is configured for.
    pub fn with_line(mut self, line: LineSettings) -> Self {
        self.line = line;
        self
    }

    pub fn set_pressure(&mut self, bar: f64) -> Result<(), GaugeError<Infallible>> {
        self.pressure = types::encode_pressure(bar).ok_or(GaugeError::Unencodable)?;
        Ok(())
    }

    pub fn set_error_code(&mut self, error_code: ErrorCode) {
        self.error_code = error_code;
    }

    pub fn setpoint(&self) -> u8 {
        self.setpoint
    }

    /// Stored correction payload, six digits.
    pub fn correction_payload(&self) -> &str {
        &self.correction
    }

    /// Bytes queued for the host.
    pub fn pending(&self) -> usize {
        self.output.len()
    }

    fn handle(&mut self, raw: &str) -> Option<FrameBuf> {
        let request = match parse_request(raw) {
            Ok(request) => request,
            Err(e) => {
                log::trace!("gauge ignoring {:?}: {}", raw, e);
                return None;
            }
        };
        if request.address != self.address.value() {
            return None;
        }

        let data = match request.kind {
            RequestKind::Query => self.read_value(request.parameter),
            RequestKind::Command(data) => self.write_value(request.parameter, data),
        };
        Some(encode_frame(self.address, Direction::Control, request.parameter, &data))
    }

    fn read_value(&self, number: u16) -> Payload {
        match Parameter::from_number(number) {
            Some(Parameter::ErrorCode) => payload(self.error_code.payload()),
            Some(Parameter::SoftwareVersion) => self.version.payload(),
            Some(Parameter::GaugeType) => payload(self.gauge_type.code()),
            Some(Parameter::Pressure) => self.pressure,
            Some(Parameter::CorrectionValue) => self.correction,
            Some(Parameter::PressureSetpoint) | None => payload(NAK_UNDEFINED),
        }
    }

    fn write_value(&mut self, number: u16, data: &str) -> Payload {
        let Some(parameter) = Parameter::from_number(number) else {
            return payload(NAK_UNDEFINED);
        };
        let Some(width) = parameter.write_width() else {
            return payload(NAK_LOGIC);
        };
        if data.len() != width {
            return payload(NAK_UNDEFINED);
        }
        let Some(value) = parse_digits(data) else {
            return payload(NAK_UNDEFINED);
        };

        match parameter {
            Parameter::PressureSetpoint if value > 1 => return payload(NAK_RANGE),
            Parameter::PressureSetpoint => self.setpoint = value as u8,
            _ => self.correction = payload(data),
        }
        payload(data)
    }

    fn queue(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.output.push_back(byte).is_err() {
                log::warn!("gauge output queue full, answer truncated");
                return;
            }
        }
    }
}

fn payload(text: &str) -> Payload {
    Payload::from(text).unwrap_or_default()
}

impl GaugeSerial for SimulatedGauge {
    type Error = Infallible;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        if self.port_line != self.line {
            return Err(nb::Error::WouldBlock);
        }
        self.output.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if self.input.push(byte).is_err() {
            // Longer than any frame: drop it, and resynchronise on the next terminator.
            self.input.clear();
            return Ok(());
        }
        if byte != b'\r' {
            return Ok(());
        }

        let request = core::str::from_utf8(&self.input)
            .ok()
            .and_then(|raw| FrameBuf::from(raw).ok());
        self.input.clear();

        if let Some(answer) = request.and_then(|raw| self.handle(&raw)) {
            if self.noise {
                self.queue(&[0xFF; NOISE_LEN]);
            }
            self.queue(answer.as_bytes());
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        Ok(())
    }

    fn set_line(&mut self, line: LineSettings) -> Result<(), Self::Error> {
        self.port_line = line;
        Ok(())
    }
}
