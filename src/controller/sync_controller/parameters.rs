// src/controller/sync_controller/parameters.rs

use super::{RawFrame, SyncController};
use crate::common::{
    address::GaugeAddr,
    error::GaugeError,
    frame::{encode_command, encode_request},
    hal_traits::GaugeSerial,
    parameter::Parameter,
    types::{self, ErrorCode, GaugeType, SoftwareVersion},
};
use crate::controller::config::InvalidCharFilter;

impl<IF> SyncController<IF>
where
    IF: GaugeSerial,
{
    // --- Reads ---

    /// Reads the transmitter's error state (parameter 303).
    pub fn read_error_code(
        &mut self,
        address: GaugeAddr,
        filter: Option<InvalidCharFilter>,
    ) -> Result<ErrorCode, GaugeError<IF::Error>> {
        let mut buffer = RawFrame::new();
        let data = self.read_parameter(address, Parameter::ErrorCode, filter, &mut buffer)?;
        ErrorCode::from_payload(data).ok_or(GaugeError::UnexpectedValue)
    }

    /// Reads the firmware version (parameter 312).
    pub fn read_software_version(
        &mut self,
        address: GaugeAddr,
        filter: Option<InvalidCharFilter>,
    ) -> Result<SoftwareVersion, GaugeError<IF::Error>> {
        let mut buffer = RawFrame::new();
        let data = self.read_parameter(address, Parameter::SoftwareVersion, filter, &mut buffer)?;
        Ok(SoftwareVersion::parse(data)?)
    }

    /// Reads the transmitter model (parameter 349).
    pub fn read_gauge_type(
        &mut self,
        address: GaugeAddr,
        filter: Option<InvalidCharFilter>,
    ) -> Result<GaugeType, GaugeError<IF::Error>> {
        let mut buffer = RawFrame::new();
        let data = self.read_parameter(address, Parameter::GaugeType, filter, &mut buffer)?;
        GaugeType::from_code(data).ok_or(GaugeError::UnrecognizedType)
    }

    /// Reads the measured pressure in bar (parameter 740).
    pub fn read_pressure(
        &mut self,
        address: GaugeAddr,
        filter: Option<InvalidCharFilter>,
    ) -> Result<f64, GaugeError<IF::Error>> {
        let mut buffer = RawFrame::new();
        let data = self.read_parameter(address, Parameter::Pressure, filter, &mut buffer)?;
        Ok(types::decode_pressure(data)?)
    }

    /// Reads the correction factor (parameter 742).
    pub fn read_correction_value(
        &mut self,
        address: GaugeAddr,
        filter: Option<InvalidCharFilter>,
    ) -> Result<f64, GaugeError<IF::Error>> {
        let mut buffer = RawFrame::new();
        let data = self.read_parameter(address, Parameter::CorrectionValue, filter, &mut buffer)?;
        Ok(types::decode_correction(data)?)
    }

    // --- Writes ---

    /// Switches the pressure setpoint (parameter 741).
    ///
    /// Gauges accept 0 and 1 and answer anything else with `_RANGE`, surfaced as
    /// [`FrameError::OutOfRange`](crate::common::FrameError::OutOfRange).
    pub fn write_pressure_setpoint(
        &mut self,
        address: GaugeAddr,
        value: u8,
        filter: Option<InvalidCharFilter>,
    ) -> Result<(), GaugeError<IF::Error>> {
        let payload = types::encode_setpoint(value);
        self.write_parameter(address, Parameter::PressureSetpoint, &payload, filter)
    }

    /// Writes the correction factor (parameter 742), rounded to two decimals.
    ///
    /// Fails with [`GaugeError::Unencodable`] without touching the port if the value is
    /// negative, not finite, or too large for the six-digit field.
    pub fn write_correction_value(
        &mut self,
        address: GaugeAddr,
        value: f64,
        filter: Option<InvalidCharFilter>,
    ) -> Result<(), GaugeError<IF::Error>> {
        let payload = types::encode_correction(value).ok_or(GaugeError::Unencodable)?;
        self.write_parameter(address, Parameter::CorrectionValue, &payload, filter)
    }

    // --- Shared steps ---

    fn read_parameter<'buf>(
        &mut self,
        address: GaugeAddr,
        parameter: Parameter,
        filter: Option<InvalidCharFilter>,
        buffer: &'buf mut RawFrame,
    ) -> Result<&'buf str, GaugeError<IF::Error>> {
        let request = encode_request(address, parameter);
        let frame = self.execute_transaction(address, parameter, &request, filter, buffer)?;
        Ok(frame.data)
    }

    /// Sends a control command and requires the gauge to echo the payload back.
    fn write_parameter(
        &mut self,
        address: GaugeAddr,
        parameter: Parameter,
        payload: &str,
        filter: Option<InvalidCharFilter>,
    ) -> Result<(), GaugeError<IF::Error>> {
        let command = encode_command(address, parameter, payload);
        let mut buffer = RawFrame::new();
        let frame = self.execute_transaction(address, parameter, &command, filter, &mut buffer)?;
        if frame.data != payload {
            log::warn!("parameter {} acknowledged {:?}, sent {:?}", parameter, frame.data, payload);
            return Err(GaugeError::AcknowledgmentMismatch);
        }
        Ok(())
    }
}
