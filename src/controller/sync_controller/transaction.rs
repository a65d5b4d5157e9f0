// src/controller/sync_controller/transaction.rs

use super::{RawFrame, SyncController};
use crate::common::{
    address::GaugeAddr,
    error::GaugeError,
    frame::{decode_frame, Frame, FrameBuf},
    hal_traits::GaugeSerial,
    parameter::{Direction, Parameter},
};
use crate::controller::config::InvalidCharFilter;

impl<IF> SyncController<IF>
where
    IF: GaugeSerial,
{
    /// One request/response exchange.
    ///
    /// The response is read into `buffer` and decoded from there. It must come from
    /// `address`, concern `parameter` and carry the control direction digit, which gauges
    /// use for every answer. Nothing is retried.
    pub(super) fn execute_transaction<'buf>(
        &mut self,
        address: GaugeAddr,
        parameter: Parameter,
        request: &FrameBuf,
        filter_override: Option<InvalidCharFilter>,
        buffer: &'buf mut RawFrame,
    ) -> Result<Frame<'buf>, GaugeError<IF::Error>> {
        log::debug!("{} -> {:?}", parameter, request.as_str());
        self.send_request(request.as_bytes())?;
        *buffer = self.read_response(filter_override)?;

        let frame = decode_frame(buffer.as_str()).map_err(|e| {
            if e.is_nak() {
                log::debug!("gauge {} rejected parameter {}: {}", address, parameter, e);
            } else {
                log::warn!("undecodable response to parameter {}: {}", parameter, e);
            }
            GaugeError::Frame(e)
        })?;

        if frame.address != address.value()
            || frame.direction() != Some(Direction::Control)
            || frame.parameter != parameter.number()
        {
            log::warn!(
                "response {:03}/{}/{:03} does not match request {}/{}",
                frame.address,
                frame.direction_digit,
                frame.parameter,
                address,
                parameter
            );
            return Err(GaugeError::InvalidResponse);
        }

        Ok(frame)
    }
}
