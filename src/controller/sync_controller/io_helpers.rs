// src/controller/sync_controller/io_helpers.rs

use arrayvec::ArrayString;

use super::SyncController;
use crate::common::{error::GaugeError, frame::TERMINATOR, hal_traits::GaugeSerial};
use crate::controller::config::InvalidCharFilter;

/// Most bytes read for one response, discarded bytes included.
pub const MAX_RESPONSE_LEN: usize = 64;

/// Text of one received response, terminator included if it arrived.
pub type RawFrame = ArrayString<MAX_RESPONSE_LEN>;

/// Writes `bytes` to the port, retrying each byte while the port reports `WouldBlock`,
/// then flushes. Returns the number of bytes written.
pub fn send_frame<IF>(iface: &mut IF, bytes: &[u8]) -> Result<usize, GaugeError<IF::Error>>
where
    IF: GaugeSerial + ?Sized,
{
    for &byte in bytes {
        nb::block!(iface.write_byte(byte)).map_err(GaugeError::Io)?;
    }
    nb::block!(iface.flush()).map_err(GaugeError::Io)?;
    log::trace!("sent {} bytes", bytes.len());
    Ok(bytes.len())
}

/// Reads one response: stops after a carriage return, after [`MAX_RESPONSE_LEN`] bytes,
/// or as soon as the port has nothing more to deliver.
///
/// The result is not validated; an incomplete read comes back as the partial text and
/// is rejected by the frame decoder.
pub fn read_frame<IF>(
    iface: &mut IF,
    filter: InvalidCharFilter,
) -> Result<RawFrame, GaugeError<IF::Error>>
where
    IF: GaugeSerial + ?Sized,
{
    let mut frame = RawFrame::new();
    let mut skipped = 0usize;

    for _ in 0..MAX_RESPONSE_LEN {
        let byte = match iface.read_byte() {
            Ok(byte) => byte,
            Err(nb::Error::WouldBlock) => break,
            Err(nb::Error::Other(e)) => return Err(GaugeError::Io(e)),
        };

        if !byte.is_ascii() {
            if filter.is_enabled() {
                skipped += 1;
                continue;
            }
            return Err(GaugeError::InvalidCharacter(byte));
        }

        frame.push(char::from(byte));
        if byte == TERMINATOR {
            break;
        }
    }

    if skipped > 0 {
        log::debug!("skipped {} non-ASCII bytes", skipped);
    }
    log::trace!("received {:?}", frame.as_str());
    Ok(frame)
}

impl<IF> SyncController<IF>
where
    IF: GaugeSerial,
{
    /// Pushes the configured line settings, then writes the request.
    pub(super) fn send_request(&mut self, request: &[u8]) -> Result<(), GaugeError<IF::Error>> {
        self.interface
            .set_line(self.config.line)
            .map_err(GaugeError::Io)?;
        send_frame(&mut self.interface, request)?;
        Ok(())
    }

    pub(super) fn read_response(
        &mut self,
        filter_override: Option<InvalidCharFilter>,
    ) -> Result<RawFrame, GaugeError<IF::Error>> {
        let filter = self.config.char_filter.or_override(filter_override);
        read_frame(&mut self.interface, filter)
    }
}
