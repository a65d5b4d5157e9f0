// src/gauge/parser.rs

use crate::common::{
    error::FrameError,
    frame::{layout, Frame, QUERY_PAYLOAD},
    parameter::Direction,
};

/// What a request asks of the gauge.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RequestKind<'a> {
    /// Data request, payload `=?`.
    Query,
    /// Control command carrying the value to store.
    Command(&'a str),
}

/// A request as seen from the gauge side of the link.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Request<'a> {
    pub address: u16,
    pub parameter: u16,
    pub kind: RequestKind<'a>,
}

/// Parses a raw request frame the way a transmitter does.
///
/// Stricter than the host-side decoder: the declared length must match the payload, and
/// a data request must carry exactly `=?`. Sentinel payloads are not special here.
pub fn parse_request(raw: &str) -> Result<Request<'_>, FrameError> {
    let frame = Frame::parse(raw)?;

    if usize::from(frame.declared_len) != frame.data.len() {
        return Err(FrameError::MalformedField { field: layout::DATA_LENGTH.name });
    }

    let kind = match frame.direction() {
        Some(Direction::Request) if frame.data == QUERY_PAYLOAD => RequestKind::Query,
        Some(Direction::Request) => return Err(FrameError::MalformedField { field: "data" }),
        Some(Direction::Control) => RequestKind::Command(frame.data),
        None => return Err(FrameError::MalformedField { field: layout::DIRECTION.name }),
    };

    Ok(Request {
        address: frame.address,
        parameter: frame.parameter,
        kind,
    })
}
