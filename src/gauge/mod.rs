// src/gauge/mod.rs

//! The transmitter's side of the link: request parsing and a simulated gauge for
//! exercising a controller without hardware.

mod parser;
mod sim;

pub use parser::{parse_request, Request, RequestKind};
pub use sim::{SimulatedGauge, NOISE_LEN};
