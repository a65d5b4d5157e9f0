// src/controller/sync_controller/mod.rs

mod io_helpers;
mod parameters;
mod transaction;

pub use io_helpers::{read_frame, send_frame, RawFrame, MAX_RESPONSE_LEN};

use super::config::{ControllerConfig, InvalidCharFilter};
use crate::common::hal_traits::GaugeSerial;

/// Host side of the gauge protocol, for SYNCHRONOUS operation.
///
/// Owns the transport and the exchange settings. Every operation is one
/// request/response round trip; nothing is retried.
#[derive(Debug)]
pub struct SyncController<IF>
where
    IF: GaugeSerial,
{
    interface: IF,
    config: ControllerConfig,
}

impl<IF> SyncController<IF>
where
    IF: GaugeSerial,
{
    pub fn new(interface: IF) -> Self {
        Self::with_config(interface, ControllerConfig::default())
    }

    pub fn with_config(interface: IF, config: ControllerConfig) -> Self {
        SyncController { interface, config }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ControllerConfig {
        &mut self.config
    }

    /// Skip non-ASCII bytes in responses unless a call says otherwise.
    pub fn enable_char_filter(&mut self) {
        self.config.char_filter = InvalidCharFilter::Enabled;
    }

    /// Fail on non-ASCII bytes in responses unless a call says otherwise.
    pub fn disable_char_filter(&mut self) {
        self.config.char_filter = InvalidCharFilter::Disabled;
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    /// Gives the transport back.
    pub fn release(self) -> IF {
        self.interface
    }
}
