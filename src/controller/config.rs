// src/controller/config.rs

use crate::common::line::LineSettings;

/// What the frame reader does with bytes that are not 7-bit ASCII.
///
/// Some transmitters prepend runs of `0xFF` to their answers. With the filter enabled
/// those bytes are skipped; with it disabled the first one aborts the read.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidCharFilter {
    #[default]
    Disabled,
    Enabled,
}

impl InvalidCharFilter {
    #[inline]
    pub const fn is_enabled(self) -> bool {
        matches!(self, InvalidCharFilter::Enabled)
    }

    /// The per-call override if one was given, otherwise `self`.
    #[inline]
    pub fn or_override(self, call_override: Option<InvalidCharFilter>) -> InvalidCharFilter {
        call_override.unwrap_or(self)
    }
}

impl From<bool> for InvalidCharFilter {
    fn from(enabled: bool) -> Self {
        if enabled {
            InvalidCharFilter::Enabled
        } else {
            InvalidCharFilter::Disabled
        }
    }
}

/// Settings a [`SyncController`](super::SyncController) applies to every exchange.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Line settings pushed to the transport before each request.
    pub line: LineSettings,
    /// Default invalid-character policy when a call gives no override.
    pub char_filter: InvalidCharFilter,
}
