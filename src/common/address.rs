// src/common/address.rs

use super::error::FrameError;
use core::convert::TryFrom;
use core::fmt;

/// Address of a gauge on the serial link.
///
/// The wire carries three decimal digits, so any value in `0..=999` is representable.
/// Point-to-point transmitters ship with address 1.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GaugeAddr(u16);

impl GaugeAddr {
    pub const DEFAULT_ADDRESS: GaugeAddr = GaugeAddr(1);
    pub const MAX: u16 = 999;

    /// Creates a new `GaugeAddr` if the value fits the 3-digit address field.
    pub fn new(address: u16) -> Result<Self, FrameError> {
        if address <= Self::MAX {
            Ok(GaugeAddr(address))
        } else {
            Err(FrameError::MalformedField { field: "address" })
        }
    }

    #[inline]
    pub const fn value(&self) -> u16 {
        self.0
    }
}

impl Default for GaugeAddr {
    fn default() -> Self {
        Self::DEFAULT_ADDRESS
    }
}

impl TryFrom<u16> for GaugeAddr {
    type Error = FrameError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GaugeAddr> for u16 {
    fn from(value: GaugeAddr) -> Self {
        value.0
    }
}

impl fmt::Display for GaugeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}
