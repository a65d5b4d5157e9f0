// src/lib.rs

#![no_std] // Specify no_std at the crate root

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod common;
pub mod controller;

#[cfg(any(test, feature = "sim"))]
pub mod gauge;

// Re-export key types for convenience
pub use common::{FrameError, GaugeAddr, GaugeError, GaugeSerial, LineSettings, Parameter};
pub use controller::{ControllerConfig, InvalidCharFilter, SyncController};
