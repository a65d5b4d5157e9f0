// src/controller/mod.rs

pub mod config;
pub mod sync_controller;

pub use config::{ControllerConfig, InvalidCharFilter};
pub use sync_controller::{read_frame, send_frame, RawFrame, SyncController, MAX_RESPONSE_LEN};
