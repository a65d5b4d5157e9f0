// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod checksum;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod line;
pub mod parameter;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::GaugeAddr;

// From checksum.rs
pub use checksum::checksum;

// From error.rs
pub use error::{FrameError, GaugeError};

// From frame.rs
pub use frame::{
    decode_frame, encode_command, encode_frame, encode_request, Frame, FrameBuf,
    MAX_FRAME_LEN, MIN_FRAME_LEN,
};

// From hal_traits.rs
pub use hal_traits::GaugeSerial;

// From line.rs
pub use line::{LineSettings, Parity};

// From parameter.rs
pub use parameter::{Direction, Parameter};

// From types.rs
pub use types::{ErrorCode, GaugeType, SoftwareVersion};

// --- Feature-gated re-exports ---

#[cfg(feature = "std")]
pub use hal_traits::IoSerial;

#[cfg(feature = "impl-native")]
pub use hal_traits::EioSerial;
