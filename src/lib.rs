//! Decoding of EnOcean D2-50 heat recovery ventilation telegrams.
//!
//! ```
//! use enocean_hrv_tools::channels::{self, ChannelValue, State};
//! use enocean_hrv_tools::d2_50::Telegram;
//!
//! let payload = [0x4B, 0x03, 0x00, 0x2B, 0x00, 0x87, 0x38];
//! let telegram = Telegram::new(&payload);
//! let state = channels::resolve("supply-air-flap-position", &telegram).unwrap();
//! assert_eq!(state, State::Value(ChannelValue::OpenClosed(true)));
//! ```

pub mod bits;
pub mod channels;
pub mod commands;
pub mod d2_50;
pub mod erp1;
pub mod error;
pub mod output;

pub use error::DecodeError;
