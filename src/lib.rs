//! mitsu_ir
//!
//! Reverse-engineered IR remote-control protocols for some Mitsubishi air
//! conditioners. Two remotes are supported, each with its own frame layout:
//! the 17-byte W001CP and the 18-byte SG14D.
//!
//! This is a pure codec: commands go in, bitstrings come out, and captured
//! bitstrings decode back into fields. There is no code to drive an IR LED
//! here. Frames are modulated NEC-style on a 38 kHz carrier; the pulse and
//! gap durations a transmitter needs are published as constants in
//! [`protocol::timings`], along with each protocol's required repeat count.
//!
//! ## General Usage
//!
//! Build and encode a command:
//!
//! ```
//! use mitsu_ir::protocol::{w001cp, BitOrder, HvacMode};
//!
//! let command = w001cp::Command::new(true, HvacMode::Cold, 24, 3, w001cp::Vane::Auto).unwrap();
//!
//! // Layout order: bytes read the way the protocol documents them.
//! let bits = command.encode(BitOrder::MsbFirst).unwrap();
//! assert_eq!(bits.len(), w001cp::FRAME_BITS);
//!
//! // Transmit order: the IR transport clocks each byte out LSB-first.
//! let on_air = command.encode(BitOrder::LsbFirst).unwrap();
//! assert_eq!(on_air, mitsu_ir::protocol::reverse_bits_per_byte(&bits).unwrap());
//! ```
//!
//! Decode a captured frame (already normalized to layout order):
//!
//! ```
//! use mitsu_ir::protocol::{sg14d, BitOrder, ChecksumStatus, HvacMode};
//! use chrono::NaiveTime;
//!
//! let command = sg14d::Command::default();
//! let bits = command
//!     .encode_at(NaiveTime::from_hms_opt(15, 53, 0).unwrap(), BitOrder::MsbFirst)
//!     .unwrap();
//!
//! let frame = sg14d::Frame::parse(&bits).unwrap();
//! assert_eq!(frame.hvac_mode, HvacMode::Cold);
//! assert_eq!(frame.temperature.celsius(), 24);
//!
//! // A corrupted checksum never hides the rest of the capture:
//! let mut corrupted = bits.into_bytes();
//! corrupted[143] ^= 1;
//! let frame = sg14d::Frame::parse_bits(&corrupted).unwrap();
//! assert_eq!(frame.checksum, ChecksumStatus::Bad);
//! ```

pub mod protocol;

#[doc(inline)]
pub use protocol::*;
