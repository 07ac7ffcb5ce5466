mod bits;

pub mod sg14d;
pub mod timings;
pub mod types;
pub mod w001cp;

pub use bits::{parse_bits, reverse_bits_per_byte, to_binary, BitOrder, BitstringError};
pub use types::{ChecksumStatus, DecodeError, HvacMode, InvalidParameter, Temperature};
