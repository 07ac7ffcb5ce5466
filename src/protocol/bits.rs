//! Bit-level helpers shared by both protocol codecs.
//!
//! Frames are built and inspected as bitstrings: `String`s of `'0'`/`'1'`
//! characters, grouped into 8-bit bytes, most-significant-bit first. The
//! helpers here never know anything about a particular protocol layout.

use nom::bytes::complete::{tag, take};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitstringError {
    /// A value does not fit in the requested number of bits.
    #[error("value {value} does not fit in {width} bits")]
    ValueTooWide { value: u32, width: u32 },

    /// Requested a field wider than the helpers support.
    #[error("unsupported bit width {0}")]
    UnsupportedWidth(u32),

    /// The bitstring length is not a whole number of bytes.
    #[error("bitstring of {0} bits is not byte-aligned")]
    NotByteAligned(usize),

    /// An input element was neither a binary digit character nor a 0/1
    /// integer.
    #[error("element {value:#04x} at position {position} is not a bit")]
    NotABit { position: usize, value: u8 },
}

/// Order of bits within each byte of an encoded frame.
///
/// Frames are laid out MSB-first; the IR transport clocks bits out
/// LSB-first per byte, so [`LsbFirst`](BitOrder::LsbFirst) is what actually
/// goes on the air.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Renders `value` as a fixed-width, zero-padded binary digit string.
///
/// Unlike a bare format specifier this is an explicit contract: values that
/// do not fit in `width` bits are rejected rather than silently widening
/// the output.
pub fn to_binary(value: u32, width: u32) -> Result<String, BitstringError> {
    if width == 0 || width > 32 {
        return Err(BitstringError::UnsupportedWidth(width));
    }
    if width < 32 && value >= 1 << width {
        return Err(BitstringError::ValueTooWide { value, width });
    }
    Ok(format!("{:0width$b}", value, width = width as usize))
}

/// Reverses the bit order within each 8-bit group of `bits`.
///
/// Byte order is unchanged; only intra-byte order flips. This is the
/// transform between the MSB-first layout order and the LSB-first transmit
/// order, and it is its own inverse.
pub fn reverse_bits_per_byte(bits: &str) -> Result<String, BitstringError> {
    if bits.len() % 8 != 0 {
        return Err(BitstringError::NotByteAligned(bits.len()));
    }
    if let Some(position) = bits.bytes().position(|b| b != b'0' && b != b'1') {
        return Err(BitstringError::NotABit {
            position,
            value: bits.as_bytes()[position],
        });
    }
    let mut reversed = String::with_capacity(bits.len());
    for byte in bits.as_bytes().chunks(8) {
        reversed.extend(byte.iter().rev().map(|&b| b as char));
    }
    Ok(reversed)
}

/// Normalizes a captured bit dump into the canonical bitstring form.
///
/// Each element may be a 0/1 integer or an ASCII `'0'`/`'1'` digit, so both
/// raw capture buffers and string dumps are accepted.
pub fn parse_bits(dump: &[u8]) -> Result<String, BitstringError> {
    let mut bits = String::with_capacity(dump.len());
    for (position, &value) in dump.iter().enumerate() {
        match value {
            0 | b'0' => bits.push('0'),
            1 | b'1' => bits.push('1'),
            _ => return Err(BitstringError::NotABit { position, value }),
        }
    }
    Ok(bits)
}

/// Reads an MSB-first group of bits back into an integer value.
///
/// Callers slice out of an already-validated bitstring, so a non-binary
/// digit here is an internal error.
pub(crate) fn bits_to_u8(bits: &str) -> u8 {
    debug_assert!(bits.len() <= 8);
    bits.bytes().fold(0, |acc, b| (acc << 1) | (b - b'0'))
}

/// Consumes a fixed bit pattern from the front of `input`, mapping a
/// mismatch to the caller's field error.
pub(crate) fn expect_tag<'a, E>(
    input: &'a str,
    pattern: &'static str,
    err: E,
) -> Result<&'a str, E> {
    match tag::<_, _, nom::error::Error<&'a str>>(pattern)(input) {
        Ok((rest, _)) => Ok(rest),
        Err(_) => Err(err),
    }
}

/// Slices `count` bits off the front of `input`.
pub(crate) fn take_field<'a, E>(
    input: &'a str,
    count: usize,
    err: E,
) -> Result<(&'a str, &'a str), E> {
    match take::<_, _, nom::error::Error<&'a str>>(count)(input) {
        Ok((rest, field)) => Ok((rest, field)),
        Err(_) => Err(err),
    }
}
