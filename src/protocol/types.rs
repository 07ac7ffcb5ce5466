//! Command field types and error enums shared by both protocol variants.

use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use super::bits::BitstringError;

/// A field value handed to a command constructor was outside its domain.
///
/// These are caller errors: nothing is coerced, the command is simply not
/// built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidParameter {
    #[error("temperature {0} is outside {min}..={max} degrees C", min = Temperature::MIN, max = Temperature::MAX)]
    TemperatureOutOfRange(u8),

    #[error("fan speed {0} is outside 1..=4")]
    FanSpeedOutOfRange(u8),
}

/// The bit sequence handed to decode is not a valid frame of the protocol.
///
/// Every variant names the offending region so a bad capture can be
/// pinpointed. Checksum mismatches are deliberately absent: they are
/// reported through [`ChecksumStatus`], not raised.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("frame is {actual} bits, expected {expected}")]
    Length { expected: usize, actual: usize },

    #[error("wrong header")]
    Header,

    #[error("wrong footer")]
    Footer,

    #[error("unrecognized power byte")]
    PowerByte,

    #[error("unrecognized hvac mode code")]
    HvacMode,

    #[error("wrong temperature byte")]
    Temperature,

    #[error("fan code out of range")]
    Fan,

    #[error("vane code out of range")]
    Vane,

    #[error("wrong timer mode byte")]
    TimerMode,

    #[error("reserved bits are not zero")]
    ReservedBits,

    #[error(transparent)]
    Bitstring(#[from] BitstringError),
}

/// Operating mode of the unit. Wire codes differ per protocol (and SG14D
/// codes it twice, differently), so each codec maps this to its own bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum HvacMode {
    Heat,
    Dry,
    Cold,
    Auto,
    Fan,
}

/// Target temperature in whole degrees C, 16..=31 on both protocols.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Temperature(u8);

impl Temperature {
    pub const MIN: u8 = 16;
    pub const MAX: u8 = 31;

    pub fn new(celsius: u8) -> Result<Self, InvalidParameter> {
        if (Self::MIN..=Self::MAX).contains(&celsius) {
            Ok(Self(celsius))
        } else {
            Err(InvalidParameter::TemperatureOutOfRange(celsius))
        }
    }

    pub fn celsius(self) -> u8 {
        self.0
    }

    /// 4-bit wire code, offset from the bottom of the range.
    pub(crate) fn wire_code(self) -> u8 {
        self.0 - Self::MIN
    }

    /// Rebuilds a temperature from its 4-bit wire code. Any 4-bit code maps
    /// into the valid range, so this cannot fail.
    pub(crate) fn from_wire(code: u8) -> Self {
        debug_assert!(code < 16);
        Self(Self::MIN + code)
    }
}

/// Outcome of checksum verification on decode.
///
/// A bad checksum never aborts decoding: all other fields are still
/// extracted so a possibly-corrupted capture can be inspected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum ChecksumStatus {
    #[strum(serialize = "check_OK")]
    Ok,
    #[strum(serialize = "check_BAD")]
    Bad,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn temperature_bounds() {
        assert_eq!(Temperature::new(16).unwrap().celsius(), 16);
        assert_eq!(Temperature::new(31).unwrap().wire_code(), 15);
        assert_eq!(
            Temperature::new(15),
            Err(InvalidParameter::TemperatureOutOfRange(15))
        );
        assert_eq!(
            Temperature::new(32),
            Err(InvalidParameter::TemperatureOutOfRange(32))
        );
    }

    #[test]
    fn mode_tokens_round_trip() {
        for mode in HvacMode::iter() {
            assert_eq!(HvacMode::from_str(&mode.to_string()), Ok(mode));
        }
        assert!(HvacMode::from_str("colder").is_err());
    }

    #[test]
    fn checksum_status_display() {
        assert_eq!(ChecksumStatus::Ok.to_string(), "check_OK");
        assert_eq!(ChecksumStatus::Bad.to_string(), "check_BAD");
    }
}
