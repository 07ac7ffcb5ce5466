//! SG14D remote protocol: 18-byte / 144-bit frames.
//!
//! Layout (MSB-first, byte index → content):
//!
//! ```text
//!  0..=4   constant header
//!  5       power (single flag bit in a fixed byte pattern)
//!  6       0 | isee | 3-bit hvac mode code | 000
//!  7       0000 | temperature - 16
//!  8       00110 | hvac mode, coded a second, different way
//!  9       2-bit beeper indicator | 3-bit vane code | 3-bit fan code
//! 10       wall-clock time, completed 10-minute intervals since midnight
//! 11..=13  start/end clocks and timer mode, not yet emitted
//! 14       econocool flag + start of the footer constant
//! 15..=16  footer constant
//! 17       checksum: sum of bytes 0..=16 mod 256
//! ```
//!
//! Byte 8 repeats the mode under a second coding; decode deliberately does
//! not re-validate it against byte 6 (a corrupted byte 8 surfaces only
//! through the checksum verdict). The beeper bits in byte 9 are `10`
//! whenever the temperature sits at either end of its range and `01`
//! otherwise; they are not an independent field.

use chrono::{Local, NaiveTime, Timelike};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, trace};

use super::bits::{
    bits_to_u8, expect_tag, parse_bits, reverse_bits_per_byte, take_field, to_binary, BitOrder,
    BitstringError,
};
use super::types::{ChecksumStatus, DecodeError, HvacMode, InvalidParameter, Temperature};

pub const PROTOCOL_BYTES: usize = 18;
pub const FRAME_BITS: usize = PROTOCOL_BYTES * 8;
/// The remote transmits every frame twice.
pub const PROTOCOL_REPEATS: usize = 2;

const HEADER: &str = concat!("00100011", "11001011", "00100110", "00000001", "00000000");
/// Bits 115..136: tail of byte 14 plus bytes 15 and 16.
const FOOTER: &str = concat!("00010", "00000000", "00000000");
const POWER_ON: &str = "00100000";
const POWER_OFF: &str = "00000000";
/// Bits covered by the checksum (bytes 0..=16).
const CHECKSUM_SPAN_BITS: usize = 136;

/// Airflow setting: automatic, one of four fixed speeds, or the low-noise
/// quiet mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum Fan {
    #[strum(serialize = "auto")]
    Auto,
    #[strum(serialize = "quiet")]
    Quiet,
    #[strum(serialize = "1")]
    F1,
    #[strum(serialize = "2")]
    F2,
    #[strum(serialize = "3")]
    F3,
    #[strum(serialize = "4")]
    F4,
}

impl Fan {
    fn wire_code(self) -> u8 {
        match self {
            Fan::Auto => 0,
            Fan::F1 => 1,
            Fan::F2 => 2,
            Fan::F3 => 3,
            Fan::F4 => 4,
            Fan::Quiet => 5,
        }
    }

    fn from_wire(code: u8) -> Result<Self, DecodeError> {
        match code {
            0 => Ok(Fan::Auto),
            1 => Ok(Fan::F1),
            2 => Ok(Fan::F2),
            3 => Ok(Fan::F3),
            4 => Ok(Fan::F4),
            5 => Ok(Fan::Quiet),
            _ => Err(DecodeError::Fan),
        }
    }
}

/// Louver position: automatic, one of five fixed angles, or continuous
/// sweeping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum Vane {
    #[strum(serialize = "auto")]
    Auto,
    #[strum(serialize = "1")]
    V1,
    #[strum(serialize = "2")]
    V2,
    #[strum(serialize = "3")]
    V3,
    #[strum(serialize = "4")]
    V4,
    #[strum(serialize = "5")]
    V5,
    #[strum(serialize = "move")]
    Move,
}

impl Vane {
    fn wire_code(self) -> u8 {
        match self {
            Vane::Auto => 0,
            Vane::V1 => 1,
            Vane::V2 => 2,
            Vane::V3 => 3,
            Vane::V4 => 4,
            Vane::V5 => 5,
            Vane::Move => 7,
        }
    }

    fn from_wire(code: u8) -> Result<Self, DecodeError> {
        match code {
            0 => Ok(Vane::Auto),
            1 => Ok(Vane::V1),
            2 => Ok(Vane::V2),
            3 => Ok(Vane::V3),
            4 => Ok(Vane::V4),
            5 => Ok(Vane::V5),
            7 => Ok(Vane::Move),
            _ => Err(DecodeError::Vane),
        }
    }
}

fn mode_bits(mode: HvacMode) -> &'static str {
    match mode {
        HvacMode::Auto => "100",
        HvacMode::Heat => "001",
        HvacMode::Dry => "010",
        HvacMode::Cold => "011",
        HvacMode::Fan => "111",
    }
}

/// Byte 8 codes the mode again under a different mapping (note the
/// collisions: auto/cold and heat/fan share codes, so it cannot be decoded
/// on its own).
fn mode_bits_redundant(mode: HvacMode) -> &'static str {
    match mode {
        HvacMode::Auto => "110",
        HvacMode::Heat => "000",
        HvacMode::Dry => "010",
        HvacMode::Cold => "110",
        HvacMode::Fan => "000",
    }
}

fn mode_from_wire(code: &str) -> Result<HvacMode, DecodeError> {
    match code {
        "100" => Ok(HvacMode::Auto),
        "001" => Ok(HvacMode::Heat),
        "010" => Ok(HvacMode::Dry),
        "011" => Ok(HvacMode::Cold),
        "111" => Ok(HvacMode::Fan),
        _ => Err(DecodeError::HvacMode),
    }
}

/// One fully specified remote command. Immutable; construct once, encode as
/// often as needed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub power: bool,
    pub hvac_mode: HvacMode,
    /// Presence-sensing ("i-see") feature flag.
    pub isee: bool,
    pub temperature: Temperature,
    pub fan: Fan,
    pub vane: Vane,
    pub econocool: bool,
}

impl Command {
    /// Builds a command, validating the ranged fields at the boundary.
    pub fn new(
        power: bool,
        hvac_mode: HvacMode,
        isee: bool,
        temperature: u8,
        fan: Fan,
        vane: Vane,
        econocool: bool,
    ) -> Result<Self, InvalidParameter> {
        Ok(Self {
            power,
            hvac_mode,
            isee,
            temperature: Temperature::new(temperature)?,
            fan,
            vane,
            econocool,
        })
    }

    /// Encodes the command, stamping the current wall-clock time into the
    /// frame's clock byte.
    pub fn encode(&self, order: BitOrder) -> Result<String, BitstringError> {
        self.encode_at(Local::now().time(), order)
    }

    /// Encodes the command with an explicit clock value. The clock is an
    /// input to encoding only; decode treats the byte as opaque.
    pub fn encode_at(
        &self,
        time_of_day: NaiveTime,
        order: BitOrder,
    ) -> Result<String, BitstringError> {
        trace!(?order, %time_of_day, "encoding SG14D command {:?}", self);
        let mut bitstring = String::with_capacity(FRAME_BITS);
        // bytes 0..=4: constant header
        bitstring.push_str(HEADER);
        // byte 5: power
        bitstring.push_str(if self.power { POWER_ON } else { POWER_OFF });
        // byte 6: isee + hvac mode
        bitstring.push('0');
        bitstring.push(if self.isee { '1' } else { '0' });
        bitstring.push_str(mode_bits(self.hvac_mode));
        bitstring.push_str("000");
        // byte 7: temperature
        bitstring.push_str("0000");
        bitstring.push_str(&to_binary(self.temperature.wire_code().into(), 4)?);
        // byte 8: hvac mode again, differently coded
        bitstring.push_str("00110");
        bitstring.push_str(mode_bits_redundant(self.hvac_mode));
        // byte 9: beeper indicator + vane + fan. The unit double-beeps at
        // the temperature extremes, single-beeps otherwise.
        let celsius = self.temperature.celsius();
        bitstring.push_str(if celsius == Temperature::MIN || celsius == Temperature::MAX {
            "10"
        } else {
            "01"
        });
        bitstring.push_str(&to_binary(self.vane.wire_code().into(), 3)?);
        bitstring.push_str(&to_binary(self.fan.wire_code().into(), 3)?);
        // byte 10: clock, completed 10-minute intervals since midnight
        let counts = time_of_day.hour() * 6 + time_of_day.minute() / 10;
        bitstring.push_str(&to_binary(counts, 8)?);
        // bytes 11..=13: start/end clocks and timer mode, not yet emitted
        bitstring.push_str(&"0".repeat(24));
        // byte 14: econocool, then the footer constant through byte 16
        bitstring.push_str(if self.econocool { "001" } else { "000" });
        bitstring.push_str(FOOTER);
        // byte 17: additive checksum over everything so far
        let checksum = additive_checksum(&bitstring)?;
        bitstring.push_str(&checksum);
        assert_eq!(
            bitstring.len(),
            FRAME_BITS,
            "assembled SG14D frame has the wrong length"
        );
        match order {
            BitOrder::MsbFirst => Ok(bitstring),
            BitOrder::LsbFirst => reverse_bits_per_byte(&bitstring),
        }
    }
}

impl Default for Command {
    fn default() -> Self {
        Self {
            power: false,
            hvac_mode: HvacMode::Cold,
            isee: false,
            temperature: Temperature::from_wire(8),
            fan: Fan::Auto,
            vane: Vane::Auto,
            econocool: false,
        }
    }
}

/// Sum of bytes 0..=16 of `frame_head` (the first 136 bits), mod 256.
fn additive_checksum(frame_head: &str) -> Result<String, BitstringError> {
    debug_assert_eq!(frame_head.len(), CHECKSUM_SPAN_BITS);
    let sum: u32 = frame_head
        .as_bytes()
        .chunks(8)
        .map(|byte| byte.iter().fold(0u32, |acc, &b| (acc << 1) | (b - b'0') as u32))
        .sum();
    to_binary(sum % 256, 8)
}

/// A decoded frame: every command field plus the checksum verdict.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub power: bool,
    pub hvac_mode: HvacMode,
    pub isee: bool,
    pub temperature: Temperature,
    pub fan: Fan,
    pub vane: Vane,
    pub econocool: bool,
    pub checksum: ChecksumStatus,
}

impl Frame {
    /// Parses a bitstring of `'0'`/`'1'` characters in MSB-first layout
    /// order. Captures taken off the air LSB-first must be run through
    /// [`reverse_bits_per_byte`] first.
    pub fn parse(dump: &str) -> Result<Self, DecodeError> {
        Self::parse_bits(dump.as_bytes())
    }

    /// Like [`Frame::parse`], but also accepts 0/1 integer elements.
    pub fn parse_bits(dump: &[u8]) -> Result<Self, DecodeError> {
        let bits = parse_bits(dump)?;
        Self::decode_layout(&bits)
    }

    fn decode_layout(bits: &str) -> Result<Self, DecodeError> {
        if bits.len() != FRAME_BITS {
            return Err(DecodeError::Length {
                expected: FRAME_BITS,
                actual: bits.len(),
            });
        }
        // bytes 0..=4
        let input = expect_tag(bits, HEADER, DecodeError::Header)?;
        // byte 5
        let (input, power_byte) = take_field(input, 8, DecodeError::PowerByte)?;
        let power = if power_byte == POWER_ON {
            true
        } else if power_byte == POWER_OFF {
            false
        } else {
            return Err(DecodeError::PowerByte);
        };
        // byte 6: reserved zero, isee, mode code, reserved zeros
        let input = expect_tag(input, "0", DecodeError::ReservedBits)?;
        let (input, isee_bit) = take_field(input, 1, DecodeError::ReservedBits)?;
        let isee = isee_bit == "1";
        let (input, mode_code) = take_field(input, 3, DecodeError::HvacMode)?;
        let hvac_mode = mode_from_wire(mode_code)?;
        let input = expect_tag(input, "000", DecodeError::ReservedBits)?;
        // byte 7
        let input = expect_tag(input, "0000", DecodeError::Temperature)?;
        let (input, temp_code) = take_field(input, 4, DecodeError::Temperature)?;
        let temperature = Temperature::from_wire(bits_to_u8(temp_code));
        // byte 8: redundant mode coding, deliberately not re-validated
        let (input, _) = take_field(input, 8, DecodeError::HvacMode)?;
        // byte 9: beeper bits are a side effect of other fields, skip them
        let (input, _) = take_field(input, 2, DecodeError::Fan)?;
        let (input, vane_code) = take_field(input, 3, DecodeError::Vane)?;
        let vane = Vane::from_wire(bits_to_u8(vane_code))?;
        let (input, fan_code) = take_field(input, 3, DecodeError::Fan)?;
        let fan = Fan::from_wire(bits_to_u8(fan_code))?;
        // byte 10: clock; bytes 11..=13: timers. Opaque here, covered only
        // by the checksum.
        let (input, _) = take_field(input, 32, DecodeError::Footer)?;
        // byte 14: two unchecked bits, econocool, then the footer constant
        let (input, _) = take_field(input, 2, DecodeError::Footer)?;
        let (input, econocool_bit) = take_field(input, 1, DecodeError::Footer)?;
        let econocool = econocool_bit == "1";
        let input = expect_tag(input, FOOTER, DecodeError::Footer)?;
        // byte 17: verify, never abort
        let expected = additive_checksum(&bits[..CHECKSUM_SPAN_BITS])?;
        let checksum = if input == expected {
            ChecksumStatus::Ok
        } else {
            ChecksumStatus::Bad
        };
        debug!(%checksum, "decoded SG14D frame");
        Ok(Self {
            power,
            hvac_mode,
            isee,
            temperature,
            fan,
            vane,
            econocool,
            checksum,
        })
    }
}
