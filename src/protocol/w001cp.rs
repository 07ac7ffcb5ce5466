//! W001CP remote protocol: 17-byte / 136-bit frames.
//!
//! Layout (MSB-first, byte index → content):
//!
//! ```text
//!  0..=4   constant header
//!  5       power (two fixed byte patterns)
//!  6       temperature - 16 (high nibble) | hvac mode code (low nibble)
//!  7       vane code (high nibble) | 0 fan-1 fan-1 1 (low nibble)
//!  8       timer mode (000001 prefix + 2-bit mode code)
//!  9       power-off countdown, 1/6-hour units
//! 10       power-on countdown, 1/6-hour units
//! 11..=16  checksum block: complement (0xff ^ b) of bytes 5..=10
//! ```
//!
//! Encode always emits the "timer off" placeholder for bytes 8..=10; the
//! timer fields are decoded but not yet settable.

use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, trace};

use super::bits::{
    bits_to_u8, expect_tag, parse_bits, reverse_bits_per_byte, take_field, to_binary, BitOrder,
    BitstringError,
};
use super::types::{ChecksumStatus, DecodeError, HvacMode, InvalidParameter, Temperature};

pub const PROTOCOL_BYTES: usize = 17;
pub const FRAME_BITS: usize = PROTOCOL_BYTES * 8;
/// Frames are not repeated on the air for this remote.
pub const PROTOCOL_REPEATS: usize = 1;

const HEADER: &str = concat!("00100011", "11001011", "00100110", "00100001", "00000000");
const POWER_ON: &str = "01000000";
const POWER_OFF: &str = "00000000";
/// Byte 8 as emitted on encode: timer off, countdowns unused.
const TIMER_PLACEHOLDER: &str = "00000100";
const TIMER_PREFIX: &str = "000001";
/// Bits covered by the checksum input (bytes 0..=10).
const CHECKSUM_SPAN_BITS: usize = 88;

/// Fan speed step, 1..=4.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FanSpeed(u8);

impl FanSpeed {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(speed: u8) -> Result<Self, InvalidParameter> {
        if (Self::MIN..=Self::MAX).contains(&speed) {
            Ok(Self(speed))
        } else {
            Err(InvalidParameter::FanSpeedOutOfRange(speed))
        }
    }

    pub fn speed(self) -> u8 {
        self.0
    }
}

/// Louver position: swinging automatically or fixed at one of four angles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum Vane {
    #[strum(serialize = "auto")]
    Auto,
    #[strum(serialize = "0")]
    V0,
    #[strum(serialize = "1")]
    V1,
    #[strum(serialize = "2")]
    V2,
    #[strum(serialize = "3")]
    V3,
}

impl Vane {
    fn wire_code(self) -> u8 {
        match self {
            Vane::Auto => 12,
            Vane::V0 => 0,
            Vane::V1 => 1,
            Vane::V2 => 2,
            Vane::V3 => 3,
        }
    }

    fn from_wire(code: u8) -> Result<Self, DecodeError> {
        match code {
            12 => Ok(Vane::Auto),
            0 => Ok(Vane::V0),
            1 => Ok(Vane::V1),
            2 => Ok(Vane::V2),
            3 => Ok(Vane::V3),
            _ => Err(DecodeError::Vane),
        }
    }
}

/// Timer program selector carried in byte 8. Decode-only for now: encode
/// always emits [`TimerMode::Off`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum TimerMode {
    #[strum(serialize = "timer_off")]
    Off,
    #[strum(serialize = "timer_poweroff")]
    PowerOff,
    #[strum(serialize = "timer_poweron")]
    PowerOn,
    #[strum(serialize = "timer_poweronoff")]
    PowerOnOff,
}

impl TimerMode {
    fn from_wire(code: u8) -> Self {
        match code {
            0 => TimerMode::Off,
            1 => TimerMode::PowerOff,
            2 => TimerMode::PowerOn,
            _ => TimerMode::PowerOnOff,
        }
    }
}

fn mode_bits(mode: HvacMode) -> &'static str {
    match mode {
        HvacMode::Fan => "0000",
        HvacMode::Cold => "0001",
        HvacMode::Heat => "0010",
        HvacMode::Auto => "0011",
        HvacMode::Dry => "0101",
    }
}

fn mode_from_wire(code: &str) -> Result<HvacMode, DecodeError> {
    match code {
        "0000" => Ok(HvacMode::Fan),
        "0001" => Ok(HvacMode::Cold),
        "0010" => Ok(HvacMode::Heat),
        "0011" => Ok(HvacMode::Auto),
        "0101" => Ok(HvacMode::Dry),
        _ => Err(DecodeError::HvacMode),
    }
}

/// One fully specified remote command. Immutable; construct once, encode as
/// often as needed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub power: bool,
    pub hvac_mode: HvacMode,
    pub temperature: Temperature,
    pub fan: FanSpeed,
    pub vane: Vane,
}

impl Command {
    /// Builds a command, validating the ranged fields at the boundary.
    pub fn new(
        power: bool,
        hvac_mode: HvacMode,
        temperature: u8,
        fan: u8,
        vane: Vane,
    ) -> Result<Self, InvalidParameter> {
        Ok(Self {
            power,
            hvac_mode,
            temperature: Temperature::new(temperature)?,
            fan: FanSpeed::new(fan)?,
            vane,
        })
    }

    /// Encodes the command into its 136-bit frame.
    ///
    /// [`BitOrder::LsbFirst`] is the transmit order; [`BitOrder::MsbFirst`]
    /// yields the documented layout order that [`Frame::parse`] expects.
    pub fn encode(&self, order: BitOrder) -> Result<String, BitstringError> {
        trace!(?order, "encoding W001CP command {:?}", self);
        let mut bitstring = String::with_capacity(FRAME_BITS);
        // bytes 0..=4: constant header
        bitstring.push_str(HEADER);
        // byte 5: power
        bitstring.push_str(if self.power { POWER_ON } else { POWER_OFF });
        // byte 6: temperature + hvac mode
        bitstring.push_str(&to_binary(self.temperature.wire_code().into(), 4)?);
        bitstring.push_str(mode_bits(self.hvac_mode));
        // byte 7: vane + fan
        bitstring.push_str(&to_binary(self.vane.wire_code().into(), 4)?);
        bitstring.push('0');
        bitstring.push_str(&to_binary((self.fan.speed() - 1).into(), 2)?);
        bitstring.push('1');
        // byte 8: timer mode, fixed at "timer off" for now
        bitstring.push_str(TIMER_PLACEHOLDER);
        // bytes 9, 10: power-off / power-on countdowns, not yet settable
        bitstring.push_str(&"0".repeat(16));
        // bytes 11..=16: complement checksum over bytes 5..=10
        let checksum = checksum_block(&bitstring)?;
        bitstring.push_str(&checksum);
        assert_eq!(
            bitstring.len(),
            FRAME_BITS,
            "assembled W001CP frame has the wrong length"
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
            hvac_mode: HvacMode::Auto,
            temperature: Temperature::from_wire(8),
            fan: FanSpeed(1),
            vane: Vane::Auto,
        }
    }
}

/// Complement checksum block for bytes 5..=10 of `frame_head` (the first 88
/// bits of the frame).
fn checksum_block(frame_head: &str) -> Result<String, BitstringError> {
    debug_assert_eq!(frame_head.len(), CHECKSUM_SPAN_BITS);
    let mut block = String::with_capacity(48);
    for pos in 5..11 {
        let byte = bits_to_u8(&frame_head[8 * pos..8 * pos + 8]);
        block.push_str(&to_binary((0xff ^ byte).into(), 8)?);
    }
    Ok(block)
}

/// A decoded frame: every command field plus the timer state and the
/// checksum verdict.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub power: bool,
    pub hvac_mode: HvacMode,
    pub temperature: Temperature,
    pub fan: FanSpeed,
    pub vane: Vane,
    pub timer_mode: TimerMode,
    /// Power-on countdown (byte 10), 1/6-hour units.
    pub timer_on_counts: u8,
    /// Power-off countdown (byte 9), 1/6-hour units.
    pub timer_off_counts: u8,
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
        // byte 6
        let (input, temp_code) = take_field(input, 4, DecodeError::Temperature)?;
        let temperature = Temperature::from_wire(bits_to_u8(temp_code));
        let (input, mode_code) = take_field(input, 4, DecodeError::HvacMode)?;
        let hvac_mode = mode_from_wire(mode_code)?;
        // byte 7: 4-bit vane, 3-bit fan code, one unchecked trailing bit
        let (input, vane_code) = take_field(input, 4, DecodeError::Vane)?;
        let vane = Vane::from_wire(bits_to_u8(vane_code))?;
        let (input, fan_code) = take_field(input, 3, DecodeError::Fan)?;
        let fan = FanSpeed::new(bits_to_u8(fan_code) + 1).map_err(|_| DecodeError::Fan)?;
        let (input, _) = take_field(input, 1, DecodeError::Fan)?;
        // byte 8
        let input = expect_tag(input, TIMER_PREFIX, DecodeError::TimerMode)?;
        let (input, timer_code) = take_field(input, 2, DecodeError::TimerMode)?;
        let timer_mode = TimerMode::from_wire(bits_to_u8(timer_code));
        // bytes 9, 10: countdowns, raw counts
        let (input, off_counts) = take_field(input, 8, DecodeError::TimerMode)?;
        let timer_off_counts = bits_to_u8(off_counts);
        let (input, on_counts) = take_field(input, 8, DecodeError::TimerMode)?;
        let timer_on_counts = bits_to_u8(on_counts);
        // bytes 11..=16: verify, never abort
        let expected = checksum_block(&bits[..CHECKSUM_SPAN_BITS])?;
        let checksum = if input == expected {
            ChecksumStatus::Ok
        } else {
            ChecksumStatus::Bad
        };
        debug!(%checksum, "decoded W001CP frame");
        Ok(Self {
            power,
            hvac_mode,
            temperature,
            fan,
            vane,
            timer_mode,
            timer_on_counts,
            timer_off_counts,
            checksum,
        })
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn cold_24_fan3() -> Command {
        Command::new(true, HvacMode::Cold, 24, 3, Vane::Auto).unwrap()
    }

    fn flip(bits: &str, index: usize) -> String {
        let mut out: Vec<u8> = bits.bytes().collect();
        out[index] = if out[index] == b'0' { b'1' } else { b'0' };
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn encode_known_command() {
        let bits = cold_24_fan3().encode(BitOrder::MsbFirst).unwrap();
        assert_eq!(&bits[..40], HEADER);
        assert_eq!(&bits[40..48], "01000000"); // power on
        assert_eq!(&bits[48..52], "1000"); // 24 - 16
        assert_eq!(&bits[52..56], "0001"); // cold
        assert_eq!(&bits[56..60], "1100"); // vane auto = 12
        assert_eq!(&bits[60..64], "0101"); // 0 | fan 3 -> 10 | 1
        assert_eq!(&bits[64..72], "00000100"); // timer placeholder
        assert_eq!(&bits[72..88], "0".repeat(16)); // countdowns
        assert_eq!(
            &bits[88..],
            concat!(
                "10111111", // !0x40
                "01111110", // !0x81
                "00111010", // !0xc5
                "11111011", // !0x04
                "11111111", "11111111"
            )
        );
    }

    #[test]
    fn lsb_order_is_per_byte_reversal_of_layout_order() {
        let command = cold_24_fan3();
        let msb = command.encode(BitOrder::MsbFirst).unwrap();
        let lsb = command.encode(BitOrder::LsbFirst).unwrap();
        assert_eq!(lsb, reverse_bits_per_byte(&msb).unwrap());
        assert_eq!(reverse_bits_per_byte(&lsb).unwrap(), msb);
    }

    #[test]
    fn round_trip_over_full_parameter_space() {
        for power in [false, true] {
            for hvac_mode in HvacMode::iter() {
                for temperature in Temperature::MIN..=Temperature::MAX {
                    for fan in FanSpeed::MIN..=FanSpeed::MAX {
                        for vane in Vane::iter() {
                            let command =
                                Command::new(power, hvac_mode, temperature, fan, vane).unwrap();
                            let bits = command.encode(BitOrder::MsbFirst).unwrap();
                            assert_eq!(bits.len(), FRAME_BITS);
                            let frame = Frame::parse(&bits).unwrap();
                            assert_eq!(frame.power, power);
                            assert_eq!(frame.hvac_mode, hvac_mode);
                            assert_eq!(frame.temperature.celsius(), temperature);
                            assert_eq!(frame.fan.speed(), fan);
                            assert_eq!(frame.vane, vane);
                            assert_eq!(frame.timer_mode, TimerMode::Off);
                            assert_eq!(frame.timer_on_counts, 0);
                            assert_eq!(frame.timer_off_counts, 0);
                            assert_eq!(frame.checksum, ChecksumStatus::Ok);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn parse_accepts_integer_bits() {
        let bits = cold_24_fan3().encode(BitOrder::MsbFirst).unwrap();
        let ints: Vec<u8> = bits.bytes().map(|b| b - b'0').collect();
        assert_eq!(Frame::parse_bits(&ints), Frame::parse(&bits));
    }

    #[test]
    fn out_of_domain_fields_are_rejected() {
        assert_eq!(
            Command::new(true, HvacMode::Cold, 15, 1, Vane::Auto),
            Err(InvalidParameter::TemperatureOutOfRange(15))
        );
        assert_eq!(
            Command::new(true, HvacMode::Cold, 32, 1, Vane::Auto),
            Err(InvalidParameter::TemperatureOutOfRange(32))
        );
        assert_eq!(
            Command::new(true, HvacMode::Cold, 24, 0, Vane::Auto),
            Err(InvalidParameter::FanSpeedOutOfRange(0))
        );
        assert_eq!(
            Command::new(true, HvacMode::Cold, 24, 5, Vane::Auto),
            Err(InvalidParameter::FanSpeedOutOfRange(5))
        );
        assert!("auto".parse::<Vane>().is_ok());
        assert!("swing".parse::<Vane>().is_err());
    }

    #[test]
    fn structural_violations_abort_decode() {
        let bits = cold_24_fan3().encode(BitOrder::MsbFirst).unwrap();

        assert_eq!(Frame::parse(&flip(&bits, 0)), Err(DecodeError::Header));
        assert_eq!(
            Frame::parse(&bits[..128]),
            Err(DecodeError::Length { expected: 136, actual: 128 })
        );

        let mut wrong_power = bits.clone();
        wrong_power.replace_range(40..48, "11111111");
        assert_eq!(Frame::parse(&wrong_power), Err(DecodeError::PowerByte));

        let mut wrong_mode = bits.clone();
        wrong_mode.replace_range(52..56, "0100");
        assert_eq!(Frame::parse(&wrong_mode), Err(DecodeError::HvacMode));

        let mut wrong_vane = bits.clone();
        wrong_vane.replace_range(56..60, "0111");
        assert_eq!(Frame::parse(&wrong_vane), Err(DecodeError::Vane));

        let mut wrong_timer = bits.clone();
        wrong_timer.replace_range(64..70, "100001");
        assert_eq!(Frame::parse(&wrong_timer), Err(DecodeError::TimerMode));
    }

    #[test]
    fn flipped_checksum_bit_reports_bad_but_decodes() {
        let bits = cold_24_fan3().encode(BitOrder::MsbFirst).unwrap();
        let good = Frame::parse(&bits).unwrap();
        let frame = Frame::parse(&flip(&bits, 100)).unwrap();
        assert_eq!(frame.checksum, ChecksumStatus::Bad);
        assert_eq!(
            Frame { checksum: ChecksumStatus::Ok, ..frame },
            good
        );
    }

    #[test]
    fn countdown_bytes_decode_as_raw_counts() {
        let bits = cold_24_fan3().encode(BitOrder::MsbFirst).unwrap();
        // splice a 3.5h power-off countdown into byte 9 and re-checksum
        let mut doctored = bits.clone();
        doctored.replace_range(72..80, "00010101");
        let checksum = checksum_block(&doctored[..CHECKSUM_SPAN_BITS]).unwrap();
        doctored.replace_range(88..136, &checksum);
        let frame = Frame::parse(&doctored).unwrap();
        assert_eq!(frame.timer_off_counts, 21);
        assert_eq!(frame.timer_on_counts, 0);
        assert_eq!(frame.checksum, ChecksumStatus::Ok);
    }
}
