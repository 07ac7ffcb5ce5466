//! IR modulation constants for each protocol.
//!
//! The codec itself only deals in bits; these tables describe how a
//! transmitter should put those bits on the air (NEC-style pulse-distance
//! modulation on a 38 kHz carrier). They are data for an external driver,
//! not logic.

/// Carrier and pulse/gap timings for one protocol. Durations are in
/// microseconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IrTimings {
    pub frequency_hz: u32,
    pub duty_cycle: f32,
    pub leading_pulse_us: u32,
    pub leading_gap_us: u32,
    pub one_pulse_us: u32,
    pub one_gap_us: u32,
    pub zero_pulse_us: u32,
    pub zero_gap_us: u32,
    pub trailing_pulse_us: u32,
    pub trailing_gap_us: u32,
}

pub const W001CP: IrTimings = IrTimings {
    frequency_hz: 38_000,
    duty_cycle: 0.5,
    leading_pulse_us: 3245,
    leading_gap_us: 1590,
    one_pulse_us: 400,
    one_gap_us: 1210,
    zero_pulse_us: 400,
    zero_gap_us: 425,
    trailing_pulse_us: 440,
    trailing_gap_us: 17100,
};

pub const SG14D: IrTimings = IrTimings {
    frequency_hz: 38_000,
    duty_cycle: 0.5,
    leading_pulse_us: 3500,
    leading_gap_us: 1600,
    one_pulse_us: 400,
    one_gap_us: 1300,
    zero_pulse_us: 400,
    zero_gap_us: 450,
    trailing_pulse_us: 440,
    trailing_gap_us: 17100,
};
