use super::{le_i16, le_u16, Bits, Value};
use std::convert::TryFrom;

const PAYLOAD_LEN: usize = 13;

const STANDBY: Bits = Bits::byte(0, 0x80, 7);
const OUTPUT_NUMBER: Bits = Bits::byte(0, 0x0F, 0);

/// DC Output record (type 0x01). Voltages are in 10 mV, currents in mA.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DcOutput([u8; PAYLOAD_LEN]);

impl DcOutput {
    pub const LEN: usize = PAYLOAD_LEN;

    pub fn new(payload: &[u8]) -> Option<Self> {
        <[u8; Self::LEN]>::try_from(payload).ok().map(DcOutput)
    }

    /// Output is available on standby power.
    pub fn standby(&self) -> bool {
        STANDBY.is_set(&self.0)
    }

    pub fn output_number(&self) -> u8 {
        OUTPUT_NUMBER.read(&self.0) as u8
    }

    pub fn nominal_voltage(&self) -> i16 {
        le_i16(&self.0, 1)
    }

    pub fn max_negative_voltage(&self) -> i16 {
        le_i16(&self.0, 3)
    }

    pub fn max_positive_voltage(&self) -> i16 {
        le_i16(&self.0, 5)
    }

    /// Ripple and noise in mV.
    pub fn ripple_and_noise(&self) -> u16 {
        le_u16(&self.0, 7)
    }

    pub fn min_current_draw(&self) -> u16 {
        le_u16(&self.0, 9)
    }

    pub fn max_current_draw(&self) -> u16 {
        le_u16(&self.0, 11)
    }

    pub fn properties(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("OutputNumber", Value::Int(self.output_number().into())),
            ("Standby", Value::Bool(self.standby())),
            ("NominalVoltage", Value::Int(self.nominal_voltage().into())),
            ("MaxNegativeVoltage", Value::Int(self.max_negative_voltage().into())),
            ("MaxPositiveVoltage", Value::Int(self.max_positive_voltage().into())),
            ("RippleAndNoise", Value::Int(self.ripple_and_noise().into())),
            ("MinCurrentDraw", Value::Int(self.min_current_draw().into())),
            ("MaxCurrentDraw", Value::Int(self.max_current_draw().into())),
        ]
    }
}
