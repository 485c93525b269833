use super::{le_i16, le_u16, Bits, Value};
use std::convert::TryFrom;

const PAYLOAD_LEN: usize = 24;

const INPUT_DROPOUT_TOLERANCE: usize = 16;

const PIN_POLARITY: Bits = Bits::byte(17, 0x10, 4);
const HOT_SWAP: Bits = Bits::byte(17, 0x08, 3);
const AUTOSWITCH: Bits = Bits::byte(17, 0x04, 2);
const POWER_FACTOR_CORRECTION: Bits = Bits::byte(17, 0x02, 1);
const PREDICTIVE_FAIL: Bits = Bits::byte(17, 0x01, 0);

const PEAK_CAPACITY: Bits = Bits::word(18, 0x0FFF, 0);
const HOLD_UP_TIME: Bits = Bits::word(18, 0xF000, 12);

const VOLTAGE_1: Bits = Bits::byte(20, 0xF0, 4);
const VOLTAGE_2: Bits = Bits::byte(20, 0x0F, 0);

/// Combined wattage output voltages in 10 mV units: 12V, -12V, 5V, 3.3V.
const VOLTAGES: [i16; 4] = [1200, -1200, 500, 330];

/// Power Supply Information record (type 0x00).
///
/// Keeps the raw payload and reads fields at their fixed little-endian
/// positions on access.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PowerSupplyInfo([u8; PAYLOAD_LEN]);

impl PowerSupplyInfo {
    pub const LEN: usize = PAYLOAD_LEN;

    /// `None` unless the payload is exactly [`PowerSupplyInfo::LEN`] bytes.
    pub fn new(payload: &[u8]) -> Option<Self> {
        <[u8; Self::LEN]>::try_from(payload).ok().map(PowerSupplyInfo)
    }

    pub fn overall_capacity(&self) -> u16 {
        le_u16(&self.0, 0)
    }

    pub fn peak_va(&self) -> u16 {
        le_u16(&self.0, 2)
    }

    pub fn inrush_current(&self) -> u8 {
        self.0[4]
    }

    pub fn inrush_interval(&self) -> u8 {
        self.0[5]
    }

    /// Input voltage ranges in 10 mV.
    pub fn low_input_voltage_1(&self) -> i16 {
        le_i16(&self.0, 6)
    }

    pub fn high_input_voltage_1(&self) -> i16 {
        le_i16(&self.0, 8)
    }

    pub fn low_input_voltage_2(&self) -> i16 {
        le_i16(&self.0, 10)
    }

    pub fn high_input_voltage_2(&self) -> i16 {
        le_i16(&self.0, 12)
    }

    pub fn low_input_frequency(&self) -> u8 {
        self.0[14]
    }

    pub fn high_input_frequency(&self) -> u8 {
        self.0[15]
    }

    pub fn input_dropout_tolerance(&self) -> u8 {
        self.0[INPUT_DROPOUT_TOLERANCE]
    }

    /// Tachometer pulses per rotation, otherwise the fan signal is a
    /// pass/fail line.
    pub fn pin_polarity(&self) -> bool {
        PIN_POLARITY.is_set(&self.0)
    }

    pub fn hot_swap(&self) -> bool {
        HOT_SWAP.is_set(&self.0)
    }

    pub fn autoswitch(&self) -> bool {
        AUTOSWITCH.is_set(&self.0)
    }

    pub fn power_factor_correction(&self) -> bool {
        POWER_FACTOR_CORRECTION.is_set(&self.0)
    }

    pub fn predictive_fail(&self) -> bool {
        PREDICTIVE_FAIL.is_set(&self.0)
    }

    /// Peak capacity in watts, low twelve bits of the peak wattage word.
    pub fn peak_capacity(&self) -> u16 {
        PEAK_CAPACITY.read(&self.0)
    }

    /// Hold-up time in seconds, high nibble of the peak wattage word.
    pub fn hold_up_time(&self) -> u8 {
        HOLD_UP_TIME.read(&self.0) as u8
    }

    /// First combined wattage voltage in 10 mV, `None` for reserved codes.
    pub fn voltage_1(&self) -> Option<i16> {
        VOLTAGES.get(VOLTAGE_1.read(&self.0) as usize).copied()
    }

    pub fn voltage_2(&self) -> Option<i16> {
        VOLTAGES.get(VOLTAGE_2.read(&self.0) as usize).copied()
    }

    pub fn total_wattage(&self) -> u16 {
        le_u16(&self.0, 21)
    }

    pub fn tachometer_low(&self) -> u8 {
        self.0[23]
    }

    pub fn properties(&self) -> Vec<(&'static str, Value)> {
        let mut properties = vec![
            ("OverallCapacity", int(self.overall_capacity())),
            ("PeakVA", int(self.peak_va())),
            ("InrushCurrent", int(self.inrush_current())),
            ("InrushInterval", int(self.inrush_interval())),
            ("LowInputVoltage1", int(self.low_input_voltage_1())),
            ("HighInputVoltage1", int(self.high_input_voltage_1())),
            ("LowInputVoltage2", int(self.low_input_voltage_2())),
            ("HighInputVoltage2", int(self.high_input_voltage_2())),
            ("LowInputFrequency", int(self.low_input_frequency())),
            ("HighInputFrequency", int(self.high_input_frequency())),
            ("InputDropoutTolerance", int(self.input_dropout_tolerance())),
            ("PinPolarity", self.pin_polarity().into()),
            ("HotSwap", self.hot_swap().into()),
            ("Autoswitch", self.autoswitch().into()),
            ("PowerFactorCorrection", self.power_factor_correction().into()),
            ("PredictiveFail", self.predictive_fail().into()),
            ("PeakCapacity", int(self.peak_capacity())),
            ("HoldUpTime", int(self.hold_up_time())),
        ];
        if let Some(voltage) = self.voltage_1() {
            properties.push(("Voltage1", int(voltage)));
        }
        if let Some(voltage) = self.voltage_2() {
            properties.push(("Voltage2", int(voltage)));
        }
        properties.push(("TotalWattage", int(self.total_wattage())));
        properties.push(("TachometerLow", int(self.tachometer_low())));
        properties
    }
}

fn int<I: Into<i64>>(i: I) -> Value {
    Value::Int(i.into())
}
