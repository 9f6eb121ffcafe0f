// src/common/types.rs

use core::fmt;

// --- Dial Position ---

/// Rotary dial position reported in byte 0.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    DcVolts = 0,
    AcVolts = 1,
    DcMicroAmps = 2,
    DcMilliAmps = 3,
    DcAmps = 4,
    AcMicroAmps = 5,
    AcMilliAmps = 6,
    AcAmps = 7,
    Ohms = 8,
    Capacitance = 9,
    Frequency = 10,
    NetFrequency = 11,
    AmpFrequency = 12,
    Duty = 13,
    NetDuty = 14,
    AmpDuty = 15,
    Width = 16,
    NetWidth = 17,
    AmpWidth = 18,
    Diode = 19,
    Continuity = 20,
    Hfe = 21,
    Logic = 22,
    Dbm = 23,
    /// Electric field detector.
    Ef = 24,
    Temperature = 25,
}

impl Mode {
    /// Converts a raw ordinal into a `Mode`, `None` outside 0..=25.
    pub fn from_u8(value: u8) -> Option<Self> {
        use Mode::*;
        Some(match value {
            0 => DcVolts,
            1 => AcVolts,
            2 => DcMicroAmps,
            3 => DcMilliAmps,
            4 => DcAmps,
            5 => AcMicroAmps,
            6 => AcMilliAmps,
            7 => AcAmps,
            8 => Ohms,
            9 => Capacitance,
            10 => Frequency,
            11 => NetFrequency,
            12 => AmpFrequency,
            13 => Duty,
            14 => NetDuty,
            15 => AmpDuty,
            16 => Width,
            17 => NetWidth,
            18 => AmpWidth,
            19 => Diode,
            20 => Continuity,
            21 => Hfe,
            22 => Logic,
            23 => Dbm,
            24 => Ef,
            25 => Temperature,
            _ => return None,
        })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Short label as printed on the dial.
    pub fn label(self) -> &'static str {
        use Mode::*;
        match self {
            DcVolts => "DC V",
            AcVolts => "AC V",
            DcMicroAmps => "DC uA",
            DcMilliAmps => "DC mA",
            DcAmps => "DC A",
            AcMicroAmps => "AC uA",
            AcMilliAmps => "AC mA",
            AcAmps => "AC A",
            Ohms => "ohm",
            Capacitance => "CAP",
            Frequency => "Hz",
            NetFrequency => "NET Hz",
            AmpFrequency => "AMP Hz",
            Duty => "Duty",
            NetDuty => "Net Duty",
            AmpDuty => "Amp Duty",
            Width => "Width",
            NetWidth => "Net Width",
            AmpWidth => "Amp Width",
            Diode => "Diode",
            Continuity => "Cont",
            Hfe => "hFE",
            Logic => "Logic",
            Dbm => "dBm",
            Ef => "EF",
            Temperature => "Temp",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// --- Units and Scale ---

/// Base unit annunciator lit on the display.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Units {
    #[default]
    None,
    Hertz,
    Ohm,
    Farad,
    Amp,
    Volt,
    /// Transistor gain, dimensionless.
    Gain,
    Percent,
    Second,
    DecibelMilliwatt,
}

impl Units {
    pub fn symbol(self) -> &'static str {
        match self {
            Units::None => "",
            Units::Hertz => "Hz",
            Units::Ohm => "Ohm",
            Units::Farad => "F",
            Units::Amp => "A",
            Units::Volt => "V",
            Units::Gain => "hFE",
            Units::Percent => "%",
            Units::Second => "s",
            Units::DecibelMilliwatt => "dBm",
        }
    }

    /// Units whose readings are qualified as AC or DC.
    pub fn has_ac_qualifier(self) -> bool {
        matches!(self, Units::Volt | Units::Amp | Units::DecibelMilliwatt)
    }
}

/// Metric prefix annunciator.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scale {
    #[default]
    None,
    Nano,
    Micro,
    Milli,
    Kilo,
    Mega,
}

impl Scale {
    pub fn prefix(self) -> &'static str {
        match self {
            Scale::None => "",
            Scale::Nano => "n",
            Scale::Micro => "u",
            Scale::Milli => "m",
            Scale::Kilo => "k",
            Scale::Mega => "M",
        }
    }

    /// Power-of-ten multiplier, for callers wanting SI base units.
    pub fn multiplier(self) -> f64 {
        match self {
            Scale::None => 1.0,
            Scale::Nano => 1e-9,
            Scale::Micro => 1e-6,
            Scale::Milli => 1e-3,
            Scale::Kilo => 1e3,
            Scale::Mega => 1e6,
        }
    }
}

// --- Sign / Temperature ---

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

impl Sign {
    pub fn factor(self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TemperatureScale {
    Celsius,
    Fahrenheit,
}

impl TemperatureScale {
    pub fn symbol(self) -> &'static str {
        match self {
            TemperatureScale::Celsius => "C",
            TemperatureScale::Fahrenheit => "F",
        }
    }
}
