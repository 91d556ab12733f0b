use crate::scale::Scale;
use regex::Regex;
use serde::{Deserialize, Serialize};
use simple_error::{bail, SimpleError};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Descriptor of unit
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    None, // No Unit
    Hz,      // Frequency in Hz
    Degree,  // Number in degree
    Radian,  // Number in radians
    Second,  // Time in seconds
    Meter,   // Length in meters
    Inch,    // Length in inches
    Ohm,     // Resistance in ohms
    Decibel, // Ratio in dB
    Neper,   // Legacy unit of nepers
}

impl Unit {
    pub fn to_long_string(&self) -> String {
        match self {
            Unit::None => "".to_string(),
            Unit::Hz => "hertz".to_string(),
            Unit::Degree => "degree".to_string(),
            Unit::Radian => "radian".to_string(),
            Unit::Second => "second".to_string(),
            Unit::Meter => "meter".to_string(),
            Unit::Inch => "inch".to_string(),
            Unit::Ohm => "ohm".to_string(),
            Unit::Decibel => "decibel".to_string(),
            Unit::Neper => "neper".to_string(),
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Unit::None => "",
            Unit::Hz => "Hz",
            Unit::Degree => "°",
            Unit::Radian => "rad",
            Unit::Second => "s",
            Unit::Meter => "m",
            Unit::Inch => "in",
            Unit::Ohm => "Ω",
            Unit::Decibel => "dB",
            Unit::Neper => "Np",
        }
    }
}

impl FromStr for Unit {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Unit::None),
            "HZ" | "Hz" | "hz" => Ok(Unit::Hz),
            "Degree" | "degree" | "deg" | "°" => Ok(Unit::Degree),
            "Radian" | "radian" | "rad" => Ok(Unit::Radian),
            "Second" | "second" | "sec" | "s" => Ok(Unit::Second),
            "Meter" | "meter" | "m" => Ok(Unit::Meter),
            "Inch" | "inch" | "in" => Ok(Unit::Inch),
            "Ohm" | "ohm" | "Ω" => Ok(Unit::Ohm),
            "dB" | "db" | "DB" => Ok(Unit::Decibel),
            "Neper" | "neper" | "Np" => Ok(Unit::Neper),
            _ => {
                bail!("unknown unit '{}'", s);
            }
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Encapsulation of a value with scale. Value is stored unscaled.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitVal {
    val: f64,
    scale: Scale,
    unit: Unit,
}

fn quantity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(?<val>[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*(?<prefix>[pnuμµmckKMGgTt]?)(?<unit>Hz|hz|HZ|m|in|Ω|ohm|Ohm|deg|°|rad|s|dB)?\s*$",
        )
        .expect("Invalid regex!")
    })
}

impl UnitVal {
    pub fn new(val: f64, scale: Scale, unit: Unit) -> Self {
        UnitVal { val, scale, unit }
    }

    pub fn new_scaled(val: f64, scale: Scale, unit: Unit) -> Self {
        UnitVal {
            val: scale.unscale(val),
            scale,
            unit,
        }
    }

    /// Parse a quantity such as `"1.6mm"`, `"3 GHz"`, `"50ohm"` or `"2.5e9"`.
    ///
    /// A bare number is taken in base units of `expected`. A unit, when
    /// given, must match `expected` (inches are accepted for lengths and
    /// stored in meters); a lone `m` after a number is read as meters when
    /// `expected` is `Unit::Meter` and as milli otherwise.
    pub fn parse(s: &str, expected: Unit) -> Result<UnitVal, SimpleError> {
        let Some(caps) = quantity_regex().captures(s) else {
            bail!("cannot parse quantity '{}'", s);
        };
        let val: f64 = match caps["val"].parse() {
            Ok(v) => v,
            Err(_) => {
                bail!("cannot parse number in '{}'", s);
            }
        };
        let mut prefix = caps.name("prefix").map_or("", |m| m.as_str());
        let mut unit_str = caps.name("unit").map_or("", |m| m.as_str());

        // a trailing "m" is meters when a length is expected
        if unit_str.is_empty() && prefix == "m" && expected == Unit::Meter {
            prefix = "";
            unit_str = "m";
        }
        let scale = Scale::from_prefix(prefix)?;
        let unit = if unit_str.is_empty() {
            expected
        } else {
            Unit::from_str(unit_str)?
        };
        let is_inch = unit == Unit::Inch;
        let unit = if is_inch { Unit::Meter } else { unit };
        if unit != expected {
            bail!(
                "expected a quantity in {} but got '{}'",
                expected.to_long_string(),
                s
            );
        }
        let base = match is_inch {
            true => scale.unscale(val) * 0.0254,
            false => scale.unscale(val),
        };
        Ok(UnitVal {
            val: base,
            scale,
            unit,
        })
    }

    /// Retrieve value unscaled
    pub fn val(&self) -> f64 {
        self.val
    }

    /// Retrieve value in scaled scale
    pub fn val_scaled(&self) -> f64 {
        self.scale.scale(self.val)
    }

    /// Retrieve scale
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Retrieve unit
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Set value unscaled
    pub fn set_val(&mut self, val: f64) -> &Self {
        self.val = val;
        self
    }

    /// Set value in scaled scale
    pub fn set_val_scaled(&mut self, val: f64) -> &Self {
        self.val = self.scale.unscale(val);
        self
    }

    /// Set scale
    pub fn set_scale(&mut self, scale: Scale) -> &Self {
        self.scale = scale;
        self
    }

    /// Set unit
    pub fn set_unit(&mut self, unit: Unit) -> &Self {
        self.unit = unit;
        self
    }
}

impl Default for UnitVal {
    fn default() -> Self {
        UnitVal {
            val: 0.0,
            scale: Scale::Base,
            unit: Unit::None,
        }
    }
}

impl fmt::Display for UnitVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.val_scaled(), self.scale, self.unit)
    }
}

/// Builder design pattern for UnitVal.
///
/// ## Example
/// ```
/// use rfstrip::scale::Scale;
/// use rfstrip::unit::{Unit, UnitValBuilder};
///
/// let height = UnitValBuilder::new().val_scaled(1.6, Scale::Milli).unit(Unit::Meter).build();
/// assert!((height.val() - 1.6e-3).abs() < 1e-15);
/// ```
#[derive(Default)]
pub struct UnitValBuilder {
    val: f64,
    scale: Scale,
    unit: Unit,
}

impl UnitValBuilder {
    pub fn new() -> Self {
        UnitValBuilder {
            val: 0.0,
            scale: Scale::Base,
            unit: Unit::None,
        }
    }

    pub fn val(mut self, val: f64) -> Self {
        self.val = val;
        self
    }

    pub fn val_scaled(mut self, val: f64, scale: Scale) -> Self {
        self.val = scale.unscale(val);
        self.scale = scale;
        self
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn build(self) -> UnitVal {
        UnitVal {
            val: self.val,
            scale: self.scale,
            unit: self.unit,
        }
    }
}
