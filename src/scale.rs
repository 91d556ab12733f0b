use ndarray::Array1;
use serde::{Deserialize, Serialize};
use simple_error::{bail, SimpleError};
use std::{fmt, str::FromStr};

/// Descriptor of scaling
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Scale {
    Pico,
    Nano,
    Micro,
    Milli,
    Centi,
    #[default]
    Base,
    Kilo,
    Mega,
    Giga,
    Tera,
}

impl Scale {
    pub fn to_str(&self) -> &str {
        match self {
            Scale::Pico => "p",
            Scale::Nano => "n",
            Scale::Micro => "u",
            Scale::Milli => "m",
            Scale::Centi => "c",
            Scale::Base => "",
            Scale::Kilo => "k",
            Scale::Mega => "M",
            Scale::Giga => "G",
            Scale::Tera => "T",
        }
    }

    /// Provides multiplier for scale
    /// Scale::Pico = 1e-12
    pub fn multiplier(&self) -> f64 {
        match self {
            Scale::Pico => 1e-12,
            Scale::Nano => 1e-9,
            Scale::Micro => 1e-6,
            Scale::Milli => 1e-3,
            Scale::Centi => 1e-2,
            Scale::Base => 1.0,
            Scale::Kilo => 1e3,
            Scale::Mega => 1e6,
            Scale::Giga => 1e9,
            Scale::Tera => 1e12,
        }
    }

    /// Base value expressed in this scale, e.g. `Scale::Giga.scale(3e9) == 3.0`
    pub fn scale(&self, val: f64) -> f64 {
        val / self.multiplier()
    }

    pub fn scale_array(&self, val: &Array1<f64>) -> Array1<f64> {
        val.map(|&x| x / self.multiplier())
    }

    /// Scaled value expressed in base units, e.g. `Scale::Milli.unscale(1.6) == 1.6e-3`
    pub fn unscale(&self, val: f64) -> f64 {
        val * self.multiplier()
    }

    pub fn unscale_array(&self, val: &Array1<f64>) -> Array1<f64> {
        val.map(|&x| x * self.multiplier())
    }

    /// Strict prefix lookup used by quantity parsing. Unlike `from_str` an
    /// unknown prefix is an error.
    pub fn from_prefix(s: &str) -> Result<Scale, SimpleError> {
        match s {
            "" => Ok(Scale::Base),
            "p" => Ok(Scale::Pico),
            "n" => Ok(Scale::Nano),
            "u" | "μ" | "µ" => Ok(Scale::Micro),
            "m" => Ok(Scale::Milli),
            "c" => Ok(Scale::Centi),
            "k" | "K" => Ok(Scale::Kilo),
            "M" => Ok(Scale::Mega),
            "G" | "g" => Ok(Scale::Giga),
            "T" | "t" => Ok(Scale::Tera),
            _ => {
                bail!("unknown scale prefix '{}'", s);
            }
        }
    }
}

impl FromStr for Scale {
    type Err = Box<dyn std::error::Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pico" | "pico" | "p" => Ok(Scale::Pico),
            "Nano" | "nano" | "n" => Ok(Scale::Nano),
            "Micro" | "micro" | "u" | "μ" => Ok(Scale::Micro),
            "Milli" | "milli" | "m" | "mm" => Ok(Scale::Milli),
            "Centi" | "centi" | "c" | "cm" => Ok(Scale::Centi),
            "Kilo" | "kilo" | "k" | "kHz" | "khz" | "KHZ" => Ok(Scale::Kilo),
            "Mega" | "mega" | "M" | "MHz" | "mhz" | "MHZ" => Ok(Scale::Mega),
            "Giga" | "giga" | "G" | "GHz" | "ghz" | "GHZ" => Ok(Scale::Giga),
            "Tera" | "tera" | "T" | "THz" | "thz" | "THZ" => Ok(Scale::Tera),
            _ => Ok(Scale::Base),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[cfg(test)]
mod scale_tests {
    use super::*;
    use crate::util::comp_f64;
    use float_cmp::F64Margin;

    #[test]
    fn test_scale_from_str() {
        let tera = ["Tera", "tera", "T", "THz", "thz"];
        let giga = ["Giga", "giga", "G", "GHz", "ghz"];
        let mega = ["Mega", "mega", "M", "MHz", "mhz"];
        let kilo = ["Kilo", "kilo", "k", "kHz", "khz"];
        let milli = ["Milli", "milli", "m", "mm"];
        let micro = ["Micro", "micro", "u"];
        let nada = ["", "google", ".sfwe"];

        for mult in tera.iter() {
            assert_eq!(Scale::from_str(mult).unwrap(), Scale::Tera);
        }

        for mult in giga.iter() {
            assert_eq!(Scale::from_str(mult).unwrap(), Scale::Giga);
        }

        for mult in mega.iter() {
            assert_eq!(Scale::from_str(mult).unwrap(), Scale::Mega);
        }

        for mult in kilo.iter() {
            assert_eq!(Scale::from_str(mult).unwrap(), Scale::Kilo);
        }

        for mult in milli.iter() {
            assert_eq!(Scale::from_str(mult).unwrap(), Scale::Milli);
        }

        for mult in micro.iter() {
            assert_eq!(Scale::from_str(mult).unwrap(), Scale::Micro);
        }

        for mult in nada.iter() {
            assert_eq!(Scale::from_str(mult).unwrap(), Scale::Base);
        }
    }

    #[test]
    fn test_from_prefix() {
        assert_eq!(Scale::from_prefix("").unwrap(), Scale::Base);
        assert_eq!(Scale::from_prefix("m").unwrap(), Scale::Milli);
        assert_eq!(Scale::from_prefix("M").unwrap(), Scale::Mega);
        assert_eq!(Scale::from_prefix("G").unwrap(), Scale::Giga);
        assert!(Scale::from_prefix("x").is_err());
    }

    #[test]
    fn test_scale_unscale() {
        let margin = F64Margin::default();
        comp_f64(&Scale::Giga.scale(3e9), &3.0, margin, "scale(giga)", "");
        comp_f64(&Scale::Milli.scale(1.6e-3), &1.6, margin, "scale(milli)", "");
        comp_f64(&Scale::Milli.unscale(1.6), &1.6e-3, margin, "unscale(milli)", "");
        comp_f64(&Scale::Pico.unscale(1.0), &1e-12, margin, "unscale(pico)", "");

        let arr = Scale::Giga.scale_array(&Array1::from_vec(vec![1e9, 2e9]));
        comp_f64(&arr[1], &2.0, margin, "scale_array", "1");
        let arr = Scale::Giga.unscale_array(&arr);
        comp_f64(&arr[0], &1e9, margin, "unscale_array", "0");
    }
}
