//! TOML design configuration.
//!
//! Every section has defaults matching an FR4 board, so an empty file is a
//! valid configuration. Quantities may be given as numbers in base SI units
//! or as strings with a prefix and unit:
//!
//! ```toml
//! [substrate]
//! er = 4.4
//! height = "1.6mm"
//! tand = 0.025
//!
//! [lpf]
//! cutoff = "3 GHz"
//! order = 5
//! ```

use crate::element::mlin::{ConductorLoss, Mlin, MlinBuilder};
use crate::element::msub::{Msub, MsubBuilder};
use crate::element::resonator::{Resonator, ResonatorBuilder};
use crate::error::{DesignError, Result};
use crate::filter::stepped::{FilterDesign, SteppedLpf};
use crate::frequency::Frequency;
use crate::scale::Scale;
use crate::unit::{Unit, UnitVal};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::debug;

/// A number in base units or a string such as `"1.6mm"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Value(f64),
    Text(String),
}

impl Quantity {
    pub fn resolve(&self, unit: Unit) -> Result<UnitVal> {
        match self {
            Quantity::Value(v) => Ok(UnitVal::new(*v, Scale::Base, unit)),
            Quantity::Text(s) => Ok(UnitVal::parse(s, unit)?),
        }
    }

    /// Value in base units
    pub fn val(&self, unit: Unit) -> Result<f64> {
        Ok(self.resolve(unit)?.val())
    }
}

impl From<&str> for Quantity {
    fn from(s: &str) -> Self {
        Quantity::Text(s.to_string())
    }
}

impl From<f64> for Quantity {
    fn from(v: f64) -> Self {
        Quantity::Value(v)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Value(v) => write!(f, "{}", v),
            Quantity::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstrateConfig {
    pub er: f64,
    pub height: Quantity,
    pub tand: f64,
}

impl Default for SubstrateConfig {
    fn default() -> Self {
        Self {
            er: 4.4,
            height: "1.6mm".into(),
            tand: 0.025,
        }
    }
}

impl SubstrateConfig {
    pub fn build(&self) -> Result<Msub> {
        MsubBuilder::new()
            .id("SUB")
            .er(self.er)
            .height(self.height.resolve(Unit::Meter)?)
            .tand(self.tand)
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub start: Quantity,
    pub stop: Quantity,
    pub points: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: "1GHz".into(),
            stop: "10GHz".into(),
            points: 1000,
        }
    }
}

impl SweepConfig {
    pub fn build(&self) -> Result<Frequency> {
        Frequency::linspace(
            self.start.val(Unit::Hz)?,
            self.stop.val(Unit::Hz)?,
            self.points,
            Scale::Base,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    pub width: Quantity,
    pub length: Quantity,
    pub z_ref: f64,
    pub conductor_loss: ConductorLoss,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            width: "2mm".into(),
            length: "10mm".into(),
            z_ref: 50.0,
            conductor_loss: ConductorLoss::Empirical,
        }
    }
}

impl LineConfig {
    pub fn build(&self, sub: &Msub) -> Result<Mlin> {
        MlinBuilder::new()
            .id("TL1")
            .width(self.width.resolve(Unit::Meter)?)
            .length(self.length.resolve(Unit::Meter)?)
            .z_ref(self.z_ref)
            .conductor_loss(self.conductor_loss)
            .sub(sub)
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LpfConfig {
    pub cutoff: Quantity,
    pub order: usize,
    pub z0: f64,
    pub sweep: SweepConfig,
}

impl Default for LpfConfig {
    fn default() -> Self {
        Self {
            cutoff: "3GHz".into(),
            order: 5,
            z0: 50.0,
            sweep: SweepConfig {
                start: "0.1GHz".into(),
                stop: "6GHz".into(),
                points: 1000,
            },
        }
    }
}

impl LpfConfig {
    pub fn build(&self, sub: &Msub) -> Result<FilterDesign> {
        SteppedLpf::new(sub, self.z0)?.design(self.cutoff.val(Unit::Hz)?, self.order)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResonatorConfig {
    pub gap: Quantity,
    pub length: Quantity,
    pub width: Quantity,
    pub q_ext: f64,
    pub q_int: f64,
    pub sweep: SweepConfig,
}

impl Default for ResonatorConfig {
    fn default() -> Self {
        Self {
            gap: "0.05mm".into(),
            length: "6mm".into(),
            width: "1mm".into(),
            q_ext: 100.0,
            q_int: 1000.0,
            sweep: SweepConfig::default(),
        }
    }
}

impl ResonatorConfig {
    pub fn build(&self, sub: &Msub) -> Result<Resonator> {
        ResonatorBuilder::new()
            .id("RES1")
            .gap_val(self.gap.val(Unit::Meter)?)
            .length_val(self.length.val(Unit::Meter)?)
            .width_val(self.width.val(Unit::Meter)?)
            .q_ext(self.q_ext)
            .q_int(self.q_int)
            .sub(sub)
            .build()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    pub substrate: SubstrateConfig,
    pub sweep: SweepConfig,
    pub line: LineConfig,
    pub lpf: LpfConfig,
    pub resonator: ResonatorConfig,
}

impl DesignConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.as_ref().display(), "loaded design config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| DesignError::Parse(e.to_string()))
    }

    /// Build every section once so that a bad value is reported up front
    pub fn validate(&self) -> Result<()> {
        let sub = self.substrate.build()?;
        self.sweep.build()?;
        self.line.build(&sub)?;
        self.lpf.build(&sub)?;
        self.lpf.sweep.build()?;
        self.resonator.build(&sub)?;
        self.resonator.sweep.build()?;
        Ok(())
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use crate::util::comp_f64;
    use float_cmp::F64Margin;

    #[test]
    fn empty_file_uses_defaults() {
        let config = DesignConfig::from_toml_str("").unwrap();
        assert_eq!(config, DesignConfig::default());
        assert!(config.validate().is_ok());

        let sub = config.substrate.build().unwrap();
        assert_eq!(sub.er(), 4.4);
        comp_f64(&1.6e-3, &sub.height(), F64Margin::default(), "height", "");
        let sweep = config.sweep.build().unwrap();
        assert_eq!(sweep.npts(), 1000);
        assert_eq!(sweep.start(), 1e9);
        assert_eq!(sweep.stop(), 10e9);
        assert_eq!(config.lpf.sweep.build().unwrap().stop(), 6e9);
    }

    #[test]
    fn partial_sections() {
        let text = r#"
[substrate]
er = 10.2
height = 0.635e-3

[line]
width = "0.6 mm"
conductor_loss = "none"

[lpf]
cutoff = "2.4GHz"
"#;
        let config = DesignConfig::from_toml_str(text).unwrap();
        assert_eq!(config.substrate.er, 10.2);
        assert_eq!(config.substrate.tand, 0.025);
        assert_eq!(config.substrate.height, Quantity::Value(0.635e-3));
        assert_eq!(config.line.conductor_loss, ConductorLoss::None);
        assert_eq!(config.line.length, Quantity::from("10mm"));
        assert_eq!(config.lpf.order, 5);

        let sub = config.substrate.build().unwrap();
        let tl = config.line.build(&sub).unwrap();
        comp_f64(&0.6e-3, &tl.width(), F64Margin::default(), "width", "");
        let lpf = config.lpf.build(&sub).unwrap();
        assert_eq!(lpf.cutoff(), 2.4e9);
    }

    #[test]
    fn bad_values_are_reported() {
        let config = DesignConfig::from_toml_str("[lpf]\norder = 3\n").unwrap();
        assert_eq!(config.validate(), Err(DesignError::UnsupportedOrder(3)));

        let config = DesignConfig::from_toml_str("[line]\nwidth = \"2 GHz\"\n").unwrap();
        assert!(matches!(config.validate(), Err(DesignError::Parse(_))));

        let config = DesignConfig::from_toml_str("[substrate]\ner = 0.5\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(DesignError::InvalidParameter(_))
        ));

        assert!(matches!(
            DesignConfig::from_toml_str("[substrate]\ner = \"high\"\n"),
            Err(DesignError::Parse(_))
        ));
    }

    #[test]
    fn toml_round_trip() {
        let mut config = DesignConfig::default();
        config.resonator.q_ext = 250.0;
        config.sweep.points = 11;
        let text = config.to_toml_string().unwrap();
        assert_eq!(DesignConfig::from_toml_str(&text).unwrap(), config);
    }
}
