use crate::consts::{C0, ETA0};
use crate::error::{check_length, DesignError, Result};
use crate::scale::Scale;
use crate::unit::{Unit, UnitVal, UnitValBuilder};
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;

/// Impedance at or above which synthesis uses the narrow-strip inverse
pub const SYNTHESIS_SPLIT_OHMS: f64 = 44.0;

/// Which closed-form branch produced a result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Regime {
    /// w/h < 1 (analysis) or Z ≥ 44 Ω (synthesis)
    Narrow,
    /// w/h ≥ 1 (analysis) or Z < 44 Ω (synthesis)
    Wide,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Narrow => write!(f, "narrow"),
            Regime::Wide => write!(f, "wide"),
        }
    }
}

/// Quasi-static electrical parameters of a strip of given width
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LineParams {
    /// Strip width in meters
    pub width: f64,
    pub er_eff: f64,
    /// Characteristic impedance in Ω
    pub z0: f64,
    pub regime: Regime,
}

/// Microstrip substrate. Immutable once built; share it by reference
/// between every element laid out on the same board.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Msub {
    id: String,
    er: f64,
    height: UnitVal,
    tand: f64,
}

impl Msub {
    pub fn new(id: &str, er: f64, height: f64, tand: f64) -> Result<Msub> {
        MsubBuilder::new()
            .id(id)
            .er(er)
            .height_val(height)
            .tand(tand)
            .build()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn er(&self) -> f64 {
        self.er
    }

    pub fn tand(&self) -> f64 {
        self.tand
    }

    /// Substrate height in meters
    pub fn height(&self) -> f64 {
        self.height.val()
    }

    pub fn height_unitval(&self) -> UnitVal {
        self.height
    }

    /// Analysis branch for a strip of width w
    pub fn regime(&self, w: f64) -> Regime {
        match w / self.height() >= 1.0 {
            true => Regime::Wide,
            false => Regime::Narrow,
        }
    }

    /// Effective permittivity, Hammerstad model with the narrow-strip
    /// correction term
    pub fn er_eff(&self, w: f64) -> Result<f64> {
        let w = check_length("width", w)?;
        Ok(self.er_eff_unchecked(w))
    }

    fn er_eff_unchecked(&self, w: f64) -> f64 {
        let u = w / self.height();
        let fill = (1.0 + 12.0 / u).powf(-0.5);
        match self.regime(w) {
            Regime::Wide => (self.er + 1.0) / 2.0 + (self.er - 1.0) / 2.0 * fill,
            Regime::Narrow => {
                (self.er + 1.0) / 2.0
                    + (self.er - 1.0) / 2.0 * (fill + 0.04 * (1.0 - u).powi(2))
            }
        }
    }

    /// Characteristic impedance in Ω
    pub fn z0(&self, w: f64) -> Result<f64> {
        Ok(self.analyze(w)?.z0)
    }

    /// Forward mapping width → (εeff, Z0)
    pub fn analyze(&self, w: f64) -> Result<LineParams> {
        let w = check_length("width", w)?;
        let u = w / self.height();
        let er_eff = self.er_eff_unchecked(w);
        let regime = self.regime(w);
        let z0 = match regime {
            Regime::Wide => ETA0 / (er_eff.sqrt() * (u + 1.393 + 0.667 * (u + 1.444).ln())),
            Regime::Narrow => 60.0 / er_eff.sqrt() * (8.0 / u + u / 4.0).ln(),
        };
        Ok(LineParams {
            width: w,
            er_eff,
            z0,
            regime,
        })
    }

    /// Synthesis branch for a target impedance
    pub fn synthesis_regime(z0: f64) -> Regime {
        match z0 < SYNTHESIS_SPLIT_OHMS {
            true => Regime::Wide,
            false => Regime::Narrow,
        }
    }

    /// Inverse mapping Z0 → width in meters (closed-form Wheeler/Hammerstad
    /// synthesis, no iteration)
    pub fn width(&self, z0: f64) -> Result<f64> {
        if !(z0.is_finite() && z0 > 0.0) {
            return Err(DesignError::InvalidParameter(format!(
                "target impedance must be positive, got {}",
                z0
            )));
        }
        let er = self.er;
        let u = match Msub::synthesis_regime(z0) {
            Regime::Narrow => {
                let a = z0 / 60.0 * ((er + 1.0) / 2.0).sqrt()
                    + (er - 1.0) / (er + 1.0) * (0.23 + 0.11 / er);
                8.0 * a.exp() / ((2.0 * a).exp() - 2.0)
            }
            Regime::Wide => {
                let b = ETA0 * PI / (2.0 * z0 * er.sqrt());
                2.0 / PI
                    * (b - 1.0 - (2.0 * b - 1.0).ln()
                        + (er - 1.0) / (2.0 * er) * ((b - 1.0).ln() + 0.39 - 0.61 / er))
            }
        };
        let w = u * self.height();
        if !(w.is_finite() && w > 0.0) {
            return Err(DesignError::InvalidParameter(format!(
                "no physical strip width realizes {} Ω on er={}",
                z0, er
            )));
        }
        Ok(w)
    }

    /// Width for z0 together with the forward parameters of that width
    pub fn synthesize(&self, z0: f64) -> Result<LineParams> {
        self.analyze(self.width(z0)?)
    }

    /// Guided wavelength c/(f·√εr) in the bulk substrate
    pub fn guided_wavelength(&self, freq: f64) -> Result<f64> {
        if !(freq.is_finite() && freq > 0.0) {
            return Err(DesignError::InvalidFrequency(format!(
                "frequency must be positive, got {}",
                freq
            )));
        }
        Ok(C0 / (freq * self.er.sqrt()))
    }
}

/// Builder for Msub. There are no usable defaults: relative permittivity and
/// height must be supplied or `build` fails.
#[derive(Clone)]
pub struct MsubBuilder {
    id: String,
    er: f64,
    height: UnitVal,
    tand: f64,
}

impl MsubBuilder {
    pub fn new() -> Self {
        MsubBuilder::default()
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn er(mut self, val: f64) -> Self {
        self.er = val;
        self
    }

    pub fn tand(mut self, val: f64) -> Self {
        self.tand = val;
        self
    }

    pub fn height(mut self, val: UnitVal) -> Self {
        self.height = val;
        self
    }

    pub fn height_val(mut self, val: f64) -> Self {
        self.height.set_val(val);
        self
    }

    pub fn height_scaled(mut self, val: f64, scale: Scale) -> Self {
        self.height.set_scale(scale);
        self.height.set_val_scaled(val);
        self
    }

    pub fn build(self) -> Result<Msub> {
        if !(self.er.is_finite() && self.er > 1.0) {
            return Err(DesignError::InvalidParameter(format!(
                "relative permittivity must exceed 1, got {}",
                self.er
            )));
        }
        check_length("substrate height", self.height.val())?;
        if !(self.tand.is_finite() && self.tand >= 0.0) {
            return Err(DesignError::InvalidParameter(format!(
                "loss tangent must be non-negative, got {}",
                self.tand
            )));
        }
        Ok(Msub {
            id: self.id,
            er: self.er,
            height: self.height,
            tand: self.tand,
        })
    }
}

impl Default for MsubBuilder {
    fn default() -> Self {
        Self {
            id: "Msub0".to_string(),
            er: 1.0,
            height: UnitValBuilder::new()
                .val(0.0)
                .scale(Scale::Milli)
                .unit(Unit::Meter)
                .build(),
            tand: 0.0,
        }
    }
}
