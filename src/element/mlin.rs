use crate::consts::{C0, DB_PER_NEPER, Z_REF};
use crate::element::msub::{LineParams, Msub};
use crate::element::{Elem, ElemType};
use crate::error::{check_length, DesignError, Result};
use crate::frequency::Frequency;
use crate::network::Response;
use crate::scale::Scale;
use crate::unit::{Unit, UnitVal, UnitValBuilder};
use ndarray::prelude::*;
use num::complex::{c64, Complex64};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Conductor attenuation model for a uniform line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConductorLoss {
    /// Empirical 8.686·0.1·√f heuristic, not a physical skin-effect model
    #[default]
    Empirical,
    None,
}

impl FromStr for ConductorLoss {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "empirical" | "Empirical" => Ok(ConductorLoss::Empirical),
            "none" | "None" | "off" => Ok(ConductorLoss::None),
            _ => Err(DesignError::Parse(format!(
                "conductor loss model '{}' not recognized",
                s
            ))),
        }
    }
}

impl fmt::Display for ConductorLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConductorLoss::Empirical => write!(f, "empirical"),
            ConductorLoss::None => write!(f, "none"),
        }
    }
}

/// Uniform microstrip line between two ports of impedance `z_ref`
#[derive(Clone, Debug, PartialEq)]
pub struct Mlin {
    id: String,
    width: UnitVal,
    length: UnitVal,
    sub: Msub,
    z_ref: f64,
    loss: ConductorLoss,
}

impl Mlin {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Strip width in meters
    pub fn width(&self) -> f64 {
        self.width.val()
    }

    /// Physical length in meters
    pub fn length(&self) -> f64 {
        self.length.val()
    }

    pub fn width_unitval(&self) -> UnitVal {
        self.width
    }

    pub fn length_unitval(&self) -> UnitVal {
        self.length
    }

    pub fn sub(&self) -> &Msub {
        &self.sub
    }

    pub fn z_ref(&self) -> f64 {
        self.z_ref
    }

    pub fn conductor_loss(&self) -> ConductorLoss {
        self.loss
    }

    /// Quasi-static parameters of the strip, recomputed from the width
    pub fn params(&self) -> Result<LineParams> {
        self.sub.analyze(self.width())
    }

    pub fn z0(&self) -> Result<f64> {
        Ok(self.params()?.z0)
    }

    pub fn er_eff(&self) -> Result<f64> {
        Ok(self.params()?.er_eff)
    }

    /// Dielectric attenuation in Np/m
    pub fn alpha_d(&self, freq: f64, er_eff: f64) -> f64 {
        PI * freq * er_eff.sqrt() * self.sub.tand() / C0
    }

    /// Conductor attenuation per the selected heuristic
    pub fn alpha_c(&self, freq: f64) -> f64 {
        match self.loss {
            ConductorLoss::Empirical => DB_PER_NEPER * 0.1 * freq.sqrt(),
            ConductorLoss::None => 0.0,
        }
    }

    pub fn alpha(&self, freq: f64, er_eff: f64) -> f64 {
        self.alpha_d(freq, er_eff) + self.alpha_c(freq)
    }

    /// Phase constant in rad/m
    pub fn beta(&self, freq: f64, er_eff: f64) -> f64 {
        2.0 * PI * freq * er_eff.sqrt() / C0
    }

    pub fn gamma(&self, freq: f64, er_eff: f64) -> Complex64 {
        c64(self.alpha(freq, er_eff), self.beta(freq, er_eff))
    }

    /// Reflection coefficient of the line impedance against `z_ref`
    pub fn rho(&self) -> Result<f64> {
        let z0 = self.z0()?;
        Ok((z0 - self.z_ref) / (z0 + self.z_ref))
    }

    /// Two-port S-parameters of the mismatched lossy line at every point
    /// of `freq`
    pub fn s_params(&self, freq: &Frequency) -> Result<Response> {
        let params = self.params()?;
        let rho = (params.z0 - self.z_ref) / (params.z0 + self.z_ref);
        let rho2 = rho * rho;
        let len = self.length();
        debug!(
            id = %self.id,
            z0 = params.z0,
            er_eff = params.er_eff,
            rho,
            npts = freq.npts(),
            "line response"
        );

        let mut s11 = Array1::<Complex64>::zeros(freq.npts());
        let mut s21 = Array1::<Complex64>::zeros(freq.npts());
        for (i, &f) in freq.iter().enumerate() {
            let e = (-self.gamma(f, params.er_eff) * len).exp();
            let e2 = e * e;
            let denom = 1.0 - rho2 * e2;
            s11[i] = rho * (1.0 - e2) / denom;
            s21[i] = e * (1.0 - rho2) / denom;
        }
        Response::symmetric(&self.id, freq, self.z_ref, s11, s21)
    }
}

impl Elem for Mlin {
    fn id(&self) -> &str {
        &self.id
    }

    fn elem(&self) -> ElemType {
        ElemType::Mlin
    }

    fn response(&self, freq: &Frequency) -> Result<Response> {
        self.s_params(freq)
    }
}

/// Builder for Mlin. Either a width or a target impedance must be given;
/// a target impedance is synthesized into a width on `build`.
#[derive(Clone)]
pub struct MlinBuilder {
    id: String,
    width: UnitVal,
    length: UnitVal,
    sub: Option<Msub>,
    z0: Option<f64>,
    z_ref: f64,
    loss: ConductorLoss,
}

impl MlinBuilder {
    pub fn new() -> Self {
        MlinBuilder::default()
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn width(mut self, val: UnitVal) -> Self {
        self.width = val;
        self
    }

    pub fn width_val(mut self, val: f64) -> Self {
        self.width.set_val(val);
        self
    }

    pub fn width_scaled(mut self, val: f64, scale: Scale) -> Self {
        self.width.set_scale(scale);
        self.width.set_val_scaled(val);
        self
    }

    pub fn length(mut self, val: UnitVal) -> Self {
        self.length = val;
        self
    }

    pub fn length_val(mut self, val: f64) -> Self {
        self.length.set_val(val);
        self
    }

    pub fn length_scaled(mut self, val: f64, scale: Scale) -> Self {
        self.length.set_scale(scale);
        self.length.set_val_scaled(val);
        self
    }

    pub fn sub(mut self, val: &Msub) -> Self {
        self.sub = Some(val.clone());
        self
    }

    /// Size the strip for this characteristic impedance instead of a width
    pub fn z0(mut self, z0: f64) -> Self {
        self.z0 = Some(z0);
        self
    }

    pub fn z_ref(mut self, val: f64) -> Self {
        self.z_ref = val;
        self
    }

    pub fn conductor_loss(mut self, val: ConductorLoss) -> Self {
        self.loss = val;
        self
    }

    pub fn build(self) -> Result<Mlin> {
        let Some(sub) = self.sub else {
            return Err(DesignError::InvalidParameter(
                "line needs a substrate".to_string(),
            ));
        };
        let mut width = self.width;
        if let Some(z0) = self.z0 {
            width.set_val(sub.width(z0)?);
        }
        check_length("width", width.val())?;
        check_length("length", self.length.val())?;
        if !(self.z_ref.is_finite() && self.z_ref > 0.0) {
            return Err(DesignError::InvalidParameter(format!(
                "reference impedance must be positive, got {}",
                self.z_ref
            )));
        }
        Ok(Mlin {
            id: self.id,
            width,
            length: self.length,
            sub,
            z_ref: self.z_ref,
            loss: self.loss,
        })
    }
}

impl Default for MlinBuilder {
    fn default() -> Self {
        let mm = UnitValBuilder::new()
            .val(0.0)
            .scale(Scale::Milli)
            .unit(Unit::Meter)
            .build();
        Self {
            id: "ML0".to_string(),
            width: mm,
            length: mm,
            sub: None,
            z0: None,
            z_ref: Z_REF,
            loss: ConductorLoss::Empirical,
        }
    }
}
