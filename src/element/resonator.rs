//! Gap-coupled quarter-wave resonator.
//!
//! This is a toy model: the coupling coefficient is an exponential
//! heuristic in the gap and the response is a single-pole Lorentzian.
//! Neither is derived from field theory.

use crate::consts::{C0, Z_REF};
use crate::element::msub::Msub;
use crate::element::{Elem, ElemType};
use crate::error::{check_length, DesignError, Result};
use crate::frequency::Frequency;
use crate::network::Response;
use crate::scale::Scale;
use crate::unit::{Unit, UnitVal, UnitValBuilder};
use ndarray::prelude::*;
use num::complex::{c64, Complex64};
use tracing::debug;

/// Gap returned by `Resonator::dimensions_for`, in meters
pub const DEFAULT_GAP: f64 = 0.1e-3;

#[derive(Clone, Debug, PartialEq)]
pub struct Resonator {
    id: String,
    gap: UnitVal,
    length: UnitVal,
    width: UnitVal,
    sub: Msub,
    q_ext: f64,
    q_int: f64,
}

/// Response together with the figures it was computed from
#[derive(Clone, Debug, PartialEq)]
pub struct ResonatorResponse {
    pub response: Response,
    /// Hz
    pub f_res: f64,
    pub coupling: f64,
    pub q_loaded: f64,
}

impl Resonator {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Coupling gap g in meters
    pub fn gap(&self) -> f64 {
        self.gap.val()
    }

    /// Resonator length d in meters
    pub fn length(&self) -> f64 {
        self.length.val()
    }

    /// Strip width in meters
    pub fn width(&self) -> f64 {
        self.width.val()
    }

    pub fn sub(&self) -> &Msub {
        &self.sub
    }

    pub fn q_ext(&self) -> f64 {
        self.q_ext
    }

    pub fn q_int(&self) -> f64 {
        self.q_int
    }

    /// Loaded quality factor 1/(1/Qext + 1/Qint)
    pub fn q_loaded(&self) -> f64 {
        1.0 / (1.0 / self.q_ext + 1.0 / self.q_int)
    }

    /// Coupling coefficient k = 0.1·exp(-g/h)
    pub fn coupling(&self) -> f64 {
        0.1 * (-self.gap() / self.sub.height()).exp()
    }

    pub fn er_eff(&self) -> Result<f64> {
        self.sub.er_eff(self.width())
    }

    /// Quarter-wave resonance of the strip, c/(4·d·√εeff)
    pub fn resonant_frequency(&self) -> Result<f64> {
        Ok(C0 / (4.0 * self.length() * self.er_eff()?.sqrt()))
    }

    /// Length of a quarter-wave strip of this width resonating at `f_res`
    pub fn length_for(&self, f_res: f64) -> Result<f64> {
        quarter_wave(&self.sub, self.width(), f_res)
    }

    /// Layout (d, g, length) for a resonator of width `width` on `sub`
    /// resonating at `f_target`. The gap is fixed at `DEFAULT_GAP`.
    pub fn dimensions_for(sub: &Msub, width: f64, f_target: f64) -> Result<(f64, f64, f64)> {
        let length = quarter_wave(sub, width, f_target)?;
        Ok((length, DEFAULT_GAP, length))
    }

    /// Fractional detuning (f - f_res)/f_res at each point
    pub fn detuning(&self, freq: &Frequency) -> Result<Array1<f64>> {
        let f_res = self.resonant_frequency()?;
        Ok(freq.freqs().map(|&f| (f - f_res) / f_res))
    }

    pub fn analyze(&self, freq: &Frequency) -> Result<ResonatorResponse> {
        let f_res = self.resonant_frequency()?;
        let k = self.coupling();
        let q = self.q_loaded();
        debug!(id = %self.id, f_res, k, q, "resonator response");

        let mut s11 = Array1::<Complex64>::zeros(freq.npts());
        let mut s21 = Array1::<Complex64>::zeros(freq.npts());
        for (i, &f) in freq.iter().enumerate() {
            let jqd = c64(0.0, q * (f - f_res) / f_res);
            let denom = 1.0 + jqd;
            s11[i] = jqd / denom;
            s21[i] = k / denom;
        }
        let response = Response::symmetric(&self.id, freq, Z_REF, s11, s21)?;
        Ok(ResonatorResponse {
            response,
            f_res,
            coupling: k,
            q_loaded: q,
        })
    }
}

fn quarter_wave(sub: &Msub, width: f64, f_res: f64) -> Result<f64> {
    if !(f_res.is_finite() && f_res > 0.0) {
        return Err(DesignError::InvalidFrequency(format!(
            "resonant frequency must be positive, got {}",
            f_res
        )));
    }
    Ok(C0 / (4.0 * f_res * sub.er_eff(width)?.sqrt()))
}

impl Elem for Resonator {
    fn id(&self) -> &str {
        &self.id
    }

    fn elem(&self) -> ElemType {
        ElemType::Resonator
    }

    fn response(&self, freq: &Frequency) -> Result<Response> {
        Ok(self.analyze(freq)?.response)
    }
}

#[derive(Clone)]
pub struct ResonatorBuilder {
    id: String,
    gap: UnitVal,
    length: UnitVal,
    width: UnitVal,
    sub: Option<Msub>,
    q_ext: f64,
    q_int: f64,
}

impl ResonatorBuilder {
    pub fn new() -> Self {
        ResonatorBuilder::default()
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn gap_val(mut self, val: f64) -> Self {
        self.gap.set_val(val);
        self
    }

    pub fn gap_scaled(mut self, val: f64, scale: Scale) -> Self {
        self.gap.set_scale(scale);
        self.gap.set_val_scaled(val);
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

    pub fn width_val(mut self, val: f64) -> Self {
        self.width.set_val(val);
        self
    }

    pub fn width_scaled(mut self, val: f64, scale: Scale) -> Self {
        self.width.set_scale(scale);
        self.width.set_val_scaled(val);
        self
    }

    pub fn sub(mut self, val: &Msub) -> Self {
        self.sub = Some(val.clone());
        self
    }

    pub fn q_ext(mut self, val: f64) -> Self {
        self.q_ext = val;
        self
    }

    pub fn q_int(mut self, val: f64) -> Self {
        self.q_int = val;
        self
    }

    pub fn build(self) -> Result<Resonator> {
        let Some(sub) = self.sub else {
            return Err(DesignError::InvalidParameter(
                "resonator needs a substrate".to_string(),
            ));
        };
        check_length("gap", self.gap.val())?;
        check_length("resonator length", self.length.val())?;
        check_length("width", self.width.val())?;
        for (name, q) in [("external Q", self.q_ext), ("internal Q", self.q_int)] {
            if !(q.is_finite() && q > 0.0) {
                return Err(DesignError::InvalidParameter(format!(
                    "{} must be positive, got {}",
                    name, q
                )));
            }
        }
        Ok(Resonator {
            id: self.id,
            gap: self.gap,
            length: self.length,
            width: self.width,
            sub,
            q_ext: self.q_ext,
            q_int: self.q_int,
        })
    }
}

impl Default for ResonatorBuilder {
    fn default() -> Self {
        let mm = UnitValBuilder::new()
            .val(0.0)
            .scale(Scale::Milli)
            .unit(Unit::Meter)
            .build();
        Self {
            id: "RES0".to_string(),
            gap: mm,
            length: mm,
            width: mm,
            sub: None,
            q_ext: 100.0,
            q_int: 1000.0,
        }
    }
}
