//! Stepped-impedance microstrip low-pass filter.
//!
//! Odd prototype elements become high-impedance (series inductive)
//! sections and even elements low-impedance (shunt capacitive) sections.
//! Every section shares one physical length, λg/8 at the cutoff.

use crate::consts::Z_REF;
use crate::element::msub::Msub;
use crate::element::{Elem, ElemType};
use crate::error::{DesignError, Result};
use crate::filter::prototype::Prototype;
use crate::frequency::Frequency;
use crate::network::Response;
use ndarray::prelude::*;
use num::complex::{c64, Complex64};
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;
use tracing::debug;

/// Series inductance lumped onto each high-impedance section (H)
pub const SERIES_L: f64 = 1e-9;
/// Shunt capacitance lumped onto each low-impedance section (F)
pub const SHUNT_C: f64 = 1e-12;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SectionKind {
    High,
    Low,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::High => write!(f, "high"),
            SectionKind::Low => write!(f, "low"),
        }
    }
}

/// One physical section of the ladder
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Section {
    /// 1-based position, matching the prototype element index
    pub index: usize,
    pub kind: SectionKind,
    pub g: f64,
    /// Ω
    pub z0: f64,
    /// meters
    pub width: f64,
}

/// Synthesizer bound to a substrate and system impedance
#[derive(Clone, Debug, PartialEq)]
pub struct SteppedLpf {
    sub: Msub,
    z0: f64,
}

impl SteppedLpf {
    pub fn new(sub: &Msub, z0: f64) -> Result<SteppedLpf> {
        if !(z0.is_finite() && z0 > 0.0) {
            return Err(DesignError::InvalidParameter(format!(
                "system impedance must be positive, got {}",
                z0
            )));
        }
        Ok(SteppedLpf {
            sub: sub.clone(),
            z0,
        })
    }

    pub fn sub(&self) -> &Msub {
        &self.sub
    }

    pub fn z0(&self) -> f64 {
        self.z0
    }

    pub fn z_high(&self, g: f64) -> f64 {
        self.z0 * (1.0 + g * PI / 2.0 * (self.z0 / Z_REF)).sqrt()
    }

    pub fn z_low(&self, g: f64) -> f64 {
        self.z0 / (1.0 + g * PI / 2.0 * (Z_REF / self.z0)).sqrt()
    }

    pub fn design(&self, cutoff: f64, order: usize) -> Result<FilterDesign> {
        let proto = Prototype::lookup(order)?;
        let lambda_g = self.sub.guided_wavelength(cutoff)?;

        let sections = proto
            .elements()
            .iter()
            .enumerate()
            .map(|(i, &g)| {
                let index = i + 1;
                let (kind, z0) = match index % 2 {
                    1 => (SectionKind::High, self.z_high(g)),
                    _ => (SectionKind::Low, self.z_low(g)),
                };
                let width = self.sub.width(z0)?;
                debug!(index, %kind, g, z0, width, "lpf section");
                Ok(Section {
                    index,
                    kind,
                    g,
                    z0,
                    width,
                })
            })
            .collect::<Result<Vec<Section>>>()?;

        Ok(FilterDesign {
            cutoff,
            order,
            z0: self.z0,
            lambda_g,
            section_length: lambda_g / 8.0,
            sections,
            sub: self.sub.clone(),
        })
    }
}

/// Synthesized stepped-impedance ladder
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FilterDesign {
    cutoff: f64,
    order: usize,
    z0: f64,
    lambda_g: f64,
    section_length: f64,
    sections: Vec<Section>,
    sub: Msub,
}

impl FilterDesign {
    /// Cutoff in Hz
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn z0(&self) -> f64 {
        self.z0
    }

    pub fn sub(&self) -> &Msub {
        &self.sub
    }

    /// Guided wavelength at the cutoff in meters
    pub fn lambda_g(&self) -> f64 {
        self.lambda_g
    }

    /// Length shared by every section in meters
    pub fn section_length(&self) -> f64 {
        self.section_length
    }

    pub fn total_length(&self) -> f64 {
        self.section_length * self.sections.len() as f64
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn high_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.kind == SectionKind::High)
    }

    pub fn low_sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter().filter(|s| s.kind == SectionKind::Low)
    }

    /// Coarse lumped cascade: each high section as a series Zh + jωL, each
    /// low section as a shunt 1/Zl + jωC, with S11 = 1 - S21. For
    /// illustration only; it is not a circuit simulation of the ladder.
    pub fn lumped_response(&self, freq: &Frequency) -> Result<Response> {
        let z0 = self.z0;
        let mut s11 = Array1::<Complex64>::zeros(freq.npts());
        let mut s21 = Array1::<Complex64>::zeros(freq.npts());
        for (i, &f) in freq.iter().enumerate() {
            let w = 2.0 * PI * f;
            let t = self
                .sections
                .iter()
                .fold(c64(1.0, 0.0), |acc, sec| match sec.kind {
                    SectionKind::High => {
                        let zs = c64(sec.z0, w * SERIES_L);
                        acc * (2.0 * z0) / (zs + 2.0 * z0)
                    }
                    SectionKind::Low => {
                        let y = c64(1.0 / sec.z0, w * SHUNT_C);
                        acc / (1.0 + y * z0 / 2.0)
                    }
                });
            s21[i] = t;
            s11[i] = 1.0 - t;
        }
        Response::symmetric("lpf", freq, z0, s11, s21)
    }

    /// Maximally flat reference magnitude 1/(1 + (f/fc)^2n), real valued
    pub fn ideal_response(&self, freq: &Frequency) -> Result<Response> {
        let n = 2 * self.order as i32;
        let s21 = freq
            .freqs()
            .map(|&f| c64(1.0 / (1.0 + (f / self.cutoff).powi(n)), 0.0));
        let s11 = s21.map(|s| 1.0 - s);
        Response::symmetric("lpf_ideal", freq, self.z0, s11, s21)
    }
}

impl Elem for FilterDesign {
    fn id(&self) -> &str {
        "lpf"
    }

    fn elem(&self) -> ElemType {
        ElemType::SteppedLpf
    }

    fn response(&self, freq: &Frequency) -> Result<Response> {
        self.lumped_response(freq)
    }
}
