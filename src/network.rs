use crate::error::{DesignError, Result};
use crate::frequency::Frequency;
use ndarray::prelude::*;
use num::complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Two-port scattering parameter selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SParam {
    S11,
    S21,
    S12,
    S22,
}

impl SParam {
    pub const ALL: [SParam; 4] = [SParam::S11, SParam::S21, SParam::S12, SParam::S22];

    pub fn to_str(&self) -> &str {
        match self {
            SParam::S11 => "S11",
            SParam::S21 => "S21",
            SParam::S12 => "S12",
            SParam::S22 => "S22",
        }
    }
}

impl FromStr for SParam {
    type Err = DesignError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "S11" | "s11" => Ok(SParam::S11),
            "S21" | "s21" => Ok(SParam::S21),
            "S12" | "s12" => Ok(SParam::S12),
            "S22" | "s22" => Ok(SParam::S22),
            _ => Err(DesignError::Parse(format!("unknown S-parameter '{}'", s))),
        }
    }
}

impl fmt::Display for SParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Complex two-port response sampled on a frequency sweep, referenced to a
/// real port impedance.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    name: String,
    freq: Frequency,
    z_ref: f64,
    s11: Array1<Complex64>,
    s21: Array1<Complex64>,
    s12: Array1<Complex64>,
    s22: Array1<Complex64>,
}

impl Response {
    pub fn new(
        name: &str,
        freq: &Frequency,
        z_ref: f64,
        s11: Array1<Complex64>,
        s21: Array1<Complex64>,
        s12: Array1<Complex64>,
        s22: Array1<Complex64>,
    ) -> Result<Response> {
        if !(z_ref.is_finite() && z_ref > 0.0) {
            return Err(DesignError::InvalidParameter(format!(
                "reference impedance must be positive, got {}",
                z_ref
            )));
        }
        for (p, arr) in SParam::ALL.iter().zip([&s11, &s21, &s12, &s22]) {
            if arr.len() != freq.npts() {
                return Err(DesignError::InvalidParameter(format!(
                    "{} has {} points but the sweep has {}",
                    p,
                    arr.len(),
                    freq.npts()
                )));
            }
        }
        Ok(Response {
            name: name.to_string(),
            freq: freq.clone(),
            z_ref,
            s11,
            s21,
            s12,
            s22,
        })
    }

    /// Reciprocal, symmetric two-port: S12 = S21 and S22 = S11
    pub fn symmetric(
        name: &str,
        freq: &Frequency,
        z_ref: f64,
        s11: Array1<Complex64>,
        s21: Array1<Complex64>,
    ) -> Result<Response> {
        let s12 = s21.clone();
        let s22 = s11.clone();
        Response::new(name, freq, z_ref, s11, s21, s12, s22)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn freq(&self) -> &Frequency {
        &self.freq
    }

    pub fn z_ref(&self) -> f64 {
        self.z_ref
    }

    pub fn npts(&self) -> usize {
        self.freq.npts()
    }

    pub fn s(&self, p: SParam) -> &Array1<Complex64> {
        match p {
            SParam::S11 => &self.s11,
            SParam::S21 => &self.s21,
            SParam::S12 => &self.s12,
            SParam::S22 => &self.s22,
        }
    }

    pub fn s11(&self) -> &Array1<Complex64> {
        &self.s11
    }

    pub fn s21(&self) -> &Array1<Complex64> {
        &self.s21
    }

    pub fn s12(&self) -> &Array1<Complex64> {
        &self.s12
    }

    pub fn s22(&self) -> &Array1<Complex64> {
        &self.s22
    }

    /// Linear magnitude
    pub fn mag(&self, p: SParam) -> Array1<f64> {
        self.s(p).map(|s| s.norm())
    }

    /// 20·log10|S|. An exact zero maps to -inf.
    pub fn db(&self, p: SParam) -> Array1<f64> {
        self.s(p).map(|s| 20.0 * s.norm().log10())
    }

    /// Wrapped phase in degrees
    pub fn deg(&self, p: SParam) -> Array1<f64> {
        self.s(p).map(|s| s.arg().to_degrees())
    }

    /// Wrapped phase in radians
    pub fn rad(&self, p: SParam) -> Array1<f64> {
        self.s(p).map(|s| s.arg())
    }

    /// Phase in radians with 2π jumps between neighbouring points removed
    pub fn unwrapped_rad(&self, p: SParam) -> Array1<f64> {
        unwrap_phase(&self.rad(p))
    }

    pub fn unwrapped_deg(&self, p: SParam) -> Array1<f64> {
        self.unwrapped_rad(p).map(|x| x.to_degrees())
    }

    /// Group delay -dφ/dω in seconds by forward difference; one point
    /// shorter than the sweep and empty for a single-point sweep.
    pub fn group_delay(&self, p: SParam) -> Array1<f64> {
        let phase = self.unwrapped_rad(p);
        let w = self.freq.w();
        let n = self.npts().saturating_sub(1);
        Array1::from_shape_fn(n, |i| -(phase[i + 1] - phase[i]) / (w[i + 1] - w[i]))
    }

    /// |S11|² + |S21|², the fraction of port-1 incident power that is
    /// reflected or transmitted
    pub fn power_sum(&self) -> Array1<f64> {
        Array1::from_shape_fn(self.npts(), |i| {
            self.s11[i].norm_sqr() + self.s21[i].norm_sqr()
        })
    }

    /// Power is conserved at both ports within `tol`
    pub fn is_lossless(&self, tol: f64) -> bool {
        (0..self.npts()).all(|i| {
            (self.s11[i].norm_sqr() + self.s21[i].norm_sqr() - 1.0).abs() <= tol
                && (self.s12[i].norm_sqr() + self.s22[i].norm_sqr() - 1.0).abs() <= tol
        })
    }

    /// Never produces gain at either port within `tol`
    pub fn is_passive(&self, tol: f64) -> bool {
        (0..self.npts()).all(|i| {
            self.s11[i].norm_sqr() + self.s21[i].norm_sqr() <= 1.0 + tol
                && self.s12[i].norm_sqr() + self.s22[i].norm_sqr() <= 1.0 + tol
        })
    }

    pub fn is_reciprocal(&self, tol: f64) -> bool {
        self.s12
            .iter()
            .zip(self.s21.iter())
            .all(|(a, b)| (a - b).norm() <= tol)
    }

    /// Value of `p` at the sweep point nearest `freq` (Hz)
    pub fn at(&self, p: SParam, freq: f64) -> Complex64 {
        self.s(p)[self.freq.nearest_idx(freq)]
    }

    pub fn db_at(&self, p: SParam, freq: f64) -> f64 {
        20.0 * self.at(p, freq).norm().log10()
    }

    /// Flattened view for serialization
    pub fn table(&self) -> ResponseTable {
        let col = |arr: Array1<f64>| arr.to_vec();
        let db = |p: SParam| {
            self.db(p)
                .iter()
                .map(|&v| if v.is_finite() { Some(v) } else { None })
                .collect()
        };
        ResponseTable {
            name: self.name.clone(),
            z_ref: self.z_ref,
            freq_hz: self.freq.freqs().to_vec(),
            s11_db: db(SParam::S11),
            s11_deg: col(self.deg(SParam::S11)),
            s21_db: db(SParam::S21),
            s21_deg: col(self.deg(SParam::S21)),
            s12_db: db(SParam::S12),
            s12_deg: col(self.deg(SParam::S12)),
            s22_db: db(SParam::S22),
            s22_deg: col(self.deg(SParam::S22)),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.table())?)
    }
}

fn unwrap_phase(phase: &Array1<f64>) -> Array1<f64> {
    let mut out = phase.clone();
    let mut offset = 0.0;
    for i in 1..phase.len() {
        let d = phase[i] - phase[i - 1];
        if d.abs() > PI {
            offset -= 2.0 * PI * (d / (2.0 * PI)).round();
        }
        out[i] = phase[i] + offset;
    }
    out
}

/// Columnar magnitude/phase view of a Response. A dB entry is `None` where
/// the magnitude is exactly zero, and serializes as `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResponseTable {
    pub name: String,
    pub z_ref: f64,
    pub freq_hz: Vec<f64>,
    pub s11_db: Vec<Option<f64>>,
    pub s11_deg: Vec<f64>,
    pub s21_db: Vec<Option<f64>>,
    pub s21_deg: Vec<f64>,
    pub s12_db: Vec<Option<f64>>,
    pub s12_deg: Vec<f64>,
    pub s22_db: Vec<Option<f64>>,
    pub s22_deg: Vec<f64>,
}

impl ResponseTable {
    /// dB column with zero magnitudes restored to `-inf`
    pub fn db_column(&self, p: SParam) -> Array1<f64> {
        let col = match p {
            SParam::S11 => &self.s11_db,
            SParam::S21 => &self.s21_db,
            SParam::S12 => &self.s12_db,
            SParam::S22 => &self.s22_db,
        };
        col.iter().map(|v| v.unwrap_or(f64::NEG_INFINITY)).collect()
    }
}
