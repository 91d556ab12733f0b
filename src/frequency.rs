use crate::consts::C0;
use crate::error::{DesignError, Result};
use crate::scale::Scale;
use ndarray::prelude::*;
use serde::Serialize;
use std::f64::consts::PI;

/// Ordered frequency sweep. Points are stored in Hz, strictly increasing
/// and positive; `scale` only affects presentation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frequency {
    pts: Array1<f64>,
    scale: Scale,
}

impl Frequency {
    /// Sweep from explicit points given in `scale` units.
    pub fn new(pts: Array1<f64>, scale: Scale) -> Result<Frequency> {
        let pts = scale.unscale_array(&pts);
        check_points(&pts)?;
        Ok(Frequency { pts, scale })
    }

    /// `npts` evenly spaced points from `start` to `stop` inclusive, both in
    /// `scale` units.
    pub fn linspace(start: f64, stop: f64, npts: usize, scale: Scale) -> Result<Frequency> {
        if npts == 0 {
            return Err(DesignError::InvalidFrequency(
                "sweep needs at least one point".to_string(),
            ));
        }
        if !(start.is_finite() && start > 0.0) {
            return Err(DesignError::InvalidFrequency(format!(
                "sweep start must be positive, got {}",
                start
            )));
        }
        if !stop.is_finite() || stop < start || (npts > 1 && stop == start) {
            return Err(DesignError::InvalidFrequency(format!(
                "sweep stop {} must be above start {}",
                stop, start
            )));
        }
        let pts = match npts {
            1 => array![start],
            _ => {
                let step = (stop - start) / (npts - 1) as f64;
                Array1::from_shape_fn(npts, |i| match i {
                    i if i == npts - 1 => stop,
                    i => start + i as f64 * step,
                })
            }
        };
        Frequency::new(pts, scale)
    }

    /// One-point sweep
    pub fn single(freq: f64, scale: Scale) -> Result<Frequency> {
        Frequency::linspace(freq, freq, 1, scale)
    }

    /// Frequency in Hz at index i
    pub fn freq(&self, i: usize) -> f64 {
        self.pts[i]
    }

    /// All points in Hz
    pub fn freqs(&self) -> &Array1<f64> {
        &self.pts
    }

    /// All points expressed in `scale`
    pub fn freqs_scaled(&self, scale: Scale) -> Array1<f64> {
        scale.scale_array(&self.pts)
    }

    pub fn npts(&self) -> usize {
        self.pts.len()
    }

    pub fn start(&self) -> f64 {
        self.pts[0]
    }

    pub fn stop(&self) -> f64 {
        self.pts[self.pts.len() - 1]
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Angular frequency ω in rad/s
    pub fn w(&self) -> Array1<f64> {
        self.pts.map(|&f| 2.0 * PI * f)
    }

    /// Wavelength in meters at index i in a medium of relative permittivity er
    pub fn wavelength(&self, er: f64, i: usize) -> f64 {
        C0 / (self.pts[i] * er.sqrt())
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.pts.iter()
    }

    /// Index of the point closest to `freq` (Hz)
    pub fn nearest_idx(&self, freq: f64) -> usize {
        let mut best = 0;
        for (i, f) in self.pts.iter().enumerate() {
            if (f - freq).abs() < (self.pts[best] - freq).abs() {
                best = i;
            }
        }
        best
    }
}

fn check_points(pts: &Array1<f64>) -> Result<()> {
    if pts.is_empty() {
        return Err(DesignError::InvalidFrequency(
            "sweep needs at least one point".to_string(),
        ));
    }
    if let Some(f) = pts.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
        return Err(DesignError::InvalidFrequency(format!(
            "frequency must be positive, got {}",
            f
        )));
    }
    if pts.windows(2).into_iter().any(|w| w[1] <= w[0]) {
        return Err(DesignError::InvalidFrequency(
            "sweep must be strictly increasing".to_string(),
        ));
    }
    Ok(())
}

/// Builder design pattern for Frequency
///
/// ## Example
/// ```
/// use rfstrip::frequency::FrequencyBuilder;
/// use rfstrip::scale::Scale;
///
/// let freq = FrequencyBuilder::new()
///     .start(1.0)
///     .stop(10.0)
///     .npts(1000)
///     .scale(Scale::Giga)
///     .build()
///     .unwrap();
/// assert_eq!(freq.npts(), 1000);
/// ```
#[derive(Clone, Debug)]
pub struct FrequencyBuilder {
    start: f64,
    stop: f64,
    npts: usize,
    scale: Scale,
}

impl FrequencyBuilder {
    pub fn new() -> Self {
        FrequencyBuilder::default()
    }

    pub fn start(mut self, val: f64) -> Self {
        self.start = val;
        self
    }

    pub fn stop(mut self, val: f64) -> Self {
        self.stop = val;
        self
    }

    pub fn npts(mut self, val: usize) -> Self {
        self.npts = val;
        self
    }

    pub fn scale(mut self, val: Scale) -> Self {
        self.scale = val;
        self
    }

    pub fn build(self) -> Result<Frequency> {
        Frequency::linspace(self.start, self.stop, self.npts, self.scale)
    }
}

impl Default for FrequencyBuilder {
    fn default() -> Self {
        Self {
            start: 1.0,
            stop: 10.0,
            npts: 1000,
            scale: Scale::Giga,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::{comp_f64, comp_row_f64};
    use float_cmp::F64Margin;

    #[test]
    fn frequency_equal() {
        let freq = Frequency::new(array![1.0, 2.0, 3.0], Scale::Giga).unwrap();
        let freq_eq = Frequency::new(array![1.0, 2.0, 3.0], Scale::Giga).unwrap();
        let freq_ne = Frequency::new(array![1.0, 2.0, 3.0, 4.0], Scale::Giga).unwrap();
        let freq_ne2 = Frequency::new(array![1.0, 3.0, 4.0], Scale::Giga).unwrap();

        assert_eq!(freq, freq_eq);
        assert_ne!(freq, freq_ne);
        assert_ne!(freq, freq_ne2);
    }

    #[test]
    fn frequency_new_scaled() {
        let data = array![1.0, 2.0, 3.0];
        for scale in [Scale::Base, Scale::Kilo, Scale::Mega, Scale::Giga] {
            let freq = Frequency::new(data.clone(), scale).unwrap();
            for i in 0..data.len() {
                assert_eq!(data[i] * scale.multiplier(), freq.freq(i));
            }
            assert_eq!(data.len(), freq.npts());
            assert_eq!(scale, freq.scale());
        }
    }

    #[test]
    fn frequency_linspace() {
        let freq = Frequency::linspace(1.0, 3.0, 3, Scale::Giga).unwrap();
        comp_row_f64(
            &array![1e9, 2e9, 3e9],
            freq.freqs(),
            F64Margin::default(),
            "linspace",
        );
        assert_eq!(freq.start(), 1e9);
        assert_eq!(freq.stop(), 3e9);

        let freq = Frequency::linspace(0.1, 6.0, 1000, Scale::Giga).unwrap();
        assert_eq!(freq.npts(), 1000);
        assert_eq!(freq.stop(), 6e9);
    }

    #[test]
    fn frequency_single() {
        let freq = Frequency::single(5.0, Scale::Giga).unwrap();
        assert_eq!(freq.npts(), 1);
        assert_eq!(freq.freq(0), 5e9);
    }

    #[test]
    fn frequency_rejects_bad_bounds() {
        let cases = [
            (0.0, 1.0, 10),
            (-1.0, 1.0, 10),
            (2.0, 1.0, 10),
            (1.0, 1.0, 10),
            (1.0, 2.0, 0),
            (f64::NAN, 2.0, 10),
        ];
        for (start, stop, npts) in cases {
            assert!(
                matches!(
                    Frequency::linspace(start, stop, npts, Scale::Giga),
                    Err(DesignError::InvalidFrequency(_))
                ),
                "({}, {}, {}) accepted",
                start,
                stop,
                npts
            );
        }
    }

    #[test]
    fn frequency_rejects_non_monotonic_points() {
        assert!(matches!(
            Frequency::new(array![1.0, 3.0, 2.0], Scale::Giga),
            Err(DesignError::InvalidFrequency(_))
        ));
        assert!(matches!(
            Frequency::new(array![1.0, 1.0], Scale::Giga),
            Err(DesignError::InvalidFrequency(_))
        ));
        assert!(matches!(
            Frequency::new(Array1::<f64>::zeros(0), Scale::Giga),
            Err(DesignError::InvalidFrequency(_))
        ));
    }

    #[test]
    fn frequency_w() {
        let freq = Frequency::new(array![1.0, 2.0, 3.0], Scale::Giga).unwrap();
        let w = freq.w();

        for i in 0..w.len() {
            comp_f64(
                &(freq.freq(i) * 2.0 * PI),
                &w[i],
                F64Margin::default(),
                "w()",
                &i.to_string(),
            );
        }
    }

    #[test]
    fn frequency_wavelength() {
        let freq = Frequency::single(3.0, Scale::Giga).unwrap();
        comp_f64(
            &(C0 / 3e9),
            &freq.wavelength(1.0, 0),
            F64Margin::default(),
            "wavelength(air)",
            "",
        );
        comp_f64(
            &(C0 / (3e9 * 2.0)),
            &freq.wavelength(4.0, 0),
            F64Margin::default(),
            "wavelength(er=4)",
            "",
        );
    }

    #[test]
    fn frequency_nearest_idx() {
        let freq = Frequency::linspace(1.0, 10.0, 10, Scale::Giga).unwrap();
        assert_eq!(freq.nearest_idx(5e9), 4);
        assert_eq!(freq.nearest_idx(5.4e9), 4);
        assert_eq!(freq.nearest_idx(0.0), 0);
        assert_eq!(freq.nearest_idx(1e12), 9);
    }

    #[test]
    fn frequency_builder() {
        let freq = FrequencyBuilder::new()
            .start(100.0)
            .stop(200.0)
            .npts(11)
            .scale(Scale::Mega)
            .build()
            .unwrap();
        assert_eq!(freq.npts(), 11);
        assert_eq!(freq.freq(0), 100e6);
        assert_eq!(freq.freq(10), 200e6);
        comp_row_f64(
            &Array1::linspace(100.0, 200.0, 11),
            &freq.freqs_scaled(Scale::Mega),
            F64Margin {
                epsilon: 1e-9,
                ulps: 4,
            },
            "builder",
        );
    }
}
