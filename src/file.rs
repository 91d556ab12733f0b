//! Touchstone v1 two-port (`.s2p`) export and import of a Response.

use crate::error::{DesignError, Result};
use crate::frequency::Frequency;
use crate::network::Response;
use crate::scale::Scale;
use ndarray::prelude::*;
use num::complex::{c64, Complex64};
use regex::Regex;
use simple_error::{bail, SimpleError};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

/// Pair format of a Touchstone data column
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComplexFormat {
    #[default]
    ReIm,
    MagAng,
    DbAng,
}

impl ComplexFormat {
    pub fn to_str(&self) -> &str {
        match self {
            ComplexFormat::ReIm => "RI",
            ComplexFormat::MagAng => "MA",
            ComplexFormat::DbAng => "DB",
        }
    }

    /// Combine a column pair into a complex value; angles are degrees
    pub fn parse(&self, a: f64, b: f64) -> Complex64 {
        match self {
            ComplexFormat::ReIm => c64(a, b),
            ComplexFormat::MagAng => Complex64::from_polar(a, b.to_radians()),
            ComplexFormat::DbAng => Complex64::from_polar(10f64.powf(a / 20.0), b.to_radians()),
        }
    }

    pub fn split(&self, val: Complex64) -> (f64, f64) {
        match self {
            ComplexFormat::ReIm => (val.re, val.im),
            ComplexFormat::MagAng => (val.norm(), val.arg().to_degrees()),
            ComplexFormat::DbAng => (20.0 * val.norm().log10(), val.arg().to_degrees()),
        }
    }
}

impl FromStr for ComplexFormat {
    type Err = SimpleError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RI" => Ok(ComplexFormat::ReIm),
            "MA" => Ok(ComplexFormat::MagAng),
            "DB" => Ok(ComplexFormat::DbAng),
            _ => {
                bail!("unknown Touchstone format '{}'", s);
            }
        }
    }
}

fn freq_unit_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?<prefix>[kmgt]?)hz$").expect("Invalid regex!"))
}

/// Settings carried by the `#` option line
#[derive(Clone, Copy, Debug, PartialEq)]
struct Options {
    scale: Scale,
    format: ComplexFormat,
    z_ref: f64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            scale: Scale::Giga,
            format: ComplexFormat::MagAng,
            z_ref: 50.0,
        }
    }
}

/// Tokens may come in any order; missing ones keep the `GHz S MA R 50` defaults.
fn parse_options(line: &str) -> std::result::Result<Options, SimpleError> {
    let mut opts = Options::default();
    let mut tokens = line.trim_start_matches('#').split_whitespace();
    while let Some(token) = tokens.next() {
        match token.to_ascii_uppercase().as_str() {
            "S" => {}
            "Y" | "Z" | "H" | "G" => {
                bail!("only S-parameter data is supported, got '{}'", token);
            }
            "RI" | "MA" | "DB" => opts.format = ComplexFormat::from_str(token)?,
            "R" => {
                let Some(z) = tokens.next() else {
                    bail!("missing reference impedance in '{}'", line);
                };
                opts.z_ref = match z.parse::<f64>() {
                    Ok(z) if z > 0.0 => z,
                    _ => {
                        bail!("bad reference impedance '{}' in '{}'", z, line);
                    }
                };
            }
            _ => match freq_unit_regex().captures(token) {
                Some(caps) => opts.scale = freq_scale(&caps["prefix"]),
                None => {
                    bail!("malformed option line '{}'", line);
                }
            },
        }
    }
    Ok(opts)
}

fn freq_scale(prefix: &str) -> Scale {
    match prefix.to_ascii_uppercase().as_str() {
        "K" => Scale::Kilo,
        "M" => Scale::Mega,
        "G" => Scale::Giga,
        "T" => Scale::Tera,
        _ => Scale::Base,
    }
}

/// Render a Response as Touchstone text with frequencies in Hz
pub fn format_touchstone(resp: &Response, format: ComplexFormat) -> String {
    let mut lines = vec![
        format!("! {}", resp.name()),
        "! rfstrip closed-form approximation".to_string(),
        format!("# Hz S {} R {}", format.to_str(), resp.z_ref()),
    ];
    // two-port column order is S11 S21 S12 S22
    for (i, f) in resp.freq().iter().enumerate() {
        let mut row = format!("{:e}", f);
        for s in [resp.s11(), resp.s21(), resp.s12(), resp.s22()] {
            let (a, b) = format.split(s[i]);
            row.push_str(&format!(" {:e} {:e}", a, b));
        }
        lines.push(row);
    }
    lines.push(String::new());
    lines.join("\n")
}

pub fn write_touchstone<P: AsRef<Path>>(path: P, resp: &Response) -> Result<()> {
    fs::write(path.as_ref(), format_touchstone(resp, ComplexFormat::ReIm))?;
    debug!(path = %path.as_ref().display(), npts = resp.npts(), "wrote touchstone");
    Ok(())
}

/// Parse Touchstone text. Only two-port S-parameter data is accepted.
pub fn parse_touchstone(name: &str, content: &str) -> Result<Response> {
    Ok(parse_s2p(name, content)?)
}

fn parse_s2p(name: &str, content: &str) -> std::result::Result<Response, SimpleError> {
    let mut opts = Options::default();
    let mut seen_options = false;
    let mut values: Vec<f64> = vec![];

    for line in content.lines() {
        let line = match line.find('!') {
            Some(idx) => &line[..idx],
            None => line,
        }
        .trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            if !seen_options {
                opts = parse_options(line)?;
                seen_options = true;
            }
            continue;
        }
        for field in line.split_whitespace() {
            match field.parse::<f64>() {
                Ok(v) => values.push(v),
                Err(_) => {
                    bail!("non-numeric data field '{}'", field);
                }
            }
        }
    }

    if values.is_empty() || values.len() % 9 != 0 {
        bail!(
            "expected rows of 9 values for a two-port file, got {} values",
            values.len()
        );
    }
    let npts = values.len() / 9;
    let mut freqs = Array1::<f64>::zeros(npts);
    let mut s = [
        Array1::<Complex64>::zeros(npts),
        Array1::<Complex64>::zeros(npts),
        Array1::<Complex64>::zeros(npts),
        Array1::<Complex64>::zeros(npts),
    ];
    for (i, row) in values.chunks(9).enumerate() {
        freqs[i] = row[0];
        for (k, arr) in s.iter_mut().enumerate() {
            arr[i] = opts.format.parse(row[1 + 2 * k], row[2 + 2 * k]);
        }
    }
    let freq = match Frequency::new(freqs, opts.scale) {
        Ok(f) => f,
        Err(e) => {
            bail!("{}", e);
        }
    };
    let [s11, s21, s12, s22] = s;
    match Response::new(name, &freq, opts.z_ref, s11, s21, s12, s22) {
        Ok(resp) => Ok(resp),
        Err(e) => {
            bail!("{}", e);
        }
    }
}

/// Read a `.s2p` file; the response is named after the file stem
pub fn read_touchstone<P: AsRef<Path>>(path: P) -> Result<Response> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if ext.as_deref() != Some("s2p") {
        return Err(DesignError::Parse(format!(
            "expected a .s2p file, got '{}'",
            path.display()
        )));
    }
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("network");
    let content = fs::read_to_string(path)?;
    let resp = parse_touchstone(name, &content)?;
    debug!(path = %path.display(), npts = resp.npts(), "read touchstone");
    Ok(resp)
}

#[cfg(test)]
mod file_tests {
    use super::*;
    use crate::util::comp_c64;
    use float_cmp::F64Margin;

    const SAMPLE: &str = "! two-port sample
# GHz S MA R 50
! freq |S11| ang(S11) |S21| ang(S21) |S12| ang(S12) |S22| ang(S22)
1.0 0.5 90 0.8 -45 0.8 -45 0.5 90
2.0 0.1 0 1.0 180 1.0 180 0.1 0 ! inline comment
";

    #[test]
    fn parse_mag_angle() {
        let resp = parse_touchstone("sample", SAMPLE).unwrap();
        assert_eq!(resp.name(), "sample");
        assert_eq!(resp.npts(), 2);
        assert_eq!(resp.z_ref(), 50.0);
        assert_eq!(resp.freq().freq(1), 2e9);
        let margin = F64Margin {
            epsilon: 1e-15,
            ulps: 4,
        };
        comp_c64(&c64(0.0, 0.5), &resp.s11()[0], margin, "S11", "0");
        comp_c64(
            &Complex64::from_polar(0.8, -std::f64::consts::FRAC_PI_4),
            &resp.s21()[0],
            margin,
            "S21",
            "0",
        );
        comp_c64(&c64(-1.0, 0.0), &resp.s12()[1], margin, "S12", "1");
    }

    #[test]
    fn parse_db_and_wrapped_rows() {
        let text = "# MHz S DB R 75\n100 -20 0 0 0\n 0 0 -20 0\n200 -6 0 -1 -90 -1 -90 -6 0\n";
        let resp = parse_touchstone("wrapped", text).unwrap();
        assert_eq!(resp.z_ref(), 75.0);
        assert_eq!(resp.freq().freq(0), 100e6);
        let margin = F64Margin {
            epsilon: 1e-12,
            ulps: 4,
        };
        comp_c64(&c64(0.1, 0.0), &resp.s11()[0], margin, "S11", "0");
        comp_c64(&c64(1.0, 0.0), &resp.s21()[0], margin, "S21", "0");
    }

    #[test]
    fn rejects_bad_content() {
        assert!(parse_touchstone("x", "# GHz Y RI R 50\n1 0 0 0 0 0 0 0 0\n").is_err());
        assert!(parse_touchstone("x", "# GHz S XX R 50\n").is_err());
        assert!(parse_touchstone("x", "# GHz S RI R 50\n1 0 0 0 0\n").is_err());
        assert!(parse_touchstone("x", "# GHz S RI R 50\n1 0 0 0 0 0 0 0 abc\n").is_err());
        assert!(parse_touchstone("x", "# GHz S RI R 50\n").is_err());
        assert!(matches!(
            parse_touchstone("x", "# GHz S RI R 50\n2 0 0 0 0 0 0 0 0\n1 0 0 0 0 0 0 0 0\n"),
            Err(DesignError::Parse(_))
        ));
    }

    #[test]
    fn option_line_defaults_and_order() {
        let row = "1 0.5 0 1 0 1 0 0.5 0\n";
        let bare = parse_touchstone("x", &format!("#\n{}", row)).unwrap();
        assert_eq!(bare.freq().freq(0), 1e9);
        assert_eq!(bare.z_ref(), 50.0);
        comp_c64(&c64(0.5, 0.0), &bare.s11()[0], F64Margin::default(), "S11", "0");

        let partial = parse_touchstone("x", &format!("# GHz S MA\n{}", row)).unwrap();
        assert_eq!(partial.z_ref(), 50.0);
        assert_eq!(partial.s21()[0], bare.s21()[0]);

        let reordered =
            parse_touchstone("x", "# r 75 ri s khz\n1 0.5 0 1 0 1 0 0.5 0\n").unwrap();
        assert_eq!(reordered.z_ref(), 75.0);
        assert_eq!(reordered.freq().freq(0), 1e3);
        assert_eq!(reordered.s11()[0], c64(0.5, 0.0));

        assert!(parse_touchstone("x", &format!("# GHz S RI R\n{}", row)).is_err());
        assert!(parse_touchstone("x", &format!("# GHz S RI R -5\n{}", row)).is_err());
    }

    #[test]
    fn format_round_trip() {
        let resp = parse_touchstone("sample", SAMPLE).unwrap();
        for format in [ComplexFormat::ReIm, ComplexFormat::MagAng, ComplexFormat::DbAng] {
            let text = format_touchstone(&resp, format);
            assert!(text.contains(&format!("# Hz S {} R 50", format.to_str())));
            let back = parse_touchstone("sample", &text).unwrap();
            assert_eq!(back.freq().freqs(), resp.freq().freqs());
            let margin = F64Margin {
                epsilon: 1e-12,
                ulps: 4,
            };
            for i in 0..resp.npts() {
                comp_c64(&resp.s21()[i], &back.s21()[i], margin, format.to_str(), &i.to_string());
                comp_c64(&resp.s22()[i], &back.s22()[i], margin, format.to_str(), &i.to_string());
            }
        }
    }

    #[test]
    fn format_from_str() {
        assert_eq!(ComplexFormat::from_str("ri").unwrap(), ComplexFormat::ReIm);
        assert_eq!(ComplexFormat::from_str("Ma").unwrap(), ComplexFormat::MagAng);
        assert_eq!(ComplexFormat::from_str("DB").unwrap(), ComplexFormat::DbAng);
        assert!(ComplexFormat::from_str("XY").is_err());
    }
}
