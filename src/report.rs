use crate::element::mlin::Mlin;
use crate::element::msub::Msub;
use crate::element::resonator::{Resonator, ResonatorResponse};
use crate::error::Result;
use crate::filter::stepped::FilterDesign;
use crate::network::{Response, SParam};
use crate::scale::Scale;

pub fn substrate_summary(sub: &Msub) -> String {
    format!(
        "Substrate: εr = {}, h = {:.3} mm, tan δ = {}",
        sub.er(),
        Scale::Milli.scale(sub.height()),
        sub.tand()
    )
}

pub fn line_summary(tl: &Mlin) -> Result<String> {
    let params = tl.params()?;
    let lines = [
        format!("Microstrip line {}", tl.id()),
        substrate_summary(tl.sub()),
        format!(
            "Width: {:.3} mm, length: {:.3} mm ({} strip)",
            Scale::Milli.scale(params.width),
            Scale::Milli.scale(tl.length()),
            params.regime
        ),
        format!("Effective permittivity: {:.4}", params.er_eff),
        format!(
            "Characteristic impedance: {:.2} Ω (reference {} Ω)",
            params.z0,
            tl.z_ref()
        ),
        format!("Conductor loss model: {}", tl.conductor_loss()),
    ];
    Ok(block(&lines))
}

pub fn lpf_summary(lpf: &FilterDesign) -> String {
    let mut lines = vec![
        format!(
            "Stepped-impedance LPF: n = {}, fc = {:.3} GHz, Z0 = {} Ω",
            lpf.order(),
            Scale::Giga.scale(lpf.cutoff()),
            lpf.z0()
        ),
        substrate_summary(lpf.sub()),
        format!(
            "Guided wavelength: {:.2} mm, section length: {:.2} mm",
            Scale::Milli.scale(lpf.lambda_g()),
            Scale::Milli.scale(lpf.section_length())
        ),
    ];
    for (title, secs) in [
        ("High impedance sections:", lpf.high_sections().collect::<Vec<_>>()),
        ("Low impedance sections:", lpf.low_sections().collect::<Vec<_>>()),
    ] {
        lines.push(String::new());
        lines.push(title.to_string());
        lines.extend(secs.iter().map(|sec| {
            format!(
                "  Section {}: g = {:.4}, Z = {:.1} Ω, w = {:.2} mm",
                sec.index,
                sec.g,
                sec.z0,
                Scale::Milli.scale(sec.width)
            )
        }));
    }
    block(&lines)
}

pub fn resonator_summary(res: &Resonator, out: &ResonatorResponse) -> String {
    block(&[
        format!("Gap-coupled resonator {}", res.id()),
        substrate_summary(res.sub()),
        format!(
            "Gap: {:.3} mm, length: {:.3} mm, width: {:.3} mm",
            Scale::Milli.scale(res.gap()),
            Scale::Milli.scale(res.length()),
            Scale::Milli.scale(res.width())
        ),
        format!("Resonant frequency: {:.3} GHz", Scale::Giga.scale(out.f_res)),
        format!(
            "Coupling k = {:.4}, loaded Q = {:.1} (Qext {}, Qint {})",
            out.coupling,
            out.q_loaded,
            res.q_ext(),
            res.q_int()
        ),
    ])
}

pub fn response_summary(resp: &Response) -> String {
    let freq = resp.freq();
    let s21 = resp.db(SParam::S21);
    let (min_idx, max_idx) = s21.iter().enumerate().fold((0, 0), |(lo, hi), (i, &v)| {
        (
            if v < s21[lo] { i } else { lo },
            if v > s21[hi] { i } else { hi },
        )
    });
    let worst = resp.power_sum().fold(0.0f64, |acc, &p| acc.max(p));
    block(&[
        format!(
            "{}: {} points, {:.3} to {:.3} GHz, ref {} Ω",
            resp.name(),
            resp.npts(),
            Scale::Giga.scale(freq.start()),
            Scale::Giga.scale(freq.stop()),
            resp.z_ref()
        ),
        format!(
            "  |S21| max {:.2} dB at {:.3} GHz, min {:.2} dB at {:.3} GHz",
            s21[max_idx],
            Scale::Giga.scale(freq.freq(max_idx)),
            s21[min_idx],
            Scale::Giga.scale(freq.freq(min_idx))
        ),
        format!("  max |S11|²+|S21|² = {:.4}", worst),
    ])
}

/// Newline-terminated lines
fn block(lines: &[String]) -> String {
    lines.iter().map(|l| format!("{}\n", l)).collect()
}
