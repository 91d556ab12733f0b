use num::complex::Complex64;
use rfstrip::prelude::*;
use rfstrip::util::{comp_c64, comp_f64, comp_rel_f64};
use float_cmp::F64Margin;

fn substrates() -> Vec<Msub> {
    vec![
        Msub::new("RT5880", 2.2, 0.787e-3, 0.0009).unwrap(),
        Msub::new("FR4", 4.4, 1.6e-3, 0.025).unwrap(),
        Msub::new("RO3010", 10.2, 0.635e-3, 0.0023).unwrap(),
    ]
}

#[test]
fn synthesis_round_trip_both_regimes() {
    for sub in substrates() {
        for z in [20.0, 30.0, 40.0, 43.9, 44.0, 50.0, 75.0, 100.0, 120.0] {
            let params = sub.synthesize(z).unwrap();
            assert_eq!(params.width, sub.width(z).unwrap());
            // the narrow-strip inverse is weakest just above the split on low-εr boards
            comp_rel_f64(&z, &params.z0, 0.02, "round trip", &format!("{} {}", sub.id(), z));
        }
    }
}

#[test]
fn synthesis_regime_follows_target() {
    let sub = Msub::new("FR4", 4.4, 1.6e-3, 0.025).unwrap();
    assert_eq!(Msub::synthesis_regime(30.0), Regime::Wide);
    assert_eq!(Msub::synthesis_regime(44.0), Regime::Narrow);
    // low impedance targets land on wide strips
    assert!(sub.width(30.0).unwrap() > sub.height());
    assert!(sub.width(100.0).unwrap() < sub.height());
}

#[test]
fn invalid_inputs_are_rejected() {
    let sub = Msub::new("FR4", 4.4, 1.6e-3, 0.025).unwrap();
    assert!(matches!(sub.z0(0.0), Err(DesignError::InvalidGeometry(_))));
    assert!(matches!(
        Msub::new("bad", 4.4, -1.0, 0.0),
        Err(DesignError::InvalidGeometry(_))
    ));
    assert!(matches!(
        Frequency::linspace(0.0, 1.0, 10, Scale::Giga),
        Err(DesignError::InvalidFrequency(_))
    ));
    assert!(matches!(
        Frequency::linspace(2.0, 1.0, 10, Scale::Giga),
        Err(DesignError::InvalidFrequency(_))
    ));
    let lpf = SteppedLpf::new(&sub, 50.0).unwrap();
    assert!(matches!(
        lpf.design(-3e9, 5),
        Err(DesignError::InvalidFrequency(_))
    ));
    for n in [1, 2, 3, 4, 6, 7, 8] {
        assert_eq!(lpf.design(3e9, n), Err(DesignError::UnsupportedOrder(n)));
    }
}

#[test]
fn every_element_is_reciprocal_and_symmetric() {
    let sub = Msub::new("FR4", 4.4, 1.6e-3, 0.025).unwrap();
    let freq = Frequency::linspace(0.1, 10.0, 200, Scale::Giga).unwrap();

    let tl = MlinBuilder::new()
        .width_val(1e-3)
        .length_val(10e-3)
        .sub(&sub)
        .build()
        .unwrap();
    let res = ResonatorBuilder::new()
        .gap_val(0.05e-3)
        .length_val(6e-3)
        .width_val(1e-3)
        .sub(&sub)
        .build()
        .unwrap();
    let lpf = SteppedLpf::new(&sub, 50.0).unwrap().design(3e9, 5).unwrap();

    let elems: Vec<Box<dyn Elem>> = vec![Box::new(tl), Box::new(res), Box::new(lpf)];
    for elem in elems {
        let resp = elem.response(&freq).unwrap();
        assert_eq!(resp.npts(), freq.npts(), "{}", elem.id());
        assert_eq!(resp.s12(), resp.s21(), "{}", elem.id());
        assert_eq!(resp.s22(), resp.s11(), "{}", elem.id());
        assert!(resp.is_reciprocal(0.0));
    }
}

#[test]
fn matched_lossless_line() {
    let sub = Msub::new("ideal", 2.2, 0.787e-3, 0.0).unwrap();
    let z0 = sub.z0(2.4e-3).unwrap();
    let tl = MlinBuilder::new()
        .width_val(2.4e-3)
        .length_val(25e-3)
        .z_ref(z0)
        .conductor_loss(ConductorLoss::None)
        .sub(&sub)
        .build()
        .unwrap();
    let freq = Frequency::linspace(1.0, 20.0, 96, Scale::Giga).unwrap();
    let resp = tl.response(&freq).unwrap();
    let eff = tl.er_eff().unwrap();
    let margin = F64Margin {
        epsilon: 1e-12,
        ulps: 4,
    };
    for (i, &f) in freq.iter().enumerate() {
        comp_f64(&1.0, &resp.s21()[i].norm(), margin, "|S21|", &i.to_string());
        comp_c64(
            &Complex64::from_polar(1.0, -tl.beta(f, eff) * 25e-3),
            &resp.s21()[i],
            margin,
            "S21",
            &i.to_string(),
        );
    }
    assert!(resp.is_lossless(1e-12));

    // linear phase means a constant group delay of l·√εeff/c
    let tau = 25e-3 * eff.sqrt() / rfstrip::consts::C0;
    for (i, d) in resp.group_delay(SParam::S21).iter().enumerate() {
        comp_rel_f64(&tau, d, 1e-6, "group delay", &i.to_string());
    }
}

#[test]
fn lossy_line_never_gains() {
    for sub in substrates() {
        let tl = MlinBuilder::new()
            .z0(50.0)
            .length_val(1e-3)
            .sub(&sub)
            .build()
            .unwrap();
        let freq = Frequency::linspace(1.0, 100.0, 100, Scale::Mega).unwrap();
        let resp = tl.response(&freq).unwrap();
        assert!(resp.is_passive(1e-12), "{}", sub.id());
        assert!(!resp.is_lossless(1e-6), "{}", sub.id());
    }
}

#[test]
fn stepped_lpf_structure() {
    let sub = Msub::new("FR4", 4.4, 1.6e-3, 0.025).unwrap();
    let lpf = SteppedLpf::new(&sub, 50.0).unwrap().design(3e9, 5).unwrap();
    assert_eq!(lpf.sections().len(), 5);
    assert_eq!(lpf.high_sections().count(), 3);
    assert_eq!(lpf.low_sections().count(), 2);
    assert!(lpf.sections().iter().all(|s| s.width > 0.0));
    for hi in lpf.high_sections() {
        for lo in lpf.low_sections() {
            assert!(hi.z0 > lo.z0);
            assert!(hi.width < lo.width);
        }
    }
    comp_rel_f64(
        &(sub.guided_wavelength(3e9).unwrap() / 8.0),
        &lpf.section_length(),
        1e-12,
        "section length",
        "",
    );
}

#[test]
fn resonator_on_and_off_resonance() {
    let sub = Msub::new("FR4", 4.4, 1.6e-3, 0.025).unwrap();
    let (d, g, _) = Resonator::dimensions_for(&sub, 1e-3, 8e9).unwrap();
    let res = ResonatorBuilder::new()
        .gap_val(g)
        .length_val(d)
        .width_val(1e-3)
        .sub(&sub)
        .build()
        .unwrap();
    let f_res = res.resonant_frequency().unwrap();
    comp_rel_f64(&8e9, &f_res, 1e-12, "f_res", "");

    let out = res.analyze(&Frequency::new(ndarray::array![f_res], Scale::Base).unwrap()).unwrap();
    assert_eq!(out.response.s11()[0].norm(), 0.0);
    comp_f64(
        &res.coupling(),
        &out.response.s21()[0].norm(),
        F64Margin::default(),
        "S21 at f_res",
        "",
    );

    // |S21| falls by √2 at QΔ = 1
    let q = res.q_loaded();
    let f_hp = f_res * (1.0 + 1.0 / q);
    let out = res.analyze(&Frequency::new(ndarray::array![f_hp], Scale::Base).unwrap()).unwrap();
    comp_rel_f64(
        &(res.coupling() / 2f64.sqrt()),
        &out.response.s21()[0].norm(),
        1e-9,
        "S21 at half power",
        "",
    );
}
