use float_cmp::{approx_eq, F64Margin};
use ndarray::prelude::*;
use num::complex::Complex64;

pub fn comp_row_f64(exemplar: &Array1<f64>, calc: &Array1<f64>, precision: F64Margin, test: &str) {
    assert_eq!(
        exemplar.len(),
        calc.len(),
        "test {} length does not match",
        test
    );
    for k in 0..calc.len() {
        comp_point(&exemplar[k], &calc[k], precision, test, format!("({})", k));
    }
}

pub fn comp_row_c64(
    exemplar: &Array1<Complex64>,
    calc: &Array1<Complex64>,
    precision: F64Margin,
    test: &str,
) {
    assert_eq!(
        exemplar.len(),
        calc.len(),
        "test {} length does not match",
        test
    );
    for k in 0..calc.len() {
        comp_c64(&exemplar[k], &calc[k], precision, test, &format!("({})", k));
    }
}

pub fn comp_point(exemplar: &f64, calc: &f64, precision: F64Margin, test: &str, idx: String) {
    comp_f64(exemplar, calc, precision, test, &idx);
}

pub fn comp_c64(
    exemplar: &Complex64,
    calc: &Complex64,
    precision: F64Margin,
    test: &str,
    idx: &str,
) {
    comp_f64(
        &(exemplar.re),
        &(calc.re),
        precision,
        test,
        &(idx.to_owned() + ".re"),
    );
    comp_f64(
        &(exemplar.im),
        &(calc.im),
        precision,
        test,
        &(idx.to_owned() + ".im"),
    );
}

pub fn comp_f64(exemplar: &f64, calc: &f64, precision: F64Margin, test: &str, idx: &str) {
    assert!(
        approx_eq!(f64, *calc, *exemplar, precision),
        " Failed test {} at location {}\n  exemplar: {}\n      calc: {}",
        test,
        idx,
        exemplar,
        calc
    );
}

/// Relative comparison for values whose magnitude varies over the sweep
pub fn comp_rel_f64(exemplar: &f64, calc: &f64, rel: f64, test: &str, idx: &str) {
    let err = ((calc - exemplar) / exemplar).abs();
    assert!(
        err <= rel,
        " Failed test {} at location {}\n  exemplar: {}\n      calc: {}\n   rel err: {:e}",
        test,
        idx,
        exemplar,
        calc,
        err
    );
}
