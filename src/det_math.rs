// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/sgpcore

//! Deterministic trigonometry for cross-platform reproducibility.
//!
//! Embedding and extraction must agree bit-for-bit across machines, so the
//! DCT cosine tables and the Lanczos resampling kernel may not depend on the
//! platform's libm. `det_sin` / `det_cos` use only IEEE 754 operations (add,
//! sub, mul, div, floor, abs) with fixed FDLIBM kernel coefficients, which
//! guarantees < 1 ULP error and identical results everywhere.

use std::f64::consts::PI;

// Extended-precision π/2 for Cody-Waite range reduction.
// PIO2_HI + PIO2_LO = π/2 to ~70 bits of precision.
const PIO2_HI: f64 = f64::from_bits(0x3FF921FB54442D18); // 1.5707963267948966
const PIO2_LO: f64 = f64::from_bits(0x3C91A62633145C07); // 6.123233995736766e-17

// Sin kernel coefficients (FDLIBM k_sin.c), valid for |x| ≤ π/4:
// sin(x) ≈ x + x³·(S1 + x²·(S2 + x²·(S3 + x²·(S4 + x²·(S5 + x²·S6)))))
const S1: f64 = f64::from_bits(0xBFC5555555555549); // -1.66666666666666324348e-01
const S2: f64 = f64::from_bits(0x3F8111111110F8A6); //  8.33333333332248946124e-03
const S3: f64 = f64::from_bits(0xBF2A01A019C161D5); // -1.98412698298579493134e-04
const S4: f64 = f64::from_bits(0x3EC71DE357B1FE7D); //  2.75573137070700676789e-06
const S5: f64 = f64::from_bits(0xBE5AE5E68A2B9CEB); // -2.50507602534068634195e-08
const S6: f64 = f64::from_bits(0x3DE5D93A5ACFD57C); //  1.58969099521155010221e-10

// Cos kernel coefficients (FDLIBM k_cos.c):
// cos(x) ≈ 1 - x²/2 + x⁴·(C1 + x²·(C2 + …))
const C1: f64 = f64::from_bits(0x3FA5555555555549); //  4.16666666666666019037e-02
const C2: f64 = f64::from_bits(0xBF56C16C16C15177); // -1.38888888888741095749e-03
const C3: f64 = f64::from_bits(0x3EFA01A019CB1590); //  2.48015872894767294178e-05
const C4: f64 = f64::from_bits(0xBE927E4F809C52AD); // -2.75573143513906633035e-07
const C5: f64 = f64::from_bits(0x3E21EE9EBDB4B1C4); //  2.08757232129817482790e-09
const C6: f64 = f64::from_bits(0xBDA8FAE9BE8838D4); // -1.13596475577881948265e-11

/// Evaluate sin polynomial for |x| ≤ π/4 (FDLIBM __kernel_sin).
#[inline]
fn sin_kern(x: f64) -> f64 {
    let z = x * x;
    let v = z * x;
    let r = S2 + z * (S3 + z * (S4 + z * (S5 + z * S6)));
    x + v * (S1 + z * r)
}

/// Evaluate cos polynomial for |x| ≤ π/4 (FDLIBM __kernel_cos).
#[inline]
fn cos_kern(x: f64) -> f64 {
    let z = x * x;
    let r = z * (C1 + z * (C2 + z * (C3 + z * (C4 + z * (C5 + z * C6)))));
    let hz = 0.5 * z;
    1.0 - (hz - z * r)
}

/// Cody-Waite range reduction: x → r in [-π/4, π/4], quadrant n mod 4.
#[inline]
fn reduce(x: f64) -> (f64, i32) {
    let n = (x * (2.0 / PI) + 0.5).floor();
    let r = (x - n * PIO2_HI) - n * PIO2_LO;
    (r, (n as i64 & 3) as i32)
}

/// Deterministic sine built from IEEE 754 primitive operations only.
pub fn det_sin(x: f64) -> f64 {
    if x.is_nan() || x.is_infinite() {
        return f64::NAN;
    }
    let (r, q) = reduce(x);
    match q {
        0 => sin_kern(r),
        1 => cos_kern(r),
        2 => -sin_kern(r),
        3 => -cos_kern(r),
        _ => unreachable!(),
    }
}

/// Deterministic cosine built from IEEE 754 primitive operations only.
pub fn det_cos(x: f64) -> f64 {
    if x.is_nan() || x.is_infinite() {
        return f64::NAN;
    }
    let (r, q) = reduce(x);
    match q {
        0 => cos_kern(r),
        1 => -sin_kern(r),
        2 => -cos_kern(r),
        3 => sin_kern(r),
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6};

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() && b.is_nan() {
            return true;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn sin_exact_values() {
        let tol = 1e-15;
        assert!(approx_eq(det_sin(0.0), 0.0, tol));
        assert!(approx_eq(det_sin(FRAC_PI_6), 0.5, tol));
        assert!(approx_eq(det_sin(FRAC_PI_4), std::f64::consts::FRAC_1_SQRT_2, tol));
        assert!(approx_eq(det_sin(FRAC_PI_3), 3.0_f64.sqrt() / 2.0, tol));
        assert!(approx_eq(det_sin(FRAC_PI_2), 1.0, tol));
        assert!(approx_eq(det_sin(PI), 0.0, 1e-15));
        assert!(approx_eq(det_sin(-FRAC_PI_2), -1.0, tol));
    }

    #[test]
    fn cos_exact_values() {
        let tol = 1e-15;
        assert!(approx_eq(det_cos(0.0), 1.0, tol));
        assert!(approx_eq(det_cos(FRAC_PI_6), 3.0_f64.sqrt() / 2.0, tol));
        assert!(approx_eq(det_cos(FRAC_PI_4), std::f64::consts::FRAC_1_SQRT_2, tol));
        assert!(approx_eq(det_cos(FRAC_PI_3), 0.5, tol));
        assert!(approx_eq(det_cos(FRAC_PI_2), 0.0, 1e-15));
        assert!(approx_eq(det_cos(PI), -1.0, tol));
    }

    #[test]
    fn pythagorean_identity() {
        for i in 0..200 {
            let x = (i as f64 - 100.0) * 0.13;
            let s = det_sin(x);
            let c = det_cos(x);
            let err = (s * s + c * c - 1.0).abs();
            assert!(err < 1e-14, "sin²+cos²={} at x={x} (err={err})", s * s + c * c);
        }
    }

    #[test]
    fn special_values() {
        assert!(det_sin(f64::NAN).is_nan());
        assert!(det_sin(f64::INFINITY).is_nan());
        assert!(det_cos(f64::NEG_INFINITY).is_nan());
    }

    #[test]
    fn deterministic_across_calls() {
        for i in 0..100 {
            let x = (i as f64) * 0.0731 - 3.5;
            assert_eq!(det_sin(x).to_bits(), det_sin(x).to_bits());
            assert_eq!(det_cos(x).to_bits(), det_cos(x).to_bits());
        }
    }

    #[test]
    fn matches_std_closely() {
        for i in 0..200 {
            let x = (i as f64 - 100.0) * 0.05;
            let ds = det_sin(x);
            let ss = x.sin();
            assert!((ds - ss).abs() < 5e-13, "det_sin({x})={ds} vs std sin={ss}");
            let dc = det_cos(x);
            let sc = x.cos();
            assert!((dc - sc).abs() < 5e-13, "det_cos({x})={dc} vs std cos={sc}");
        }
    }
}
