//! Fast mathematical approximations for per-sample synthesis.
//!
//! Oscillators call these once per sample (sine) or once per pitch change
//! (exponential), so they trade full libm precision for a handful of
//! multiplies. Each function documents its maximum error.
//!
//! | Function | Replaces | Use case | Max error |
//! |----------|----------|----------|-----------|
//! | [`fast_exp2`] | `libm::exp2` | Pitch to frequency | < 2e-5 relative |
//! | [`fast_sin_turns`] | `libm::sin` | Sine oscillator | < 0.002 absolute |
//!
//! Both work on `f64` because oscillator phase is accumulated in `f64`; the
//! result is narrowed to [`Sample`](crate::Sample) only when written out.

use libm::floor;

/// Taylor coefficients `ln(2)^k / k!` for `2^f`, f ∈ \[0, 1).
const EXP2_C2: f64 = 0.240_226_506_959_100_7;
const EXP2_C3: f64 = 0.055_504_108_664_821_6;
const EXP2_C4: f64 = 0.009_618_129_107_628_477;
const EXP2_C5: f64 = 0.001_333_355_814_642_844_3;
const EXP2_C6: f64 = 0.000_154_032_706_791_099;

/// Fast base-2 exponential via exponent-bit construction and a polynomial.
///
/// Decomposes `x` into integer and fractional parts: `2^x = 2^⌊x⌋ · 2^frac(x)`.
/// The integer part is exact (IEEE 754 exponent bits), the fractional part
/// uses a 6th-order polynomial.
///
/// # Accuracy
///
/// Maximum relative error: < 2e-5 for x ∈ \[-1022, 1022\]. Integer inputs are
/// exact, so `fast_exp2(0.0) == 1.0`.
///
/// # Examples
///
/// ```
/// use voltage_core::fast_math::fast_exp2;
///
/// assert_eq!(fast_exp2(0.0), 1.0);
/// assert_eq!(fast_exp2(1.0), 2.0);
/// assert!((fast_exp2(0.5) - core::f64::consts::SQRT_2).abs() < 1e-4);
/// ```
#[inline]
pub fn fast_exp2(x: f64) -> f64 {
    let x = x.clamp(-1022.0, 1022.0);
    let i = floor(x);
    let f = x - i;
    let p = 1.0
        + f * (core::f64::consts::LN_2
            + f * (EXP2_C2 + f * (EXP2_C3 + f * (EXP2_C4 + f * (EXP2_C5 + f * EXP2_C6)))));
    // Multiply by 2^i via IEEE 754 exponent manipulation
    f64::from_bits(((i as i64 + 1023) as u64) << 52) * p
}

/// Fast sine from phase in turns (full cycles).
///
/// `turns` = 0.0 → 0, 0.25 → 1, 0.5 → 0, 0.75 → −1. Values outside \[0, 1)
/// are wrapped, so an oscillator may pass its raw accumulated phase.
///
/// Uses the parabolic half-wave `4p(1−p)` with a `0.225·y·(y−1)` correction.
///
/// # Accuracy
///
/// Maximum absolute error: < 0.002.
///
/// # Examples
///
/// ```
/// use voltage_core::fast_math::fast_sin_turns;
///
/// assert!(fast_sin_turns(0.0).abs() < 0.002);
/// assert!((fast_sin_turns(0.25) - 1.0).abs() < 0.002);
/// assert!((fast_sin_turns(42.75) + 1.0).abs() < 0.002);
/// ```
#[inline]
pub fn fast_sin_turns(turns: f64) -> f64 {
    let p = turns - floor(turns);
    let (half_p, sign) = if p < 0.5 {
        (p * 2.0, 1.0)
    } else {
        ((p - 0.5) * 2.0, -1.0)
    };
    let y = 4.0 * half_p * (1.0 - half_p);
    sign * (0.225 * y * (y - 1.0) + y)
}
