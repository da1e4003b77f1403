//! The escape-time iterator.  A point `c` on the complex plane is
//! iterated through `z = f(z, c)`, starting from `z = c`, until the
//! orbit leaves the disk of radius 2 or the iteration budget runs out.
//! How quickly it left is the score used to color the pixel.
use num::{Complex, Zero};
use std::fmt;

use crate::errors::RenderError;

/// Once `|z|` reaches this, the orbit is considered gone for good.
pub const ESCAPE_RADIUS: f64 = 2.0;

/// The exponent of the still renderer.  It is not the canonical `2`,
/// and rendered output depends on it, so it stays exactly as is.
pub const FIXED_EXPONENT: Complex<f64> = Complex { re: -2.0, im: -1.234 };

/// The recurrence applied to each orbit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EscapeFunction {
    /// `z^p + c` for a fixed complex exponent `p`.
    FixedPower(Complex<f64>),
    /// `z^(n+1) + n*z^2 + c` for a real parameter `n`.
    Polynomial(f64),
}

impl EscapeFunction {
    /// Advance one step of the orbit of `c`.
    #[inline]
    pub fn step(&self, z: Complex<f64>, c: Complex<f64>) -> Complex<f64> {
        match *self {
            EscapeFunction::FixedPower(exponent) => pow(z, exponent) + c,
            EscapeFunction::Polynomial(n) => {
                pow(z, Complex::new(n + 1.0, 0.0)) + Complex::new(n, 0.0) * (z * z) + c
            }
        }
    }
}

impl Default for EscapeFunction {
    fn default() -> Self {
        EscapeFunction::FixedPower(FIXED_EXPONENT)
    }
}

impl fmt::Display for EscapeFunction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EscapeFunction::FixedPower(p) => write!(f, "z^({}{:+}i) + c", p.re, p.im),
            EscapeFunction::Polynomial(n) => write!(f, "z^{:.2} + {:.2}*z^2 + c", n + 1.0, n),
        }
    }
}

/// An escape function together with the budget it is allowed.  The
/// budget is never zero, so every score is a number.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    function: EscapeFunction,
    max_iterations: usize,
}

impl Escape {
    /// Bundle a recurrence with its budget.
    pub fn new(function: EscapeFunction, max_iterations: usize) -> Result<Self, RenderError> {
        if max_iterations == 0 {
            return Err(RenderError::InvalidIterations);
        }
        Ok(Escape {
            function,
            max_iterations,
        })
    }

    /// The recurrence.
    pub fn function(&self) -> EscapeFunction {
        self.function
    }

    /// Upper bound on the number of steps taken per point.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// The number of steps the orbit of `c` survived inside the escape
    /// radius, capped at `max_iterations`.  A NaN magnitude fails the
    /// comparison and so counts as escaped.
    pub fn iterations(&self, c: Complex<f64>) -> usize {
        let mut z = c;
        let mut i = 0;
        while z.norm() < ESCAPE_RADIUS && i < self.max_iterations {
            z = self.function.step(z, c);
            i += 1;
        }
        i
    }

    /// `(max - used) / max`: 1.0 for a point that never started inside
    /// the radius, 0.0 for one that never left.
    pub fn score(&self, c: Complex<f64>) -> f64 {
        let used = self.iterations(c);
        (self.max_iterations - used) as f64 / self.max_iterations as f64
    }
}

/// Raise `base` to a complex power.
///
/// A zero base is special-cased: a zero exponent gives one, a positive
/// real part gives zero, and a negative real part gives infinity (on
/// the real axis when the exponent is real).  For everything else the
/// result is `|z|^p` rotated by `p * arg z`, and the imaginary part of
/// the exponent only enters when it is non-zero, so real exponents
/// never pick up a `0 * ln 0` NaN.
pub fn pow(base: Complex<f64>, exponent: Complex<f64>) -> Complex<f64> {
    if base.is_zero() {
        if exponent.re.is_nan() || exponent.im.is_nan() {
            return Complex::new(f64::NAN, f64::NAN);
        }
        return if exponent.re == 0.0 {
            Complex::new(1.0, 0.0)
        } else if exponent.re < 0.0 {
            if exponent.im == 0.0 {
                Complex::new(f64::INFINITY, 0.0)
            } else {
                Complex::new(f64::INFINITY, f64::INFINITY)
            }
        } else {
            Complex::zero()
        };
    }

    let (modulus, arg) = base.to_polar();
    let mut r = modulus.powf(exponent.re);
    let mut theta = exponent.re * arg;
    if exponent.im != 0.0 {
        r *= (-exponent.im * arg).exp();
        theta += exponent.im * modulus.ln();
    }
    Complex::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Complex<f64>, b: Complex<f64>) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn integer_powers_agree_with_multiplication() {
        let z = Complex::new(0.3, -0.7);
        assert!(close(pow(z, Complex::new(2.0, 0.0)), z * z));
        assert!(close(pow(z, Complex::new(3.0, 0.0)), z * z * z));
        assert!(close(pow(z, Complex::new(1.0, 0.0)), z));
        assert!(close(pow(z, Complex::new(-1.0, 0.0)), z.inv()));
    }

    #[test]
    fn complex_powers_agree_with_exp_ln() {
        let z = Complex::new(-1.5, 0.25);
        let expected = (FIXED_EXPONENT * z.ln()).exp();
        assert!((pow(z, FIXED_EXPONENT) - expected).norm() < 1e-9 * expected.norm());
    }

    #[test]
    fn zero_base_follows_the_exponent_sign() {
        let zero = Complex::new(0.0, 0.0);
        assert_eq!(pow(zero, Complex::new(0.0, 0.0)), Complex::new(1.0, 0.0));
        assert_eq!(pow(zero, Complex::new(1.0, 0.0)), Complex::new(0.0, 0.0));
        assert_eq!(pow(zero, Complex::new(2.5, 3.0)), Complex::new(0.0, 0.0));
        assert_eq!(
            pow(zero, Complex::new(-2.0, 0.0)),
            Complex::new(f64::INFINITY, 0.0)
        );
        assert_eq!(
            pow(zero, FIXED_EXPONENT),
            Complex::new(f64::INFINITY, f64::INFINITY)
        );
        assert!(pow(zero, Complex::new(f64::NAN, 0.0)).re.is_nan());
    }

    #[test]
    fn points_outside_the_radius_escape_immediately() {
        let escape = Escape::new(EscapeFunction::default(), 100).unwrap();
        assert_eq!(escape.iterations(Complex::new(2.0, 0.0)), 0);
        assert_eq!(escape.iterations(Complex::new(-2.0, -2.0)), 0);
        assert_eq!(escape.score(Complex::new(3.0, 1.0)), 1.0);
    }

    #[test]
    fn the_origin_escapes_through_infinity() {
        // 0^(-2-1.234i) is infinite, so the first step leaves the disk.
        let escape = Escape::new(EscapeFunction::default(), 100).unwrap();
        assert_eq!(escape.iterations(Complex::new(0.0, 0.0)), 1);
        let score = escape.score(Complex::new(0.0, 0.0));
        assert!(score >= 0.0 && score <= 1.0);
        assert_eq!(score, 0.99);
    }

    #[test]
    fn polynomial_at_zero_is_a_translation() {
        let escape = Escape::new(EscapeFunction::Polynomial(0.0), 200).unwrap();
        // 0 is a fixed point of z -> z + c when c = 0.
        assert_eq!(escape.iterations(Complex::new(0.0, 0.0)), 200);
        assert_eq!(escape.score(Complex::new(0.0, 0.0)), 0.0);
        // z -> z + 1 from 1: 1, 2 leaves after one step.
        assert_eq!(escape.iterations(Complex::new(1.0, 0.0)), 1);
    }

    #[test]
    fn polynomial_with_n_one_is_doubled_squares() {
        // z^2 + 1*z^2 + c
        let z = Complex::new(0.4, 0.1);
        let c = Complex::new(-0.2, 0.3);
        let step = EscapeFunction::Polynomial(1.0).step(z, c);
        assert!(close(step, z * z * 2.0 + c));
    }

    #[test]
    fn scores_fall_as_orbits_last_longer() {
        let escape = Escape::new(EscapeFunction::Polynomial(0.0), 100).unwrap();
        // z -> z + c walks the real axis in steps of c.
        let fast = escape.score(Complex::new(1.5, 0.0));
        let slow = escape.score(Complex::new(0.03125, 0.0));
        assert_eq!(escape.iterations(Complex::new(1.5, 0.0)), 1);
        assert_eq!(escape.iterations(Complex::new(0.03125, 0.0)), 63);
        assert!(fast > slow);
        assert_eq!(fast, 0.99);
        assert_eq!(slow, 0.37);
    }

    #[test]
    fn scores_stay_in_the_unit_interval() {
        let escape = Escape::new(EscapeFunction::default(), 100).unwrap();
        for re in -8..=8 {
            for im in -8..=8 {
                let c = Complex::new(re as f64 / 4.0, im as f64 / 4.0);
                let score = escape.score(c);
                assert!(score >= 0.0 && score <= 1.0, "{} scored {}", c, score);
            }
        }
    }

    #[test]
    fn an_empty_budget_is_refused() {
        match Escape::new(EscapeFunction::default(), 0) {
            Err(RenderError::InvalidIterations) => {}
            other => panic!("expected InvalidIterations, got {:?}", other),
        }
        let escape = Escape::new(EscapeFunction::Polynomial(2.0), 1).unwrap();
        assert_eq!(escape.max_iterations(), 1);
        assert_eq!(escape.function(), EscapeFunction::Polynomial(2.0));
    }

    #[test]
    fn progress_formula_shows_both_coefficients() {
        assert_eq!(
            EscapeFunction::Polynomial(0.5).to_string(),
            "z^1.50 + 0.50*z^2 + c"
        );
        assert_eq!(
            EscapeFunction::Polynomial(10.0).to_string(),
            "z^11.00 + 10.00*z^2 + c"
        );
        assert_eq!(EscapeFunction::default().to_string(), "z^(-2-1.234i) + c");
    }
}
