//! Extensions over [Complex64] for the autopilot math. Standard arithmetic,
//! magnitude/phase and polar construction all come from [num_complex]; the
//! only operation added here is the magnitude-only squash.

use num_complex::Complex64;

/// Magnitude-only logistic compression.
///
/// Complex feedback loops explode if phase is also compressed, so only the
/// energy term is bounded into (0,1). Phase passes through untouched.
pub trait Squash {
    fn squash(&self) -> Self;
}

impl Squash for Complex64 {
    fn squash(&self) -> Self {
        let (m, θ) = self.to_polar();
        Complex64::from_polar(1. / (1. + (-m.abs()).exp()), θ)
    }
}

/// Magnitude and angle-in-degrees, each truncated to 4 decimal places.
/// Trace output only.
pub fn mag_deg(c: Complex64) -> (f64, f64) {
    let (m, θ) = c.to_polar();
    (trunc4(m), trunc4(θ.to_degrees()))
}

fn trunc4(v: f64) -> f64 {
    (v * 10000.).trunc() / 10000.
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assert_cx_approx;
    use rand::rng;
    use rand_distr::{Distribution, Uniform};

    #[test]
    fn test_squash_bounds_magnitude_keeps_phase() {
        let mut rng = rng();
        // past |x| ~= 36 the logistic rounds to exactly 1.0 in f64; keep
        // the samples below that so the strict upper bound holds
        let dist = Uniform::new(-20., 20.).unwrap();

        for _ in 0..1000 {
            let c = Complex64::new(dist.sample(&mut rng), dist.sample(&mut rng));
            let s = c.squash();

            assert!(s.norm() > 0. && s.norm() < 1., "|squash| out of (0,1): {s}");
            assert!(
                (s.arg() - c.arg()).abs() < 1e-12,
                "squash moved phase: {} -> {}",
                c.arg(),
                s.arg()
            );
        }
    }

    #[test]
    fn test_squash_saturates_at_one() {
        // huge magnitudes saturate to 1.0 exactly; phase still passes through
        let c = Complex64::new(300., 400.);
        let s = c.squash();
        assert!(s.norm() <= 1.);
        assert!((s.arg() - c.arg()).abs() < 1e-12);
    }

    #[test]
    fn test_squash_zero() {
        // |0| = 0, so the logistic sits at its midpoint
        let s = Complex64::new(0., 0.).squash();
        assert_cx_approx!(s, Complex64::new(0.5, 0.));
    }

    #[test]
    fn test_squash_known_value() {
        // 1/(1+e^-0.5)
        let s = Complex64::new(0.5, 0.).squash();
        assert_cx_approx!(s, Complex64::new(0.6224593312018546, 0.), 1e-12);
    }

    #[test]
    fn test_squash_negative_real_keeps_pi_phase() {
        let s = Complex64::new(-2., 0.).squash();
        assert!((s.arg() - std::f64::consts::PI).abs() < 1e-12);
        assert!((s.norm() - 1. / (1. + (-2.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_mag_deg_truncates() {
        let c = Complex64::from_polar(1.23456789, std::f64::consts::FRAC_PI_2);
        let (m, d) = mag_deg(c);
        assert!((m - 1.2345).abs() < 1e-12);
        assert!((d - 90.).abs() < 1e-12);
    }
}
