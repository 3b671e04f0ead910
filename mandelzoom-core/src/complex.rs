use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// A complex number represented as two `f64` components.
///
/// Only the operations the escape-time loop needs are provided: squaring,
/// addition and the squared magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Returns `z²`.
    #[inline]
    pub fn square(self) -> Self {
        Self {
            re: self.re * self.re - self.im * self.im,
            im: 2.0 * self.re * self.im,
        }
    }

    /// Returns `re² + im²` without taking the square root.
    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// `true` when both components are finite.
    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl Add for Complex {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            im: self.im + rhs.im,
        }
    }
}

impl AddAssign for Complex {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.re += rhs.re;
        self.im += rhs.im;
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.im >= 0.0 {
            write!(f, "{} + {}i", self.re, self.im)
        } else {
            write!(f, "{} - {}i", self.re, -self.im)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn zero_constant() {
        assert_eq!(Complex::ZERO, Complex::new(0.0, 0.0));
    }

    #[test]
    fn addition() {
        let mut a = Complex::new(1.0, 2.0);
        let c = a + Complex::new(3.0, 4.0);
        assert!(approx_eq(c.re, 4.0));
        assert!(approx_eq(c.im, 6.0));

        a += Complex::new(-1.0, 0.5);
        assert!(approx_eq(a.re, 0.0));
        assert!(approx_eq(a.im, 2.5));
    }

    #[test]
    fn squaring() {
        // (1 + i)² = 1 + 2i - 1 = 2i
        let z = Complex::new(1.0, 1.0).square();
        assert!(approx_eq(z.re, 0.0));
        assert!(approx_eq(z.im, 2.0));

        // (3 - 2i)² = 9 - 12i - 4 = 5 - 12i
        let w = Complex::new(3.0, -2.0).square();
        assert!(approx_eq(w.re, 5.0));
        assert!(approx_eq(w.im, -12.0));
    }

    #[test]
    fn norm_sq() {
        assert!(approx_eq(Complex::new(3.0, 4.0).norm_sq(), 25.0));
    }

    #[test]
    fn display_signs() {
        assert_eq!(Complex::new(1.5, 2.0).to_string(), "1.5 + 2i");
        assert_eq!(Complex::new(-0.5, -0.25).to_string(), "-0.5 - 0.25i");
    }

    #[test]
    fn finiteness() {
        assert!(Complex::new(1.0, -1.0).is_finite());
        assert!(!Complex::new(f64::NAN, 0.0).is_finite());
        assert!(!Complex::new(0.0, f64::INFINITY).is_finite());
    }
}
