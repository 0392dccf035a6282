//! Wrap-around arithmetic on angles in radians.

use core::f64::consts::PI;
use nalgebra::Point2;
use num_traits::Float;

const TAU: f64 = 2.0 * PI;

/// Normalizes an angle into `(-π, π]`.
pub fn normalize(mut angle: f64) -> f64 {
    angle %= TAU;
    if angle <= -PI {
        angle += TAU;
    } else if angle > PI {
        angle -= TAU;
    }
    angle
}

/// Absolute difference between two angles, accounting for wrap-around.
///
/// The result is in `[0, π]`, so `difference(-3.1, 3.1)` is small rather than
/// nearly a full turn.
pub fn difference(a: f64, b: f64) -> f64 {
    let d = normalize(a - b);
    if d < 0.0 {
        -d
    } else {
        d
    }
}

/// The direction of the segment from `a` to `b`, in `(-π, π]`.
pub fn of_segment(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    Float::atan2(b.y - a.y, b.x - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_wraps() {
        assert!(difference(-3.1, 3.1) < 0.1);
        assert!((difference(0.0, PI) - PI).abs() < 1e-12);
        assert!(difference(5.0 * TAU + 0.25, 0.25) < 1e-12);
    }

    #[test]
    fn segment_direction() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 1.0);
        assert!((of_segment(&a, &b) - PI / 4.0).abs() < 1e-12);
        assert!((of_segment(&b, &a) + 3.0 * PI / 4.0).abs() < 1e-12);
    }
}
