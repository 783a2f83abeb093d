//! Angle wrapping helpers shared by segments, legs and the body

use std::f32::consts::TAU;

/// Wrap an angle into the half-open window (-PI, PI]
pub fn wrap_angle(angle: f32) -> f32 {
    angle - TAU * (angle / TAU - 0.5).ceil()
}

/// Wrap an angle into the window (centre - PI, centre + PI]
pub fn wrap_around(angle: f32, centre: f32) -> f32 {
    centre + wrap_angle(angle - centre)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_wrap_keeps_small_angles() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(1.0) - 1.0).abs() < EPS);
        assert!((wrap_angle(-1.0) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_wrap_upper_bound_is_inclusive() {
        assert!((wrap_angle(PI) - PI).abs() < EPS);
        assert!((wrap_angle(-PI) - PI).abs() < EPS);
    }

    #[test]
    fn test_wrap_large_angles() {
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < EPS);
        assert!((wrap_angle(5.0 * TAU + 0.25) - 0.25).abs() < 1e-4);
        assert!((wrap_angle(-7.0 * TAU - 0.25) + 0.25).abs() < 1e-4);
    }

    #[test]
    fn test_wrap_around_centre() {
        let wrapped = wrap_around(-3.0, 3.0);
        assert!((wrapped - (TAU - 3.0)).abs() < 1e-4);
        assert!(wrapped > 3.0 - PI && wrapped <= 3.0 + PI);
        assert!((wrap_around(2.5, 3.0) - 2.5).abs() < EPS);
    }
}
