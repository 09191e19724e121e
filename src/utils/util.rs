//! # Utility Module
//!
//! Small numeric helpers shared by the geodesic code.
//!
//! `clamp` keeps inverse-trigonometric arguments inside their domain, where
//! rounding can otherwise push a value like `1.0000000000000002` into `asin`
//! and produce NaN. `wrap_longitude` folds any longitude into `(-180, 180]`.

/// Clamps a value between a minimum and maximum.
///
/// # Examples
///
/// ```
/// use polymeasure::utils::util::clamp;
///
/// assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
/// assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
/// assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
/// ```
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Wraps a longitude in degrees into the half-open range `(-180, 180]`.
///
/// ```
/// use polymeasure::utils::util::wrap_longitude;
///
/// assert_eq!(wrap_longitude(181.0), -179.0);
/// assert_eq!(wrap_longitude(-180.0), 180.0);
/// ```
pub fn wrap_longitude(lng: f64) -> f64 {
    let wrapped = (lng + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_clamp_within_bounds() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
    }

    #[test]
    fn test_clamp_below_bounds() {
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn test_clamp_above_bounds() {
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_wrap_longitude_keeps_range() {
        assert_approx_eq!(wrap_longitude(0.0), 0.0);
        assert_approx_eq!(wrap_longitude(180.0), 180.0);
        assert_approx_eq!(wrap_longitude(-180.0), 180.0);
        assert_approx_eq!(wrap_longitude(190.0), -170.0);
        assert_approx_eq!(wrap_longitude(-190.0), 170.0);
        assert_approx_eq!(wrap_longitude(720.5), 0.5);
    }
}
