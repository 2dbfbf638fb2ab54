//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle into the range [-pi, pi).
pub fn wrap_to_pi<T>(value: T) -> T
where
    T: Float
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let tau_t: T = pi_t + pi_t;

    rem_euclid(value + pi_t, tau_t) - pi_t
}

/// Clamp a value between `min` and `max`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float
{
    value.max(min).min(max)
}

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;
    const TAU: f64 = std::f64::consts::TAU;

    #[test]
    fn test_rem_euclid() {
        assert_eq!(rem_euclid(5f64, 3f64), 2f64);
        assert_eq!(rem_euclid(-1f64, 3f64), 2f64);
    }

    #[test]
    fn test_wrap_to_pi() {
        assert!((wrap_to_pi(0.5f64) - 0.5).abs() < 1e-12);
        assert!((wrap_to_pi(TAU + 0.5) - 0.5).abs() < 1e-12);
        assert!((wrap_to_pi(-TAU - 0.5) + 0.5).abs() < 1e-12);
        assert!((wrap_to_pi(PI + 0.1) - (-PI + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(2f64, 0f64, 1f64), 1f64);
        assert_eq!(clamp(-2f64, 0f64, 1f64), 0f64);
        assert_eq!(clamp(0.5f64, 0f64, 1f64), 0.5f64);
    }
}
