//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert usize to i64, saturating at the i64 range.
#[must_use]
pub fn usize_to_i64(value: usize) -> i64 {
    cast::<usize, i64>(value).unwrap_or(i64::MAX)
}

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Clamp a value to the unit interval, treating NaN as 0.0.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usize_casts_cover_small_values() {
        assert!((usize_to_f64(4) - 4.0).abs() < f64::EPSILON);
        assert_eq!(usize_to_i64(3), 3);
    }

    #[test]
    fn rounder_handles_nan_and_range() {
        assert_eq!(round_f64_to_i32(1.6), 2);
        assert_eq!(round_f64_to_i32(f64::NAN), 0);
        assert_eq!(round_f64_to_i32(f64::from(i32::MAX) * 2.0), i32::MAX);
    }

    #[test]
    fn clamp_unit_bounds_probabilities() {
        assert!((clamp_unit(1.7) - 1.0).abs() < f64::EPSILON);
        assert!((clamp_unit(-0.3) - 0.0).abs() < f64::EPSILON);
        assert!((clamp_unit(f64::NAN) - 0.0).abs() < f64::EPSILON);
    }
}
