/// Converts an amount in minor currency units (cents) to major units.
pub fn minor_to_major(minor: i64) -> f64 {
    minor as f64 / 100.0
}

/// Converts an amount in major currency units to minor units, rounding to
/// the nearest cent.
pub fn major_to_minor(major: f64) -> i64 {
    (major * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minor_to_major_divides_by_one_hundred() {
        assert_eq!(minor_to_major(5000), 50.0);
        assert_eq!(minor_to_major(0), 0.0);
        assert_eq!(minor_to_major(199), 1.99);
    }

    #[test]
    fn normalization_round_trips_whole_cent_amounts() {
        for minor in [0i64, 1, 99, 100, 5000, 123_456_789] {
            assert_eq!(major_to_minor(minor_to_major(minor)), minor);
        }
    }

    #[test]
    fn major_to_minor_rounds_to_nearest_cent() {
        assert_eq!(major_to_minor(29.99), 2999);
        assert_eq!(major_to_minor(0.1), 10);
    }
}
