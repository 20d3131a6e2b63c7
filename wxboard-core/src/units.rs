//! Pure unit conversions shared by the normalizer and the rendering layer.

/// The 16 compass points, clockwise from north.
pub const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn kmh_to_mps(kmh: f64) -> f64 {
    kmh / 3.6
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh / 1.609_344
}

/// Map a wind direction in degrees onto one of the 16 compass points.
///
/// Bucket width is 22.5°; inputs outside [0, 360) are normalized first, so
/// the function is total over the real line.
pub fn degrees_to_compass(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    let idx = ((normalized / 22.5) + 0.5).floor() as usize % 16;
    COMPASS_POINTS[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fahrenheit_fixed_points() {
        assert!((celsius_to_fahrenheit(0.0) - 32.0).abs() < f64::EPSILON);
        assert!((celsius_to_fahrenheit(100.0) - 212.0).abs() < f64::EPSILON);
    }

    #[test]
    fn compass_covers_all_points() {
        for i in 0..16 {
            let center = i as f64 * 22.5;
            assert_eq!(degrees_to_compass(center), COMPASS_POINTS[i]);
        }
    }

    #[test]
    fn compass_is_periodic() {
        let mut deg = 0.0;
        while deg < 360.0 {
            assert_eq!(degrees_to_compass(deg), degrees_to_compass(deg + 360.0));
            deg += 7.3;
        }
    }

    #[test]
    fn compass_bucket_boundaries() {
        // North spans [348.75, 360) ∪ [0, 11.25).
        assert_eq!(degrees_to_compass(348.75), "N");
        assert_eq!(degrees_to_compass(11.24), "N");
        assert_eq!(degrees_to_compass(11.25), "NNE");
        assert_eq!(degrees_to_compass(348.74), "NNW");
    }

    #[test]
    fn compass_handles_negative_degrees() {
        assert_eq!(degrees_to_compass(-90.0), "W");
        assert_eq!(degrees_to_compass(-360.0), "N");
    }

    #[test]
    fn wind_speed_conversions() {
        assert!((kmh_to_mps(3.6) - 1.0).abs() < 1e-9);
        assert!((kmh_to_mph(1.609_344) - 1.0).abs() < 1e-9);
    }
}
