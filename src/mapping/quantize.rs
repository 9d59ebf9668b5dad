//! Strike magnitude to MIDI velocity scaling

/// Largest magnitude the controller reports for a strike.
pub const MAX_MAGNITUDE: i64 = 7;

/// Largest MIDI velocity.
pub const MAX_VELOCITY: i64 = 127;

/// Scale a 3-bit strike magnitude (0-7) to a MIDI velocity (0-127).
///
/// Computes `round(magnitude * 127 / 7) mod 128` in integer arithmetic.
/// The modulo wraps a result of exactly 128 (or anything beyond) back
/// into range instead of saturating; readings outside 0-7 are not
/// expected from the hardware but follow the same law.
pub fn quantize_velocity(magnitude: i32) -> u8 {
    let scaled = MAX_VELOCITY * magnitude as i64;
    let half = if scaled < 0 { -MAX_MAGNITUDE } else { MAX_MAGNITUDE };
    // 127 * m / 7 never lands on .5, so rounding direction at ties is moot
    let rounded = (2 * scaled + half) / (2 * MAX_MAGNITUDE);
    rounded.rem_euclid(MAX_VELOCITY + 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_boundaries() {
        assert_eq!(quantize_velocity(0), 0);
        assert_eq!(quantize_velocity(7), 127);
    }

    #[test]
    fn test_quantize_table() {
        let velocities: Vec<u8> = (0..=7).map(quantize_velocity).collect();
        assert_eq!(velocities, vec![0, 18, 36, 54, 73, 91, 109, 127]);
    }

    #[test]
    fn test_quantize_monotonic() {
        for m in 0..7 {
            assert!(quantize_velocity(m) <= quantize_velocity(m + 1));
        }
    }

    #[test]
    fn test_quantize_wraps_past_full_scale() {
        // round(145.14) = 145, 145 mod 128 = 17
        assert_eq!(quantize_velocity(8), 17);
    }

    #[test]
    fn test_quantize_negative_wraps_positive() {
        // round(-18.14) = -18, -18 mod 128 = 110
        assert_eq!(quantize_velocity(-1), 110);
    }
}
