//! Ambient-light brightness scaling

use tubeclock_protocol::BrightnessScale;

/// Divisor in full daylight
pub const BRIGHT_SCALE: f64 = 1.0;

/// Divisor in the dark
pub const DARK_SCALE: f64 = 4.0;

/// Map a light-sensor reading to a brightness divisor
///
/// `raw` rises with ambient light. Full scale gives [`BRIGHT_SCALE`], zero
/// gives [`DARK_SCALE`], linear in between. Readings above `adc_max` are
/// clamped; an `adc_max` of zero yields unity.
pub fn scale_from_ambient(raw: u16, adc_max: u16) -> BrightnessScale {
    if adc_max == 0 {
        return BrightnessScale::UNITY;
    }
    let light = f64::from(raw.min(adc_max)) / f64::from(adc_max);
    let value = DARK_SCALE - (DARK_SCALE - BRIGHT_SCALE) * light;
    BrightnessScale::new(value).unwrap_or(BrightnessScale::UNITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(scale_from_ambient(4095, 4095).value(), 1.0);
        assert_eq!(scale_from_ambient(0, 4095).value(), 4.0);
        assert_eq!(scale_from_ambient(2000, 1000).value(), 1.0);
        assert_eq!(scale_from_ambient(10, 0), BrightnessScale::UNITY);
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(scale_from_ambient(50, 100).value(), 2.5);
    }

    proptest! {
        #[test]
        fn prop_scale_in_range(raw in any::<u16>(), max in 1u16..) {
            let s = scale_from_ambient(raw, max).value();
            prop_assert!((BRIGHT_SCALE..=DARK_SCALE).contains(&s));
        }
    }
}
