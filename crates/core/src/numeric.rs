//! Numeric editor parameters: bounds, stepping and display transform

use shredder_types::{KeyRange, KeySchema, SettingValue};

use crate::constants::{DEFAULT_NUMERIC_MAX, FLOAT_STEP, INTEGER_STEP};

/// How a numeric value is rendered in its spin button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumericDisplay {
    /// The value itself
    #[default]
    Raw,
    /// The value times 100, with a percent sign
    Percent,
    /// The value as a whole number
    Size,
}

impl NumericDisplay {
    /// Pick the transform from the `draw_percent` / `draw_size` flags
    ///
    /// Size wins when both are set.
    pub fn from_flags(draw_percent: bool, draw_size: bool) -> Self {
        if draw_size {
            NumericDisplay::Size
        } else if draw_percent {
            NumericDisplay::Percent
        } else {
            NumericDisplay::Raw
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericSpec {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Digits after the decimal point
    pub digits: u32,
    pub floating_point: bool,
    pub display: NumericDisplay,
}

impl NumericSpec {
    /// Bounds from the key's declared range, or `0..=DEFAULT_NUMERIC_MAX`
    pub fn for_key(key: &KeySchema, floating_point: bool, display: NumericDisplay) -> Self {
        let (min, max) = match key.range {
            KeyRange::Range { min, max } => (min, max),
            _ => (0.0, DEFAULT_NUMERIC_MAX),
        };
        let (min, max) = if floating_point {
            (min.min(max), max.max(min))
        } else {
            // `i` keys hold 32 bit integers
            let lo = min.min(max).ceil().max(i32::MIN as f64);
            let hi = max.max(min).floor().min(i32::MAX as f64);
            (lo, hi.max(lo))
        };

        Self {
            min,
            max,
            step: if floating_point { FLOAT_STEP } else { INTEGER_STEP },
            digits: if floating_point { 1 } else { 0 },
            floating_point,
            display,
        }
    }

    /// Clamp into bounds, rounding to a whole number for integer keys
    pub fn clamp(&self, value: f64) -> f64 {
        let value = if value.is_nan() { self.min } else { value };
        let value = value.clamp(self.min, self.max);
        if self.floating_point {
            value
        } else {
            value.round()
        }
    }

    /// The store value for a spin button value
    pub fn to_setting_value(&self, value: f64) -> SettingValue {
        let value = self.clamp(value);
        if self.floating_point {
            SettingValue::Double(value)
        } else {
            SettingValue::Int(value as i64)
        }
    }

    /// Text shown in the spin button
    pub fn format(&self, value: f64) -> String {
        match self.display {
            NumericDisplay::Raw => format!("{:.*}", self.digits as usize, value),
            NumericDisplay::Percent => format!("{:.0}%", value * 100.0),
            NumericDisplay::Size => format!("{:.0}", value),
        }
    }

    /// Parse text typed into the spin button back into a value
    pub fn parse(&self, text: &str) -> Option<f64> {
        let text = text.trim();
        match self.display {
            NumericDisplay::Percent => {
                let number = text.strip_suffix('%').unwrap_or(text).trim();
                number.parse::<f64>().ok().map(|v| v / 100.0)
            }
            NumericDisplay::Raw | NumericDisplay::Size => text.parse::<f64>().ok(),
        }
        .filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::test_schema;

    #[test]
    fn test_range_from_schema() {
        let schema = test_schema();
        let spec = NumericSpec::for_key(
            schema.key("traverse-max-depth").unwrap(),
            false,
            NumericDisplay::Raw,
        );
        assert_eq!((spec.min, spec.max, spec.step, spec.digits), (0.0, 100.0, 1.0, 0));

        let spec = NumericSpec::for_key(
            schema.key("general-ratio").unwrap(),
            true,
            NumericDisplay::Percent,
        );
        assert_eq!((spec.min, spec.max, spec.step, spec.digits), (0.0, 1.0, 0.1, 1));
    }

    #[test]
    fn test_unranged_key_uses_wide_default() {
        let schema = test_schema();
        // The algorithm key has an enum range, which is not a numeric range
        let spec = NumericSpec::for_key(
            schema.key("computation-algorithm").unwrap(),
            false,
            NumericDisplay::Raw,
        );
        assert_eq!(spec.min, 0.0);
        assert_eq!(spec.max, i32::MAX as f64);

        let spec = NumericSpec::for_key(
            schema.key("computation-algorithm").unwrap(),
            true,
            NumericDisplay::Raw,
        );
        assert_eq!(spec.max, DEFAULT_NUMERIC_MAX);
    }

    #[test]
    fn test_values_never_leave_range() {
        let schema = test_schema();
        let key = schema.key("traverse-max-depth").unwrap();
        let spec = NumericSpec::for_key(key, false, NumericDisplay::Raw);

        for input in [-5.0, 0.4, 42.6, 100.0, 1e12, f64::NAN, f64::INFINITY] {
            let value = spec.to_setting_value(input);
            assert!(key.accepts(&value), "{} produced {:?}", input, value);
        }
        assert_eq!(spec.to_setting_value(42.6), SettingValue::Int(43));
    }

    #[test]
    fn test_display_transforms() {
        assert_eq!(NumericDisplay::from_flags(false, false), NumericDisplay::Raw);
        assert_eq!(NumericDisplay::from_flags(true, false), NumericDisplay::Percent);
        assert_eq!(NumericDisplay::from_flags(true, true), NumericDisplay::Size);

        let schema = test_schema();
        let key = schema.key("general-ratio").unwrap();
        let percent = NumericSpec::for_key(key, true, NumericDisplay::Percent);
        assert_eq!(percent.format(0.25), "25%");
        assert_eq!(percent.parse("25%"), Some(0.25));
        assert_eq!(percent.parse(" 50 "), Some(0.5));
        assert_eq!(percent.parse("abc"), None);

        let raw = NumericSpec::for_key(key, true, NumericDisplay::Raw);
        assert_eq!(raw.format(0.3), "0.3");
        let size = NumericSpec::for_key(key, true, NumericDisplay::Size);
        assert_eq!(size.format(1024.4), "1024");
    }
}
