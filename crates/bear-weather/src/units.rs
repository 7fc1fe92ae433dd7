//! Turns raw hourly-sample fields into plottable numbers.
//!
//! Whatever shape a value arrives in, the result is finite: anything that
//! cannot be read becomes `0.0`.

use crate::types::{HourlySample, RawValue, Units, Variable};

/// Convert one raw sample value for display under `units`.
pub fn convert(variable: Variable, raw: Option<&RawValue>, units: Units) -> f64 {
    let value = match raw {
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(text)) => leading_number(text).unwrap_or(0.0),
        Some(RawValue::Quantity { value, .. }) => value.unwrap_or(0.0),
        None => 0.0,
    };
    let value = if value.is_finite() { value } else { 0.0 };

    // Backend dewpoints are always Celsius.
    if variable == Variable::Dewpoint && units != Units::Metric {
        return celsius_to_fahrenheit(value);
    }
    value
}

/// Convert a whole series, one value per sample.
pub fn convert_series(samples: &[HourlySample], variable: Variable, units: Units) -> Vec<f64> {
    samples
        .iter()
        .map(|sample| convert(variable, sample.raw(variable).as_ref(), units))
        .collect()
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    (celsius * 9.0 / 5.0 + 32.0).round()
}

/// Parse the number a string starts with, e.g. `"9 km/h"` -> 9 or `"-3.5C"` -> -3.5.
pub fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (i, c) in trimmed.char_indices() {
        match c {
            '-' | '+' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }

    if !seen_digit {
        return None;
    }
    trimmed[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn wind_speed_string_uses_leading_number() {
        assert_eq!(convert(Variable::WindSpeed, Some(&text("9 km/h")), Units::Metric), 9.0);
        assert_eq!(
            convert(Variable::WindSpeed, Some(&text("10 to 15 mph")), Units::Imperial),
            10.0
        );
        assert_eq!(convert(Variable::WindSpeed, Some(&text(" 12.5mph")), Units::Imperial), 12.5);
    }

    #[test]
    fn non_numeric_wind_speed_is_zero() {
        assert_eq!(convert(Variable::WindSpeed, Some(&text("calm")), Units::Imperial), 0.0);
        assert_eq!(convert(Variable::WindSpeed, Some(&text("")), Units::Imperial), 0.0);
        assert_eq!(convert(Variable::WindSpeed, Some(&text("-")), Units::Imperial), 0.0);
        assert_eq!(convert(Variable::WindSpeed, Some(&text(".")), Units::Imperial), 0.0);
    }

    #[test]
    fn quantity_objects_are_unwrapped() {
        let humidity = RawValue::Quantity {
            value: Some(64.0),
            unit: Some("wmoUnit:percent".into()),
        };
        assert_eq!(convert(Variable::RelativeHumidity, Some(&humidity), Units::Imperial), 64.0);

        let empty = RawValue::Quantity {
            value: None,
            unit: None,
        };
        assert_eq!(convert(Variable::RelativeHumidity, Some(&empty), Units::Imperial), 0.0);
    }

    #[test]
    fn dewpoint_converted_only_for_imperial() {
        for celsius in [-40.0, -12.3, 0.0, 18.3, 21.7, 35.0] {
            let raw = RawValue::Number(celsius);
            assert_eq!(
                convert(Variable::Dewpoint, Some(&raw), Units::Imperial),
                (celsius * 9.0 / 5.0 + 32.0_f64).round()
            );
            assert_eq!(convert(Variable::Dewpoint, Some(&raw), Units::Metric), celsius);
        }
    }

    #[test]
    fn dewpoint_quantity_is_converted() {
        let raw = RawValue::Quantity {
            value: Some(20.0),
            unit: Some("wmoUnit:degC".into()),
        };
        assert_eq!(convert(Variable::Dewpoint, Some(&raw), Units::Imperial), 68.0);
    }

    #[test]
    fn missing_and_non_finite_values_are_zero() {
        assert_eq!(convert(Variable::Temperature, None, Units::Imperial), 0.0);
        assert_eq!(
            convert(Variable::Temperature, Some(&RawValue::Number(f64::NAN)), Units::Imperial),
            0.0
        );
        assert_eq!(
            convert(Variable::Temperature, Some(&RawValue::Number(f64::INFINITY)), Units::Metric),
            0.0
        );
    }

    #[test]
    fn leading_number_edge_cases() {
        assert_eq!(leading_number("-3.5C"), Some(-3.5));
        assert_eq!(leading_number("5."), Some(5.0));
        assert_eq!(leading_number("1.2.3"), Some(1.2));
        assert_eq!(leading_number("mph 9"), None);
    }

    #[test]
    fn convert_series_keeps_order() {
        let samples: Vec<HourlySample> = serde_json::from_value(serde_json::json!([
            { "windSpeed": "5 mph" },
            { "windSpeed": "gusty" },
            { "windSpeed": 7 }
        ]))
        .unwrap();
        assert_eq!(
            convert_series(&samples, Variable::WindSpeed, Units::Imperial),
            vec![5.0, 0.0, 7.0]
        );
    }
}
