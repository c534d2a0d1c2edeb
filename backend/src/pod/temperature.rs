//! Cold-chain compliance: expected range from a free text label against the
//! readings the carrier recorded.
//!
//! Missing data is treated as compliant: an unparseable label or a delivery
//! without readings passes. This can hide non-compliant deliveries whose
//! label is malformed and is kept pending product review.

use regex::Regex;
use std::sync::LazyLock;

/// Carrier placeholder for "no reading".
pub const NO_READING_SENTINEL: f64 = 999.0;

static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([+-]?\d+(?:[.,]\d+)?)\s*(?:°\s*c?|c)?\s*(?:to|–|—|-)\s*([+-]?\d+(?:[.,]\d+)?)",
    )
    .expect("range pattern compiles")
});

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-]?\d+(?:[.,]\d+)?").expect("number pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl TemperatureRange {
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.replace(',', ".").parse::<f64>().ok()
}

/// Parses labels such as `Frozen -18C to -20C`, `2-8°C` or `+14°C`.
/// A single value yields a degenerate range.
pub fn parse_expected_range(label: &str) -> Option<TemperatureRange> {
    if let Some(caps) = RANGE.captures(label) {
        let a = parse_number(&caps[1])?;
        let b = parse_number(&caps[2])?;
        return Some(TemperatureRange::new(a, b));
    }
    let value = parse_number(NUMBER.find(label)?.as_str())?;
    Some(TemperatureRange::new(value, value))
}

/// First number in a raw field value, unless it is the `999` sentinel.
pub fn parse_reading(raw: &str) -> Option<f64> {
    let value = parse_number(NUMBER.find(raw.trim())?.as_str())?;
    if value == NO_READING_SENTINEL {
        return None;
    }
    Some(value)
}

pub fn collect_readings<S: AsRef<str>>(raw_values: &[S]) -> Vec<f64> {
    raw_values
        .iter()
        .filter_map(|raw| parse_reading(raw.as_ref()))
        .collect()
}

/// Compliant when any reading falls inside the expected range.
pub fn is_temperature_compliant(expected_label: Option<&str>, readings: &[f64]) -> bool {
    let Some(range) = expected_label.and_then(parse_expected_range) else {
        return true;
    };
    if readings.is_empty() {
        return true;
    }
    readings.iter().any(|&reading| range.contains(reading))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_frozen_range_in_either_order() {
        let range = parse_expected_range("Frozen -18C to -20C").unwrap();
        assert_eq!(range, TemperatureRange { min: -20.0, max: -18.0 });
    }

    #[test]
    fn parses_separator_variants() {
        assert_eq!(
            parse_expected_range("Chilled 2-8°C"),
            Some(TemperatureRange { min: 2.0, max: 8.0 })
        );
        assert_eq!(
            parse_expected_range("+2°C – +8°C"),
            Some(TemperatureRange { min: 2.0, max: 8.0 })
        );
        assert_eq!(
            parse_expected_range("-15 - -25"),
            Some(TemperatureRange { min: -25.0, max: -15.0 })
        );
    }

    #[test]
    fn single_value_is_degenerate_range() {
        assert_eq!(
            parse_expected_range("+14°C"),
            Some(TemperatureRange { min: 14.0, max: 14.0 })
        );
        assert_eq!(parse_expected_range("Ambient"), None);
    }

    #[test]
    fn sentinel_and_garbage_readings_are_excluded() {
        let raw = ["-19", "999", "n/a", " -18,5 °C", ""];
        assert_eq!(collect_readings(&raw), vec![-19.0, -18.5]);
    }

    #[test]
    fn any_reading_in_range_is_compliant() {
        let label = Some("Frozen -18C to -20C");
        assert!(is_temperature_compliant(label, &[-19.0]));
        assert!(is_temperature_compliant(label, &[4.0, -20.0]));
        assert!(!is_temperature_compliant(label, &[4.0, -12.0]));
    }

    #[test]
    fn missing_data_defaults_to_compliant() {
        assert!(is_temperature_compliant(None, &[40.0]));
        assert!(is_temperature_compliant(Some("Keep cool"), &[40.0]));
        assert!(is_temperature_compliant(Some("2-8°C"), &[]));
        let readings = collect_readings(&["999"]);
        assert!(is_temperature_compliant(Some("2-8°C"), &readings));
    }
}
