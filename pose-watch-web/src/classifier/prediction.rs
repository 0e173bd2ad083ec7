//! Per-class probabilities as reported by the pose classification model

use serde::Deserialize;

/// One entry of a classification result (model class order)
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ClassPrediction {
    #[serde(rename = "className")]
    pub class_name: String,
    pub probability: f64,
}

impl ClassPrediction {
    pub fn new(class_name: impl Into<String>, probability: f64) -> Self {
        Self {
            class_name: class_name.into(),
            probability,
        }
    }
}

/// Two-decimal text the way the page labels show a probability.
///
/// Follows JS `Number.prototype.toFixed(2)`: the exact binary value is
/// rounded, so 0.975 (stored as 0.97499..) gives "0.97", and an exact
/// tie such as 0.625 goes to the larger magnitude, "0.63".
pub fn to_fixed_hundredths(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0.00".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    // Wide enough to hold the exact expansion of any double near a tie
    let exact = format!("{:.80}", magnitude);
    let is_tie = exact
        .split_once('.')
        .map(|(_, frac)| frac.as_bytes()[2] == b'5' && frac.bytes().skip(3).all(|b| b == b'0'))
        .unwrap_or(false);

    if is_tie {
        // A tie is a multiple of 1/200, so scaling by 100 is exact
        let cents = (magnitude * 100.0).ceil() as u64;
        format!("{}{}.{:02}", sign, cents / 100, cents % 100)
    } else {
        format!("{}{:.2}", sign, magnitude)
    }
}

/// Probability rounded as its label shows it
pub fn round_to_hundredths(value: f64) -> f64 {
    to_fixed_hundredths(value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_matches_displayed_value() {
        assert_eq!(round_to_hundredths(0.979), 0.98);
        assert_eq!(round_to_hundredths(0.975), 0.97);
        assert_eq!(round_to_hundredths(0.9750001), 0.98);
        assert_eq!(round_to_hundredths(1.0), 1.0);
        assert_eq!(round_to_hundredths(0.0), 0.0);
    }

    #[test]
    fn test_exact_ties_round_up() {
        assert_eq!(to_fixed_hundredths(0.625), "0.63");
        assert_eq!(to_fixed_hundredths(0.125), "0.13");
        assert_eq!(to_fixed_hundredths(0.875), "0.88");
        assert_eq!(to_fixed_hundredths(0.375), "0.38");
        assert_eq!(round_to_hundredths(0.625), 0.63);
    }

    #[test]
    fn test_to_fixed_matches_page_text() {
        assert_eq!(to_fixed_hundredths(0.975), "0.97");
        assert_eq!(to_fixed_hundredths(0.256), "0.26");
        assert_eq!(to_fixed_hundredths(1.0), "1.00");
        assert_eq!(to_fixed_hundredths(-0.0), "0.00");
        assert_eq!(to_fixed_hundredths(-0.625), "-0.63");
        assert_eq!(to_fixed_hundredths(99.5), "99.50");
        assert_eq!(to_fixed_hundredths(62.5), "62.50");
    }

    #[test]
    fn test_deserialize_library_shape() {
        let json = r#"[{"className":"walking","probability":0.25},{"className":"fighting","probability":0.75}]"#;
        let parsed: Vec<ClassPrediction> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[1], ClassPrediction::new("fighting", 0.75));
    }
}
