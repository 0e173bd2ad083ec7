//! Suspicious activity rule
//!
//! Classes before `first_index` are the benign poses the model was trained
//! with. Any later class whose probability, rounded to two decimals, reaches
//! the threshold makes the frame suspicious.

use std::fmt;

use super::prediction::{round_to_hundredths, ClassPrediction};

/// Default first class index eligible for the rule
pub const SUSPICIOUS_FROM_INDEX: usize = 3;

/// Default probability threshold (compared after rounding)
pub const PROBABILITY_THRESHOLD: f64 = 0.98;

/// A class that crossed the threshold this frame
#[derive(Clone, Debug, PartialEq)]
pub struct SuspiciousEntry {
    pub class_name: String,
    pub probability: f64,
}

/// Outcome for one frame. Empty `suspicious` means normal activity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActivityVerdict {
    /// Qualifying classes, most likely first
    pub suspicious: Vec<SuspiciousEntry>,
}

impl ActivityVerdict {
    pub fn is_suspicious(&self) -> bool {
        !self.suspicious.is_empty()
    }

    pub fn most_likely(&self) -> Option<&SuspiciousEntry> {
        self.suspicious.first()
    }
}

/// Rejected classifier input
#[derive(Clone, Debug, PartialEq)]
pub enum ClassifyError {
    ClassCountMismatch { expected: usize, actual: usize },
    ProbabilityOutOfRange { index: usize, value: f64 },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::ClassCountMismatch { expected, actual } => write!(
                f,
                "invalid input: expected {} class probabilities, got {}",
                expected, actual
            ),
            ClassifyError::ProbabilityOutOfRange { index, value } => write!(
                f,
                "invalid input: probability {} for class {} is outside [0, 1]",
                value, index
            ),
        }
    }
}

impl std::error::Error for ClassifyError {}

/// Stateless rule; `classify` is a pure function of its input
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityClassifier {
    first_index: usize,
    threshold: f64,
    expected_classes: Option<usize>,
}

impl ActivityClassifier {
    pub fn new(first_index: usize, threshold: f64) -> Self {
        Self {
            first_index,
            threshold,
            expected_classes: None,
        }
    }

    /// Require every result to carry exactly `count` classes
    pub fn with_expected_classes(mut self, count: usize) -> Self {
        self.expected_classes = Some(count);
        self
    }

    /// Decide whether the frame shows suspicious activity.
    ///
    /// The whole input is validated before any entry is looked at, so a
    /// malformed result never yields a partial verdict.
    pub fn classify(&self, predictions: &[ClassPrediction]) -> Result<ActivityVerdict, ClassifyError> {
        if let Some(expected) = self.expected_classes {
            if predictions.len() != expected {
                return Err(ClassifyError::ClassCountMismatch {
                    expected,
                    actual: predictions.len(),
                });
            }
        }

        for (index, prediction) in predictions.iter().enumerate() {
            let p = prediction.probability;
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(ClassifyError::ProbabilityOutOfRange { index, value: p });
            }
        }

        let mut suspicious: Vec<SuspiciousEntry> = predictions
            .iter()
            .skip(self.first_index)
            .filter(|prediction| round_to_hundredths(prediction.probability) >= self.threshold)
            .map(|prediction| SuspiciousEntry {
                class_name: prediction.class_name.clone(),
                probability: prediction.probability,
            })
            .collect();

        // Stable: ties keep model class order
        suspicious.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        Ok(ActivityVerdict { suspicious })
    }
}

impl Default for ActivityClassifier {
    fn default() -> Self {
        Self::new(SUSPICIOUS_FROM_INDEX, PROBABILITY_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictions(scores: &[f64]) -> Vec<ClassPrediction> {
        scores
            .iter()
            .enumerate()
            .map(|(i, p)| ClassPrediction::new(format!("c{}", i), *p))
            .collect()
    }

    fn names(verdict: &ActivityVerdict) -> Vec<&str> {
        verdict.suspicious.iter().map(|e| e.class_name.as_str()).collect()
    }

    #[test]
    fn test_leading_classes_never_count() {
        let verdict = ActivityClassifier::default()
            .classify(&predictions(&[1.0, 1.0, 1.0, 0.1, 0.2]))
            .unwrap();
        assert!(!verdict.is_suspicious());
    }

    #[test]
    fn test_single_qualifying_class() {
        let verdict = ActivityClassifier::default()
            .classify(&predictions(&[0.99, 0.99, 0.99, 0.99, 0.50]))
            .unwrap();
        assert_eq!(
            verdict.suspicious,
            vec![SuspiciousEntry { class_name: "c3".into(), probability: 0.99 }]
        );
    }

    #[test]
    fn test_most_likely_first() {
        let verdict = ActivityClassifier::default()
            .classify(&predictions(&[0.0, 0.0, 0.0, 0.98, 0.995]))
            .unwrap();
        assert_eq!(names(&verdict), vec!["c4", "c3"]);
        assert_eq!(verdict.most_likely().unwrap().probability, 0.995);
    }

    #[test]
    fn test_all_below_threshold_is_normal() {
        let verdict = ActivityClassifier::default()
            .classify(&predictions(&[0.9, 0.9, 0.9, 0.97, 0.5, 0.1]))
            .unwrap();
        assert_eq!(verdict, ActivityVerdict::default());
    }

    #[test]
    fn test_threshold_applies_to_rounded_value() {
        let classifier = ActivityClassifier::default();
        // 0.976 shows as 0.98 and qualifies, 0.975 shows as 0.97
        let verdict = classifier.classify(&predictions(&[0.0, 0.0, 0.0, 0.976])).unwrap();
        assert_eq!(names(&verdict), vec!["c3"]);
        assert_eq!(verdict.suspicious[0].probability, 0.976);

        let verdict = classifier.classify(&predictions(&[0.0, 0.0, 0.0, 0.975])).unwrap();
        assert!(!verdict.is_suspicious());
    }

    #[test]
    fn test_sorted_non_increasing_and_above_threshold() {
        let scores = [0.2, 0.99, 0.1, 0.981, 1.0, 0.3, 0.99, 0.985, 0.97];
        let verdict = ActivityClassifier::default().classify(&predictions(&scores)).unwrap();
        assert_eq!(names(&verdict), vec!["c4", "c6", "c7", "c3"]);
        for pair in verdict.suspicious.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
        for entry in &verdict.suspicious {
            assert!(round_to_hundredths(entry.probability) >= PROBABILITY_THRESHOLD);
        }
    }

    #[test]
    fn test_ties_keep_class_order() {
        let verdict = ActivityClassifier::default()
            .classify(&predictions(&[0.0, 0.0, 0.0, 0.99, 0.99, 0.99]))
            .unwrap();
        assert_eq!(names(&verdict), vec!["c3", "c4", "c5"]);
    }

    #[test]
    fn test_classify_is_idempotent() {
        let classifier = ActivityClassifier::default();
        let input = predictions(&[0.1, 0.2, 0.3, 0.99, 0.985]);
        assert_eq!(classifier.classify(&input), classifier.classify(&input));
    }

    #[test]
    fn test_configurable_first_index() {
        let classifier = ActivityClassifier::new(1, PROBABILITY_THRESHOLD);
        let verdict = classifier.classify(&predictions(&[0.99, 0.99, 0.0])).unwrap();
        assert_eq!(names(&verdict), vec!["c1"]);
    }

    #[test]
    fn test_custom_threshold_on_exact_tie() {
        // 0.625 shows as 0.63 on the page, so it meets a 0.63 threshold
        let verdict = ActivityClassifier::new(0, 0.63)
            .classify(&predictions(&[0.625]))
            .unwrap();
        assert_eq!(names(&verdict), vec!["c0"]);

        let verdict = ActivityClassifier::new(0, 0.13)
            .classify(&predictions(&[0.125, 0.12]))
            .unwrap();
        assert_eq!(names(&verdict), vec!["c0"]);
    }

    #[test]
    fn test_short_input_has_nothing_eligible() {
        let verdict = ActivityClassifier::default()
            .classify(&predictions(&[1.0, 1.0]))
            .unwrap();
        assert!(!verdict.is_suspicious());
    }

    #[test]
    fn test_rejects_wrong_class_count() {
        let classifier = ActivityClassifier::default().with_expected_classes(5);
        let err = classifier.classify(&predictions(&[0.0, 0.0, 0.0, 1.0])).unwrap_err();
        assert_eq!(err, ClassifyError::ClassCountMismatch { expected: 5, actual: 4 });
        assert!(err.to_string().starts_with("invalid input"));
    }

    #[test]
    fn test_rejects_out_of_range_probability() {
        let classifier = ActivityClassifier::default();
        let err = classifier.classify(&predictions(&[0.0, 1.5, 0.0, 0.0])).unwrap_err();
        assert_eq!(err, ClassifyError::ProbabilityOutOfRange { index: 1, value: 1.5 });

        let err = classifier.classify(&predictions(&[0.0, 0.0, 0.0, f64::NAN])).unwrap_err();
        assert!(matches!(err, ClassifyError::ProbabilityOutOfRange { index: 3, .. }));
    }
}
