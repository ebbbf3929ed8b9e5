use cardiorisk_core::{raw_score, score, FeatureRecord, RiskLevel};
use proptest::prelude::*;

fn feature_record() -> impl Strategy<Value = FeatureRecord> {
    (
        (-20.0f64..140.0, 30.0f64..200.0, 120.0f64..210.0, 12.0f64..60.0),
        (1u8..=2, 0u8..=2, 0u8..=2),
        (60.0f64..240.0, 40.0f64..140.0),
        (0u8..=1, 0u8..=1, 0u8..=1),
    )
        .prop_map(
            |(
                (age_years, weight, height, bmi),
                (gender, cholesterol, gluc),
                (ap_hi, ap_lo),
                (smoke, alco, active),
            )| FeatureRecord {
                age_years,
                weight,
                height,
                bmi,
                gender: f64::from(gender),
                cholesterol: f64::from(cholesterol),
                gluc: f64::from(gluc),
                ap_hi,
                ap_lo,
                smoke: f64::from(smoke),
                alco: f64::from(alco),
                active: f64::from(active),
            },
        )
}

proptest! {
    #[test]
    fn repeated_scoring_is_bit_identical(features in feature_record()) {
        let first = score(&features);
        let second = score(&features);
        prop_assert_eq!(first.raw_score.to_bits(), second.raw_score.to_bits());
        prop_assert_eq!(
            first.probability_positive.to_bits(),
            second.probability_positive.to_bits()
        );
        prop_assert_eq!(first.prediction, second.prediction);
        prop_assert_eq!(first.risk_level, second.risk_level);
    }

    #[test]
    fn probabilities_complement(features in feature_record()) {
        let result = score(&features);
        let total = result.probability_negative + result.probability_positive;
        prop_assert!((total - 1.0).abs() <= f64::EPSILON, "sum was {}", total);
        prop_assert!((0.0..=1.0).contains(&result.probability_positive));
    }

    #[test]
    fn prediction_tracks_even_odds(features in feature_record()) {
        let result = score(&features);
        prop_assert_eq!(result.prediction == 1, result.probability_positive >= 0.5);
    }

    #[test]
    fn risk_level_partitions_unit_interval(p in 0.0f64..=1.0) {
        let expected = if p < 0.40 {
            RiskLevel::Low
        } else if p <= 0.70 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        };
        prop_assert_eq!(RiskLevel::from_probability(p), expected);
    }

    #[test]
    fn older_is_never_lower_risk(features in feature_record(), extra_years in 0.0f64..60.0) {
        let older = FeatureRecord {
            age_years: features.age_years + extra_years,
            ..features
        };
        prop_assert!(raw_score(&older) >= raw_score(&features));
        prop_assert!(score(&older).probability_positive >= score(&features).probability_positive);
    }

    #[test]
    fn extreme_ages_stay_finite(age_years in -1.0e6f64..1.0e6) {
        let features = FeatureRecord {
            age_years,
            weight: 70.0,
            height: 170.0,
            bmi: 24.0,
            gender: 1.0,
            cholesterol: 0.0,
            gluc: 0.0,
            ap_hi: 115.0,
            ap_lo: 75.0,
            smoke: 0.0,
            alco: 0.0,
            active: 1.0,
        };
        let result = score(&features);
        prop_assert!(result.probability_positive.is_finite());
        prop_assert!(result.probability_negative.is_finite());
    }
}
