use serde::{Deserialize, Serialize};

use crate::features::FeatureRecord;

const INTERCEPT: f64 = -2.5;

const AGE_PIVOT_YEARS: f64 = 40.0;
const AGE_SPAN_YEARS: f64 = 20.0;
const AGE_WEIGHT: f64 = 2.2;

const CHOLESTEROL_WEIGHT: f64 = 0.5;
const GLUCOSE_WEIGHT: f64 = 0.3;

const SMOKER_WEIGHT: f64 = 0.4;
const ALCOHOL_WEIGHT: f64 = 0.2;
const INACTIVE_WEIGHT: f64 = 0.3;

const POSITIVE_THRESHOLD: f64 = 0.5;
const MEDIUM_FROM: f64 = 0.40;
const MEDIUM_UNTIL: f64 = 0.70;

/// A lower bound and the weight it contributes once reached.
#[derive(Debug, Clone, Copy)]
struct Band {
    at_least: f64,
    weight: f64,
}

// Band tables are ordered high to low; only the first band reached counts.
const SYSTOLIC_BANDS: [Band; 3] = [
    Band { at_least: 140.0, weight: 1.4 },
    Band { at_least: 130.0, weight: 0.8 },
    Band { at_least: 120.0, weight: 0.3 },
];

const BMI_BANDS: [Band; 2] = [
    Band { at_least: 30.0, weight: 1.0 },
    Band { at_least: 25.0, weight: 0.5 },
];

const DIASTOLIC_BANDS: [Band; 2] = [
    Band { at_least: 90.0, weight: 0.8 },
    Band { at_least: 80.0, weight: 0.3 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Both 0.40 and 0.70 fall in `Medium`.
    pub fn from_probability(probability_positive: f64) -> Self {
        if probability_positive < MEDIUM_FROM {
            RiskLevel::Low
        } else if probability_positive <= MEDIUM_UNTIL {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreResult {
    pub raw_score: f64,
    pub probability_positive: f64,
    pub probability_negative: f64,
    pub prediction: u8,
    pub risk_level: RiskLevel,
}

impl ScoreResult {
    /// Turns a log-odds score into probabilities and labels.
    pub fn from_raw_score(raw_score: f64) -> Self {
        let probability_positive = sigmoid(raw_score);
        let prediction = u8::from(probability_positive >= POSITIVE_THRESHOLD);

        Self {
            raw_score,
            probability_positive,
            probability_negative: 1.0 - probability_positive,
            prediction,
            risk_level: RiskLevel::from_probability(probability_positive),
        }
    }

    /// `[probability_negative, probability_positive]`, the order callers expect on the wire.
    pub fn probability_pair(&self) -> [f64; 2] {
        [self.probability_negative, self.probability_positive]
    }
}

/// Scores one record. Pure and infallible; NaN inputs propagate.
pub fn score(features: &FeatureRecord) -> ScoreResult {
    ScoreResult::from_raw_score(raw_score(features))
}

/// The additive log-odds sum before the sigmoid.
pub fn raw_score(features: &FeatureRecord) -> f64 {
    let mut score = INTERCEPT;

    score += ((features.age_years - AGE_PIVOT_YEARS) / AGE_SPAN_YEARS) * AGE_WEIGHT;
    score += banded(features.ap_hi, &SYSTOLIC_BANDS);
    score += banded(features.bmi, &BMI_BANDS);
    score += banded(features.ap_lo, &DIASTOLIC_BANDS);
    score += features.cholesterol * CHOLESTEROL_WEIGHT;
    score += features.gluc * GLUCOSE_WEIGHT;

    if features.smoke == 1.0 {
        score += SMOKER_WEIGHT;
    }
    if features.alco == 1.0 {
        score += ALCOHOL_WEIGHT;
    }
    if features.active == 0.0 {
        score += INACTIVE_WEIGHT;
    }

    score
}

/// Logistic function, branched on sign so `exp` never sees a large positive argument.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

fn banded(value: f64, bands: &[Band]) -> f64 {
    bands
        .iter()
        .find(|band| value >= band.at_least)
        .map_or(0.0, |band| band.weight)
}
