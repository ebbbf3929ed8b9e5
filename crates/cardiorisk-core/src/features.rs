use serde::{Deserialize, Serialize};

/// One patient's measurements, as supplied by the caller.
///
/// Every field is required and carried as `f64` so out-of-range values flow
/// into the score instead of being rejected. `gender` and `height` are accepted
/// but take no part in scoring; `height` only matters to callers deriving `bmi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub age_years: f64,
    /// Kilograms.
    pub weight: f64,
    /// Centimeters.
    pub height: f64,
    /// Kilograms per square meter, precomputed by the caller.
    pub bmi: f64,
    /// 1 = female, 2 = male.
    pub gender: f64,
    /// 0 = normal, 1 = above normal, 2 = well above normal.
    pub cholesterol: f64,
    /// Same ordinal scale as `cholesterol`.
    pub gluc: f64,
    /// Systolic blood pressure, mmHg.
    pub ap_hi: f64,
    /// Diastolic blood pressure, mmHg.
    pub ap_lo: f64,
    pub smoke: f64,
    pub alco: f64,
    pub active: f64,
}

impl FeatureRecord {
    /// Plausibility checks for logging. Scoring never consults these.
    pub fn range_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !(18.0..=100.0).contains(&self.age_years) {
            warnings.push(format!("age_years {} out of range [18, 100]", self.age_years));
        }

        for (name, value) in [
            ("weight", self.weight),
            ("height", self.height),
            ("bmi", self.bmi),
            ("ap_hi", self.ap_hi),
            ("ap_lo", self.ap_lo),
        ] {
            if value.is_nan() || value <= 0.0 {
                warnings.push(format!("{name} {value} must be positive"));
            }
        }

        if self.gender != 1.0 && self.gender != 2.0 {
            warnings.push(format!("gender {} must be 1 or 2", self.gender));
        }

        for (name, value) in [("cholesterol", self.cholesterol), ("gluc", self.gluc)] {
            if !is_one_of(value, &[0.0, 1.0, 2.0]) {
                warnings.push(format!("{name} {value} must be 0, 1 or 2"));
            }
        }

        for (name, value) in [
            ("smoke", self.smoke),
            ("alco", self.alco),
            ("active", self.active),
        ] {
            if !is_one_of(value, &[0.0, 1.0]) {
                warnings.push(format!("{name} {value} must be 0 or 1"));
            }
        }

        warnings
    }
}

/// Body mass index from kilograms and centimeters.
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

fn is_one_of(value: f64, allowed: &[f64]) -> bool {
    allowed.iter().any(|candidate| *candidate == value)
}
