use crate::error::TypeError;
use serde::{Deserialize, Serialize};

/// Column names of a production log row, in file order.
pub const FEATURE_NAMES: [&str; 10] = [
    "CreditScore",
    "Age",
    "Tenure",
    "Balance",
    "NumOfProducts",
    "HasCrCard",
    "IsActiveMember",
    "EstimatedSalary",
    "Geography_Germany",
    "Geography_Spain",
];

/// Label column carried by the reference dataset only.
pub const LABEL_COLUMN: &str = "Exited";

const INDICATOR_FEATURES: [&str; 4] = [
    "HasCrCard",
    "IsActiveMember",
    "Geography_Germany",
    "Geography_Spain",
];

/// One customer's attributes at inference time.
///
/// Field order matches [`FEATURE_NAMES`]; the serialized names are the
/// column names used by the reference and production files.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct FeatureRow {
    #[serde(rename = "CreditScore")]
    pub credit_score: f64,

    #[serde(rename = "Age")]
    pub age: f64,

    #[serde(rename = "Tenure")]
    pub tenure: f64,

    #[serde(rename = "Balance")]
    pub balance: f64,

    #[serde(rename = "NumOfProducts")]
    pub num_of_products: f64,

    #[serde(rename = "HasCrCard")]
    pub has_cr_card: f64,

    #[serde(rename = "IsActiveMember")]
    pub is_active_member: f64,

    #[serde(rename = "EstimatedSalary")]
    pub estimated_salary: f64,

    #[serde(rename = "Geography_Germany")]
    pub geography_germany: f64,

    #[serde(rename = "Geography_Spain")]
    pub geography_spain: f64,
}

impl FeatureRow {
    /// Values in schema order
    pub fn values(&self) -> [f64; 10] {
        [
            self.credit_score,
            self.age,
            self.tenure,
            self.balance,
            self.num_of_products,
            self.has_cr_card,
            self.is_active_member,
            self.estimated_salary,
            self.geography_germany,
            self.geography_spain,
        ]
    }

    /// Build a row from values given in schema order
    pub fn from_values(values: &[f64]) -> Result<Self, TypeError> {
        if values.len() != FEATURE_NAMES.len() {
            return Err(TypeError::FeatureCountError {
                expected: FEATURE_NAMES.len(),
                actual: values.len(),
            });
        }

        Ok(Self {
            credit_score: values[0],
            age: values[1],
            tenure: values[2],
            balance: values[3],
            num_of_products: values[4],
            has_cr_card: values[5],
            is_active_member: values[6],
            estimated_salary: values[7],
            geography_germany: values[8],
            geography_spain: values[9],
        })
    }

    /// (name, value) pairs in schema order
    pub fn named_values(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.values())
    }

    /// Reject rows that would poison the production log or the classifier.
    ///
    /// All values must be finite, indicator columns must be 0 or 1 and at most
    /// one geography flag may be set (France is encoded as both flags at 0).
    pub fn validate(&self) -> Result<(), TypeError> {
        for (feature, value) in self.named_values() {
            if !value.is_finite() {
                return Err(TypeError::InvalidFeatureValue {
                    feature: feature.to_string(),
                    value,
                });
            }

            if INDICATOR_FEATURES.contains(&feature) && value != 0.0 && value != 1.0 {
                return Err(TypeError::InvalidIndicator {
                    feature: feature.to_string(),
                    value,
                });
            }
        }

        if self.geography_germany == 1.0 && self.geography_spain == 1.0 {
            return Err(TypeError::ConflictingGeography);
        }

        Ok(())
    }
}
