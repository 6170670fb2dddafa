//! Lexical behavioral features extracted from an email body and the sender's role.

mod extractor;
mod text;

pub use extractor::{Extraction, FeatureExtractor};
pub use text::{normalize, words};

use serde::{Deserialize, Serialize};

/// Column order the anomaly model is trained on. Model rows are only ever built
/// through [`FeatureVector::to_row`], which follows this order.
pub const FEATURE_COLUMNS: [&str; FEATURE_DIM] = ["urgency_score", "financial_intent", "role_mismatch"];

pub const FEATURE_DIM: usize = 3;

/// One email as received for scoring, or one training row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSample {
    #[serde(rename = "email_body")]
    pub body: String,
    pub sender_role: String,
}

impl EmailSample {
    pub fn new(body: impl Into<String>, sender_role: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            sender_role: sender_role.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Urgency hits per word (>= 0)
    pub urgency_score: f64,
    /// Share of words with a financial stem, [0, 1]
    pub financial_intent: f64,
    /// 1 when a known non-Finance role uses financial vocabulary
    pub role_mismatch: u8,
}

impl FeatureVector {
    /// Model input row in [`FEATURE_COLUMNS`] order.
    pub fn to_row(&self) -> [f64; FEATURE_DIM] {
        [
            self.urgency_score,
            self.financial_intent,
            f64::from(self.role_mismatch),
        ]
    }

    pub fn has_role_mismatch(&self) -> bool {
        self.role_mismatch == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_follows_column_layout() {
        let fv = FeatureVector {
            urgency_score: 0.5,
            financial_intent: 0.25,
            role_mismatch: 1,
        };
        let row = fv.to_row();
        assert_eq!(FEATURE_COLUMNS[0], "urgency_score");
        assert_eq!(row[0], 0.5);
        assert_eq!(FEATURE_COLUMNS[1], "financial_intent");
        assert_eq!(row[1], 0.25);
        assert_eq!(FEATURE_COLUMNS[2], "role_mismatch");
        assert_eq!(row[2], 1.0);
    }

    #[test]
    fn sample_uses_wire_field_names() {
        let s: EmailSample =
            serde_json::from_str(r#"{"email_body":"hi team","sender_role":"HR"}"#).unwrap();
        assert_eq!(s, EmailSample::new("hi team", "HR"));
    }
}
