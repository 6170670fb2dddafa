//! Outbound verdict shape: floats rounded to four decimals, role mismatch as 0/1.

use super::engine::{RiskLevel, RiskVerdict};
use serde::{Deserialize, Serialize};

const REPORT_DECIMALS: i32 = 4;

/// Half-way values go to the even neighbour: 0.03125 -> 0.0312.
fn round_dp(value: f64) -> f64 {
    let scale = 10f64.powi(REPORT_DECIMALS);
    (value * scale).round_ties_even() / scale
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureReport {
    pub urgency_score: f64,
    pub financial_intent: f64,
    pub role_mismatch: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictReport {
    pub risk_level: RiskLevel,
    pub anomaly_flag: u8,
    pub anomaly_score: f64,
    pub features: FeatureReport,
    pub reasons: Vec<String>,
}

impl RiskVerdict {
    pub fn to_report(&self) -> VerdictReport {
        VerdictReport {
            risk_level: self.risk_level,
            anomaly_flag: self.anomaly_flag,
            anomaly_score: round_dp(self.anomaly_score),
            features: FeatureReport {
                urgency_score: round_dp(self.features.urgency_score),
                financial_intent: round_dp(self.features.financial_intent),
                role_mismatch: self.features.role_mismatch,
            },
            reasons: self.reasons.clone(),
        }
    }
}
