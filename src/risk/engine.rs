//! Combines lexical features with the anomaly flag; produces a risk tier and reasons.
//!
//! Priority cascade, not a weighted score: a role mismatch with financial intent is HIGH
//! no matter what the anomaly model says.

use crate::features::FeatureVector;
use crate::model::AnomalyScore;
use serde::{Deserialize, Serialize};

/// Urgency above this adds a MEDIUM reason.
pub const URGENCY_THRESHOLD: f64 = 0.1;

pub const REASON_ROLE_MISMATCH: &str =
    "Financial request from a role that normally does not handle payments";
pub const REASON_ANOMALY: &str = "Email behavior deviates from normal internal patterns";
pub const REASON_URGENCY: &str = "Unusual urgency detected in the email";
pub const REASON_CLEAN: &str = "No suspicious behavioral patterns detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier and reasons for one email, given its features and anomaly flag.
pub fn assign_risk_level(features: &FeatureVector, anomaly_flag: u8) -> (RiskLevel, Vec<String>) {
    if features.has_role_mismatch() && features.financial_intent > 0.0 {
        return (RiskLevel::High, vec![REASON_ROLE_MISMATCH.to_string()]);
    }

    let mut reasons = Vec::new();
    if anomaly_flag == 1 {
        reasons.push(REASON_ANOMALY.to_string());
    }
    if features.urgency_score > URGENCY_THRESHOLD {
        reasons.push(REASON_URGENCY.to_string());
    }
    if !reasons.is_empty() {
        return (RiskLevel::Medium, reasons);
    }

    (RiskLevel::Low, vec![REASON_CLEAN.to_string()])
}

/// Risk result for a single email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub risk_level: RiskLevel,
    pub anomaly_flag: u8,
    pub anomaly_score: f64,
    pub features: FeatureVector,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskEngine;

impl RiskEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn assess(&self, features: FeatureVector, anomaly: AnomalyScore) -> RiskVerdict {
        let (risk_level, reasons) = assign_risk_level(&features, anomaly.flag);
        RiskVerdict {
            risk_level,
            anomaly_flag: anomaly.flag,
            anomaly_score: anomaly.score,
            features,
            reasons,
        }
    }
}
