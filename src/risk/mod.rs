//! Rule-based risk classification over features and the anomaly flag.

mod engine;
mod report;

pub use engine::{
    assign_risk_level, RiskEngine, RiskLevel, RiskVerdict, REASON_ANOMALY, REASON_CLEAN,
    REASON_ROLE_MISMATCH, REASON_URGENCY, URGENCY_THRESHOLD,
};
pub use report::{FeatureReport, VerdictReport};
