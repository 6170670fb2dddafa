//! Training mode: labeled rows → features → fitted forest → per-row verdicts and a report.

use super::dataset::LabeledSample;
use crate::config::ForestConfig;
use crate::error::{GuardError, Result};
use crate::features::{FeatureExtractor, FeatureVector};
use crate::model::{AnomalyModel, ModelBundle};
use crate::risk::{RiskEngine, RiskLevel, RiskVerdict};
use serde::{Deserialize, Serialize};
use std::thread::JoinHandle;

/// Anomaly flag against ground truth. Unlabeled rows are counted separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crosstab {
    pub flagged_bec: usize,
    pub flagged_legit: usize,
    pub passed_bec: usize,
    pub passed_legit: usize,
    pub unlabeled: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub samples: usize,
    pub anomaly_vs_label: Crosstab,
    pub tiers: TierCounts,
}

impl TrainingReport {
    fn record(&mut self, verdict: &RiskVerdict, is_bec: Option<bool>) {
        self.samples += 1;
        let flagged = verdict.anomaly_flag == 1;
        let ct = &mut self.anomaly_vs_label;
        match (flagged, is_bec) {
            (_, None) => ct.unlabeled += 1,
            (true, Some(true)) => ct.flagged_bec += 1,
            (true, Some(false)) => ct.flagged_legit += 1,
            (false, Some(true)) => ct.passed_bec += 1,
            (false, Some(false)) => ct.passed_legit += 1,
        }
        match verdict.risk_level {
            RiskLevel::Low => self.tiers.low += 1,
            RiskLevel::Medium => self.tiers.medium += 1,
            RiskLevel::High => self.tiers.high += 1,
        }
    }
}

impl std::fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ct = &self.anomaly_vs_label;
        writeln!(f, "samples: {}", self.samples)?;
        writeln!(f, "{:>14} {:>8} {:>8}", "anomaly_flag", "is_bec=0", "is_bec=1")?;
        writeln!(f, "{:>14} {:>8} {:>8}", 0, ct.passed_legit, ct.passed_bec)?;
        writeln!(f, "{:>14} {:>8} {:>8}", 1, ct.flagged_legit, ct.flagged_bec)?;
        if ct.unlabeled > 0 {
            writeln!(f, "unlabeled: {}", ct.unlabeled)?;
        }
        write!(
            f,
            "risk tiers: LOW={} MEDIUM={} HIGH={}",
            self.tiers.low, self.tiers.medium, self.tiers.high
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    pub verdict: RiskVerdict,
    pub is_bec: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub bundle: ModelBundle,
    pub model: AnomalyModel,
    pub report: TrainingReport,
    pub rows: Vec<ScoredRow>,
}

#[derive(Debug, Clone)]
pub struct Trainer {
    extractor: FeatureExtractor,
    forest: ForestConfig,
    engine: RiskEngine,
}

impl Trainer {
    pub fn new(extractor: FeatureExtractor, forest: ForestConfig) -> Self {
        Self {
            extractor,
            forest,
            engine: RiskEngine::new(),
        }
    }

    pub fn train(&self, rows: &[LabeledSample]) -> Result<TrainingOutcome> {
        if rows.is_empty() {
            return Err(GuardError::EmptyTrainingSet);
        }

        let features: Vec<FeatureVector> = rows
            .iter()
            .map(|r| self.extractor.extract(&r.sample))
            .collect();

        let mut model = AnomalyModel::unfitted();
        model.fit(&features, &self.forest)?;
        let scores = model.score_batch(&features)?;

        let mut report = TrainingReport::default();
        let scored: Vec<ScoredRow> = features
            .into_iter()
            .zip(scores)
            .zip(rows)
            .map(|((fv, score), row)| {
                let verdict = self.engine.assess(fv, score);
                report.record(&verdict, row.is_bec);
                ScoredRow {
                    verdict,
                    is_bec: row.is_bec,
                }
            })
            .collect();

        let ct = report.anomaly_vs_label;
        tracing::info!(
            samples = report.samples,
            flagged_bec = ct.flagged_bec,
            flagged_legit = ct.flagged_legit,
            passed_bec = ct.passed_bec,
            passed_legit = ct.passed_legit,
            high = report.tiers.high,
            medium = report.tiers.medium,
            low = report.tiers.low,
            "training report"
        );

        let bundle = ModelBundle::from_model(&model, self.extractor.lexicon(), rows.len())?;
        Ok(TrainingOutcome {
            bundle,
            model,
            report,
            rows: scored,
        })
    }
}

/// Fit on a worker thread so concurrent scoring is not blocked.
pub fn spawn_training(trainer: Trainer, rows: Vec<LabeledSample>) -> JoinHandle<Result<TrainingOutcome>> {
    std::thread::spawn(move || trainer.train(&rows))
}
