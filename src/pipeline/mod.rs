//! Orchestration: inference (one email → verdict) and training (labeled rows → bundle).
//!
//! Both modes share one [`FeatureExtractor`], so features seen at fit time are
//! exactly the features seen when serving.

pub mod dataset;
mod training;

pub use dataset::{load_csv, read_csv, LabeledSample};
pub use training::{spawn_training, Crosstab, ScoredRow, TierCounts, Trainer, TrainingOutcome, TrainingReport};

use crate::error::Result;
use crate::features::{EmailSample, FeatureExtractor};
use crate::lexicon::Lexicon;
use crate::model::{AnomalyModel, ModelBundle};
use crate::risk::{RiskEngine, RiskVerdict};
use std::path::Path;
use std::sync::Arc;

/// Read-only after construction; share behind an `Arc` across request threads.
#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    extractor: FeatureExtractor,
    model: AnomalyModel,
    engine: RiskEngine,
}

impl ScoringPipeline {
    pub fn new(lexicon: Arc<Lexicon>, model: AnomalyModel) -> Self {
        Self {
            extractor: FeatureExtractor::new(lexicon),
            model,
            engine: RiskEngine::new(),
        }
    }

    /// Validate a bundle against `lexicon` and serve it.
    pub fn from_bundle(lexicon: Arc<Lexicon>, bundle: ModelBundle) -> Result<Self> {
        let model = bundle.into_model(&lexicon)?;
        Ok(Self::new(lexicon, model))
    }

    pub fn load(lexicon: Arc<Lexicon>, model_path: &Path) -> Result<Self> {
        Self::from_bundle(lexicon, ModelBundle::load(model_path)?)
    }

    pub fn score(&self, sample: &EmailSample) -> Result<RiskVerdict> {
        let extraction = self.extractor.inspect(sample);
        let anomaly = self.model.score(&extraction.features)?;
        let verdict = self.engine.assess(extraction.features, anomaly);
        tracing::debug!(
            sender_role = %sample.sender_role,
            urgency_score = verdict.features.urgency_score,
            financial_intent = verdict.features.financial_intent,
            role_mismatch = verdict.features.role_mismatch,
            anomaly_score = verdict.anomaly_score,
            risk_level = %verdict.risk_level,
            notes = ?extraction.notes,
            "email scored"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForestConfig;
    use crate::error::GuardError;
    use crate::risk::{RiskLevel, REASON_CLEAN};

    fn rows() -> Vec<LabeledSample> {
        let bodies = [
            ("Please find the meeting notes from this morning attached, let me know if anything is missing", "Manager"),
            ("The deploy to staging finished without errors and the smoke tests all passed this afternoon", "Engineer"),
            ("Welcome aboard, your onboarding schedule for the first week is in the shared calendar invite", "HR"),
            ("Monthly invoice totals are reconciled and the account ledger is ready for the auditors to review", "Finance"),
        ];
        (0..10)
            .flat_map(|_| bodies.iter())
            .map(|(b, r)| LabeledSample::new(EmailSample::new(*b, *r), Some(false)))
            .collect()
    }

    fn pipeline() -> ScoringPipeline {
        let lexicon = Arc::new(Lexicon::new());
        let trainer = Trainer::new(FeatureExtractor::new(lexicon.clone()), ForestConfig::default());
        let outcome = trainer.train(&rows()).unwrap();
        ScoringPipeline::new(lexicon, outcome.model)
    }

    #[test]
    fn unfitted_pipeline_fails_loudly() {
        let p = ScoringPipeline::new(Arc::new(Lexicon::new()), AnomalyModel::unfitted());
        let err = p.score(&EmailSample::new("hello", "HR")).unwrap_err();
        assert!(matches!(err, GuardError::ModelNotFitted));
    }

    #[test]
    fn financial_request_from_hr_is_high() {
        let v = pipeline()
            .score(&EmailSample::new("Please transfer funds urgently", "HR"))
            .unwrap();
        assert_eq!(v.risk_level, RiskLevel::High);
        assert_eq!(v.features.role_mismatch, 1);
        assert!(v.features.financial_intent > 0.0);
        assert_eq!(v.reasons.len(), 1);
    }

    #[test]
    fn short_reminder_is_at_least_medium() {
        let v = pipeline()
            .score(&EmailSample::new("Reminder: team meeting today", "Manager"))
            .unwrap();
        assert!(v.features.urgency_score > 0.1);
        assert_eq!(v.features.financial_intent, 0.0);
        assert_eq!(v.features.role_mismatch, 0);
        assert!(v.risk_level >= RiskLevel::Medium);
        assert_ne!(v.risk_level, RiskLevel::High);
    }

    #[test]
    fn empty_finance_email_has_zero_features() {
        let v = pipeline().score(&EmailSample::new("", "Finance")).unwrap();
        assert_eq!(v.features.urgency_score, 0.0);
        assert_eq!(v.features.financial_intent, 0.0);
        assert_eq!(v.features.role_mismatch, 0);
        // all-zero vectors dominate the training set, so the forest treats them as normal
        assert_eq!(v.anomaly_flag, 0);
        assert_eq!(v.risk_level, RiskLevel::Low);
        assert_eq!(v.reasons, vec![REASON_CLEAN]);
    }

    #[test]
    fn pipeline_is_shareable_across_threads() {
        let p = Arc::new(pipeline());
        let expected = p.score(&EmailSample::new("Wire the payment now", "Engineer")).unwrap();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let p = Arc::clone(&p);
                std::thread::spawn(move || p.score(&EmailSample::new("Wire the payment now", "Engineer")).unwrap())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    }
}
