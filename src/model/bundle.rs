//! Persisted model artifact: fitted forest + everything needed to rebuild identical features.

use super::detector::AnomalyModel;
use super::forest::IsolationForest;
use crate::error::{GuardError, Result};
use crate::features::FEATURE_COLUMNS;
use crate::lexicon::Lexicon;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const BUNDLE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub format_version: u32,
    pub trained_at: DateTime<Utc>,
    pub forest: IsolationForest,
    pub feature_cols: Vec<String>,
    pub fin_stems: Vec<String>,
    pub lexicon_fingerprint: String,
    pub training_samples: usize,
}

impl ModelBundle {
    pub fn from_model(model: &AnomalyModel, lexicon: &Lexicon, training_samples: usize) -> Result<Self> {
        Ok(Self {
            format_version: BUNDLE_FORMAT_VERSION,
            trained_at: Utc::now(),
            forest: model.forest()?.clone(),
            feature_cols: model.feature_cols().iter().map(|c| c.to_string()).collect(),
            fin_stems: lexicon.fin_stems().to_vec(),
            lexicon_fingerprint: lexicon.fingerprint(),
            training_samples,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string(self)?;
        std::fs::write(path, data)?;
        tracing::info!(path = %path.display(), samples = self.training_samples, "model bundle saved");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let bundle: ModelBundle = serde_json::from_str(&data)?;
        tracing::info!(
            path = %path.display(),
            trained_at = %bundle.trained_at,
            trees = bundle.forest.n_estimators(),
            features = bundle.forest.n_features(),
            contamination = bundle.forest.contamination(),
            seed = bundle.forest.seed(),
            "model bundle loaded"
        );
        Ok(bundle)
    }

    /// Check the stored layout and vocabulary against the running lexicon.
    pub fn validate(&self, lexicon: &Lexicon) -> Result<()> {
        if self.format_version != BUNDLE_FORMAT_VERSION {
            return Err(GuardError::InvalidParameter(format!(
                "unsupported bundle format {}",
                self.format_version
            )));
        }
        if self.feature_cols.iter().map(String::as_str).ne(FEATURE_COLUMNS) {
            return Err(GuardError::FeatureOrderMismatch {
                expected: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: self.feature_cols.clone(),
            });
        }
        if self.forest.n_features() != FEATURE_COLUMNS.len() {
            return Err(GuardError::InvalidParameter(format!(
                "forest expects {} features, layout has {}",
                self.forest.n_features(),
                FEATURE_COLUMNS.len()
            )));
        }
        if self.fin_stems != lexicon.fin_stems() {
            return Err(GuardError::LexiconMismatch(format!(
                "financial stems {:?} != {:?}",
                self.fin_stems,
                lexicon.fin_stems()
            )));
        }
        let current = lexicon.fingerprint();
        if self.lexicon_fingerprint != current {
            return Err(GuardError::LexiconMismatch(format!(
                "fingerprint {} != {}",
                self.lexicon_fingerprint, current
            )));
        }
        Ok(())
    }

    pub fn into_model(self, lexicon: &Lexicon) -> Result<AnomalyModel> {
        self.validate(lexicon)?;
        Ok(AnomalyModel::from_forest(self.forest))
    }
}
