//! Anomaly model over [`FeatureVector`]s: an isolation forest bound to the fixed column layout.

use super::forest::{IsolationForest, INLIER, OUTLIER};
use crate::config::ForestConfig;
use crate::error::{GuardError, Result};
use crate::features::{FeatureVector, FEATURE_COLUMNS, FEATURE_DIM};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Model output for one email.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyScore {
    /// 1 if the forest labels the point an outlier
    pub flag: u8,
    /// Decision value: higher is more normal, negative is anomalous
    pub score: f64,
}

impl AnomalyScore {
    pub fn is_anomalous(&self) -> bool {
        self.flag == 1
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnomalyModel {
    forest: Option<IsolationForest>,
}

fn to_matrix(vectors: &[FeatureVector]) -> Array2<f64> {
    let rows: Vec<[f64; FEATURE_DIM]> = vectors.iter().map(FeatureVector::to_row).collect();
    Array2::from_shape_fn((rows.len(), FEATURE_DIM), |(i, j)| rows[i][j])
}

impl AnomalyModel {
    /// Model with no forest; scoring fails until [`fit`](Self::fit) succeeds.
    pub fn unfitted() -> Self {
        Self::default()
    }

    pub(crate) fn from_forest(forest: IsolationForest) -> Self {
        Self {
            forest: Some(forest),
        }
    }

    pub fn fit(&mut self, vectors: &[FeatureVector], config: &ForestConfig) -> Result<()> {
        let x = to_matrix(vectors);
        let forest = IsolationForest::fit(x.view(), config)?;
        tracing::info!(
            samples = vectors.len(),
            trees = forest.n_estimators(),
            max_samples = forest.max_samples(),
            offset = forest.offset(),
            seed = config.seed,
            "anomaly model fitted"
        );
        self.forest = Some(forest);
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        self.forest.is_some()
    }

    pub fn forest(&self) -> Result<&IsolationForest> {
        self.forest.as_ref().ok_or(GuardError::ModelNotFitted)
    }

    /// Column order the model consumes.
    pub fn feature_cols(&self) -> &'static [&'static str] {
        &FEATURE_COLUMNS
    }

    pub fn score(&self, features: &FeatureVector) -> Result<AnomalyScore> {
        let scores = self.score_batch(std::slice::from_ref(features))?;
        scores.into_iter().next().ok_or(GuardError::ModelNotFitted)
    }

    pub fn score_batch(&self, vectors: &[FeatureVector]) -> Result<Vec<AnomalyScore>> {
        let forest = self.forest()?;
        let x = to_matrix(vectors);
        let decision = forest.decision_function(x.view())?;
        Ok(decision
            .iter()
            .map(|&d| {
                let label = if d < 0.0 { OUTLIER } else { INLIER };
                AnomalyScore {
                    flag: u8::from(label == OUTLIER),
                    score: d,
                }
            })
            .collect())
    }
}
