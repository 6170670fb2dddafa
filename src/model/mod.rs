//! Anomaly model: isolation forest, the feature-bound wrapper, and the persisted bundle.

mod bundle;
mod detector;
mod forest;

pub use bundle::{ModelBundle, BUNDLE_FORMAT_VERSION};
pub use detector::{AnomalyModel, AnomalyScore};
pub use forest::{average_path_length, IsolationForest, IsolationTree, INLIER, OUTLIER};
