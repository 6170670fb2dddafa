//! BEC Guard — business email compromise risk scoring.
//!
//! Modular structure:
//! - [`lexicon`] — Urgency vocabulary, financial stems, role table
//! - [`features`] — Lexical feature extraction (urgency, financial intent, role mismatch)
//! - [`model`] — Isolation forest anomaly model and persisted bundle
//! - [`risk`] — Rule cascade producing LOW / MEDIUM / HIGH with reasons
//! - [`pipeline`] — Training and inference orchestration
//! - [`logging`] — Structured JSON logging

pub mod config;
pub mod error;
pub mod lexicon;
pub mod features;
pub mod model;
pub mod risk;
pub mod pipeline;
pub mod logging;

pub use config::GuardConfig;
pub use error::{ErrorKind, GuardError, Result};
pub use lexicon::Lexicon;
pub use features::{EmailSample, FeatureExtractor, FeatureVector, FEATURE_COLUMNS};
pub use model::{AnomalyModel, AnomalyScore, ModelBundle};
pub use risk::{RiskEngine, RiskLevel, RiskVerdict, VerdictReport};
pub use pipeline::{ScoringPipeline, Trainer};
pub use logging::StructuredLogger;
