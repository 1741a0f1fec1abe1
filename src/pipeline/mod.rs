//! Training pipeline abstractions
//!
//! This module provides:
//! - The driving loop that plays the learner against its opponent
//! - Observers that record progress, metrics and win-rate trends

pub mod observers;
pub mod training;

// Re-export observer implementations (adapters)
pub use observers::{
    CsvTrendObserver, JsonlObserver, MetricsObserver, MetricsSummary, MilestoneObserver,
    Observation, ProgressObserver, SharedObserver, StepObservation, WindowSummary, WindowTracker,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{Learner, Observer};
