//! Tabular TD(0) tic-tac-toe learner
//!
//! This crate provides:
//! - A tic-tac-toe board with outcome detection and line analysis
//! - A rule-based expert opponent
//! - A TD(0) agent that learns afterstate values by self-improving play
//! - A training pipeline with observers for progress and win-rate trends
//! - Value table persistence (MessagePack and JSON)

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod expert;
pub mod pipeline;
pub mod ports;
pub mod td_learning;
pub mod tictactoe;
pub mod types;

pub use error::{Error, Result};
pub use expert::ExpertPlayer;
pub use td_learning::{Exploration, TdAgent, ValueMap};
