//! CLI infrastructure for the tictactoe-td toolkit
//!
//! This module provides the command-line interface for training the TD agent
//! against the expert, playing against it and inspecting saved value tables.

pub mod commands;
pub mod config;
pub mod output;
