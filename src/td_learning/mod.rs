//! Temporal difference state-value learning
//!
//! The agent learns V(s) for full-board afterstates with the TD(0) rule
//!
//! ```text
//! V(s) ← V(s) + α[V(s') - V(s)]
//! ```
//!
//! where `s` is the board the agent left on its previous move and `s'` the
//! board it leaves now. At the end of an episode the last afterstate is
//! backed up toward the terminal reward instead: 1.0 for a win, 0.5 for a
//! tie and 0.0 for a loss.
//!
//! ## Usage Example
//!
//! ```no_run
//! use tictactoe_td::td_learning::{Exploration, TdAgent, ValueMap};
//!
//! let value_map = ValueMap::new(
//!     0.5, // learning_rate
//!     0.5, // starting_value
//! )?;
//! let agent = TdAgent::new(value_map, Exploration::Probability(0.01)).with_seed(42);
//! # Ok::<(), tictactoe_td::Error>(())
//! ```

pub mod agent;
pub mod serialization;
pub mod value_map;

// Public re-exports
pub use agent::{Exploration, TdAgent};
pub use serialization::{SavedValueMap, TrainingMetadata};
pub use value_map::ValueMap;
