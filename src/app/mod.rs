//! Application layer with dependency injection container.
//!
//! The container owns infrastructure dependencies (the value table
//! repository, a default seed) and provides factory methods for the TD agent
//! and the heuristic expert.
//!
//! ```text
//! App ──owns──▶ adapters (MsgPackRepository, JsonRepository, InMemoryRepository)
//!  │                │ implement
//!  │                ▼
//!  │            ports (ValueMapRepository)
//!  │
//!  └──creates──▶ TdAgent, ExpertPlayer
//! ```
//!
//! # Usage
//!
//! ```
//! use tictactoe_td::app::{AgentConfig, App};
//!
//! let app = App::new();
//! let agent = app.create_agent(AgentConfig::default().with_seed(42))?;
//! let expert = app.create_expert(false, Some(7));
//! # Ok::<(), tictactoe_td::Error>(())
//! ```

pub mod config;
pub mod container;

pub use config::AgentConfig;
pub use container::{App, AppBuilder};
