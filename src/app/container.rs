//! Dependency injection container for the tictactoe-td application.
//!
//! The container owns infrastructure dependencies and provides factory
//! methods for creating domain objects.

use std::{path::Path, sync::Arc};

use tracing::{info, warn};

use super::config::AgentConfig;
use crate::{
    Result,
    adapters::MsgPackRepository,
    expert::ExpertPlayer,
    ports::ValueMapRepository,
    td_learning::{SavedValueMap, TdAgent, TrainingMetadata, ValueMap},
};

/// Application with dependency injection.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use tictactoe_td::app::{AgentConfig, App};
///
/// let app = App::new();
/// let agent = app.create_agent(AgentConfig::default().with_seed(42))?;
/// # Ok::<(), tictactoe_td::Error>(())
/// ```
///
/// ## Testing with dependency injection
///
/// ```
/// use tictactoe_td::adapters::InMemoryRepository;
/// use tictactoe_td::app::App;
///
/// let app = App::for_testing()
///     .with_repository(InMemoryRepository::new())
///     .with_default_seed(42)
///     .build();
/// ```
pub struct App {
    /// Repository for value table persistence
    value_map_repository: Arc<dyn ValueMapRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults.
    ///
    /// Uses:
    /// - `MsgPackRepository` for value table persistence
    /// - No default seed (non-deterministic RNG)
    pub fn new() -> Self {
        Self {
            value_map_repository: Arc::new(MsgPackRepository::new()),
            default_seed: None,
        }
    }

    /// Create a builder for constructing app with custom dependencies.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    /// Get the value table repository.
    pub fn value_map_repository(&self) -> Arc<dyn ValueMapRepository + Send + Sync> {
        Arc::clone(&self.value_map_repository)
    }

    /// Create a fresh agent with an empty value table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `config` fails
    /// validation.
    pub fn create_agent(&self, config: AgentConfig) -> Result<TdAgent> {
        config.validate()?;
        let value_map = ValueMap::new(config.learning_rate, config.starting_value)?;
        Ok(self.wrap_agent(value_map, &config))
    }

    /// Create the heuristic expert, seeded with the container default if any.
    pub fn create_expert(&self, blocking: bool, seed: Option<u64>) -> ExpertPlayer {
        match seed.or(self.default_seed) {
            Some(seed) => ExpertPlayer::with_seed(blocking, seed),
            None => ExpertPlayer::new(blocking),
        }
    }

    /// Load an agent from persistent storage.
    ///
    /// The learned values are kept as saved; the learning rate, starting
    /// value and exploration come from `config`.
    ///
    /// # Errors
    ///
    /// Returns the repository error for a missing or corrupt store,
    /// [`crate::Error::UnsupportedVersion`] for a foreign format and
    /// [`crate::Error::InvalidConfiguration`] for a bad `config`.
    pub fn load_agent(
        &self,
        path: &Path,
        config: AgentConfig,
    ) -> Result<(TdAgent, TrainingMetadata)> {
        config.validate()?;
        let saved = self.value_map_repository.load(path)?;
        let metadata = saved.metadata.clone();
        let mut value_map = saved.into_value_map()?;
        value_map.set_learning_rate(config.learning_rate)?;
        value_map.set_starting_value(config.starting_value)?;

        info!(
            path = %path.display(),
            states = value_map.len(),
            episodes_trained = metadata.episodes_trained,
            "resuming from saved value table"
        );
        Ok((self.wrap_agent(value_map, &config), metadata))
    }

    /// Load an agent, starting from an empty table only when no store exists.
    ///
    /// A corrupt store is still an error.
    pub fn load_or_create_agent(
        &self,
        path: &Path,
        config: AgentConfig,
    ) -> Result<(TdAgent, TrainingMetadata)> {
        match self.load_agent(path, config.clone()) {
            Ok(loaded) => Ok(loaded),
            Err(err) if err.is_not_found() => {
                warn!(path = %path.display(), "no saved value table, starting fresh");
                Ok((self.create_agent(config)?, TrainingMetadata::default()))
            }
            Err(err) => Err(err),
        }
    }

    /// Save an agent's value table to persistent storage.
    pub fn save_agent(
        &self,
        agent: &TdAgent,
        metadata: TrainingMetadata,
        path: &Path,
    ) -> Result<()> {
        let saved = SavedValueMap::from_agent(agent, metadata).with_saved_at_now();
        self.value_map_repository.save(&saved, path)
    }

    fn wrap_agent(&self, value_map: ValueMap, config: &AgentConfig) -> TdAgent {
        let agent = TdAgent::new(value_map, config.exploration);
        match config.seed.or(self.default_seed) {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing app with custom dependencies.
///
/// Primarily used for testing to inject in-memory repositories and control
/// randomness.
pub struct AppBuilder {
    value_map_repository: Option<Arc<dyn ValueMapRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    /// Create a new app builder.
    pub fn new() -> Self {
        Self {
            value_map_repository: None,
            default_seed: None,
        }
    }

    /// Set a custom value table repository.
    pub fn with_repository<R: ValueMapRepository + Send + Sync + 'static>(
        mut self,
        repo: R,
    ) -> Self {
        self.value_map_repository = Some(Arc::new(repo));
        self
    }

    /// Set an already shared value table repository.
    pub fn with_shared_repository(
        mut self,
        repo: Arc<dyn ValueMapRepository + Send + Sync>,
    ) -> Self {
        self.value_map_repository = Some(repo);
        self
    }

    /// Set a default random seed for all players created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app with the configured dependencies.
    ///
    /// If no repository was specified, uses `MsgPackRepository` by default.
    pub fn build(self) -> App {
        App {
            value_map_repository: self
                .value_map_repository
                .unwrap_or_else(|| Arc::new(MsgPackRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
