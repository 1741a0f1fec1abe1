//! Value table for TD(0) state-value learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_LEARNING_RATE, STARTING_VALUE, StateKey};

/// Value table mapping board states to the estimated chance of winning
///
/// Keys are full-grid [`StateKey`]s. A key that has never been seen is worth
/// the starting value and is materialized on first read or write, so the
/// table only ever grows.
///
/// Deserialization applies the same checks as [`ValueMap::new`] and also
/// rejects stored values outside [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredValueMap")]
pub struct ValueMap {
    /// V(s) for every state read or written so far
    values: HashMap<StateKey, f64>,
    /// Step size α
    learning_rate: f64,
    /// V(s) for unseen states
    starting_value: f64,
}

impl ValueMap {
    /// Create an empty value table
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `learning_rate` is
    /// outside (0, 1] or `starting_value` is outside [0, 1].
    pub fn new(learning_rate: f64, starting_value: f64) -> Result<Self, crate::Error> {
        validate_learning_rate(learning_rate)?;
        validate_value("starting value", starting_value)?;

        Ok(Self {
            values: HashMap::new(),
            learning_rate,
            starting_value,
        })
    }

    /// Value of a state, inserting the starting value if it is unseen
    pub fn get_value(&mut self, key: &StateKey) -> f64 {
        let starting_value = self.starting_value;
        self.get_value_or_else(key, || starting_value)
    }

    /// Value of a state, inserting `default()` if it is unseen
    ///
    /// Used for terminal successor states, whose first value is the reward
    /// rather than the neutral prior.
    pub fn get_value_or_else<F>(&mut self, key: &StateKey, default: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        if let Some(&value) = self.values.get(key) {
            return value;
        }
        let value = default();
        self.values.insert(key.clone(), value);
        value
    }

    /// Value of a state without materializing it
    pub fn peek(&self, key: &StateKey) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn contains(&self, key: &StateKey) -> bool {
        self.values.contains_key(key)
    }

    /// TD(0) backup
    ///
    /// V(s) ← V(s) + α[observed - V(s)]
    ///
    /// Returns the new value of `previous`.
    pub fn update(&mut self, previous: &StateKey, observed: f64) -> f64 {
        let current = self.get_value(previous);
        let new_value = current + self.learning_rate * (observed - current);
        self.values.insert(previous.clone(), new_value);
        new_value
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Change the step size, e.g. when resuming a saved table with new settings
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `learning_rate` is
    /// outside (0, 1].
    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<(), crate::Error> {
        validate_learning_rate(learning_rate)?;
        self.learning_rate = learning_rate;
        Ok(())
    }

    pub fn starting_value(&self) -> f64 {
        self.starting_value
    }

    /// Change the value given to states seen for the first time
    ///
    /// Stored entries keep their values.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if `starting_value` is
    /// outside [0, 1].
    pub fn set_starting_value(&mut self, starting_value: f64) -> Result<(), crate::Error> {
        validate_value("starting value", starting_value)?;
        self.starting_value = starting_value;
        Ok(())
    }

    /// Get total number of states stored
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over stored entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, f64)> {
        self.values.iter().map(|(key, &value)| (key, value))
    }

    /// All entries sorted by key, for deterministic dumps
    pub fn sorted_entries(&self) -> Vec<(&StateKey, f64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Default for ValueMap {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            learning_rate: DEFAULT_LEARNING_RATE,
            starting_value: STARTING_VALUE,
        }
    }
}

/// Unchecked serde image of a [`ValueMap`]
#[derive(Deserialize)]
struct StoredValueMap {
    values: HashMap<StateKey, f64>,
    learning_rate: f64,
    starting_value: f64,
}

impl TryFrom<StoredValueMap> for ValueMap {
    type Error = crate::Error;

    fn try_from(stored: StoredValueMap) -> Result<Self, Self::Error> {
        let mut map = ValueMap::new(stored.learning_rate, stored.starting_value)?;
        for (key, &value) in &stored.values {
            validate_value(&format!("value of {key}"), value)?;
        }
        map.values = stored.values;
        Ok(map)
    }
}

fn validate_value(what: &str, value: f64) -> Result<(), crate::Error> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(crate::Error::InvalidConfiguration {
            message: format!("{what} {value} must lie in [0, 1]"),
        })
    }
}

fn validate_learning_rate(learning_rate: f64) -> Result<(), crate::Error> {
    if learning_rate > 0.0 && learning_rate <= 1.0 {
        Ok(())
    } else {
        Err(crate::Error::InvalidConfiguration {
            message: format!("learning rate {learning_rate} must lie in (0, 1]"),
        })
    }
}
