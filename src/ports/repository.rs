//! Repository port for value table persistence.
//!
//! This module defines the trait boundary between the learning code and the
//! storage used to keep a value table across sessions.

use std::path::Path;

use crate::{Result, td_learning::SavedValueMap};

/// Port for persisting and loading value tables.
///
/// Implementations must preserve every key and every value exactly across a
/// save/load round trip.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use tictactoe_td::{ports::ValueMapRepository, td_learning::SavedValueMap};
///
/// fn save_table<R: ValueMapRepository>(
///     repo: &R,
///     table: &SavedValueMap,
///     path: &Path,
/// ) -> tictactoe_td::Result<()> {
///     repo.save(table, path)
/// }
/// ```
pub trait ValueMapRepository {
    /// Save a value table.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be written or
    /// serialization fails.
    fn save(&self, table: &SavedValueMap, path: &Path) -> Result<()>;

    /// Load a value table.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is missing (see
    /// [`crate::Error::is_not_found`]) or its contents are corrupt. Callers
    /// decide whether to start from an empty table.
    fn load(&self, path: &Path) -> Result<SavedValueMap>;
}
