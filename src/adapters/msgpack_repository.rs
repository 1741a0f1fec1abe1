//! MessagePack implementation of the value table repository.
//!
//! This adapter implements the ValueMapRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use tracing::info;

use crate::{Result, error::Error, ports::ValueMapRepository, td_learning::SavedValueMap};

/// MessagePack-based value table repository.
///
/// Provides persistent storage using the MessagePack binary format via rmp_serde.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
///
/// use tictactoe_td::adapters::MsgPackRepository;
/// use tictactoe_td::ports::ValueMapRepository;
/// use tictactoe_td::td_learning::{SavedValueMap, TrainingMetadata, ValueMap};
///
/// let repo = MsgPackRepository;
/// let table = SavedValueMap::new(ValueMap::default(), TrainingMetadata::default());
///
/// repo.save(&table, Path::new("values.msgpack"))?;
/// let loaded = repo.load(Path::new("values.msgpack"))?;
/// # Ok::<(), tictactoe_td::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl ValueMapRepository for MsgPackRepository {
    fn save(&self, table: &SavedValueMap, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, table).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize value table to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })?;

        info!(path = %path.display(), states = table.value_map.len(), "saved value table");
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedValueMap> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let table: SavedValueMap = rmp_serde::decode::from_read(BufReader::new(file)).map_err(
            |e| Error::SerializationContext {
                operation: "deserialize value table from MessagePack".to_string(),
                message: e.to_string(),
            },
        )?;

        info!(path = %path.display(), states = table.value_map.len(), "loaded value table");
        Ok(table)
    }
}
