//! JSON implementation of the value table repository.
//!
//! Human-readable alternative to [`super::MsgPackRepository`]; values survive
//! a round trip bit for bit.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use tracing::info;

use crate::{Result, error::Error, ports::ValueMapRepository, td_learning::SavedValueMap};

/// Pretty-printed JSON value table repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepository;

impl JsonRepository {
    pub fn new() -> Self {
        Self
    }
}

impl ValueMapRepository for JsonRepository {
    fn save(&self, table: &SavedValueMap, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, table)?;
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

        let table: SavedValueMap = serde_json::from_reader(BufReader::new(file))?;
        info!(path = %path.display(), states = table.value_map.len(), "loaded value table");
        Ok(table)
    }
}
