//! Staging of FRU data written piecewise by the host, the way the IPMI
//! "Write FRU Data" command delivers it.

use crate::{
    args::Stage,
    eeprom,
    inventory::{self, Config, ConfigError, InventoryError, YamlSink},
};
use std::{
    fs::OpenOptions,
    io::{stdout, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info, warn};

pub type Result<T> = std::result::Result<T, StageError>;

pub const DEFAULT_STAGING_DIR: &str = "/tmp";

/// Staging file of a FRU, e.g. `/tmp/ipmifru03`.
pub fn staging_path(dir: &Path, fruid: u8) -> PathBuf {
    dir.join(format!("ipmifru{:02x}", fruid))
}

/// Writes the data into the staging file, then tries to decode what has
/// been staged so far. The staged image not decoding yet is no error, the
/// host may still be writing it.
#[tracing::instrument]
pub fn stage(opts: Stage) -> Result<()> {
    let Stage {
        fruid,
        offset,
        data,
        dir,
        config,
    } = opts;
    let config = config.as_deref().map(Config::load).transpose()?;

    let path = staging_path(&dir, fruid);
    write_at(&path, offset, data.as_bytes())?;
    info!(
        "Wrote {} bytes at offset {} to {}",
        data.as_bytes().len(),
        offset,
        path.display()
    );

    let fru = match eeprom::decode(&path) {
        Ok(fru) => fru,
        Err(err) => {
            warn!("Staged FRU {} is not valid yet: {}", fruid, err);
            return Ok(());
        }
    };
    debug!(
        "Staged FRU {} declares area offsets {:?}",
        fruid,
        fru.header().offsets()
    );
    for (area, err) in fru.failed_areas() {
        warn!("Staged FRU {} has invalid {} area: {}", fruid, area, err);
    }
    info!("Staged FRU {} decoded with {} areas", fruid, fru.areas().len());

    if let Some(config) = config {
        let stdout = stdout();
        inventory::publish(&fru, fruid, &config, &mut YamlSink::new(stdout.lock()))?;
    }
    Ok(())
}

/// Writes at the given offset, creating the file if needed and leaving
/// other bytes of an existing file untouched.
fn write_at(path: &Path, offset: u16, data: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .map_err(|e| StageError::io(e, path))?;
    file.seek(SeekFrom::Start(offset.into()))
        .map_err(|e| StageError::io(e, path))?;
    file.write_all(data).map_err(|e| StageError::io(e, path))?;
    Ok(())
}

#[derive(Error, Debug)]
pub enum StageError {
    #[error("Could not write FRU data to staging file {path}: {source}")]
    IO {
        source: std::io::Error,
        path: String,
    },
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Inventory(#[from] InventoryError),
}

impl StageError {
    fn io(source: std::io::Error, path: &Path) -> Self {
        Self::IO {
            source,
            path: path.display().to_string(),
        }
    }
}
