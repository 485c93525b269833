use crate::fru::{self, Fru};
use std::{fs::read, path::Path};
use thiserror::Error;
use tracing::debug;

/// Reads a complete FRU image from an EEPROM device or file and decodes it.
pub fn decode(path: &Path) -> Result<Fru, EepromError> {
    let image = read(path).map_err(|e| EepromError::io(e, path))?;
    debug!("Read {} bytes from {}", image.len(), path.display());
    Fru::decode(&image).map_err(|e| EepromError::decode(e, path))
}

#[derive(Error, Debug)]
pub enum EepromError {
    #[error("Could not read FRU image from {path}: {source}")]
    IO {
        source: std::io::Error,
        path: String,
    },
    #[error("Could not decode FRU image in {path}: {source}")]
    Decode { source: fru::Error, path: String },
}

impl EepromError {
    fn io(source: std::io::Error, path: &Path) -> Self {
        Self::IO {
            source,
            path: path.display().to_string(),
        }
    }

    fn decode(source: fru::Error, path: &Path) -> Self {
        Self::Decode {
            source,
            path: path.display().to_string(),
        }
    }
}
