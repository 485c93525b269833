use crate::{
    args::Publish,
    eeprom::{self, EepromError},
    inventory::{self, Config, ConfigError, InventoryError, YamlSink},
};
use std::io::stdout;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PublishError>;

/// Decodes the EEPROM and writes the inventory objects of the FRU to
/// stdout.
#[tracing::instrument]
pub fn publish(opts: Publish) -> Result<()> {
    let Publish {
        eeprom,
        fruid,
        config,
    } = opts;

    let config = Config::load(&config)?;
    let fru = eeprom::decode(&eeprom)?;
    let stdout = stdout();
    inventory::publish(&fru, fruid, &config, &mut YamlSink::new(stdout.lock()))?;
    Ok(())
}

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Eeprom(#[from] EepromError),
    #[error("{0}")]
    Inventory(#[from] InventoryError),
}
