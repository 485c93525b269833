use crate::fru::{AreaType, Value};
use serde::Deserialize;
use std::{collections::BTreeMap, fs::File, path::Path};
use thiserror::Error;

/// Where to find a published value in the decoded FRU.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    #[serde(rename = "IPMIFruSection")]
    pub section: Section,
    /// Display name of an info area property, e.g. `Serial Number`, or the
    /// name of a record property, e.g. `OverallCapacity`.
    #[serde(rename = "IPMIFruProperty")]
    pub property: String,
    /// For custom fields in `key<delimiter>value` form, publish only the
    /// value.
    #[serde(rename = "IPMIFruDelimiter", default)]
    pub delimiter: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Chassis,
    Board,
    Product,
    PowerSupply,
    DcOutput,
}

impl Section {
    /// The info area backing this section, `None` for MultiRecord sections.
    pub fn info_area(self) -> Option<AreaType> {
        match self {
            Section::Chassis => Some(AreaType::Chassis),
            Section::Board => Some(AreaType::Board),
            Section::Product => Some(AreaType::Product),
            Section::PowerSupply | Section::DcOutput => None,
        }
    }
}

/// Property name to mapping, per interface, per object path.
pub type Objects = BTreeMap<String, BTreeMap<String, BTreeMap<String, Mapping>>>;
/// Fixed property values, per interface, per object path.
pub type Extras = BTreeMap<String, BTreeMap<String, BTreeMap<String, Value>>>;

/// Inventory mapping table.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Objects to publish, keyed by FRU id.
    pub frus: BTreeMap<u8, Objects>,
    #[serde(default)]
    pub extras: Extras,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|e| ConfigError::io(e, path))?;
        serde_yaml::from_reader(file).map_err(|e| ConfigError::parse(e, path))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not open inventory configuration {path}: {source}")]
    IO {
        source: std::io::Error,
        path: String,
    },
    #[error("Could not parse inventory configuration {path}: {source}")]
    Parse {
        source: serde_yaml::Error,
        path: String,
    },
}

impl ConfigError {
    fn io(source: std::io::Error, path: &Path) -> Self {
        Self::IO {
            source,
            path: path.display().to_string(),
        }
    }

    fn parse(source: serde_yaml::Error, path: &Path) -> Self {
        Self::Parse {
            source,
            path: path.display().to_string(),
        }
    }
}
