//! Publishing decoded FRU values as inventory objects.

mod config;
mod sink;

pub use config::{Config, ConfigError, Mapping, Section};
#[cfg(test)]
pub use sink::mock::MockSink;
pub use sink::{Notify, SinkError, YamlSink};

use crate::fru::{Fru, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

pub type PropertyMap = BTreeMap<String, Value>;
pub type InterfaceMap = BTreeMap<String, PropertyMap>;
pub type ObjectMap = BTreeMap<String, InterfaceMap>;

pub type Result<T> = std::result::Result<T, InventoryError>;

const CUSTOM_FIELD: &str = "Custom Field";

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("No inventory objects are configured for FRU {fruid}")]
    UnknownFru { fruid: u8 },
    #[error("Could not notify the inventory of FRU {fruid}: {source}")]
    Notify { source: SinkError, fruid: u8 },
}

/// Projects the decoded FRU through the mapping table and hands all
/// resulting objects to the sink in a single notification.
#[tracing::instrument(skip(fru, config, sink))]
pub fn publish(fru: &Fru, fruid: u8, config: &Config, sink: &mut impl Notify) -> Result<()> {
    let objects = objects(fru, fruid, config)?;
    debug!("Publishing {} inventory objects", objects.len());
    sink.notify(objects)
        .map_err(|source| InventoryError::Notify { source, fruid })
}

/// Object map for the given FRU id. Values that are missing from the FRU
/// are published as empty strings.
pub fn objects(fru: &Fru, fruid: u8, config: &Config) -> Result<ObjectMap> {
    let instances = config
        .frus
        .get(&fruid)
        .ok_or(InventoryError::UnknownFru { fruid })?;
    if instances.is_empty() {
        debug!("No objects configured for FRU {}", fruid);
    }

    let mut objects = ObjectMap::new();
    for (path, interfaces) in instances {
        let extras = config.extras.get(path);
        let mut published = InterfaceMap::new();

        for (interface, properties) in interfaces {
            let mut props: PropertyMap = properties
                .iter()
                .map(|(name, mapping)| (name.clone(), lookup(fru, mapping)))
                .collect();
            if let Some(extra) = extras.and_then(|e| e.get(interface)) {
                for (name, value) in extra {
                    // mapped values take precedence
                    props.entry(name.clone()).or_insert_with(|| value.clone());
                }
            }
            published.insert(interface.clone(), props);
        }

        if let Some(extras) = extras {
            for (interface, props) in extras {
                published
                    .entry(interface.clone())
                    .or_insert_with(|| props.clone());
            }
        }
        objects.insert(path.clone(), published);
    }
    Ok(objects)
}

fn lookup(fru: &Fru, mapping: &Mapping) -> Value {
    let value = match mapping.section.info_area() {
        Some(area) => fru
            .info(area)
            .and_then(|info| info.property(&mapping.property))
            .map(|text| Value::Str(strip_key(text, mapping))),
        None => record_property(fru, mapping),
    };
    value.unwrap_or_else(|| {
        warn!(
            "No value for {:?} property {}, publishing empty string",
            mapping.section, mapping.property
        );
        Value::Str(String::new())
    })
}

/// Looks the property up in the first record of the section's type.
fn record_property(fru: &Fru, mapping: &Mapping) -> Option<Value> {
    let scan = fru.multi_record()?;
    let properties = match mapping.section {
        Section::PowerSupply => scan.power_supplies().next()?.properties(),
        Section::DcOutput => scan.dc_outputs().next()?.properties(),
        _ => return None,
    };
    properties
        .into_iter()
        .find(|(name, _)| *name == mapping.property)
        .map(|(_, value)| value)
}

/// Custom fields may hold `key<delimiter>value`, keep the part after the
/// first delimiter.
fn strip_key(text: String, mapping: &Mapping) -> String {
    match &mapping.delimiter {
        Some(delimiter) if !delimiter.is_empty() && mapping.property.starts_with(CUSTOM_FIELD) => {
            match text.find(delimiter.as_str()) {
                Some(pos) => text[pos + delimiter.len()..].to_string(),
                None => text,
            }
        }
        _ => text,
    }
}
