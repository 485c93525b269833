use super::ObjectMap;
use std::io::Write;
use thiserror::Error;

/// Receives the complete set of inventory objects of one FRU at once.
pub trait Notify {
    fn notify(&mut self, objects: ObjectMap) -> Result<(), SinkError>;
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Could not serialize inventory objects: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("Could not write inventory objects: {0}")]
    IO(#[from] std::io::Error),
}

/// Writes the object map as a YAML document.
pub struct YamlSink<W> {
    out: W,
}

impl<W: Write> YamlSink<W> {
    pub fn new(out: W) -> Self {
        YamlSink { out }
    }
}

impl<W: Write> Notify for YamlSink<W> {
    fn notify(&mut self, objects: ObjectMap) -> Result<(), SinkError> {
        serde_yaml::to_writer(&mut self.out, &objects)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::fru::Value;
    use std::collections::BTreeMap;

    #[test]
    fn yaml_output() {
        let mut props = BTreeMap::new();
        props.insert("Present".to_string(), Value::Bool(true));
        props.insert("SerialNumber".to_string(), Value::Str("SN-1".to_string()));
        let mut interfaces = BTreeMap::new();
        interfaces.insert("xyz.Item".to_string(), props);
        let mut objects = ObjectMap::new();
        objects.insert("/system/a".to_string(), interfaces);

        let mut out = vec![];
        YamlSink::new(&mut out).notify(objects.clone()).unwrap();

        let parsed: ObjectMap = serde_yaml::from_slice(&out).unwrap();
        assert_eq!(parsed, objects);
    }
}
