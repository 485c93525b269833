//! Chassis, board and product info areas.

use super::{
    field::{Field, FieldReader},
    AreaType, Error, Result,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use std::fmt::{self, Display, Formatter};

lazy_static! {
    /// Manufacturing dates are counted in minutes from 1996-01-01 00:00.
    static ref FRU_EPOCH: NaiveDateTime = NaiveDate::from_ymd(1996, 1, 1).and_hms(0, 0, 0);
}

/// Offset of the first area specific byte, behind format and length.
const LEADING: usize = 2;

const CHASSIS_FIELDS: &[FieldName] = &[FieldName::PartNumber, FieldName::SerialNumber];
const BOARD_FIELDS: &[FieldName] = &[
    FieldName::Manufacturer,
    FieldName::ProductName,
    FieldName::SerialNumber,
    FieldName::PartNumber,
    FieldName::FruFileId,
];
const PRODUCT_FIELDS: &[FieldName] = &[
    FieldName::Manufacturer,
    FieldName::ProductName,
    FieldName::PartNumber,
    FieldName::Version,
    FieldName::SerialNumber,
    FieldName::AssetTag,
    FieldName::FruFileId,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldName {
    Manufacturer,
    ProductName,
    SerialNumber,
    /// Part number, or part/model number in the product area.
    PartNumber,
    FruFileId,
    Version,
    AssetTag,
    /// Custom field, counting from one.
    Custom(usize),
}

impl Display for FieldName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FieldName::Manufacturer => f.write_str("Manufacturer"),
            FieldName::ProductName => f.write_str("Product Name"),
            FieldName::SerialNumber => f.write_str("Serial Number"),
            FieldName::PartNumber => f.write_str("Part Number"),
            FieldName::FruFileId => f.write_str("FRU File ID"),
            FieldName::Version => f.write_str("Version"),
            FieldName::AssetTag => f.write_str("Asset Tag"),
            FieldName::Custom(n) => write!(f, "Custom Field {}", n),
        }
    }
}

/// Decoded chassis, board or product area.
///
/// Decoding stops at the first malformed field. Fields read up to that
/// point are kept and the error is available through
/// [stopped](InfoArea::stopped).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfoArea {
    kind: AreaType,
    /// Chassis type in the chassis area, language code otherwise.
    leading: u8,
    mfg_minutes: Option<u32>,
    fields: Vec<(FieldName, Field)>,
    stopped: Option<Error>,
}

impl InfoArea {
    /// Decodes the contents of a verified area, excluding its checksum.
    /// Verified areas are at least a block long, so the leading bytes
    /// are always there.
    pub fn decode(kind: AreaType, contents: &[u8]) -> Self {
        let (names, start, mfg_minutes): (&[FieldName], _, _) = match kind {
            AreaType::Board => {
                let minutes = u32::from_le_bytes([
                    contents[LEADING + 1],
                    contents[LEADING + 2],
                    contents[LEADING + 3],
                    0,
                ]);
                (BOARD_FIELDS, LEADING + 4, Some(minutes))
            }
            AreaType::Product => (PRODUCT_FIELDS, LEADING + 1, None),
            _ => (CHASSIS_FIELDS, LEADING + 1, None),
        };

        let mut area = InfoArea {
            kind,
            leading: contents[LEADING],
            mfg_minutes,
            fields: vec![],
            stopped: None,
        };
        let mut reader = FieldReader::new(kind, contents, start);
        if let Err(err) = area.read_fields(&mut reader, names) {
            area.stopped = Some(err);
        }
        area
    }

    fn read_fields(&mut self, reader: &mut FieldReader, names: &[FieldName]) -> Result<()> {
        for &name in names {
            match reader.fixed()? {
                Some(field) => self.fields.push((name, field)),
                // remaining fields left out, custom fields included
                None => return Ok(()),
            }
        }

        let mut custom = 0;
        while let Some(field) = reader.next_custom()? {
            custom += 1;
            self.fields.push((FieldName::Custom(custom), field));
        }
        Ok(())
    }

    pub fn kind(&self) -> AreaType {
        self.kind
    }

    pub fn chassis_type(&self) -> Option<u8> {
        match self.kind {
            AreaType::Chassis => Some(self.leading),
            _ => None,
        }
    }

    pub fn language(&self) -> Option<u8> {
        match self.kind {
            AreaType::Chassis => None,
            _ => Some(self.leading),
        }
    }

    /// Raw manufacturing date of a board area, zero meaning unspecified.
    pub fn mfg_minutes(&self) -> Option<u32> {
        self.mfg_minutes
    }

    /// Manufacturing date of a board area, if specified.
    pub fn mfg_date(&self) -> Option<NaiveDateTime> {
        match self.mfg_minutes() {
            Some(0) | None => None,
            Some(minutes) => Some(*FRU_EPOCH + Duration::minutes(minutes as i64)),
        }
    }

    /// Fields in the order they were found in the area.
    pub fn fields(&self) -> &[(FieldName, Field)] {
        &self.fields[..]
    }

    #[cfg(test)]
    pub fn field(&self, name: FieldName) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, field)| field)
    }

    #[cfg(test)]
    pub fn custom_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter_map(|(name, field)| match name {
            FieldName::Custom(_) => Some(field),
            _ => None,
        })
    }

    /// The error that ended decoding early, if any.
    pub fn stopped(&self) -> Option<&Error> {
        self.stopped.as_ref()
    }

    /// Text of a property by its display name, e.g. `Serial Number`,
    /// `Mfg Date` or `Custom Field 2`.
    pub fn property(&self, property: &str) -> Option<String> {
        match property {
            "Chassis Type" => self.chassis_type().map(|t| t.to_string()),
            "Language" => self.language().map(|l| l.to_string()),
            "Mfg Date" => self
                .mfg_date()
                .map(|date| date.format("%Y-%m-%d %H:%M:%S").to_string()),
            _ => self
                .fields
                .iter()
                .find(|(name, _)| name.to_string() == property)
                .map(|(_, field)| field.text()),
        }
    }
}

impl Display for InfoArea {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} area", self.kind())?;
        if let Some(chassis_type) = self.chassis_type() {
            writeln!(f, "  Chassis Type: {}", chassis_type)?;
        }
        if let Some(language) = self.language() {
            writeln!(f, "  Language: {}", language)?;
        }
        if let Some(date) = self.mfg_date() {
            writeln!(f, "  Mfg Date: {}", date)?;
        }
        for (name, field) in self.fields() {
            writeln!(f, "  {}: {}", name, field)?;
        }
        if let Some(err) = self.stopped() {
            writeln!(f, "  (incomplete: {})", err)?;
        }
        Ok(())
    }
}
