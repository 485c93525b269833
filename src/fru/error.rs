use super::AreaType;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("FRU common header is malformed: {0}")]
    MalformedHeader(&'static str),
    #[error("Checksum mismatch in {unit}, expected: {expected:X?}, got: {received:X?}")]
    ChecksumMismatch {
        unit: Unit,
        expected: u8,
        received: u8,
    },
    #[error("Truncated {unit}, needs {needed} bytes but only {available} available")]
    TruncatedData {
        unit: Unit,
        needed: usize,
        available: usize,
    },
    #[error("{area} area has unsupported format version {version}")]
    UnsupportedAreaFormat { area: AreaType, version: u8 },
    #[error("{area} area starts at the same block as the {other} area, length unknown")]
    OverlappingAreas { area: AreaType, other: AreaType },
    #[error(
        "MultiRecord at offset {offset} of type {type_id:X?} declares length {received}, expected {expected}"
    )]
    InvalidRecordLength {
        offset: usize,
        type_id: u8,
        expected: u8,
        received: u8,
    },
}

/// The part of the image an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    CommonHeader,
    Area(AreaType),
    /// A type/length field starting at the given area offset.
    Field { area: AreaType, offset: usize },
    /// A MultiRecord header at the given offset into the MultiRecord area.
    RecordHeader { offset: usize },
    RecordPayload { offset: usize, type_id: u8 },
}

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Unit::CommonHeader => write!(f, "common header"),
            Unit::Area(area) => write!(f, "{} area", area),
            Unit::Field { area, offset } => {
                write!(f, "field at offset {} of {} area", offset, area)
            }
            Unit::RecordHeader { offset } => write!(f, "MultiRecord header at offset {}", offset),
            Unit::RecordPayload { offset, type_id } => write!(
                f,
                "MultiRecord payload of type {:X?} at offset {}",
                type_id, offset
            ),
        }
    }
}

impl Error {
    pub(crate) fn truncated(unit: Unit, needed: usize, available: usize) -> Self {
        Self::TruncatedData {
            unit,
            needed,
            available,
        }
    }

    pub(crate) fn checksum(unit: Unit, expected: u8, received: u8) -> Self {
        Self::ChecksumMismatch {
            unit,
            expected,
            received,
        }
    }
}
