//! The MultiRecord area: a list of records, each behind a five byte header
//! with its own checksums.

mod dc_output;
mod power_supply;

pub use dc_output::DcOutput;
pub use power_supply::PowerSupplyInfo;

use super::{checksum::checksum, Error, Result, Unit, Value};
use std::fmt::{self, Display, Formatter};
use tracing::{debug, warn};

pub const RECORD_HEADER_LEN: usize = 5;

pub const POWER_SUPPLY_INFO: u8 = 0x00;
pub const DC_OUTPUT: u8 = 0x01;

const END_OF_LIST: u8 = 0x80;
const FORMAT_VERSION_MASK: u8 = 0x0F;

/// A bit field at a fixed position of a record payload. Word sized fields
/// are little-endian.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Bits {
    offset: usize,
    word: bool,
    mask: u16,
    shift: u16,
}

impl Bits {
    pub(crate) const fn byte(offset: usize, mask: u8, shift: u16) -> Self {
        Bits {
            offset,
            word: false,
            mask: mask as u16,
            shift,
        }
    }

    pub(crate) const fn word(offset: usize, mask: u16, shift: u16) -> Self {
        Bits {
            offset,
            word: true,
            mask,
            shift,
        }
    }

    pub(crate) fn read(&self, payload: &[u8]) -> u16 {
        let raw = if self.word {
            u16::from_le_bytes([payload[self.offset], payload[self.offset + 1]])
        } else {
            payload[self.offset] as u16
        };
        (raw & self.mask) >> self.shift
    }

    pub(crate) fn is_set(&self, payload: &[u8]) -> bool {
        self.read(payload) != 0
    }
}

pub(crate) fn le_u16(payload: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([payload[offset], payload[offset + 1]])
}

pub(crate) fn le_i16(payload: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([payload[offset], payload[offset + 1]])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    type_id: u8,
    params: u8,
    length: u8,
    record_checksum: u8,
}

impl RecordHeader {
    /// Reads and verifies the header at `offset`.
    fn read(data: &[u8], offset: usize) -> Result<Self> {
        let unit = Unit::RecordHeader { offset };
        let end = offset + RECORD_HEADER_LEN;
        if end > data.len() {
            return Err(Error::truncated(unit, end, data.len()));
        }

        let header = &data[offset..end];
        let expected = checksum(&header[..4]);
        if header[4] != expected {
            return Err(Error::checksum(unit, expected, header[4]));
        }

        Ok(RecordHeader {
            type_id: header[0],
            params: header[1],
            length: header[2],
            record_checksum: header[3],
        })
    }

    pub fn type_id(&self) -> u8 {
        self.type_id
    }

    pub fn end_of_list(&self) -> bool {
        self.params & END_OF_LIST != 0
    }

    pub fn format_version(&self) -> u8 {
        self.params & FORMAT_VERSION_MASK
    }

    /// Payload length in bytes.
    pub fn length(&self) -> u8 {
        self.length
    }
}

/// Payload length mandated for a record type, `None` for types that are
/// not decoded.
fn expected_length(type_id: u8) -> Option<u8> {
    match type_id {
        POWER_SUPPLY_INFO => Some(PowerSupplyInfo::LEN as u8),
        DC_OUTPUT => Some(DcOutput::LEN as u8),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    PowerSupply(PowerSupplyInfo),
    DcOutput(DcOutput),
    /// A record type that is not decoded, with its raw payload.
    Unsupported { type_id: u8, raw: Vec<u8> },
}

impl Payload {
    fn decode(type_id: u8, payload: &[u8]) -> Self {
        let decoded = match type_id {
            POWER_SUPPLY_INFO => PowerSupplyInfo::new(payload).map(Payload::PowerSupply),
            DC_OUTPUT => DcOutput::new(payload).map(Payload::DcOutput),
            _ => None,
        };
        decoded.unwrap_or_else(|| Payload::Unsupported {
            type_id,
            raw: payload.to_vec(),
        })
    }

    /// Named property values of the record, empty for unsupported types.
    pub fn properties(&self) -> Vec<(&'static str, Value)> {
        match self {
            Payload::PowerSupply(info) => info.properties(),
            Payload::DcOutput(output) => output.properties(),
            Payload::Unsupported { .. } => vec![],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    offset: usize,
    header: RecordHeader,
    payload: Payload,
}

impl Record {
    /// Offset of the record header in the MultiRecord area.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn end_of_list(&self) -> bool {
        self.header.end_of_list()
    }
}

/// Outcome of walking a MultiRecord area.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultiRecordScan {
    records: Vec<Record>,
    skipped: Vec<Error>,
    stopped: Option<Error>,
}

impl MultiRecordScan {
    /// Records in the order they were found.
    pub fn records(&self) -> &[Record] {
        &self.records[..]
    }

    /// Records left out because their payload checksum did not match.
    pub fn skipped(&self) -> &[Error] {
        &self.skipped[..]
    }

    /// Why the scan ended before an end-of-list record, if it did.
    pub fn stopped(&self) -> Option<&Error> {
        self.stopped.as_ref()
    }

    pub fn power_supplies(&self) -> impl Iterator<Item = &PowerSupplyInfo> {
        self.records.iter().filter_map(|r| match &r.payload {
            Payload::PowerSupply(info) => Some(info),
            _ => None,
        })
    }

    pub fn dc_outputs(&self) -> impl Iterator<Item = &DcOutput> {
        self.records.iter().filter_map(|r| match &r.payload {
            Payload::DcOutput(output) => Some(output),
            _ => None,
        })
    }
}

/// Walks the records of a MultiRecord area until the end-of-list flag.
///
/// A payload checksum mismatch only drops that record. A bad header
/// checksum, a length that does not fit the record type, or running out of
/// data end the scan, since the next record can not be located reliably.
/// Records decoded up to that point are kept in any case.
pub fn scan(data: &[u8]) -> MultiRecordScan {
    let mut scan = MultiRecordScan::default();
    let mut offset = 0;
    loop {
        match next_record(data, offset, &mut scan) {
            Ok(Some(next)) => offset = next,
            Ok(None) => break,
            Err(err) => {
                warn!("Stopped reading MultiRecord area: {}", err);
                scan.stopped = Some(err);
                break;
            }
        }
    }
    scan
}

/// Reads the record at `offset` into `scan`, returning where the next record
/// starts, or `None` after the last one.
fn next_record(data: &[u8], offset: usize, scan: &mut MultiRecordScan) -> Result<Option<usize>> {
    let header = RecordHeader::read(data, offset)?;
    let type_id = header.type_id;

    match expected_length(type_id) {
        Some(expected) if expected != header.length => {
            return Err(Error::InvalidRecordLength {
                offset,
                type_id,
                expected,
                received: header.length,
            });
        }
        Some(_) => (),
        None => debug!(
            "MultiRecord at offset {} has unsupported type {:X?}, not decoding",
            offset, type_id
        ),
    }

    let start = offset + RECORD_HEADER_LEN;
    let end = start + header.length as usize;
    let unit = Unit::RecordPayload { offset, type_id };
    if end > data.len() {
        return Err(Error::truncated(unit, end, data.len()));
    }

    let payload = &data[start..end];
    let expected = checksum(payload);
    if expected == header.record_checksum {
        scan.records.push(Record {
            offset,
            header,
            payload: Payload::decode(type_id, payload),
        });
    } else {
        let err = Error::checksum(unit, expected, header.record_checksum);
        warn!("Skipping MultiRecord: {}", err);
        scan.skipped.push(err);
    }

    if header.end_of_list() {
        Ok(None)
    } else {
        Ok(Some(end))
    }
}

impl Display for MultiRecordScan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "MultiRecord area")?;
        for record in self.records() {
            let header = record.header();
            match record.payload() {
                Payload::PowerSupply(_) => write!(f, "  Power Supply Information")?,
                Payload::DcOutput(_) => write!(f, "  DC Output")?,
                Payload::Unsupported { .. } => write!(
                    f,
                    "  Unsupported record type {:X?} ({} bytes)",
                    header.type_id(),
                    header.length()
                )?,
            }
            write!(
                f,
                " at offset {}, format {}",
                record.offset(),
                header.format_version()
            )?;
            if record.end_of_list() {
                write!(f, ", end of list")?;
            }
            writeln!(f)?;
            for (name, value) in record.payload().properties() {
                writeln!(f, "    {}: {}", name, value)?;
            }
        }
        for err in self.skipped() {
            writeln!(f, "  (skipped: {})", err)?;
        }
        if let Some(err) = self.stopped() {
            writeln!(f, "  (incomplete: {})", err)?;
        }
        Ok(())
    }
}
