//! Decoding of IPMI FRU images: the common header, the chassis, board and
//! product info areas, the internal use area and the MultiRecord area.
//!
//! Only a broken common header fails the whole decode. Any other problem is
//! kept with the area it belongs to, so that one corrupt area never hides
//! the others.

mod area;
#[cfg(test)]
pub(crate) mod builder;
mod checksum;
mod error;
mod field;
mod header;
mod info;
mod multirecord;
mod value;

pub use area::Area;
pub use error::{Error, Unit};
pub use field::{Field, TypeCode};
pub use header::{AreaType, CommonHeader, BLOCK_LEN, HEADER_LEN};
pub use info::{FieldName, InfoArea};
pub use multirecord::{DcOutput, MultiRecordScan, Payload, PowerSupplyInfo, Record};
pub use value::Value;

use std::fmt::{self, Display, Formatter};
use tracing::{debug, warn};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AreaContent {
    /// Opaque internal use bytes.
    Internal(Area),
    Info(InfoArea),
    MultiRecord(MultiRecordScan),
}

/// A decoded FRU image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fru {
    header: CommonHeader,
    areas: Vec<(AreaType, Result<AreaContent>)>,
}

impl Fru {
    #[tracing::instrument(skip(image), fields(len = image.len()))]
    pub fn decode(image: &[u8]) -> Result<Self> {
        let header = CommonHeader::parse(image)?;
        let areas = area::extract(image, &header)
            .into_iter()
            .map(|(kind, area)| {
                let content = area.map(decode_area);
                if let Err(err) = &content {
                    warn!("Skipping {} area: {}", kind, err);
                }
                (kind, content)
            })
            .collect();

        Ok(Fru { header, areas })
    }

    pub fn header(&self) -> &CommonHeader {
        &self.header
    }

    /// Results for every area present in the header, in header order.
    pub fn areas(&self) -> &[(AreaType, Result<AreaContent>)] {
        &self.areas[..]
    }

    /// Result for the given area, `None` if the header does not declare it.
    pub fn area(&self, kind: AreaType) -> Option<&Result<AreaContent>> {
        self.areas
            .iter()
            .find(|(area, _)| *area == kind)
            .map(|(_, content)| content)
    }

    /// A chassis, board or product area, if present and valid.
    pub fn info(&self, kind: AreaType) -> Option<&InfoArea> {
        match self.area(kind) {
            Some(Ok(AreaContent::Info(info))) => Some(info),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn internal_use(&self) -> Option<&Area> {
        match self.area(AreaType::Internal) {
            Some(Ok(AreaContent::Internal(area))) => Some(area),
            _ => None,
        }
    }

    pub fn multi_record(&self) -> Option<&MultiRecordScan> {
        match self.area(AreaType::MultiRecord) {
            Some(Ok(AreaContent::MultiRecord(scan))) => Some(scan),
            _ => None,
        }
    }

    /// Areas that could not be decoded at all.
    pub fn failed_areas(&self) -> impl Iterator<Item = (AreaType, &Error)> {
        self.areas.iter().filter_map(|(kind, content)| match content {
            Err(err) => Some((*kind, err)),
            Ok(_) => None,
        })
    }
}

fn decode_area(area: Area) -> AreaContent {
    match area.kind() {
        AreaType::Internal => {
            debug!("Internal use area has {} bytes", area.as_bytes().len());
            AreaContent::Internal(area)
        }
        AreaType::MultiRecord => AreaContent::MultiRecord(multirecord::scan(area.as_bytes())),
        kind => AreaContent::Info(InfoArea::decode(kind, area.contents())),
    }
}

impl Display for Fru {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (kind, content) in &self.areas {
            match content {
                Ok(AreaContent::Internal(area)) => writeln!(
                    f,
                    "{} area\n  {} bytes at offset {}",
                    kind,
                    area.as_bytes().len(),
                    area.offset()
                )?,
                Ok(AreaContent::Info(info)) => write!(f, "{}", info)?,
                Ok(AreaContent::MultiRecord(scan)) => write!(f, "{}", scan)?,
                Err(err) => writeln!(f, "{} area\n  (invalid: {})", kind, err)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    pub use super::builder::common_header;
    use super::builder::{record, Builder, Image};
    use super::multirecord::test::{dc_output_payload, power_supply_payload};
    use super::*;

    /// An image with every area type, all of them valid.
    pub fn full_image() -> Vec<u8> {
        let mut multi = record(0x00, false, &power_supply_payload());
        multi.extend(record(0x01, true, &dc_output_payload()));

        Image::new()
            .area(AreaType::Internal, vec![0x01, 0xDE, 0xAD, 0xBE, 0xEF])
            .area(
                AreaType::Chassis,
                Builder::new()
                    .u8(0x17)
                    .text("CH-PN")
                    .text("CH-SN")
                    .text("Version:3")
                    .sentinel()
                    .build(),
            )
            .area(
                AreaType::Board,
                Builder::new()
                    .u8(0x19)
                    .buf(&[0x00, 0x00, 0x00])
                    .text("ACME")
                    .text("Mainboard")
                    .text("MB-0042")
                    .text("MB-PN")
                    .field(0, &[0x01])
                    .sentinel()
                    .build(),
            )
            .area(
                AreaType::Product,
                Builder::new()
                    .u8(0x19)
                    .text("ACME")
                    .text("Server")
                    .text("SRV-1")
                    .text("A1")
                    .text("SRV-SN")
                    .text("TAG-7")
                    .field(0, &[])
                    .sentinel()
                    .build(),
            )
            .area(AreaType::MultiRecord, multi)
            .build()
    }

    #[test]
    fn all_areas() {
        let fru = Fru::decode(&full_image()).unwrap();
        assert_eq!(fru.areas().len(), 5);
        assert_eq!(fru.failed_areas().count(), 0);
        assert_eq!(fru.header().offsets(), [1, 2, 6, 11, 16]);
        assert_eq!(fru.info(AreaType::Board).unwrap().kind(), AreaType::Board);
        assert_eq!(
            &fru.internal_use().unwrap().as_bytes()[..5],
            &[0x01, 0xDE, 0xAD, 0xBE, 0xEF]
        );
        assert_eq!(
            fru.info(AreaType::Chassis)
                .unwrap()
                .property("Serial Number")
                .as_deref(),
            Some("CH-SN")
        );
        assert_eq!(
            fru.info(AreaType::Board)
                .unwrap()
                .property("Product Name")
                .as_deref(),
            Some("Mainboard")
        );
        assert_eq!(
            fru.info(AreaType::Product)
                .unwrap()
                .property("Asset Tag")
                .as_deref(),
            Some("TAG-7")
        );
        let multi = fru.multi_record().unwrap();
        assert_eq!(multi.power_supplies().count(), 1);
        assert_eq!(multi.dc_outputs().count(), 1);
    }

    #[test]
    fn corrupt_area_does_not_affect_others() {
        let mut image = full_image();
        let board = CommonHeader::parse(&image)
            .unwrap()
            .byte_offset(AreaType::Board)
            .unwrap();
        // a data byte inside the board area, behind format, length and language
        image[board + 3] ^= 0xFF;

        let fru = Fru::decode(&image).unwrap();
        match fru.area(AreaType::Board) {
            Some(Err(Error::ChecksumMismatch { unit, .. })) => {
                assert_eq!(*unit, Unit::Area(AreaType::Board))
            }
            other => panic!("Expected board checksum error, got: {:?}", other),
        }
        assert_eq!(fru.info(AreaType::Board), None);
        assert!(fru.info(AreaType::Chassis).is_some());
        assert!(fru.info(AreaType::Product).is_some());
        assert!(fru.multi_record().is_some());
        assert_eq!(
            fru.failed_areas().map(|(kind, _)| kind).collect::<Vec<_>>(),
            vec![AreaType::Board]
        );
    }

    #[test]
    fn broken_header_is_fatal() {
        let mut image = full_image();
        image[7] = image[7].wrapping_add(1);
        match Fru::decode(&image) {
            Err(Error::ChecksumMismatch {
                unit: Unit::CommonHeader,
                ..
            }) => (),
            other => panic!("Expected header checksum error, got: {:?}", other),
        }
        assert_eq!(
            Fru::decode(&[0x01, 0x00]),
            Err(Error::MalformedHeader("image shorter than eight bytes"))
        );
    }

    #[test]
    fn header_only() {
        let fru = Fru::decode(&common_header([0; 5])).unwrap();
        assert!(fru.areas().is_empty());
        assert_eq!(fru.to_string(), "");
    }

    #[test]
    fn area_beyond_image() {
        let mut image = common_header([0, 0, 0, 4, 0]);
        image.extend(&[0x01, 0x01]);
        let fru = Fru::decode(&image).unwrap();
        match fru.area(AreaType::Product) {
            Some(Err(Error::TruncatedData { .. })) => (),
            other => panic!("Expected truncated product area, got: {:?}", other),
        }
        assert_eq!(fru.area(AreaType::Board), None);
    }

    #[test]
    fn display_lists_areas() {
        let text = Fru::decode(&full_image()).unwrap().to_string();
        assert!(text.contains("Internal Use area"));
        assert!(text.contains("  Part Number: CH-PN"));
        assert!(text.contains("  Manufacturer: ACME"));
        assert!(text.contains("  Power Supply Information"));
        assert!(text.contains("    HotSwap: true"));
        assert!(text.contains("  DC Output"));
    }
}
