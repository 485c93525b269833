use super::{checksum::checksum, Error, Result, Unit};
use std::fmt::{self, Display, Formatter};

/// Size of the common header, which is also the size of a block.
pub const HEADER_LEN: usize = 8;
/// All offsets and area lengths are counted in blocks of this size.
pub const BLOCK_LEN: usize = 8;

const FORMAT_VERSION: u8 = 1;

/// The areas a FRU image can hold, in the order their offsets appear in
/// the common header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AreaType {
    Internal,
    Chassis,
    Board,
    Product,
    MultiRecord,
}

impl AreaType {
    pub const ALL: [AreaType; 5] = [
        AreaType::Internal,
        AreaType::Chassis,
        AreaType::Board,
        AreaType::Product,
        AreaType::MultiRecord,
    ];

    /// Index of the offset byte in the common header.
    fn header_index(self) -> usize {
        match self {
            AreaType::Internal => 1,
            AreaType::Chassis => 2,
            AreaType::Board => 3,
            AreaType::Product => 4,
            AreaType::MultiRecord => 5,
        }
    }

    /// Whether the area starts with a format byte and a length byte and ends
    /// with a checksum over its contents.
    pub fn has_declared_length(self) -> bool {
        matches!(
            self,
            AreaType::Chassis | AreaType::Board | AreaType::Product
        )
    }
}

impl Display for AreaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            AreaType::Internal => "Internal Use",
            AreaType::Chassis => "Chassis",
            AreaType::Board => "Board",
            AreaType::Product => "Product",
            AreaType::MultiRecord => "MultiRecord",
        };
        f.write_str(name)
    }
}

/// Validated common header, holding the area offsets in blocks as stored in
/// the image. Zero means that the area is absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommonHeader {
    offsets: [u8; 5],
}

impl CommonHeader {
    /// Validates the first eight bytes of `image` as a common header.
    pub fn parse(image: &[u8]) -> Result<Self> {
        if image.len() < HEADER_LEN {
            return Err(Error::MalformedHeader("image shorter than eight bytes"));
        }
        let header = &image[..HEADER_LEN];
        if header[0] != FORMAT_VERSION {
            return Err(Error::MalformedHeader("format version is not 1"));
        }

        let received = header[HEADER_LEN - 1];
        let expected = checksum(&header[..HEADER_LEN - 1]);
        if received != expected {
            return Err(Error::checksum(Unit::CommonHeader, expected, received));
        }

        let mut offsets = [0_u8; 5];
        offsets.copy_from_slice(&header[1..6]);
        Ok(CommonHeader { offsets })
    }

    /// Offsets of internal use, chassis, board, product and MultiRecord area
    /// in blocks, verbatim.
    pub fn offsets(&self) -> [u8; 5] {
        self.offsets
    }

    pub fn offset(&self, area: AreaType) -> u8 {
        self.offsets[area.header_index() - 1]
    }

    /// Byte offset of the area from the start of the image, or `None` if
    /// the area is absent.
    pub fn byte_offset(&self, area: AreaType) -> Option<usize> {
        match self.offset(area) {
            0 => None,
            blocks => Some(blocks as usize * BLOCK_LEN),
        }
    }

    /// Present areas with their byte offsets, in header order.
    pub fn present(&self) -> impl Iterator<Item = (AreaType, usize)> + '_ {
        AreaType::ALL
            .iter()
            .filter_map(move |&area| self.byte_offset(area).map(|offset| (area, offset)))
    }
}
