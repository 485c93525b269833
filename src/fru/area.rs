use super::{
    checksum::{checksum, is_zero_sum},
    AreaType, CommonHeader, Error, Result, Unit, BLOCK_LEN,
};
use tracing::{debug, warn};

const FORMAT_VERSION: u8 = 1;
/// Format and length byte in front of chassis, board and product areas.
const AREA_HEADER_LEN: usize = 2;

/// Bytes of a single area, copied out of the image.
///
/// For chassis, board and product areas the contents are guaranteed to be
/// at least one block long, to start with format version 1 and to sum to
/// zero including the trailing checksum byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    kind: AreaType,
    offset: usize,
    data: Vec<u8>,
}

impl Area {
    pub fn kind(&self) -> AreaType {
        self.kind
    }

    /// Byte offset of the area in the image.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// All bytes of the area, including headers and the checksum.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..]
    }

    /// Area bytes without the trailing checksum, if the area has one.
    pub fn contents(&self) -> &[u8] {
        if self.kind.has_declared_length() {
            &self.data[..self.data.len() - 1]
        } else {
            &self.data[..]
        }
    }
}

/// Cuts every area the header declares out of the image. A failure of one
/// area does not affect the others.
pub fn extract(image: &[u8], header: &CommonHeader) -> Vec<(AreaType, Result<Area>)> {
    warn_if_out_of_order(header);
    header
        .present()
        .map(|(area, offset)| (area, extract_area(image, header, area, offset)))
        .collect()
}

fn extract_area(
    image: &[u8],
    header: &CommonHeader,
    area: AreaType,
    offset: usize,
) -> Result<Area> {
    let unit = Unit::Area(area);
    if offset + AREA_HEADER_LEN > image.len() {
        return Err(Error::truncated(unit, offset + AREA_HEADER_LEN, image.len()));
    }

    let end = if area.has_declared_length() {
        let len = image[offset + 1] as usize * BLOCK_LEN;
        if len == 0 {
            return Err(Error::truncated(unit, BLOCK_LEN, 0));
        }
        if offset + len > image.len() {
            return Err(Error::truncated(unit, offset + len, image.len()));
        }
        offset + len
    } else {
        derived_end(image, header, area, offset)?
    };

    let data = &image[offset..end];
    debug!(
        "Found {area} area at offset {offset} with {len} bytes",
        area = area,
        offset = offset,
        len = data.len()
    );

    if area.has_declared_length() {
        verify(area, data)?;
    }

    Ok(Area {
        kind: area,
        offset,
        data: data.to_vec(),
    })
}

/// Areas without a length field end where the next area starts, or at the
/// end of the image.
fn derived_end(image: &[u8], header: &CommonHeader, area: AreaType, offset: usize) -> Result<usize> {
    let mut end = image.len();
    for (other, other_offset) in header.present() {
        if other == area {
            continue;
        }
        if other_offset == offset {
            return Err(Error::OverlappingAreas { area, other });
        }
        if other_offset > offset && other_offset < end {
            end = other_offset;
        }
    }
    Ok(end)
}

fn verify(area: AreaType, data: &[u8]) -> Result<()> {
    if data[0] != FORMAT_VERSION {
        return Err(Error::UnsupportedAreaFormat {
            area,
            version: data[0],
        });
    }

    if !is_zero_sum(data) {
        let received = data[data.len() - 1];
        let expected = checksum(&data[..data.len() - 1]);
        return Err(Error::checksum(Unit::Area(area), expected, received));
    }
    Ok(())
}

fn warn_if_out_of_order(header: &CommonHeader) {
    let offsets: Vec<(AreaType, usize)> = header.present().collect();
    for pair in offsets.windows(2) {
        let ((first, first_offset), (second, second_offset)) = (pair[0], pair[1]);
        if first_offset >= second_offset {
            warn!(
                "{first} area at {first_offset} does not precede {second} area at {second_offset}",
                first = first,
                first_offset = first_offset,
                second = second,
                second_offset = second_offset
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::super::builder::{common_header, Builder, Image};
    use super::*;

    fn board() -> Vec<u8> {
        Builder::new()
            .u8(0x19)
            .buf(&[0, 0, 0])
            .text("ACME")
            .sentinel()
            .build()
    }

    fn product() -> Vec<u8> {
        Builder::new().u8(0x19).text("Widget").sentinel().build()
    }

    fn extract_image(image: &[u8]) -> Vec<(AreaType, Result<Area>)> {
        extract(image, &CommonHeader::parse(image).unwrap())
    }

    #[test]
    fn two_valid_areas() {
        let image = Image::new()
            .area(AreaType::Board, board())
            .area(AreaType::Product, product())
            .build();
        let areas = extract_image(&image);
        assert_eq!(areas.len(), 2);

        let (kind, board_area) = &areas[0];
        let board_area = board_area.as_ref().unwrap();
        assert_eq!(*kind, AreaType::Board);
        assert_eq!(board_area.offset(), 8);
        assert_eq!(board_area.as_bytes(), &board()[..]);
        assert_eq!(board_area.contents().len(), board().len() - 1);

        let (kind, product_area) = &areas[1];
        assert_eq!(*kind, AreaType::Product);
        assert_eq!(product_area.as_ref().unwrap().as_bytes(), &product()[..]);
    }

    #[test]
    fn corrupt_area_does_not_affect_sibling() {
        let mut corrupt = board();
        let last = corrupt.len() - 1;
        corrupt[last] = corrupt[last].wrapping_add(1);
        let image = Image::new()
            .area(AreaType::Board, corrupt)
            .area(AreaType::Product, product())
            .build();

        let areas = extract_image(&image);
        match &areas[0] {
            (AreaType::Board, Err(Error::ChecksumMismatch { unit, .. })) => {
                assert_eq!(*unit, Unit::Area(AreaType::Board))
            }
            other => panic!("Unexpected board result: {:?}", other),
        }
        match &areas[1] {
            (AreaType::Product, Ok(area)) => assert_eq!(area.as_bytes(), &product()[..]),
            other => panic!("Unexpected product result: {:?}", other),
        }
    }

    #[test]
    fn declared_length_beyond_image() {
        let mut image = Image::new().area(AreaType::Board, board()).build();
        image.truncate(image.len() - 3);
        match &extract_image(&image)[0] {
            (_, Err(Error::TruncatedData { needed, available, .. })) => {
                assert_eq!(*needed, 8 + board().len());
                assert_eq!(*available, image.len());
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn offset_beyond_image() {
        let image = common_header([0, 0, 4, 0, 0]);
        match &extract_image(&image)[0] {
            (AreaType::Board, Err(Error::TruncatedData { needed, .. })) => {
                assert_eq!(*needed, 34)
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn zero_length_area() {
        let mut image = common_header([0, 1, 0, 0, 0]);
        image.extend(&[0x01, 0x00, 0x00, 0xff]);
        match &extract_image(&image)[0] {
            (AreaType::Chassis, Err(Error::TruncatedData { .. })) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn wrong_area_format() {
        let mut area = product();
        area[0] = 0x02;
        let last = area.len() - 1;
        area[last] = checksum(&area[..last]);
        let image = Image::new().area(AreaType::Product, area).build();
        assert_eq!(
            extract_image(&image)[0].1,
            Err(Error::UnsupportedAreaFormat {
                area: AreaType::Product,
                version: 2
            })
        );
    }

    #[test]
    fn multirecord_runs_to_end_of_image() {
        let records = vec![0xAB; 13];
        let image = Image::new()
            .area(AreaType::Product, product())
            .area(AreaType::MultiRecord, records)
            .build();
        let areas = extract_image(&image);
        let multi = areas[1].1.as_ref().unwrap();
        assert_eq!(multi.kind(), AreaType::MultiRecord);
        assert_eq!(multi.offset(), 8 + product().len());
        // padded to a whole block by the image builder
        assert_eq!(multi.as_bytes().len(), 16);
        assert_eq!(multi.contents(), multi.as_bytes());
    }

    #[test]
    fn internal_use_ends_at_next_area() {
        let image = Image::new()
            .area(AreaType::Internal, vec![0x01, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88])
            .area(AreaType::Board, board())
            .build();
        let areas = extract_image(&image);
        let internal = areas[0].1.as_ref().unwrap();
        assert_eq!(internal.as_bytes().len(), 16);
        assert_eq!(&internal.as_bytes()[..3], &[0x01, 0x11, 0x22]);
        assert!(areas[1].1.is_ok());
    }

    #[test]
    fn internal_use_ends_at_next_area_out_of_header_order() {
        // board first in the image, internal use after it
        let image = Image::new()
            .area(AreaType::Board, board())
            .area(AreaType::Internal, vec![0x01; 8])
            .build();
        let areas = extract_image(&image);
        let internal = areas[0].1.as_ref().unwrap();
        assert_eq!(internal.offset(), 8 + board().len());
        assert_eq!(internal.as_bytes(), &[0x01; 8]);
    }

    #[test]
    fn derived_length_area_sharing_offset() {
        let mut image = common_header([1, 0, 1, 0, 0]);
        image.extend(board());
        let areas = extract_image(&image);
        assert_eq!(
            areas[0].1,
            Err(Error::OverlappingAreas {
                area: AreaType::Internal,
                other: AreaType::Board
            })
        );
        assert!(areas[1].1.is_ok(), "Board area should still be extracted");
    }
}
