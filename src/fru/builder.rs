//! Assembles FRU images for tests, computing lengths, padding and checksums
//! so that fixtures only spell out the interesting bytes.

use super::{checksum::checksum, AreaType, BLOCK_LEN, HEADER_LEN};
use std::mem::take;

/// Builds a chassis, board or product area.
pub struct Builder {
    data: Vec<u8>,
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            data: vec![
                0x01, // format version
                0x00, // length in blocks, set on build
            ],
        }
    }

    /// Appends a single byte to the area.
    pub fn u8(&mut self, data: u8) -> &mut Self {
        self.data.push(data);
        self
    }

    /// Appends raw bytes to the area.
    pub fn buf(&mut self, data: &[u8]) -> &mut Self {
        self.data.extend(data);
        self
    }

    /// Appends a type/length byte followed by the data.
    pub fn field(&mut self, type_code: u8, data: &[u8]) -> &mut Self {
        assert!(data.len() < 64, "field data must fit into six bits of length");
        self.u8(type_code << 6 | data.len() as u8).buf(data)
    }

    /// Appends an 8-bit ASCII field.
    pub fn text(&mut self, text: &str) -> &mut Self {
        self.field(0b11, text.as_bytes())
    }

    pub fn sentinel(&mut self) -> &mut Self {
        self.u8(0xC1)
    }

    /// Pads to whole blocks, sets the length byte and appends the checksum,
    /// leaving a fresh builder in place.
    pub fn build(&mut self) -> Vec<u8> {
        let mut data = take(&mut self.data);
        *self = Builder::new();

        while (data.len() + 1) % BLOCK_LEN != 0 {
            data.push(0);
        }
        data[1] = ((data.len() + 1) / BLOCK_LEN) as u8;
        data.push(checksum(&data));
        data
    }
}

/// Common header with the given block offsets and a valid checksum.
pub fn common_header(offsets: [u8; 5]) -> Vec<u8> {
    let mut header = vec![0x01];
    header.extend(&offsets);
    header.push(0x00);
    header.push(checksum(&header));
    header
}

/// A MultiRecord with valid header and payload checksums.
pub fn record(type_id: u8, end_of_list: bool, payload: &[u8]) -> Vec<u8> {
    let params = if end_of_list { 0x82 } else { 0x02 };
    let mut header = vec![type_id, params, payload.len() as u8, checksum(payload)];
    header.push(checksum(&header));
    header.extend(payload);
    header
}

/// Lays out areas one after another behind a common header, each starting
/// on a block boundary.
pub struct Image {
    areas: Vec<(AreaType, Vec<u8>)>,
}

impl Image {
    pub fn new() -> Self {
        Image { areas: vec![] }
    }

    pub fn area(&mut self, area: AreaType, data: Vec<u8>) -> &mut Self {
        self.areas.push((area, data));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut offsets = [0_u8; 5];
        let mut body = vec![];
        for (area, data) in &self.areas {
            let idx = AreaType::ALL.iter().position(|a| a == area).unwrap();
            offsets[idx] = ((HEADER_LEN + body.len()) / BLOCK_LEN) as u8;
            body.extend(data);
            while body.len() % BLOCK_LEN != 0 {
                body.push(0);
            }
        }
        let mut image = common_header(offsets);
        image.extend(body);
        image
    }
}

#[cfg(test)]
mod test {
    use super::super::checksum::is_zero_sum;
    use super::*;

    #[test]
    fn area_is_padded_and_summed() {
        let area = Builder::new().u8(0x19).text("ACME").sentinel().build();
        assert_eq!(area.len() % BLOCK_LEN, 0, "Area not padded to whole blocks");
        assert_eq!(area[1] as usize * BLOCK_LEN, area.len());
        assert!(is_zero_sum(&area), "Area checksum does not sum to zero");
        assert_eq!(&area[2..8], &[0x19, 0xC4, b'A', b'C', b'M', b'E']);
    }

    #[test]
    fn record_checksums() {
        let record = record(0x01, true, &[1, 2, 3]);
        assert!(is_zero_sum(&record[..5]));
        assert_eq!(record[1] & 0x80, 0x80);
        assert_eq!(checksum(&record[5..]), record[3]);
    }

    #[test]
    fn image_offsets() {
        let image = Image::new()
            .area(AreaType::Board, vec![0; 16])
            .area(AreaType::Product, vec![0; 5])
            .build();
        assert_eq!(&image[1..6], &[0, 0, 1, 3, 0]);
        assert_eq!(image.len(), 8 + 16 + 8);
    }
}
