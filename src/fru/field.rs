//! Type/length encoded fields of the chassis, board and product areas.

use super::{AreaType, Error, Result, Unit};
use std::fmt::{self, Display, Formatter};

/// Type/length byte marking the end of the fields of an area.
pub const SENTINEL: u8 = 0xC1;

const TYPE_CODE_SHIFT: u8 = 6;
const LENGTH_MASK: u8 = 0b0011_1111;

/// Interpretation of the data bytes, from the upper two bits of the
/// type/length byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeCode {
    Binary,
    BcdPlus,
    SixBitAscii,
    /// 8-bit ASCII or Latin-1 for English, UNICODE for other languages.
    Text,
}

impl From<u8> for TypeCode {
    /// Interprets the upper two bits of a type/length byte.
    fn from(type_length: u8) -> Self {
        match type_length >> TYPE_CODE_SHIFT {
            0b00 => TypeCode::Binary,
            0b01 => TypeCode::BcdPlus,
            0b10 => TypeCode::SixBitAscii,
            _ => TypeCode::Text,
        }
    }
}

/// A single type/length field with its data bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    type_code: TypeCode,
    data: Vec<u8>,
}

impl Field {
    pub fn new(type_code: TypeCode, data: &[u8]) -> Self {
        Field {
            type_code,
            data: data.to_vec(),
        }
    }

    pub fn type_code(&self) -> TypeCode {
        self.type_code
    }

    /// Data bytes, without the type/length byte.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..]
    }

    /// Renders the data according to the type code, trimming trailing
    /// spaces and NUL characters.
    pub fn text(&self) -> String {
        let text: String = match self.type_code {
            TypeCode::Binary => self.data.iter().map(|b| format!("{:02X}", b)).collect(),
            TypeCode::BcdPlus => bcd_plus(&self.data),
            TypeCode::SixBitAscii => six_bit_ascii(&self.data),
            TypeCode::Text => self.data.iter().map(|&b| b as char).collect(),
        };
        text.trim_end_matches(|c: char| c == ' ' || c == '\0').to_string()
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

fn bcd_plus(data: &[u8]) -> String {
    fn digit(nibble: u8) -> char {
        match nibble {
            0x0..=0x9 => (b'0' + nibble) as char,
            0xA => ' ',
            0xB => '-',
            0xC => '.',
            _ => '?',
        }
    }
    data.iter()
        .flat_map(|&b| vec![digit(b >> 4), digit(b & 0x0F)])
        .collect()
}

/// Four characters are packed into three bytes, least significant bits
/// first.
fn six_bit_ascii(data: &[u8]) -> String {
    let mut text = String::with_capacity(data.len() * 4 / 3);
    for group in data.chunks(3) {
        let bits = group
            .iter()
            .enumerate()
            .fold(0_u32, |acc, (i, &b)| acc | (b as u32) << (8 * i));
        let chars = group.len() * 8 / 6;
        for i in 0..chars {
            let six = (bits >> (6 * i)) & 0x3F;
            text.push((0x20 + six as u8) as char);
        }
    }
    text
}

/// Walks the fields of an area, starting after the area specific leading
/// bytes.
pub struct FieldReader<'a> {
    area: AreaType,
    data: &'a [u8],
    cursor: usize,
}

impl<'a> FieldReader<'a> {
    /// `data` should not include the checksum byte of the area.
    pub fn new(area: AreaType, data: &'a [u8], start: usize) -> Self {
        FieldReader {
            area,
            data,
            cursor: start,
        }
    }

    /// Offset of the next type/length byte.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Reads a field that the area is expected to have. Returns `None` if
    /// the sentinel is found instead, which some vendors write in place of
    /// fields they leave out.
    pub fn fixed(&mut self) -> Result<Option<Field>> {
        if self.cursor >= self.data.len() {
            return Err(Error::truncated(
                self.unit(),
                self.cursor + 1,
                self.data.len(),
            ));
        }
        self.next_field()
    }

    /// Reads the next custom field, or `None` at the sentinel or the end of
    /// the area.
    pub fn next_custom(&mut self) -> Result<Option<Field>> {
        if self.cursor >= self.data.len() {
            return Ok(None);
        }
        self.next_field()
    }

    /// Reads all remaining fields up to the sentinel or the end of the area.
    #[cfg(test)]
    pub fn custom(&mut self) -> Result<Vec<Field>> {
        let mut fields = vec![];
        while let Some(field) = self.next_custom()? {
            fields.push(field);
        }
        Ok(fields)
    }

    fn next_field(&mut self) -> Result<Option<Field>> {
        let type_length = self.data[self.cursor];
        if type_length == SENTINEL {
            return Ok(None);
        }

        // 0xC1 is also the only text field of length one, which is reserved,
        // so every other byte is a valid type/length
        let type_code = TypeCode::from(type_length);
        let len = (type_length & LENGTH_MASK) as usize;

        let start = self.cursor + 1;
        let end = start + len;
        if end > self.data.len() {
            return Err(Error::truncated(self.unit(), end, self.data.len()));
        }

        let field = Field::new(type_code, &self.data[start..end]);
        self.cursor = end;
        Ok(Some(field))
    }

    fn unit(&self) -> Unit {
        Unit::Field {
            area: self.area,
            offset: self.cursor,
        }
    }
}
