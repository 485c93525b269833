//! Byte strings written as hexadecimal digits, e.g. `01000001`.

use serde::Deserialize;
use std::convert::TryFrom;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct HexBytes(Vec<u8>);

impl HexBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl FromStr for HexBytes {
    type Err = ParseHexError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let digits: Vec<char> = source
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_')
            .collect();
        if digits.is_empty() {
            return Err(ParseHexError::Blank);
        }
        if digits.len() % 2 != 0 {
            return Err(ParseHexError::OddLength {
                offending_input: source.to_string(),
            });
        }

        digits
            .chunks(2)
            .map(|pair| {
                let high = pair[0].to_digit(16);
                let low = pair[1].to_digit(16);
                match (high, low) {
                    (Some(high), Some(low)) => Ok((high << 4 | low) as u8),
                    _ => Err(ParseHexError::Digit {
                        offending_input: pair.iter().collect(),
                    }),
                }
            })
            .collect::<Result<Vec<u8>, _>>()
            .map(HexBytes)
    }
}

impl TryFrom<String> for HexBytes {
    type Error = ParseHexError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        source.parse()
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseHexError {
    #[error("Could not parse blank string as bytes")]
    Blank,
    #[error("Hex string `{offending_input}` has an odd number of digits")]
    OddLength { offending_input: String },
    #[error("`{offending_input}` is not a hexadecimal byte")]
    Digit { offending_input: String },
}
