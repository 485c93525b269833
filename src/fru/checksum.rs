/// Two's complement of the byte sum, so that the sum of `data` plus the
/// returned checksum is zero modulo 256.
pub fn checksum(data: &[u8]) -> u8 {
    (!data.iter().cloned().fold(0, u8::wrapping_add)).wrapping_add(1)
}

/// Checks a block whose last byte is the checksum over everything before it.
pub fn is_zero_sum(block: &[u8]) -> bool {
    block.iter().cloned().fold(0, u8::wrapping_add) == 0
}
