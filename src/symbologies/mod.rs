//! One encoder per supported symbology.

pub(crate) mod ean13;
pub(crate) mod ean8;
pub(crate) mod expanded;
pub(crate) mod upce;

use crate::error::EncodeError;

/// Splits a data string at the first `|` into primary data and optional
/// composite data.
pub(crate) fn split_composite(data: &str) -> (&str, Option<&str>) {
    match data.find('|') {
        Some(i) => (&data[..i], Some(&data[i + 1..])),
        None => (data, None),
    }
}

/// Right-aligns up to twelve digits into a 13-byte ASCII scratch buffer,
/// zero filled, with a zero placeholder where the check digit lands.
pub(crate) fn padded_primary(primary: &str) -> Result<[u8; 13], EncodeError> {
    if primary.len() > 12 {
        return Err(EncodeError::PrimaryTooLong(12));
    }
    if let Some(c) = primary.chars().find(|c| !c.is_ascii_digit()) {
        return Err(EncodeError::IllegalCharacter(c));
    }
    let mut buf = [b'0'; 13];
    buf[12 - primary.len()..12].copy_from_slice(primary.as_bytes());
    Ok(buf)
}

/// Unpacks the four nibble-packed element widths of one digit.
pub(crate) fn unpack_digit(bars: u16, out: &mut [u8]) {
    for (j, slot) in out.iter_mut().enumerate().take(4) {
        *slot = ((bars >> (12 - 4 * j)) & 0xF) as u8;
    }
}
