//! UPC-E, the zero-suppressed six digit form of a UPC-A number.

use log::debug;

use crate::checksum;
use crate::error::EncodeError;
use crate::external::{CcColumns, CompositeEncoder};
use crate::layout::{self, CcStack};
use crate::region::PrintRegion;
use crate::symbologies::{padded_primary, split_composite, unpack_digit};
use crate::tables;
use crate::{Encoder, RasterOrder, Symbol};

pub(crate) const ELEMENTS: usize = 35;
pub(crate) const WIDTH: u16 = 65;
pub(crate) const HEIGHT: u32 = 74;

const CC_LEFT_PAD: u16 = 3;
const CC_RIGHT_PAD: u16 = 5;

/// Compresses a 12-digit number into its six digit UPC-E form.
///
/// The four zero-suppression rules are mutually exclusive in practice
/// and are tried in order, first match wins. Data matching none of them
/// cannot be carried by UPC-E and is rejected rather than guessed at.
fn compress(s: &[u8; 13]) -> Result<[u8; 6], EncodeError> {
    let mut data6 = [0u8; 6];
    data6[..5].copy_from_slice(&s[2..7]);

    if (b'0'..=b'2').contains(&s[4]) && s[5..9] == *b"0000" {
        // 00abc0000hij becomes abhijc, c in 0..=2
        data6[2] = s[9];
        data6[3] = s[10];
        data6[4] = s[11];
        data6[5] = s[4];
    } else if s[5..10] == *b"00000" {
        // 00abc00000ij becomes abcij3
        data6[3] = s[10];
        data6[4] = s[11];
        data6[5] = b'3';
    } else if s[6..11] == *b"00000" {
        // 00abcd00000j becomes abcdj4
        data6[4] = s[11];
        data6[5] = b'4';
    } else if (b'5'..=b'9').contains(&s[11]) && s[7..11] == *b"0000" {
        // 00abcde0000j becomes abcdej, j in 5..=9
        data6[5] = s[11];
    } else {
        return Err(EncodeError::UpcEConversion);
    }
    Ok(data6)
}

/// Encodes a 13-digit primary, writing the check digit back. The A/B
/// parity of the six digits is keyed by the check digit of the full
/// 12-digit number, not by a data digit.
pub(crate) fn pattern(primary: &mut [u8; 13]) -> Result<[u8; ELEMENTS], EncodeError> {
    checksum::check_digit(primary);
    let data6 = compress(primary)?;
    debug!("UPC-E short form {}", core::str::from_utf8(&data6).expect("digits"));

    let mut pat = [0u8; ELEMENTS];
    pat[..4].copy_from_slice(&tables::LEFT_GUARD);
    let mut p = 4;

    let ab = tables::AB_UPCE[usize::from(primary[12] - b'0')];
    for (i, &digit) in data6.iter().enumerate() {
        let digit = usize::from(digit - b'0');
        let bars = if ab & (0x20 >> i) != 0 {
            tables::DIGIT_SET_A[digit]
        } else {
            tables::DIGIT_SET_B[digit]
        };
        unpack_digit(bars, &mut pat[p..p + 4]);
        p += 4;
    }
    pat[p..p + 7].copy_from_slice(&tables::UPCE_RIGHT_GUARD);
    Ok(pat)
}

pub(crate) fn encode<P, C, V>(enc: &Encoder<P, C, V>, data: &str) -> Result<Symbol, EncodeError>
where
    C: CompositeEncoder,
{
    let (primary, cc_data) = split_composite(data);
    let mut scratch = padded_primary(primary)?;
    let linear = pattern(&mut scratch)?;
    let primary = String::from_utf8(scratch.to_vec()).expect("scratch is ASCII digits");
    debug!("UPC-E {primary}: {linear:?}");

    let pix = u32::from(enc.pix_mult);
    let region = PrintRegion {
        pattern: linear.to_vec(),
        left_pad: 0,
        right_pad: 0,
        height: pix * HEIGHT,
        white_first: true,
        guards: false,
        reverse: false,
    };

    let (mut regions, width, height) = match cc_data {
        Some(cc_data) => {
            let cc = enc
                .composite
                .encode(cc_data.as_bytes(), CcColumns::Two)
                .ok_or(EncodeError::Composite)?;
            let rows = cc.rows.len() as u32;
            let pads = CcStack { cc_left: CC_LEFT_PAD, cc_right: CC_RIGHT_PAD, sep_left: 0 };
            let regions = layout::stack_composite(region, &cc, pads, WIDTH, pix);
            (regions, pix * u32::from(WIDTH), pix * (rows * 2 + 6 + HEIGHT))
        }
        None => (vec![region], pix * u32::from(WIDTH), pix * HEIGHT),
    };

    if enc.raster == RasterOrder::BottomUp {
        regions.reverse();
    }
    Ok(Symbol { regions, width, height, primary: Some(primary) })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expands a six digit short form back to twelve digits, inverting
    /// the suppression rule named by the last digit.
    fn expand(data6: &[u8; 6]) -> [u8; 12] {
        let mut s = *b"000000000000";
        s[2] = data6[0];
        s[3] = data6[1];
        match data6[5] {
            b'0'..=b'2' => {
                s[4] = data6[5];
                s[9] = data6[2];
                s[10] = data6[3];
                s[11] = data6[4];
            }
            b'3' => {
                s[4] = data6[2];
                s[10] = data6[3];
                s[11] = data6[4];
            }
            b'4' => {
                s[4] = data6[2];
                s[5] = data6[3];
                s[11] = data6[4];
            }
            _ => {
                s[4] = data6[2];
                s[5] = data6[3];
                s[6] = data6[4];
                s[11] = data6[5];
            }
        }
        s
    }

    #[test]
    fn compression_rules_round_trip() {
        let cases: [&[u8; 13]; 4] = [
            b"0012100006930", // rule for trailing digit 0..=2
            b"0034500000120", // five zero rule, suffix 3
            b"0067890000050", // four digit prefix rule, suffix 4
            b"0012345000070", // single non-zero trailing digit 5..=9
        ];
        for case in cases {
            let data6 = compress(case).unwrap();
            let expanded = expand(&data6);
            assert_eq!(&expanded, &case[..12], "short form {:?}", data6);
        }
    }

    #[test]
    fn unconvertible_data_is_rejected() {
        assert_eq!(compress(b"0012345678900"), Err(EncodeError::UpcEConversion));
        // trailing digit below 5 fails the last rule
        assert_eq!(compress(b"0012345000040"), Err(EncodeError::UpcEConversion));
    }

    #[test]
    fn known_pattern() {
        let mut primary = *b"1234500000650";
        let pat = pattern(&mut primary).unwrap();
        assert_eq!(&primary, b"1234500000652");
        let expected: [u8; ELEMENTS] = [
            7, 1, 1, 1, // left guard
            1, 1, 4, 1, // 3 in set B
            2, 3, 1, 1, // 4 in set B
            1, 2, 3, 1, // 5 in set A
            1, 1, 1, 4, // 6 in set A
            1, 3, 2, 1, // 5 in set B
            1, 4, 1, 1, // 3 in set A
            1, 1, 1, 1, 1, 1, 7, // right guard
        ];
        assert_eq!(pat, expected);
        let modules: u32 = pat.iter().map(|&w| u32::from(w)).sum();
        assert_eq!(modules, u32::from(WIDTH));
    }
}
