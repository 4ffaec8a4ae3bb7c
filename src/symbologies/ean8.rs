//! EAN-8.

use log::debug;

use crate::checksum;
use crate::error::EncodeError;
use crate::external::{CcClass, CcColumns, CompositeEncoder};
use crate::layout::{self, CcStack};
use crate::region::PrintRegion;
use crate::symbologies::{padded_primary, split_composite, unpack_digit};
use crate::tables;
use crate::{Encoder, RasterOrder, Symbol};

pub(crate) const ELEMENTS: usize = 45;
pub(crate) const WIDTH: u16 = 81;
pub(crate) const HEIGHT: u32 = 60;

/// Quiet zone minus the CC-A offset.
const CCA_LEFT_PAD: u16 = 2;
const CC_RIGHT_PAD: u16 = 5;
/// Left pad of the linear symbol when a CC-B is attached.
const CCB_LINEAR_PAD: u16 = 8;

/// Encodes the trailing eight digits of the 13-digit scratch buffer,
/// writing the check digit back. EAN-8 has no A/B parity selection; both
/// halves come from set A.
pub(crate) fn pattern(primary: &mut [u8; 13]) -> [u8; ELEMENTS] {
    checksum::check_digit(primary);

    let mut pat = [0u8; ELEMENTS];
    pat[..4].copy_from_slice(&tables::LEFT_GUARD);
    let mut p = 4;
    let mut s = 5;

    for _ in 0..4 {
        let digit = usize::from(primary[s] - b'0');
        s += 1;
        unpack_digit(tables::DIGIT_SET_A[digit], &mut pat[p..p + 4]);
        p += 4;
    }
    pat[p..p + 5].copy_from_slice(&tables::CENTER_GUARD);
    p += 5;
    for _ in 0..4 {
        let digit = usize::from(primary[s] - b'0');
        s += 1;
        unpack_digit(tables::DIGIT_SET_A[digit], &mut pat[p..p + 4]);
        p += 4;
    }
    pat[p..p + 4].copy_from_slice(&tables::RIGHT_GUARD);
    pat
}

pub(crate) fn encode<P, C, V>(enc: &Encoder<P, C, V>, data: &str) -> Result<Symbol, EncodeError>
where
    C: CompositeEncoder,
{
    let (primary, cc_data) = split_composite(data);
    let mut scratch = padded_primary(primary)?;
    let linear = pattern(&mut scratch);
    let primary = String::from_utf8(scratch.to_vec()).expect("scratch is ASCII digits");
    debug!("EAN-8 {primary}: {linear:?}");

    let pix = u32::from(enc.pix_mult);
    let mut region = PrintRegion {
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
                .encode(cc_data.as_bytes(), CcColumns::Three)
                .ok_or(EncodeError::Composite)?;
            // a CC-B is wider than the symbol, so the linear part and
            // the separators shift right instead of padding the CC
            let (linear_pad, cc_left) = match cc.class {
                CcClass::A => (0, CCA_LEFT_PAD),
                CcClass::B => (CCB_LINEAR_PAD, 0),
            };
            region.left_pad = linear_pad;
            let rows = cc.rows.len() as u32;
            let pads = CcStack { cc_left, cc_right: CC_RIGHT_PAD, sep_left: linear_pad };
            let regions = layout::stack_composite(region, &cc, pads, WIDTH, pix);
            (
                regions,
                pix * u32::from(WIDTH + linear_pad),
                pix * (rows * 2 + 6 + HEIGHT),
            )
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

    #[test]
    fn known_pattern() {
        let mut primary = *b"0000012345650";
        let pat = pattern(&mut primary);
        assert_eq!(&primary, b"0000012345656");
        let expected: [u8; ELEMENTS] = [
            7, 1, 1, 1, // left guard
            2, 2, 2, 1, // 1
            2, 1, 2, 2, // 2
            1, 4, 1, 1, // 3
            1, 1, 3, 2, // 4
            1, 1, 1, 1, 1, // center guard
            1, 2, 3, 1, // 5
            1, 1, 1, 4, // 6
            1, 2, 3, 1, // 5
            1, 1, 1, 4, // 6, the check digit
            1, 1, 1, 7, // right guard
        ];
        assert_eq!(pat, expected);
    }

    #[test]
    fn pattern_totals_are_fixed() {
        for primary in [*b"0000000000000", *b"0000099999990"] {
            let mut scratch = primary;
            let pat = pattern(&mut scratch);
            let modules: u32 = pat.iter().map(|&w| u32::from(w)).sum();
            assert_eq!(modules, u32::from(WIDTH));
        }
    }

    #[test]
    fn one_digit_change_moves_the_check_digit() {
        let mut a = *b"0000012345650";
        let mut b = *b"0000012345550";
        let pat_a = pattern(&mut a);
        let pat_b = pattern(&mut b);
        assert_ne!(a[12], b[12]);
        assert_ne!(pat_a, pat_b);
    }
}
