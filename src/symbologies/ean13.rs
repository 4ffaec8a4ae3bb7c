//! EAN-13, also covering UPC-A through its leading zero.

use log::debug;

use crate::checksum;
use crate::error::EncodeError;
use crate::external::{CcColumns, CompositeEncoder};
use crate::layout::{self, CcStack};
use crate::region::PrintRegion;
use crate::symbologies::{padded_primary, split_composite, unpack_digit};
use crate::tables;
use crate::{Encoder, RasterOrder, Symbol};

/// Elements of the full symbol, quiet zones included.
pub(crate) const ELEMENTS: usize = 61;
/// Symbol width in modules, with 7X quiet zones.
pub(crate) const WIDTH: u16 = 109;
/// Symbol height in modules.
pub(crate) const HEIGHT: u32 = 74;

/// Quiet zone minus the composite offset.
const CC_LEFT_PAD: u16 = 3;
const CC_RIGHT_PAD: u16 = 5;

/// Encodes a 13-digit primary, check digit placeholder included, into
/// the element pattern. The computed check digit is written back into
/// the scratch buffer.
pub(crate) fn pattern(primary: &mut [u8; 13]) -> [u8; ELEMENTS] {
    checksum::check_digit(primary);

    let mut pat = [0u8; ELEMENTS];
    pat[..4].copy_from_slice(&tables::LEFT_GUARD);
    let mut p = 4;
    let mut s = 1;

    let ab = tables::AB_EAN13[usize::from(primary[0] - b'0')];
    for i in 0..6 {
        let digit = usize::from(primary[s] - b'0');
        s += 1;
        let bars = if ab & (0x20 >> i) == 0 {
            tables::DIGIT_SET_A[digit]
        } else {
            tables::DIGIT_SET_B[digit]
        };
        unpack_digit(bars, &mut pat[p..p + 4]);
        p += 4;
    }

    pat[p..p + 5].copy_from_slice(&tables::CENTER_GUARD);
    p += 5;

    for _ in 0..6 {
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
    debug!("EAN-13 {primary}: {linear:?}");

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
                .encode(cc_data.as_bytes(), CcColumns::Four)
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
