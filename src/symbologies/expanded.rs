//! DataBar Expanded.
//!
//! The data string is packed by the external bit packer into a bit
//! field; every symbol character is a 12-bit slice of that field,
//! expanded through the combinatorial bracket tables into an eight
//! element group. Characters pair up around finder patterns into double
//! segments, and the check character, fed by the running parity of every
//! data character, lands in the left slot of segment zero.

use log::debug;

use crate::checksum::{self, PARITY_MOD};
use crate::error::EncodeError;
use crate::external::{BitPacker, CcColumns, CompositeEncoder, Validator, BIT_FIELD_BYTES};
use crate::layout::{self, LayoutParams};
use crate::symbologies::split_composite;
use crate::tables;
use crate::widths;
use crate::{Encoder, RasterOrder, Symbol};

/// Elements of one double segment: two characters around one finder.
const PAIR_ELEMENTS: usize = 21;

/// Extracts the 12-bit value of symbol character `idx` from the packed
/// field. Slices alternate their nibble alignment: even indices take a
/// byte and the high nibble of the next, odd indices a low nibble and
/// the following byte.
fn slice12(field: &[u8; BIT_FIELD_BYTES], idx: usize) -> u16 {
    let ndx = idx * 3 / 2;
    if idx & 1 == 1 {
        (u16::from(field[ndx] & 0xF) << 8) | u16::from(field[ndx + 1])
    } else {
        (u16::from(field[ndx]) << 4) | u16::from(field[ndx + 1] >> 4)
    }
}

/// Expands one character value into its eight element widths, stored
/// into `bars` interleaved (odd group at 0,2,4,6) for a forward
/// character and mirrored for a reverse one. Returns the parity with
/// this character folded in; `weight` seeds the odd group and the even
/// group runs at three times the seed.
fn char_pattern(bars: &mut [u8], value: u16, parity: u16, weight: u16, forward: bool) -> u16 {
    let wgt_odd = weight % PARITY_MOD;
    let wgt_even = (wgt_odd * 3) % PARITY_MOD;

    let (bracket, reduced) = tables::bracket_for(value);
    let odd = widths::expand::<4>(reduced / bracket.odd_mul, bracket.odd_mods, bracket.odd_max, false);
    let even = widths::expand::<4>(reduced % bracket.odd_mul, bracket.even_mods, bracket.even_max, true);

    for (k, &width) in odd.iter().enumerate() {
        bars[if forward { 2 * k } else { 7 - 2 * k }] = width;
    }
    for (k, &width) in even.iter().enumerate() {
        bars[if forward { 2 * k + 1 } else { 6 - 2 * k }] = width;
    }

    let parity = checksum::accumulate(parity, wgt_odd, &odd);
    checksum::accumulate(parity, wgt_even, &even)
}

/// Builds the element stream for `size` data characters of `field`.
///
/// Returns the flattened pattern and the total character count, check
/// character included.
fn character_stream(field: &[u8; BIT_FIELD_BYTES], size: usize) -> (Vec<u8>, usize) {
    let pairs = (size + 2) / 2;
    let set = &tables::FINDER_SETS[(size - 2) / 2];
    let mut segments = vec![[0u8; PAIR_ELEMENTS]; pairs];
    let mut parity = 0u16;

    for (i, segment) in segments.iter_mut().enumerate() {
        let fndr = set[i];
        let weight_index = if fndr >= 0 { 2 * fndr as usize } else { 2 * (-fndr) as usize + 1 };

        // left character, unless this is the check character's slot
        if i > 0 {
            let weight = tables::PARITY_WEIGHTS[2 * (weight_index - 2)];
            parity = char_pattern(&mut segment[..8], slice12(field, 2 * i - 1), parity, weight, true);
        }

        let finder = &tables::FINDERS[fndr.unsigned_abs() as usize - 1];
        if fndr < 0 {
            segment[12] = finder[0];
            segment[11] = finder[1];
            segment[10] = finder[2];
            segment[9] = 1;
            segment[8] = 1;
        } else {
            segment[8] = finder[0];
            segment[9] = finder[1];
            segment[10] = finder[2];
            segment[11] = 1;
            segment[12] = 1;
        }

        // right character of the double segment, when one exists
        if size > 2 * i {
            let weight = tables::PARITY_WEIGHTS[2 * (weight_index - 2) + 1];
            parity = char_pattern(&mut segment[13..], slice12(field, 2 * i), parity, weight, false);
        }
    }

    let check = (size as u16 - 3) * PARITY_MOD + parity;
    char_pattern(&mut segments[0][..8], check, 0, 0, true);

    let chars = size + 1;
    let mut pattern = Vec::with_capacity((chars / 2) * PAIR_ELEMENTS + (chars & 1) * 13);
    let mut i = 0;
    while i + 1 < chars {
        pattern.extend_from_slice(&segments[i / 2]);
        i += 2;
    }
    if i == chars - 1 {
        pattern.extend_from_slice(&segments[i / 2][..13]);
    }
    (pattern, chars)
}

pub(crate) fn encode<P, C, V>(enc: &Encoder<P, C, V>, data: &str) -> Result<Symbol, EncodeError>
where
    P: BitPacker,
    C: CompositeEncoder,
    V: Validator,
{
    let (primary, cc_data) = split_composite(data);
    if cc_data.is_some() && enc.seg_width < 4 {
        return Err(EncodeError::CompositeTooNarrow);
    }

    let bytes = primary.as_bytes();
    if let Some(i) = enc.validator.first_invalid(bytes) {
        return Err(EncodeError::IllegalCharacter(char::from(bytes[i])));
    }
    if bytes.contains(&b'^') {
        return Err(EncodeError::IllegalCharacter('^'));
    }

    let mut field = [0u8; BIT_FIELD_BYTES];
    if cc_data.is_some() {
        field[0] = 0x80; // 2D linkage bit
    }
    let size = enc
        .packer
        .pack(bytes, enc.seg_width, &mut field)
        .ok_or(EncodeError::PackerData)?;
    // 4 to 22 characters with the check character included
    if !(3..=21).contains(&size) {
        return Err(EncodeError::PackerData);
    }

    // patch the variable length field of the encodation method in use
    if field[0] & 0x40 == 0x40 {
        field[0] |= ((((size + 1) & 1) as u8) << 5) + if size > 13 { 0x10 } else { 0 };
    }
    if field[0] & 0x60 == 0 {
        field[0] |= ((((size + 1) & 1) as u8) << 4) + if size > 13 { 8 } else { 0 };
    }
    if field[0] & 0x71 == 0x30 {
        field[0] |= ((((size + 1) & 1) as u8) << 1) + if size > 13 { 1 } else { 0 };
    }

    let (pattern, chars) = character_stream(&field, size);
    debug!("DataBar Expanded {primary}: {chars} characters, {pattern:?}");

    let cc = match cc_data {
        Some(cc_data) => Some(
            enc.composite
                .encode(cc_data.as_bytes(), CcColumns::Four)
                .ok_or(EncodeError::Composite)?,
        ),
        None => None,
    };

    let params = LayoutParams {
        seg_width: enc.seg_width,
        pix_mult: u32::from(enc.pix_mult),
        sep_ht: u32::from(enc.sep_ht),
    };
    let (mut regions, width_mods, height) = layout::layout_expanded(&pattern, chars, cc.as_ref(), &params);
    if enc.raster == RasterOrder::BottomUp {
        regions.reverse();
    }
    Ok(Symbol {
        regions,
        width: u32::from(enc.pix_mult) * width_mods as u32,
        height,
        primary: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::accumulate;
    use crate::external::Composite;
    use crate::{Encoder, Symbology};

    #[test]
    fn slices_alternate_nibble_alignment() {
        let mut field = [0u8; BIT_FIELD_BYTES];
        field[..3].copy_from_slice(&[0x12, 0x34, 0x56]);
        assert_eq!(slice12(&field, 0), 0x123);
        assert_eq!(slice12(&field, 1), 0x456);
    }

    #[test]
    fn char_pattern_places_and_accumulates() {
        let mut bars = [0u8; 8];
        let parity = char_pattern(&mut bars, 0, 0, 1, true);
        // odd group [1,1,3,7] interleaved with even group [1,1,1,2]
        assert_eq!(bars, [1, 1, 1, 1, 3, 1, 7, 2]);
        let expected = accumulate(accumulate(0, 1, &[1, 1, 3, 7]), 3, &[1, 1, 1, 2]);
        assert_eq!(parity, expected);

        let mut mirrored = [0u8; 8];
        let parity_rev = char_pattern(&mut mirrored, 0, 0, 1, false);
        assert_eq!(parity_rev, parity);
        let reversed: Vec<u8> = bars.iter().rev().copied().collect();
        assert_eq!(mirrored.to_vec(), reversed);
    }

    #[test]
    fn every_character_spans_seventeen_modules() {
        for value in [0u16, 347, 348, 2000, 4008] {
            let mut bars = [0u8; 8];
            char_pattern(&mut bars, value, 0, 1, true);
            let modules: u32 = bars.iter().map(|&w| u32::from(w)).sum();
            assert_eq!(modules, 17, "value {value}");
        }
    }

    struct FixedPacker {
        field: [u8; BIT_FIELD_BYTES],
        size: usize,
    }

    impl BitPacker for FixedPacker {
        fn pack(&self, _data: &[u8], _row_width: usize, field: &mut [u8; BIT_FIELD_BYTES]) -> Option<usize> {
            let linkage = field[0];
            *field = self.field;
            field[0] |= linkage;
            Some(self.size)
        }
    }

    struct NoCharset;

    impl Validator for NoCharset {
        fn first_invalid(&self, data: &[u8]) -> Option<usize> {
            data.iter().position(|b| !b.is_ascii_digit() && *b != b'(' && *b != b')')
        }
    }

    fn packer(size: usize) -> FixedPacker {
        let mut field = [0u8; BIT_FIELD_BYTES];
        // method bits chosen so no variable length patch applies
        field[0] = 0x20;
        field[1] = 0x10;
        field[2] = 0x02;
        field[4] = 0x30;
        FixedPacker { field, size }
    }

    fn encoder(size: usize) -> Encoder<FixedPacker, (), NoCharset> {
        Encoder::new(Symbology::DataBarExpanded)
            .with_packer(packer(size))
            .with_validator(NoCharset)
    }

    #[test]
    fn finders_follow_the_set_table() {
        let symbol = encoder(4).encode("(01)12345678901231").unwrap();
        assert_eq!(symbol.regions.len(), 1);
        let pattern = &symbol.regions[0].pattern;
        // five characters in three double segments
        assert_eq!(pattern.len(), 2 * 21 + 13);
        // finder sequence for four data characters is 1, -2, 2
        assert_eq!(&pattern[8..13], &[1, 8, 4, 1, 1]);
        assert_eq!(&pattern[21 + 8..21 + 13], &[1, 1, 4, 6, 3]);
        assert_eq!(&pattern[42 + 8..42 + 13], &[3, 6, 4, 1, 1]);
        // every character spans 17 modules
        for char_elements in [&pattern[0..8], &pattern[13..21], &pattern[21..29], &pattern[34..42], &pattern[42..50]] {
            let modules: u32 = char_elements.iter().map(|&w| u32::from(w)).sum();
            assert_eq!(modules, 17);
        }
    }

    #[test]
    fn check_character_matches_the_accumulated_parity() {
        let size = 4;
        let symbol = encoder(size).encode("(01)12345678901231").unwrap();
        let pattern = &symbol.regions[0].pattern;

        // replay the data characters in placement order to rebuild the
        // parity, then expand the check value it implies
        let field = packer(size).field;
        let mut parity = 0u16;
        let mut scratch = [0u8; 8];
        parity = char_pattern(&mut scratch, slice12(&field, 0), parity, tables::PARITY_WEIGHTS[1], false);
        parity = char_pattern(&mut scratch, slice12(&field, 1), parity, tables::PARITY_WEIGHTS[2 * 3], true);
        parity = char_pattern(&mut scratch, slice12(&field, 2), parity, tables::PARITY_WEIGHTS[2 * 3 + 1], false);
        parity = char_pattern(&mut scratch, slice12(&field, 3), parity, tables::PARITY_WEIGHTS[2 * 2], true);

        let mut check = [0u8; 8];
        char_pattern(&mut check, (size as u16 - 3) * PARITY_MOD + parity, 0, 0, true);
        assert_eq!(&pattern[..8], &check);
    }

    #[test]
    fn character_counts_outside_the_symbol_range_are_rejected() {
        assert_eq!(encoder(2).encode("(01)1").unwrap_err(), EncodeError::PackerData);
        assert_eq!(encoder(22).encode("(01)1").unwrap_err(), EncodeError::PackerData);
    }

    #[test]
    fn reserved_separator_is_rejected_by_name() {
        let err = encoder(4).encode("(01)123^456").unwrap_err();
        assert_eq!(err, EncodeError::IllegalCharacter('^'));
        let err = encoder(4).encode("(01)123x456").unwrap_err();
        assert_eq!(err, EncodeError::IllegalCharacter('x'));
    }

    #[test]
    fn narrow_rows_cannot_carry_a_composite() {
        let enc = encoder(4).with_seg_width(2);
        assert_eq!(
            enc.encode("(01)1|(21)2").unwrap_err(),
            EncodeError::CompositeTooNarrow
        );
    }

    #[test]
    fn missing_composite_encoder_fails_cleanly() {
        let enc = encoder(4).with_seg_width(4);
        assert_eq!(enc.encode("(01)1|(21)2").unwrap_err(), EncodeError::Composite);
    }

    struct StubComposite;

    impl CompositeEncoder for StubComposite {
        fn encode(&self, _data: &[u8], columns: CcColumns) -> Option<Composite> {
            assert_eq!(columns, CcColumns::Four);
            Some(Composite {
                rows: vec![vec![1, 2, 1]; 3],
                width: 98,
                class: crate::external::CcClass::B,
            })
        }
    }

    #[test]
    fn linkage_bit_reaches_the_packer() {
        struct LinkageProbe;
        impl BitPacker for LinkageProbe {
            fn pack(&self, _data: &[u8], _row_width: usize, field: &mut [u8; BIT_FIELD_BYTES]) -> Option<usize> {
                assert_eq!(field[0] & 0x80, 0x80);
                field[0] |= 0x20;
                Some(4)
            }
        }
        let enc = Encoder::new(Symbology::DataBarExpanded)
            .with_packer(LinkageProbe)
            .with_composite(StubComposite)
            .with_validator(NoCharset)
            .with_seg_width(8);
        let symbol = enc.encode("(01)1|(21)2").unwrap();
        // three composite rows, one separator, one linear row
        assert_eq!(symbol.regions.len(), 5);
    }
}
