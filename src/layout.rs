//! Row layout for stacked and composite symbols.
//!
//! DataBar Expanded characters are 17 modules wide, finders 15, and a
//! printed row carries a narrow guard pair on each side. The compositor
//! here slices a character stream into rows, decides each row's leading
//! color and reversal, and weaves the separator strips in between. It is
//! a pure function of its arguments; regions come back in top to bottom
//! order and the caller flips the sequence for bottom up rasters.

use crate::external::Composite;
use crate::region::PrintRegion;

/// Modules of one symbol character.
const CHAR_MODS: usize = 17;
/// Modules of one finder pattern.
const FINDER_MODS: usize = 15;
/// Elements of a double segment, two characters around one finder.
const PAIR_ELEMENTS: usize = 21;
/// Modules of a double segment.
const PAIR_MODS: usize = CHAR_MODS + FINDER_MODS + CHAR_MODS;
/// Pixel height of one linear row per module of magnification.
const ROW_HEIGHT: u32 = 34;
/// Quiet modules between the left edge and an attached composite.
const CC_LEFT_PAD: u16 = 1;

#[derive(Debug, Clone, Copy)]
pub(crate) struct LayoutParams {
    /// Maximum symbol characters per row. Kept even by the encoder
    /// configuration so rows break on double segment boundaries.
    pub seg_width: usize,
    pub pix_mult: u32,
    pub sep_ht: u32,
}

/// Element offset of the boundary before character `c` in the flattened
/// pattern.
fn element_offset(c: usize) -> usize {
    (c / 2) * PAIR_ELEMENTS + (c & 1) * 8
}

/// Module offset of the same boundary.
fn module_offset(c: usize) -> usize {
    (c / 2) * PAIR_MODS + (c & 1) * CHAR_MODS
}

/// Element count of the whole stream; a trailing odd character keeps its
/// finder.
fn total_elements(segs: usize) -> usize {
    (segs / 2) * PAIR_ELEMENTS + (segs & 1) * 13
}

fn total_modules(segs: usize) -> usize {
    (segs / 2) * PAIR_MODS + (segs & 1) * (CHAR_MODS + FINDER_MODS)
}

/// Module offsets, within a guarded row of `chars` characters, of every
/// finder the row contains.
fn finder_offsets(chars: usize) -> Vec<usize> {
    (0..(chars + 1) / 2).map(|t| 2 + t * PAIR_MODS + CHAR_MODS).collect()
}

/// The checkerboard strip printed between stacked rows: single module
/// elements across the full symbol width, with widened end elements so
/// the total lands exactly on `width` modules.
fn checker_row(width: usize, sep_ht: u32) -> PrintRegion {
    let (count, tail) = if width % 2 == 0 { (width - 7, 4) } else { (width - 8, 5) };
    let mut pattern = vec![1u8; count];
    pattern[0] = 5;
    pattern[count - 1] = tail;
    PrintRegion {
        pattern,
        left_pad: 0,
        right_pad: 0,
        height: sep_ht,
        white_first: true,
        guards: false,
        reverse: false,
    }
}

/// Builds the complement separator of a linear row.
///
/// The separator spans the guarded width of the row and inverts it
/// module for module, except that the outer four modules on each side
/// stay blank and every finder region carries a single module
/// checkerboard led by a space. Pads and the reversal flag are copied
/// from the row so the renderer keeps both aligned.
fn complement_separator(row: &PrintRegion, finders: &[usize], sep_ht: u32) -> PrintRegion {
    let mut bars = Vec::with_capacity(row.modules() as usize);
    let mut bar = !row.white_first;
    let guard: &[u8] = if row.guards { &[1, 1] } else { &[] };
    for &width in guard.iter().chain(row.pattern.iter()).chain(guard.iter()) {
        bars.extend(core::iter::repeat(!bar).take(usize::from(width)));
        bar = !bar;
    }

    let total = bars.len();
    for module in bars.iter_mut().take(4) {
        *module = false;
    }
    for module in bars.iter_mut().skip(total.saturating_sub(4)) {
        *module = false;
    }
    for &finder in finders {
        for m in 0..FINDER_MODS {
            if finder + m < total {
                bars[finder + m] = m % 2 == 1;
            }
        }
    }

    let mut pattern = Vec::new();
    let mut color = false;
    let mut run = 0u8;
    for module in bars {
        if module == color {
            run += 1;
        } else {
            pattern.push(run);
            color = module;
            run = 1;
        }
    }
    pattern.push(run);

    PrintRegion {
        pattern,
        left_pad: row.left_pad,
        right_pad: row.right_pad,
        height: sep_ht,
        white_first: true,
        guards: false,
        reverse: row.reverse,
    }
}

/// Lays out a DataBar Expanded character stream, optionally stacked with
/// a Composite Component above the linear rows.
///
/// Returns the regions in top to bottom order together with the symbol
/// width in modules and the total pixel height.
pub(crate) fn layout_expanded(
    pattern: &[u8],
    segs: usize,
    cc: Option<&Composite>,
    p: &LayoutParams,
) -> (Vec<PrintRegion>, usize, u32) {
    let per_row = p.seg_width.min(segs);
    let width = 4 + (per_row / 2) * PAIR_MODS + (per_row & 1) * (CHAR_MODS + FINDER_MODS);
    let row_count = segs.div_ceil(p.seg_width);
    let lin_height = p.pix_mult * ROW_HEIGHT * row_count as u32 + p.sep_ht * 3 * (row_count as u32 - 1);
    let height = match cc {
        Some(cc) => lin_height + p.pix_mult * 2 * cc.rows.len() as u32 + p.sep_ht,
        None => lin_height,
    };

    let mut regions = Vec::new();
    if let Some(cc) = cc {
        let right_pad = (width as u16).saturating_sub(CC_LEFT_PAD + cc.width);
        for row in &cc.rows {
            regions.push(PrintRegion {
                pattern: row.clone(),
                left_pad: CC_LEFT_PAD,
                right_pad,
                height: p.pix_mult * 2,
                white_first: true,
                guards: false,
                reverse: false,
            });
        }
    }

    let row_region = |start: usize, end_elements: usize| PrintRegion {
        pattern: pattern[element_offset(start)..end_elements].to_vec(),
        left_pad: 0,
        right_pad: 0,
        height: p.pix_mult * ROW_HEIGHT,
        white_first: (start / 2 + 1) & 1 == 1,
        guards: true,
        reverse: false,
    };

    let mut even_row = false;
    let mut start = 0;
    while start + p.seg_width < segs {
        let chars = p.seg_width;
        let reverse = even_row ^ ((start / 2) & 1 == 1);
        let mut row = row_region(start, element_offset(start + chars));
        row.reverse = reverse;
        let separator = complement_separator(&row, &finder_offsets(chars), p.sep_ht);

        if start > 0 {
            regions.push(checker_row(width, p.sep_ht));
        }
        if start > 0 || cc.is_some() {
            regions.push(separator.clone());
        }
        regions.push(row);
        regions.push(separator);

        even_row = !even_row;
        start += p.seg_width;
    }

    // last or only row
    let chars = segs - start;
    let elements = total_elements(segs) - element_offset(start);
    let row_mods = total_modules(segs) - module_offset(start);
    let right_pad = (width - 4 - row_mods) as u16;
    let reverse = even_row ^ ((start / 2) & 1 == 1);
    let mut row = row_region(start, total_elements(segs));

    if reverse && ((elements - 4) % 8) % 2 == 1 {
        // a reversed row would split its odd trailing finder, so shift
        // the row one module right instead
        row.left_pad = 1;
        row.right_pad = right_pad - 1;
        let separator = complement_separator(&row, &finder_offsets(chars), p.sep_ht);
        regions.push(checker_row(width, p.sep_ht));
        regions.push(separator);
        regions.push(row);
    } else {
        row.right_pad = right_pad;
        row.reverse = reverse;
        let separator = complement_separator(&row, &finder_offsets(chars), p.sep_ht);
        if start > 0 {
            regions.push(checker_row(width, p.sep_ht));
        }
        if start > 0 || cc.is_some() {
            regions.push(separator);
        }
        regions.push(row);
    }

    (regions, width, height)
}

/// Pads used when stacking a Composite Component over a UPC/EAN symbol.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CcStack {
    pub cc_left: u16,
    pub cc_right: u16,
    /// Left pad shared by the separator strips, nonzero only for the
    /// EAN-8 CC-B arrangement where the linear symbol shifts right.
    pub sep_left: u16,
}

/// Stacks composite rows and the three separator strips over a linear
/// symbol, top to bottom.
pub(crate) fn stack_composite(
    linear: PrintRegion,
    cc: &Composite,
    pads: CcStack,
    symbol_width: u16,
    pix_mult: u32,
) -> Vec<PrintRegion> {
    let strip_height = pix_mult * 2;
    let strip = |pattern: Vec<u8>| PrintRegion {
        pattern,
        left_pad: pads.sep_left,
        right_pad: 0,
        height: strip_height,
        white_first: true,
        guards: false,
        reverse: false,
    };
    let outer = vec![7, 1, (symbol_width - 16) as u8, 1, 7];
    let inner = vec![6, 1, (symbol_width - 14) as u8, 1, 6];

    let mut regions = Vec::with_capacity(cc.rows.len() + 4);
    for row in &cc.rows {
        regions.push(PrintRegion {
            pattern: row.clone(),
            left_pad: pads.cc_left,
            right_pad: pads.cc_right,
            height: strip_height,
            white_first: true,
            guards: false,
            reverse: false,
        });
    }
    regions.push(strip(outer.clone()));
    regions.push(strip(inner));
    regions.push(strip(outer));
    regions.push(linear);
    regions
}
