//! GS1 DataBar Expanded, EAN and UPC symbol encoding.
//!
//! This crate turns a GS1 data string into the exact sequence of bar and
//! space element widths a printed symbol is made of. The output is a set
//! of [`PrintRegion`]s, one per renderable strip, in raster order; how
//! those strips become pixels, files or ink is the renderer's concern
//! and stays outside this crate. So do the application identifier bit
//! packer, the Composite Component encoders and the character repertoire
//! check, which are consumed through the traits in [`external`].
//!
//! ```
//! use databar::{Encoder, Symbology};
//!
//! let symbol = Encoder::new(Symbology::Ean8).encode("01234565").unwrap();
//! assert_eq!(symbol.regions.len(), 1);
//! assert_eq!(symbol.regions[0].pattern[..4], [7, 1, 1, 1]);
//! ```

pub mod checksum;
mod error;
pub mod external;
mod layout;
mod region;
mod symbologies;
mod tables;
mod widths;

pub use error::EncodeError;
pub use region::PrintRegion;

use external::{BitPacker, CompositeEncoder, Validator};

/// The symbologies of the GS1 DataBar family and their UPC/EAN and
/// GS1-128 companions.
///
/// Only [`DataBarExpanded`](Symbology::DataBarExpanded), the UPC/EAN
/// symbologies and [`UpcA`](Symbology::UpcA) have encoders in this
/// crate; selecting any other variant fails with
/// [`EncodeError::Unsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    DataBar14,
    DataBar14Truncated,
    DataBar14Stacked,
    DataBar14StackedOmni,
    DataBarLimited,
    DataBarExpanded,
    UpcA,
    UpcE,
    Ean13,
    Ean8,
    Gs1128CcA,
    Gs1128CcC,
}

/// Vertical order in which the caller's raster consumes regions.
/// Bottom up suits BMP style formats that store their last scanline
/// first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterOrder {
    TopDown,
    BottomUp,
}

/// An encoded symbol: print regions in raster order plus the overall
/// pixel box the renderer needs for its canvas.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub regions: Vec<PrintRegion>,
    /// Total width in pixels.
    pub width: u32,
    /// Total height in pixels.
    pub height: u32,
    /// For the UPC/EAN family, the zero padded primary number with its
    /// computed check digit, ready for a human readable line.
    pub primary: Option<String>,
}

/// Per-call encoder configuration.
///
/// One value of this type carries everything an encode needs: the
/// symbology, the geometry knobs and the three collaborators. Nothing is
/// shared between calls, so encoding from several threads only requires
/// a shared reference.
#[derive(Debug, Clone)]
pub struct Encoder<P = (), C = (), V = ()> {
    symbology: Symbology,
    pub(crate) pix_mult: u16,
    pub(crate) sep_ht: u16,
    pub(crate) seg_width: usize,
    pub(crate) raster: RasterOrder,
    pub(crate) packer: P,
    pub(crate) composite: C,
    pub(crate) validator: V,
}

impl Encoder<(), (), ()> {
    /// Creates an encoder with unit collaborators, a magnification of
    /// one, single pixel separators, top down raster order and the
    /// maximum row width of 22 characters.
    pub const fn new(symbology: Symbology) -> Self {
        Encoder {
            symbology,
            pix_mult: 1,
            sep_ht: 1,
            seg_width: 22,
            raster: RasterOrder::TopDown,
            packer: (),
            composite: (),
            validator: (),
        }
    }
}

impl<P, C, V> Encoder<P, C, V> {
    /// Pixels per module.
    pub fn with_pix_mult(mut self, pix_mult: u16) -> Self {
        assert!(pix_mult >= 1, "magnification must be at least one pixel per module");
        self.pix_mult = pix_mult;
        self
    }

    /// Pixel height of separator strips between stacked rows.
    pub fn with_sep_ht(mut self, sep_ht: u16) -> Self {
        assert!(sep_ht >= 1, "separators must be at least one pixel high");
        self.sep_ht = sep_ht;
        self
    }

    /// Symbol characters per DataBar Expanded row. Rows break on double
    /// segment boundaries, so the width must be even, between 2 and 22.
    pub fn with_seg_width(mut self, seg_width: usize) -> Self {
        assert!(
            seg_width >= 2 && seg_width <= 22 && seg_width % 2 == 0,
            "row width must be an even character count between 2 and 22",
        );
        self.seg_width = seg_width;
        self
    }

    pub fn with_raster(mut self, raster: RasterOrder) -> Self {
        self.raster = raster;
        self
    }

    /// Replaces the bit packer collaborator.
    pub fn with_packer<P2>(self, packer: P2) -> Encoder<P2, C, V> {
        Encoder {
            symbology: self.symbology,
            pix_mult: self.pix_mult,
            sep_ht: self.sep_ht,
            seg_width: self.seg_width,
            raster: self.raster,
            packer,
            composite: self.composite,
            validator: self.validator,
        }
    }

    /// Replaces the Composite Component encoder collaborator.
    pub fn with_composite<C2>(self, composite: C2) -> Encoder<P, C2, V> {
        Encoder {
            symbology: self.symbology,
            pix_mult: self.pix_mult,
            sep_ht: self.sep_ht,
            seg_width: self.seg_width,
            raster: self.raster,
            packer: self.packer,
            composite,
            validator: self.validator,
        }
    }

    /// Replaces the data validity collaborator.
    pub fn with_validator<V2>(self, validator: V2) -> Encoder<P, C, V2> {
        Encoder {
            symbology: self.symbology,
            pix_mult: self.pix_mult,
            sep_ht: self.sep_ht,
            seg_width: self.seg_width,
            raster: self.raster,
            packer: self.packer,
            composite: self.composite,
            validator,
        }
    }

    pub const fn symbology(&self) -> Symbology {
        self.symbology
    }
}

impl<P, C, V> Encoder<P, C, V>
where
    P: BitPacker,
    C: CompositeEncoder,
    V: Validator,
{
    /// Encodes `data` into a symbol.
    ///
    /// A `|` splits primary from composite data. On error nothing has
    /// been emitted; a failed call hands out no regions at all rather
    /// than a partially filled symbol.
    pub fn encode(&self, data: &str) -> Result<Symbol, EncodeError> {
        match self.symbology {
            Symbology::Ean13 | Symbology::UpcA => symbologies::ean13::encode(self, data),
            Symbology::Ean8 => symbologies::ean8::encode(self, data),
            Symbology::UpcE => symbologies::upce::encode(self, data),
            Symbology::DataBarExpanded => symbologies::expanded::encode(self, data),
            other => Err(EncodeError::Unsupported(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_symbologies_are_reported() {
        for symbology in [
            Symbology::DataBar14,
            Symbology::DataBar14Truncated,
            Symbology::DataBar14Stacked,
            Symbology::DataBar14StackedOmni,
            Symbology::DataBarLimited,
            Symbology::Gs1128CcA,
            Symbology::Gs1128CcC,
        ] {
            let err = Encoder::new(symbology).encode("123").unwrap_err();
            assert_eq!(err, EncodeError::Unsupported(symbology));
        }
    }

    #[test]
    fn upca_shares_the_ean13_encoder() {
        let upca = Encoder::new(Symbology::UpcA).encode("01234567890").unwrap();
        let ean13 = Encoder::new(Symbology::Ean13).encode("01234567890").unwrap();
        assert_eq!(upca.regions, ean13.regions);
        assert_eq!(upca.primary, ean13.primary);
    }

    #[test]
    fn bottom_up_reverses_the_region_order() {
        let down = Encoder::new(Symbology::Ean13).encode("5012345").unwrap();
        let up = Encoder::new(Symbology::Ean13)
            .with_raster(RasterOrder::BottomUp)
            .encode("5012345")
            .unwrap();
        let mut reversed = up.regions.clone();
        reversed.reverse();
        assert_eq!(down.regions, reversed);
    }
}
