//! Collaborator seams.
//!
//! The encoding core stops at three boundaries: packing an application
//! identifier string into a bit field, encoding a Composite Component
//! and vetting the character repertoire. Each is a trait so callers can
//! plug their own implementation, and each reports failure through its
//! return value so the core can abort before emitting any region.

/// Size in bytes of the packed bit field handed to a [`BitPacker`],
/// enough for the eleven double segments of a maximum length symbol.
pub const BIT_FIELD_BYTES: usize = 33;

/// Packs a validated data string into a DataBar Expanded bit field.
pub trait BitPacker {
    /// Fills `field` and returns the number of data characters used, or
    /// `None` when the data cannot be packed.
    ///
    /// On entry the most significant bit of `field[0]` already carries
    /// the 2D linkage flag; packing continues after it. `row_width` is
    /// the configured number of characters per row, which bounds the
    /// padding of the variable length field.
    fn pack(&self, data: &[u8], row_width: usize, field: &mut [u8; BIT_FIELD_BYTES]) -> Option<usize>;
}

/// Column count requested from a Composite Component encoder. Which one
/// applies is fixed by the linear symbology the component is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CcColumns {
    Two,
    Three,
    Four,
}

/// Whether the encoder produced a CC-A or a CC-B component. EAN-8 shifts
/// its linear symbol right when a CC-B is attached, so the class has to
/// travel with the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CcClass {
    A,
    B,
}

/// A Composite Component as returned by its encoder: one element width
/// row per symbol row, top row first, all rows the same length.
#[derive(Debug, Clone)]
pub struct Composite {
    pub rows: Vec<Vec<u8>>,
    /// Total width of one row in modules.
    pub width: u16,
    pub class: CcClass,
}

/// Encodes secondary data into a Composite Component.
pub trait CompositeEncoder {
    /// Returns the encoded component or `None` when the secondary data
    /// cannot be encoded at the requested width.
    fn encode(&self, data: &[u8], columns: CcColumns) -> Option<Composite>;
}

/// Vets the character repertoire of DataBar Expanded data.
pub trait Validator {
    /// Returns the index of the first disallowed character, or `None`
    /// when every character is acceptable.
    fn first_invalid(&self, data: &[u8]) -> Option<usize>;
}

/// The unit collaborators refuse to pack or encode anything and accept
/// every character, which suits the linear symbologies that never call
/// them.
impl BitPacker for () {
    fn pack(&self, _data: &[u8], _row_width: usize, _field: &mut [u8; BIT_FIELD_BYTES]) -> Option<usize> {
        None
    }
}

impl CompositeEncoder for () {
    fn encode(&self, _data: &[u8], _columns: CcColumns) -> Option<Composite> {
        None
    }
}

impl Validator for () {
    fn first_invalid(&self, _data: &[u8]) -> Option<usize> {
        None
    }
}
