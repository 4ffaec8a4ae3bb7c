use thiserror::Error;

use crate::Symbology;

/// Errors reported while turning a data string into a symbol.
///
/// Every failure is deterministic input or configuration validation.
/// An encode call that returns an error has produced no print regions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The primary data string holds more digits than the symbology allows.
    #[error("primary data exceeds {0} digits")]
    PrimaryTooLong(usize),

    /// The 12-digit data does not match any UPC-E zero-suppression rule.
    #[error("data cannot be converted to UPC-E")]
    UpcEConversion,

    /// The data string contains a character the symbology cannot carry.
    #[error("illegal character '{0}' in barcode data")]
    IllegalCharacter(char),

    /// The bit packer rejected the data or reported a character count
    /// outside the 4 to 22 symbol character range.
    #[error("data error from bit packer")]
    PackerData,

    /// The composite component encoder could not encode the secondary data.
    #[error("composite component encoder failed")]
    Composite,

    /// A composite was requested with a row narrower than four characters.
    #[error("composite requires a row width of at least 4 characters")]
    CompositeTooNarrow,

    /// The selected symbology has no encoder in this crate.
    #[error("{0:?} is not supported by this encoder")]
    Unsupported(Symbology),
}
