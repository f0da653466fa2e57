//! Error types.

use crate::NALUnitType;

/// Error returned when a [`VVCDecoderConfigurationRecord`](crate::VVCDecoderConfigurationRecord) cannot be parsed.
///
/// Both variants are fatal. The byte accounting of everything after the failing
/// field is unknown, so no partial record is ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A fixed or variable length field needs more bytes than remain in the buffer.
    #[error("buffer too short: needed {needed} bytes, {remaining} remaining")]
    BufferTooShort {
        /// The number of bytes the field needs.
        needed: usize,
        /// The number of bytes left in the buffer.
        remaining: usize,
    },
    /// A NAL unit declares a length that runs past the end of the buffer.
    #[error("truncated nal unit: declared {declared} bytes (including the length field), {remaining} remaining")]
    TruncatedNalUnit {
        /// The declared size of the NAL unit plus its 2 byte length field.
        declared: usize,
        /// The number of bytes left in the buffer, starting at the length field.
        remaining: usize,
    },
}

/// Error returned when an access unit cannot be split into NAL units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    /// The NAL length field size is not in `1..=4`.
    #[error("invalid nal length size: {0}")]
    InvalidLengthSize(u8),
    /// A length prefix or the NAL unit it describes extends past the end of the data.
    #[error("truncated nal unit at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Offset of the length prefix in the input.
        offset: usize,
        /// The number of bytes needed from `offset`.
        needed: usize,
        /// The number of bytes left from `offset`.
        remaining: usize,
    },
}

/// Error returned when out-of-band parameter sets cannot be handed to the decoder.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError<E> {
    /// The configuration record could not be parsed.
    #[error("invalid configuration record: {0}")]
    Parse(#[from] ParseError),
    /// An Annex B parameter set does not start with a valid NAL unit header.
    #[error("invalid nal unit header in extradata: {0}")]
    InvalidNalUnitHeader(#[source] std::io::Error),
    /// The decoder rejected a parameter set. Initialization is aborted.
    #[error("decoder rejected nal unit {index} of array {array} (nal_unit_type {})", .nal_unit_type.0)]
    Rejected {
        /// Index of the array in the record.
        array: usize,
        /// Index of the NAL unit within the array.
        index: usize,
        /// The type of the rejected NAL unit.
        nal_unit_type: NALUnitType,
        /// The error returned by the decoder.
        #[source]
        source: E,
    },
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::{ParseError, SplitError};

    #[test]
    fn parse_error_display() {
        insta::assert_snapshot!(
            ParseError::BufferTooShort { needed: 2, remaining: 1 }.to_string(),
            @"buffer too short: needed 2 bytes, 1 remaining"
        );
        insta::assert_snapshot!(
            ParseError::TruncatedNalUnit { declared: 12, remaining: 10 }.to_string(),
            @"truncated nal unit: declared 12 bytes (including the length field), 10 remaining"
        );
    }

    #[test]
    fn split_error_display() {
        insta::assert_snapshot!(SplitError::InvalidLengthSize(5).to_string(), @"invalid nal length size: 5");
        insta::assert_snapshot!(
            SplitError::Truncated { offset: 4, needed: 9, remaining: 3 }.to_string(),
            @"truncated nal unit at offset 4: needed 9 bytes, 3 remaining"
        );
    }
}
