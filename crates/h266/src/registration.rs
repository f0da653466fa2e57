//! Handing out-of-band parameter sets to a decoder.
//!
//! A decoder has to see every parameter set carried by the stream's extradata before the first
//! access unit, and has to know how the access units are framed. [`initialize_from_extradata`]
//! does both for a decoder exposed through [`ParameterSetSink`].

use bytes::Bytes;

use crate::error::{RegistrationError, SplitError};
use crate::split::{split_annex_b, split_length_prefixed};
use crate::{NALUnitHeader, NALUnitType, VVCDecoderConfigurationRecord, VvcConfigVersion};

/// A decoder that accepts out-of-band NAL units one at a time.
pub trait ParameterSetSink {
    /// The error returned when the decoder rejects a NAL unit.
    type Error: std::error::Error + 'static;

    /// Submits a single NAL unit, without any length prefix or start code.
    fn submit_parameter_set(&mut self, nal_unit_type: NALUnitType, nalu: &Bytes) -> Result<(), Self::Error>;
}

/// How NAL units are delimited in the access units of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFraming {
    /// NAL units are separated by start codes.
    AnnexB,
    /// Every NAL unit is preceded by a big-endian length field of this many bytes.
    LengthPrefixed(u8),
}

impl StreamFraming {
    /// Guesses whether `extradata` is a configuration record or an Annex B byte stream.
    ///
    /// A configuration record is assumed unless the data is 3 bytes or shorter, or starts with a
    /// `00 00 01` or `00 00 00 01` start code. This is the only place the record header is looked
    /// at, so a record whose header happens to begin with a start code is taken for Annex B.
    /// The length field size is not known until the record is parsed, so 4 is returned.
    pub fn detect(extradata: &[u8]) -> Self {
        let annex_b = extradata.len() <= 3 || extradata.starts_with(&[0, 0, 1]) || extradata.starts_with(&[0, 0, 0, 1]);

        if annex_b { Self::AnnexB } else { Self::LengthPrefixed(4) }
    }

    /// Splits an access unit into NAL units.
    pub fn split(&self, packet: &Bytes) -> Result<Vec<Bytes>, SplitError> {
        match *self {
            Self::AnnexB => Ok(split_annex_b(packet)),
            Self::LengthPrefixed(nal_length_size) => split_length_prefixed(packet, nal_length_size),
        }
    }
}

/// Submits every NAL unit of `record` to `sink` in declaration order.
///
/// Stops at the first rejected NAL unit. On success returns the framing of the stream the record
/// describes.
pub fn register_parameter_sets<S: ParameterSetSink>(
    record: &VVCDecoderConfigurationRecord,
    sink: &mut S,
) -> Result<StreamFraming, RegistrationError<S::Error>> {
    for (array_idx, array) in record.arrays.iter().enumerate() {
        for (index, nalu) in array.nalus.iter().enumerate() {
            tracing::debug!(
                array = array_idx,
                index,
                nal_unit_type = ?array.nal_unit_type,
                size = nalu.len(),
                "submitting parameter set"
            );

            if let Err(source) = sink.submit_parameter_set(array.nal_unit_type, nalu) {
                tracing::warn!(array = array_idx, index, nal_unit_type = ?array.nal_unit_type, error = %source, "decoder rejected parameter set");
                return Err(RegistrationError::Rejected {
                    array: array_idx,
                    index,
                    nal_unit_type: array.nal_unit_type,
                    source,
                });
            }
        }
    }

    Ok(StreamFraming::LengthPrefixed(record.nal_length_size()))
}

/// Prepares a decoder for a stream from its extradata.
///
/// - Empty extradata leaves the decoder untouched, the stream is Annex B.
/// - A configuration record is parsed with the given `version` and its NAL units are registered.
///   The stream uses the record's length field size. The record is told apart from Annex B
///   extradata by [`StreamFraming::detect`] before `version` is consulted.
/// - Annex B extradata is split and each NAL unit is registered. The stream stays Annex B.
pub fn initialize_from_extradata<S: ParameterSetSink>(
    extradata: &Bytes,
    version: VvcConfigVersion,
    sink: &mut S,
) -> Result<StreamFraming, RegistrationError<S::Error>> {
    if extradata.is_empty() {
        tracing::debug!("no extradata, assuming annex b");
        return Ok(StreamFraming::AnnexB);
    }

    match StreamFraming::detect(extradata) {
        StreamFraming::LengthPrefixed(_) => {
            let record = VVCDecoderConfigurationRecord::parse(extradata, version).inspect_err(|err| {
                tracing::warn!(error = %err, ?version, "invalid configuration record");
            })?;

            let framing = register_parameter_sets(&record, sink)?;
            tracing::debug!(?framing, arrays = record.arrays.len(), "registered configuration record");
            Ok(framing)
        }
        StreamFraming::AnnexB => {
            for (index, nalu) in split_annex_b(extradata).iter().enumerate() {
                let header = NALUnitHeader::from_nalu(nalu).map_err(RegistrationError::InvalidNalUnitHeader)?;

                tracing::debug!(index, nal_unit_type = ?header.nal_unit_type, size = nalu.len(), "submitting parameter set");
                if let Err(source) = sink.submit_parameter_set(header.nal_unit_type, nalu) {
                    tracing::warn!(index, nal_unit_type = ?header.nal_unit_type, error = %source, "decoder rejected parameter set");
                    return Err(RegistrationError::Rejected {
                        array: 0,
                        index,
                        nal_unit_type: header.nal_unit_type,
                        source,
                    });
                }
            }

            Ok(StreamFraming::AnnexB)
        }
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use bytes::Bytes;

    use super::{ParameterSetSink, StreamFraming, initialize_from_extradata, register_parameter_sets};
    use crate::error::{ParseError, RegistrationError};
    use crate::{NALUnitType, VVCDecoderConfigurationRecord, VvcConfigVersion};

    #[derive(Debug, thiserror::Error)]
    #[error("unsupported parameter set")]
    struct Unsupported;

    #[derive(Default)]
    struct RecordingSink {
        submitted: Vec<(NALUnitType, Bytes)>,
        reject: Option<NALUnitType>,
    }

    impl ParameterSetSink for RecordingSink {
        type Error = Unsupported;

        fn submit_parameter_set(&mut self, nal_unit_type: NALUnitType, nalu: &Bytes) -> Result<(), Self::Error> {
            if self.reject == Some(nal_unit_type) {
                return Err(Unsupported);
            }

            self.submitted.push((nal_unit_type, nalu.clone()));
            Ok(())
        }
    }

    fn extradata() -> Bytes {
        Bytes::from_static(&[
            0x01, 0x00, 0x00, // header
            0x04, // length_size_minus_one 2
            0x02, // num_of_arrays
            0x8f, // SPS_NUT
            0x00, 0x02, // num_nalus
            0x00, 0x02, 0x00, 0x79, // nal unit
            0x00, 0x03, 0x00, 0x79, 0x10, // nal unit
            0x90, // PPS_NUT
            0x00, 0x01, // num_nalus
            0x00, 0x02, 0x00, 0x81, // nal unit
        ])
    }

    #[test]
    fn detect() {
        assert_eq!(StreamFraming::detect(&[]), StreamFraming::AnnexB);
        assert_eq!(StreamFraming::detect(&[0x01, 0x00, 0x00]), StreamFraming::AnnexB);
        assert_eq!(StreamFraming::detect(&[0x00, 0x00, 0x01, 0x00]), StreamFraming::AnnexB);
        assert_eq!(StreamFraming::detect(&[0x00, 0x00, 0x00, 0x01]), StreamFraming::AnnexB);
        assert_eq!(StreamFraming::detect(&[0x00, 0x00, 0x02, 0x00]), StreamFraming::LengthPrefixed(4));
        assert_eq!(StreamFraming::detect(&[0x01, 0x00, 0x00, 0x00]), StreamFraming::LengthPrefixed(4));
        assert_eq!(
            StreamFraming::detect(&[0x00, 0x00, 0x00, 0x00, 0x00]),
            StreamFraming::LengthPrefixed(4)
        );
    }

    #[test]
    fn zeroed_header_is_a_record() {
        let mut sink = RecordingSink::default();
        let extradata = Bytes::from_static(&[
            0x00, 0x00, 0x00, // header
            0x02, // length_size_minus_one 1
            0x01, // num_of_arrays
            0x10, // PPS_NUT
            0x00, 0x01, // num_nalus
            0x00, 0x02, 0x00, 0x81, // nal unit
        ]);

        let framing = initialize_from_extradata(&extradata, VvcConfigVersion::Final, &mut sink).unwrap();
        assert_eq!(framing, StreamFraming::LengthPrefixed(2));
        assert_eq!(sink.submitted, vec![(NALUnitType::PpsNut, Bytes::from_static(&[0x00, 0x81]))]);

        let framing =
            initialize_from_extradata(&Bytes::from_static(&[0x00; 5]), VvcConfigVersion::Final, &mut sink).unwrap();
        assert_eq!(framing, StreamFraming::LengthPrefixed(1));
        assert_eq!(sink.submitted.len(), 1);
    }

    #[test]
    fn registers_in_order() {
        let mut sink = RecordingSink::default();
        let framing = initialize_from_extradata(&extradata(), VvcConfigVersion::Final, &mut sink).unwrap();

        assert_eq!(framing, StreamFraming::LengthPrefixed(3));
        assert_eq!(
            sink.submitted,
            vec![
                (NALUnitType::SpsNut, Bytes::from_static(&[0x00, 0x79])),
                (NALUnitType::SpsNut, Bytes::from_static(&[0x00, 0x79, 0x10])),
                (NALUnitType::PpsNut, Bytes::from_static(&[0x00, 0x81])),
            ]
        );

        let packet = Bytes::from_static(&[0x00, 0x00, 0x02, 0x00, 0x3b]);
        assert_eq!(framing.split(&packet).unwrap(), vec![Bytes::from_static(&[0x00, 0x3b])]);
    }

    #[test]
    fn rejection_aborts() {
        let mut sink = RecordingSink {
            reject: Some(NALUnitType::PpsNut),
            ..Default::default()
        };

        let record = VVCDecoderConfigurationRecord::parse(&extradata(), VvcConfigVersion::Final).unwrap();
        let err = register_parameter_sets(&record, &mut sink).unwrap_err();

        assert!(matches!(
            err,
            RegistrationError::Rejected {
                array: 1,
                index: 0,
                nal_unit_type,
                source: Unsupported,
            } if nal_unit_type == NALUnitType::PpsNut
        ));
        assert_eq!(sink.submitted.len(), 2);
        insta::assert_snapshot!(err.to_string(), @"decoder rejected nal unit 0 of array 1 (nal_unit_type 16)");
    }

    #[test]
    fn invalid_record() {
        let mut sink = RecordingSink::default();
        let extradata = extradata().slice(..14);

        let err = initialize_from_extradata(&extradata, VvcConfigVersion::Final, &mut sink).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Parse(ParseError::TruncatedNalUnit {
                declared: 5,
                remaining: 2
            })
        ));
        assert!(sink.submitted.is_empty());
    }

    #[test]
    fn annex_b_extradata() {
        let mut sink = RecordingSink::default();
        let extradata = Bytes::from_static(&[
            0x00, 0x00, 0x00, 0x01, 0x00, 0x79, 0x01, // SPS
            0x00, 0x00, 0x01, 0x00, 0x81, 0x02, // PPS
        ]);

        let framing = initialize_from_extradata(&extradata, VvcConfigVersion::Final, &mut sink).unwrap();
        assert_eq!(framing, StreamFraming::AnnexB);
        assert_eq!(
            sink.submitted,
            vec![
                (NALUnitType::SpsNut, Bytes::from_static(&[0x00, 0x79, 0x01])),
                (NALUnitType::PpsNut, Bytes::from_static(&[0x00, 0x81, 0x02])),
            ]
        );

        let err = initialize_from_extradata(
            &Bytes::from_static(&[0x00, 0x00, 0x01, 0x80, 0x79]),
            VvcConfigVersion::Final,
            &mut sink,
        )
        .unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidNalUnitHeader(_)));
    }

    #[test]
    fn empty_extradata() {
        let mut sink = RecordingSink::default();
        let framing = initialize_from_extradata(&Bytes::new(), VvcConfigVersion::Legacy, &mut sink).unwrap();
        assert_eq!(framing, StreamFraming::AnnexB);
        assert!(sink.submitted.is_empty());
    }
}
