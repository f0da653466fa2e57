use std::io;
use std::num::NonZero;

use scuffle_bytes_util::BitReader;

use crate::NALUnitType;
use crate::range_check::range_check;

/// The VVC NAL unit header.
///
/// ISO/IEC 23090-3 - 7.3.1.2
#[derive(Debug, Clone, PartialEq)]
pub struct NALUnitHeader {
    /// `nuh_reserved_zero_bit`. Reserved for future use, decoders ignore its value.
    pub nuh_reserved_zero_bit: bool,

    /// Specifies the identifier of the layer to which a VCL NAL unit belongs or the identifier of a
    /// layer to which a non-VCL NAL unit applies.
    ///
    /// This value ranges from \[0, 55\], with 56 to 63 being reserved for future use.
    pub nuh_layer_id: u8,

    pub nal_unit_type: NALUnitType,

    /// The `nuh_temporal_id_plus1` is 3 bits, where the value minus 1 is the temporal id for the NAL unit.
    ///
    /// This value cannot be 0.
    pub nuh_temporal_id_plus1: NonZero<u8>,
}

impl NALUnitHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 2;

    pub fn parse<R: io::Read>(bit_reader: &mut BitReader<R>) -> io::Result<Self> {
        let forbidden_zero_bit = bit_reader.read_bit()?;
        if forbidden_zero_bit {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "forbidden_zero_bit is not zero"));
        }

        let nuh_reserved_zero_bit = bit_reader.read_bit()?;
        let nuh_layer_id = bit_reader.read_bits(6)? as u8;
        range_check!(nuh_layer_id, 0, 55)?;

        let nal_unit_type = NALUnitType::from(bit_reader.read_bits(5)? as u8);

        let nuh_temporal_id_plus1 = bit_reader.read_bits(3)? as u8;
        let nuh_temporal_id_plus1 = NonZero::new(nuh_temporal_id_plus1)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "nuh_temporal_id_plus1 cannot be 0"))?;

        if (nal_unit_type.is_irap()
            || nal_unit_type == NALUnitType::OpiNut
            || nal_unit_type == NALUnitType::DciNut
            || nal_unit_type == NALUnitType::VpsNut
            || nal_unit_type == NALUnitType::EosNut
            || nal_unit_type == NALUnitType::EobNut)
            && nuh_temporal_id_plus1.get() != 1
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("TemporalId must be 0 for nal_unit_type {:?}", nal_unit_type),
            ));
        }

        Ok(Self {
            nuh_reserved_zero_bit,
            nuh_layer_id,
            nal_unit_type,
            nuh_temporal_id_plus1,
        })
    }

    /// Parses the header at the start of a NAL unit.
    pub fn from_nalu(nalu: &[u8]) -> io::Result<Self> {
        Self::parse(&mut BitReader::new(io::Cursor::new(nalu)))
    }

    /// Returns the temporal id of the NAL unit.
    ///
    /// Defined as `TemporalId` (36) in ISO/IEC 23090-3.
    pub fn temporal_id(&self) -> u8 {
        self.nuh_temporal_id_plus1.get() - 1
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io;

    use crate::{NALUnitHeader, NALUnitType};

    #[test]
    fn sps_header() {
        // forbidden 0, reserved 0, layer 0 | type 15 (SPS), tid+1 1
        let header = NALUnitHeader::from_nalu(&[0x00, 0x79, 0x01]).unwrap();
        assert_eq!(header.nal_unit_type, NALUnitType::SpsNut);
        assert_eq!(header.nuh_layer_id, 0);
        assert_eq!(header.temporal_id(), 0);
        assert!(!header.nuh_reserved_zero_bit);
    }

    #[test]
    fn layer_and_temporal_id() {
        // layer 3 | type 0 (TRAIL), tid+1 3
        let header = NALUnitHeader::from_nalu(&[0x03, 0x03]).unwrap();
        assert_eq!(header.nal_unit_type, NALUnitType::TrailNut);
        assert_eq!(header.nuh_layer_id, 3);
        assert_eq!(header.temporal_id(), 2);
    }

    #[test]
    fn forbidden_zero_bit() {
        let err = NALUnitHeader::from_nalu(&[0x80, 0x79]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn reserved_layer_id() {
        // layer 56
        let err = NALUnitHeader::from_nalu(&[0x38, 0x79]).unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"nuh_layer_id is out of range [0, 55]: 56");
    }

    #[test]
    fn zero_temporal_id_plus1() {
        let err = NALUnitHeader::from_nalu(&[0x00, 0x78]).unwrap_err();
        assert_eq!(err.to_string(), "nuh_temporal_id_plus1 cannot be 0");
    }

    #[test]
    fn irap_with_temporal_id() {
        // type 7 (IDR_W_RADL), tid+1 2
        let err = NALUnitHeader::from_nalu(&[0x00, 0x3a]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().starts_with("TemporalId must be 0"));
    }

    #[test]
    fn too_short() {
        assert!(NALUnitHeader::from_nalu(&[0x00]).is_err());
    }
}
