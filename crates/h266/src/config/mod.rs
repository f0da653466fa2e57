use std::io::{
    Write, {self},
};

use byteorder::{BigEndian, WriteBytesExt};
use bytes::Bytes;
use scuffle_bytes_util::BitWriter;

use self::reader::RecordReader;
use crate::error::ParseError;
use crate::range_check::range_check;
use crate::{ConstantFrameRate, NALUnitType};

mod ptl;
mod reader;
mod version;

pub use self::ptl::VvcPtlRecord;
pub use self::version::VvcConfigVersion;

/// VVC Decoder Configuration Record
///
/// The out-of-band configuration of a VVC elementary stream, stored once per stream in
/// the container. It carries the NAL unit length field size used by every sample and
/// the parameter sets a decoder needs before the first access unit.
///
/// ISO/IEC 14496-15:2022(E) - 11.2.4.2
#[derive(Debug, Clone, PartialEq)]
pub struct VVCDecoderConfigurationRecord {
    /// The layout this record was parsed from, and is muxed with.
    pub version: VvcConfigVersion,

    /// The header bytes before the flag byte, kept verbatim.
    ///
    /// Holds exactly [`VvcConfigVersion::header_len`] bytes.
    pub header: Bytes,

    /// Bits 7..6 of the flag byte.
    pub constant_frame_rate: ConstantFrameRate,

    /// Bits 5..3 of the flag byte.
    pub num_sublayers: u8,

    /// The `length_size_minus_one` is the u8 length of the NALUnitLength minus one.
    pub length_size_minus_one: u8,

    /// The profile/tier/level block, present when `ptl_present_flag` is set.
    pub ptl: Option<VvcPtlRecord>,

    /// The chroma format and bit depth byte of the legacy layout. Always `None` for the final layout.
    pub chroma_format_and_bit_depth: Option<u8>,

    /// The `arrays` is a vec of NaluArray, in the order they are declared.
    pub arrays: Vec<NaluArray>,
}

/// Nalu Array Structure
/// ISO/IEC 14496-15:2022(E) - 11.2.4.2.2
#[derive(Debug, Clone, PartialEq)]
pub struct NaluArray {
    /// The `array_completeness` is a flag set to 1 when all NAL units of this type are in the array and none are in the stream.
    pub array_completeness: bool,
    /// The `nal_unit_type` of the NAL units in `nalus`.
    pub nal_unit_type: NALUnitType,
    /// `nalus` is a vec of NAL units, each a view into the buffer the record was parsed from.
    pub nalus: Vec<Bytes>,
}

impl NaluArray {
    fn has_num_nalus(&self, version: VvcConfigVersion) -> bool {
        !(version.has_implicitly_singular_arrays() && self.nal_unit_type.is_implicitly_singular())
    }
}

impl VVCDecoderConfigurationRecord {
    /// Parses a VVCDecoderConfigurationRecord from the start of `data`.
    ///
    /// The NAL units of the returned record share `data`'s allocation. Trailing bytes are ignored.
    pub fn parse(data: &Bytes, version: VvcConfigVersion) -> Result<Self, ParseError> {
        Self::demux(&mut io::Cursor::new(data.clone()), version)
    }

    /// Demuxes a VVCDecoderConfigurationRecord from a byte stream.
    ///
    /// On success the cursor is left directly after the last NAL unit of the last array.
    pub fn demux(data: &mut io::Cursor<Bytes>, version: VvcConfigVersion) -> Result<Self, ParseError> {
        let mut reader = RecordReader::new(data);

        let header = reader.extract(version.header_len())?;

        let flags = reader.read_u8()?;
        let constant_frame_rate = ConstantFrameRate::from(flags >> 6);
        let num_sublayers = (flags >> 3) & 0x7;
        let length_size_minus_one = (flags >> 1) & 0x3;
        let ptl_present_flag = flags & 0x1 != 0;

        let ptl = if ptl_present_flag {
            Some(match version {
                VvcConfigVersion::Legacy => VvcPtlRecord::parse_legacy(&mut reader, num_sublayers)?,
                VvcConfigVersion::Final => VvcPtlRecord::parse(&mut reader)?,
            })
        } else {
            None
        };

        let chroma_format_and_bit_depth = match version {
            VvcConfigVersion::Legacy => Some(reader.read_u8()?),
            VvcConfigVersion::Final => None,
        };

        let num_of_arrays = reader.read_u8()?;
        let mut arrays = Vec::with_capacity(num_of_arrays as usize);

        for _ in 0..num_of_arrays {
            let array_header = reader.read_u8()?;
            let array_completeness = array_header & 0x80 != 0;
            let nal_unit_type = NALUnitType::from(array_header & version.nal_unit_type_mask());

            let num_nalus = if version.has_implicitly_singular_arrays() && nal_unit_type.is_implicitly_singular() {
                1
            } else {
                reader.read_u16()?
            };

            let mut nalus = Vec::with_capacity(num_nalus as usize);
            for _ in 0..num_nalus {
                // +2 for the nal_unit_length field
                let nal_size = reader.peek_u16()? as usize + 2;
                let remaining = reader.remaining();
                if nal_size > remaining {
                    return Err(ParseError::TruncatedNalUnit {
                        declared: nal_size,
                        remaining,
                    });
                }

                reader.skip(2)?;
                nalus.push(reader.extract(nal_size - 2)?);
            }

            arrays.push(NaluArray {
                array_completeness,
                nal_unit_type,
                nalus,
            });
        }

        Ok(Self {
            version,
            header,
            constant_frame_rate,
            num_sublayers,
            length_size_minus_one,
            ptl,
            chroma_format_and_bit_depth,
            arrays,
        })
    }

    /// The size in bytes of the length prefix of every NAL unit in the stream, 1 to 4.
    pub const fn nal_length_size(&self) -> u8 {
        self.length_size_minus_one + 1
    }

    /// Returns `true` if the record carries a profile/tier/level block.
    pub const fn has_profile_tier_level(&self) -> bool {
        self.ptl.is_some()
    }

    /// Iterates over every NAL unit in the record, in declaration order.
    pub fn nalus(&self) -> impl Iterator<Item = (NALUnitType, &Bytes)> {
        self.arrays
            .iter()
            .flat_map(|array| array.nalus.iter().map(move |nalu| (array.nal_unit_type, nalu)))
    }

    /// Returns the total byte size of the VVCDecoderConfigurationRecord.
    pub fn size(&self) -> u64 {
        self.version.header_len() as u64 // header
        + 1 // constant_frame_rate, num_sublayers, length_size_minus_one, ptl_present_flag
        + self.ptl.as_ref().map(|ptl| match self.version {
            VvcConfigVersion::Legacy => ptl.size_legacy(),
            VvcConfigVersion::Final => ptl.size(),
        }).unwrap_or(0)
        + (match self.version {
            VvcConfigVersion::Legacy => 1, // chroma_format_and_bit_depth
            VvcConfigVersion::Final => 0,
        })
        + 1 // num_of_arrays
        + self.arrays.iter().map(|array| {
            1 // array_completeness, reserved, nal_unit_type
            + (if array.has_num_nalus(self.version) { 2 } else { 0 }) // num_nalus
            + array.nalus.iter().map(|nalu| {
                2 // nal_unit_length
                + nalu.len() as u64 // nal_unit
            }).sum::<u64>()
        }).sum::<u64>()
    }

    /// Muxes the VVCDecoderConfigurationRecord into a byte stream.
    ///
    /// Fails with [`io::ErrorKind::InvalidInput`] when a field does not fit the layout of `self.version`.
    pub fn mux<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        if self.header.len() != self.version.header_len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "header must be {} bytes for {:?}, got {}",
                    self.version.header_len(),
                    self.version,
                    self.header.len()
                ),
            ));
        }

        range_check!(self.constant_frame_rate.0, 0, 3, InvalidInput)?;
        range_check!(self.num_sublayers, 0, 7, InvalidInput)?;
        range_check!(self.length_size_minus_one, 0, 3, InvalidInput)?;
        range_check!(self.arrays.len(), 0, 255, InvalidInput)?;

        let mut bit_writer = BitWriter::new(writer);

        bit_writer.write_all(&self.header)?;

        bit_writer.write_bits(self.constant_frame_rate.0 as u64, 2)?;
        bit_writer.write_bits(self.num_sublayers as u64, 3)?;
        bit_writer.write_bits(self.length_size_minus_one as u64, 2)?;
        bit_writer.write_bit(self.ptl.is_some())?;

        if let Some(ptl) = &self.ptl {
            match self.version {
                VvcConfigVersion::Legacy => {
                    if ptl.num_sublayers != self.num_sublayers {
                        return Err(io::Error::new(
                            io::ErrorKind::InvalidInput,
                            "ptl.num_sublayers must match num_sublayers in the legacy layout",
                        ));
                    }

                    ptl.mux_legacy(&mut bit_writer)?;
                }
                VvcConfigVersion::Final => ptl.mux(&mut bit_writer)?,
            }
        }

        if self.version == VvcConfigVersion::Legacy {
            bit_writer.write_u8(self.chroma_format_and_bit_depth.unwrap_or(0))?;
        }

        bit_writer.write_u8(self.arrays.len() as u8)?;
        for array in &self.arrays {
            range_check!(array.nal_unit_type.0, 0, self.version.nal_unit_type_mask(), InvalidInput)?;

            bit_writer.write_bit(array.array_completeness)?;
            match self.version {
                VvcConfigVersion::Legacy => {
                    bit_writer.write_bits(0b0, 1)?; // reserved
                    bit_writer.write_bits(array.nal_unit_type.0 as u64, 6)?;
                }
                VvcConfigVersion::Final => {
                    bit_writer.write_bits(0b00, 2)?; // reserved
                    bit_writer.write_bits(array.nal_unit_type.0 as u64, 5)?;
                }
            }

            if array.has_num_nalus(self.version) {
                range_check!(array.nalus.len(), 0, u16::MAX as usize, InvalidInput)?;
                bit_writer.write_u16::<BigEndian>(array.nalus.len() as u16)?;
            } else if array.nalus.len() != 1 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{:?} arrays must hold exactly one nal unit", array.nal_unit_type),
                ));
            }

            for nalu in &array.nalus {
                range_check!(nalu.len(), 0, u16::MAX as usize, InvalidInput)?;
                bit_writer.write_u16::<BigEndian>(nalu.len() as u16)?;
                bit_writer.write_all(nalu)?;
            }
        }

        bit_writer.finish()?;

        Ok(())
    }
}
