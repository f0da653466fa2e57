use std::io::{self, Write};

use byteorder::{BigEndian, WriteBytesExt};
use bytes::Bytes;
use scuffle_bytes_util::BitWriter;

use super::reader::RecordReader;
use crate::ConstantFrameRate;
use crate::error::ParseError;
use crate::range_check::range_check;

/// The profile/tier/level block of a VVC decoder configuration record.
///
/// In the [`Final`](crate::VvcConfigVersion::Final) layout this is the operating point
/// description (`ols_idx` through `bit_depth_minus8`), the `native_ptl` record and the picture
/// size and frame rate fields.
///
/// ISO/IEC 14496-15:2022(E) - 11.2.4.2.2
///
/// The [`Legacy`](crate::VvcConfigVersion::Legacy) layout carries the profile, tier, level,
/// constraint info, sub-layer levels, sub-profiles and `ols_idx` only. The remaining fields are
/// zero when parsed from that layout and are not written back.
#[derive(Debug, Clone, PartialEq)]
pub struct VvcPtlRecord {
    /// The `ols_idx` is 9 bits, the index of the output layer set described by this record.
    pub ols_idx: u16,

    /// The `num_sublayers` is 3 bits, the number of temporal sub-layers in the stream.
    pub num_sublayers: u8,

    /// The `constant_frame_rate` is 2 bits.
    pub constant_frame_rate: ConstantFrameRate,

    /// The `chroma_format_idc` is 2 bits. Matches the field as defined in ISO/IEC 23090-3.
    pub chroma_format_idc: u8,

    /// The `bit_depth_minus8` is 3 bits. Matches `sps_bitdepth_minus8` as defined in ISO/IEC 23090-3.
    ///
    /// The 5 reserved bits that follow it are not kept. They are written as `0b11111`, so a record
    /// that carries any other value there is normalized by a parse and mux.
    pub bit_depth_minus8: u8,

    /// The `general_profile_idc` is 7 bits. Matches the field as defined in ISO/IEC 23090-3.
    pub general_profile_idc: u8,

    /// The `general_tier_flag` as a bool. Matches the field as defined in ISO/IEC 23090-3.
    pub general_tier_flag: bool,

    /// The `general_level_idc` as a u8. Matches the field as defined in ISO/IEC 23090-3.
    pub general_level_idc: u8,

    /// The raw `general_constraint_info` bytes. The length is `num_bytes_constraint_info`.
    pub constraint_info: Bytes,

    /// Bit `7 - j` is set when `sublayer_level_idc` for sub-layer `j` is present.
    ///
    /// Only carried by the legacy layout, and only when the record has more than one sub-layer.
    pub sublayer_level_present_mask: u8,

    /// One `sublayer_level_idc` per bit set in `sublayer_level_present_mask`, most significant bit first.
    pub sublayer_level_idcs: Vec<u8>,

    /// The `general_sub_profile_idc` values.
    pub sub_profiles: Vec<u32>,

    /// The `max_picture_width` in luma samples.
    pub max_picture_width: u16,

    /// The `max_picture_height` in luma samples.
    pub max_picture_height: u16,

    /// The `avg_frame_rate` in frames per 256 seconds. 0 means unspecified.
    pub avg_frame_rate: u16,
}

impl VvcPtlRecord {
    /// Parses the block in the finalized layout.
    pub(crate) fn parse(reader: &mut RecordReader<'_>) -> Result<Self, ParseError> {
        let word = reader.read_u16()?;
        let ols_idx = (word >> 7) & 0x1ff;
        let num_sublayers = ((word >> 4) & 0x7) as u8;
        let constant_frame_rate = ConstantFrameRate::from(((word >> 2) & 0x3) as u8);
        let chroma_format_idc = (word & 0x3) as u8;

        let bit_depth_minus8 = (reader.read_u8()? >> 5) & 0x7; // 5 bits reserved
        let num_bytes_constraint_info = reader.read_u8()? & 0x3f; // 2 bits reserved

        let profile_tier = reader.read_u8()?;
        let general_profile_idc = profile_tier >> 1;
        let general_tier_flag = profile_tier & 0x1 != 0;

        let constraint_info = reader.extract(num_bytes_constraint_info as usize)?;
        let general_level_idc = reader.read_u8()?;

        let num_sub_profiles = reader.read_u8()?;
        let mut sub_profiles = Vec::with_capacity(num_sub_profiles as usize);
        for _ in 0..num_sub_profiles {
            sub_profiles.push(reader.read_u32()?);
        }

        let max_picture_width = reader.read_u16()?;
        let max_picture_height = reader.read_u16()?;
        let avg_frame_rate = reader.read_u16()?;

        Ok(Self {
            ols_idx,
            num_sublayers,
            constant_frame_rate,
            chroma_format_idc,
            bit_depth_minus8,
            general_profile_idc,
            general_tier_flag,
            general_level_idc,
            constraint_info,
            sublayer_level_present_mask: 0,
            sublayer_level_idcs: Vec::new(),
            sub_profiles,
            max_picture_width,
            max_picture_height,
            avg_frame_rate,
        })
    }

    /// Parses the block in the draft layout. `num_sublayers` comes from the flag byte.
    pub(crate) fn parse_legacy(reader: &mut RecordReader<'_>, num_sublayers: u8) -> Result<Self, ParseError> {
        let num_bytes_constraint_info = reader.read_u8()?;

        let profile_tier = reader.read_u8()?;
        let general_profile_idc = profile_tier >> 1;
        let general_tier_flag = profile_tier & 0x1 != 0;
        let general_level_idc = reader.read_u8()?;

        let constraint_info = if num_bytes_constraint_info > 0 {
            reader.extract(num_bytes_constraint_info as usize)?
        } else {
            reader.skip(1)?; // padding
            Bytes::new()
        };

        let sublayer_level_present_mask = if num_sublayers > 1 { reader.read_u8()? } else { 0 };
        let mut sublayer_level_idcs = Vec::with_capacity(sublayer_level_present_mask.count_ones() as usize);
        for j in 0..8 {
            if sublayer_level_present_mask & (1 << (7 - j)) != 0 {
                sublayer_level_idcs.push(reader.read_u8()?);
            }
        }

        let num_sub_profiles = reader.read_u8()?;
        let mut sub_profiles = Vec::with_capacity(num_sub_profiles as usize);
        for _ in 0..num_sub_profiles {
            sub_profiles.push(reader.read_u32()?);
        }

        let ols_idx = reader.read_u16()?;

        Ok(Self {
            ols_idx,
            num_sublayers,
            constant_frame_rate: ConstantFrameRate::Unknown,
            chroma_format_idc: 0,
            bit_depth_minus8: 0,
            general_profile_idc,
            general_tier_flag,
            general_level_idc,
            constraint_info,
            sublayer_level_present_mask,
            sublayer_level_idcs,
            sub_profiles,
            max_picture_width: 0,
            max_picture_height: 0,
            avg_frame_rate: 0,
        })
    }

    /// Returns the encoded size of the block in the finalized layout.
    pub fn size(&self) -> u64 {
        2 // ols_idx, num_sublayers, constant_frame_rate, chroma_format_idc
        + 1 // bit_depth_minus8, reserved_5bits
        + 1 // reserved_2bits, num_bytes_constraint_info
        + 1 // general_profile_idc, general_tier_flag
        + self.constraint_info.len() as u64 // general_constraint_info
        + 1 // general_level_idc
        + 1 // ptl_num_sub_profiles
        + 4 * self.sub_profiles.len() as u64 // general_sub_profile_idc
        + 2 // max_picture_width
        + 2 // max_picture_height
        + 2 // avg_frame_rate
    }

    /// Returns the encoded size of the block in the draft layout.
    pub fn size_legacy(&self) -> u64 {
        1 // num_bytes_constraint_info
        + 1 // general_profile_idc, general_tier_flag
        + 1 // general_level_idc
        + (self.constraint_info.len() as u64).max(1) // general_constraint_info or padding
        + (if self.num_sublayers > 1 {
            1 // sublayer_level_present_mask
            + self.sublayer_level_idcs.len() as u64
        } else {
            0
        })
        + 1 // num_sub_profiles
        + 4 * self.sub_profiles.len() as u64 // sub_profile_idc
        + 2 // ols_idx
    }

    fn check_common(&self) -> io::Result<()> {
        range_check!(self.general_profile_idc, 0, 127, InvalidInput)?;
        range_check!(self.sub_profiles.len(), 0, 255, InvalidInput)?;
        Ok(())
    }

    /// Writes the block in the finalized layout.
    pub(crate) fn mux<W: io::Write>(&self, bit_writer: &mut BitWriter<W>) -> io::Result<()> {
        self.check_common()?;
        range_check!(self.ols_idx, 0, 511, InvalidInput)?;
        range_check!(self.num_sublayers, 0, 7, InvalidInput)?;
        range_check!(self.constant_frame_rate.0, 0, 3, InvalidInput)?;
        range_check!(self.chroma_format_idc, 0, 3, InvalidInput)?;
        range_check!(self.bit_depth_minus8, 0, 7, InvalidInput)?;
        range_check!(self.constraint_info.len(), 0, 63, InvalidInput)?;

        bit_writer.write_bits(self.ols_idx as u64, 9)?;
        bit_writer.write_bits(self.num_sublayers as u64, 3)?;
        bit_writer.write_bits(self.constant_frame_rate.0 as u64, 2)?;
        bit_writer.write_bits(self.chroma_format_idc as u64, 2)?;

        bit_writer.write_bits(self.bit_depth_minus8 as u64, 3)?;
        bit_writer.write_bits(0b11111, 5)?; // reserved_5bits

        bit_writer.write_bits(0b00, 2)?; // reserved_2bits
        bit_writer.write_bits(self.constraint_info.len() as u64, 6)?;

        bit_writer.write_bits(self.general_profile_idc as u64, 7)?;
        bit_writer.write_bit(self.general_tier_flag)?;

        bit_writer.write_all(&self.constraint_info)?;
        bit_writer.write_u8(self.general_level_idc)?;

        bit_writer.write_u8(self.sub_profiles.len() as u8)?;
        for sub_profile in &self.sub_profiles {
            bit_writer.write_u32::<BigEndian>(*sub_profile)?;
        }

        bit_writer.write_u16::<BigEndian>(self.max_picture_width)?;
        bit_writer.write_u16::<BigEndian>(self.max_picture_height)?;
        bit_writer.write_u16::<BigEndian>(self.avg_frame_rate)?;

        Ok(())
    }

    /// Writes the block in the draft layout.
    pub(crate) fn mux_legacy<W: io::Write>(&self, bit_writer: &mut BitWriter<W>) -> io::Result<()> {
        self.check_common()?;
        range_check!(self.constraint_info.len(), 0, 255, InvalidInput)?;

        if self.num_sublayers > 1 && self.sublayer_level_idcs.len() != self.sublayer_level_present_mask.count_ones() as usize {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "sublayer_level_idcs must hold one entry per bit set in sublayer_level_present_mask",
            ));
        }

        if self.num_sublayers <= 1 && (self.sublayer_level_present_mask != 0 || !self.sublayer_level_idcs.is_empty()) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "sublayer levels require more than one sub-layer",
            ));
        }

        bit_writer.write_u8(self.constraint_info.len() as u8)?;
        bit_writer.write_bits(self.general_profile_idc as u64, 7)?;
        bit_writer.write_bit(self.general_tier_flag)?;
        bit_writer.write_u8(self.general_level_idc)?;

        if self.constraint_info.is_empty() {
            bit_writer.write_u8(0)?; // padding
        } else {
            bit_writer.write_all(&self.constraint_info)?;
        }

        if self.num_sublayers > 1 {
            bit_writer.write_u8(self.sublayer_level_present_mask)?;
            bit_writer.write_all(&self.sublayer_level_idcs)?;
        }

        bit_writer.write_u8(self.sub_profiles.len() as u8)?;
        for sub_profile in &self.sub_profiles {
            bit_writer.write_u32::<BigEndian>(*sub_profile)?;
        }

        bit_writer.write_u16::<BigEndian>(self.ols_idx)?;

        Ok(())
    }
}
