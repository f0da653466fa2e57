/// The layout of a VVC decoder configuration record.
///
/// Two revisions of the record are found in the wild. Both start with 3 header bytes. They
/// differ in the layout of the profile/tier/level block, the width of the array `NAL_unit_type`
/// field and whether OPI/DCI arrays omit their `num_nalus` field. The layout cannot be derived reliably
/// from the bytes, so the caller selects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VvcConfigVersion {
    /// The draft layout emitted before ISO/IEC 14496-15 3rd edition was finalized.
    ///
    /// - 3 header bytes
    /// - draft profile/tier/level block, followed by a chroma/bit-depth byte
    /// - 6 bit `NAL_unit_type`
    /// - every array carries `num_nalus`
    Legacy,
    /// The finalized layout.
    ///
    /// - 3 header bytes
    /// - operating point and native PTL record
    /// - 5 bit `NAL_unit_type`
    /// - OPI and DCI arrays hold exactly one NAL unit and no `num_nalus`
    #[default]
    Final,
}

impl VvcConfigVersion {
    /// Number of leading bytes before the flag byte.
    pub const fn header_len(self) -> usize {
        match self {
            Self::Legacy | Self::Final => 3,
        }
    }

    /// Mask applied to the first byte of an array entry to get the `NAL_unit_type`.
    pub const fn nal_unit_type_mask(self) -> u8 {
        match self {
            Self::Legacy => 0x3f,
            Self::Final => 0x1f,
        }
    }

    /// Whether OPI and DCI arrays omit the `num_nalus` field.
    pub const fn has_implicitly_singular_arrays(self) -> bool {
        matches!(self, Self::Final)
    }
}
