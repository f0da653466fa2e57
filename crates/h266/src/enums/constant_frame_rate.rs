use nutype_enum::nutype_enum;

nutype_enum! {
    /// The `constant_frame_rate` field of a VVC operating point.
    ///
    /// Carried twice by a final layout record: in the top two bits of the flag byte and inside
    /// the operating point of the profile/tier/level block. The draft layout only has the former.
    ///
    /// ISO/IEC 14496-15:2022(E) - 11.2.4.2.3
    pub enum ConstantFrameRate(u8) {
        /// The operating point may or may not be of constant frame rate.
        Unknown = 0,
        /// Every sub-layer of the output layer set is of constant frame rate.
        Constant = 1,
        /// Each temporal sub-layer representation of the output layer set is of constant frame
        /// rate on its own, which need not hold once sub-layers are combined.
        TemporalLayerConstant = 2,
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::ConstantFrameRate;

    #[test]
    fn from_flag_bits() {
        assert_eq!(ConstantFrameRate::from(0x5f >> 6), ConstantFrameRate::Constant);
        assert_eq!(ConstantFrameRate::from(0x87 >> 6), ConstantFrameRate::TemporalLayerConstant);
        // 3 is reserved and kept as is
        assert_eq!(ConstantFrameRate::from(0xc0 >> 6).0, 3);
    }
}
