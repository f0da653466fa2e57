use nutype_enum::nutype_enum;

nutype_enum! {
    /// NAL (Network Abstraction Layer) unit types as defined by ISO/IEC 23090-3 Table 5.
    pub enum NALUnitType(u8) {
        /// Coded slice of a trailing picture or subpicture
        ///
        /// NAL unit type class: VCL
        TrailNut = 0,
        /// Coded slice of an STSA picture or subpicture
        ///
        /// NAL unit type class: VCL
        StsaNut = 1,
        /// Coded slice of a RADL picture or subpicture
        ///
        /// NAL unit type class: VCL
        RadlNut = 2,
        /// Coded slice of a RASL picture or subpicture
        ///
        /// NAL unit type class: VCL
        RaslNut = 3,
        /// Reserved non-IRAP VCL NAL unit types
        ///
        /// NAL unit type class: VCL
        RsvVcl4 = 4,
        /// Reserved non-IRAP VCL NAL unit types
        ///
        /// NAL unit type class: VCL
        RsvVcl5 = 5,
        /// Reserved non-IRAP VCL NAL unit types
        ///
        /// NAL unit type class: VCL
        RsvVcl6 = 6,
        /// Coded slice of an IDR picture or subpicture
        ///
        /// NAL unit type class: VCL
        IdrWRadl = 7,
        /// Coded slice of an IDR picture or subpicture
        ///
        /// NAL unit type class: VCL
        IdrNLp = 8,
        /// Coded slice of a CRA picture or subpicture
        ///
        /// NAL unit type class: VCL
        CraNut = 9,
        /// Coded slice of a GDR picture or subpicture
        ///
        /// NAL unit type class: VCL
        GdrNut = 10,
        /// Reserved IRAP VCL NAL unit type
        ///
        /// NAL unit type class: VCL
        RsvIrap11 = 11,
        /// Operating point information
        ///
        /// NAL unit type class: non-VCL
        OpiNut = 12,
        /// Decoding capability information
        ///
        /// NAL unit type class: non-VCL
        DciNut = 13,
        /// Video parameter set
        ///
        /// NAL unit type class: non-VCL
        VpsNut = 14,
        /// Sequence parameter set
        ///
        /// NAL unit type class: non-VCL
        SpsNut = 15,
        /// Picture parameter set
        ///
        /// NAL unit type class: non-VCL
        PpsNut = 16,
        /// Adaptation parameter set
        ///
        /// NAL unit type class: non-VCL
        PrefixApsNut = 17,
        /// Adaptation parameter set
        ///
        /// NAL unit type class: non-VCL
        SuffixApsNut = 18,
        /// Picture header
        ///
        /// NAL unit type class: non-VCL
        PhNut = 19,
        /// Access unit delimiter
        ///
        /// NAL unit type class: non-VCL
        AudNut = 20,
        /// End of sequence
        ///
        /// NAL unit type class: non-VCL
        EosNut = 21,
        /// End of bitstream
        ///
        /// NAL unit type class: non-VCL
        EobNut = 22,
        /// Supplemental enhancement information
        ///
        /// NAL unit type class: non-VCL
        PrefixSeiNut = 23,
        /// Supplemental enhancement information
        ///
        /// NAL unit type class: non-VCL
        SuffixSeiNut = 24,
        /// Filler data
        ///
        /// NAL unit type class: non-VCL
        FdNut = 25,
        /// Reserved non-VCL NAL unit types
        ///
        /// NAL unit type class: non-VCL
        RsvNvcl26 = 26,
        /// Reserved non-VCL NAL unit types
        ///
        /// NAL unit type class: non-VCL
        RsvNvcl27 = 27,
        /// Unspecified non-VCL NAL unit types
        ///
        /// NAL unit type class: non-VCL
        UnspecNvcl28 = 28,
        /// Unspecified non-VCL NAL unit types
        ///
        /// NAL unit type class: non-VCL
        UnspecNvcl29 = 29,
        /// Unspecified non-VCL NAL unit types
        ///
        /// NAL unit type class: non-VCL
        UnspecNvcl30 = 30,
        /// Unspecified non-VCL NAL unit types
        ///
        /// NAL unit type class: non-VCL
        UnspecNvcl31 = 31,
    }
}

impl NALUnitType {
    /// NAL unit types that a configuration record array always carries exactly once,
    /// without a `num_nalus` field.
    ///
    /// ISO/IEC 14496-15:2022(E) - 11.2.4.2.2
    pub const IMPLICITLY_SINGULAR: [NALUnitType; 2] = [NALUnitType::OpiNut, NALUnitType::DciNut];

    /// Returns `true` if the NAL unit type class of this NAL unit type is VCL (Video Coding Layer).
    ///
    /// See ISO/IEC 23090-3 - Table 5, NAL unit type class column.
    pub fn is_vcl(&self) -> bool {
        (0..=11).contains(&self.0)
    }

    /// Returns `true` for the IRAP types, `IDR_W_RADL` through `RSV_IRAP_11`.
    pub fn is_irap(&self) -> bool {
        (NALUnitType::IdrWRadl..=NALUnitType::RsvIrap11).contains(self)
    }

    /// Returns `true` if arrays of this type omit the `num_nalus` field and hold a single NAL unit.
    pub fn is_implicitly_singular(&self) -> bool {
        Self::IMPLICITLY_SINGULAR.contains(self)
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::NALUnitType;

    #[test]
    fn implicitly_singular_types() {
        let singular: Vec<u8> = (0..32)
            .map(NALUnitType::from)
            .filter(NALUnitType::is_implicitly_singular)
            .map(|nal_unit_type| nal_unit_type.0)
            .collect();
        assert_eq!(singular, vec![12, 13]);
    }

    #[test]
    fn classes() {
        assert!(NALUnitType::CraNut.is_vcl());
        assert!(NALUnitType::CraNut.is_irap());
        assert!(NALUnitType::TrailNut.is_vcl());
        assert!(!NALUnitType::TrailNut.is_irap());
        assert!(!NALUnitType::SpsNut.is_vcl());
        assert!(!NALUnitType::OpiNut.is_irap());
    }
}
