//! A pure Rust parser and writer for the VVC (H.266) decoder configuration record, the
//! container-level extradata that precedes a VVC elementary stream.
//!
//! The record tells a decoder how long the NAL unit length prefixes of the stream are, and
//! carries the parameter sets the decoder must see before the first access unit.
#![cfg_attr(feature = "docs", doc = "\n\nSee the [changelog][changelog] for a full release history.")]
#![cfg_attr(feature = "docs", doc = "## Feature flags")]
#![cfg_attr(feature = "docs", doc = document_features::document_features!())]
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use scuffle_h266::{NALUnitType, VVCDecoderConfigurationRecord, VvcConfigVersion};
//!
//! let extradata = Bytes::from_static(&[
//!     0x01, 0x00, 0x00, // header
//!     0x06, // 4 byte NAL unit lengths, no profile/tier/level
//!     0x01, // one array
//!     0x8f, 0x00, 0x01, // complete SPS array with one NAL unit
//!     0x00, 0x02, 0x00, 0x79,
//! ]);
//!
//! let record = VVCDecoderConfigurationRecord::parse(&extradata, VvcConfigVersion::Final).unwrap();
//! assert_eq!(record.nal_length_size(), 4);
//! assert_eq!(record.arrays[0].nal_unit_type, NALUnitType::SpsNut);
//! ```
//!
//! ## Specifications
//!
//! | Name | Version | Link | Comments |
//! | --- | --- | --- | --- |
//! | ISO/IEC 14496-15 | `2022` | <https://www.iso.org/standard/83336.html> | Carriage of NAL unit structured video in the ISOBMFF, clause 11 |
//! | ISO/IEC 23090-3 (ITU-T H.266) | `2022` | <https://www.itu.int/rec/T-REC-H.266> | NAL unit header and types |
//!
//! ## License
//!
//! This project is licensed under the [MIT](./LICENSE.MIT) or [Apache-2.0](./LICENSE.Apache-2.0) license.
//! You can choose between one of them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(unsafe_code)]

mod config;
mod enums;
pub mod error;
mod nal_unit_header;
mod range_check;
pub mod registration;
pub mod split;

pub use self::config::{NaluArray, VVCDecoderConfigurationRecord, VvcConfigVersion, VvcPtlRecord};
pub use self::enums::*;
pub use self::error::{ParseError, RegistrationError, SplitError};
pub use self::nal_unit_header::NALUnitHeader;
pub use self::registration::{ParameterSetSink, StreamFraming, initialize_from_extradata, register_parameter_sets};

/// Changelogs generated by [scuffle_changelog]
#[cfg(feature = "docs")]
#[scuffle_changelog::changelog]
pub mod changelog {}
