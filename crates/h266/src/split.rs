//! Splitting access units into NAL units.
//!
//! All functions return views into the input buffer.

use bytes::{Buf, Bytes};

use crate::error::SplitError;

/// Splits length-prefixed NAL units, as stored in a sample of a track described by a
/// [`VVCDecoderConfigurationRecord`](crate::VVCDecoderConfigurationRecord).
///
/// `nal_length_size` is the record's [`nal_length_size`](crate::VVCDecoderConfigurationRecord::nal_length_size).
pub fn split_length_prefixed(data: &Bytes, nal_length_size: u8) -> Result<Vec<Bytes>, SplitError> {
    if !(1..=4).contains(&nal_length_size) {
        return Err(SplitError::InvalidLengthSize(nal_length_size));
    }

    let length_size = nal_length_size as usize;
    let mut nalus = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let remaining = data.len() - offset;
        if remaining < length_size {
            return Err(SplitError::Truncated {
                offset,
                needed: length_size,
                remaining,
            });
        }

        let nal_unit_length = (&data[offset..]).get_uint(length_size) as usize;

        let needed = length_size + nal_unit_length;
        if remaining < needed {
            return Err(SplitError::Truncated {
                offset,
                needed,
                remaining,
            });
        }

        nalus.push(data.slice(offset + length_size..offset + needed));
        offset += needed;
    }

    Ok(nalus)
}

/// Splits an Annex B byte stream on `00 00 01` and `00 00 00 01` start codes.
///
/// Bytes before the first start code are dropped, as are empty NAL units.
pub fn split_annex_b(data: &Bytes) -> Vec<Bytes> {
    let mut nalus = Vec::new();
    let mut start = None;
    let mut i = 0;

    while i + 3 <= data.len() {
        if data[i] == 0 && data[i + 1] == 0 && data[i + 2] == 1 {
            if let Some(start) = start {
                push_trimmed(&mut nalus, data, start, i);
            }

            i += 3;
            start = Some(i);
        } else {
            i += 1;
        }
    }

    if let Some(start) = start {
        push_trimmed(&mut nalus, data, start, data.len());
    }

    nalus
}

/// Pushes `data[start..end]` without the zero bytes that belong to the next 4 byte start code.
fn push_trimmed(nalus: &mut Vec<Bytes>, data: &Bytes, start: usize, mut end: usize) {
    while end > start && data[end - 1] == 0 {
        end -= 1;
    }

    if end > start {
        nalus.push(data.slice(start..end));
    }
}
