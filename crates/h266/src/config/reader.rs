use std::io;

use bytes::{Buf, Bytes};
use scuffle_bytes_util::BytesCursorExt;

use crate::error::ParseError;

/// A cursor over the record that checks the remaining length before every read.
///
/// Slices taken with [`RecordReader::extract`] share the underlying buffer.
pub(crate) struct RecordReader<'a> {
    inner: &'a mut io::Cursor<Bytes>,
}

impl<'a> RecordReader<'a> {
    pub(crate) const fn new(inner: &'a mut io::Cursor<Bytes>) -> Self {
        Self { inner }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.inner.remaining()
    }

    fn ensure(&self, needed: usize) -> Result<(), ParseError> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(ParseError::BufferTooShort { needed, remaining });
        }

        Ok(())
    }

    pub(crate) fn skip(&mut self, len: usize) -> Result<(), ParseError> {
        self.ensure(len)?;
        self.inner.advance(len);
        Ok(())
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, ParseError> {
        self.ensure(1)?;
        Ok(self.inner.get_u8())
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, ParseError> {
        self.ensure(2)?;
        Ok(self.inner.get_u16())
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, ParseError> {
        self.ensure(4)?;
        Ok(self.inner.get_u32())
    }

    /// Reads a big-endian u16 without advancing.
    pub(crate) fn peek_u16(&self) -> Result<u16, ParseError> {
        self.ensure(2)?;
        let chunk = self.inner.chunk();
        Ok(u16::from_be_bytes([chunk[0], chunk[1]]))
    }

    pub(crate) fn extract(&mut self, len: usize) -> Result<Bytes, ParseError> {
        self.ensure(len)?;
        self.inner.extract_bytes(len).map_err(|_| ParseError::BufferTooShort {
            needed: len,
            remaining: self.inner.remaining(),
        })
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use std::io;

    use bytes::Bytes;

    use super::RecordReader;
    use crate::error::ParseError;

    #[test]
    fn reads_are_bounds_checked() {
        let mut cursor = io::Cursor::new(Bytes::from_static(&[0x01, 0x02, 0x03]));
        let mut reader = RecordReader::new(&mut cursor);

        assert_eq!(reader.peek_u16().unwrap(), 0x0102);
        assert_eq!(reader.read_u16().unwrap(), 0x0102);
        assert_eq!(
            reader.read_u16().unwrap_err(),
            ParseError::BufferTooShort { needed: 2, remaining: 1 }
        );
        assert_eq!(
            reader.extract(2).unwrap_err(),
            ParseError::BufferTooShort { needed: 2, remaining: 1 }
        );
        assert_eq!(reader.read_u8().unwrap(), 0x03);
        assert_eq!(
            reader.read_u32().unwrap_err(),
            ParseError::BufferTooShort { needed: 4, remaining: 0 }
        );
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn extract_shares_the_buffer() {
        let data = Bytes::from_static(b"\x00\x00hello");
        let mut cursor = io::Cursor::new(data.clone());
        let mut reader = RecordReader::new(&mut cursor);

        reader.skip(2).unwrap();
        let slice = reader.extract(5).unwrap();
        assert_eq!(slice, Bytes::from_static(b"hello"));
        assert_eq!(slice.as_ptr(), data[2..].as_ptr());
    }
}
