//! Bounded window into a record's payload with its own cursor.
//!
//! Replaces the teacher's file-like-atom hybrid (`mp4iter::Atom` reads
//! directly off a shared file or moov cursor) with an explicit value that
//! borrows the [`ByteSource`] and a payload window `(first_byte, length,
//! cursor)`, per the "hybrid file/object interface → bounded window"
//! redesign in `spec.md` §9.

use std::io::{Read, Result as IoResult, Seek, SeekFrom};

use crate::byte_source::ByteSource;
use crate::header::Header;

/// A read/seek window over one record's payload, in payload-relative
/// coordinates `0 ..= header.length`.
///
/// Every read is a scoped `read_from_position` against the shared
/// [`ByteSource`]: interleaved reads on sibling or parent objects can never
/// corrupt this view's notion of its own cursor, and vice versa (see
/// `spec.md` §5 and §8 property 7).
pub struct ObjectView<'a> {
    source: &'a mut ByteSource,
    header: Header,
    cursor: u64,
}

impl<'a> ObjectView<'a> {
    pub fn new(source: &'a mut ByteSource, header: Header) -> Self {
        Self { source, header, cursor: 0 }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Bytes remaining between the cursor and the end of the payload.
    pub fn remaining(&self) -> u64 {
        self.header.length.saturating_sub(self.cursor)
    }

    pub fn tell(&self) -> u64 {
        self.cursor
    }
}

impl<'a> Read for ObjectView<'a> {
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        // Clamp to what remains in the payload rather than erroring; this is
        // the documented behaviour for an over-long `read(size)` request
        // (spec.md §9 Open Questions).
        let clamped = (buf.len() as u64).min(self.remaining()) as usize;
        if clamped == 0 {
            return Ok(0);
        }
        let data = self
            .source
            .read_from_position(self.header.data_field_first_byte + self.cursor, clamped)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        buf[..data.len()].copy_from_slice(&data);
        self.cursor += data.len() as u64;
        Ok(data.len())
    }
}

impl<'a> Seek for ObjectView<'a> {
    fn seek(&mut self, pos: SeekFrom) -> IoResult<u64> {
        let new_cursor = match pos {
            SeekFrom::Start(offset) => offset,
            SeekFrom::Current(delta) => add_signed(self.cursor, delta),
            SeekFrom::End(delta) => add_signed(self.header.length, delta),
        };
        self.cursor = new_cursor;
        Ok(self.cursor)
    }
}

fn add_signed(base: u64, delta: i64) -> u64 {
    if delta >= 0 {
        base + delta as u64
    } else {
        base.saturating_sub((-delta) as u64)
    }
}
