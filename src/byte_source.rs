//! Uniform seek/read/tell over a raw or gzip-decompressed EventIO file.
//!
//! Mirrors the teacher's split between a `BufReader<File>` for the common
//! case and an in-memory `Cursor<Vec<u8>>` when the underlying stream is not
//! natively seekable (`mp4iter::Mp4Reader` keeps the same split between its
//! `file_reader` and its in-memory `moov_reader`).

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::errors::EventIoError;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
pub(crate) const SYNC_MARKER_LE: [u8; 4] = [0xD4, 0x1F, 0x8A, 0x37];
pub(crate) const SYNC_MARKER_BE: [u8; 4] = [0x37, 0x8A, 0x1F, 0xD4];

enum Backing {
    /// Raw file, seekable directly.
    Plain(BufReader<File>),
    /// Fully inflated gzip payload, seekable via an in-memory cursor.
    Inflated(Cursor<Vec<u8>>),
}

/// Uniform byte-level access to an EventIO stream.
pub struct ByteSource {
    path: PathBuf,
    backing: Backing,
    len: u64,
}

impl ByteSource {
    /// Opens `path`, auto-detecting gzip compression from the leading magic
    /// bytes. Fails with [`EventIoError::NotEventIO`] if the file is
    /// neither a raw EventIO stream nor gzip-compressed one.
    pub fn open(path: &Path) -> Result<Self, EventIoError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        let read = read_prefix(&mut reader, &mut magic)?;
        reader.seek(SeekFrom::Start(0))?;

        if read >= 2 && magic[0..2] == GZIP_MAGIC {
            log::info!("opening gzip-compressed EventIO file {}", path.display());
            let mut decoder = flate2::read::GzDecoder::new(reader);
            let mut buf = Vec::new();
            decoder.read_to_end(&mut buf)?;
            let len = buf.len() as u64;
            return Ok(Self {
                path: path.to_owned(),
                backing: Backing::Inflated(Cursor::new(buf)),
                len,
            });
        }

        if read < 4 || (magic != SYNC_MARKER_LE && magic != SYNC_MARKER_BE) {
            return Err(EventIoError::NotEventIO);
        }

        if magic == SYNC_MARKER_BE {
            return Err(EventIoError::UnsupportedEndian);
        }

        log::info!("opening uncompressed EventIO file {}", path.display());
        let len = reader.get_ref().metadata()?.len();
        Ok(Self {
            path: path.to_owned(),
            backing: Backing::Plain(reader),
            len,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total size in bytes of the (decompressed) stream.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads up to `n` bytes at the current position. A short read is only
    /// permitted at the end of the stream.
    pub fn read(&mut self, n: usize) -> Result<Vec<u8>, EventIoError> {
        let mut buf = vec![0u8; n];
        let read = match &mut self.backing {
            Backing::Plain(r) => read_prefix(r, &mut buf)?,
            Backing::Inflated(r) => read_prefix(r, &mut buf)?,
        };
        buf.truncate(read);
        Ok(buf)
    }

    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64, EventIoError> {
        let pos = match &mut self.backing {
            Backing::Plain(r) => r.seek(pos)?,
            Backing::Inflated(r) => r.seek(pos)?,
        };
        Ok(pos)
    }

    pub fn tell(&mut self) -> Result<u64, EventIoError> {
        let pos = match &mut self.backing {
            Backing::Plain(r) => r.stream_position()?,
            Backing::Inflated(r) => r.stream_position()?,
        };
        Ok(pos)
    }

    /// Reads `n` bytes starting at absolute offset `first_byte`, restoring
    /// the stream's prior position afterwards. Any number of interleaved
    /// calls from sibling/parent objects are equivalent to serial reads.
    pub fn read_from_position(&mut self, first_byte: u64, n: usize) -> Result<Vec<u8>, EventIoError> {
        let saved = self.tell()?;
        self.seek(SeekFrom::Start(first_byte))?;
        let data = self.read(n);
        self.seek(SeekFrom::Start(saved))?;
        data
    }
}

/// Reads into `buf` tolerating a short read at EOF, returning the number of
/// bytes actually filled.
fn read_prefix<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, std::io::Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
