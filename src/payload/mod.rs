//! Payload decoders, one file per record-family, mirroring the teacher's
//! one-file-per-atom-type layout under `atom_types/`.
//!
//! Every decoder is a free function `fn decode(view: &mut ObjectView) ->
//! Result<T, EventIoError>` operating on the bounded payload window; none of
//! them touch the underlying [`crate::byte_source::ByteSource`] directly.

pub mod atmosphere;
pub mod calibration;
pub mod corsika;
pub mod history;
pub mod mc;
pub mod monitoring;
pub mod run;
pub mod telescope_description;
pub mod telescope_event;
pub mod tracking;
pub mod trigger;

use std::io::Read;

use crate::errors::EventIoError;
use crate::object_view::ObjectView;

/// Reads a length-prefixed (`u32` count) string stored as raw bytes, the
/// layout pyeventio calls a "vector of char" field.
pub(crate) fn read_counted_string(view: &mut ObjectView) -> Result<String, EventIoError> {
    let mut len_buf = [0u8; 4];
    view.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;
    let mut buf = vec![0u8; len];
    view.read_exact(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// Reads a `count`-length vector of little-endian `f32`s.
pub(crate) fn read_f32_vec(view: &mut ObjectView, count: usize) -> Result<Vec<f32>, EventIoError> {
    let mut buf = vec![0u8; count * 4];
    view.read_exact(&mut buf)?;
    Ok(buf.chunks_exact(4).map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect())
}

/// Reads a `count`-length vector of little-endian `i32`s.
pub(crate) fn read_i32_vec(view: &mut ObjectView, count: usize) -> Result<Vec<i32>, EventIoError> {
    let mut buf = vec![0u8; count * 4];
    view.read_exact(&mut buf)?;
    Ok(buf.chunks_exact(4).map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]])).collect())
}

pub(crate) fn read_u32(view: &mut ObjectView) -> Result<u32, EventIoError> {
    let mut buf = [0u8; 4];
    view.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub(crate) fn read_i32(view: &mut ObjectView) -> Result<i32, EventIoError> {
    Ok(read_u32(view)? as i32)
}

pub(crate) fn read_f32(view: &mut ObjectView) -> Result<f32, EventIoError> {
    Ok(f32::from_bits(read_u32(view)?))
}

pub(crate) fn read_u16(view: &mut ObjectView) -> Result<u16, EventIoError> {
    let mut buf = [0u8; 2];
    view.read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

/// Shared fixture helpers for `payload/*.rs` unit tests: a synthetic
/// sync-marker-prefixed temp file plus a bare `Header` describing a
/// top-level, non-nested record wrapping the given payload.
#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;
    use std::path::PathBuf;

    use crate::byte_source::{ByteSource, SYNC_MARKER_LE};
    use crate::header::Header;

    pub(crate) fn temp_payload_file(payload: &[u8], tag: &str) -> PathBuf {
        let mut bytes = SYNC_MARKER_LE.to_vec();
        bytes.extend_from_slice(payload);
        let mut path = std::env::temp_dir();
        path.push(format!("eventio_payload_test_{}_{}.dat", std::process::id(), tag));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&bytes).unwrap();
        path
    }

    pub(crate) fn open_at(payload: &[u8], tag: &str) -> (ByteSource, PathBuf) {
        let path = temp_payload_file(payload, tag);
        (ByteSource::open(&path).unwrap(), path)
    }

    pub(crate) fn header_with_id(r#type: u16, id: u32, length: u64) -> Header {
        Header {
            r#type,
            version: 0,
            user: false,
            extended: false,
            only_sub_objects: false,
            length,
            id,
            first_byte: 4,
            data_field_first_byte: 4,
            level: 0,
        }
    }
}
