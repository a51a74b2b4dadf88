//! Index of top-level and nested records, addressable by byte offset.
//!
//! The index stores only headers: framing is separated from payload
//! parsing so that an unknown or version-mismatched record type becomes an
//! opaque, skippable entry (`spec.md` §4.3 rationale).

use std::io::SeekFrom;

use crate::byte_source::ByteSource;
use crate::errors::{EventIoError, Warning};
use crate::header::{read_header, Header};

/// One node in the object tree: a header plus, for `only_sub_objects`
/// records, the fully indexed children in file order.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub header: Header,
    pub children: Vec<IndexEntry>,
}

impl IndexEntry {
    pub fn find_child(&self, r#type: u16) -> Option<&IndexEntry> {
        self.children.iter().find(|c| c.header.r#type == r#type)
    }
}

/// Flat, restartable sequence of top-level records plus their nested trees.
pub struct ObjectIndex {
    entries: Vec<IndexEntry>,
}

impl ObjectIndex {
    /// Builds the index by walking the file from position 0, decoding only
    /// headers and skipping payloads by `length`. Tolerates a truncated or
    /// malformed trailing record by emitting [`Warning::TruncatedFile`] and
    /// keeping everything decoded so far.
    pub fn build(source: &mut ByteSource) -> Result<(Self, Vec<Warning>), EventIoError> {
        source.seek(SeekFrom::Start(0))?;
        let mut entries = Vec::new();
        let mut warnings = Vec::new();

        loop {
            let pos = source.tell()?;
            if pos >= source.len() {
                break;
            }

            match read_header(source, None) {
                Ok(header) => {
                    let children = if header.only_sub_objects {
                        let (kids, mut kid_warnings) = build_children(source, &header)?;
                        warnings.append(&mut kid_warnings);
                        kids
                    } else {
                        Vec::new()
                    };
                    source.seek(SeekFrom::Start(header.end()))?;
                    entries.push(IndexEntry { header, children });
                }
                Err(EventIoError::Truncated) => {
                    warnings.push(Warning::TruncatedFile);
                    break;
                }
                Err(EventIoError::BadSync(bytes)) if entries.is_empty() => {
                    return Err(EventIoError::BadSync(bytes));
                }
                Err(EventIoError::BadSync(_)) => {
                    warnings.push(Warning::TruncatedFile);
                    break;
                }
                Err(other) => return Err(other),
            }
        }

        Ok((Self { entries }, warnings))
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// O(1) lookahead used by the assembler's `mc_events` peek (no payload
    /// parsing, header only).
    pub fn peek(&self, index: usize) -> Option<&IndexEntry> {
        self.entries.get(index)
    }
}

fn build_children(
    source: &mut ByteSource,
    parent: &Header,
) -> Result<(Vec<IndexEntry>, Vec<Warning>), EventIoError> {
    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    loop {
        let pos = source.tell()?;
        if pos >= parent.end() {
            break;
        }

        match read_header(source, Some(parent.level)) {
            Ok(header) => {
                let children = if header.only_sub_objects {
                    let (kids, mut kid_warnings) = build_children(source, &header)?;
                    warnings.append(&mut kid_warnings);
                    kids
                } else {
                    Vec::new()
                };
                source.seek(SeekFrom::Start(header.end()))?;
                entries.push(IndexEntry { header, children });
            }
            Err(EventIoError::Truncated) => {
                warnings.push(Warning::TruncatedFile);
                break;
            }
            Err(other) => return Err(other),
        }
    }

    Ok((entries, warnings))
}
