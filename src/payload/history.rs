//! Run-provenance records: `History` (70) and its children
//! `HistoryCommandLine` (71)/`HistoryConfig` (72), plus `HistoryMeta` (75).

use crate::errors::EventIoError;
use crate::object_view::ObjectView;

use super::read_counted_string;

#[derive(Debug, Clone, Default)]
pub struct HistoryCommandLine {
    pub timestamp: i32,
    pub line: String,
}

pub fn decode_history_command_line(view: &mut ObjectView) -> Result<HistoryCommandLine, EventIoError> {
    let timestamp = super::read_i32(view)?;
    Ok(HistoryCommandLine { timestamp, line: read_counted_string(view)? })
}

#[derive(Debug, Clone, Default)]
pub struct HistoryConfig {
    pub timestamp: i32,
    pub line: String,
}

pub fn decode_history_config(view: &mut ObjectView) -> Result<HistoryConfig, EventIoError> {
    let timestamp = super::read_i32(view)?;
    Ok(HistoryConfig { timestamp, line: read_counted_string(view)? })
}

/// Arbitrary `key -> value` string pairs (75), exposed unparsed per
/// `spec.md` §1's scope boundary for domain-specific text payloads.
#[derive(Debug, Clone, Default)]
pub struct HistoryMeta {
    pub entries: Vec<(String, String)>,
}

pub fn decode_history_meta(view: &mut ObjectView) -> Result<HistoryMeta, EventIoError> {
    let n = super::read_u32(view)? as usize;
    let mut entries = Vec::with_capacity(n);
    for _ in 0..n {
        let key = read_counted_string(view)?;
        let value = read_counted_string(view)?;
        entries.push((key, value));
    }
    Ok(HistoryMeta { entries })
}
