//! Error and warning taxonomy for the EventIO reader.

use std::fmt;

/// Errors that abort parsing outright.
///
/// Framing errors encountered mid-stream at a known object boundary are
/// not represented here: they are converted to a [`Warning`] and terminate
/// iteration gracefully instead (see `EventIoError` propagation policy in
/// `SPEC_FULL.md` §7).
#[derive(Debug)]
pub enum EventIoError {
    /// Magic-byte check failed at open: neither the sync marker nor the
    /// gzip signature was found.
    NotEventIO,
    /// Big-endian sync word detected. Only little-endian streams are
    /// supported.
    UnsupportedEndian,
    /// Sync word corrupt mid-stream at top level.
    BadSync([u8; 4]),
    /// Short read inside a header or payload.
    Truncated,
    /// A payload decoder encountered a version absent from its version map.
    UnsupportedVersion { r#type: u16, got: u16, supported: &'static [u16] },
    /// Tracking record type-derived telescope id disagreed with the id
    /// reconstructed from the header id field.
    TelescopeIdMismatch { from_type: u16, from_id: u16 },
    /// Array-event child grammar violated (wrong first child, wrong
    /// ordering, wrong nested type for a sub-parser).
    UnexpectedChildType { expected: &'static str, got: u16 },
    /// One or more telescope events had no matching tracking position.
    NoTrackingPositions(Vec<u16>),
    /// I/O error from the underlying byte source.
    Io(std::io::Error),
    /// A string field was not valid UTF-8.
    Utf8(std::string::FromUtf8Error),
    /// A length field claimed more bytes than remain in the enclosing
    /// object or file.
    BoundsError { pos: u64, max: u64 },
}

impl fmt::Display for EventIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventIoError::NotEventIO => write!(f, "not an EventIO file (bad magic)"),
            EventIoError::UnsupportedEndian => write!(f, "big-endian EventIO streams are not supported"),
            EventIoError::BadSync(bytes) => write!(f, "corrupt sync word mid-stream: {bytes:02x?}"),
            EventIoError::Truncated => write!(f, "truncated read"),
            EventIoError::UnsupportedVersion { r#type, got, supported } => write!(
                f,
                "unsupported version {got} for record type {type}, supported: {supported:?}"
            ),
            EventIoError::TelescopeIdMismatch { from_type, from_id } => write!(
                f,
                "telescope id mismatch: type encodes {from_type}, id encodes {from_id}"
            ),
            EventIoError::UnexpectedChildType { expected, got } => {
                write!(f, "expected child of type {expected}, got type {got}")
            }
            EventIoError::NoTrackingPositions(ids) => {
                write!(f, "missing tracking positions for telescopes {ids:?}")
            }
            EventIoError::Io(err) => write!(f, "I/O error: {err}"),
            EventIoError::Utf8(err) => write!(f, "invalid UTF-8: {err}"),
            EventIoError::BoundsError { pos, max } => {
                write!(f, "bounds error: tried to read at {pos}, max {max}")
            }
        }
    }
}

impl std::error::Error for EventIoError {}

impl From<std::io::Error> for EventIoError {
    fn from(err: std::io::Error) -> Self {
        EventIoError::Io(err)
    }
}

impl From<std::string::FromUtf8Error> for EventIoError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        EventIoError::Utf8(err)
    }
}

impl From<binrw::Error> for EventIoError {
    fn from(err: binrw::Error) -> Self {
        match err {
            binrw::Error::Io(io) => EventIoError::Io(io),
            other => EventIoError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, other)),
        }
    }
}

/// Non-fatal conditions surfaced to the caller without aborting iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The file ended with a short read at an object boundary; all objects
    /// decoded before this point remain valid.
    TruncatedFile,
    /// An object whose type did not resolve to a known [`crate::types::RecordKind`]
    /// was encountered and retained opaquely.
    UnknownObject { r#type: u16, offset: u64 },
    /// A `CalibrationPhotoelectrons` record had an unexpected child type.
    UnexpectedCalibrationChild { got: u16 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TruncatedFile => write!(f, "file seems to be truncated"),
            Warning::UnknownObject { r#type, offset } => {
                write!(f, "unhandled object type {type} at offset {offset}")
            }
            Warning::UnexpectedCalibrationChild { got } => {
                write!(f, "unexpected sub-object of type {got} in calibration photoelectrons, ignoring")
            }
        }
    }
}
