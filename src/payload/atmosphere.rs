//! `AtmosphericProfile` (76) and `Histograms` (100): retained as opaque
//! structured blobs — parsing the internal histogram/profile dtype grammar
//! is out of scope (spec.md §1).

use std::io::Read;

use crate::errors::EventIoError;
use crate::object_view::ObjectView;

#[derive(Debug, Clone, Default)]
pub struct AtmosphericProfile {
    pub raw: Vec<u8>,
}

pub fn decode_atmospheric_profile(view: &mut ObjectView) -> Result<AtmosphericProfile, EventIoError> {
    let mut raw = vec![0u8; view.remaining() as usize];
    view.read_exact(&mut raw)?;
    Ok(AtmosphericProfile { raw })
}

#[derive(Debug, Clone, Default)]
pub struct Histograms {
    pub raw: Vec<u8>,
}

pub fn decode_histograms(view: &mut ObjectView) -> Result<Histograms, EventIoError> {
    let mut raw = vec![0u8; view.remaining() as usize];
    view.read_exact(&mut raw)?;
    Ok(Histograms { raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::test_support::{header_with_id, open_at};

    #[test]
    fn retains_atmospheric_profile_bytes_opaquely() {
        let payload = vec![9u8, 8, 7, 6];
        let (mut source, path) = open_at(&payload, "atmospheric_profile");
        let header = header_with_id(76, 0, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let profile = decode_atmospheric_profile(&mut view).unwrap();

        assert_eq!(profile.raw, payload);
        std::fs::remove_file(path).ok();
    }
}
