//! Calibration-event payloads: `CalibrationPhotoelectrons` (2034) and the
//! `PhotoElectrons`/`Photons` grandchildren enumerated under a
//! `TelescopeData` sub-parser (spec.md §4.9).

use binrw::BinRead;

use crate::errors::EventIoError;
use crate::object_view::ObjectView;

use super::read_f32_vec;

#[derive(Debug, Clone, Default)]
pub struct PhotoElectrons {
    pub tel_id: u16,
    pub num_pixels: i32,
    pub pe_count: Vec<f32>,
}

pub fn decode_photoelectrons(view: &mut ObjectView, tel_id: u16) -> Result<PhotoElectrons, EventIoError> {
    let num_pixels = super::read_i32(view)?;
    Ok(PhotoElectrons { tel_id, num_pixels, pe_count: read_f32_vec(view, num_pixels.max(0) as usize)? })
}

/// One Cherenkov photon bunch: a fixed 9-`f32` record (spec.md §4.10,
/// matching the literal field names asserted by the upstream fixture
/// tests).
#[derive(Debug, Clone, Copy, PartialEq, BinRead)]
#[br(little)]
pub struct PhotonBunch {
    pub x: f32,
    pub y: f32,
    pub cx: f32,
    pub cy: f32,
    pub time: f32,
    pub zem: f32,
    pub photons: f32,
    pub lambda: f32,
    pub scattered: f32,
}

/// All bunches (plus an optional emitter bunch) produced by one telescope
/// for one Photons container.
#[derive(Debug, Clone, Default)]
pub struct PhotonBunchArray {
    pub bunches: Vec<PhotonBunch>,
    pub emitter: Option<PhotonBunch>,
}

/// Decodes a Photons container's payload: a `u32` bunch count, that many
/// `PhotonBunch` records, and — only when the count is negative in the
/// wire encoding — one trailing emitter bunch (spec.md §4.9: "emitter is
/// stored only when non-empty").
pub fn decode_photons(view: &mut ObjectView) -> Result<PhotonBunchArray, EventIoError> {
    use binrw::BinReaderExt;
    let raw_count = super::read_i32(view)?;
    let has_emitter = raw_count < 0;
    let count = raw_count.unsigned_abs() as usize;

    let mut bunches = Vec::with_capacity(count);
    for _ in 0..count {
        let bunch: PhotonBunch = view.read_le()?;
        bunches.push(bunch);
    }

    let emitter = if has_emitter { Some(view.read_le::<PhotonBunch>()?) } else { None };

    Ok(PhotonBunchArray { bunches, emitter })
}

#[derive(Debug, Clone, Default)]
pub struct CalibrationPhotoelectrons {
    pub photo_electrons: std::collections::BTreeMap<u16, PhotoElectrons>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::test_support::{header_with_id, open_at};

    fn bunch_bytes(b: PhotonBunch) -> Vec<u8> {
        let mut out = Vec::new();
        for v in [b.x, b.y, b.cx, b.cy, b.time, b.zem, b.photons, b.lambda, b.scattered] {
            out.extend(v.to_le_bytes());
        }
        out
    }

    #[test]
    fn decodes_photons_without_emitter() {
        let bunch = PhotonBunch { x: 1.0, y: 2.0, cx: 0.0, cy: 0.0, time: 0.0, zem: 0.0, photons: 5.0, lambda: 400.0, scattered: 0.0 };
        let mut payload = Vec::new();
        payload.extend(1i32.to_le_bytes());
        payload.extend(bunch_bytes(bunch));

        let (mut source, path) = open_at(&payload, "photons_no_emitter");
        let header = header_with_id(1206, 1, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let decoded = decode_photons(&mut view).unwrap();

        assert_eq!(decoded.bunches.len(), 1);
        assert_eq!(decoded.bunches[0], bunch);
        assert!(decoded.emitter.is_none());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn decodes_photons_with_trailing_emitter() {
        let bunch = PhotonBunch { x: 1.0, y: 2.0, cx: 0.0, cy: 0.0, time: 0.0, zem: 0.0, photons: 5.0, lambda: 400.0, scattered: 0.0 };
        let emitter = PhotonBunch { x: 0.0, y: 0.0, cx: 0.0, cy: 0.0, time: 0.0, zem: 1.0, photons: 1.0, lambda: 400.0, scattered: 0.0 };
        let mut payload = Vec::new();
        payload.extend((-1i32).to_le_bytes());
        payload.extend(bunch_bytes(bunch));
        payload.extend(bunch_bytes(emitter));

        let (mut source, path) = open_at(&payload, "photons_with_emitter");
        let header = header_with_id(1206, 1, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let decoded = decode_photons(&mut view).unwrap();

        assert_eq!(decoded.bunches.len(), 1);
        assert_eq!(decoded.emitter, Some(emitter));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn decodes_photoelectrons_tagged_with_caller_telescope_id() {
        let mut payload = Vec::new();
        payload.extend(2i32.to_le_bytes());
        payload.extend(1.5f32.to_le_bytes());
        payload.extend(2.5f32.to_le_bytes());

        let (mut source, path) = open_at(&payload, "photoelectrons");
        let header = header_with_id(1206, 0, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let pe = decode_photoelectrons(&mut view, 9).unwrap();

        assert_eq!(pe.tel_id, 9);
        assert_eq!(pe.pe_count, vec![1.5, 2.5]);
        std::fs::remove_file(path).ok();
    }
}
