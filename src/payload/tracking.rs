//! `TrackingPosition` (telescope-id-encoded, base `2100`): where a telescope
//! was pointed for one array event.
//!
//! The header `id` field packs two presence flags alongside a redundant
//! copy of the telescope id (spec.md §4.4): bit 8 = `has_raw`, bit 9 =
//! `has_cor`; bits `0..=7` and `24..=29` (the latter shifted right by 16)
//! reconstruct the telescope id, which must agree with the type-derived one.

use crate::errors::EventIoError;
use crate::header::Header;
use crate::object_view::ObjectView;

use super::read_f32;

#[derive(Debug, Clone, Copy, Default)]
pub struct TrackingPosition {
    pub azimuth_raw: Option<f32>,
    pub altitude_raw: Option<f32>,
    pub azimuth_cor: Option<f32>,
    pub altitude_cor: Option<f32>,
}

/// Telescope id redundantly encoded in the header `id` word, and the
/// `has_raw`/`has_cor` presence flags that determine the payload shape.
pub fn id_flags(header: &Header) -> (u16, bool, bool) {
    let id = header.id;
    let has_raw = id & (1 << 8) != 0;
    let has_cor = id & (1 << 9) != 0;
    let low = id & 0xFF;
    let high = (id >> 16) & 0x3F;
    let tel_id = (low | (high << 8)) as u16;
    (tel_id, has_raw, has_cor)
}

pub fn decode_tracking_position(
    view: &mut ObjectView,
    expected_tel_id: u16,
) -> Result<TrackingPosition, EventIoError> {
    let (encoded_tel_id, has_raw, has_cor) = id_flags(view.header());
    if encoded_tel_id != expected_tel_id {
        return Err(EventIoError::TelescopeIdMismatch {
            from_type: crate::types::RecordKind::tracking_type(expected_tel_id),
            from_id: encoded_tel_id,
        });
    }

    let mut out = TrackingPosition::default();
    if has_raw {
        out.azimuth_raw = Some(read_f32(view)?);
        out.altitude_raw = Some(read_f32(view)?);
    }
    if has_cor {
        out.azimuth_cor = Some(read_f32(view)?);
        out.altitude_cor = Some(read_f32(view)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::test_support::open_at;

    fn header_for(tel_id: u16, has_raw: bool, has_cor: bool, length: u64) -> Header {
        let mut id = (tel_id as u32 & 0xFF) | (((tel_id as u32 & 0x3F00) >> 8) << 16);
        if has_raw {
            id |= 1 << 8;
        }
        if has_cor {
            id |= 1 << 9;
        }
        Header {
            r#type: crate::types::RecordKind::tracking_type(tel_id),
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

    #[test]
    fn id_flags_roundtrips_telescope_id_and_both_flags() {
        let header = header_for(105, true, true, 16);
        let (tel_id, has_raw, has_cor) = id_flags(&header);
        assert_eq!(tel_id, 105);
        assert!(has_raw);
        assert!(has_cor);
    }

    #[test]
    fn decodes_raw_only_payload() {
        let mut payload = Vec::new();
        payload.extend(1.5f32.to_le_bytes());
        payload.extend(45.0f32.to_le_bytes());
        let (mut source, path) = open_at(&payload, "tracking_raw_only");
        let header = header_for(5, true, false, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let position = decode_tracking_position(&mut view, 5).unwrap();

        assert_eq!(position.azimuth_raw, Some(1.5));
        assert_eq!(position.altitude_raw, Some(45.0));
        assert_eq!(position.azimuth_cor, None);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn mismatched_expected_telescope_id_is_an_error() {
        let (mut source, path) = open_at(&[], "tracking_mismatch");
        let header = header_for(5, false, false, 0);
        let mut view = ObjectView::new(&mut source, header);
        let err = decode_tracking_position(&mut view, 6).unwrap_err();
        assert!(matches!(err, EventIoError::TelescopeIdMismatch { from_id: 5, .. }));
        std::fs::remove_file(path).ok();
    }
}
