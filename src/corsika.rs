//! CORSIKA event sub-parser (`SPEC_FULL.md` §4.10): walks one `CorsikaEvent`
//! (type `1203`, only-sub-objects) container and yields one [`CorsikaEvent`]
//! per reuse sample, each stamped with `event_id` and `reuse`.
//!
//! Grounded on `eventio.iact`'s per-reuse iteration in `simtelfile.py` and
//! the field/shape assertions in the upstream `test_iact_file.py` fixtures.

use crate::byte_source::ByteSource;
use crate::errors::EventIoError;
use crate::events::{CorsikaEvent, CorsikaEventHeaderView};
use crate::object::IndexEntry;
use crate::object_view::ObjectView;
use crate::payload::calibration::decode_photons;
use crate::payload::corsika::{decode_array_offsets, decode_event_header};
use crate::types::RecordKind;

/// Parses one `CorsikaEvent` container into its per-reuse events.
pub fn decode_corsika_event(
    entry: &IndexEntry,
    source: &mut ByteSource,
) -> Result<Vec<CorsikaEvent>, EventIoError> {
    let header_entry = entry.children.iter().find(|c| {
        matches!(RecordKind::from_type(c.header.r#type), RecordKind::CorsikaEventHeader)
    });
    let offsets_entry = entry.children.iter().find(|c| {
        matches!(RecordKind::from_type(c.header.r#type), RecordKind::CorsikaArrayOffsets)
    });

    let header_entry = header_entry.ok_or(EventIoError::UnexpectedChildType {
        expected: "CorsikaEventHeader",
        got: entry.children.first().map(|c| c.header.r#type).unwrap_or(0),
    })?;
    let offsets_entry = offsets_entry.ok_or(EventIoError::UnexpectedChildType {
        expected: "CorsikaArrayOffsets",
        got: entry.children.first().map(|c| c.header.r#type).unwrap_or(0),
    })?;

    let event_header = {
        let mut view = ObjectView::new(source, header_entry.header.clone());
        decode_event_header(&mut view)?
    };
    let array_offsets = {
        let mut view = ObjectView::new(source, offsets_entry.header.clone());
        decode_array_offsets(&mut view)?
    };
    let n_reuse = array_offsets.offsets.len().max(1);

    let mut photons_children: Vec<(u16, &IndexEntry)> = entry
        .children
        .iter()
        .filter_map(|c| match RecordKind::from_type(c.header.r#type) {
            RecordKind::CorsikaPhotons(tel_idx) => Some((tel_idx, c)),
            _ => None,
        })
        .collect();
    // Stable in file order; file order is reuse-major, telescope-minor.
    photons_children.sort_by_key(|(_, c)| c.header.first_byte);

    let n_telescopes = if n_reuse == 0 { 0 } else { photons_children.len() / n_reuse };

    let header_view = CorsikaEventHeaderView {
        event_id: event_header.event_id,
        zenith_angle: event_header.zenith_angle,
        azimuth_angle: event_header.azimuth_angle,
        total_energy: event_header.total_energy,
    };

    let mut events = Vec::with_capacity(n_reuse);
    for reuse in 0..n_reuse {
        let mut photon_bunches = Vec::with_capacity(n_telescopes);
        for tel_pos in 0..n_telescopes {
            let (_, child) = photons_children[reuse * n_telescopes + tel_pos];
            let mut view = ObjectView::new(source, child.header.clone());
            photon_bunches.push(decode_photons(&mut view)?);
        }
        events.push(CorsikaEvent {
            event_id: event_header.event_id,
            reuse: (reuse + 1) as u32,
            header: header_view.clone(),
            photon_bunches,
        });
    }

    Ok(events)
}

/// End-to-end reader/assembler tests against synthetic byte streams
/// reproducing the literal `spec.md` §8 fixtures (`one_shower`,
/// `3_gammas_reuse_5`, `two_telescopes`). No real CORSIKA/sim_telarray
/// binaries are available in this environment, so each fixture is built
/// byte-for-byte from the framing grammar in §6, driven through
/// [`crate::EventIoReader::open`] rather than calling the payload decoders
/// directly.
#[cfg(test)]
mod fixture_tests {
    use std::io::Write;
    use std::path::PathBuf;

    use crate::byte_source::SYNC_MARKER_LE;
    use crate::EventIoReader;

    fn record_bytes(r#type: u16, id: u32, only_sub: bool, payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((r#type as u32).to_le_bytes());
        bytes.extend(id.to_le_bytes());
        let mut length_word = payload.len() as u32;
        if only_sub {
            length_word |= 1 << 30;
        }
        bytes.extend(length_word.to_le_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    fn top_level(r#type: u16, id: u32, only_sub: bool, payload: &[u8]) -> Vec<u8> {
        let mut bytes = SYNC_MARKER_LE.to_vec();
        bytes.extend(record_bytes(r#type, id, only_sub, payload));
        bytes
    }

    fn run_header_payload(energy_slope: f32, energy_range: (f32, f32)) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend(energy_slope.to_le_bytes());
        p.extend(energy_range.0.to_le_bytes());
        p.extend(energy_range.1.to_le_bytes());
        p
    }

    fn input_card_payload(text: &str) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend((text.len() as u32).to_le_bytes());
        p.extend_from_slice(text.as_bytes());
        p
    }

    fn telescope_positions_payload(xs: &[f32]) -> Vec<u8> {
        let n = xs.len();
        let mut p = Vec::new();
        p.extend((n as u32).to_le_bytes());
        for &x in xs {
            p.extend(x.to_le_bytes());
        }
        for _ in 0..n {
            p.extend(0.0f32.to_le_bytes()); // y
        }
        for _ in 0..n {
            p.extend(0.0f32.to_le_bytes()); // z
        }
        for _ in 0..n {
            p.extend(12.5f32.to_le_bytes()); // radius
        }
        p
    }

    fn event_header_payload(event_id: i32, total_energy: f32, zenith_angle: f32, azimuth_angle: f32) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend(event_id.to_le_bytes());
        p.extend(total_energy.to_le_bytes());
        p.extend(zenith_angle.to_le_bytes());
        p.extend(azimuth_angle.to_le_bytes());
        p
    }

    fn array_offsets_payload(n_reuse: usize) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend((n_reuse as u32).to_le_bytes());
        for i in 0..n_reuse {
            p.extend((i as f32).to_le_bytes()); // x offsets
        }
        for i in 0..n_reuse {
            p.extend((-(i as f32)).to_le_bytes()); // y offsets
        }
        p
    }

    fn photons_payload(n_bunches: usize) -> Vec<u8> {
        let mut p = Vec::new();
        p.extend((n_bunches as i32).to_le_bytes());
        for i in 0..n_bunches {
            let v = i as f32;
            for field in [v, v, 0.0, 0.0, 0.0, 0.0, 1.0, 400.0, 0.0] {
                p.extend(field.to_le_bytes());
            }
        }
        p
    }

    fn run_end_payload(n_events_processed: i32) -> Vec<u8> {
        n_events_processed.to_le_bytes().to_vec()
    }

    fn temp_file(bytes: &[u8], tag: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("eventio_fixture_test_{}_{}.dat", std::process::id(), tag));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    /// One physical shower, one reuse sample, one telescope: the literal
    /// `one_shower` fixture (`spec.md` §8).
    #[test]
    fn one_shower_fixture() {
        let mut bytes = Vec::new();
        bytes.extend(top_level(1200, 0, false, &run_header_payload(-2.7, (5.0, 100.0))));
        bytes.extend(top_level(1201, 0, false, &input_card_payload("RUNNR 1")));
        bytes.extend(top_level(1202, 0, false, &telescope_positions_payload(&[0.0])));

        let mut event_payload = Vec::new();
        event_payload.extend(record_bytes(1204, 0, false, &event_header_payload(1, 9.3249321, 0.0, 0.0)));
        event_payload.extend(record_bytes(1205, 0, false, &array_offsets_payload(1)));
        event_payload.extend(record_bytes(1206, 0, false, &photons_payload(382)));
        bytes.extend(top_level(1203, 1, true, &event_payload));

        bytes.extend(top_level(1209, 0, false, &run_end_payload(1)));

        let path = temp_file(&bytes, "one_shower");
        let reader = EventIoReader::open(&path).unwrap();

        let header = reader.corsika_header().unwrap();
        assert_eq!(header.energy_range, (5.0, 100.0));
        assert!((header.energy_slope - (-2.7)).abs() < 1e-6);
        assert_eq!(reader.n_telescopes(), 1);
        assert!((reader.telescope_positions().unwrap().x[0]).abs() < 1e-6);
        assert!(!reader.input_cards().is_empty());

        let events: Vec<_> = reader.corsika_events().collect();
        assert_eq!(events.len(), 1);
        let event = events[0];
        assert_eq!(event.event_id, 1);
        assert_eq!(event.reuse, 1);
        assert_eq!(event.header.event_id, 1);
        assert!(event.header.zenith_angle.abs() < 1e-6);
        assert!(event.header.azimuth_angle.abs() < 1e-6);
        assert!((event.header.total_energy - 9.3249321).abs() < 1e-4);
        assert_eq!(event.photon_bunches[0].bunches.len(), 382);

        assert!(reader.run_end().is_some());
        std::fs::remove_file(path).ok();
    }

    /// Three showers, five reuse samples each: the literal
    /// `3_gammas_reuse_5` fixture (`spec.md` §8). Iterating yields 15
    /// events; `event_id == i / 5 + 1`, `reuse == i % 5 + 1`.
    #[test]
    fn three_gammas_reuse_5_fixture() {
        let mut bytes = Vec::new();
        for shower in 0..3 {
            let event_id = shower + 1;
            let mut event_payload = Vec::new();
            event_payload.extend(record_bytes(1204, 0, false, &event_header_payload(event_id, 1.0, 0.0, 0.0)));
            event_payload.extend(record_bytes(1205, 0, false, &array_offsets_payload(5)));
            for _ in 0..5 {
                event_payload.extend(record_bytes(1206, 0, false, &photons_payload(1)));
            }
            bytes.extend(top_level(1203, event_id as u32, true, &event_payload));
        }

        let path = temp_file(&bytes, "three_gammas_reuse_5");
        let reader = EventIoReader::open(&path).unwrap();

        let events: Vec<_> = reader.corsika_events().collect();
        assert_eq!(events.len(), 15);
        for (i, event) in events.iter().enumerate() {
            assert_eq!(event.event_id, (i / 5) as i32 + 1);
            assert_eq!(event.reuse, (i % 5) as u32 + 1);
        }
        std::fs::remove_file(path).ok();
    }

    /// Two telescopes, one reuse sample: the literal `two_telescopes`
    /// fixture (`spec.md` §8).
    #[test]
    fn two_telescopes_fixture() {
        let mut bytes = Vec::new();
        bytes.extend(top_level(1202, 0, false, &telescope_positions_payload(&[0.0, 5000.0])));

        let mut event_payload = Vec::new();
        event_payload.extend(record_bytes(1204, 0, false, &event_header_payload(1, 1.0, 0.0, 0.0)));
        event_payload.extend(record_bytes(1205, 0, false, &array_offsets_payload(1)));
        event_payload.extend(record_bytes(1206, 0, false, &photons_payload(3)));
        event_payload.extend(record_bytes(1207, 0, false, &photons_payload(3)));
        bytes.extend(top_level(1203, 1, true, &event_payload));

        let path = temp_file(&bytes, "two_telescopes");
        let reader = EventIoReader::open(&path).unwrap();

        assert_eq!(reader.n_telescopes(), 2);
        assert!((reader.telescope_positions().unwrap().x[1] - 5000.0).abs() < 1e-3);

        let events: Vec<_> = reader.corsika_events().collect();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].photon_bunches.len(), 2);
        std::fs::remove_file(path).ok();
    }
}
