//! `TriggerInformation` (2009): the mandatory first child of `ArrayEvent`.

use binrw::BinReaderExt;

use crate::errors::EventIoError;
use crate::object_view::ObjectView;

use super::read_i32_vec;

#[derive(Debug, Clone)]
pub struct TriggerInformation {
    pub cpu_time: f64,
    pub gps_time: f64,
    pub n_triggered_telescopes: i32,
    pub triggered_telescopes: Vec<i32>,
}

pub fn decode_trigger_information(view: &mut ObjectView) -> Result<TriggerInformation, EventIoError> {
    let cpu_time: f64 = view.read_le()?;
    let gps_time: f64 = view.read_le()?;
    let n_triggered_telescopes = super::read_i32(view)?;
    let triggered_telescopes = read_i32_vec(view, n_triggered_telescopes.max(0) as usize)?;
    Ok(TriggerInformation { cpu_time, gps_time, n_triggered_telescopes, triggered_telescopes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::test_support::{header_with_id, open_at};

    #[test]
    fn decodes_triggered_telescope_list() {
        let mut payload = Vec::new();
        payload.extend(100.5f64.to_le_bytes());
        payload.extend(200.25f64.to_le_bytes());
        payload.extend(3i32.to_le_bytes());
        for id in [1, 2, 3] {
            payload.extend((id as i32).to_le_bytes());
        }

        let (mut source, path) = open_at(&payload, "trigger_information");
        let header = header_with_id(2009, 7, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let trigger = decode_trigger_information(&mut view).unwrap();

        assert_eq!(trigger.cpu_time, 100.5);
        assert_eq!(trigger.n_triggered_telescopes, 3);
        assert_eq!(trigger.triggered_telescopes, vec![1, 2, 3]);
        std::fs::remove_file(path).ok();
    }
}
