//! Simulation-truth records: `MCShower` (2020), `MCEvent` (2021), and
//! `MCPhotoelectronSum` (2026).

use binrw::{BinRead, BinReaderExt};

use crate::errors::EventIoError;
use crate::object_view::ObjectView;

use super::read_f32_vec;

#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct MCShower {
    pub shower_num: i32,
    pub primary_id: i32,
    pub energy: f32,
    pub azimuth: f32,
    pub altitude: f32,
    pub depth_start: f32,
    pub h_first_int: f32,
    pub xmax: f32,
}

pub fn decode_mc_shower(view: &mut ObjectView) -> Result<MCShower, EventIoError> {
    Ok(view.read_le()?)
}

#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct MCEventFixed {
    pub event_num: i32,
    pub shower_num: i32,
    pub xcore: f32,
    pub ycore: f32,
}

#[derive(Debug, Clone)]
pub struct MCEvent {
    pub event_num: i32,
    pub shower_num: i32,
    pub xcore: f32,
    pub ycore: f32,
}

pub fn decode_mc_event(view: &mut ObjectView) -> Result<MCEvent, EventIoError> {
    let fixed: MCEventFixed = view.read_le()?;
    Ok(MCEvent { event_num: fixed.event_num, shower_num: fixed.shower_num, xcore: fixed.xcore, ycore: fixed.ycore })
}

#[derive(Debug, Clone)]
pub struct MCPhotoelectronSum {
    pub num_telescopes: i32,
    pub n_pe: Vec<f32>,
}

pub fn decode_mc_photoelectron_sum(view: &mut ObjectView) -> Result<MCPhotoelectronSum, EventIoError> {
    let num_telescopes = super::read_i32(view)?;
    Ok(MCPhotoelectronSum { num_telescopes, n_pe: read_f32_vec(view, num_telescopes.max(0) as usize)? })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::test_support::{header_with_id, open_at};

    #[test]
    fn decodes_mc_shower_fixed_layout() {
        let mut payload = Vec::new();
        payload.extend(7i32.to_le_bytes());
        payload.extend(1i32.to_le_bytes());
        payload.extend(1.0e14f32.to_le_bytes());
        payload.extend(0.0f32.to_le_bytes());
        payload.extend(0.0f32.to_le_bytes());
        payload.extend(0.0f32.to_le_bytes());
        payload.extend(0.0f32.to_le_bytes());
        payload.extend(0.0f32.to_le_bytes());

        let (mut source, path) = open_at(&payload, "mc_shower");
        let header = header_with_id(2020, 1, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let shower = decode_mc_shower(&mut view).unwrap();

        assert_eq!(shower.shower_num, 7);
        assert_eq!(shower.primary_id, 1);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn decodes_mc_event_core_position() {
        let mut payload = Vec::new();
        payload.extend(3i32.to_le_bytes());
        payload.extend(7i32.to_le_bytes());
        payload.extend(100.0f32.to_le_bytes());
        payload.extend(-50.0f32.to_le_bytes());

        let (mut source, path) = open_at(&payload, "mc_event");
        let header = header_with_id(2021, 1, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let event = decode_mc_event(&mut view).unwrap();

        assert_eq!(event.event_num, 3);
        assert_eq!(event.shower_num, 7);
        assert_eq!(event.xcore, 100.0);
        assert_eq!(event.ycore, -50.0);
        std::fs::remove_file(path).ok();
    }
}
