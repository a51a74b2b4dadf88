//! Cumulative per-telescope monitoring records. Each of these merge-updates
//! into a map on the assembler (spec.md §4.7 items 6-7) rather than being
//! consumed once; decoding here just produces the snapshot value for one
//! occurrence.

use crate::errors::EventIoError;
use crate::object_view::ObjectView;

use super::{read_f32_vec, read_i32_vec};

#[derive(Debug, Clone, Default)]
pub struct CameraMonitoring {
    pub num_pixels: i32,
    pub pedestal: Vec<f32>,
    pub hv_setting: Vec<i32>,
}

impl CameraMonitoring {
    /// Merges a newly-decoded occurrence into the cumulative entry,
    /// matching `simtelfile.py`'s `self.camera_monitorings[id].update(o.parse())`:
    /// a field the new record actually carries replaces the old value, an
    /// empty (not-carried) field leaves the accumulated one untouched.
    pub fn merge(&mut self, new: Self) {
        self.num_pixels = new.num_pixels;
        if !new.pedestal.is_empty() {
            self.pedestal = new.pedestal;
        }
        if !new.hv_setting.is_empty() {
            self.hv_setting = new.hv_setting;
        }
    }
}

pub fn decode_camera_monitoring(view: &mut ObjectView) -> Result<CameraMonitoring, EventIoError> {
    let num_pixels = super::read_i32(view)?;
    let n = num_pixels.max(0) as usize;
    Ok(CameraMonitoring { num_pixels, pedestal: read_f32_vec(view, n)?, hv_setting: read_i32_vec(view, n)? })
}

#[derive(Debug, Clone, Default)]
pub struct LaserCalibration {
    pub num_pixels: i32,
    pub calib: Vec<f32>,
}

impl LaserCalibration {
    /// See [`CameraMonitoring::merge`].
    pub fn merge(&mut self, new: Self) {
        self.num_pixels = new.num_pixels;
        if !new.calib.is_empty() {
            self.calib = new.calib;
        }
    }
}

pub fn decode_laser_calibration(view: &mut ObjectView) -> Result<LaserCalibration, EventIoError> {
    let num_pixels = super::read_i32(view)?;
    Ok(LaserCalibration { num_pixels, calib: read_f32_vec(view, num_pixels.max(0) as usize)? })
}

#[derive(Debug, Clone, Default)]
pub struct PixelMonitoring {
    pub num_pixels: i32,
    pub current: Vec<f32>,
}

impl PixelMonitoring {
    /// See [`CameraMonitoring::merge`].
    pub fn merge(&mut self, new: Self) {
        self.num_pixels = new.num_pixels;
        if !new.current.is_empty() {
            self.current = new.current;
        }
    }
}

pub fn decode_pixel_monitoring(view: &mut ObjectView) -> Result<PixelMonitoring, EventIoError> {
    let num_pixels = super::read_i32(view)?;
    Ok(PixelMonitoring { num_pixels, current: read_f32_vec(view, num_pixels.max(0) as usize)? })
}

#[derive(Debug, Clone, Default)]
pub struct PixelTriggerTimes {
    pub num_pixels: i32,
    pub trigger_time: Vec<f32>,
}

pub fn decode_pixel_trigger_times(view: &mut ObjectView) -> Result<PixelTriggerTimes, EventIoError> {
    let num_pixels = super::read_i32(view)?;
    Ok(PixelTriggerTimes { num_pixels, trigger_time: read_f32_vec(view, num_pixels.max(0) as usize)? })
}

/// Opaque auxiliary trace blob (2040/2041): retained byte-for-byte since no
/// named field layout is specified beyond "trace data", matching spec.md
/// §1's "treat as opaque/structured blob where the spec requires a field."
#[derive(Debug, Clone, Default)]
pub struct AuxiliaryTraces {
    pub raw: Vec<u8>,
}

pub fn decode_auxiliary_analog_traces(view: &mut ObjectView) -> Result<AuxiliaryTraces, EventIoError> {
    decode_opaque(view)
}

pub fn decode_auxiliary_digital_traces(view: &mut ObjectView) -> Result<AuxiliaryTraces, EventIoError> {
    decode_opaque(view)
}

fn decode_opaque(view: &mut ObjectView) -> Result<AuxiliaryTraces, EventIoError> {
    use std::io::Read;
    let mut raw = vec![0u8; view.remaining() as usize];
    view.read_exact(&mut raw)?;
    Ok(AuxiliaryTraces { raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::test_support::{header_with_id, open_at};

    #[test]
    fn decodes_camera_monitoring_parallel_arrays() {
        let mut payload = Vec::new();
        payload.extend(2i32.to_le_bytes());
        payload.extend(1.0f32.to_le_bytes());
        payload.extend(2.0f32.to_le_bytes());
        payload.extend(800i32.to_le_bytes());
        payload.extend(900i32.to_le_bytes());

        let (mut source, path) = open_at(&payload, "camera_monitoring");
        let header = header_with_id(2022, 5, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let monitoring = decode_camera_monitoring(&mut view).unwrap();

        assert_eq!(monitoring.num_pixels, 2);
        assert_eq!(monitoring.pedestal, vec![1.0, 2.0]);
        assert_eq!(monitoring.hv_setting, vec![800, 900]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn merge_keeps_prior_field_when_new_occurrence_omits_it() {
        let mut accumulated = CameraMonitoring { num_pixels: 2, pedestal: vec![1.0, 2.0], hv_setting: vec![800, 900] };
        let later = CameraMonitoring { num_pixels: 2, pedestal: vec![1.5, 2.5], hv_setting: Vec::new() };
        accumulated.merge(later);
        assert_eq!(accumulated.pedestal, vec![1.5, 2.5]);
        assert_eq!(accumulated.hv_setting, vec![800, 900]);
    }

    #[test]
    fn decodes_auxiliary_traces_as_opaque_bytes() {
        let payload = vec![1u8, 2, 3, 4, 5];
        let (mut source, path) = open_at(&payload, "auxiliary_traces");
        let header = header_with_id(2040, 1, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let traces = decode_auxiliary_analog_traces(&mut view).unwrap();

        assert_eq!(traces.raw, payload);
        std::fs::remove_file(path).ok();
    }
}
