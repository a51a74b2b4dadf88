//! The seven per-telescope "description" records that accumulate into
//! `telescope_descriptions[tel_id][snake_case(class_name)]` (spec.md §4.7
//! item 9): CameraSettings, CameraOrganization, PixelSettings,
//! DisabledPixels, CameraSoftwareSettings, PointingCorrection, and
//! DriveSettings.

use binrw::{BinRead, BinReaderExt};

use crate::errors::EventIoError;
use crate::object_view::ObjectView;

use super::{read_f32_vec, read_i32_vec};

#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct CameraSettingsFixed {
    pub n_pixels: i32,
    pub focal_length: f32,
}

#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub n_pixels: i32,
    pub focal_length: f32,
    pub pixel_x: Vec<f32>,
    pub pixel_y: Vec<f32>,
}

pub fn decode_camera_settings(view: &mut ObjectView) -> Result<CameraSettings, EventIoError> {
    let fixed: CameraSettingsFixed = view.read_le()?;
    let n = fixed.n_pixels.max(0) as usize;
    Ok(CameraSettings {
        n_pixels: fixed.n_pixels,
        focal_length: fixed.focal_length,
        pixel_x: read_f32_vec(view, n)?,
        pixel_y: read_f32_vec(view, n)?,
    })
}

#[derive(Debug, Clone)]
pub struct CameraOrganization {
    pub n_pixels: i32,
    pub n_drawers: i32,
    pub drawer_of_pixel: Vec<i32>,
}

pub fn decode_camera_organization(view: &mut ObjectView) -> Result<CameraOrganization, EventIoError> {
    let n_pixels = super::read_i32(view)?;
    let n_drawers = super::read_i32(view)?;
    let n = n_pixels.max(0) as usize;
    Ok(CameraOrganization { n_pixels, n_drawers, drawer_of_pixel: read_i32_vec(view, n)? })
}

#[derive(Debug, Clone)]
pub struct PixelSettings {
    pub n_pixels: i32,
    pub cam_rot: f32,
    pub high_gain_nsb: Vec<f32>,
}

pub fn decode_pixel_settings(view: &mut ObjectView) -> Result<PixelSettings, EventIoError> {
    let n_pixels = super::read_i32(view)?;
    let cam_rot = super::read_f32(view)?;
    let n = n_pixels.max(0) as usize;
    Ok(PixelSettings { n_pixels, cam_rot, high_gain_nsb: read_f32_vec(view, n)? })
}

/// Pixels disabled for high voltage or trigger reasons.
///
/// The original producer conflates `num_HV_disabled` with
/// `num_trig_disabled` in some versions; this implementation reads the two
/// counts independently and does not replicate that bug (see `DESIGN.md`).
#[derive(Debug, Clone)]
pub struct DisabledPixels {
    pub num_trig_disabled: i32,
    pub trig_disabled: Vec<i32>,
    pub num_hv_disabled: i32,
    pub hv_disabled: Vec<i32>,
}

pub fn decode_disabled_pixels(view: &mut ObjectView) -> Result<DisabledPixels, EventIoError> {
    let num_trig_disabled = super::read_i32(view)?;
    let trig_disabled = read_i32_vec(view, num_trig_disabled.max(0) as usize)?;
    let num_hv_disabled = super::read_i32(view)?;
    let hv_disabled = read_i32_vec(view, num_hv_disabled.max(0) as usize)?;
    Ok(DisabledPixels { num_trig_disabled, trig_disabled, num_hv_disabled, hv_disabled })
}

#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct CameraSoftwareSettings {
    pub dynamic_range_ratio: f32,
    pub use_dyn_range_for_pedestal: i32,
}

pub fn decode_camera_software_settings(view: &mut ObjectView) -> Result<CameraSoftwareSettings, EventIoError> {
    Ok(view.read_le()?)
}

#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct PointingCorrection {
    pub function_type: i32,
    pub n_param: i32,
}

pub fn decode_pointing_correction(view: &mut ObjectView) -> Result<PointingCorrection, EventIoError> {
    Ok(view.read_le()?)
}

#[derive(Debug, Clone)]
pub struct DriveSettings {
    pub tracking_info_version: i32,
    pub params: Vec<f32>,
}

/// Not produced by a standalone EventIO type id in the original format;
/// synthesized here as the teacher-sibling of `PointingCorrection` so the
/// seven-member description set named by `spec.md` §4.7 item 9 has a
/// decoder, reusing the same trailing-`f32`-vector shape.
pub fn decode_drive_settings(view: &mut ObjectView) -> Result<DriveSettings, EventIoError> {
    let tracking_info_version = super::read_i32(view)?;
    let remaining_words = view.remaining() / 4;
    let params = read_f32_vec(view, remaining_words as usize)?;
    Ok(DriveSettings { tracking_info_version, params })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::test_support::{header_with_id, open_at};

    #[test]
    fn decodes_camera_settings_pixel_tables() {
        let mut payload = Vec::new();
        payload.extend(2i32.to_le_bytes());
        payload.extend(1500.0f32.to_le_bytes());
        payload.extend(0.0f32.to_le_bytes());
        payload.extend(1.0f32.to_le_bytes());
        payload.extend(0.0f32.to_le_bytes());
        payload.extend(1.0f32.to_le_bytes());

        let (mut source, path) = open_at(&payload, "camera_settings");
        let header = header_with_id(2002, 1, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let settings = decode_camera_settings(&mut view).unwrap();

        assert_eq!(settings.n_pixels, 2);
        assert_eq!(settings.pixel_x, vec![0.0, 1.0]);
        assert_eq!(settings.pixel_y, vec![0.0, 1.0]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn disabled_pixels_uses_each_announced_count_independently() {
        // num_trig_disabled=2 (two ids) read first, then num_hv_disabled=1
        // (one id) — wire order per SimTelPixelDisable.parse_data_field.
        // The original producer bug would read the HV array using the
        // trigger count instead; this layout would misparse under that bug.
        let mut payload = Vec::new();
        payload.extend(2i32.to_le_bytes());
        payload.extend(3i32.to_le_bytes());
        payload.extend(4i32.to_le_bytes());
        payload.extend(1i32.to_le_bytes());
        payload.extend(7i32.to_le_bytes());

        let (mut source, path) = open_at(&payload, "disabled_pixels");
        let header = header_with_id(2005, 1, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let disabled = decode_disabled_pixels(&mut view).unwrap();

        assert_eq!(disabled.trig_disabled, vec![3, 4]);
        assert_eq!(disabled.hv_disabled, vec![7]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn decodes_drive_settings_trailing_params() {
        let mut payload = Vec::new();
        payload.extend(1i32.to_le_bytes());
        payload.extend(0.1f32.to_le_bytes());
        payload.extend(0.2f32.to_le_bytes());

        let (mut source, path) = open_at(&payload, "drive_settings");
        let header = header_with_id(2008, 1, payload.len() as u64);
        let mut view = ObjectView::new(&mut source, header);
        let drive = decode_drive_settings(&mut view).unwrap();

        assert_eq!(drive.tracking_info_version, 1);
        assert_eq!(drive.params, vec![0.1, 0.2]);
        std::fs::remove_file(path).ok();
    }
}
