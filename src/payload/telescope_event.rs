//! Per-telescope event payloads nested under a telescope-event record
//! (`2200`-range): header, raw ADC data, derived image parameters, and
//! pixel-level extras.

use binrw::{BinRead, BinReaderExt};

use crate::errors::EventIoError;
use crate::object_view::ObjectView;

use super::{read_f32_vec, read_i32_vec, read_u32};

#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct TelescopeEventHeader {
    pub glob_count: i32,
    pub loc_count: i32,
    pub cpu_time: f64,
    pub gps_time: f64,
    pub trigger_pattern: i32,
    pub zero_sup_mode: i32,
}

pub fn decode_telescope_event_header(view: &mut ObjectView) -> Result<TelescopeEventHeader, EventIoError> {
    Ok(view.read_le()?)
}

#[derive(Debug, Clone)]
pub struct AdcSums {
    pub num_gains: i32,
    pub num_pixels: i32,
    pub sums: Vec<i32>,
}

pub fn decode_adc_sums(view: &mut ObjectView) -> Result<AdcSums, EventIoError> {
    let num_gains = super::read_i32(view)?;
    let num_pixels = super::read_i32(view)?;
    let total = (num_gains.max(0) as usize) * (num_pixels.max(0) as usize);
    Ok(AdcSums { num_gains, num_pixels, sums: read_i32_vec(view, total)? })
}

#[derive(Debug, Clone)]
pub struct AdcSamples {
    pub num_gains: i32,
    pub num_pixels: i32,
    pub num_samples: i32,
    pub samples: Vec<i32>,
}

pub fn decode_adc_samples(view: &mut ObjectView) -> Result<AdcSamples, EventIoError> {
    let num_gains = super::read_i32(view)?;
    let num_pixels = super::read_i32(view)?;
    let num_samples = super::read_i32(view)?;
    let total = (num_gains.max(0) as usize) * (num_pixels.max(0) as usize) * (num_samples.max(0) as usize);
    Ok(AdcSamples { num_gains, num_pixels, num_samples, samples: read_i32_vec(view, total)? })
}

#[derive(Debug, Clone)]
pub struct ImageParameters {
    pub num_trig_pixels: i32,
    pub num_image_pixels: i32,
    pub amplitude: f32,
    pub width: f32,
    pub length: f32,
}

pub fn decode_image_parameters(view: &mut ObjectView) -> Result<ImageParameters, EventIoError> {
    let num_trig_pixels = super::read_i32(view)?;
    let num_image_pixels = super::read_i32(view)?;
    let amplitude = super::read_f32(view)?;
    let width = super::read_f32(view)?;
    let length = super::read_f32(view)?;
    Ok(ImageParameters { num_trig_pixels, num_image_pixels, amplitude, width, length })
}

#[derive(Debug, Clone)]
pub struct StereoReconstruction {
    pub result_bits: i32,
    pub num_trig: i32,
    pub direction: [f32; 2],
    pub core: [f32; 2],
}

pub fn decode_stereo_reconstruction(view: &mut ObjectView) -> Result<StereoReconstruction, EventIoError> {
    let result_bits = super::read_i32(view)?;
    let num_trig = super::read_i32(view)?;
    let direction = [super::read_f32(view)?, super::read_f32(view)?];
    let core = [super::read_f32(view)?, super::read_f32(view)?];
    Ok(StereoReconstruction { result_bits, num_trig, direction, core })
}

#[derive(Debug, Clone)]
pub struct PixelTiming {
    pub num_pixels: i32,
    pub peak_time: Vec<f32>,
}

pub fn decode_pixel_timing(view: &mut ObjectView) -> Result<PixelTiming, EventIoError> {
    let num_pixels = super::read_i32(view)?;
    Ok(PixelTiming { num_pixels, peak_time: read_f32_vec(view, num_pixels.max(0) as usize)? })
}

/// `PixelList` (2027): an only-sub-objects container in some producers, a
/// flat pixel-index list in others; this implementation treats it as the
/// flat form, matching the teacher's "read everything this version defines,
/// ignore the rest" tolerance (spec.md §4.4's version-gated decoder note).
#[derive(Debug, Clone)]
pub struct PixelList {
    pub code: i32,
    pub pixels: Vec<i32>,
}

pub fn decode_pixel_list(view: &mut ObjectView) -> Result<PixelList, EventIoError> {
    let code = super::read_i32(view)?;
    let n = read_u32(view)? as usize;
    Ok(PixelList { code, pixels: read_i32_vec(view, n)? })
}
