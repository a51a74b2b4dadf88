//! CORSIKA/IACT-level records (type ids `1200-1209`), supplementing the
//! distilled spec with the producer side of the `one_shower`,
//! `3_gammas_reuse_5`, and `two_telescopes` fixtures (`SPEC_FULL.md` §3).

use crate::errors::EventIoError;
use crate::object_view::ObjectView;

use super::{read_counted_string, read_f32, read_f32_vec};

/// CORSIKA run header. The producer emits a fixed 273-float block; only the
/// fields named by `SPEC_FULL.md` §3 are surfaced, the remainder is kept
/// opaque.
#[derive(Debug, Clone, Default)]
pub struct CorsikaRunHeader {
    pub energy_range: (f32, f32),
    pub energy_slope: f32,
    pub rest: Vec<f32>,
}

pub fn decode_run_header(view: &mut ObjectView) -> Result<CorsikaRunHeader, EventIoError> {
    let energy_slope = read_f32(view)?;
    let energy_range = (read_f32(view)?, read_f32(view)?);
    let remaining_words = (view.remaining() / 4) as usize;
    let rest = read_f32_vec(view, remaining_words)?;
    Ok(CorsikaRunHeader { energy_range, energy_slope, rest })
}

#[derive(Debug, Clone, Default)]
pub struct CorsikaInputCard {
    pub text: String,
}

pub fn decode_input_card(view: &mut ObjectView) -> Result<CorsikaInputCard, EventIoError> {
    Ok(CorsikaInputCard { text: read_counted_string(view)? })
}

/// `CorsikaEventHeader` (1204): the 273-float CORSIKA event-header block,
/// with the fields the fixtures assert directly (`event_id`, `zenith_angle`,
/// `azimuth_angle`, `total_energy`) surfaced and the rest carried opaquely.
#[derive(Debug, Clone, Default)]
pub struct CorsikaEventHeader {
    pub event_id: i32,
    pub zenith_angle: f32,
    pub azimuth_angle: f32,
    pub total_energy: f32,
    pub rest: Vec<f32>,
}

pub fn decode_event_header(view: &mut ObjectView) -> Result<CorsikaEventHeader, EventIoError> {
    let event_id = super::read_i32(view)?;
    let total_energy = read_f32(view)?;
    let zenith_angle = read_f32(view)?;
    let azimuth_angle = read_f32(view)?;
    let remaining_words = (view.remaining() / 4) as usize;
    let rest = read_f32_vec(view, remaining_words)?;
    Ok(CorsikaEventHeader { event_id, zenith_angle, azimuth_angle, total_energy, rest })
}

/// `CorsikaArrayOffsets` (1205): one `(x, y)` core offset per reuse sample.
#[derive(Debug, Clone, Default)]
pub struct CorsikaArrayOffsets {
    pub offsets: Vec<(f32, f32)>,
}

pub fn decode_array_offsets(view: &mut ObjectView) -> Result<CorsikaArrayOffsets, EventIoError> {
    let n_reuse = super::read_u32(view)? as usize;
    let xs = read_f32_vec(view, n_reuse)?;
    let ys = read_f32_vec(view, n_reuse)?;
    Ok(CorsikaArrayOffsets { offsets: xs.into_iter().zip(ys).collect() })
}

#[derive(Debug, Clone, Default)]
pub struct CorsikaRunEnd {
    pub n_events_processed: i32,
}

pub fn decode_run_end(view: &mut ObjectView) -> Result<CorsikaRunEnd, EventIoError> {
    Ok(CorsikaRunEnd { n_events_processed: super::read_i32(view)? })
}
