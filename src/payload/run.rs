//! Run-level metadata: `RunHeader` (2000) and `MCRunHeader` (2001).

use binrw::{BinRead, BinReaderExt};

use crate::errors::EventIoError;
use crate::object_view::ObjectView;

use super::{read_counted_string, read_f32_vec};

/// sim_telarray run header.
#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct RunHeaderFixed {
    pub run_number: i32,
    pub date: i32,
    pub version: i32,
    pub n_telescopes: i32,
}

#[derive(Debug, Clone)]
pub struct RunHeader {
    pub run_number: i32,
    pub date: i32,
    pub version: i32,
    pub n_telescopes: i32,
    pub observatory: String,
}

pub fn decode_run_header(view: &mut ObjectView) -> Result<RunHeader, EventIoError> {
    let fixed: RunHeaderFixed = view.read_le()?;
    let observatory = read_counted_string(view).unwrap_or_default();
    Ok(RunHeader {
        run_number: fixed.run_number,
        date: fixed.date,
        version: fixed.version,
        n_telescopes: fixed.n_telescopes,
        observatory,
    })
}

/// Monte Carlo run header: shower-generator configuration shared by every
/// event in the run.
#[derive(Debug, Clone, BinRead)]
#[br(little)]
pub struct MCRunHeaderFixed {
    pub shower_prog_id: i32,
    pub shower_prog_vers: i32,
    pub shower_prog_start: i32,
    pub detector_prog_id: i32,
    pub detector_prog_vers: i32,
    pub detector_prog_start: i32,
    pub obsheight: f32,
    pub n_showers: i32,
    pub n_use: i32,
    pub core_pos_mode: i32,
    pub core_range: [f32; 2],
    pub alt_range: [f32; 2],
    pub az_range: [f32; 2],
    pub diffuse: i32,
    pub viewcone: [f32; 2],
    pub energy_range: [f32; 2],
    pub spectral_index: f32,
    pub b_total: f32,
    pub b_inclination: f32,
    pub b_declination: f32,
    pub injection_height: f32,
    pub atmosphere: i32,
}

pub fn decode_mc_run_header(view: &mut ObjectView) -> Result<MCRunHeaderFixed, EventIoError> {
    Ok(view.read_le()?)
}

/// Parallel arrays of telescope positions and radii (CORSIKA `1202`).
#[derive(Debug, Clone, Default)]
pub struct TelescopePositions {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub radius: Vec<f32>,
}

pub fn decode_telescope_positions(view: &mut ObjectView) -> Result<TelescopePositions, EventIoError> {
    let n = super::read_u32(view)? as usize;
    Ok(TelescopePositions {
        x: read_f32_vec(view, n)?,
        y: read_f32_vec(view, n)?,
        z: read_f32_vec(view, n)?,
        radius: read_f32_vec(view, n)?,
    })
}
