//! Domain entities handed to the caller: the output of the assembler, as
//! opposed to the raw per-record payload types under [`crate::payload`].

use std::collections::BTreeMap;

use crate::payload::calibration::{PhotoElectrons, PhotonBunchArray};
use crate::payload::mc::{MCEvent as McEventPayload, MCShower};
use crate::payload::monitoring::{CameraMonitoring, LaserCalibration, PixelMonitoring};
use crate::payload::run::{MCRunHeaderFixed, RunHeader as RunHeaderPayload, TelescopePositions};
use crate::payload::telescope_event::{
    AdcSamples, AdcSums, ImageParameters, PixelList, PixelTiming, PixelTriggerTimes,
    StereoReconstruction, TelescopeEventHeader,
};
use crate::payload::tracking::TrackingPosition;
use crate::payload::trigger::TriggerInformation;

/// Per-telescope description, the seven records that must each appear
/// exactly once per telescope before events begin (spec.md §3).
#[derive(Debug, Clone, Default)]
pub struct TelescopeDescription {
    pub camera_settings: Option<crate::payload::telescope_description::CameraSettings>,
    pub camera_organization: Option<crate::payload::telescope_description::CameraOrganization>,
    pub pixel_settings: Option<crate::payload::telescope_description::PixelSettings>,
    pub disabled_pixels: Option<crate::payload::telescope_description::DisabledPixels>,
    pub camera_software_settings: Option<crate::payload::telescope_description::CameraSoftwareSettings>,
    pub drive_settings: Option<crate::payload::telescope_description::DriveSettings>,
    pub pointing_correction: Option<crate::payload::telescope_description::PointingCorrection>,
}

impl TelescopeDescription {
    /// True once all seven fields have been set (the assembler's "header
    /// readiness" gate checks this per telescope).
    pub fn is_complete(&self) -> bool {
        self.camera_settings.is_some()
            && self.camera_organization.is_some()
            && self.pixel_settings.is_some()
            && self.disabled_pixels.is_some()
            && self.camera_software_settings.is_some()
            && self.drive_settings.is_some()
            && self.pointing_correction.is_some()
    }
}

/// One telescope's contribution to an array event: the raw/derived
/// grandchildren keyed by kind, as produced by the array-event sub-parser
/// (spec.md §4.8).
#[derive(Debug, Clone, Default)]
pub struct TelescopeEvent {
    pub header: Option<TelescopeEventHeader>,
    pub adc_sums: Option<AdcSums>,
    pub adc_samples: Option<AdcSamples>,
    pub image_parameters: Option<ImageParameters>,
    pub pixel_timing: Option<PixelTiming>,
    /// Multiple `PixelList` records coexist keyed by their `code`.
    pub pixel_lists: BTreeMap<i32, PixelList>,
    pub pixel_trigger_times: Option<PixelTriggerTimes>,
    /// Auxiliary analog/digital traces keyed by header id.
    pub auxiliary_traces: BTreeMap<u32, crate::payload::monitoring::AuxiliaryTraces>,
}

/// A shallow snapshot of a cumulative monitoring map, handed out per event
/// so later ingestion cannot retroactively mutate an already-yielded event
/// (spec.md §5, §9 "Cumulative snapshots").
pub type MonitoringSnapshot<T> = BTreeMap<u16, T>;

/// `type="data"` or `type="calibration"` array event (spec.md §3).
#[derive(Debug, Clone)]
pub struct ArrayEvent {
    pub event_id: i32,
    pub is_calibration: bool,
    /// Set only for calibration events: the EventIO type id of the
    /// `CalibrationEvent`-family record that produced this event.
    pub calibration_type: Option<u16>,
    pub trigger_information: TriggerInformation,
    pub telescope_events: BTreeMap<u16, TelescopeEvent>,
    pub tracking_positions: BTreeMap<u16, TrackingPosition>,
    pub stereo_reconstruction: Option<StereoReconstruction>,
    pub camera_monitorings: MonitoringSnapshot<CameraMonitoring>,
    pub laser_calibrations: MonitoringSnapshot<LaserCalibration>,
    pub pixel_monitorings: MonitoringSnapshot<PixelMonitoring>,
    pub mc_shower: Option<MCShower>,
    pub mc_event: Option<McEventPayload>,
    /// Always empty: the simtel-side `TelescopeData` dispatch this would
    /// come from is out of scope (see `SPEC_FULL.md` §1 "Out of scope").
    pub photon_bunches: BTreeMap<u16, PhotonBunchArray>,
    /// Always empty: see [`ArrayEvent::photon_bunches`].
    pub photo_electrons: BTreeMap<u16, PhotoElectrons>,
    pub photoelectron_sum: Option<crate::payload::mc::MCPhotoelectronSum>,
}

/// A pre-array Monte Carlo truth event: `current_mc_event` plus an optional
/// attached `TelescopeData` grandchild (spec.md §4.7 `mc_events` emission).
#[derive(Debug, Clone)]
pub struct MCEvent {
    pub event_id: i32,
    pub mc_shower: Option<MCShower>,
    pub mc_event: McEventPayload,
    /// Always empty: the simtel-side `TelescopeData` lookahead this would
    /// come from is out of scope (see `SPEC_FULL.md` §1 "Out of scope").
    pub photon_bunches: BTreeMap<u16, PhotonBunchArray>,
    /// Always empty: see [`MCEvent::photon_bunches`].
    pub photo_electrons: BTreeMap<u16, PhotoElectrons>,
}

/// Run-level metadata, assembled once per file.
#[derive(Debug, Clone, Default)]
pub struct RunHeader {
    pub run_number: i32,
    pub date: i32,
    pub version: i32,
    pub n_telescopes: i32,
    pub observatory: String,
}

impl From<RunHeaderPayload> for RunHeader {
    fn from(p: RunHeaderPayload) -> Self {
        Self { run_number: p.run_number, date: p.date, version: p.version, n_telescopes: p.n_telescopes, observatory: p.observatory }
    }
}

pub type MCRunHeader = MCRunHeaderFixed;

/// CORSIKA-level run header (`SPEC_FULL.md` §3), exposed as `header` on the
/// top-level reader alongside the sim_telarray `RunHeader`.
#[derive(Debug, Clone, Default)]
pub struct CorsikaHeader {
    pub energy_range: (f32, f32),
    pub energy_slope: f32,
}

/// CORSIKA-level shower event: one reuse sample of a physical shower,
/// carrying the event header and per-telescope photon bunches
/// (`SPEC_FULL.md` §4.10; the producer side of the literal IACT fixtures).
#[derive(Debug, Clone)]
pub struct CorsikaEvent {
    pub event_id: i32,
    pub reuse: u32,
    pub header: CorsikaEventHeaderView,
    /// Indexed by telescope index, in definition order (matches
    /// `len(event.photon_bunches) == n_telescopes` in the upstream fixture
    /// tests).
    pub photon_bunches: Vec<PhotonBunchArray>,
}

#[derive(Debug, Clone, Default)]
pub struct CorsikaEventHeaderView {
    pub event_id: i32,
    pub zenith_angle: f32,
    pub azimuth_angle: f32,
    pub total_energy: f32,
}

pub use crate::payload::history::{HistoryCommandLine, HistoryConfig, HistoryMeta};
pub use crate::payload::run::RunHeader as RunHeaderDecoded;
pub use TelescopePositions as TelescopePositionsTable;
