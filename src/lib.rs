//! Reader for the self-describing, tagged, nested binary container format
//! ("EventIO") used by CORSIKA air-shower simulations and the sim_telarray
//! atmospheric-Cherenkov telescope-array simulator.
//!
//! ```no_run
//! use eventio::EventIoReader;
//!
//! # fn main() -> Result<(), eventio::EventIoError> {
//! let reader = EventIoReader::open("run12345.eventio".as_ref())?;
//! for event in reader.array_events() {
//!     println!("{} telescopes triggered", event.telescope_events.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod byte_source;
pub mod corsika;
pub mod errors;
pub mod events;
pub mod header;
pub mod object;
pub mod object_view;
pub mod payload;
pub mod types;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use assembler::{AssemblerOptions, EventAssembler};
use byte_source::ByteSource;
use object::ObjectIndex;

pub use errors::{EventIoError, Warning};
pub use events::{ArrayEvent, CorsikaEvent, CorsikaHeader, MCEvent, RunHeader, TelescopeDescription};

/// Builder for [`EventIoReader`], mirroring the teacher's split between a
/// zero-configuration `Mp4::new` and a configurable `Mp4::with_capacity`.
#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    allowed_telescopes: Option<BTreeSet<u16>>,
    skip_calibration: bool,
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts `array_events` to events where at least one triggered
    /// telescope is in this set (spec.md §4.7 "Telescope filter").
    pub fn allowed_telescopes(mut self, telescopes: impl IntoIterator<Item = u16>) -> Self {
        self.allowed_telescopes = Some(telescopes.into_iter().collect());
        self
    }

    pub fn skip_calibration(mut self, skip: bool) -> Self {
        self.skip_calibration = skip;
        self
    }

    pub fn open(self, path: &Path) -> Result<EventIoReader, EventIoError> {
        EventIoReader::open_with(path, self)
    }
}

/// Top-level handle: owns the byte source, the header-only object index, and
/// the fully-driven assembler (spec.md §6 "External interfaces").
pub struct EventIoReader {
    path: PathBuf,
    assembler: EventAssembler,
}

impl EventIoReader {
    /// Opens `path` with default options (no telescope filter, calibration
    /// events included).
    pub fn open(path: &Path) -> Result<Self, EventIoError> {
        Self::open_with(path, OpenOptions::new())
    }

    fn open_with(path: &Path, options: OpenOptions) -> Result<Self, EventIoError> {
        let mut source = ByteSource::open(path)?;
        let (index, mut warnings) = ObjectIndex::build(&mut source)?;
        let assembler_options =
            AssemblerOptions { allowed_telescopes: options.allowed_telescopes, skip_calibration: options.skip_calibration };
        let mut assembler = EventAssembler::build(&mut source, &index, &assembler_options)?;
        assembler.warnings.append(&mut warnings);
        Ok(Self { path: path.to_owned(), assembler })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> Option<&RunHeader> {
        self.assembler.header.as_ref()
    }

    pub fn corsika_header(&self) -> Option<&CorsikaHeader> {
        self.assembler.corsika_header.as_ref()
    }

    pub fn n_telescopes(&self) -> i32 {
        self.assembler.n_telescopes
    }

    pub fn telescope_positions(&self) -> Option<&payload::run::TelescopePositions> {
        self.assembler.telescope_positions.as_ref()
    }

    pub fn input_cards(&self) -> &[String] {
        &self.assembler.input_cards
    }

    pub fn history(&self) -> &[String] {
        &self.assembler.history_lines
    }

    pub fn run_end(&self) -> Option<&payload::corsika::CorsikaRunEnd> {
        self.assembler.run_end.as_ref()
    }

    pub fn histograms(&self) -> &[payload::atmosphere::Histograms] {
        &self.assembler.histograms
    }

    pub fn atmospheric_profiles(&self) -> &[payload::atmosphere::AtmosphericProfile] {
        &self.assembler.atmospheric_profiles
    }

    pub fn telescope_descriptions(&self) -> &std::collections::BTreeMap<u16, TelescopeDescription> {
        &self.assembler.telescope_descriptions
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.assembler.warnings
    }

    pub fn array_events(&self) -> impl Iterator<Item = &ArrayEvent> {
        self.assembler.array_events()
    }

    pub fn mc_events(&self) -> impl Iterator<Item = &MCEvent> {
        self.assembler.mc_events()
    }

    /// CORSIKA/IACT-level reuse-sample events (`SPEC_FULL.md` §3, §4.10),
    /// the producer side of the `one_shower`/`3_gammas_reuse_5`/
    /// `two_telescopes` fixtures.
    pub fn corsika_events(&self) -> impl Iterator<Item = &CorsikaEvent> {
        self.assembler.corsika_events()
    }
}
