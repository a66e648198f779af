pub mod errors;
mod trajectory;

pub use errors::{
    AnalisiError, AnalisiResult, ErrorClass, ExitCondition, ExitConditionDescriptor, ParseResult,
    PrepareResult,
};
pub use trajectory::{Trajectory, cell_volume};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const DEFAULT_CODE_LABEL: &str = "analisi";
pub const DEFAULT_INPUT_FILENAME: &str = "aiida.bin";
pub const DEFAULT_OUTPUT_FILENAME: &str = "aiida.out";
pub const DEFAULT_PARSER_NAME: &str = "analisi.analyze";

/// Output slots a calculation may populate; exactly one is set per job.
pub const OUTPUT_SLOTS: [AnalysisKind; 3] =
    [AnalysisKind::Msd, AnalysisKind::Gofrt, AnalysisKind::Sh];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Msd,
    Gofrt,
    Sh,
}

impl AnalysisKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Msd => "msd",
            Self::Gofrt => "gofrt",
            Self::Sh => "sh",
        }
    }

    /// Name of the primary array inside the emitted array set.
    pub const fn array_name(self) -> &'static str {
        match self {
            Self::Msd => "msd",
            Self::Gofrt => "gofrt",
            Self::Sh => "shcorr",
        }
    }

    /// Whether the companion `times` array is shifted to start at zero.
    pub const fn shifts_times(self) -> bool {
        matches!(self, Self::Msd | Self::Sh)
    }
}

impl Display for AnalysisKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// Distance window and bin count shared by the gofrt and sh analyses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialBinning {
    pub min_r: f64,
    pub max_r: f64,
    pub n_bins: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnalysisMode {
    Msd,
    Gofrt(RadialBinning),
    Sh(RadialBinning),
}

impl AnalysisMode {
    pub const fn kind(&self) -> AnalysisKind {
        match self {
            Self::Msd => AnalysisKind::Msd,
            Self::Gofrt(_) => AnalysisKind::Gofrt,
            Self::Sh(_) => AnalysisKind::Sh,
        }
    }

    pub const fn binning(&self) -> Option<&RadialBinning> {
        match self {
            Self::Msd => None,
            Self::Gofrt(binning) | Self::Sh(binning) => Some(binning),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParameters {
    pub n_blocks: u32,
    pub max_time: u64,
    pub skip: u32,
    pub start_step: i64,
    pub stop_step: i64,
    pub msd: bool,
    pub gofrt: Option<RadialBinning>,
    pub sh: Option<RadialBinning>,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            n_blocks: 12,
            max_time: 0,
            skip: 1,
            start_step: 0,
            stop_step: -1,
            msd: false,
            gofrt: None,
            sh: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub num_machines: u32,
    pub num_mpiprocs_per_machine: u32,
    pub num_cores_per_mpiproc: Option<u32>,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            num_machines: 1,
            num_mpiprocs_per_machine: 1,
            num_cores_per_mpiproc: None,
        }
    }
}

impl Resources {
    pub fn thread_count(&self) -> u32 {
        self.num_cores_per_mpiproc.unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobOptions {
    pub input_filename: String,
    pub output_filename: String,
    pub parser_name: String,
    pub withmpi: bool,
    pub resources: Resources,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            input_filename: DEFAULT_INPUT_FILENAME.to_string(),
            output_filename: DEFAULT_OUTPUT_FILENAME.to_string(),
            parser_name: DEFAULT_PARSER_NAME.to_string(),
            withmpi: true,
            resources: Resources::default(),
        }
    }
}

/// Everything a calculation is submitted with. The parser reads the same
/// record back when interpreting retrieved output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInputs {
    #[serde(default = "default_code_label")]
    pub code: String,
    #[serde(default)]
    pub trajectory: Option<Trajectory>,
    #[serde(flatten)]
    pub parameters: AnalysisParameters,
    #[serde(default)]
    pub options: JobOptions,
}

impl CalculationInputs {
    pub fn new(trajectory: Option<Trajectory>, parameters: AnalysisParameters) -> Self {
        Self {
            code: default_code_label(),
            trajectory,
            parameters,
            options: JobOptions::default(),
        }
    }
}

fn default_code_label() -> String {
    DEFAULT_CODE_LABEL.to_string()
}
