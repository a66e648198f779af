pub mod calculation;
pub mod parser;
pub mod serialization;

mod folder;
mod mode;
mod runner;
mod traits;

pub use calculation::{AnalisiCalculation, CalcInfo, CodeInfo, CopySpec};
pub use folder::DirectoryFolder;
pub use mode::{ModeSelectionError, resolve_analysis_mode};
pub use parser::{AnalisiParser, ParsedOutput};
pub use runner::{LocalBackend, LocalProcessRunner};
pub use serialization::LammpsBinaryWriter;
pub use traits::{
    ExecutableRunner, ExecutionReport, ExternalBackend, RetrievedFolder, TrajectoryWriter,
};
