mod cmdline;
mod descriptor;

pub use cmdline::{LOG_SINK, build_cmdline_params, format_float_arg};
pub use descriptor::{CalcInfo, CodeInfo, CopySpec};

use super::mode::resolve_analysis_mode;
use super::serialization::LammpsBinaryWriter;
use super::traits::TrajectoryWriter;
use crate::common::{TypeIdMapping, types_id_array};
use crate::domain::{AnalisiError, AnalysisMode, CalculationInputs, PrepareResult, Trajectory};
use std::path::Path;
use tracing::{debug, info, warn};

/// Turns calculation inputs into a staged trajectory file and a job
/// descriptor for the analysis binary.
#[derive(Debug, Clone, Default)]
pub struct AnalisiCalculation<W = LammpsBinaryWriter> {
    writer: W,
}

impl<W> AnalisiCalculation<W>
where
    W: TrajectoryWriter,
{
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Validates the request, writes the trajectory into `folder` and returns
    /// the descriptor. Nothing is written when validation fails.
    pub fn prepare_for_submission(
        &self,
        inputs: &CalculationInputs,
        folder: &Path,
    ) -> PrepareResult<CalcInfo> {
        let (mode, trajectory) = validate_submission(inputs)?;
        let cmdline_params = build_cmdline_params(&inputs.parameters, &inputs.options, &mode);
        debug!(params = ?cmdline_params, "assembled analisi command line");

        let type_ids = types_id_array(&trajectory.symbols);
        debug!(
            species = ?TypeIdMapping::from_symbols(&trajectory.symbols).species(),
            "mapped atom symbols to type ids"
        );

        let input_path = folder.join(&inputs.options.input_filename);
        self.writer
            .write_trajectory(trajectory, &type_ids, &input_path)
            .map_err(|source| {
                AnalisiError::writing_input_file(
                    "PREPARE.TRAJECTORY_WRITE",
                    format!(
                        "failed to write trajectory '{}': {}",
                        input_path.display(),
                        source
                    ),
                )
            })?;
        info!(
            path = %input_path.display(),
            frames = trajectory.frame_count(),
            atoms = trajectory.atom_count(),
            analysis = %mode.kind(),
            "staged trajectory for analisi"
        );

        let code_info = CodeInfo {
            code: inputs.code.clone(),
            cmdline_params,
            stdout_name: inputs.options.output_filename.clone(),
            withmpi: inputs.options.withmpi,
        };
        Ok(CalcInfo::single_code(
            code_info,
            vec![inputs.options.output_filename.clone()],
        ))
    }
}

/// Checks everything that must hold before any file is written.
pub fn validate_submission(
    inputs: &CalculationInputs,
) -> PrepareResult<(AnalysisMode, &Trajectory)> {
    let mode = resolve_analysis_mode(&inputs.parameters).map_err(|selection| {
        warn!(
            has_msd = selection.has_msd,
            has_gofrt = selection.has_gofrt,
            has_sh = selection.has_sh,
            "rejected analisi submission"
        );
        AnalisiError::too_many_calculations("PREPARE.ANALYSIS_MODE", selection.to_string())
    })?;

    let trajectory = inputs
        .trajectory
        .as_ref()
        .ok_or_else(|| AnalisiError::no_data("PREPARE.TRAJECTORY"))?;
    trajectory.validate()?;

    if inputs.options.resources.num_cores_per_mpiproc.is_none() {
        warn!("num_cores_per_mpiproc not set; passing -N 1 to analisi");
    }

    Ok((mode, trajectory))
}
