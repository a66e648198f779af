use super::CliError;
use analisi_core::domain::CalculationInputs;
use analisi_core::modules::serialization::write_json_artifact;
use analisi_core::modules::{
    AnalisiCalculation, AnalisiParser, CalcInfo, DirectoryFolder, ExecutableRunner,
    ExecutionReport, LocalProcessRunner, ParsedOutput, RetrievedFolder, TrajectoryWriter,
};
use anyhow::Context;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub(super) const CALCINFO_FILENAME: &str = "calcinfo.json";

/// Reads a job document.
///
/// `trajectory` may be inlined or given as a path to a JSON trajectory,
/// resolved against the job document's directory.
pub(super) fn load_job_document(path: &Path) -> Result<CalculationInputs, CliError> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read job document '{}'", path.display()))?;
    let mut document: Value = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse job document '{}'", path.display()))?;

    let referenced = match document.get("trajectory") {
        Some(Value::String(relative)) => Some(PathBuf::from(relative)),
        _ => None,
    };
    if let Some(relative) = referenced {
        let trajectory_path = path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(relative);
        debug!(path = %trajectory_path.display(), "loading referenced trajectory");
        let trajectory_source = fs::read_to_string(&trajectory_path).with_context(|| {
            format!("failed to read trajectory '{}'", trajectory_path.display())
        })?;
        let trajectory: Value = serde_json::from_str(&trajectory_source).with_context(|| {
            format!("failed to parse trajectory '{}'", trajectory_path.display())
        })?;
        document["trajectory"] = trajectory;
    }

    let inputs = serde_json::from_value(document)
        .with_context(|| format!("job document '{}' has an invalid layout", path.display()))?;
    Ok(inputs)
}

pub(super) fn prepare_job<W>(
    writer: W,
    inputs: &CalculationInputs,
    workdir: &Path,
) -> Result<CalcInfo, CliError>
where
    W: TrajectoryWriter,
{
    // The writer creates `workdir` while staging, so rejected requests leave
    // nothing behind.
    let calcinfo = AnalisiCalculation::new(writer)
        .prepare_for_submission(inputs, workdir)
        .map_err(CliError::Job)?;

    let descriptor_path = workdir.join(CALCINFO_FILENAME);
    write_json_artifact(&descriptor_path, &calcinfo)
        .with_context(|| format!("failed to write '{}'", descriptor_path.display()))?;
    info!(path = %descriptor_path.display(), "wrote job descriptor");
    Ok(calcinfo)
}

pub(super) fn load_calcinfo(workdir: &Path) -> Result<CalcInfo, CliError> {
    let path = workdir.join(CALCINFO_FILENAME);
    let source = fs::read_to_string(&path).with_context(|| {
        format!(
            "failed to read '{}'; run `analisi-job prepare` first",
            path.display()
        )
    })?;
    let calcinfo = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse job descriptor '{}'", path.display()))?;
    Ok(calcinfo)
}

pub(super) fn local_runner(
    code: Option<PathBuf>,
    mpirun: Option<&str>,
) -> Result<LocalProcessRunner, CliError> {
    let code = code.map(resolve_executable).transpose()?;
    let launcher = mpirun
        .map(|words| words.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    Ok(LocalProcessRunner::new(code).with_mpi_launcher(launcher))
}

/// Anchors relative executable paths to the invoking directory, since the
/// child runs inside the working directory. Bare names are left for `PATH`.
pub(super) fn resolve_executable(code: PathBuf) -> Result<PathBuf, CliError> {
    let has_directory = code
        .parent()
        .is_some_and(|parent| !parent.as_os_str().is_empty());
    if code.is_absolute() || !has_directory {
        return Ok(code);
    }
    let resolved = std::path::absolute(&code)
        .with_context(|| format!("failed to resolve executable '{}'", code.display()))?;
    debug!(executable = %resolved.display(), "resolved relative executable");
    Ok(resolved)
}

pub(super) fn execute_job<R>(
    runner: &R,
    calcinfo: &CalcInfo,
    workdir: &Path,
) -> Result<ExecutionReport, CliError>
where
    R: ExecutableRunner + ?Sized,
{
    let code = calcinfo
        .codes_info
        .first()
        .map(|code_info| code_info.code.as_str())
        .unwrap_or("analisi");
    let report = runner
        .run_executable(calcinfo, workdir)
        .with_context(|| format!("failed to launch '{code}' in '{}'", workdir.display()))?;
    if !report.succeeded() {
        warn!(
            status = ?report.status_code,
            stdout = %report.stdout_path.display(),
            "analisi did not exit cleanly"
        );
    }
    Ok(report)
}

pub(super) fn parse_retrieved(
    inputs: &CalculationInputs,
    retrieved: &Path,
) -> Result<ParsedOutput, CliError> {
    let folder = DirectoryFolder::open_existing(retrieved);
    match &folder {
        Some(folder) => debug!(root = %folder.root().display(), "reading retrieved folder"),
        None => warn!(path = %retrieved.display(), "retrieved folder does not exist"),
    }

    AnalisiParser
        .parse(
            inputs,
            folder.as_ref().map(|folder| folder as &dyn RetrievedFolder),
        )
        .map_err(CliError::Job)
}

/// Writes parsed arrays to `output`, or prints them when no path is given.
pub(super) fn emit_results(parsed: &ParsedOutput, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create '{}'", parent.display()))?;
            }
            write_json_artifact(path, parsed)
                .with_context(|| format!("failed to write results '{}'", path.display()))?;
            println!(
                "{}: wrote {} to '{}'",
                parsed.slot,
                parsed.arrays.array_names().join(", "),
                path.display()
            );
        }
        None => {
            let rendered =
                serde_json::to_string_pretty(parsed).context("failed to render results")?;
            println!("{rendered}");
        }
    }
    Ok(())
}
