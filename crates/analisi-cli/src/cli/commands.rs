use super::CliError;
use super::helpers::*;
use analisi_core::modules::{LammpsBinaryWriter, LocalBackend};
use std::path::PathBuf;
use tracing::info;

#[derive(clap::Args)]
pub(super) struct PrepareArgs {
    /// Job document (JSON)
    #[arg(long, value_name = "FILE")]
    job: PathBuf,

    /// Directory the trajectory and job descriptor are staged into
    #[arg(long, default_value = ".")]
    workdir: PathBuf,
}

#[derive(clap::Args)]
pub(super) struct RunnerFlags {
    /// Executable to launch instead of the job's code label
    #[arg(long, value_name = "PATH")]
    code: Option<PathBuf>,

    /// Launcher prefix for MPI jobs, e.g. "mpirun -np 4"
    #[arg(long, value_name = "COMMAND")]
    mpirun: Option<String>,
}

#[derive(clap::Args)]
pub(super) struct RunArgs {
    /// Prepared working directory
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    #[command(flatten)]
    runner: RunnerFlags,
}

#[derive(clap::Args)]
pub(super) struct ParseArgs {
    /// Job document the calculation was prepared from
    #[arg(long, value_name = "FILE")]
    job: PathBuf,

    /// Folder holding the retrieved output file
    #[arg(long, default_value = ".")]
    retrieved: PathBuf,

    /// Results JSON path; printed to stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct SubmitArgs {
    /// Job document (JSON)
    #[arg(long, value_name = "FILE")]
    job: PathBuf,

    /// Working directory for staging, running and retrieval
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    #[command(flatten)]
    runner: RunnerFlags,

    /// Results JSON path; printed to stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(super) fn run_prepare_command(args: PrepareArgs) -> Result<i32, CliError> {
    let inputs = load_job_document(&args.job)?;
    let calcinfo = prepare_job(LammpsBinaryWriter, &inputs, &args.workdir)?;

    let params = calcinfo
        .codes_info
        .iter()
        .flat_map(|code_info| code_info.cmdline_params.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");
    println!(
        "staged '{}' in '{}': {} {}",
        inputs.options.input_filename,
        args.workdir.display(),
        inputs.code,
        params
    );
    Ok(0)
}

pub(super) fn run_run_command(args: RunArgs) -> Result<i32, CliError> {
    let calcinfo = load_calcinfo(&args.workdir)?;
    let runner = local_runner(args.runner.code, args.runner.mpirun.as_deref())?;
    let report = execute_job(&runner, &calcinfo, &args.workdir)?;

    println!("stdout: '{}'", report.stdout_path.display());
    Ok(if report.succeeded() { 0 } else { 1 })
}

pub(super) fn run_parse_command(args: ParseArgs) -> Result<i32, CliError> {
    let inputs = load_job_document(&args.job)?;
    let parsed = parse_retrieved(&inputs, &args.retrieved)?;
    emit_results(&parsed, args.output.as_deref())?;
    Ok(0)
}

pub(super) fn run_submit_command(args: SubmitArgs) -> Result<i32, CliError> {
    let inputs = load_job_document(&args.job)?;
    let backend = LocalBackend::new(local_runner(
        args.runner.code,
        args.runner.mpirun.as_deref(),
    )?);

    let calcinfo = prepare_job(&backend, &inputs, &args.workdir)?;
    let report = execute_job(&backend, &calcinfo, &args.workdir)?;
    info!(status = ?report.status_code, "parsing retrieved output");

    let parsed = parse_retrieved(&inputs, &args.workdir)?;
    emit_results(&parsed, args.output.as_deref())?;
    Ok(0)
}
