use super::calculation::CalcInfo;
use super::serialization::LammpsBinaryWriter;
use super::traits::{ExecutableRunner, ExecutionReport, TrajectoryWriter};
use crate::domain::Trajectory;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Runs the analysis binary as a local child process.
///
/// Stdout is redirected into the descriptor's `stdout_name`; when the code is
/// marked for MPI and a launcher is configured, the launcher words are
/// prepended to the invocation.
#[derive(Debug, Clone, Default)]
pub struct LocalProcessRunner {
    executable: Option<PathBuf>,
    mpi_launcher: Vec<String>,
}

impl LocalProcessRunner {
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self {
            executable,
            mpi_launcher: Vec::new(),
        }
    }

    pub fn with_mpi_launcher(mut self, launcher: Vec<String>) -> Self {
        self.mpi_launcher = launcher;
        self
    }

    fn command_for(&self, code: &str, withmpi: bool) -> Command {
        let program = self
            .executable
            .clone()
            .unwrap_or_else(|| PathBuf::from(code));

        match self.mpi_launcher.split_first() {
            Some((launcher, launcher_args)) if withmpi => {
                let mut command = Command::new(launcher);
                command.args(launcher_args).arg(program);
                command
            }
            _ => Command::new(program),
        }
    }
}

impl ExecutableRunner for LocalProcessRunner {
    fn run_executable(
        &self,
        calcinfo: &CalcInfo,
        working_dir: &Path,
    ) -> io::Result<ExecutionReport> {
        let [code_info] = calcinfo.codes_info.as_slice() else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "expected exactly one code invocation, found {}",
                    calcinfo.codes_info.len()
                ),
            ));
        };

        let stdout_path = working_dir.join(&code_info.stdout_name);
        let stdout = File::create(&stdout_path)?;

        let mut command = self.command_for(&code_info.code, code_info.withmpi);
        command
            .args(&code_info.cmdline_params)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(stdout);
        debug!(command = ?command, "spawning analisi");

        let status = command.status()?;
        if status.success() {
            info!(stdout = %stdout_path.display(), "analisi finished");
        } else {
            warn!(status = ?status.code(), "analisi exited with failure status");
        }

        Ok(ExecutionReport {
            status_code: status.code(),
            stdout_path,
        })
    }
}

/// Stages LAMMPS binary dumps and runs the binary on this machine.
#[derive(Debug, Clone, Default)]
pub struct LocalBackend {
    writer: LammpsBinaryWriter,
    runner: LocalProcessRunner,
}

impl LocalBackend {
    pub fn new(runner: LocalProcessRunner) -> Self {
        Self {
            writer: LammpsBinaryWriter,
            runner,
        }
    }
}

impl TrajectoryWriter for LocalBackend {
    fn write_trajectory(
        &self,
        trajectory: &Trajectory,
        type_ids: &[i32],
        path: &Path,
    ) -> io::Result<()> {
        self.writer.write_trajectory(trajectory, type_ids, path)
    }
}

impl ExecutableRunner for LocalBackend {
    fn run_executable(
        &self,
        calcinfo: &CalcInfo,
        working_dir: &Path,
    ) -> io::Result<ExecutionReport> {
        self.runner.run_executable(calcinfo, working_dir)
    }
}
