use super::calculation::CalcInfo;
use crate::domain::Trajectory;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Writes a trajectory in the binary format read by the external program.
pub trait TrajectoryWriter {
    fn write_trajectory(
        &self,
        trajectory: &Trajectory,
        type_ids: &[i32],
        path: &Path,
    ) -> io::Result<()>;
}

impl<T> TrajectoryWriter for &T
where
    T: TrajectoryWriter + ?Sized,
{
    fn write_trajectory(
        &self,
        trajectory: &Trajectory,
        type_ids: &[i32],
        path: &Path,
    ) -> io::Result<()> {
        (**self).write_trajectory(trajectory, type_ids, path)
    }
}

/// Runs a prepared job inside its working directory.
pub trait ExecutableRunner {
    fn run_executable(&self, calcinfo: &CalcInfo, working_dir: &Path)
    -> io::Result<ExecutionReport>;
}

/// Both halves of the external program: staging its input and running it.
pub trait ExternalBackend: TrajectoryWriter + ExecutableRunner {}

impl<T> ExternalBackend for T where T: TrajectoryWriter + ExecutableRunner {}

/// File set fetched back after the job ran.
pub trait RetrievedFolder {
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub status_code: Option<i32>,
    pub stdout_path: PathBuf,
}

impl ExecutionReport {
    pub fn succeeded(&self) -> bool {
        self.status_code == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::{ExecutionReport, RetrievedFolder};
    use std::collections::HashMap;
    use std::io::{self, Read};
    use std::path::PathBuf;

    struct MemoryFolder(HashMap<&'static str, &'static str>);

    impl RetrievedFolder for MemoryFolder {
        fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
            self.0
                .get(name)
                .map(|content| Box::new(content.as_bytes()) as Box<dyn Read + '_>)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }
    }

    #[test]
    fn retrieved_folder_trait_supports_in_memory_sources() {
        let folder = MemoryFolder(HashMap::from([("aiida.out", "1 2\n")]));
        let mut content = String::new();
        folder
            .open("aiida.out")
            .expect("file should exist")
            .read_to_string(&mut content)
            .expect("content should be readable");
        assert_eq!(content, "1 2\n");

        let missing = folder.open("other.out").err().expect("missing file");
        assert_eq!(missing.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn execution_report_success_requires_zero_status() {
        let report = |status_code| ExecutionReport {
            status_code,
            stdout_path: PathBuf::from("aiida.out"),
        };
        assert!(report(Some(0)).succeeded());
        assert!(!report(Some(1)).succeeded());
        assert!(!report(None).succeeded());
    }
}
