use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const TRAJECTORY: &str = r#"
{
  "symbols": ["Na", "Cl"],
  "positions": [
    [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
    [[0.1, 0.0, 0.0], [1.0, 1.1, 1.0]],
    [[0.2, 0.0, 0.0], [1.0, 1.2, 1.0]]
  ],
  "velocities": [
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
  ],
  "cells": [
    [[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]],
    [[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]],
    [[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]
  ],
  "times": [10.0, 10.5, 11.0]
}
"#;

fn analisi_job(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_analisi-job"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("analisi-job should spawn")
}

fn analisi_job_in(current_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_analisi-job"))
        .args(args)
        .current_dir(current_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("analisi-job should spawn")
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent directory should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn write_job(root: &Path, analysis: &str) -> std::path::PathBuf {
    write_file(&root.join("trajectory.json"), TRAJECTORY);
    let job_path = root.join("job.json");
    write_file(
        &job_path,
        &format!(
            r#"{{
              "trajectory": "trajectory.json",
              {analysis},
              "n_blocks": 4,
              "options": {{"withmpi": false, "resources": {{"num_cores_per_mpiproc": 2}}}}
            }}"#
        ),
    );
    job_path
}

fn read_json(path: &Path) -> Value {
    let content = fs::read_to_string(path).expect("json file should exist");
    serde_json::from_str(&content).expect("json should parse")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are utf-8")
}

#[test]
fn prepare_stages_dump_and_descriptor() {
    let temp = TempDir::new().expect("tempdir should be created");
    let job = write_job(temp.path(), r#""msd": true"#);
    let workdir = temp.path().join("work");

    let output = analisi_job(&[
        "prepare",
        "--job",
        path_arg(&job),
        "--workdir",
        path_arg(&workdir),
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(workdir.join("aiida.bin").is_file());

    let calcinfo = read_json(&workdir.join("calcinfo.json"));
    let code_info = &calcinfo["codes_info"][0];
    let params = code_info["cmdline_params"]
        .as_array()
        .expect("cmdline params")
        .iter()
        .map(|param| param.as_str().expect("string param"))
        .collect::<Vec<_>>();
    assert_eq!(
        params,
        [
            "-N", "2", "-l", "/dev/null", "-i", "aiida.bin", "-B", "4", "-S", "0", "-s", "1", "-Q"
        ]
    );
    assert_eq!(code_info["stdout_name"], "aiida.out");
    assert_eq!(code_info["withmpi"], false);
    assert_eq!(calcinfo["retrieve_list"], serde_json::json!(["aiida.out"]));
}

#[test]
fn prepare_rejects_two_analyses_without_staging() {
    let temp = TempDir::new().expect("tempdir should be created");
    let job = write_job(
        temp.path(),
        r#""msd": true, "gofrt": {"min_r": 0.5, "max_r": 2.0, "n_bins": 10}"#,
    );
    let workdir = temp.path().join("work");

    let output = analisi_job(&[
        "prepare",
        "--job",
        path_arg(&job),
        "--workdir",
        path_arg(&workdir),
    ]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [PREPARE.ANALYSIS_MODE]"), "stderr: {stderr}");
    assert!(stderr.contains("EXIT CONDITION: 401 ERROR_TOO_CALCULATIONS_SPECIFIED"));
    assert!(!workdir.exists());
}

#[test]
fn prepare_without_trajectory_reports_no_data() {
    let temp = TempDir::new().expect("tempdir should be created");
    let job = temp.path().join("job.json");
    write_file(&job, r#"{"msd": true}"#);

    let output = analisi_job(&[
        "prepare",
        "--job",
        path_arg(&job),
        "--workdir",
        path_arg(&temp.path().join("work")),
    ]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("EXIT CONDITION: 400 ERROR_NO_DATA"), "stderr: {stderr}");
}

#[test]
fn parse_writes_gofrt_blocks_with_raw_times() {
    let temp = TempDir::new().expect("tempdir should be created");
    let job = write_job(
        temp.path(),
        r#""gofrt": {"min_r": 0.5, "max_r": 2.0, "n_bins": 2}"#,
    );
    let retrieved = temp.path().join("retrieved");
    write_file(
        &retrieved.join("aiida.out"),
        "0.875 1.0 0.0\n1.625 1.1 0.1\n\n0.875 2.0 0.2\n1.625 2.1 0.3\n",
    );
    let results = temp.path().join("out/results.json");

    let output = analisi_job(&[
        "parse",
        "--job",
        path_arg(&job),
        "--retrieved",
        path_arg(&retrieved),
        "--output",
        path_arg(&results),
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let parsed = read_json(&results);
    assert_eq!(parsed["slot"], "gofrt");
    assert_eq!(parsed["arrays"]["gofrt"]["shape"], serde_json::json!([2, 2, 3]));
    assert_eq!(parsed["arrays"]["times"]["data"], serde_json::json!([10.0, 10.5]));
}

#[test]
fn parse_prints_msd_results_to_stdout() {
    let temp = TempDir::new().expect("tempdir should be created");
    let job = write_job(temp.path(), r#""msd": true"#);
    write_file(&temp.path().join("aiida.out"), "0 0.0\n1 0.4\n2 0.9\n");

    let output = analisi_job(&[
        "parse",
        "--job",
        path_arg(&job),
        "--retrieved",
        path_arg(temp.path()),
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(parsed["slot"], "msd");
    assert_eq!(parsed["arrays"]["msd"]["shape"], serde_json::json!([3, 2]));
    assert_eq!(parsed["arrays"]["times"]["data"], serde_json::json!([0.0, 0.5, 1.0]));
}

#[test]
fn parse_without_retrieved_folder_exits_with_retrieval_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let job = write_job(temp.path(), r#""msd": true"#);

    let output = analisi_job(&[
        "parse",
        "--job",
        path_arg(&job),
        "--retrieved",
        path_arg(&temp.path().join("never-retrieved")),
    ]);

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("EXIT CONDITION: 300 ERROR_NO_RETRIEVED_FOLDER"), "stderr: {stderr}");
}

#[test]
fn parse_of_garbage_output_is_invalid_output() {
    let temp = TempDir::new().expect("tempdir should be created");
    let job = write_job(temp.path(), r#""sh": {"min_r": 0.0, "max_r": 3.0, "n_bins": 4}"#);
    write_file(&temp.path().join("aiida.out"), "Segmentation fault\n");

    let output = analisi_job(&[
        "parse",
        "--job",
        path_arg(&job),
        "--retrieved",
        path_arg(temp.path()),
    ]);

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("EXIT CONDITION: 320 ERROR_INVALID_OUTPUT"), "stderr: {stderr}");
}

#[test]
fn run_without_descriptor_is_an_io_failure() {
    let temp = TempDir::new().expect("tempdir should be created");

    let output = analisi_job(&["run", "--workdir", path_arg(temp.path())]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [CLI.IO]"), "stderr: {stderr}");
    assert!(stderr.contains("calcinfo.json"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    let output = analisi_job(&["frobnicate"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: [CLI.USAGE]"), "stderr: {stderr}");
}

#[test]
fn help_exits_cleanly() {
    let output = analisi_job(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("prepare"));
    assert!(stdout.contains("submit"));
}

#[cfg(unix)]
fn write_fake_analisi(path: &Path, stdout: &str) {
    use std::os::unix::fs::PermissionsExt;

    write_file(path, &format!("#!/bin/sh\ncat <<'OUT'\n{stdout}OUT\n"));
    let mut permissions = fs::metadata(path).expect("script metadata").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions).expect("script should be executable");
}

#[cfg(unix)]
#[test]
fn submit_runs_prepare_execute_and_parse() {
    let temp = TempDir::new().expect("tempdir should be created");
    let job = write_job(temp.path(), r#""msd": true"#);
    let fake = temp.path().join("bin/fake-analisi");
    write_fake_analisi(&fake, "0 0.0 0.0\n1 0.2 0.1\n");
    let workdir = temp.path().join("work");
    let results = temp.path().join("results.json");

    let output = analisi_job(&[
        "submit",
        "--job",
        path_arg(&job),
        "--workdir",
        path_arg(&workdir),
        "--code",
        path_arg(&fake),
        "--output",
        path_arg(&results),
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(workdir.join("aiida.bin").is_file());
    assert!(workdir.join("calcinfo.json").is_file());
    assert_eq!(
        fs::read_to_string(workdir.join("aiida.out")).expect("stdout captured"),
        "0 0.0 0.0\n1 0.2 0.1\n"
    );

    let parsed = read_json(&results);
    assert_eq!(parsed["slot"], "msd");
    assert_eq!(parsed["arrays"]["msd"]["shape"], serde_json::json!([2, 3]));
    assert_eq!(parsed["arrays"]["times"]["data"], serde_json::json!([0.0, 0.5]));
}

#[cfg(unix)]
#[test]
fn run_reports_failing_executable_status() {
    let temp = TempDir::new().expect("tempdir should be created");
    let job = write_job(temp.path(), r#""msd": true"#);
    let workdir = temp.path().join("work");
    let prepared = analisi_job(&[
        "prepare",
        "--job",
        path_arg(&job),
        "--workdir",
        path_arg(&workdir),
    ]);
    assert!(prepared.status.success());

    let failing = temp.path().join("bin/false-analisi");
    write_file(&failing, "#!/bin/sh\nexit 7\n");
    {
        use std::os::unix::fs::PermissionsExt;
        let mut permissions = fs::metadata(&failing).expect("metadata").permissions();
        permissions.set_mode(0o755);
        fs::set_permissions(&failing, permissions).expect("chmod");
    }

    let output = analisi_job(&[
        "run",
        "--workdir",
        path_arg(&workdir),
        "--code",
        path_arg(&failing),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("did not exit cleanly"), "stderr: {stderr}");
}

#[cfg(unix)]
#[test]
fn submit_resolves_relative_code_against_invocation_directory() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_job(temp.path(), r#""msd": true"#);
    write_fake_analisi(&temp.path().join("bin/fake-analisi"), "0 0.0\n1 0.3\n2 0.7\n");

    let output = analisi_job_in(
        temp.path(),
        &[
            "submit",
            "--job",
            "job.json",
            "--workdir",
            "work",
            "--code",
            "bin/fake-analisi",
            "--output",
            "results.json",
        ],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let parsed = read_json(&temp.path().join("results.json"));
    assert_eq!(parsed["arrays"]["msd"]["shape"], serde_json::json!([3, 2]));
    assert!(temp.path().join("work/aiida.out").is_file());
}
