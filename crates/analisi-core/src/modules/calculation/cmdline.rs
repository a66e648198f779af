use crate::domain::{AnalysisMode, AnalysisParameters, JobOptions};

pub const LOG_SINK: &str = "/dev/null";

/// Command line for the analysis binary.
///
/// Layout: `-N <threads> -l /dev/null -i <input> -B <blocks> -S <max_time>
/// -s <skip>`, one mode flag (`-Q`, `-g <bins>` or `-Y <bins>`), then
/// `-F <min_r> <max_r>` for the binned analyses only.
pub fn build_cmdline_params(
    parameters: &AnalysisParameters,
    options: &JobOptions,
    mode: &AnalysisMode,
) -> Vec<String> {
    let mut params = vec![
        "-N".to_string(),
        options.resources.thread_count().to_string(),
        "-l".to_string(),
        LOG_SINK.to_string(),
        "-i".to_string(),
        options.input_filename.clone(),
        "-B".to_string(),
        parameters.n_blocks.to_string(),
        "-S".to_string(),
        parameters.max_time.to_string(),
        "-s".to_string(),
        parameters.skip.to_string(),
    ];

    match mode {
        AnalysisMode::Msd => params.push("-Q".to_string()),
        AnalysisMode::Gofrt(binning) => {
            params.extend(["-g".to_string(), binning.n_bins.to_string()]);
        }
        AnalysisMode::Sh(binning) => {
            params.extend(["-Y".to_string(), binning.n_bins.to_string()]);
        }
    }

    if let Some(binning) = mode.binning() {
        params.extend([
            "-F".to_string(),
            format_float_arg(binning.min_r),
            format_float_arg(binning.max_r),
        ]);
    }

    params
}

/// Integral floats keep a trailing `.0` (`3.0`, not `3`).
pub fn format_float_arg(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1.0e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
