mod text;

pub use text::{TextTableError, load_blocks, load_table};

use super::mode::resolve_analysis_mode;
use super::traits::RetrievedFolder;
use crate::common::{ArrayData, NumericArray};
use crate::domain::{AnalisiError, AnalysisKind, CalculationInputs, ParseResult};
use serde::Serialize;
use std::io::Read;
use tracing::{debug, info};

pub const TIMES_ARRAY: &str = "times";

/// Arrays produced from one retrieved output file, tagged with the output
/// slot they belong to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedOutput {
    pub slot: AnalysisKind,
    pub arrays: ArrayData,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalisiParser;

impl AnalisiParser {
    /// Parses the retrieved output of a finished job.
    ///
    /// `retrieved` is `None` when the host could not provide the retrieved
    /// folder. Arrays are only returned once the whole file parsed.
    pub fn parse(
        &self,
        node: &CalculationInputs,
        retrieved: Option<&dyn RetrievedFolder>,
    ) -> ParseResult<ParsedOutput> {
        let folder =
            retrieved.ok_or_else(|| AnalisiError::no_retrieved_folder("PARSE.RETRIEVED_FOLDER"))?;

        let mode = resolve_analysis_mode(&node.parameters).map_err(|selection| {
            AnalisiError::invalid_output("PARSE.ANALYSIS_MODE", selection.to_string())
        })?;
        let kind = mode.kind();

        let output_filename = &node.options.output_filename;
        let content = read_output(folder, output_filename)?;

        let times = node
            .trajectory
            .as_ref()
            .map(|trajectory| trajectory.times.as_slice())
            .ok_or_else(|| {
                AnalisiError::invalid_output(
                    "PARSE.TRAJECTORY_TIMES",
                    "the calculation has no trajectory to take times from",
                )
            })?;

        let loaded = match kind {
            AnalysisKind::Msd | AnalysisKind::Sh => load_table(&content),
            AnalysisKind::Gofrt => load_blocks(&content),
        };
        let primary = loaded.map_err(|source| {
            AnalisiError::invalid_output(
                "PARSE.OUTPUT_FORMAT",
                format!("'{output_filename}': {source}"),
            )
        })?;
        debug!(shape = ?primary.shape(), analysis = %kind, "parsed analisi output");

        let companion = companion_times(times, primary.len(), kind.shifts_times());
        let mut arrays = ArrayData::new();
        arrays.set_array(kind.array_name(), primary);
        arrays.set_array(TIMES_ARRAY, companion);
        info!(slot = %kind, arrays = ?arrays.array_names(), "parsed analisi results");

        Ok(ParsedOutput { slot: kind, arrays })
    }
}

fn read_output(folder: &dyn RetrievedFolder, name: &str) -> ParseResult<String> {
    let reading_error = |source: std::io::Error| {
        AnalisiError::reading_output_file(
            "PARSE.OUTPUT_READ",
            format!("failed to read output file '{name}': {source}"),
        )
    };

    let mut content = String::new();
    folder
        .open(name)
        .map_err(reading_error)?
        .read_to_string(&mut content)
        .map_err(reading_error)?;
    Ok(content)
}

/// First `count` trajectory times, optionally shifted so the first is zero.
///
/// Fewer entries are returned when the trajectory is shorter than `count`.
pub fn companion_times(times: &[f64], count: usize, shift_to_zero: bool) -> NumericArray {
    let prefix = &times[..count.min(times.len())];
    let values = match (shift_to_zero, times.first()) {
        (true, Some(origin)) => prefix.iter().map(|time| time - origin).collect(),
        _ => prefix.to_vec(),
    };
    NumericArray::from_vec(values)
}
