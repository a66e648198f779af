use crate::domain::{AnalysisMode, AnalysisParameters};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raised when the parameters do not select exactly one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSelectionError {
    pub has_msd: bool,
    pub has_gofrt: bool,
    pub has_sh: bool,
}

impl ModeSelectionError {
    pub fn selected_count(&self) -> usize {
        [self.has_msd, self.has_gofrt, self.has_sh]
            .into_iter()
            .filter(|selected| *selected)
            .count()
    }
}

impl Display for ModeSelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "exactly one analysis must be selected (msd={}, gofrt={}, sh={})",
            u8::from(self.has_msd),
            u8::from(self.has_gofrt),
            u8::from(self.has_sh)
        )
    }
}

impl Error for ModeSelectionError {}

/// Resolves the msd flag and the optional gofrt/sh binnings into one mode.
///
/// Shared by job preparation and output parsing.
pub fn resolve_analysis_mode(
    parameters: &AnalysisParameters,
) -> Result<AnalysisMode, ModeSelectionError> {
    match (parameters.msd, parameters.gofrt, parameters.sh) {
        (true, None, None) => Ok(AnalysisMode::Msd),
        (false, Some(binning), None) => Ok(AnalysisMode::Gofrt(binning)),
        (false, None, Some(binning)) => Ok(AnalysisMode::Sh(binning)),
        (has_msd, gofrt, sh) => Err(ModeSelectionError {
            has_msd,
            has_gofrt: gofrt.is_some(),
            has_sh: sh.is_some(),
        }),
    }
}
