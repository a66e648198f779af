//! Job preparation and output parsing for the `analisi` trajectory-analysis
//! program.

pub mod common;
pub mod domain;
pub mod modules;
