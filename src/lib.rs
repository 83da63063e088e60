#![warn(missing_docs)]
/*!
Coverage analysis and depth-time plots for sonde downcast water quality profiles.

A sonde lowered through the water column records temperature, salinity, oxygen, and more at a
series of depths. Collected at fixed monitoring sites over several years, these readings form a
flat table of irregularly sampled profiles. This crate answers two questions about such a table:

 - Which sites and years were sampled often enough to be worth looking at? See the `coverage`
   module.
 - What does the vertical and seasonal structure look like? See the `plot` module, which draws
   depth against date with points colored by one measured variable.

The `report` module runs both over a whole data set. Loading the data is up to the caller, as is
saving the plots.

Missing data is everywhere in this kind of record, so every measured value, including the depth,
is an `optional::Optioned` value. Missing values are never errors.
*/

//
// API
//
pub use crate::{
    coverage::{
        compute_coverage, event_succeeded, restrict_to_sites_and_years, select_preferred_sites,
        CoverageTable,
    },
    error::{AnalysisError, Result},
    keys::{GroupKey, KeyField, KeyValue, Variable},
    observation::Observation,
    plot::{render, render_variable, PlotConfig, ProfilePlot},
    report::{build_report, Report, ReportConfig},
};

pub mod coverage;
pub mod observation;
pub mod plot;
pub mod report;

//
// Internal use only
//

// Modules
mod error;
mod keys;
#[cfg(test)]
mod test_data;
