//! Batch rendering of depth-time plots for every preferred site, year, and variable.
//!
//! This ties the coverage analysis to the plotting. Sites with enough sampling events are
//! selected, the data is restricted to the years after the cut off, and then a plot is rendered
//! for every combination of site, year of interest, and configured variable. A combination that
//! fails is logged and recorded in the report, it never stops the rest of the batch.
use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;
use log::{debug, info, warn};
use serde::Deserialize;

use crate::{
    coverage::{
        compute_coverage, restrict_to_sites_and_years, select_preferred_sites, CoverageTable,
    },
    error::Result,
    keys::KeyField,
    observation::Observation,
    plot::{self, ColorDirection, Palette, PlotConfig, ProfilePlot, Rgb},
};

/// Settings for a whole report.
///
/// The threshold and year cut off are properties of a particular data set's sampling history,
/// so there are no defaults for them.
///
/// # Examples
///
/// ```rust
/// use sonde_profiles::report::ReportConfig;
///
/// let config = ReportConfig::from_toml_str(
///     r#"
///     preferred_site_threshold = 15
///     min_year = 2016
///     years = [2017, 2018]
///
///     [[variables]]
///     name = "temperature"
///     depth_limits = [0.0, 12.0]
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.preferred_site_threshold(), 15);
/// assert_eq!(config.variables().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportConfig {
    preferred_site_threshold: usize,
    min_year: i32,
    #[serde(default)]
    years: Vec<i32>,
    #[serde(default)]
    variables: Vec<VariablePlot>,
}

impl ReportConfig {
    /// Create a configuration with no years or variables.
    pub fn new(preferred_site_threshold: usize, min_year: i32) -> Self {
        ReportConfig {
            preferred_site_threshold,
            min_year,
            years: vec![],
            variables: vec![],
        }
    }

    /// Load a configuration from TOML.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Builder method for the years to plot.
    #[inline]
    pub fn with_years(mut self, years: Vec<i32>) -> Self {
        self.years = years;
        self
    }

    /// Builder method to add a variable to plot.
    #[inline]
    pub fn with_variable(mut self, variable: VariablePlot) -> Self {
        self.variables.push(variable);
        self
    }

    /// Sites need strictly more successful sampling events than this to be plotted.
    #[inline]
    pub fn preferred_site_threshold(&self) -> usize {
        self.preferred_site_threshold
    }

    /// Only years strictly after this are kept.
    #[inline]
    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    /// The years to plot for every site.
    #[inline]
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// The variables to plot.
    #[inline]
    pub fn variables(&self) -> &[VariablePlot] {
        &self.variables
    }
}

/// How to plot one variable. The name is only checked when rendering, so a misspelled variable
/// fails its own plots and nothing else.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariablePlot {
    name: String,
    depth_limits: (f64, f64),
    #[serde(default)]
    palette: Option<Palette>,
    #[serde(default)]
    direction: Option<ColorDirection>,
    #[serde(default)]
    color_domain: Option<(f64, f64)>,
    #[serde(default)]
    missing_value_color: Option<Rgb>,
    #[serde(default)]
    year_domains: Vec<YearDomain>,
}

/// A color domain that only applies to one year.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct YearDomain {
    /// The year the domain applies to.
    pub year: i32,
    /// The `(min, max)` of the color scale.
    pub domain: (f64, f64),
}

impl VariablePlot {
    /// Plot the named variable between the given depths.
    pub fn new<S: Into<String>>(name: S, depth_limits: (f64, f64)) -> Self {
        VariablePlot {
            name: name.into(),
            depth_limits,
            palette: None,
            direction: None,
            color_domain: None,
            missing_value_color: None,
            year_domains: vec![],
        }
    }

    /// Builder method for the palette.
    #[inline]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Builder method for the palette direction.
    #[inline]
    pub fn with_direction(mut self, direction: ColorDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Builder method for a color domain used for every year without its own.
    #[inline]
    pub fn with_color_domain(mut self, domain: (f64, f64)) -> Self {
        self.color_domain = Some(domain);
        self
    }

    /// Builder method for the missing value color.
    #[inline]
    pub fn with_missing_value_color(mut self, color: Rgb) -> Self {
        self.missing_value_color = Some(color);
        self
    }

    /// Builder method for a color domain for a single year.
    #[inline]
    pub fn with_year_domain(mut self, year: i32, domain: (f64, f64)) -> Self {
        self.year_domains.push(YearDomain { year, domain });
        self
    }

    /// The name of the variable.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The plot configuration for one site and year.
    pub fn plot_config(&self, site: &str, year: i32) -> PlotConfig {
        let domain = self
            .year_domains
            .iter()
            .rev()
            .find(|yd| yd.year == year)
            .map(|yd| yd.domain)
            .or(self.color_domain);

        let mut config = PlotConfig::new(self.depth_limits)
            .with_title(site)
            .with_color_domain(domain);

        if let Some(palette) = self.palette {
            config = config.with_palette(palette);
        }
        if let Some(direction) = self.direction {
            config = config.with_direction(direction);
        }
        if let Some(color) = self.missing_value_color {
            config = config.with_missing_value_color(color);
        }

        config
    }
}

/// The outcome of rendering one site, year, and variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    /// Monitoring site.
    pub site: String,
    /// Year plotted.
    pub year: i32,
    /// The variable name as configured.
    pub variable: String,
    /// The plot, or why it could not be made.
    pub result: Result<ProfilePlot>,
}

/// Everything produced by a report run.
#[derive(Debug, Clone)]
pub struct Report {
    preferred_sites: BTreeSet<String>,
    coverage: CoverageTable,
    entries: Vec<ReportEntry>,
}

/// Run the whole batch.
///
/// Entries are ordered by site, then by year in configuration order, then by variable in
/// configuration order. If no site qualifies the report has no entries.
pub fn build_report(observations: &[Observation], config: &ReportConfig) -> Report {
    let preferred_sites = select_preferred_sites(observations, config.preferred_site_threshold());
    info!(
        "{} of the sites have more than {} sampling events.",
        preferred_sites.len(),
        config.preferred_site_threshold()
    );

    let restricted = restrict_to_sites_and_years(observations, &preferred_sites, config.min_year());
    let coverage = compute_coverage(&restricted, &[KeyField::Site, KeyField::Year, KeyField::Date]);

    let by_site_year: HashMap<(&str, i32), Vec<Observation>> = restricted
        .iter()
        .map(|obs| ((obs.site_id(), obs.year()), obs.clone()))
        .into_group_map();

    let mut entries = Vec::with_capacity(
        preferred_sites.len() * config.years().len() * config.variables().len(),
    );

    for site in &preferred_sites {
        for &year in config.years() {
            let obs: &[Observation] = by_site_year
                .get(&(site.as_str(), year))
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            if obs.is_empty() {
                debug!("{} has no data in {}.", site, year);
            }

            for var in config.variables() {
                let result = plot::render(obs, var.name(), &var.plot_config(site, year));

                if let Err(ref err) = result {
                    warn!("Skipping {} {} {}: {}", site, year, var.name(), err);
                }

                entries.push(ReportEntry {
                    site: site.clone(),
                    year,
                    variable: var.name().to_owned(),
                    result,
                });
            }
        }
    }

    Report {
        preferred_sites,
        coverage,
        entries,
    }
}

impl Report {
    /// The sites that qualified for plotting.
    #[inline]
    pub fn preferred_sites(&self) -> &BTreeSet<String> {
        &self.preferred_sites
    }

    /// Successful sampling events per site and year in the plotted data.
    #[inline]
    pub fn coverage(&self) -> &CoverageTable {
        &self.coverage
    }

    /// Every attempted plot.
    #[inline]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// The entries that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|entry| entry.result.is_err())
    }

    /// The plots that were made, with the entry they belong to.
    pub fn plots(&self) -> impl Iterator<Item = (&ReportEntry, &ProfilePlot)> {
        self.entries
            .iter()
            .filter_map(|entry| entry.result.as_ref().ok().map(|plot| (entry, plot)))
    }
}
