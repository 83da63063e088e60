//! Depth versus date scatter plots colored by a measured variable.
//!
//! Rendering happens in two steps. `render` turns observations into a `ProfilePlot`, a complete
//! description of what goes where and in what color. `ProfilePlot::draw` then puts that on any
//! `plotters` backend. The plot is a raw scatter, one point per observation with a depth. Nothing
//! is interpolated between points since downcasts are too sparse and irregular in time for that
//! to be meaningful.
//!
//! Color scales fit to the data of a single render call unless a domain is configured, so plots
//! for different sites or years are only comparable when the domain is fixed.
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use log::debug;
use metfor::{Meters, Quantity};
use plotters::{
    coord::{types::RangedDateTime, Shift},
    drawing::DrawingAreaErrorKind,
    prelude::*,
};
use serde::{Deserialize, Deserializer};

use crate::{
    error::{AnalysisError, Result},
    keys::Variable,
    observation::Observation,
};

pub use self::palette::{ColorDirection, ColorScale, Palette, Rgb};

/// Settings for a single depth-time plot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlotConfig {
    #[serde(default = "default_palette")]
    palette: Palette,
    #[serde(default = "default_direction")]
    direction: ColorDirection,
    #[serde(default)]
    color_domain: Option<(f64, f64)>,
    #[serde(default = "default_missing_color")]
    missing_value_color: Rgb,
    #[serde(deserialize_with = "deserialize_depth_limits")]
    depth_limits: (f64, f64),
    #[serde(default)]
    title: String,
}

// Limits are stored shallowest first, however they were given.
fn ordered_limits((a, b): (f64, f64)) -> (f64, f64) {
    (a.min(b), a.max(b))
}

fn deserialize_depth_limits<'de, D>(deserializer: D) -> std::result::Result<(f64, f64), D::Error>
where
    D: Deserializer<'de>,
{
    <(f64, f64)>::deserialize(deserializer).map(ordered_limits)
}

fn default_palette() -> Palette {
    Palette::Spectral
}

fn default_direction() -> ColorDirection {
    ColorDirection::Reverse
}

fn default_missing_color() -> Rgb {
    Rgb(0x7f, 0x7f, 0x7f)
}

impl PlotConfig {
    /// Create a configuration showing depths between the given limits, in meters. The palette
    /// defaults to a reversed `Spectral`, so low values are blue and high values red, missing
    /// values are grey, and the color domain is fit to the data.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sonde_profiles::plot::{ColorDirection, Palette, PlotConfig, Rgb};
    ///
    /// let config = PlotConfig::new((0.0, 12.0))
    ///     .with_title("P7CBI")
    ///     .with_palette(Palette::YlGnBu)
    ///     .with_direction(ColorDirection::Forward)
    ///     .with_color_domain((0.0, 10.0))
    ///     .with_missing_value_color(Rgb(0, 0, 0));
    ///
    /// assert_eq!(config.title(), "P7CBI");
    /// assert_eq!(config.color_domain(), Some((0.0, 10.0)));
    ///
    /// let config = config.with_color_domain(None);
    /// assert!(config.color_domain().is_none());
    /// ```
    pub fn new(depth_limits: (f64, f64)) -> Self {
        PlotConfig {
            palette: default_palette(),
            direction: default_direction(),
            color_domain: None,
            missing_value_color: default_missing_color(),
            depth_limits: ordered_limits(depth_limits),
            title: String::new(),
        }
    }

    /// Builder method for the color palette.
    #[inline]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Builder method for the palette direction.
    #[inline]
    pub fn with_direction(mut self, direction: ColorDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Builder method for a fixed color domain, or `None` to fit it to the data.
    #[inline]
    pub fn with_color_domain<T>(mut self, domain: T) -> Self
    where
        Option<(f64, f64)>: From<T>,
    {
        self.color_domain = Option::from(domain);
        self
    }

    /// Builder method for the color of points with a missing value.
    #[inline]
    pub fn with_missing_value_color(mut self, color: Rgb) -> Self {
        self.missing_value_color = color;
        self
    }

    /// Builder method for the depth axis limits in meters.
    #[inline]
    pub fn with_depth_limits(mut self, depth_limits: (f64, f64)) -> Self {
        self.depth_limits = ordered_limits(depth_limits);
        self
    }

    /// Builder method for the plot title, usually the site.
    #[inline]
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    /// The color palette.
    #[inline]
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Which end of the palette low values map to.
    #[inline]
    pub fn direction(&self) -> ColorDirection {
        self.direction
    }

    /// The fixed color domain, if any.
    #[inline]
    pub fn color_domain(&self) -> Option<(f64, f64)> {
        self.color_domain
    }

    /// The color of points with a missing value.
    #[inline]
    pub fn missing_value_color(&self) -> Rgb {
        self.missing_value_color
    }

    /// The `(shallowest, deepest)` depths shown, in meters.
    #[inline]
    pub fn depth_limits(&self) -> (f64, f64) {
        self.depth_limits
    }

    /// The plot title.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// A single point in a depth-time plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPoint {
    /// Sample date, the x coordinate.
    pub date: NaiveDate,
    /// Depth, the y coordinate.
    pub depth: Meters,
    /// The variable's value, or `None` if it was missing.
    pub value: Option<f64>,
    /// Fill color of the point.
    pub color: Rgb,
}

/// A fully specified depth-time plot, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePlot {
    title: String,
    variable: Variable,
    depth_limits: (f64, f64),
    color_scale: Option<ColorScale>,
    missing_value_color: Rgb,
    points: Vec<PlotPoint>,
    skipped: usize,
}

/// Plot a variable by name.
///
/// Fails with `InvalidVariable` if `variable` is not the name of a measured variable. All
/// observations are assumed to be from the same site and year, selecting them is up to the
/// caller. See `render_variable`.
pub fn render(
    observations: &[Observation],
    variable: &str,
    config: &PlotConfig,
) -> Result<ProfilePlot> {
    let var = Variable::from_name(variable)?;
    Ok(render_variable(observations, var, config))
}

/// Plot a variable.
///
/// Every observation with a depth becomes one point. Points with a missing value are still
/// plotted, in the missing value color, since a missing reading during a downcast that happened
/// is itself informative. Observations without a depth cannot be placed and are skipped. No
/// observations at all is fine and results in an empty plot.
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use sonde_profiles::{
///     observation::doctest::make_test_downcast,
///     plot::{render_variable, PlotConfig},
///     Variable,
/// };
///
/// let date = NaiveDate::from_ymd_opt(2017, 6, 3).unwrap();
/// let obs = make_test_downcast("P7CBI", date, 5);
/// let config = PlotConfig::new((0.0, 10.0)).with_title("P7CBI");
///
/// let plot = render_variable(&obs, Variable::Temperature, &config);
/// assert_eq!(plot.points().len(), 5);
/// assert_eq!(plot.color_domain(), Some((16.0, 18.0)));
///
/// let plot = render_variable(&[], Variable::Temperature, &config);
/// assert!(plot.is_empty());
/// ```
pub fn render_variable(
    observations: &[Observation],
    variable: Variable,
    config: &PlotConfig,
) -> ProfilePlot {
    let domain = config
        .color_domain()
        .or_else(|| data_domain(observations, variable));
    let color_scale = domain.map(|dom| ColorScale::new(config.palette(), config.direction(), dom));
    let missing_value_color = config.missing_value_color();

    let points: Vec<PlotPoint> = observations
        .iter()
        .filter_map(|obs| {
            let depth = obs.depth().into_option()?;
            let value = obs.value(variable).into_option();
            let color = match (value, color_scale) {
                (Some(val), Some(scale)) => scale.color(val),
                _ => missing_value_color,
            };

            Some(PlotPoint {
                date: obs.sample_date(),
                depth,
                value,
                color,
            })
        })
        .collect();

    let skipped = observations.len() - points.len();
    if skipped > 0 {
        debug!(
            "{}: skipped {} of {} observations without a depth.",
            config.title(),
            skipped,
            observations.len()
        );
    }

    ProfilePlot {
        title: config.title().to_owned(),
        variable,
        depth_limits: config.depth_limits(),
        color_scale,
        missing_value_color,
        points,
        skipped,
    }
}

// Range of the values that will be plotted.
fn data_domain(observations: &[Observation], variable: Variable) -> Option<(f64, f64)> {
    observations
        .iter()
        .filter(|obs| obs.depth().is_some())
        .filter_map(|obs| obs.value(variable).into_option())
        .fold(None, |acc, val| match acc {
            None => Some((val, val)),
            Some((lo, hi)) => Some((val.min(lo), val.max(hi))),
        })
}

const POINT_RADIUS: u32 = 4;
const LEGEND_WIDTH: u32 = 110;
const COLORBAR_STEPS: usize = 64;

impl ProfilePlot {
    /// The title of the plot.
    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The variable mapped to color.
    #[inline]
    pub fn variable(&self) -> Variable {
        self.variable
    }

    /// The plotted points, in the order of the observations they came from.
    #[inline]
    pub fn points(&self) -> &[PlotPoint] {
        &self.points
    }

    /// True if there is nothing to plot.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The number of observations left out because they had no depth.
    #[inline]
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// The number of points deeper or shallower than the depth limits. These are left out when
    /// drawing instead of being pinned to the edge of the plot.
    pub fn out_of_depth_range(&self) -> usize {
        self.points.len() - self.visible_points().count()
    }

    fn visible_points(&self) -> impl Iterator<Item = &PlotPoint> {
        let (top, bottom) = self.depth_limits;
        self.points.iter().filter(move |p| {
            let depth = p.depth.unpack();
            depth >= top && depth <= bottom
        })
    }

    /// The number of points plotted in the missing value color because the value was missing.
    pub fn missing_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_none()).count()
    }

    /// The `(min, max)` of the color scale, or `None` if no point had a value and no domain was
    /// configured.
    #[inline]
    pub fn color_domain(&self) -> Option<(f64, f64)> {
        self.color_scale.map(|scale| scale.domain())
    }

    /// The color used for points with a missing value.
    #[inline]
    pub fn missing_value_color(&self) -> Rgb {
        self.missing_value_color
    }

    /// The `(shallowest, deepest)` depths on the vertical axis, in meters.
    #[inline]
    pub fn depth_limits(&self) -> (f64, f64) {
        self.depth_limits
    }

    /// The first and last sample dates in the plot.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.points.iter().fold(None, |acc, p| match acc {
            None => Some((p.date, p.date)),
            Some((first, last)) => Some((first.min(p.date), last.max(p.date))),
        })
    }

    /// Draw the plot.
    ///
    /// Dates run along the x-axis, depth increases down the y-axis. A color bar is drawn on the
    /// right whenever the plot has a color domain. An empty plot only gets its title.
    pub fn draw<DB>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE).map_err(drawing_error)?;
        let root = root
            .titled(&self.title, ("sans-serif", 24.0))
            .map_err(drawing_error)?;

        let (first, last) = match self.date_range() {
            Some(range) => range,
            None => return Ok(()),
        };

        let (width, _) = root.dim_in_pixel();
        let (plot_area, legend_area) = root.split_horizontally(width.saturating_sub(LEGEND_WIDTH));

        let start = midnight(first) - Duration::days(1);
        let end = midnight(last) + Duration::days(1);

        // The y coordinate is the negated depth so deeper points are lower.
        let (top, bottom) = self.depth_limits;
        let mut chart = ChartBuilder::on(&plot_area)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(RangedDateTime::from(start..end), -bottom..-top)
            .map_err(drawing_error)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Depth (m)")
            .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%b %d").to_string())
            // 0.0 - y avoids labeling the surface "-0"
            .y_label_formatter(&|y: &f64| format!("{:.0}", 0.0 - y))
            .light_line_style(BLACK.mix(0.1))
            .draw()
            .map_err(drawing_error)?;

        let hidden = self.out_of_depth_range();
        if hidden > 0 {
            debug!(
                "{}: {} points outside the depth limits {:?} not drawn.",
                self.title, hidden, self.depth_limits
            );
        }

        chart
            .draw_series(self.visible_points().map(|p| {
                Circle::new(
                    (midnight(p.date), -p.depth.unpack()),
                    POINT_RADIUS,
                    RGBColor::from(p.color).filled(),
                )
            }))
            .map_err(drawing_error)?;

        if let Some(scale) = self.color_scale {
            self.draw_color_bar(&legend_area, scale)?;
        }

        Ok(())
    }

    fn draw_color_bar<DB>(&self, area: &DrawingArea<DB, Shift>, scale: ColorScale) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (lo, hi) = scale.domain();
        let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };

        let mut bar = ChartBuilder::on(area)
            .margin(10)
            .caption(self.variable.label(), ("sans-serif", 12))
            .y_label_area_size(45)
            .build_cartesian_2d(0.0..1.0, lo..hi)
            .map_err(drawing_error)?;

        bar.configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(0)
            .draw()
            .map_err(drawing_error)?;

        let step = (hi - lo) / COLORBAR_STEPS as f64;
        bar.draw_series((0..COLORBAR_STEPS).map(|i| {
            let y0 = lo + step * i as f64;
            let y1 = y0 + step;
            let color = RGBColor::from(scale.color((y0 + y1) / 2.0));
            Rectangle::new([(0.0, y0), (1.0, y1)], color.filled())
        }))
        .map_err(drawing_error)?;

        Ok(())
    }

    /// Draw the plot into an SVG document.
    pub fn to_svg(&self, width: u32, height: u32) -> Result<String> {
        let mut buffer = String::new();
        {
            let root = SVGBackend::with_string(&mut buffer, (width, height)).into_drawing_area();
            self.draw(&root)?;
            root.present().map_err(drawing_error)?;
        }
        Ok(buffer)
    }
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn drawing_error<E>(err: DrawingAreaErrorKind<E>) -> AnalysisError
where
    E: std::error::Error + Send + Sync,
{
    AnalysisError::Drawing(err.to_string())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_data::*;
    use metfor::Celsius;
    use optional::none;

    fn config() -> PlotConfig {
        PlotConfig::new((12.0, 0.0))
            .with_title("P7CBI")
            .with_palette(Palette::RdYlBu)
            .with_direction(ColorDirection::Forward)
    }

    #[test]
    fn test_empty_plot() {
        let plot = render_variable(&[], Variable::Salinity, &config());

        assert!(plot.is_empty());
        assert_eq!(plot.points().len(), 0);
        assert_eq!(plot.skipped(), 0);
        assert!(plot.color_domain().is_none());
        assert!(plot.date_range().is_none());
        assert_eq!(plot.title(), "P7CBI");
        assert_eq!(plot.depth_limits(), (0.0, 12.0));
    }

    #[test]
    fn test_invalid_variable() {
        assert_eq!(
            render(&p7cbi_2017(), "oxygen", &config()),
            Err(AnalysisError::InvalidVariable("oxygen".to_owned()))
        );
        assert!(render(&[], "oxygen", &config()).is_err());

        let plot = render(&p7cbi_2017(), "dissolved_oxygen", &config()).unwrap();
        assert_eq!(plot.variable(), Variable::DissolvedOxygen);
    }

    #[test]
    fn test_missing_values_use_missing_color() {
        let d = ymd(2017, 7, 7);
        let grey = Rgb(1, 2, 3);
        let obs = vec![
            Observation::new("P7CBI", d)
                .with_depth(Meters(0.0))
                .with_temperature(Celsius(20.0)),
            Observation::new("P7CBI", d)
                .with_depth(Meters(1.0))
                .with_temperature(none::<Celsius>()),
            Observation::new("P7CBI", d)
                .with_depth(Meters(2.0))
                .with_temperature(Celsius(10.0)),
            Observation::new("P7CBI", d).with_depth(Meters(3.0)),
        ];

        let plot = render_variable(
            &obs,
            Variable::Temperature,
            &config().with_missing_value_color(grey),
        );

        assert_eq!(plot.points().len(), 4);
        assert_eq!(plot.missing_count(), 2);
        assert_eq!(plot.color_domain(), Some((10.0, 20.0)));

        let anchors = Palette::RdYlBu.anchors();
        let colors: Vec<Rgb> = plot.points().iter().map(|p| p.color).collect();
        assert_eq!(
            colors,
            vec![anchors[anchors.len() - 1], grey, anchors[0], grey]
        );

        for p in plot.points() {
            assert_eq!(p.value.is_none(), p.color == grey);
        }
    }

    #[test]
    fn test_rows_without_depth_are_skipped() {
        let obs = p7cbi_2017();
        let plot = render_variable(&obs, Variable::Temperature, &config());

        let with_depth = obs.iter().filter(|o| o.depth().is_some()).count();
        assert_eq!(plot.points().len(), with_depth);
        assert_eq!(plot.skipped(), obs.len() - with_depth);
        assert_eq!(plot.date_range(), Some((ymd(2017, 5, 2), ymd(2017, 8, 9))));
    }

    #[test]
    fn test_fixed_color_domain() {
        let obs = p7cbi_2017();
        let plot = render_variable(
            &obs,
            Variable::Temperature,
            &config().with_color_domain((0.0, 30.0)),
        );

        assert_eq!(plot.color_domain(), Some((0.0, 30.0)));

        let scale = ColorScale::new(Palette::RdYlBu, ColorDirection::Forward, (0.0, 30.0));
        for p in plot.points() {
            if let Some(v) = p.value {
                assert_eq!(p.color, scale.color(v));
            }
        }
    }

    #[test]
    fn test_all_values_missing() {
        let obs = single_reading_site("P1XXX", ymd(2018, 3, 1));
        let plot = render_variable(&obs, Variable::Chlorophyll, &config());

        assert_eq!(plot.points().len(), 1);
        assert!(plot.color_domain().is_none());
        assert_eq!(plot.missing_count(), 1);
        assert_eq!(plot.points()[0].color, config().missing_value_color());
    }

    #[test]
    fn test_config_from_toml() {
        let config: PlotConfig = toml::from_str(
            r##"
            palette = "yl_gn_bu"
            direction = "forward"
            color_domain = [0.0, 25.0]
            missing_value_color = "#101010"
            depth_limits = [15.0, 0.0]
            title = "P6BRS"
            "##,
        )
        .unwrap();

        assert_eq!(config.palette(), Palette::YlGnBu);
        assert_eq!(config.direction(), ColorDirection::Forward);
        assert_eq!(config.color_domain(), Some((0.0, 25.0)));
        assert_eq!(config.missing_value_color(), Rgb(16, 16, 16));
        assert_eq!(config.depth_limits(), (0.0, 15.0));
        assert_eq!(config.title(), "P6BRS");

        let config: PlotConfig = toml::from_str("depth_limits = [15.0, 0.0]").unwrap();
        assert_eq!(config, PlotConfig::new((0.0, 15.0)));

        let config: PlotConfig = toml::from_str("depth_limits = [0.0, 5.0]").unwrap();
        assert_eq!(config, PlotConfig::new((0.0, 5.0)));

        assert!(toml::from_str::<PlotConfig>("depth_limits = [0.0, 5.0]\npalette = \"jet\"").is_err());
    }

    #[test]
    fn test_svg_output() {
        let obs = p7cbi_2017();
        let plot = render_variable(&obs, Variable::Temperature, &config());

        let svg = plot.to_svg(640, 480).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("P7CBI"));
        assert_eq!(svg.matches("<circle").count(), plot.points().len());

        let empty = render_variable(&[], Variable::Temperature, &config())
            .to_svg(640, 480)
            .unwrap();
        assert!(empty.contains("<svg"));
        assert_eq!(empty.matches("<circle").count(), 0);
    }
}

mod palette;
