//! Chart builders with Tableau styling.
//!
//! Every builder normalizes its input into a [`DataTable`], checks the named
//! columns and returns a [`Plot`] with the theme's layout applied. Rendering
//! is left to the caller (`Plot::show`, `Plot::write_html`, `Plot::to_json`).

use super::table::{DataTable, IntoDataTable, label};
use super::theme::Theme;
use crate::AppError;
use crate::api::session::Session;
use crate::core::services::view_service::ViewService;
use crate::error::ChartError;
use indexmap::IndexMap;
use plotly::common::{
    ColorScale, ColorScaleElement, ColorScalePalette, Fill, Line, Marker, MarkerSymbol, Mode,
    Orientation,
};
use plotly::layout::BarMode;
use plotly::{Bar, BoxPlot, HeatMap, Pie, Plot, Scatter};

const MAX_MARKER_SIZE: f64 = 20.0;
const TARGET_MARKER_SIZE: usize = 20;
const TARGET_LINE_WIDTH: f64 = 4.0;
const BULLET_BAR_WIDTH: f64 = 0.5;

/// ColorBrewer RdYlBu, blue for low values through red for high ones
const RD_YL_BU: [&str; 11] = [
    "#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8", "#ffffbf", "#fee090", "#fdae61",
    "#f46d43", "#d73027", "#a50026",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartOrientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarOptions {
    pub x: String,
    pub y: String,
    pub title: String,
    pub color: Option<String>,
    pub orientation: ChartOrientation,
    pub stacked: bool,
}

impl BarOptions {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            title: String::new(),
            color: None,
            orientation: ChartOrientation::Vertical,
            stacked: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn color(mut self, column: impl Into<String>) -> Self {
        self.color = Some(column.into());
        self
    }

    pub fn horizontal(mut self) -> Self {
        self.orientation = ChartOrientation::Horizontal;
        self
    }

    /// Stack coloured series instead of grouping them side by side
    pub fn stacked(mut self) -> Self {
        self.stacked = true;
        self
    }
}

/// Options shared by line, area and box charts
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesOptions {
    pub x: String,
    pub y: String,
    pub title: String,
    pub color: Option<String>,
    /// Line charts draw point markers; area charts stack their series
    pub emphasize: bool,
}

impl SeriesOptions {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            title: String::new(),
            color: None,
            emphasize: true,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn color(mut self, column: impl Into<String>) -> Self {
        self.color = Some(column.into());
        self
    }

    pub fn emphasize(mut self, enabled: bool) -> Self {
        self.emphasize = enabled;
        self
    }
}

/// Options for scatter and bubble charts
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterOptions {
    pub x: String,
    pub y: String,
    pub title: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub text: Option<String>,
    pub tooltip: Vec<String>,
}

impl ScatterOptions {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            title: String::new(),
            color: None,
            size: None,
            text: None,
            tooltip: Vec::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn color(mut self, column: impl Into<String>) -> Self {
        self.color = Some(column.into());
        self
    }

    pub fn size(mut self, column: impl Into<String>) -> Self {
        self.size = Some(column.into());
        self
    }

    pub fn text(mut self, column: impl Into<String>) -> Self {
        self.text = Some(column.into());
        self
    }

    pub fn tooltip<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tooltip = columns.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieOptions {
    pub values: String,
    pub names: String,
    pub title: String,
}

impl PieOptions {
    pub fn new(values: impl Into<String>, names: impl Into<String>) -> Self {
        Self {
            values: values.into(),
            names: names.into(),
            title: String::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct HeatmapOptions {
    pub x: String,
    pub y: String,
    pub values: String,
    pub title: String,
    pub color_scale: ColorScale,
    pub reverse: bool,
}

impl HeatmapOptions {
    pub fn new(x: impl Into<String>, y: impl Into<String>, values: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            values: values.into(),
            title: String::new(),
            color_scale: diverging_scale(),
            reverse: false,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Use one of plotly's named palettes instead of the default scale
    pub fn palette(mut self, palette: ColorScalePalette, reverse: bool) -> Self {
        self.color_scale = ColorScale::Palette(palette);
        self.reverse = reverse;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulletOptions {
    pub measure: String,
    pub target: String,
    pub label: Option<String>,
    pub title: String,
    pub orientation: ChartOrientation,
}

impl BulletOptions {
    pub fn new(measure: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            measure: measure.into(),
            target: target.into(),
            title: String::new(),
            label: None,
            orientation: ChartOrientation::Horizontal,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Category column naming each bullet; rows share one band when absent
    pub fn label(mut self, column: impl Into<String>) -> Self {
        self.label = Some(column.into());
        self
    }

    pub fn vertical(mut self) -> Self {
        self.orientation = ChartOrientation::Vertical;
        self
    }
}

/// Chart façade applying a [`Theme`] to every figure
#[derive(Debug, Clone, Default)]
pub struct TableauViz {
    theme: Theme,
}

impl TableauViz {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Fetch a view's underlying data from the server as a table
    pub async fn view_data(&self, session: &Session, view_id: &str) -> Result<DataTable, AppError> {
        ViewService::new(session)?.data(view_id).await
    }

    /// Bar chart; coloured series are grouped unless `stacked`
    pub fn bar_chart(
        &self,
        data: impl IntoDataTable,
        options: &BarOptions,
    ) -> Result<Plot, ChartError> {
        let table = data.into_data_table()?;
        let categories = table.column(&options.x)?;
        let values = table.numeric_column(&options.y)?;

        let mut plot = Plot::new();
        for (name, rows) in series(&table, options.color.as_deref())? {
            let x = pick(categories, &rows);
            let y = pick(&values, &rows);
            match options.orientation {
                ChartOrientation::Vertical => plot.add_trace(Bar::new(x, y).name(&name)),
                ChartOrientation::Horizontal => plot.add_trace(
                    Bar::new(y, x)
                        .orientation(Orientation::Horizontal)
                        .name(&name),
                ),
            }
        }

        let bar_mode = if options.stacked {
            BarMode::Stack
        } else {
            BarMode::Group
        };
        plot.set_layout(
            self.theme
                .layout(&options.title, options.color.is_some())
                .bar_mode(bar_mode),
        );
        Ok(plot)
    }

    /// Line chart, one line per colour group, markers on by default
    pub fn line_chart(
        &self,
        data: impl IntoDataTable,
        options: &SeriesOptions,
    ) -> Result<Plot, ChartError> {
        let table = data.into_data_table()?;
        let xs = table.column(&options.x)?;
        let ys = table.numeric_column(&options.y)?;
        let mode = if options.emphasize {
            Mode::LinesMarkers
        } else {
            Mode::Lines
        };

        let mut plot = Plot::new();
        for (name, rows) in series(&table, options.color.as_deref())? {
            plot.add_trace(
                Scatter::new(pick(xs, &rows), pick(&ys, &rows))
                    .mode(mode.clone())
                    .name(&name),
            );
        }
        plot.set_layout(self.theme.layout(&options.title, options.color.is_some()));
        Ok(plot)
    }

    /// Area chart; series are stacked unless `emphasize(false)`
    pub fn area_chart(
        &self,
        data: impl IntoDataTable,
        options: &SeriesOptions,
    ) -> Result<Plot, ChartError> {
        let table = data.into_data_table()?;
        let xs = table.column(&options.x)?;
        let ys = table.numeric_column(&options.y)?;

        let mut plot = Plot::new();
        for (index, (name, rows)) in series(&table, options.color.as_deref())?
            .into_iter()
            .enumerate()
        {
            let trace = Scatter::new(pick(xs, &rows), pick(&ys, &rows))
                .mode(Mode::Lines)
                .name(&name);
            let trace = if options.emphasize {
                trace.stack_group("one")
            } else if index == 0 {
                trace.fill(Fill::ToZeroY)
            } else {
                trace.fill(Fill::ToNextY)
            };
            plot.add_trace(trace);
        }
        plot.set_layout(self.theme.layout(&options.title, options.color.is_some()));
        Ok(plot)
    }

    /// Scatter plot with optional marker sizing, labels and hover columns
    pub fn scatter_plot(
        &self,
        data: impl IntoDataTable,
        options: &ScatterOptions,
    ) -> Result<Plot, ChartError> {
        let table = data.into_data_table()?;
        let xs = table.numeric_column(&options.x)?;
        let ys = table.numeric_column(&options.y)?;
        let sizes = match &options.size {
            Some(column) => Some(marker_sizes(&table.numeric_column(column)?)),
            None => None,
        };
        let texts = match &options.text {
            Some(column) => Some(table.column(column)?.iter().map(label).collect::<Vec<_>>()),
            None => None,
        };
        let hovers = hover_lines(&table, &options.tooltip)?;

        let mut plot = Plot::new();
        for (name, rows) in series(&table, options.color.as_deref())? {
            let mode = if texts.is_some() {
                Mode::MarkersText
            } else {
                Mode::Markers
            };
            let mut trace = Scatter::new(pick(&xs, &rows), pick(&ys, &rows))
                .mode(mode)
                .name(&name);
            if let Some(sizes) = &sizes {
                trace = trace.marker(Marker::new().size_array(pick(sizes, &rows)));
            }
            if let Some(texts) = &texts {
                trace = trace.text_array(pick(texts, &rows));
            }
            if let Some(hovers) = &hovers {
                trace = trace.hover_text_array(pick(hovers, &rows));
            }
            plot.add_trace(trace);
        }
        plot.set_layout(self.theme.layout(&options.title, options.color.is_some()));
        Ok(plot)
    }

    /// Scatter plot whose marker area follows a size column
    pub fn bubble_chart(
        &self,
        data: impl IntoDataTable,
        options: &ScatterOptions,
    ) -> Result<Plot, ChartError> {
        if options.size.is_none() {
            return Err(ChartError::MissingColumn {
                column: "size".to_string(),
            });
        }
        self.scatter_plot(data, options)
    }

    /// Pie chart labelled with category and percentage
    pub fn pie_chart(
        &self,
        data: impl IntoDataTable,
        options: &PieOptions,
    ) -> Result<Plot, ChartError> {
        let table = data.into_data_table()?;
        let values = table.numeric_column(&options.values)?;
        let names: Vec<String> = table.column(&options.names)?.iter().map(label).collect();

        let mut plot = Plot::new();
        plot.add_trace(
            Pie::new(values)
                .labels(names)
                .text_info("percent+label"),
        );
        plot.set_layout(self.theme.layout(&options.title, true));
        Ok(plot)
    }

    /// Box plot of `y` per `x` category, one box trace per colour group
    pub fn box_plot(
        &self,
        data: impl IntoDataTable,
        options: &SeriesOptions,
    ) -> Result<Plot, ChartError> {
        let table = data.into_data_table()?;
        let xs = table.column(&options.x)?;
        let ys = table.numeric_column(&options.y)?;

        let mut plot = Plot::new();
        for (name, rows) in series(&table, options.color.as_deref())? {
            plot.add_trace(BoxPlot::new_xy(pick(xs, &rows), pick(&ys, &rows)).name(&name));
        }
        plot.set_layout(self.theme.layout(&options.title, options.color.is_some()));
        Ok(plot)
    }

    /// Heatmap of the mean of `values` for every (`y`, `x`) pair
    pub fn heatmap(
        &self,
        data: impl IntoDataTable,
        options: &HeatmapOptions,
    ) -> Result<Plot, ChartError> {
        let table = data.into_data_table()?;
        let grid = pivot_mean(&table, &options.x, &options.y, &options.values)?;

        let mut plot = Plot::new();
        plot.add_trace(
            HeatMap::new(grid.columns, grid.rows, grid.cells)
                .color_scale(options.color_scale.clone())
                .reverse_scale(options.reverse)
                .hover_on_gaps(false),
        );
        plot.set_layout(self.theme.layout(&options.title, false));
        Ok(plot)
    }

    /// Bullet chart: measure bars overlaid with target tick marks
    pub fn bullet_chart(
        &self,
        data: impl IntoDataTable,
        options: &BulletOptions,
    ) -> Result<Plot, ChartError> {
        let table = data.into_data_table()?;
        let measures = table.numeric_column(&options.measure)?;
        let targets = table.numeric_column(&options.target)?;
        let bands: Vec<String> = match &options.label {
            Some(column) => table.column(column)?.iter().map(label).collect(),
            None => vec![String::new(); table.len()],
        };

        let actual_marker = || Marker::new().color(self.theme.color(0));
        let target_marker = |symbol| {
            Marker::new()
                .symbol(symbol)
                .size(TARGET_MARKER_SIZE)
                .color("black")
                .line(Line::new().width(TARGET_LINE_WIDTH))
        };

        let mut plot = Plot::new();
        match options.orientation {
            ChartOrientation::Horizontal => {
                plot.add_trace(
                    Bar::new(measures, bands.clone())
                        .orientation(Orientation::Horizontal)
                        .width(BULLET_BAR_WIDTH)
                        .marker(actual_marker())
                        .name("Actual"),
                );
                plot.add_trace(
                    Scatter::new(targets, bands)
                        .mode(Mode::Markers)
                        .marker(target_marker(MarkerSymbol::LineNSOpen))
                        .name("Target"),
                );
            }
            ChartOrientation::Vertical => {
                plot.add_trace(
                    Bar::new(bands.clone(), measures)
                        .width(BULLET_BAR_WIDTH)
                        .marker(actual_marker())
                        .name("Actual"),
                );
                plot.add_trace(
                    Scatter::new(bands, targets)
                        .mode(Mode::Markers)
                        .marker(target_marker(MarkerSymbol::LineEWOpen))
                        .name("Target"),
                );
            }
        }
        plot.set_layout(
            self.theme
                .layout(&options.title, true)
                .bar_mode(BarMode::Overlay),
        );
        Ok(plot)
    }
}

/// Row groups per colour value, or a single unnamed group of all rows
fn series(table: &DataTable, color: Option<&str>) -> Result<Vec<(String, Vec<usize>)>, ChartError> {
    match color {
        Some(column) => Ok(table.group_rows(column)?.into_iter().collect()),
        None => Ok(vec![(String::new(), (0..table.len()).collect())]),
    }
}

fn pick<T: Clone>(values: &[T], rows: &[usize]) -> Vec<T> {
    rows.iter().filter_map(|&row| values.get(row).cloned()).collect()
}

fn diverging_scale() -> ColorScale {
    let last = (RD_YL_BU.len() - 1) as f64;
    ColorScale::Vector(
        RD_YL_BU
            .iter()
            .enumerate()
            .map(|(i, color)| ColorScaleElement(i as f64 / last, color.to_string()))
            .collect(),
    )
}

/// Scale sizes linearly so the largest marker is `MAX_MARKER_SIZE` pixels
fn marker_sizes(values: &[f64]) -> Vec<usize> {
    let max = values.iter().cloned().fold(0.0_f64, f64::max);
    values
        .iter()
        .map(|&v| {
            if max <= 0.0 {
                1
            } else {
                ((v / max) * MAX_MARKER_SIZE).round().max(1.0) as usize
            }
        })
        .collect()
}

fn hover_lines(table: &DataTable, columns: &[String]) -> Result<Option<Vec<String>>, ChartError> {
    if columns.is_empty() {
        return Ok(None);
    }
    let cells = columns
        .iter()
        .map(|name| table.column(name).map(|values| (name, values)))
        .collect::<Result<Vec<_>, _>>()?;

    let lines = (0..table.len())
        .map(|row| {
            cells
                .iter()
                .map(|(name, values)| format!("{}: {}", name, label(&values[row])))
                .collect::<Vec<_>>()
                .join("<br>")
        })
        .collect();
    Ok(Some(lines))
}

struct PivotGrid {
    columns: Vec<String>,
    rows: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

/// Mean of `values` for each (`y`, `x`) pair, categories in first-seen order.
/// Cells with no rows stay empty.
fn pivot_mean(table: &DataTable, x: &str, y: &str, values: &str) -> Result<PivotGrid, ChartError> {
    let xs = table.column(x)?;
    let ys = table.column(y)?;
    let vs = table.numeric_column(values)?;

    let mut sums: IndexMap<String, IndexMap<String, (f64, usize)>> = IndexMap::new();
    let mut columns: Vec<String> = Vec::new();
    for ((xv, yv), value) in xs.iter().zip(ys).zip(&vs) {
        let column = label(xv);
        if !columns.contains(&column) {
            columns.push(column.clone());
        }
        let cell = sums.entry(label(yv)).or_default().entry(column).or_insert((0.0, 0));
        cell.0 += value;
        cell.1 += 1;
    }

    let cells = sums
        .values()
        .map(|row| {
            columns
                .iter()
                .map(|column| row.get(column).map(|(sum, count)| sum / *count as f64))
                .collect()
        })
        .collect();

    Ok(PivotGrid {
        columns,
        rows: sums.keys().cloned().collect(),
        cells,
    })
}
