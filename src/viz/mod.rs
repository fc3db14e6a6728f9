//! Tableau-styled charts built on plotly.

pub mod charts;
pub mod table;
pub mod theme;

pub use charts::{
    BarOptions, BulletOptions, ChartOrientation, HeatmapOptions, PieOptions, ScatterOptions,
    SeriesOptions, TableauViz,
};
pub use table::{DataTable, IntoDataTable};
pub use theme::{TABLEAU_COLORS, Theme};
