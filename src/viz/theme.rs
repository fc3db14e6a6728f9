//! Tableau look and feel applied to every chart.

use plotly::common::{Anchor, Font, Orientation, Title};
use plotly::layout::{Axis, Legend};
use plotly::Layout;

/// Tableau 10 palette, in Tableau's order
pub const TABLEAU_COLORS: [(&str, &str); 10] = [
    ("blue", "#4E79A7"),
    ("orange", "#F28E2B"),
    ("red", "#E15759"),
    ("teal", "#76B7B2"),
    ("green", "#59A14F"),
    ("yellow", "#EDC948"),
    ("purple", "#B07AA1"),
    ("pink", "#FF9DA7"),
    ("brown", "#9C755F"),
    ("gray", "#BAB0AC"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub palette: Vec<String>,
    pub background_color: String,
    pub font_family: String,
    pub font_size: usize,
    pub title_font_size: usize,
    pub grid_color: String,
    pub grid_width: usize,
    pub zero_line_color: String,
    pub legend_y: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: TABLEAU_COLORS.iter().map(|(_, hex)| hex.to_string()).collect(),
            background_color: "white".to_string(),
            font_family: "Arial".to_string(),
            font_size: 14,
            title_font_size: 24,
            grid_color: "lightgray".to_string(),
            grid_width: 1,
            zero_line_color: "gray".to_string(),
            legend_y: -0.15,
        }
    }
}

impl Theme {
    /// Palette colour for the `index`-th series, wrapping around
    pub fn color(&self, index: usize) -> String {
        if self.palette.is_empty() {
            return TABLEAU_COLORS[0].1.to_string();
        }
        self.palette[index % self.palette.len()].clone()
    }

    /// Base layout: centred title, white background, gridded axes and a
    /// horizontal legend below the plot. Series take palette colours in
    /// trace order.
    pub fn layout(&self, title: &str, show_legend: bool) -> Layout {
        Layout::new()
            .colorway(self.palette.clone())
            .title(
                Title::with_text(title)
                    .x(0.5)
                    .x_anchor(Anchor::Center)
                    .font(Font::new().size(self.title_font_size)),
            )
            .font(
                Font::new()
                    .family(&self.font_family)
                    .size(self.font_size),
            )
            .plot_background_color(self.background_color.clone())
            .paper_background_color(self.background_color.clone())
            .show_legend(show_legend)
            .legend(
                Legend::new()
                    .orientation(Orientation::Horizontal)
                    .y(self.legend_y),
            )
            .x_axis(self.grid_axis())
            .y_axis(self.grid_axis())
    }

    /// Value axis with gridlines and a zero line
    pub fn grid_axis(&self) -> Axis {
        Axis::new()
            .show_grid(true)
            .grid_width(self.grid_width)
            .grid_color(self.grid_color.clone())
            .zero_line(true)
            .zero_line_width(1)
            .zero_line_color(self.zero_line_color.clone())
    }
}
