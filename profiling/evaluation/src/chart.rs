//! Line charts rendered to SVG.

use super::errors::*;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

const WIDTH: u32 = 800;
const HEIGHT: u32 = 500;

/// Point marker drawn on top of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Filled circle.
    Circle,
    /// Filled square.
    Square,
    /// Filled triangle.
    Triangle,
    /// Diagonal cross.
    Cross,
}

/// Color and marker of one line.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    /// Line and marker color.
    pub color: RGBColor,
    /// Point marker.
    pub marker: Marker,
}

impl Style {
    /// Creates a new `Style`.
    pub const fn new(color: RGBColor, marker: Marker) -> Self {
        Style {
            color: color,
            marker: marker,
        }
    }
}

/// One labelled series of (x, y) points.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Legend entry.
    pub label: String,
    /// Points in x order.
    pub points: Vec<(f64, f64)>,
}

/// Where the legend goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Legend {
    /// Top left corner.
    UpperLeft,
    /// Top right corner.
    UpperRight,
}

/// An x axis from `start` to `end` with evenly spaced labels every `step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ticks {
    /// First label.
    pub start: f64,
    /// Last label.
    pub end: f64,
    /// Label spacing.
    pub step: f64,
}

impl Ticks {
    /// Number of labels.
    pub fn count(&self) -> usize {
        if self.step <= 0.0 || self.end <= self.start {
            return 1;
        }
        ((self.end - self.start) / self.step).round() as usize + 1
    }
}

/// Everything about a chart except its data.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// Caption.
    pub title: String,
    /// X axis description.
    pub x_desc: String,
    /// Y axis description.
    pub y_desc: String,
    /// X axis range and labels.
    pub x_ticks: Ticks,
    /// Legend position.
    pub legend: Legend,
}

/// Creates `dir` if needed and returns `dir/file_name`.
pub fn output_path<P: AsRef<Path>>(dir: P, file_name: &str) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).chain_err(|| format!("failed to create {}", dir.display()))?;
    Ok(dir.join(file_name))
}

/// Upper end of the y axis: 10% headroom over the largest value.
pub fn y_ceiling(lines: &[Line]) -> f64 {
    let max = lines
        .iter()
        .flat_map(|l| l.points.iter().map(|p| p.1))
        .fold(0.0f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Renders `lines` with `styles` (cycled) to an SVG file at `path`. Lines
/// without points are left out. Returns `false` without touching the file
/// system when there is nothing to draw.
pub fn render<P: AsRef<Path>>(path: P, spec: &ChartSpec, lines: &[Line], styles: &[Style]) -> Result<bool> {
    let lines = lines
        .iter()
        .filter(|l| !l.points.is_empty())
        .cloned()
        .collect::<Vec<Line>>();
    if lines.is_empty() || styles.is_empty() {
        debug!("nothing to draw for {}", spec.title);
        return Ok(false);
    }

    let root = SVGBackend::new(path.as_ref(), (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(spec.x_ticks.start..spec.x_ticks.end, 0f64..y_ceiling(&lines))
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_labels(spec.x_ticks.count())
        .x_desc(spec.x_desc.as_str())
        .y_desc(spec.y_desc.as_str())
        .draw()
        .map_err(plot_error)?;

    for (i, line) in lines.iter().enumerate() {
        let style = styles[i % styles.len()];
        let color = style.color;

        chart
            .draw_series(LineSeries::new(line.points.iter().cloned(), color.stroke_width(2)))
            .map_err(plot_error)?
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        let filled = color.filled();
        let points = line.points.iter().cloned();
        let drawn = match style.marker {
            Marker::Circle => chart
                .draw_series(points.map(|p| Circle::new(p, 4, filled)))
                .map(|_| ()),
            Marker::Square => chart
                .draw_series(points.map(|p| EmptyElement::at(p) + Rectangle::new([(-4, -4), (4, 4)], filled)))
                .map(|_| ()),
            Marker::Triangle => chart
                .draw_series(points.map(|p| TriangleMarker::new(p, 5, filled)))
                .map(|_| ()),
            Marker::Cross => chart
                .draw_series(points.map(|p| Cross::new(p, 4, color.stroke_width(2))))
                .map(|_| ()),
        };
        drawn.map_err(plot_error)?;
    }

    let position = match spec.legend {
        Legend::UpperLeft => SeriesLabelPosition::UpperLeft,
        Legend::UpperRight => SeriesLabelPosition::UpperRight,
    };
    chart
        .configure_series_labels()
        .position(position)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    info!("wrote {}", path.as_ref().display());
    Ok(true)
}
