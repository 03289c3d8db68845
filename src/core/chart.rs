//! Chart geometry and the hover tooltip
//!
//! Points are laid out on a grid of terminal cells: the horizontal axis is
//! the observation index (one slot per date), the vertical axis the rate.
//! Hit-testing works in cells so it matches what the user sees.

use crate::core::timeseries::TimeSeries;

/// Pointer distance, in cells, within which a point counts as hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerance {
    pub columns: u16,
    pub rows: u16,
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance {
            columns: 1,
            rows: 1,
        }
    }
}

/// Screen rectangle the line is plotted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlotArea {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl PlotArea {
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && row >= self.y
            && u32::from(column) < u32::from(self.x) + u32::from(self.width)
            && u32::from(row) < u32::from(self.y) + u32::from(self.height)
    }
}

/// A rendered series with the bounds it was drawn with.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    series: TimeSeries,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl ChartModel {
    pub fn new(series: TimeSeries) -> Self {
        let x_max = series.len().saturating_sub(1).max(1) as f64;
        let y_bounds = match series.rate_bounds() {
            Some((lo, hi)) if hi > lo => {
                let pad = (hi - lo) * 0.05;
                [lo - pad, hi + pad]
            }
            Some((lo, _)) => {
                let pad = (lo.abs() * 0.01).max(0.001);
                [lo - pad, lo + pad]
            }
            None => [0.0, 1.0],
        };
        ChartModel {
            series,
            x_bounds: [0.0, x_max],
            y_bounds,
        }
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        self.x_bounds
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        self.y_bounds
    }

    /// Data coordinates as plotted: (index, rate).
    pub fn data(&self) -> Vec<(f64, f64)> {
        self.series
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.rate))
            .collect()
    }

    /// Cell a data point lands on inside `area`.
    pub fn project(&self, index: usize, area: &PlotArea) -> Option<(u16, u16)> {
        let point = self.series.get(index)?;
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let fx = (index as f64 - self.x_bounds[0]) / (self.x_bounds[1] - self.x_bounds[0]);
        let fy = (point.rate - self.y_bounds[0]) / (self.y_bounds[1] - self.y_bounds[0]);
        // same truncation the terminal canvas applies when painting
        let col = area.x + (fx * f64::from(area.width - 1)) as u16;
        let row = area.y + ((1.0 - fy) * f64::from(area.height - 1)) as u16;
        Some((col, row))
    }

    /// Index of the point nearest to the pointer, if one lies within
    /// `tolerance` of it.
    pub fn hit_test(
        &self,
        column: u16,
        row: u16,
        area: &PlotArea,
        tolerance: Tolerance,
    ) -> Option<usize> {
        (0..self.series.len())
            .filter_map(|i| self.project(i, area).map(|cell| (i, cell)))
            .filter(|(_, (c, r))| {
                c.abs_diff(column) <= tolerance.columns && r.abs_diff(row) <= tolerance.rows
            })
            .min_by_key(|(_, (c, r))| {
                let dc = u32::from(c.abs_diff(column));
                let dr = u32::from(r.abs_diff(row));
                dc * dc + dr * dr
            })
            .map(|(i, _)| i)
    }
}

/// Whether a pointer event requires the chart to be drawn again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Needed,
    Skip,
}

/// Single reusable annotation attached to the chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Tooltip {
    #[default]
    Hidden,
    Showing {
        index: usize,
        anchor: (u16, u16),
        text: String,
    },
}

impl Tooltip {
    pub fn is_visible(&self) -> bool {
        matches!(self, Tooltip::Showing { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Tooltip::Showing { text, .. } => Some(text),
            Tooltip::Hidden => None,
        }
    }

    pub fn hide(&mut self) {
        *self = Tooltip::Hidden;
    }

    /// Applies one pointer movement. Pointer positions outside `area` never
    /// change the tooltip.
    pub fn on_pointer_move(
        &mut self,
        chart: &ChartModel,
        area: &PlotArea,
        column: u16,
        row: u16,
        tolerance: Tolerance,
    ) -> Redraw {
        if !area.contains(column, row) {
            return Redraw::Skip;
        }

        match chart.hit_test(column, row, area, tolerance) {
            Some(index) => {
                if matches!(self, Tooltip::Showing { index: current, .. } if *current == index) {
                    return Redraw::Skip;
                }
                let (Some(point), Some(anchor)) =
                    (chart.series().get(index), chart.project(index, area))
                else {
                    return Redraw::Skip;
                };
                *self = Tooltip::Showing {
                    index,
                    anchor,
                    text: point.label(),
                };
                Redraw::Needed
            }
            None if self.is_visible() => {
                self.hide();
                Redraw::Needed
            }
            None => Redraw::Skip,
        }
    }
}
