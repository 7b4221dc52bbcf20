//! 2D XY charts drawn inside a renderer's viewport.

use std::rc::Rc;

use vizkit_engine::coords::{Rect, Vec2};
use vizkit_engine::paint::Color;
use vizkit_engine::scene::{MeshCmd, MeshVertex};

use crate::colors::{Rgb, Rgba};
use crate::error::{Result, VizError};
use crate::painter::Painter;
use crate::text::{FontFamily, FontKey};

// ── table ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<f32>,
}

/// Named `f32` columns of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a zero-filled column and returns its index.
    pub fn add_column(&mut self, name: impl Into<String>) -> usize {
        self.columns.push(Column { name: name.into(), values: vec![0.0; self.rows] });
        self.columns.len() - 1
    }

    pub fn number_of_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn number_of_rows(&self) -> usize {
        self.rows
    }

    /// Grows (zero-filled) or truncates every column to `rows`.
    pub fn set_number_of_rows(&mut self, rows: usize) {
        self.rows = rows;
        for c in &mut self.columns {
            c.values.resize(rows, 0.0);
        }
    }

    pub fn set_value(&mut self, row: usize, column: usize, value: f32) -> Result<()> {
        let len = self.columns.len();
        let col = self
            .columns
            .get_mut(column)
            .ok_or(VizError::OutOfRange { index: column, len })?;
        let rows = col.values.len();
        let slot = col.values.get_mut(row).ok_or(VizError::OutOfRange { index: row, len: rows })?;
        *slot = value;
        Ok(())
    }

    pub fn value(&self, row: usize, column: usize) -> Option<f32> {
        self.columns.get(column)?.values.get(row).copied()
    }

    pub fn column(&self, column: usize) -> Option<&[f32]> {
        self.columns.get(column).map(|c| c.values.as_slice())
    }

    pub fn column_name(&self, column: usize) -> Option<&str> {
        self.columns.get(column).map(|c| c.name.as_str())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

// ── plots ─────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum MarkerStyle {
    Cross,
    Plus,
    Square,
    #[default]
    Circle,
    Diamond,
}

/// Scatter plot of two table columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoints {
    table: Rc<Table>,
    x_column: usize,
    y_column: usize,
    /// Straight-alpha sRGB.
    pub color: Rgba,
    /// Marker stroke width in logical pixels.
    pub width: f32,
    pub marker: MarkerStyle,
    /// Marker extent in logical pixels; derived from `width` when unset.
    pub marker_size: Option<f32>,
}

impl PlotPoints {
    pub fn new(table: Rc<Table>, x_column: usize, y_column: usize) -> Self {
        Self {
            table,
            x_column,
            y_column,
            color: [0.0, 0.0, 0.0, 1.0],
            width: 1.0,
            marker: MarkerStyle::default(),
            marker_size: None,
        }
    }

    pub fn set_input_data(&mut self, table: Rc<Table>, x_column: usize, y_column: usize) {
        self.table = table;
        self.x_column = x_column;
        self.y_column = y_column;
    }

    /// Finite `(x, y)` pairs; missing columns give none.
    pub fn points(&self) -> Vec<(f64, f64)> {
        let (Some(xs), Some(ys)) = (self.table.column(self.x_column), self.table.column(self.y_column)) else {
            return Vec::new();
        };
        xs.iter()
            .zip(ys)
            .map(|(x, y)| (f64::from(*x), f64::from(*y)))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect()
    }

    fn effective_marker_size(&self) -> f32 {
        self.marker_size.unwrap_or((self.width * 2.3).max(8.0))
    }
}

// ── axes ──────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AxisLocation {
    Bottom,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub location: AxisLocation,
    pub title: String,
    /// Straight-alpha sRGB.
    pub grid_color: Rgba,
    pub grid_visible: bool,
    /// Fixed `(min, max)`; `None` fits the data with nice bounds.
    pub range: Option<(f64, f64)>,
}

impl Axis {
    pub fn new(location: AxisLocation) -> Self {
        Self {
            location,
            title: String::new(),
            grid_color: [242.0 / 255.0, 242.0 / 255.0, 242.0 / 255.0, 1.0],
            grid_visible: true,
            range: None,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_range(&mut self, min: f64, max: f64) {
        self.range = Some((min.min(max), min.max(max)));
    }

    fn ticks(&self, data: Option<(f64, f64)>) -> Ticks {
        match self.range {
            Some((lo, hi)) if hi > lo => Ticks { lo, hi, step: nice_step(hi - lo) },
            _ => {
                let (lo, hi) = data.unwrap_or((0.0, 1.0));
                Ticks::fit(lo, hi)
            }
        }
    }
}

const TARGET_TICKS: f64 = 5.0;

/// 1, 2 or 5 × 10ⁿ, close to a fifth of `span`.
pub(crate) fn nice_step(span: f64) -> f64 {
    if span <= 0.0 || !span.is_finite() {
        return 1.0;
    }
    let raw = span / TARGET_TICKS;
    let mag = 10f64.powf(raw.log10().floor());
    let norm = raw / mag;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * mag
}

/// Axis bounds and tick spacing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct Ticks {
    pub lo: f64,
    pub hi: f64,
    pub step: f64,
}

impl Ticks {
    /// Extends `[min, max]` outwards to multiples of a nice step.
    pub(crate) fn fit(min: f64, max: f64) -> Ticks {
        let (mut min, mut max) = (min, max);
        if !min.is_finite() || !max.is_finite() {
            (min, max) = (0.0, 1.0);
        }
        if max - min < 1e-12 {
            min -= 0.5;
            max += 0.5;
        }
        let step = nice_step(max - min);
        Ticks { lo: (min / step).floor() * step, hi: (max / step).ceil() * step, step }
    }

    pub(crate) fn values(&self) -> Vec<f64> {
        let eps = self.step * 1e-6;
        let mut out = Vec::new();
        let mut k = (self.lo / self.step - 1e-6).ceil();
        loop {
            let v = k * self.step;
            if v > self.hi + eps {
                break;
            }
            out.push(if v.abs() < eps { 0.0 } else { v });
            k += 1.0;
        }
        out
    }

    fn label(&self, v: f64) -> String {
        let decimals = if self.step >= 1.0 { 0 } else { (-self.step.log10().floor()) as usize };
        format!("{v:.decimals$}")
    }

    fn fraction(&self, v: f64) -> f64 {
        (v - self.lo) / (self.hi - self.lo)
    }
}

// ── chart ─────────────────────────────────────────────────────────────────

const MARGIN_LEFT: f32 = 56.0;
const MARGIN_RIGHT: f32 = 16.0;
const MARGIN_TOP: f32 = 32.0;
const MARGIN_BOTTOM: f32 = 44.0;
const LABEL_SIZE: f32 = 12.0;
const TITLE_SIZE: f32 = 15.0;

/// Chart with a bottom and a left axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartXY {
    pub title: String,
    bottom: Axis,
    left: Axis,
    /// Plot-area fill, straight-alpha sRGB.
    pub background: Rgba,
    plots: Vec<PlotPoints>,
    pub visibility: bool,
}

impl Default for ChartXY {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a chart's parts land inside its viewport.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct ChartLayout {
    pub plot_area: Rect,
    pub x: Ticks,
    pub y: Ticks,
}

impl ChartLayout {
    pub(crate) fn to_display(&self, x: f64, y: f64) -> Vec2 {
        let a = self.plot_area;
        Vec2::new(
            a.origin.x + (self.x.fraction(x) as f32) * a.size.x,
            a.origin.y + a.size.y - (self.y.fraction(y) as f32) * a.size.y,
        )
    }
}

impl ChartXY {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            bottom: Axis::new(AxisLocation::Bottom),
            left: Axis::new(AxisLocation::Left),
            background: [1.0, 1.0, 1.0, 0.0],
            plots: Vec::new(),
            visibility: true,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn axis(&self, location: AxisLocation) -> &Axis {
        match location {
            AxisLocation::Bottom => &self.bottom,
            AxisLocation::Left => &self.left,
        }
    }

    pub fn axis_mut(&mut self, location: AxisLocation) -> &mut Axis {
        match location {
            AxisLocation::Bottom => &mut self.bottom,
            AxisLocation::Left => &mut self.left,
        }
    }

    pub fn set_background_brush(&mut self, color: Rgb, opacity: f64) {
        let [r, g, b] = color;
        self.background = [r, g, b, opacity.clamp(0.0, 1.0)];
    }

    /// Adds a plot and returns its index.
    pub fn add_plot(&mut self, plot: PlotPoints) -> usize {
        self.plots.push(plot);
        self.plots.len() - 1
    }

    pub fn plot_mut(&mut self, index: usize) -> Option<&mut PlotPoints> {
        self.plots.get_mut(index)
    }

    pub fn plots(&self) -> &[PlotPoints] {
        &self.plots
    }

    fn data_range(&self) -> (Option<(f64, f64)>, Option<(f64, f64)>) {
        let grow = |acc: Option<(f64, f64)>, v: f64| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        };
        let mut xr = None;
        let mut yr = None;
        for (x, y) in self.plots.iter().flat_map(PlotPoints::points) {
            xr = grow(xr, x);
            yr = grow(yr, y);
        }
        (xr, yr)
    }

    pub(crate) fn layout(&self, viewport: Rect) -> Option<ChartLayout> {
        let area = Rect::new(
            viewport.origin.x + MARGIN_LEFT,
            viewport.origin.y + MARGIN_TOP,
            viewport.size.x - MARGIN_LEFT - MARGIN_RIGHT,
            viewport.size.y - MARGIN_TOP - MARGIN_BOTTOM,
        );
        if area.is_empty() {
            return None;
        }
        let (xr, yr) = self.data_range();
        Some(ChartLayout { plot_area: area, x: self.bottom.ticks(xr), y: self.left.ticks(yr) })
    }

    pub(crate) fn paint(&self, painter: &mut Painter<'_>, viewport: Rect) {
        if !self.visibility {
            return;
        }
        let label_font = painter.font(FontKey::regular(FontFamily::Arial));
        let title_font = painter.font(FontKey { family: FontFamily::Arial, bold: true, italic: false });

        if let (Some(font), false) = (title_font, self.title.is_empty()) {
            let ext = painter.measure_text(&self.title, font, TITLE_SIZE);
            let origin = Vec2::new(viewport.origin.x + (viewport.size.x - ext.width) * 0.5, viewport.origin.y + 6.0);
            painter.text(&self.title, font, TITLE_SIZE, Color::BLACK, origin);
        }

        let Some(layout) = self.layout(viewport) else {
            return;
        };
        let area = layout.plot_area;
        let (left, top) = (area.origin.x, area.origin.y);
        let (right, bottom) = (area.right(), area.bottom());

        painter.fill_rect(area, rgba_color(self.background));

        for v in layout.x.values() {
            let x = layout.to_display(v, layout.y.lo).x;
            if self.bottom.grid_visible {
                painter.line(Vec2::new(x, top), Vec2::new(x, bottom), 1.0, rgba_color(self.bottom.grid_color));
            }
            if let Some(font) = label_font {
                let label = layout.x.label(v);
                let ext = painter.measure_text(&label, font, LABEL_SIZE);
                painter.text(&label, font, LABEL_SIZE, Color::BLACK, Vec2::new(x - ext.width * 0.5, bottom + 4.0));
            }
        }
        for v in layout.y.values() {
            let y = layout.to_display(layout.x.lo, v).y;
            if self.left.grid_visible {
                painter.line(Vec2::new(left, y), Vec2::new(right, y), 1.0, rgba_color(self.left.grid_color));
            }
            if let Some(font) = label_font {
                let label = layout.y.label(v);
                let ext = painter.measure_text(&label, font, LABEL_SIZE);
                let origin = Vec2::new(left - 4.0 - ext.width, y - ext.height * 0.5);
                painter.text(&label, font, LABEL_SIZE, Color::BLACK, origin);
            }
        }

        painter.line(Vec2::new(left, bottom), Vec2::new(right, bottom), 1.0, Color::BLACK);
        painter.line(Vec2::new(left, top), Vec2::new(left, bottom), 1.0, Color::BLACK);

        if let Some(font) = title_font {
            if !self.bottom.title.is_empty() {
                let ext = painter.measure_text(&self.bottom.title, font, LABEL_SIZE);
                let origin = Vec2::new(left + (area.size.x - ext.width) * 0.5, bottom + 6.0 + LABEL_SIZE);
                painter.text(&self.bottom.title, font, LABEL_SIZE, Color::BLACK, origin);
            }
            if !self.left.title.is_empty() {
                let ext = painter.measure_text(&self.left.title, font, LABEL_SIZE);
                let origin = Vec2::new(viewport.origin.x + 4.0, top - ext.height - 2.0);
                painter.text(&self.left.title, font, LABEL_SIZE, Color::BLACK, origin);
            }
        }

        painter.push_clip(area);
        for plot in &self.plots {
            paint_markers(painter, &layout, plot);
        }
        painter.pop_clip();
    }
}

fn paint_markers(painter: &mut Painter<'_>, layout: &ChartLayout, plot: &PlotPoints) {
    let color = rgba_color(plot.color);
    let h = plot.effective_marker_size() * 0.5;
    let w = plot.width.max(1.0);
    let mut diamonds = MeshCmd::default();
    for (x, y) in plot.points() {
        let c = layout.to_display(x, y);
        match plot.marker {
            MarkerStyle::Cross => {
                painter.line(Vec2::new(c.x - h, c.y - h), Vec2::new(c.x + h, c.y + h), w, color);
                painter.line(Vec2::new(c.x - h, c.y + h), Vec2::new(c.x + h, c.y - h), w, color);
            }
            MarkerStyle::Plus => {
                painter.line(Vec2::new(c.x - h, c.y), Vec2::new(c.x + h, c.y), w, color);
                painter.line(Vec2::new(c.x, c.y - h), Vec2::new(c.x, c.y + h), w, color);
            }
            MarkerStyle::Square => painter.fill_rect(Rect::new(c.x - h, c.y - h, 2.0 * h, 2.0 * h), color),
            MarkerStyle::Circle => painter.circle(c, h, color, None),
            MarkerStyle::Diamond => {
                let v = |dx: f32, dy: f32| MeshVertex { pos: [c.x + dx, c.y + dy], color: color.to_array() };
                diamonds.push_triangle(v(0.0, -h), v(h, 0.0), v(0.0, h));
                diamonds.push_triangle(v(0.0, -h), v(0.0, h), v(-h, 0.0));
            }
        }
    }
    painter.mesh(diamonds);
}

fn rgba_color([r, g, b, a]: Rgba) -> Color {
    Color::from_srgb(r as f32, g as f32, b as f32, a as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trig_table() -> Rc<Table> {
        let mut t = Table::new();
        t.add_column("X Axis");
        t.add_column("Cosine");
        t.add_column("Sine");
        let n = 40;
        t.set_number_of_rows(n);
        let inc = 7.5 / (n - 1) as f32;
        for i in 0..n {
            let x = i as f32 * inc;
            t.set_value(i, 0, x).unwrap();
            t.set_value(i, 1, x.cos()).unwrap();
            t.set_value(i, 2, x.sin()).unwrap();
        }
        Rc::new(t)
    }

    #[test]
    fn table_rows_and_bounds() {
        let mut t = Table::new();
        t.add_column("a");
        t.set_number_of_rows(2);
        let b = t.add_column("b");
        assert_eq!(t.column(b).map(|c| c.len()), Some(2));
        assert!(t.set_value(1, b, 3.0).is_ok());
        assert_eq!(t.value(1, b), Some(3.0));
        assert!(matches!(t.set_value(2, b, 0.0), Err(VizError::OutOfRange { index: 2, len: 2 })));
        assert!(matches!(t.set_value(0, 5, 0.0), Err(VizError::OutOfRange { index: 5, len: 2 })));
        assert_eq!(t.column_index("b"), Some(1));
        assert_eq!(t.column_name(0), Some("a"));
    }

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(7.5), 2.0);
        assert!((nice_step(2.0) - 0.5).abs() < 1e-12);
        assert_eq!(nice_step(100.0), 20.0);
        assert_eq!(nice_step(0.0), 1.0);
    }

    #[test]
    fn fit_extends_to_whole_steps() {
        let t = Ticks::fit(0.0, 7.5);
        assert_eq!((t.lo, t.hi, t.step), (0.0, 8.0, 2.0));
        assert_eq!(t.values(), vec![0.0, 2.0, 4.0, 6.0, 8.0]);

        let t = Ticks::fit(-0.99, 0.99);
        assert_eq!(t.values().len(), 5);
        assert_eq!(t.label(-0.5), "-0.5");
        assert_eq!(t.label(0.0), "0.0");
    }

    #[test]
    fn flat_data_gets_a_unit_range() {
        let t = Ticks::fit(3.0, 3.0);
        assert!(t.lo < 3.0 && t.hi > 3.0);
    }

    #[test]
    fn plot_reads_its_columns() {
        let table = trig_table();
        let plot = PlotPoints::new(table.clone(), 0, 2);
        let pts = plot.points();
        assert_eq!(pts.len(), 40);
        assert_eq!(pts[0], (0.0, 0.0));
        assert!((pts[39].0 - 7.5).abs() < 1e-5);

        let missing = PlotPoints::new(table, 0, 9);
        assert!(missing.points().is_empty());
    }

    #[test]
    fn layout_maps_data_into_plot_area() {
        let mut chart = ChartXY::new();
        chart.add_plot(PlotPoints::new(trig_table(), 0, 1));
        let vp = Rect::new(0.0, 0.0, 320.0, 240.0);
        let layout = chart.layout(vp).unwrap();
        let a = layout.plot_area;

        let bl = layout.to_display(layout.x.lo, layout.y.lo);
        assert_eq!(bl, Vec2::new(a.origin.x, a.origin.y + a.size.y));
        let tr = layout.to_display(layout.x.hi, layout.y.hi);
        assert_eq!(tr, Vec2::new(a.origin.x + a.size.x, a.origin.y));
    }

    #[test]
    fn tiny_viewport_has_no_plot_area() {
        let chart = ChartXY::new();
        assert!(chart.layout(Rect::new(0.0, 0.0, 40.0, 40.0)).is_none());
    }

    #[test]
    fn explicit_range_is_kept() {
        let mut axis = Axis::new(AxisLocation::Bottom);
        axis.set_range(5.0, -5.0);
        let t = axis.ticks(Some((0.0, 1.0)));
        assert_eq!((t.lo, t.hi), (-5.0, 5.0));
    }

    #[test]
    fn brush_opacity_is_stored_as_alpha() {
        let mut chart = ChartXY::new();
        chart.set_background_brush([1.0, 0.5, 0.0], 0.4);
        assert_eq!(chart.background, [1.0, 0.5, 0.0, 0.4]);
    }
}
