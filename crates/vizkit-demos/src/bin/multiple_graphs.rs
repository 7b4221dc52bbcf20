//! Cosine and sine scatter plots in two side-by-side viewports.

use std::rc::Rc;

use anyhow::Context;
use vizkit::{
    AxisLocation, ChartXY, MarkerStyle, NamedColors, PlotPoints, RenderWindow, RenderWindowInteractor, Renderer,
    Table,
};
use vizkit_engine::logging::{init_logging, LoggingConfig};

const GRID: [u32; 2] = [2, 1];
const RENDERER_SIZE: [u32; 2] = [320, 240];
const NUM_POINTS: usize = 40;

/// `(xmin, ymin, xmax, ymax)` for each cell, row-major from the top-left.
fn viewports() -> Vec<[f64; 4]> {
    let [nx, ny] = GRID.map(f64::from);
    let mut out = Vec::new();
    for row in 0..GRID[1] {
        for col in 0..GRID[0] {
            let (row, col) = (f64::from(row), f64::from(col));
            out.push([col / nx, (ny - (row + 1.0)) / ny, (col + 1.0) / nx, (ny - row) / ny]);
        }
    }
    out
}

fn sample_table() -> anyhow::Result<Table> {
    let mut table = Table::new();
    table.add_column("X Axis");
    table.add_column("Cosine");
    table.add_column("Sine");
    table.set_number_of_rows(NUM_POINTS);
    let inc = 7.5 / (NUM_POINTS as f32 - 1.0);
    for i in 0..NUM_POINTS {
        let x = i as f32 * inc;
        table.set_value(i, 0, x)?;
        table.set_value(i, 1, x.cos())?;
        table.set_value(i, 2, x.sin())?;
    }
    Ok(table)
}

struct ChartStyle<'a> {
    title: &'a str,
    y_title: &'a str,
    grid: &'a str,
    brush: &'a str,
    column: usize,
    marker: MarkerStyle,
}

fn chart(colors: &NamedColors, table: &Rc<Table>, style: ChartStyle<'_>) -> vizkit::Result<ChartXY> {
    let mut chart = ChartXY::new();
    let grid = colors.color4d(style.grid)?;
    for (location, title) in [(AxisLocation::Bottom, "x"), (AxisLocation::Left, style.y_title)] {
        let axis = chart.axis_mut(location);
        axis.grid_color = grid;
        axis.set_title(title);
    }
    let [r, g, b, _] = colors.color4d(style.brush)?;
    chart.set_background_brush([r, g, b], 0.4);
    chart.set_title(style.title);

    let mut points = PlotPoints::new(Rc::clone(table), 0, style.column);
    points.color = colors.color4d("Black")?;
    points.width = 1.0;
    points.marker = style.marker;
    chart.add_plot(points);
    Ok(chart)
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());
    let colors = NamedColors::new();

    let mut window = RenderWindow::new();
    window.set_window_name("MultipleGraphs");
    window.set_size(RENDERER_SIZE[0] * GRID[0], RENDERER_SIZE[1] * GRID[1]);
    println!("{} {}", RENDERER_SIZE[0] * GRID[0], GRID[1] * GRID[1]);

    let table = Rc::new(sample_table()?);
    let viewports = viewports();

    let specs = [
        (
            "AliceBlue",
            ChartStyle {
                title: "Cosine",
                y_title: "cos(x)",
                grid: "LightGrey",
                brush: "MistyRose",
                column: 1,
                marker: MarkerStyle::Cross,
            },
        ),
        (
            "Lavender",
            ChartStyle {
                title: "Sine",
                y_title: "sin(x)",
                grid: "LightCyan",
                brush: "Thistle",
                column: 2,
                marker: MarkerStyle::Plus,
            },
        ),
    ];
    for ((background, style), viewport) in specs.into_iter().zip(viewports) {
        let mut renderer = Renderer::new();
        renderer.set_background(colors.color3d(background)?);
        renderer.set_viewport(viewport);
        renderer.add_chart(chart(&colors, &table, style)?);
        window.add_renderer(renderer);
    }

    let mut interactor = RenderWindowInteractor::new(window);
    interactor.render_window_mut().render();
    interactor.initialize();
    interactor.start().context("event loop failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_splits_window_in_halves() {
        assert_eq!(viewports(), vec![[0.0, 0.0, 0.5, 1.0], [0.5, 0.0, 1.0, 1.0]]);
    }

    #[test]
    fn table_spans_zero_to_seven_and_a_half() {
        let table = sample_table().unwrap();
        assert_eq!(table.number_of_rows(), NUM_POINTS);
        assert_eq!(table.value(0, 1), Some(1.0));
        let last = table.value(NUM_POINTS - 1, 0).unwrap();
        assert!((last - 7.5).abs() < 1e-5);
    }
}
