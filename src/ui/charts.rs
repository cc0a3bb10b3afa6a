use eframe::egui::{Align2, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::ChartPalette;
use crate::data::aggregate::AggregateRow;
use crate::data::stats::LinearFit;

const CHART_HEIGHT: f32 = 280.0;

/// Titles and axis labels of one chart.
pub struct ChartLabels<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub x: &'a str,
    pub y: &'a str,
}

// ---------------------------------------------------------------------------
// Bar chart
// ---------------------------------------------------------------------------

/// One bar per aggregate row with its truncated value printed on top.
/// The tallest bar is highlighted.
pub fn bar_chart(ui: &mut Ui, labels: &ChartLabels<'_>, rows: &[AggregateRow], palette: &ChartPalette) {
    ui.label(RichText::new(labels.title).strong());
    if rows.is_empty() {
        ui.weak("Nothing to plot.");
        return;
    }

    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
    let colors = palette.highlight_max(&values);

    let mut bars = Vec::with_capacity(rows.len());
    let mut tops = Vec::with_capacity(rows.len());
    for (row, color) in rows.iter().zip(colors) {
        let Some(x) = row.key.as_f64() else {
            continue;
        };
        bars.push(
            Bar::new(x, row.value)
                .width(0.7)
                .fill(color)
                .name(row.key.to_string()),
        );
        tops.push(PlotPoint::new(x, row.value));
    }

    Plot::new(labels.id)
        .height(CHART_HEIGHT)
        .x_axis_label(labels.x)
        .y_axis_label(labels.y)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
            for top in tops {
                let label = format!("{}", top.y.trunc() as i64);
                plot_ui.text(Text::new(top, label).anchor(Align2::CENTER_BOTTOM));
            }
        });
}

// ---------------------------------------------------------------------------
// Regression plot
// ---------------------------------------------------------------------------

/// Scatter of `points` with the least-squares line drawn across their x range.
pub fn regression_plot(
    ui: &mut Ui,
    labels: &ChartLabels<'_>,
    points: Vec<[f64; 2]>,
    palette: &ChartPalette,
) {
    ui.label(RichText::new(labels.title).strong());
    if points.is_empty() {
        ui.weak("Nothing to plot.");
        return;
    }

    let fit = LinearFit::least_squares(&points);
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p[0]), hi.max(p[0]))
        });

    Plot::new(labels.id)
        .height(CHART_HEIGHT)
        .x_axis_label(labels.x)
        .y_axis_label(labels.y)
        .allow_scroll(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .radius(2.5)
                    .color(palette.scatter)
                    .name("observed"),
            );
            if let Some(fit) = fit {
                let line = vec![[lo, fit.at(lo)], [hi, fit.at(hi)]];
                plot_ui.line(
                    Line::new(PlotPoints::from(line))
                        .color(palette.fit_line)
                        .width(2.0)
                        .name(format!("y = {:.1}x + {:.1}", fit.slope, fit.intercept)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Line plot
// ---------------------------------------------------------------------------

/// Aggregate rows joined by a line, with a marker at every key.
pub fn line_plot(ui: &mut Ui, labels: &ChartLabels<'_>, rows: &[AggregateRow], palette: &ChartPalette) {
    ui.label(RichText::new(labels.title).strong());
    let points: Vec<[f64; 2]> = rows
        .iter()
        .filter_map(|r| Some([r.key.as_f64()?, r.value]))
        .collect();
    if points.is_empty() {
        ui.weak("Nothing to plot.");
        return;
    }

    let color = palette.accent_dark();
    Plot::new(labels.id)
        .height(CHART_HEIGHT)
        .x_axis_label(labels.x)
        .y_axis_label(labels.y)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(PlotPoints::from(points.clone())).color(color).width(1.5));
            plot_ui.points(Points::new(PlotPoints::from(points)).radius(3.0).color(color));
        });
}
