use eframe::egui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points, Polygon};
use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use crate::backend::chart::{ChartData, ChartSpec};
use crate::backend::insights::ChartKind;

const PIE_SEGMENTS: usize = 96;

/// Draws a shaped chart and returns the screen rectangle it occupies.
pub fn show(ui: &mut egui::Ui, chart: &ChartSpec) -> egui::Rect {
    ui.heading(&chart.title);

    match &chart.data {
        ChartData::Proportion { labels, data } => show_pie(ui, labels, data),
        ChartData::Axis { labels, datasets } => {
            let tick_labels = labels.clone();
            let plot = Plot::new("axis_chart")
                .legend(Legend::default())
                .x_axis_label(chart.x_label.as_str())
                .y_axis_label(chart.y_label.as_str())
                .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                    category_tick(&tick_labels, mark.value)
                });

            plot.show(ui, |plot_ui| {
                for series in datasets {
                    if chart.kind == ChartKind::Line {
                        let points: Vec<[f64; 2]> = series
                            .data
                            .iter()
                            .enumerate()
                            .map(|(i, v)| [i as f64, *v])
                            .collect();
                        plot_ui.line(Line::new(series.label.as_str(), PlotPoints::new(points)));
                    } else {
                        let bars = series
                            .data
                            .iter()
                            .enumerate()
                            .map(|(i, v)| {
                                let name = labels.get(i).cloned().unwrap_or_default();
                                Bar::new(i as f64, *v).width(0.7).name(name)
                            })
                            .collect();
                        plot_ui.bar_chart(BarChart::new(series.label.as_str(), bars));
                    }
                }
            })
            .response
            .rect
        }
        ChartData::Scatter { datasets } => Plot::new("scatter_chart")
            .legend(Legend::default())
            .x_axis_label(chart.x_label.as_str())
            .y_axis_label(chart.y_label.as_str())
            .show(ui, |plot_ui| {
                for series in datasets {
                    let points: Vec<[f64; 2]> = series.data.iter().map(|p| [p.x, p.y]).collect();
                    plot_ui.points(
                        Points::new(series.label.as_str(), PlotPoints::new(points)).radius(3.0),
                    );
                }
            })
            .response
            .rect,
    }
}

/// Only whole-number ticks inside the label range get a category name.
fn category_tick(labels: &[String], value: f64) -> String {
    if value < 0.0 || value.fract() != 0.0 {
        return String::new();
    }
    labels.get(value as usize).cloned().unwrap_or_default()
}

fn show_pie(ui: &mut egui::Ui, labels: &[String], data: &[f64]) -> egui::Rect {
    let total: f64 = data.iter().filter(|v| **v > 0.0).sum();

    Plot::new("pie_chart")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            if total <= 0.0 {
                return;
            }
            let mut start = 0.0;
            for (i, value) in data.iter().enumerate() {
                if *value <= 0.0 {
                    continue;
                }
                let sweep = value / total * TAU;
                let label = labels.get(i).map(String::as_str).unwrap_or_default();
                plot_ui.polygon(Polygon::new(label, PlotPoints::new(wedge(start, sweep))));
                start += sweep;
            }
        })
        .response
        .rect
}

fn wedge(start: f64, sweep: f64) -> Vec<[f64; 2]> {
    let steps = ((sweep / TAU) * PIE_SEGMENTS as f64).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for step in 0..=steps {
        let angle = start + sweep * step as f64 / steps as f64;
        // Clockwise from twelve o'clock.
        points.push([angle.sin(), angle.cos()]);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tick() {
        let labels = vec!["A".to_string(), "B".to_string()];
        assert_eq!(category_tick(&labels, 1.0), "B");
        assert_eq!(category_tick(&labels, 0.5), "");
        assert_eq!(category_tick(&labels, -1.0), "");
        assert_eq!(category_tick(&labels, 5.0), "");
    }

    #[test]
    fn test_wedge_closes_on_centre() {
        let points = wedge(0.0, TAU / 4.0);
        assert_eq!(points[0], [0.0, 0.0]);
        let first = points[1];
        let last = points[points.len() - 1];
        assert!((first[1] - 1.0).abs() < 1e-12);
        assert!((last[0] - 1.0).abs() < 1e-12);
    }
}
