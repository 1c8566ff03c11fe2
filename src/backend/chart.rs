use serde::Serialize;

use super::dataset::Dataset;
use super::error::PreconditionError;
use super::insights::ChartKind;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub data: Vec<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PointSeries {
    pub label: String,
    pub data: Vec<Point>,
}

/// What the plotting layer needs for one chart. Serializes to the plain
/// `{labels, data}` / `{labels, datasets}` / `{datasets}` shapes.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartData {
    Proportion {
        labels: Vec<String>,
        data: Vec<f64>,
    },
    Axis {
        labels: Vec<String>,
        datasets: Vec<Series>,
    },
    Scatter {
        datasets: Vec<PointSeries>,
    },
}

/// A shaped chart together with the selection it was built from.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
}

/// Shapes column `x` (categories) against column `y` (values). Every row
/// contributes; values that do not read as numbers plot as 0.
pub fn build_chart(
    dataset: &Dataset,
    kind: ChartKind,
    x: usize,
    y: usize,
) -> Result<ChartSpec, PreconditionError> {
    if dataset.num_cols() < 2 {
        return Err(PreconditionError::NotEnoughColumns {
            found: dataset.num_cols(),
        });
    }

    let number_at = |row: usize, col: usize| {
        dataset
            .cell(row, col)
            .and_then(|c| c.as_number())
            .unwrap_or(0.0)
    };
    let rows = 0..dataset.num_rows();
    let labels: Vec<String> = rows
        .clone()
        .map(|r| dataset.cell(r, x).map(|c| c.to_string()).unwrap_or_default())
        .collect();
    let values: Vec<f64> = rows.clone().map(|r| number_at(r, y)).collect();
    let y_name = dataset.column_name(y);

    let data = match kind {
        ChartKind::Pie => ChartData::Proportion {
            labels,
            data: values,
        },
        ChartKind::Bar | ChartKind::Line => ChartData::Axis {
            labels,
            datasets: vec![Series {
                label: y_name.unwrap_or("Value").to_string(),
                data: values,
            }],
        },
        ChartKind::Scatter => ChartData::Scatter {
            datasets: vec![PointSeries {
                label: y_name.unwrap_or("Series").to_string(),
                data: rows
                    .map(|r| Point {
                        x: number_at(r, x),
                        y: number_at(r, y),
                    })
                    .collect(),
            }],
        },
    };

    Ok(ChartSpec {
        kind,
        title: format!("{} - {}", dataset.name, kind.name()),
        x_label: dataset.column_name(x).unwrap_or("X").to_string(),
        y_label: y_name.unwrap_or("Y").to_string(),
        data,
    })
}
