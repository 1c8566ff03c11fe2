use super::dataset::Dataset;
use super::value::is_blank;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Scatter,
}

impl ChartKind {
    pub fn all() -> &'static [ChartKind] {
        &[ChartKind::Bar, ChartKind::Pie, ChartKind::Line, ChartKind::Scatter]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Scatter => "Scatter Plot",
        }
    }
}

/// Chart types worth trying, given how many columns were classified numeric.
/// Empty when the dataset has fewer than two columns.
pub fn suggest_chart_types(dataset: &Dataset, numeric_columns: &[usize]) -> Vec<ChartKind> {
    let mut suggestions = Vec::new();
    if dataset.num_cols() < 2 {
        return suggestions;
    }
    if numeric_columns.len() >= 2 {
        suggestions.extend([ChartKind::Line, ChartKind::Scatter]);
    }
    if !numeric_columns.is_empty() {
        suggestions.extend([ChartKind::Bar, ChartKind::Pie]);
    }
    suggestions
}

/// Descriptive statistics of a value column grouped by a category column.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryStats {
    pub category: String,
    pub value: String,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// First row holding the largest value.
    pub top: (String, f64),
}

impl SummaryStats {
    /// Display lines; the mean is rounded to two decimals here only, with
    /// ties going away from zero.
    pub fn lines(&self) -> Vec<String> {
        let mean = (self.mean * 100.0).round() / 100.0;
        vec![
            format!("Rows used: {}", self.count),
            format!("Mean {}: {:.2}", self.value, mean),
            format!("Min {}: {}", self.value, self.min),
            format!("Max {}: {}", self.value, self.max),
            format!("Top {}: {} ({})", self.category, self.top.0, self.top.1),
        ]
    }
}

/// Collects `(category, value)` pairs from rows whose x cell is present and
/// whose y cell reads as a finite number.
pub fn value_pairs(dataset: &Dataset, x: usize, y: usize) -> Vec<(String, f64)> {
    (0..dataset.num_rows())
        .filter_map(|row| {
            let label = dataset.cell(row, x);
            if is_blank(label) {
                return None;
            }
            let value = dataset.cell(row, y)?.as_number()?;
            Some((label?.to_string(), value))
        })
        .collect()
}

/// `None` when no usable pair exists.
pub fn summarize(dataset: &Dataset, x: usize, y: usize) -> Option<SummaryStats> {
    let pairs = value_pairs(dataset, x, y);
    let (first, rest) = pairs.split_first()?;

    let mut sum = first.1;
    let mut min = first.1;
    let mut max = first.1;
    let mut top = first;
    for pair in rest {
        sum += pair.1;
        min = min.min(pair.1);
        max = max.max(pair.1);
        if pair.1 > top.1 {
            top = pair;
        }
    }

    Some(SummaryStats {
        category: dataset.column_name(x).unwrap_or("Category").to_string(),
        value: dataset.column_name(y).unwrap_or("Value").to_string(),
        count: pairs.len(),
        mean: sum / pairs.len() as f64,
        min,
        max,
        top: top.clone(),
    })
}
