use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::dataset::Dataset;
use super::value::is_blank;

pub const DEFAULT_SAMPLE_WINDOW: usize = 50;
pub const DEFAULT_NUMERIC_THRESHOLD: f64 = 0.7;

/// Knobs for the sampling heuristic.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// How many leading rows are inspected per column.
    pub sample_window: usize,
    /// Share of non-empty sampled cells that must be numbers. Strictly greater.
    pub numeric_threshold: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_window: DEFAULT_SAMPLE_WINDOW,
            numeric_threshold: DEFAULT_NUMERIC_THRESHOLD,
        }
    }
}

/// Inferred kind of a column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "Numeric",
            ColumnKind::Categorical => "Categorical",
        }
    }
}

/// Profile/statistics for a single column
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnProfile {
    pub column_index: usize,
    pub header: String,
    pub kind: ColumnKind,
    /// Non-empty cells inside the sample window.
    pub seen: usize,
    /// Number cells inside the sample window.
    pub numeric: usize,
    // Whole-column counts
    pub empty_count: usize,
    pub unique_count: usize,
}

impl ColumnProfile {
    pub fn numeric_ratio(&self) -> Option<f64> {
        (self.seen > 0).then(|| self.numeric as f64 / self.seen as f64)
    }
}

/// Analyzer that profiles dataset columns
pub struct ColumnAnalyzer;

impl ColumnAnalyzer {
    pub fn analyze_column(dataset: &Dataset, col: usize, config: &InferenceConfig) -> ColumnProfile {
        let window = dataset.num_rows().min(config.sample_window);
        let mut seen = 0;
        let mut numeric = 0;
        for row in 0..window {
            let cell = dataset.cell(row, col);
            if is_blank(cell) {
                continue;
            }
            seen += 1;
            if cell.is_some_and(|c| c.is_number()) {
                numeric += 1;
            }
        }

        let mut empty_count = 0;
        let mut distinct: HashSet<String> = HashSet::new();
        for row in 0..dataset.num_rows() {
            match dataset.cell(row, col) {
                Some(cell) if !cell.is_empty() => {
                    distinct.insert(cell.to_string());
                }
                _ => empty_count += 1,
            }
        }

        ColumnProfile {
            column_index: col,
            header: dataset.column_name(col).unwrap_or_default().to_string(),
            kind: Self::classify(seen, numeric, config),
            seen,
            numeric,
            empty_count,
            unique_count: distinct.len(),
        }
    }

    /// Majority vote: numeric when more than the threshold share of non-empty
    /// sampled cells are numbers. A column with nothing sampled is never numeric.
    pub fn classify(seen: usize, numeric: usize, config: &InferenceConfig) -> ColumnKind {
        if seen > 0 && numeric as f64 / seen as f64 > config.numeric_threshold {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    pub fn profile(dataset: &Dataset, config: &InferenceConfig) -> Vec<ColumnProfile> {
        (0..dataset.num_cols())
            .map(|col| Self::analyze_column(dataset, col, config))
            .collect()
    }

    /// Indices of the columns classified numeric, in column order.
    pub fn numeric_columns(dataset: &Dataset, config: &InferenceConfig) -> Vec<usize> {
        Self::profile(dataset, config)
            .into_iter()
            .filter(|p| p.kind == ColumnKind::Numeric)
            .map(|p| p.column_index)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::value::Scalar;

    fn single_column(cells: Vec<Scalar>) -> Dataset {
        Dataset::new("t", vec!["v".into()], cells.into_iter().map(|c| vec![c]).collect())
    }

    #[test]
    fn test_empty_cells_not_counted() {
        let mut cells = vec![Scalar::Number(1.0); 45];
        cells.extend(vec![Scalar::Empty; 15]);
        let ds = single_column(cells);
        let profile = ColumnAnalyzer::analyze_column(&ds, 0, &InferenceConfig::default());

        assert_eq!(profile.seen, 45);
        assert_eq!(profile.numeric, 45);
        assert_eq!(profile.kind, ColumnKind::Numeric);
        assert_eq!(profile.empty_count, 15);
        assert_eq!(profile.unique_count, 1);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mut cells = vec![Scalar::Number(2.0); 35];
        cells.extend(vec![Scalar::Text("n/a".into()); 15]);
        let ds = single_column(cells);
        let profile = ColumnAnalyzer::analyze_column(&ds, 0, &InferenceConfig::default());

        assert_eq!(profile.numeric_ratio(), Some(0.7));
        assert_eq!(profile.kind, ColumnKind::Categorical);
    }

    #[test]
    fn test_supermajority_is_numeric() {
        let mut cells = vec![Scalar::Number(2.0); 36];
        cells.extend(vec![Scalar::Text("n/a".into()); 14]);
        let ds = single_column(cells);
        assert_eq!(ColumnAnalyzer::numeric_columns(&ds, &InferenceConfig::default()), vec![0]);
    }

    #[test]
    fn test_only_window_is_sampled() {
        let mut cells = vec![Scalar::Text("x".into()); 50];
        cells.extend(vec![Scalar::Number(1.0); 500]);
        let ds = single_column(cells);
        let profile = ColumnAnalyzer::analyze_column(&ds, 0, &InferenceConfig::default());
        assert_eq!(profile.seen, 50);
        assert_eq!(profile.kind, ColumnKind::Categorical);

        let wide = InferenceConfig {
            sample_window: 1000,
            ..Default::default()
        };
        assert_eq!(ColumnAnalyzer::analyze_column(&ds, 0, &wide).kind, ColumnKind::Numeric);
    }

    #[test]
    fn test_all_empty_column() {
        let ds = single_column(vec![Scalar::Empty; 10]);
        let profile = ColumnAnalyzer::analyze_column(&ds, 0, &InferenceConfig::default());
        assert_eq!(profile.seen, 0);
        assert_eq!(profile.numeric_ratio(), None);
        assert_eq!(profile.kind, ColumnKind::Categorical);
    }

    #[test]
    fn test_ragged_rows() {
        let ds = Dataset::new(
            "t",
            vec!["a".into(), "b".into()],
            vec![vec![Scalar::Text("x".into())], vec![Scalar::Text("y".into()), Scalar::Number(3.0)]],
        );
        let profiles = ColumnAnalyzer::profile(&ds, &InferenceConfig::default());
        assert_eq!(profiles[1].seen, 1);
        assert_eq!(profiles[1].empty_count, 1);
        assert_eq!(profiles[1].kind, ColumnKind::Numeric);
    }
}
