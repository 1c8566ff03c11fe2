use super::value::Scalar;

pub const DEFAULT_NAME: &str = "Untitled";

const PREVIEW_CELL_WIDTH: usize = 15;

/// An in-memory table: a header plus rows of parsed cells, aligned by position.
///
/// Rows may be ragged; every accessor treats a missing cell as blank.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Scalar>>,
}

impl Default for Dataset {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

impl Dataset {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Scalar>>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Builds a dataset from raw records. The first record is the header and
    /// is kept verbatim; every later cell goes through [`Scalar::parse`].
    pub fn from_records(name: &str, records: Vec<Vec<String>>) -> Self {
        let mut records = records.into_iter();
        let columns = records.next().unwrap_or_default();
        let rows = records
            .map(|record| record.iter().map(|cell| Scalar::parse(cell)).collect())
            .collect();

        let name = if name.trim().is_empty() { DEFAULT_NAME } else { name };
        Self::new(name, columns, rows)
    }

    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Scalar> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn column_name(&self, col: usize) -> Option<&str> {
        self.columns.get(col).map(String::as_str)
    }

    /// Fixed-width text rendering of the first `max_rows` rows.
    pub fn preview_text(&self, max_rows: usize) -> String {
        let mut out = String::new();
        out.push_str(&format!("Dataset: {}\n", self.name));
        out.push_str(&format!(
            "Rows: {}, Columns: {}\n\n",
            self.num_rows(),
            self.num_cols()
        ));

        let header: Vec<String> = self.columns.iter().map(|c| pad_cell(c)).collect();
        out.push_str(&header.join(" | "));
        out.push('\n');
        let rule: Vec<String> = self
            .columns
            .iter()
            .map(|_| "-".repeat(PREVIEW_CELL_WIDTH))
            .collect();
        out.push_str(&rule.join("-+-"));
        out.push('\n');

        for r in 0..self.num_rows().min(max_rows) {
            let cells: Vec<String> = (0..self.num_cols())
                .map(|c| {
                    let text = self.cell(r, c).map(Scalar::to_string).unwrap_or_default();
                    pad_cell(&text)
                })
                .collect();
            out.push_str(&cells.join(" | "));
            out.push('\n');
        }

        if let Some(more) = self.hidden_rows(max_rows) {
            out.push_str(&format!("... and {} more rows\n", more));
        }
        out
    }

    /// Number of rows a preview of `max_rows` leaves out, if any.
    pub fn hidden_rows(&self, max_rows: usize) -> Option<usize> {
        (self.num_rows() > max_rows).then(|| self.num_rows() - max_rows)
    }
}

fn pad_cell(text: &str) -> String {
    let shown = if text.chars().count() > PREVIEW_CELL_WIDTH {
        let cut: String = text.chars().take(PREVIEW_CELL_WIDTH - 3).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    };
    format!("{:<width$}", shown, width = PREVIEW_CELL_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|l| l.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_header_kept_verbatim() {
        let ds = Dataset::from_records("t", records(&[&[" Region ", "42"], &["x", "1"]]));
        assert_eq!(ds.columns, vec![" Region ", "42"]);
        assert_eq!(ds.rows, vec![vec![Scalar::Text("x".into()), Scalar::Number(1.0)]]);
    }

    #[test]
    fn test_empty_input() {
        let ds = Dataset::from_records("", Vec::new());
        assert_eq!(ds.name, DEFAULT_NAME);
        assert!(ds.is_empty());
        assert_eq!(ds.num_rows(), 0);
    }

    #[test]
    fn test_ragged_access() {
        let ds = Dataset::from_records("t", records(&[&["a", "b"], &["1"]]));
        assert_eq!(ds.cell(0, 0), Some(&Scalar::Number(1.0)));
        assert_eq!(ds.cell(0, 1), None);
        assert_eq!(ds.cell(5, 0), None);
    }

    #[test]
    fn test_preview_text() {
        let mut lines: Vec<Vec<String>> = vec![vec!["Product".into(), "Sales".into()]];
        for i in 0..12 {
            lines.push(vec![format!("A very long product name {}", i), i.to_string()]);
        }
        let ds = Dataset::from_records("Sales", lines);
        let text = ds.preview_text(10);

        assert!(text.starts_with("Dataset: Sales\nRows: 12, Columns: 2\n\n"));
        assert!(text.contains("A very long ..."));
        assert!(text.ends_with("... and 2 more rows\n"));
        assert_eq!(ds.hidden_rows(12), None);
    }
}
