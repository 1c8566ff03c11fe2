use eframe::egui;

use crate::backend::dataset::Dataset;
use crate::backend::error::PreconditionError;

const DEFAULT_ENTRY_NAME: &str = "Manual Dataset";
const DEFAULT_ROWS: usize = 5;
const DEFAULT_COLS: usize = 3;
const MAX_ROWS: usize = 100;
const MAX_COLS: usize = 20;

const SAMPLE_NAME: &str = "Sample Product Sales";
const SAMPLE_GRID: [[&str; 3]; 6] = [
    ["Product", "Sales", "Quarter"],
    ["Laptops", "1500", "Q1"],
    ["Phones", "2300", "Q1"],
    ["Tablets", "800", "Q1"],
    ["Laptops", "1800", "Q2"],
    ["Phones", "2100", "Q2"],
];

/// Hand-typed table. Row 0 of the grid holds the column headers.
pub struct DataEntryWindow {
    name: String,
    rows: usize,
    cols: usize,
    grid: Vec<Vec<String>>,
    error: Option<String>,
}

impl Default for DataEntryWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl DataEntryWindow {
    pub fn new() -> Self {
        let mut window = Self {
            name: DEFAULT_ENTRY_NAME.to_string(),
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            grid: Vec::new(),
            error: None,
        };
        window.resize();
        window
    }

    /// Applies the row/column counts. Cells that still fit are kept.
    fn resize(&mut self) {
        self.rows = self.rows.clamp(1, MAX_ROWS);
        self.cols = self.cols.clamp(1, MAX_COLS);
        self.grid.resize_with(self.rows, Vec::new);
        for row in &mut self.grid {
            row.resize(self.cols, String::new());
        }
    }

    fn clear_cells(&mut self) {
        for cell in self.grid.iter_mut().flatten() {
            cell.clear();
        }
    }

    fn load_sample(&mut self) {
        self.clear_cells();
        self.name = SAMPLE_NAME.to_string();
        for (row, values) in self.grid.iter_mut().zip(SAMPLE_GRID.iter()) {
            for (cell, value) in row.iter_mut().zip(values.iter()) {
                *cell = value.to_string();
            }
        }
    }

    /// Turns the grid into records: a header row (blank names become
    /// `Column <n>`) followed by every data row that has at least one value.
    pub fn records(&self) -> Result<Vec<Vec<String>>, PreconditionError> {
        let (header, body) = self.grid.split_first().ok_or(PreconditionError::NoEntryData)?;

        let columns = header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell.trim() {
                "" => format!("Column {}", i + 1),
                name => name.to_string(),
            })
            .collect();

        let mut records = vec![columns];
        records.extend(
            body.iter()
                .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
                .map(|row| row.iter().map(|cell| cell.trim().to_string()).collect()),
        );

        if records.len() < 2 {
            return Err(PreconditionError::NoEntryData);
        }
        Ok(records)
    }

    pub fn build(&self) -> Result<Dataset, PreconditionError> {
        Ok(Dataset::from_records(&self.name, self.records()?))
    }

    /// Returns the entered dataset once OK succeeds; the window then closes.
    pub fn show(&mut self, ctx: &egui::Context, open: &mut bool) -> Option<Dataset> {
        let mut close = false;
        let mut submitted = None;

        egui::Window::new("Manual Data Entry")
            .open(open)
            .default_size([600.0, 500.0])
            .resizable(true)
            .show(ctx, |ui| {
                self.show_config(ui);
                ui.separator();
                ui.label("Enter your data below. The first row holds the column headers.");
                ui.label(
                    egui::RichText::new("Use numbers for numerical data and text for categorical data.")
                        .weak()
                        .small(),
                );
                self.show_grid(ui);

                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 80), error.as_str());
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Load Sample Data").clicked() {
                        self.load_sample();
                    }
                    if ui.button("Clear").clicked() {
                        self.clear_cells();
                    }
                    ui.add_space(20.0);
                    if ui.button("OK").clicked() {
                        match self.build() {
                            Ok(dataset) => {
                                self.error = None;
                                submitted = Some(dataset);
                                close = true;
                            }
                            Err(e) => self.error = Some(e.to_string()),
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });

        if close {
            *open = false;
        }
        submitted
    }

    fn show_config(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("entry_config").num_columns(2).show(ui, |ui| {
            ui.label("Dataset Name:");
            ui.text_edit_singleline(&mut self.name);
            ui.end_row();

            ui.label("Rows:");
            ui.horizontal(|ui| {
                ui.add(egui::DragValue::new(&mut self.rows).range(1..=MAX_ROWS));
                ui.label("Columns:");
                ui.add(egui::DragValue::new(&mut self.cols).range(1..=MAX_COLS));
                if ui.button("Resize Table").clicked() {
                    self.resize();
                }
            });
            ui.end_row();
        });
    }

    fn show_grid(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::both().max_height(300.0).show(ui, |ui| {
            egui::Grid::new("entry_grid").striped(true).show(ui, |ui| {
                for (index, row) in self.grid.iter_mut().enumerate() {
                    let tag = if index == 0 { "Header".to_string() } else { index.to_string() };
                    ui.label(egui::RichText::new(tag).color(egui::Color32::from_gray(100)));
                    for cell in row.iter_mut() {
                        ui.add(egui::TextEdit::singleline(cell).desired_width(90.0));
                    }
                    ui.end_row();
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::DatasetStore;
    use crate::backend::value::Scalar;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fill(window: &mut DataEntryWindow, cells: &[&[&str]]) {
        for (row, values) in window.grid.iter_mut().zip(cells) {
            for (cell, value) in row.iter_mut().zip(values.iter()) {
                *cell = value.to_string();
            }
        }
    }

    #[test]
    fn test_defaults() {
        let window = DataEntryWindow::new();
        assert_eq!(window.name, "Manual Dataset");
        assert_eq!(window.grid.len(), 5);
        assert!(window.grid.iter().all(|row| row.len() == 3));
    }

    #[test]
    fn test_records_from_grid() -> Result<(), PreconditionError> {
        let mut window = DataEntryWindow::new();
        fill(
            &mut window,
            &[&[" Region ", "", "Units"], &["North", " 10 ", ""], &["", "", " "], &["South", "20", "3"]],
        );

        assert_eq!(
            window.records()?,
            vec![
                vec!["Region", "Column 2", "Units"],
                vec!["North", "10", ""],
                vec!["South", "20", "3"],
            ]
        );

        let ds = window.build()?;
        assert_eq!(ds.name, "Manual Dataset");
        assert_eq!(ds.num_rows(), 2);
        assert_eq!(ds.rows[0], vec![Scalar::Text("North".into()), Scalar::Number(10.0), Scalar::Empty]);
        Ok(())
    }

    #[test]
    fn test_entry_replaces_store_dataset() -> anyhow::Result<()> {
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut store = DatasetStore::new();
        store.load_text("old,cols\n1,2", "old", None)?;
        {
            let seen = Rc::clone(&seen);
            store.subscribe("names", Box::new(move |ds: &Dataset| seen.borrow_mut().push(ds.name.clone())));
        }

        let mut window = DataEntryWindow::new();
        window.load_sample();
        store.replace(window.build()?);

        assert_eq!(*seen.borrow(), vec!["old", "Sample Product Sales"]);
        assert_eq!(store.dataset().columns, vec!["Product", "Sales", "Quarter"]);
        assert_eq!(store.dataset().num_rows(), 4);
        Ok(())
    }

    #[test]
    fn test_no_data_rows_refused() {
        let mut window = DataEntryWindow::new();
        fill(&mut window, &[&["a", "b", "c"]]);
        assert_eq!(window.records(), Err(PreconditionError::NoEntryData));
        assert_eq!(window.build(), Err(PreconditionError::NoEntryData));
    }

    #[test]
    fn test_blank_name_becomes_untitled() -> Result<(), PreconditionError> {
        let mut window = DataEntryWindow::new();
        window.name = "  ".to_string();
        fill(&mut window, &[&["k", "v"], &["a", "1"]]);
        assert_eq!(window.build()?.name, "Untitled");
        Ok(())
    }

    #[test]
    fn test_sample_fits_grid() -> Result<(), PreconditionError> {
        let mut window = DataEntryWindow::new();
        window.load_sample();
        assert_eq!(window.name, "Sample Product Sales");
        // Five grid rows: the header plus the first four sample rows.
        let records = window.records()?;
        assert_eq!(records.len(), 5);
        assert_eq!(records[4], vec!["Laptops", "1800", "Q2"]);

        window.clear_cells();
        assert!(window.grid.iter().flatten().all(String::is_empty));
        Ok(())
    }

    #[test]
    fn test_resize_keeps_fitting_cells() {
        let mut window = DataEntryWindow::new();
        fill(&mut window, &[&["a", "b", "c"], &["1", "2", "3"]]);
        window.rows = 2;
        window.cols = 2;
        window.resize();
        assert_eq!(window.grid, vec![vec!["a", "b"], vec!["1", "2"]]);

        window.rows = 500;
        window.cols = 0;
        window.resize();
        assert_eq!((window.grid.len(), window.grid[0].len()), (100, 1));
    }
}
