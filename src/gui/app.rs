use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::backend::analysis::{ColumnAnalyzer, ColumnKind, ColumnProfile, InferenceConfig};
use crate::backend::chart::{ChartSpec, build_chart};
use crate::backend::cleaning::CleanOptions;
use crate::backend::dataset::Dataset;
use crate::backend::error::PreconditionError;
use crate::backend::export;
use crate::backend::insights::{ChartKind, SummaryStats, suggest_chart_types, summarize};
use crate::backend::loader::{CsvLoader, RawInput};
use crate::backend::settings::{Settings, Theme};
use crate::backend::store::{DatasetStore, Subscriber};
use crate::gui::chart_view;
use crate::gui::windows::data_entry::DataEntryWindow;
use crate::gui::windows::settings::SettingsWindow;

const NO_SUGGESTIONS: &str = "No suggestions yet. Add more numeric columns.";

/// First rows of the current dataset, rendered to text once per replacement.
#[derive(Default)]
struct Preview {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    hidden: Option<usize>,
}

impl Preview {
    fn build(dataset: &Dataset, max_rows: usize) -> Self {
        let rows = dataset
            .rows
            .iter()
            .take(max_rows)
            .map(|row| {
                (0..dataset.num_cols())
                    .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default())
                    .collect()
            })
            .collect();
        Self {
            columns: dataset.columns.clone(),
            rows,
            hidden: dataset.hidden_rows(max_rows),
        }
    }
}

#[derive(Default)]
struct Insights {
    profiles: Vec<ColumnProfile>,
    suggestions: Vec<ChartKind>,
}

impl Insights {
    fn build(dataset: &Dataset, config: &InferenceConfig) -> Self {
        let profiles = ColumnAnalyzer::profile(dataset, config);
        let numeric: Vec<usize> = profiles
            .iter()
            .filter(|p| p.kind == ColumnKind::Numeric)
            .map(|p| p.column_index)
            .collect();
        Self {
            suggestions: suggest_chart_types(dataset, &numeric),
            profiles,
        }
    }
}

/// Category/value column pickers and the statistics for that pair.
struct Selection {
    x: usize,
    y: usize,
    stats: Option<SummaryStats>,
}

impl Selection {
    fn new(x: usize, y: usize) -> Self {
        Self { x, y, stats: None }
    }

    fn sync(&mut self, dataset: &Dataset) {
        let cols = dataset.num_cols();
        if self.x >= cols {
            self.x = 0;
        }
        if self.y >= cols {
            self.y = if cols > 1 { 1 } else { 0 };
        }
        self.stats = summarize(dataset, self.x, self.y);
    }
}

fn selection_subscriber(selection: Rc<RefCell<Selection>>) -> Subscriber {
    Box::new(move |ds: &Dataset| selection.borrow_mut().sync(ds))
}

/// Keeps a rendered chart in step with the dataset: rebuilt with the current
/// kind and columns, or dropped when that is no longer possible.
fn chart_subscriber(chart: Rc<RefCell<Option<ChartSpec>>>, selection: Rc<RefCell<Selection>>) -> Subscriber {
    Box::new(move |ds: &Dataset| {
        let mut chart = chart.borrow_mut();
        if let Some(kind) = chart.as_ref().map(|c| c.kind) {
            let sel = selection.borrow();
            *chart = build_chart(ds, kind, sel.x, sel.y).ok();
        }
    })
}

/// File name offered for exporting the current chart.
fn export_file_name(chart: Option<&ChartSpec>, dataset: &Dataset) -> Result<String, PreconditionError> {
    chart.ok_or(PreconditionError::NoChart)?;
    Ok(export::chart_file_name(&dataset.name))
}

enum Action {
    OpenDialog,
    OpenPath(PathBuf),
    LoadSample,
    ManualEntry,
    ClearData,
    ApplyCleaning,
    RenderChart,
    ExportPng,
}

pub struct GuiApp {
    store: DatasetStore,
    settings: Rc<RefCell<Settings>>,
    preview: Rc<RefCell<Preview>>,
    insights: Rc<RefCell<Insights>>,
    selection: Rc<RefCell<Selection>>,
    chart: Rc<RefCell<Option<ChartSpec>>>,
    chart_kind: ChartKind,
    chart_rect: Option<egui::Rect>,
    clean_options: CleanOptions,
    pending_export: Option<PathBuf>,
    notice: Option<String>,
    settings_window: SettingsWindow,
    show_settings: bool,
    data_entry: DataEntryWindow,
    show_data_entry: bool,
}

impl GuiApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        settings: Settings,
        input: Option<(RawInput, Option<PathBuf>)>,
        clean_options: CleanOptions,
        (x, y): (usize, usize),
    ) -> Self {
        let mut app = Self {
            store: DatasetStore::new(),
            settings: Rc::new(RefCell::new(settings)),
            preview: Rc::default(),
            insights: Rc::default(),
            selection: Rc::new(RefCell::new(Selection::new(x, y))),
            chart: Rc::default(),
            chart_kind: ChartKind::Bar,
            chart_rect: None,
            clean_options,
            pending_export: None,
            notice: None,
            settings_window: SettingsWindow::new(),
            show_settings: false,
            data_entry: DataEntryWindow::new(),
            show_data_entry: false,
        };
        app.subscribe_views();

        if let Some((input, path)) = input {
            app.load(input, path.as_deref());
            if clean_options != CleanOptions::default() {
                app.store.clean(clean_options);
            }
        }
        app
    }

    /// Registers the derived views. Order matters: the chart is rebuilt from
    /// the pickers, so it goes last.
    fn subscribe_views(&mut self) {
        let preview = Rc::clone(&self.preview);
        let settings = Rc::clone(&self.settings);
        self.store.subscribe(
            "preview",
            Box::new(move |ds: &Dataset| {
                *preview.borrow_mut() = Preview::build(ds, settings.borrow().preview_rows);
            }),
        );

        let insights = Rc::clone(&self.insights);
        let settings = Rc::clone(&self.settings);
        self.store.subscribe(
            "insights",
            Box::new(move |ds: &Dataset| {
                *insights.borrow_mut() = Insights::build(ds, &settings.borrow().inference);
            }),
        );

        self.store
            .subscribe("column pickers", selection_subscriber(Rc::clone(&self.selection)));
        self.store.subscribe(
            "chart",
            chart_subscriber(Rc::clone(&self.chart), Rc::clone(&self.selection)),
        );
    }

    fn load(&mut self, input: RawInput, path: Option<&Path>) {
        let delimiter = self.settings.borrow().delimiter_byte();
        if let Err(e) = self.store.load_text(&input.text, &input.name, delimiter) {
            log::warn!("failed to parse {}: {:#}", input.name, e);
            self.notice = Some(format!("Failed to load {}: {:#}", input.name, e));
            return;
        }

        if let Some(path) = path {
            let mut settings = self.settings.borrow_mut();
            settings.add_recent_file(&path.to_string_lossy());
            if let Err(e) = settings.save() {
                log::warn!("could not save settings: {:#}", e);
            }
        }
    }

    fn perform(&mut self, ctx: &egui::Context, action: Action) {
        match action {
            Action::OpenDialog => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Delimited text", &["csv", "tsv", "txt"])
                    .pick_file()
                {
                    self.perform(ctx, Action::OpenPath(path));
                }
            }
            Action::OpenPath(path) => match CsvLoader::from_path(&path) {
                Ok(input) => self.load(input, Some(&path)),
                Err(e) => {
                    log::warn!("{:#}", e);
                    self.notice = Some(format!("Failed to load file: {:#}", e));
                }
            },
            Action::LoadSample => self.load(CsvLoader::sample(), None),
            Action::ManualEntry => {
                self.data_entry = DataEntryWindow::new();
                self.show_data_entry = true;
            }
            Action::ClearData => self.store.replace(Dataset::default()),
            Action::ApplyCleaning => self.store.clean(self.clean_options),
            Action::RenderChart => {
                let sel = self.selection.borrow();
                let built = build_chart(self.store.dataset(), self.chart_kind, sel.x, sel.y);
                match built {
                    Ok(chart) => *self.chart.borrow_mut() = Some(chart),
                    Err(e) => {
                        *self.chart.borrow_mut() = None;
                        self.notice = Some(e.to_string());
                    }
                }
            }
            Action::ExportPng => {
                let offered = export_file_name(self.chart.borrow().as_ref(), self.store.dataset());
                let file_name = match offered {
                    Ok(name) if self.chart_rect.is_some() => name,
                    Ok(_) => {
                        self.notice = Some(PreconditionError::NoChart.to_string());
                        return;
                    }
                    Err(e) => {
                        self.notice = Some(e.to_string());
                        return;
                    }
                };
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("PNG", &["png"])
                    .set_file_name(&file_name)
                    .save_file()
                {
                    self.pending_export = Some(path);
                    ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
                }
            }
        }
    }

    /// Crops a pending screenshot to the chart and writes it out.
    fn finish_export(&mut self, ctx: &egui::Context) {
        if self.pending_export.is_none() {
            return;
        }
        let screenshot = ctx.input(|i| {
            i.raw.events.iter().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(Arc::clone(image)),
                _ => None,
            })
        });
        let Some(screenshot) = screenshot else {
            return;
        };
        let Some(path) = self.pending_export.take() else {
            return;
        };
        let Some(rect) = self.chart_rect else {
            self.notice = Some(PreconditionError::NoChart.to_string());
            return;
        };

        let region = screenshot.region(&rect, Some(ctx.pixels_per_point()));
        let rgba: Vec<u8> = region.pixels.iter().flat_map(|p| p.to_array()).collect();
        if let Err(e) = export::write_png(&path, &rgba, region.width() as u32, region.height() as u32) {
            log::warn!("{:#}", e);
            self.notice = Some(format!("Export failed: {:#}", e));
        }
    }

    fn show_menu(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.horizontal(|ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open...").clicked() {
                    actions.push(Action::OpenDialog);
                    ui.close();
                }
                if ui.button("Load Sample").clicked() {
                    actions.push(Action::LoadSample);
                    ui.close();
                }
                let recent = self.settings.borrow().recent_files.clone();
                ui.menu_button("Recent", |ui| {
                    if recent.is_empty() {
                        ui.label("Nothing yet");
                    }
                    for path in recent {
                        if ui.button(&path).clicked() {
                            actions.push(Action::OpenPath(PathBuf::from(path)));
                            ui.close();
                        }
                    }
                });
                ui.separator();
                if ui.button("Export PNG").clicked() {
                    actions.push(Action::ExportPng);
                    ui.close();
                }
            });
            ui.menu_button("Data", |ui| {
                if ui.button("Manual Data Entry").clicked() {
                    actions.push(Action::ManualEntry);
                    ui.close();
                }
                if ui.button("Clear Data").clicked() {
                    actions.push(Action::ClearData);
                    ui.close();
                }
            });
            if ui.button("Settings").clicked() {
                self.show_settings = true;
            }
            ui.separator();
            ui.label(egui::RichText::new(&self.store.dataset().name).color(egui::Color32::from_gray(150)));
        });
    }

    fn show_controls(&mut self, ui: &mut egui::Ui, actions: &mut Vec<Action>) {
        ui.heading("Cleaning");
        ui.checkbox(&mut self.clean_options.trim, "Trim whitespace");
        ui.checkbox(&mut self.clean_options.drop_empty, "Drop empty rows");
        ui.checkbox(&mut self.clean_options.infer, "Infer numbers");
        if ui.button("Apply").clicked() {
            actions.push(Action::ApplyCleaning);
        }

        ui.separator();
        ui.heading("Columns");
        {
            let columns = &self.store.dataset().columns;
            let mut sel = self.selection.borrow_mut();
            let before = (sel.x, sel.y);
            column_picker(ui, "x_column", "Category (x)", &mut sel.x, columns);
            column_picker(ui, "y_column", "Value (y)", &mut sel.y, columns);
            if (sel.x, sel.y) != before {
                sel.stats = summarize(self.store.dataset(), sel.x, sel.y);
            }
        }

        ui.separator();
        ui.heading("Chart");
        egui::ComboBox::from_id_salt("chart_kind")
            .selected_text(self.chart_kind.name())
            .show_ui(ui, |ui| {
                for kind in ChartKind::all() {
                    ui.selectable_value(&mut self.chart_kind, *kind, kind.name());
                }
            });
        ui.horizontal(|ui| {
            if ui.button("Render").clicked() {
                actions.push(Action::RenderChart);
            }
            if ui.button("Export PNG").clicked() {
                actions.push(Action::ExportPng);
            }
        });

        ui.separator();
        ui.heading("Suggestions");
        let insights = self.insights.borrow();
        if insights.suggestions.is_empty() {
            ui.label(NO_SUGGESTIONS);
        }
        for kind in &insights.suggestions {
            ui.label(format!("Suggested: {}", kind.name()));
        }

        ui.separator();
        ui.heading("Summary");
        match &self.selection.borrow().stats {
            Some(stats) => {
                for line in stats.lines() {
                    ui.label(line);
                }
            }
            None => {
                ui.label(egui::RichText::new("No numeric values for this pair").weak());
            }
        }

        ui.separator();
        ui.heading("Profile");
        egui::Grid::new("profile_grid").striped(true).show(ui, |ui| {
            for title in ["Column", "Kind", "Seen", "Numeric", "Empty", "Distinct"] {
                ui.strong(title);
            }
            ui.end_row();
            for p in &insights.profiles {
                ui.label(&p.header);
                ui.label(p.kind.name());
                ui.label(p.seen.to_string());
                ui.label(p.numeric.to_string());
                ui.label(p.empty_count.to_string());
                ui.label(p.unique_count.to_string());
                ui.end_row();
            }
        });
    }
}

fn column_picker(ui: &mut egui::Ui, id: &str, label: &str, value: &mut usize, columns: &[String]) {
    ui.horizontal(|ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(columns.get(*value).map(String::as_str).unwrap_or("-"))
            .show_ui(ui, |ui| {
                for (i, name) in columns.iter().enumerate() {
                    ui.selectable_value(value, i, name.as_str());
                }
            });
    });
}

fn show_preview(ui: &mut egui::Ui, preview: &Preview) {
    if preview.columns.is_empty() {
        ui.label("No data loaded");
        return;
    }

    ui.push_id("preview_table", |ui| {
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(240.0)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto());
        for _ in &preview.columns {
            builder = builder.column(Column::initial(120.0).resizable(true).clip(true));
        }

        builder
            .header(24.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Row");
                });
                for name in &preview.columns {
                    header.col(|ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for (index, cells) in preview.rows.iter().enumerate() {
                    body.row(20.0, |mut row| {
                        row.col(|ui| {
                            ui.label(egui::RichText::new(index.to_string()).color(egui::Color32::from_gray(100)));
                        });
                        for cell in cells {
                            row.col(|ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });

    if let Some(more) = preview.hidden {
        ui.label(egui::RichText::new(format!("... and {} more rows", more)).weak());
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        apply_style(ctx, self.settings.borrow().theme);
        self.finish_export(ctx);

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| self.show_menu(ui, &mut actions));

        if self.show_settings {
            let before = self.settings.borrow().clone();
            let mut open = true;
            self.settings_window
                .show(ctx, &mut open, &mut self.settings.borrow_mut());
            self.show_settings = open;
            // Derived views read the settings, so rebuild them on change.
            if *self.settings.borrow() != before {
                self.store.refresh();
            }
        }

        if self.show_data_entry {
            let mut open = true;
            if let Some(dataset) = self.data_entry.show(ctx, &mut open) {
                self.store.replace(dataset);
            }
            self.show_data_entry = open;
        }

        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(file) = dropped_files.first() {
            if let Some(path) = &file.path {
                actions.push(Action::OpenPath(path.clone()));
            } else if let Some(bytes) = &file.bytes {
                self.load(CsvLoader::from_bytes(bytes, &file.name), None);
            }
        }

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.show_controls(ui, &mut actions));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            show_preview(ui, &self.preview.borrow());
            ui.separator();
            let chart = self.chart.borrow();
            self.chart_rect = match chart.as_ref() {
                Some(chart) => Some(chart_view::show(ui, chart)),
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label(egui::RichText::new("Pick columns and press Render").weak());
                    });
                    None
                }
            };
        });

        if let Some(message) = self.notice.clone() {
            let mut open = true;
            let mut dismissed = false;
            egui::Window::new("Notice")
                .open(&mut open)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(message.as_str());
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            if !open || dismissed {
                self.notice = None;
            }
        }

        for action in actions {
            self.perform(ctx, action);
        }
    }
}

fn apply_style(ctx: &egui::Context, theme: Theme) {
    match theme {
        Theme::System => {
            ctx.set_visuals(egui::Visuals::default());
        }
        Theme::Dark => {
            let mut visuals = egui::Visuals::dark();
            visuals.window_corner_radius = 8.0.into();
            visuals.widgets.noninteractive.bg_fill = egui::Color32::from_rgb(20, 20, 25);
            ctx.set_visuals(visuals);
        }
        Theme::Light => {
            ctx.set_visuals(egui::Visuals::light());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::chart::ChartData;
    use crate::backend::value::Scalar;

    fn dataset(columns: &[&str], rows: Vec<Vec<Scalar>>) -> Dataset {
        Dataset::new("t", columns.iter().map(|c| c.to_string()).collect(), rows)
    }

    #[test]
    fn test_preview_pads_ragged_rows() {
        let ds = dataset(
            &["a", "b"],
            vec![vec![Scalar::Text("x".into())], vec![Scalar::Number(1.0), Scalar::Number(2.0)]],
        );
        let preview = Preview::build(&ds, 1);
        assert_eq!(preview.rows, vec![vec!["x".to_string(), String::new()]]);
        assert_eq!(preview.hidden, Some(1));
    }

    #[test]
    fn test_selection_clamped_on_narrower_dataset() {
        let mut selection = Selection::new(3, 4);
        selection.sync(&dataset(&["a", "b"], vec![]));
        assert_eq!((selection.x, selection.y), (0, 1));

        selection.sync(&dataset(&["only"], vec![]));
        assert_eq!((selection.x, selection.y), (0, 0));
    }

    #[test]
    fn test_views_follow_store() -> anyhow::Result<()> {
        let mut store = DatasetStore::new();
        let insights: Rc<RefCell<Insights>> = Rc::default();
        {
            let insights = Rc::clone(&insights);
            store.subscribe(
                "insights",
                Box::new(move |ds: &Dataset| {
                    *insights.borrow_mut() = Insights::build(ds, &InferenceConfig::default());
                }),
            );
        }
        store.load_text("Region,Sales\nNorth,10\nSouth,20", "t", None)?;
        assert_eq!(insights.borrow().suggestions, vec![ChartKind::Bar, ChartKind::Pie]);
        Ok(())
    }

    fn rendered_store() -> anyhow::Result<(DatasetStore, Rc<RefCell<Option<ChartSpec>>>)> {
        let mut store = DatasetStore::new();
        let selection = Rc::new(RefCell::new(Selection::new(0, 1)));
        let chart: Rc<RefCell<Option<ChartSpec>>> = Rc::default();
        store.subscribe("column pickers", selection_subscriber(Rc::clone(&selection)));
        store.subscribe("chart", chart_subscriber(Rc::clone(&chart), selection));

        store.load_text("Region,Sales\nNorth,10\nSouth,20", "q1 sales", None)?;
        *chart.borrow_mut() = Some(build_chart(store.dataset(), ChartKind::Line, 0, 1)?);
        Ok((store, chart))
    }

    #[test]
    fn test_chart_rebuilt_on_reload() -> anyhow::Result<()> {
        let (mut store, chart) = rendered_store()?;
        assert_eq!(
            export_file_name(chart.borrow().as_ref(), store.dataset()),
            Ok("q1_sales_chart.png".to_string())
        );

        store.load_text("City,Temp,Rain\nOslo,3,1\nRome,18,0\nLima,20,0", "weather", None)?;
        let chart = chart.borrow();
        let chart = chart.as_ref().expect("chart kept");
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!(chart.x_label, "City");
        match &chart.data {
            ChartData::Axis { labels, datasets } => {
                assert_eq!(labels, &vec!["Oslo", "Rome", "Lima"]);
                assert_eq!(datasets[0].data, vec![3.0, 18.0, 20.0]);
            }
            other => panic!("unexpected shape {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_clear_drops_chart_and_blocks_export() -> anyhow::Result<()> {
        let (mut store, chart) = rendered_store()?;
        store.replace(Dataset::default());

        assert!(chart.borrow().is_none());
        assert_eq!(store.dataset().name, "Untitled");
        assert!(store.dataset().is_empty());
        assert_eq!(
            export_file_name(chart.borrow().as_ref(), store.dataset()),
            Err(PreconditionError::NoChart)
        );

        // A later two-column dataset does not bring the dropped chart back.
        store.load_text("a,b\nx,1", "again", None)?;
        assert!(chart.borrow().is_none());
        Ok(())
    }
}
