use eframe::egui;

use crate::backend::analysis::InferenceConfig;
use crate::backend::settings::{Settings, Theme};

const DELIMITERS: [(Option<char>, &str); 5] = [
    (None, "Auto-detect"),
    (Some(','), "Comma"),
    (Some(';'), "Semicolon"),
    (Some('\t'), "Tab"),
    (Some('|'), "Pipe"),
];

pub struct SettingsWindow {
    selected_tab: SettingsTab,
}

#[derive(PartialEq, Clone, Copy, Debug)]
enum SettingsTab {
    General,
    Theme,
}

impl Default for SettingsWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsWindow {
    pub fn new() -> Self {
        Self {
            selected_tab: SettingsTab::General,
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, open: &mut bool, settings: &mut Settings) {
        egui::Window::new("Settings")
            .open(open)
            .min_width(360.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.selectable_value(&mut self.selected_tab, SettingsTab::General, "General");
                    ui.selectable_value(&mut self.selected_tab, SettingsTab::Theme, "Theme");
                });
                ui.separator();

                match self.selected_tab {
                    SettingsTab::General => Self::show_general(ui, settings),
                    SettingsTab::Theme => Self::show_theme(ui, settings),
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save Settings").clicked() {
                        if let Err(e) = settings.save() {
                            log::warn!("could not save settings: {:#}", e);
                        }
                    }
                    if ui.button("Reset to Defaults").clicked() {
                        let recent = std::mem::take(&mut settings.recent_files);
                        *settings = Settings {
                            recent_files: recent,
                            ..Settings::default()
                        };
                    }
                });
            });
    }

    fn show_general(ui: &mut egui::Ui, settings: &mut Settings) {
        ui.heading("Loading");
        let current = DELIMITERS
            .iter()
            .find(|(d, _)| *d == settings.delimiter)
            .map(|(_, name)| *name)
            .unwrap_or("Custom");
        egui::ComboBox::from_id_salt("delimiter_selector")
            .selected_text(current)
            .show_ui(ui, |ui| {
                for (delimiter, name) in DELIMITERS {
                    ui.selectable_value(&mut settings.delimiter, delimiter, name);
                }
            });

        ui.separator();
        ui.heading("Preview");
        ui.add(egui::Slider::new(&mut settings.preview_rows, 1..=100).text("Rows shown"));

        ui.separator();
        ui.heading("Type Inference");
        let inference: &mut InferenceConfig = &mut settings.inference;
        ui.add(egui::Slider::new(&mut inference.sample_window, 1..=1000).text("Sample window (rows)"));
        ui.add(
            egui::Slider::new(&mut inference.numeric_threshold, 0.0..=1.0)
                .text("Numeric threshold")
                .fixed_decimals(2),
        );
        ui.label(
            egui::RichText::new("A column is numeric when more than this share of sampled cells are numbers.")
                .weak()
                .small(),
        );

        ui.separator();
        ui.heading("Recent Files");
        ui.add(egui::Slider::new(&mut settings.max_recent_files, 1..=20).text("Max Recent Files"));
        if ui.button("Clear Recent Files").clicked() {
            settings.recent_files.clear();
        }
    }

    fn show_theme(ui: &mut egui::Ui, settings: &mut Settings) {
        ui.heading("Built-in Themes");
        egui::ComboBox::from_id_salt("theme_selector")
            .selected_text(settings.theme.name())
            .show_ui(ui, |ui| {
                for theme in Theme::all() {
                    ui.selectable_value(&mut settings.theme, *theme, theme.name());
                }
            });
    }
}
