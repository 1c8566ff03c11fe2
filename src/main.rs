#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

pub mod backend;
pub mod gui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use crate::backend::analysis::{ColumnAnalyzer, ColumnProfile};
use crate::backend::chart::build_chart;
use crate::backend::cleaning::{CleanOptions, CleanStep};
use crate::backend::insights::{ChartKind, suggest_chart_types, summarize};
use crate::backend::loader::{CsvLoader, RawInput};
use crate::backend::settings::Settings;
use crate::backend::store::DatasetStore;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the delimited file to open
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Start with the bundled sample dataset
    #[arg(long, conflicts_with = "file")]
    sample: bool,

    /// Print the analysis to stdout instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Index of the category column
    #[arg(short = 'x', long = "x-column", default_value_t = 0)]
    x: usize,

    /// Index of the value column
    #[arg(short = 'y', long = "y-column", default_value_t = 1)]
    y: usize,

    /// Cleaning steps to run after loading (repeatable)
    #[arg(long, value_enum)]
    clean: Vec<CleanStep>,

    /// In headless mode, also print this chart's data as JSON
    #[arg(long, value_enum)]
    chart: Option<ChartKind>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = Settings::load();
    let clean_options = CleanOptions::from_steps(&args.clean);

    let input = match (&args.file, args.sample) {
        (Some(path), _) => {
            log::info!("loading file: {:?}", path);
            Some((CsvLoader::from_path(path)?, Some(path.clone())))
        }
        (None, true) => Some((CsvLoader::sample(), None)),
        (None, false) => None,
    };

    if args.headless {
        let (input, _) = input.context("--headless needs --file or --sample")?;
        return report(&input, &args, &settings, clean_options);
    }

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let selection = (args.x, args.y);
    eframe::run_native(
        "CSVplot",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(crate::gui::app::GuiApp::new(
                cc,
                settings,
                input,
                clean_options,
                selection,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}

/// Headless rendition of the side panel: profile, suggestions, statistics.
fn report(input: &RawInput, args: &Args, settings: &Settings, clean_options: CleanOptions) -> Result<()> {
    let mut store = DatasetStore::new();
    store.load_text(&input.text, &input.name, settings.delimiter_byte())?;
    if clean_options != CleanOptions::default() {
        store.clean(clean_options);
    }
    let dataset = store.dataset();

    println!("{}", dataset.preview_text(settings.preview_rows));

    let profiles = ColumnAnalyzer::profile(dataset, &settings.inference);
    println!("Columns:");
    for p in &profiles {
        println!("  {}", profile_line(p));
    }

    let numeric = ColumnAnalyzer::numeric_columns(dataset, &settings.inference);
    let suggestions = suggest_chart_types(dataset, &numeric);
    println!();
    if suggestions.is_empty() {
        println!("No suggestions yet. Add more numeric columns.");
    }
    for kind in &suggestions {
        println!("Suggested: {}", kind.name());
    }

    println!();
    match summarize(dataset, args.x, args.y) {
        Some(stats) => {
            for line in stats.lines() {
                println!("{}", line);
            }
        }
        None => println!("No numeric values for columns {} and {}", args.x, args.y),
    }

    if let Some(kind) = args.chart {
        let chart = build_chart(dataset, kind, args.x, args.y)?;
        println!();
        println!("{}", serde_json::to_string_pretty(&chart.data)?);
    }

    Ok(())
}

/// Counts use the same names as the side panel's profile grid.
fn profile_line(p: &ColumnProfile) -> String {
    let share = p
        .numeric_ratio()
        .map(|r| format!("{:.0}%", r * 100.0))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "[{}] {}: {} (seen {}, numeric {}, numeric share {}, empty {}, distinct {})",
        p.column_index,
        p.header,
        p.kind.name(),
        p.seen,
        p.numeric,
        share,
        p.empty_count,
        p.unique_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from([
            "csvplot", "--sample", "--headless", "-x", "2", "--clean", "trim", "--clean", "drop-empty",
            "--chart", "scatter",
        ]);
        assert!(args.sample);
        assert_eq!(args.x, 2);
        assert_eq!(args.y, 1);
        assert_eq!(args.clean, vec![CleanStep::Trim, CleanStep::DropEmpty]);
        assert_eq!(args.chart, Some(ChartKind::Scatter));
    }

    #[test]
    fn test_file_and_sample_conflict() {
        assert!(Args::try_parse_from(["csvplot", "--sample", "--file", "a.csv"]).is_err());
    }

    #[test]
    fn test_report_runs_on_sample() -> Result<()> {
        let args = Args::parse_from(["csvplot", "--sample", "--headless", "--chart", "pie"]);
        report(&CsvLoader::sample(), &args, &Settings::default(), CleanOptions::default())
    }

    #[test]
    fn test_profile_line_counts_and_share() -> Result<()> {
        let mut store = DatasetStore::new();
        let sample = CsvLoader::sample();
        store.load_text(&sample.text, &sample.name, None)?;
        let profiles = ColumnAnalyzer::profile(store.dataset(), &Default::default());

        assert_eq!(
            profile_line(&profiles[1]),
            "[1] Sales: Numeric (seen 12, numeric 12, numeric share 100%, empty 0, distinct 12)"
        );
        assert_eq!(
            profile_line(&profiles[0]),
            "[0] Product: Categorical (seen 12, numeric 0, numeric share 0%, empty 0, distinct 4)"
        );
        Ok(())
    }
}
