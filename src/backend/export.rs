use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("static pattern"));

/// Suggested file name for an exported chart: every run of characters
/// outside `[A-Za-z0-9_]` collapses to one underscore.
pub fn chart_file_name(dataset_name: &str) -> String {
    format!("{}_chart.png", NON_WORD.replace_all(dataset_name, "_"))
}

/// Writes tightly packed RGBA8 pixels as a PNG.
pub fn write_png(path: &Path, rgba: &[u8], width: u32, height: u32) -> Result<()> {
    image::save_buffer_with_format(
        path,
        rgba,
        width,
        height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("Failed to write PNG: {:?}", path))?;
    log::info!("chart exported to {:?} ({}x{})", path, width, height);
    Ok(())
}
