use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

pub const SAMPLE_NAME: &str = "Sample Sales Data";
const SAMPLE_CSV: &str = include_str!("../../assets/sample.csv");

/// Raw delimited text plus the name it should be shown under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawInput {
    pub text: String,
    pub name: String,
}

pub struct CsvLoader;

impl CsvLoader {
    /// Reads a file from disk. The display name is the file name.
    pub fn from_path(path: &Path) -> Result<RawInput> {
        let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
        let len = file
            .metadata()
            .with_context(|| format!("Failed to stat file: {:?}", path))?
            .len();

        // Zero-length files cannot be mapped on every platform.
        let text = if len == 0 {
            String::new()
        } else {
            // Safety: the file is only read here and copied out before the map
            // is dropped; concurrent truncation by another process is not guarded.
            let mmap = unsafe { Mmap::map(&file).context("Failed to memory map file")? };
            Self::decode(&mmap)
        };

        Ok(RawInput {
            text,
            name: Self::display_name(path),
        })
    }

    /// Bytes handed over by a drop event that carries no path.
    pub fn from_bytes(bytes: &[u8], name: &str) -> RawInput {
        RawInput {
            text: Self::decode(bytes),
            name: name.to_string(),
        }
    }

    /// The dataset bundled with the binary.
    pub fn sample() -> RawInput {
        RawInput {
            text: SAMPLE_CSV.to_string(),
            name: SAMPLE_NAME.to_string(),
        }
    }

    fn decode(bytes: &[u8]) -> String {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn display_name(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::dataset::Dataset;
    use crate::backend::parser::CsvParser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_file() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "\u{feff}a,b\n1,2\n")?;

        let input = CsvLoader::from_path(file.path())?;
        assert_eq!(input.text, "a,b\n1,2\n");
        assert_eq!(
            Some(input.name.as_str()),
            file.path().file_name().and_then(|n| n.to_str())
        );
        Ok(())
    }

    #[test]
    fn test_empty_file() -> Result<()> {
        let file = NamedTempFile::new()?;
        let input = CsvLoader::from_path(file.path())?;
        assert!(input.text.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        assert!(CsvLoader::from_path(Path::new("/definitely/not/here.csv")).is_err());
    }

    #[test]
    fn test_sample_parses() -> Result<()> {
        let input = CsvLoader::sample();
        let ds = Dataset::from_records(&input.name, CsvParser::parse_records(&input.text, None)?);
        assert_eq!(ds.name, SAMPLE_NAME);
        assert!(ds.num_cols() >= 2);
        assert!(ds.num_rows() > 0);
        Ok(())
    }
}
