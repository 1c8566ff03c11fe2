use anyhow::Result;
use csv::ByteRecord;

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

pub struct CsvParser;

impl CsvParser {
    /// Reads every record of a delimited payload. Blank lines never produce a
    /// record and ragged records are accepted as-is.
    pub fn parse_records(text: &str, delimiter: Option<u8>) -> Result<Vec<Vec<String>>> {
        let text = text.trim();
        let delimiter = delimiter.unwrap_or_else(|| Self::sniff_delimiter(text));

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut records = Vec::new();
        let mut record = ByteRecord::new();
        while reader.read_byte_record(&mut record)? {
            let fields: Vec<String> = record
                .iter()
                .map(|f| String::from_utf8_lossy(f).into_owned())
                .collect();
            // The csv reader already drops empty lines; a lone empty field is
            // what a stray "\r" line leaves behind.
            if fields.len() == 1 && fields[0].is_empty() {
                continue;
            }
            records.push(fields);
        }

        Ok(records)
    }

    /// Picks the candidate delimiter seen most often outside quotes on the
    /// first record. Falls back to a comma.
    pub fn sniff_delimiter(text: &str) -> u8 {
        let mut counts = [0usize; CANDIDATE_DELIMITERS.len()];
        let mut in_quote = false;

        for &b in text.as_bytes() {
            match b {
                b'"' => in_quote = !in_quote,
                b'\n' if !in_quote => break,
                _ if !in_quote => {
                    if let Some(i) = CANDIDATE_DELIMITERS.iter().position(|&d| d == b) {
                        counts[i] += 1;
                    }
                }
                _ => {}
            }
        }

        // Ties keep the earlier candidate, so a delimiter-free line stays on ','.
        let (best, _) = counts
            .iter()
            .enumerate()
            .fold((0, 0), |best, (i, &n)| if n > best.1 { (i, n) } else { best });
        CANDIDATE_DELIMITERS[best]
    }
}
