//! Delimited-text ingestion of raw CPT readings
//!
//! Field files come in as CSV, tab-, semicolon- or whitespace-delimited
//! text, with or without a header row. The delimiter is sniffed from the
//! first line, header columns are matched by keyword (depth/z, qc/cone,
//! fs/sleeve, u2/pore), and headerless files fall back to the positional
//! convention depth, qc, fs, u2. Missing fs/u2 channels default to zero.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::io::IoError;
use crate::profile::RawSample;

const DEPTH_KEYWORDS: &[&str] = &["depth", "z", "elevation", "elev"];
const QC_KEYWORDS: &[&str] = &["qc", "cone", "resistance", "tip", "qt"];
const FS_KEYWORDS: &[&str] = &["fs", "sleeve", "friction"];
const U2_KEYWORDS: &[&str] = &["u2", "u", "pore", "pwp"];

/// Read raw samples from any delimited text source.
pub fn read_delimited<R: Read>(mut reader: R) -> Result<Vec<RawSample>, IoError> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    parse_delimited(&content)
}

/// Read raw samples from a delimited text file on disk.
pub fn read_delimited_file(path: impl AsRef<Path>) -> Result<Vec<RawSample>, IoError> {
    parse_delimited(&fs::read_to_string(path)?)
}

/// Parse delimited text into raw samples.
pub fn parse_delimited(content: &str) -> Result<Vec<RawSample>, IoError> {
    let first_line = content
        .lines()
        .find(|line| !line.trim().is_empty())
        .ok_or(IoError::Empty)?;

    let rows = match sniff_delimiter(first_line) {
        Some(delimiter) => split_with_csv(content, delimiter)?,
        None => split_on_whitespace(content),
    };
    if rows.is_empty() {
        return Err(IoError::Empty);
    }

    // A header row is one whose first field is not a number.
    let has_header = rows[0]
        .first()
        .is_none_or(|field| field.trim().parse::<f64>().is_err());

    let columns = if has_header {
        map_columns(&rows[0]).ok_or(IoError::MissingColumns)?
    } else {
        if rows[0].len() < 2 {
            return Err(IoError::TooFewColumns);
        }
        ColumnMap::positional(rows[0].len())
    };

    let data_rows = if has_header { &rows[1..] } else { &rows[..] };
    if data_rows.is_empty() {
        return Err(IoError::Empty);
    }

    let header_offset = if has_header { 2 } else { 1 };
    let mut samples = Vec::with_capacity(data_rows.len());
    for (i, row) in data_rows.iter().enumerate() {
        let line = i + header_offset;
        let depth = parse_field(row, columns.depth, line)?.ok_or_else(|| IoError::Parse {
            line,
            field: String::new(),
        })?;
        let qc = parse_field(row, columns.qc, line)?.ok_or_else(|| IoError::Parse {
            line,
            field: String::new(),
        })?;
        let fs = columns
            .fs
            .and_then(|c| parse_field(row, c, line).transpose())
            .transpose()?
            .unwrap_or(0.0);
        let u2 = columns
            .u2
            .and_then(|c| parse_field(row, c, line).transpose())
            .transpose()?
            .unwrap_or(0.0);
        samples.push(RawSample::new(depth, qc, fs, u2));
    }

    tracing::debug!(samples = samples.len(), "parsed delimited CPT file");
    Ok(samples)
}

/// Delimiter byte, or None for whitespace-separated files.
fn sniff_delimiter(first_line: &str) -> Option<u8> {
    if first_line.contains('\t') {
        Some(b'\t')
    } else if first_line.contains(',') {
        Some(b',')
    } else if first_line.contains(';') {
        Some(b';')
    } else {
        None
    }
}

fn split_with_csv(content: &str, delimiter: u8) -> Result<Vec<Vec<String>>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn split_on_whitespace(content: &str) -> Vec<Vec<String>> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    depth: usize,
    qc: usize,
    fs: Option<usize>,
    u2: Option<usize>,
}

impl ColumnMap {
    /// Headerless convention: depth, qc, fs, u2 in that order.
    fn positional(width: usize) -> Self {
        Self {
            depth: 0,
            qc: 1,
            fs: (width > 2).then_some(2),
            u2: (width > 3).then_some(3),
        }
    }
}

/// Match header names against the usual CPT column keywords. Each column is
/// assigned at most once, first match wins.
fn map_columns(header: &[String]) -> Option<ColumnMap> {
    let mut depth = None;
    let mut qc = None;
    let mut fs = None;
    let mut u2 = None;

    for (i, name) in header.iter().enumerate() {
        let lower = name.trim().to_lowercase();
        if depth.is_none() && matches_any(&lower, DEPTH_KEYWORDS) {
            depth = Some(i);
        } else if qc.is_none() && matches_any(&lower, QC_KEYWORDS) {
            qc = Some(i);
        } else if fs.is_none() && matches_any(&lower, FS_KEYWORDS) {
            fs = Some(i);
        } else if u2.is_none() && matches_any(&lower, U2_KEYWORDS) {
            u2 = Some(i);
        }
    }

    Some(ColumnMap {
        depth: depth?,
        qc: qc?,
        fs,
        u2,
    })
}

fn matches_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| name.contains(kw))
}

/// A field that exists parses to a number or errors; a field beyond the end
/// of a short row is simply absent.
fn parse_field(row: &[String], column: usize, line: usize) -> Result<Option<f64>, IoError> {
    match row.get(column) {
        None => Ok(None),
        Some(field) => field
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| IoError::Parse {
                line,
                field: field.clone(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_headered_comma_file() {
        let content = "Depth (m),qc (kPa),fs (kPa),u2 (kPa)\n\
                       0.5,1500.0,20.0,50.0\n\
                       1.0,1450.0,22.0,55.0\n";
        let samples = parse_delimited(content).unwrap();

        assert_eq!(samples.len(), 2);
        assert_relative_eq!(samples[0].depth, 0.5, epsilon = 1e-12);
        assert_relative_eq!(samples[1].qc, 1450.0, epsilon = 1e-12);
        assert_relative_eq!(samples[1].u2, 55.0, epsilon = 1e-12);
    }

    #[test]
    fn test_headerless_tab_file() {
        let content = "0.082\t127.73\t0.498\t6.461\n0.164\t168.15\t0.568\t7.543\n";
        let samples = parse_delimited(content).unwrap();

        assert_eq!(samples.len(), 2);
        assert_relative_eq!(samples[0].qc, 127.73, epsilon = 1e-12);
        assert_relative_eq!(samples[1].u2, 7.543, epsilon = 1e-12);
    }

    #[test]
    fn test_whitespace_separated_file() {
        let content = "0.5  800   8    0\n1.0  820   9    2\n";
        let samples = parse_delimited(content).unwrap();

        assert_eq!(samples.len(), 2);
        assert_relative_eq!(samples[1].fs, 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_two_column_file_defaults_missing_channels() {
        let content = "depth;cone resistance\n0.5;900\n1.0;910\n";
        let samples = parse_delimited(content).unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].fs, 0.0);
        assert_eq!(samples[0].u2, 0.0);
    }

    #[test]
    fn test_alternate_header_names() {
        let content = "Z,Tip Resistance,Sleeve Friction,Pore Pressure\n1.0,1200,15,30\n";
        let samples = parse_delimited(content).unwrap();

        assert_eq!(samples.len(), 1);
        assert_relative_eq!(samples[0].depth, 1.0, epsilon = 1e-12);
        assert_relative_eq!(samples[0].qc, 1200.0, epsilon = 1e-12);
        assert_relative_eq!(samples[0].fs, 15.0, epsilon = 1e-12);
        assert_relative_eq!(samples[0].u2, 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_unknown_headers() {
        let content = "alpha,beta\n1.0,2.0\n";
        assert!(matches!(
            parse_delimited(content),
            Err(IoError::MissingColumns)
        ));
    }

    #[test]
    fn test_rejects_empty_and_garbage() {
        assert!(matches!(parse_delimited("   \n\n"), Err(IoError::Empty)));
        assert!(matches!(
            parse_delimited("0.5,abc\n"),
            Err(IoError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_read_from_disk() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "depth,qc\n0.5,700\n1.0,720\n").unwrap();

        let samples = read_delimited_file(file.path()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_relative_eq!(samples[1].qc, 720.0, epsilon = 1e-12);
    }
}
