//! CSV data loading implementation.

use std::path::{Path, PathBuf};

use anyhow::Context;
use charter_core::Candle;

use crate::DataSource;

/// Loads candle data from CSV files.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DataSource for CsvLoader {
    fn load(&self) -> anyhow::Result<Vec<Candle>> {
        load_candles_from_csv(&self.path)
    }
}

/// Load candles from a CSV file with a header row.
///
/// Columns are located by name (`time`/`timestamp`, `open`, `high`, `low`,
/// `close`, optional `volume`), falling back to that positional order.
/// Millisecond timestamps are normalised to seconds and rows are sorted by
/// time; an empty volume cell means "no volume".
pub fn load_candles_from_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Candle>> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    read_candles(reader)
}

/// Parse candles from in-memory CSV text.
pub fn parse_candles_csv(text: &str) -> anyhow::Result<Vec<Candle>> {
    let reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    read_candles(reader)
}

fn read_candles<R: std::io::Read>(mut reader: csv::Reader<R>) -> anyhow::Result<Vec<Candle>> {
    // Detect format from headers
    let headers = reader.headers()?.clone();
    let headers_lower: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

    // Find column indices
    let ts_col = headers_lower
        .iter()
        .position(|h| h.contains("timestamp") || h == "time")
        .unwrap_or(0);
    let open_col = headers_lower.iter().position(|h| h == "open").unwrap_or(1);
    let high_col = headers_lower.iter().position(|h| h == "high").unwrap_or(2);
    let low_col = headers_lower.iter().position(|h| h == "low").unwrap_or(3);
    let close_col = headers_lower.iter().position(|h| h == "close").unwrap_or(4);
    let volume_col = headers_lower.iter().position(|h| h == "volume");

    let mut candles = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let field = |col: usize, name: &str| -> anyhow::Result<f64> {
            record
                .get(col)
                .with_context(|| format!("row {}: missing {} column", row + 1, name))?
                .parse::<f64>()
                .with_context(|| format!("row {}: bad {} value", row + 1, name))
        };

        let mut time = field(ts_col, "time")? as i64;
        // Detect milliseconds (13+ digits) vs seconds (10 digits)
        if time > 1_000_000_000_000 {
            time /= 1000;
        }

        let volume = match volume_col {
            Some(col) if record.get(col).is_some_and(|cell| !cell.is_empty()) => {
                Some(field(col, "volume")?)
            }
            _ => None,
        };

        candles.push(Candle::new(
            time,
            field(open_col, "open")?,
            field(high_col, "high")?,
            field(low_col, "low")?,
            field(close_col, "close")?,
            volume,
        ));
    }

    // Sort by timestamp to ensure chronological order
    candles.sort_by_key(|c| c.time);
    log::debug!("Parsed {} candles from CSV", candles.len());

    Ok(candles)
}
