use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

/// Read a CSV record table: one record per row, every cell an f64, all rows
/// the same width.
pub fn read_record_table(path: &Path, has_header: bool) -> Result<Vec<Vec<f64>>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("reading row {}", row + 1))?;
        let mut samples = Vec::with_capacity(record.len());
        for (col, cell) in record.iter().enumerate() {
            let val: f64 = cell.trim().parse().with_context(|| {
                format!("row {}, column {} is not f64: {}", row + 1, col + 1, cell)
            })?;
            samples.push(val);
        }
        records.push(samples);
    }
    if records.is_empty() {
        anyhow::bail!("no records found in {}", path.display());
    }

    let width = records[0].len();
    if let Some(row) = records.iter().position(|r| r.len() != width) {
        anyhow::bail!(
            "row {} has {} samples, the rest have {}",
            row + 1,
            records[row].len(),
            width
        );
    }
    Ok(records)
}
