//! Delimited-text ingest into a polars frame with per-column type inference.

use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{DataFrame, NamedFrom, Series};
use tracing::info;

/// Inferred storage type of a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Text,
}

/// Type shared by every non-empty cell: integer, else float, else text.
pub fn infer_type<'a, I>(cells: I) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ty = ColumnType::Int;
    for cell in cells.into_iter().filter(|c| !c.is_empty()) {
        if ty == ColumnType::Int && cell.parse::<i64>().is_err() {
            ty = ColumnType::Float;
        }
        if ty == ColumnType::Float && cell.parse::<f64>().is_err() {
            return ColumnType::Text;
        }
    }
    ty
}

/// Read a headered delimited file. Cells equal to one of `null_values` are
/// blanked before typing; blank cells become nulls in numeric columns and
/// empty strings in text columns.
pub fn read_csv(path: &Path, delimiter: u8, null_values: &[&str]) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (line, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("reading record {} of {}", line + 1, path.display()))?;
        for (idx, column) in cells.iter_mut().enumerate() {
            let cell = record.get(idx).unwrap_or_default();
            let cell = if null_values.contains(&cell) { "" } else { cell };
            column.push(cell.to_string());
        }
    }

    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, values)| build_series(name, values))
        .collect::<Vec<_>>();
    let df = DataFrame::new(columns).with_context(|| format!("framing {}", path.display()))?;
    info!(path = %path.display(), rows = df.height(), columns = df.width(), "loaded csv");
    Ok(df)
}

fn build_series(name: &str, values: Vec<String>) -> Series {
    match infer_type(values.iter().map(String::as_str)) {
        ColumnType::Int => Series::new(
            name.into(),
            values
                .iter()
                .map(|v| v.parse::<i64>().ok())
                .collect::<Vec<_>>(),
        ),
        ColumnType::Float => Series::new(
            name.into(),
            values
                .iter()
                .map(|v| v.parse::<f64>().ok())
                .collect::<Vec<_>>(),
        ),
        ColumnType::Text => Series::new(name.into(), values),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_widens_int_to_float_to_text() {
        assert_eq!(infer_type(["1", "", "2"]), ColumnType::Int);
        assert_eq!(infer_type(["1", "2.5"]), ColumnType::Float);
        assert_eq!(infer_type(["1", "yes"]), ColumnType::Text);
        assert_eq!(infer_type(["yes", "1"]), ColumnType::Text);
    }
}
