use crate::core::Storage;
use crate::domain::model::{Sample, Table};
use crate::utils::error::{AbError, Result};
use std::collections::HashSet;
use std::path::Path;

pub const PREVIEW_ROWS: usize = 5;

/// Parse a headed CSV document into a numeric table.
pub fn load_table(label: &str, data: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(AbError::invalid_sample(label, "the file has no header columns"));
    }

    let mut seen = HashSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(AbError::invalid_sample(
                label,
                format!("duplicate column name '{}'", header),
            ));
        }
    }

    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
    let mut preview = Vec::new();
    let mut row_count = 0;

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row_number = idx + 1;

        let mut row = Vec::with_capacity(headers.len());
        for (col, cell) in record.iter().enumerate() {
            let value = parse_cell(cell).ok_or_else(|| {
                AbError::invalid_sample(
                    label,
                    format!(
                        "column '{}' row {}: '{}' is not a number",
                        headers[col], row_number, cell
                    ),
                )
            })?;
            columns[col].push(value);
            row.push(value);
        }

        if preview.len() < PREVIEW_ROWS {
            preview.push(row);
        }
        row_count += 1;
    }

    tracing::debug!(
        "Loaded '{}': {} columns, {} rows",
        label,
        headers.len(),
        row_count
    );

    let columns = headers
        .iter()
        .zip(columns)
        .map(|(name, values)| Sample::new(format!("{}:{}", label, name), values))
        .collect();

    Ok(Table {
        label: label.to_string(),
        headers,
        preview,
        row_count,
        columns,
    })
}

fn parse_cell(cell: &str) -> Option<f64> {
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Read a CSV file through `storage` and label the table with its file name.
pub fn load_table_file<S: Storage>(storage: &S, path: &str) -> Result<Table> {
    let label = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path);

    tracing::debug!("Reading input file: {}", path);
    let data = storage.read_file(path)?;
    load_table(label, &data)
}
