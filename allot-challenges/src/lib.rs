use anyhow::{anyhow, Context, Result};
use std::{fmt::Display, fs, path::Path, str::FromStr};

pub mod ampl;
pub mod classroom;
pub mod transport;

pub use ampl::AmplInstance;

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create folder {}", parent.display()))?;
        }
    }
    Ok(())
}

fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open instance {}", path.display()))?;
    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("Failed to read row {} of {}", i + 1, path.display()))?;
        rows.push(record.iter().map(|field| field.trim().to_string()).collect());
    }
    Ok(rows)
}

fn write_rows(path: &Path, rows: &[Vec<String>]) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to create instance {}", path.display()))?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Parses the first `count` fields of a row. Trailing fields must be empty padding.
fn parse_fields<T>(rows: &[Vec<String>], row: usize, count: usize, what: &str) -> Result<Vec<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let fields = rows
        .get(row)
        .ok_or_else(|| anyhow!("Missing row {} ({})", row + 1, what))?;
    if fields.len() < count {
        return Err(anyhow!(
            "Row {} ({}) has {} fields, expected {}",
            row + 1,
            what,
            fields.len(),
            count
        ));
    }
    if let Some(extra) = fields[count..].iter().find(|f| !f.is_empty()) {
        return Err(anyhow!(
            "Row {} ({}) has unexpected trailing field '{}'",
            row + 1,
            what,
            extra
        ));
    }
    fields[..count]
        .iter()
        .enumerate()
        .map(|(col, field)| {
            field.parse::<T>().map_err(|e| {
                anyhow!(
                    "Row {} ({}), column {}: invalid value '{}': {}",
                    row + 1,
                    what,
                    col + 1,
                    field,
                    e
                )
            })
        })
        .collect()
}

fn check_range<T: PartialOrd + Display>(name: &str, min: T, max: T) -> Result<()> {
    if min > max {
        Err(anyhow!("Invalid {} range [{}, {}]", name, min, max))
    } else {
        Ok(())
    }
}
