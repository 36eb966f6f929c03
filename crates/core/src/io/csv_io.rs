//! CSV reading and writing
//!
//! Input is the resampler's daily table: a header row, a leading row-label
//! column (date or day index, ignored) and one column per sample. Empty
//! cells and `NA`/`NaN`/`null` are undefined days.
//!
//! Outputs are flat tables with named columns; undefined values are
//! written as empty fields and dates as `YYYY-MM-DD`.

use crate::error::{Error, Result};
use crate::series::NdviMatrix;
use crate::table::{EventTable, MetricsTable};
use ndarray::ArrayView2;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Read a daily NDVI matrix from a CSV file
pub fn read_ndvi_csv<P: AsRef<Path>>(path: P) -> Result<NdviMatrix> {
    let file = File::open(path.as_ref())?;
    read_ndvi_from_reader(file)
}

/// Read a daily NDVI matrix from any reader
pub fn read_ndvi_from_reader<R: Read>(reader: R) -> Result<NdviMatrix> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.len() < 2 {
        return Err(Error::InvalidDimensions {
            days: 0,
            samples: headers.len().saturating_sub(1),
        });
    }

    let names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        for (col, cell) in record.iter().skip(1).enumerate() {
            let v = parse_cell(cell).ok_or_else(|| {
                Error::Other(format!(
                    "row {}, column '{}': invalid value '{}'",
                    row + 1,
                    names[col],
                    cell
                ))
            })?;
            columns[col].push(v);
        }
    }

    NdviMatrix::from_columns(names, columns)
}

fn parse_cell(cell: &str) -> Option<f64> {
    match cell.to_ascii_lowercase().as_str() {
        "" | "na" | "nan" | "null" | "none" => Some(f64::NAN),
        s => s.parse::<f64>().ok(),
    }
}

/// Write a metrics table to a CSV file
pub fn write_metrics_csv<P: AsRef<Path>>(table: &MetricsTable, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_metrics_to_writer(table, file)
}

/// Write a metrics table to any writer
pub fn write_metrics_to_writer<W: Write>(table: &MetricsTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in table.rows() {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct EventRecord<'a> {
    sample_id: &'a str,
    event_name: String,
    date: Option<String>,
    value: Option<f64>,
}

/// Write event tables (detected events, then derived rows) to a CSV file
pub fn write_events_csv<'a, I, P>(tables: I, path: P) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a EventTable)>,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    write_events_to_writer(tables, file)
}

/// Write event tables to any writer
pub fn write_events_to_writer<'a, I, W>(tables: I, writer: W) -> Result<()>
where
    I: IntoIterator<Item = (&'a str, &'a EventTable)>,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    // Header is emitted by the first record; an empty batch still gets one.
    let mut wrote_any = false;

    for (sample_id, table) in tables {
        for event in table.events() {
            wtr.serialize(EventRecord {
                sample_id,
                event_name: event.kind.to_string(),
                date: event.date.map(|d| d.format("%Y-%m-%d").to_string()),
                value: event.value,
            })?;
            wrote_any = true;
        }
        for row in table.derived() {
            wtr.serialize(EventRecord {
                sample_id,
                event_name: row.description(),
                date: None,
                value: row.value,
            })?;
            wrote_any = true;
        }
    }

    if !wrote_any {
        wtr.write_record(["sample_id", "event_name", "date", "value"])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a (day, sample) baseline matrix to a CSV file
pub fn write_baselines_csv<P: AsRef<Path>>(
    names: &[String],
    data: ArrayView2<'_, f64>,
    path: P,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_baselines_to_writer(names, data, file)
}

/// Write a (day, sample) baseline matrix to any writer
pub fn write_baselines_to_writer<W: Write>(
    names: &[String],
    data: ArrayView2<'_, f64>,
    writer: W,
) -> Result<()> {
    if data.ncols() != names.len() {
        return Err(Error::InvalidDimensions {
            days: data.nrows(),
            samples: names.len(),
        });
    }

    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = Vec::with_capacity(names.len() + 1);
    header.push("day".to_string());
    header.extend(names.iter().cloned());
    wtr.write_record(&header)?;

    for (day, row) in data.outer_iter().enumerate() {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(day.to_string());
        record.extend(row.iter().map(|v| if v.is_finite() { v.to_string() } else { String::new() }));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
