// src/process/arrow.rs

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Float64Builder, StringBuilder},
    datatypes::{DataType, Field as ArrowField, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{fs::File, path::Path, sync::Arc};
use tracing::debug;

use super::{CanonicalTable, Cell};

/// `Float64` when every cell is a number or missing, otherwise `Utf8`.
fn column_type(cells: &[Cell]) -> DataType {
    if cells.iter().all(|c| !matches!(c, Cell::Text(_))) {
        DataType::Float64
    } else {
        DataType::Utf8
    }
}

/// Convert a canonical table into one Arrow batch, columns named by canonical field.
pub fn to_record_batch(table: &CanonicalTable) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.num_columns());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.num_columns());

    for (field, cells) in table.columns() {
        let ty = column_type(cells);
        match ty {
            DataType::Float64 => {
                let mut b = Float64Builder::with_capacity(cells.len());
                for cell in cells {
                    b.append_option(cell.as_number());
                }
                arrays.push(Arc::new(b.finish()) as ArrayRef);
            }
            _ => {
                let mut b = StringBuilder::new();
                for cell in cells {
                    b.append_option(cell.to_text());
                }
                arrays.push(Arc::new(b.finish()) as ArrayRef);
            }
        }
        fields.push(ArrowField::new(field.as_str(), ty, true));
    }

    let schema = Arc::new(Schema::new(fields));
    if arrays.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }
    RecordBatch::try_new(schema, arrays).context("building cleaned record batch")
}

/// Write the table to a single Snappy-compressed Parquet file.
#[tracing::instrument(level = "info", skip(table, path), fields(path = %path.as_ref().display()))]
pub fn write_parquet<P: AsRef<Path>>(table: &CanonicalTable, path: P) -> Result<()> {
    let batch = to_record_batch(table)?;
    let file = File::create(&path)
        .with_context(|| format!("creating parquet file {:?}", path.as_ref()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating Arrow writer for cleaned table")?;
    writer.write(&batch).context("writing cleaned batch")?;
    writer.close().context("closing parquet writer")?;
    debug!(rows = batch.num_rows(), columns = batch.num_columns(), "parquet written");
    Ok(())
}
