//! Materialization of result batches into row-major tables.
//!
//! A batch is realized eagerly: every cell is decoded up front and the whole
//! page is buffered in memory. Batches are bounded by the session's fetch
//! size, so no streaming is attempted here.

use crate::error::DecodeError;
use crate::protocol::types::{ColumnDescriptor, RowSet};
use crate::value::{self, Value};

/// DB-API style description of one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescription {
    pub name: String,
    /// Textual name of the declared SQL type, e.g. `"INTEGER"`.
    pub type_name: String,
    pub display_size: Option<i32>,
    pub internal_size: Option<i32>,
    pub precision: Option<i32>,
    /// Reported as always nullable.
    pub nullable: bool,
}

/// One fully decoded result page.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultBuffer {
    pub rows: Vec<Vec<Value>>,
    pub description: Vec<ColumnDescription>,
}

impl ResultBuffer {
    /// An empty buffer with no columns.
    pub fn empty() -> Self {
        ResultBuffer {
            rows: Vec::new(),
            description: Vec::new(),
        }
    }
}

/// Decodes every cell of `batch` in column order and returns the rows
/// together with the column descriptions.
///
/// Materializing the same immutable batch twice yields identical output.
///
/// # Errors
///
/// Returns [`DecodeError`] when a cell is structurally malformed.
pub fn materialize(batch: &RowSet) -> Result<ResultBuffer, DecodeError> {
    let description = batch.metadata.iter().map(describe_column).collect();

    let mut rows = Vec::with_capacity(batch.rows.len());
    for row in &batch.rows {
        let mut decoded = Vec::with_capacity(row.values.len());
        for (cell, descriptor) in row.values.iter().zip(&batch.metadata) {
            decoded.push(value::decode(cell, descriptor)?);
        }
        rows.push(decoded);
    }

    Ok(ResultBuffer { rows, description })
}

fn describe_column(descriptor: &ColumnDescriptor) -> ColumnDescription {
    ColumnDescription {
        name: descriptor.name.clone(),
        type_name: descriptor.sql_type.to_string(),
        display_size: None,
        internal_size: None,
        precision: descriptor.precision,
        nullable: true,
    }
}
