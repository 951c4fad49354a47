use std::collections::BTreeMap;

use super::Cell;
use crate::schema::Field;

/// A table keyed by canonical fields. Only fields that were located in the
/// source are present, and every column has exactly `num_rows` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalTable {
    columns: BTreeMap<Field, Vec<Cell>>,
    num_rows: usize,
}

impl CanonicalTable {
    pub fn new(num_rows: usize) -> Self {
        Self {
            columns: BTreeMap::new(),
            num_rows,
        }
    }

    /// Insert or replace a column. Cells are padded with `Missing` or cut to the row count.
    pub fn insert(&mut self, field: Field, mut cells: Vec<Cell>) {
        cells.resize(self.num_rows, Cell::Missing);
        self.columns.insert(field, cells);
    }

    pub fn column(&self, field: Field) -> Option<&[Cell]> {
        self.columns.get(&field).map(Vec::as_slice)
    }

    pub(crate) fn column_mut(&mut self, field: Field) -> Option<&mut Vec<Cell>> {
        self.columns.get_mut(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    /// Present fields in canonical order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.columns.keys().copied()
    }

    pub fn columns(&self) -> impl Iterator<Item = (Field, &[Cell])> {
        self.columns.iter().map(|(f, c)| (*f, c.as_slice()))
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}
