// src/schema/locate.rs

use std::collections::BTreeMap;
use tracing::debug;

use super::{Field, FieldSpec};
use crate::process::RawTable;

/// Where each canonical field sits in one particular input table.
/// Rebuilt for every table; `None` means the expected column was not there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLocator {
    positions: BTreeMap<Field, Option<usize>>,
}

impl ColumnLocator {
    /// Look up every canonical field's external name among the table's headers.
    /// The first matching header wins; absence is a normal outcome.
    pub fn locate(table: &RawTable, spec: &FieldSpec) -> Self {
        let positions = Field::ALL
            .iter()
            .map(|&field| {
                let pos = spec
                    .external_name(field)
                    .and_then(|ext| table.position(ext));
                if pos.is_none() {
                    debug!(field = %field, external = ?spec.external_name(field), "column absent");
                }
                (field, pos)
            })
            .collect();
        Self { positions }
    }

    pub fn position(&self, field: Field) -> Option<usize> {
        self.positions.get(&field).copied().flatten()
    }

    /// Located fields and their positions, in canonical order.
    pub fn located(&self) -> impl Iterator<Item = (Field, usize)> + '_ {
        self.positions
            .iter()
            .filter_map(|(f, pos)| pos.map(|p| (*f, p)))
    }

    pub fn absent(&self) -> Vec<Field> {
        self.positions
            .iter()
            .filter(|(_, pos)| pos.is_none())
            .map(|(f, _)| *f)
            .collect()
    }
}
