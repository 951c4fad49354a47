// src/process/mod.rs

pub mod arrow;
pub mod canonical;
pub mod raw_table;
pub mod utils;

pub use canonical::CanonicalTable;
pub use raw_table::{Cell, RawTable};

use crate::schema::{ColumnLocator, Field, FieldSpec};
use tracing::{debug, info};

/// Everything one clean pass produces for a table.
#[derive(Debug, Clone)]
pub struct CleanedListings {
    pub locator: ColumnLocator,
    /// Canonical columns as they appeared in the source, before numeric cleaning.
    pub uncleaned: CanonicalTable,
    pub cleaned: CanonicalTable,
}

/// Maps external listing exports onto canonical fields and cleans numeric columns.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    spec: FieldSpec,
}

impl Formatter {
    pub fn new(spec: FieldSpec) -> Self {
        Self { spec }
    }

    pub fn locate_columns(&self, table: &RawTable) -> ColumnLocator {
        ColumnLocator::locate(table, &self.spec)
    }

    /// Locate, copy into canonical form, then coerce `Field::NUMERIC` columns.
    #[tracing::instrument(level = "info", skip_all, fields(rows = raw.num_rows(), columns = raw.num_columns()))]
    pub fn clean(&self, raw: &RawTable) -> CleanedListings {
        let locator = self.locate_columns(raw);
        let uncleaned = build_canonical_table(raw, &locator);
        let cleaned = normalize_numeric_columns(uncleaned.clone(), &Field::NUMERIC);
        info!(
            located = uncleaned.num_columns(),
            absent = locator.absent().len(),
            "listings cleaned"
        );
        CleanedListings {
            locator,
            uncleaned,
            cleaned,
        }
    }
}

/// Copy every located column out of `table` under its canonical name.
/// Row order and count match the input; unlocated fields are left out.
pub fn build_canonical_table(table: &RawTable, locator: &ColumnLocator) -> CanonicalTable {
    let mut out = CanonicalTable::new(table.num_rows());
    for (field, idx) in locator.located() {
        out.insert(field, table.column(idx));
    }
    out
}

/// Coerce each listed field that is present to numbers; other columns are untouched.
pub fn normalize_numeric_columns(mut table: CanonicalTable, fields: &[Field]) -> CanonicalTable {
    for &field in fields {
        let Some(cells) = table.column_mut(field) else {
            debug!(field = %field, "numeric column not present, skipping");
            continue;
        };
        let mut unparsable = 0usize;
        for cell in cells.iter_mut() {
            let cleaned = utils::clean_numeric(cell);
            if cleaned.is_missing() && !cell.is_missing() {
                unparsable += 1;
            }
            *cell = cleaned;
        }
        if unparsable > 0 {
            debug!(field = %field, unparsable, "values could not be reduced to numbers");
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Cursor;

    fn sample() -> Result<RawTable> {
        let content = "\
Centris No.,ST,Living Area (Imperial),DOM,Sold / Rented Price,Notes
1001,Sold,\"1,200 sqft\",N/A,\"$300,000\",corner lot
1002,Active,900,14,,
1003,Sold,12.3.4,7,\"$150,000\",x
";
        RawTable::from_csv_reader(Cursor::new(content))
    }

    #[test]
    fn canonical_table_keeps_only_located_fields() -> Result<()> {
        crate::init_test_logging();
        let raw = sample()?;
        let fmt = Formatter::default();
        let loc = fmt.locate_columns(&raw);
        let table = build_canonical_table(&raw, &loc);

        let fields: Vec<Field> = table.fields().collect();
        assert_eq!(
            fields,
            vec![Field::Id, Field::Dom, Field::LivingArea, Field::SoldPrice, Field::Status]
        );
        assert_eq!(table.num_rows(), raw.num_rows());
        assert!(!table.contains(Field::Bedrooms));
        assert_eq!(
            table.column(Field::Status),
            Some(&[Cell::from("Sold"), Cell::from("Active"), Cell::from("Sold")][..])
        );
        Ok(())
    }

    #[test]
    fn clean_normalizes_designated_columns_only() -> Result<()> {
        crate::init_test_logging();
        let raw = sample()?;
        let out = Formatter::default().clean(&raw);

        assert_eq!(
            out.cleaned.column(Field::LivingArea),
            Some(&[Cell::Number(1200.0), Cell::Number(900.0), Cell::Missing][..])
        );
        assert_eq!(
            out.cleaned.column(Field::Dom),
            Some(&[Cell::Missing, Cell::Number(14.0), Cell::Number(7.0)][..])
        );
        assert_eq!(
            out.cleaned.column(Field::SoldPrice),
            Some(&[Cell::Number(300_000.0), Cell::Missing, Cell::Number(150_000.0)][..])
        );
        // ID is not designated numeric, so it keeps its original typing.
        assert_eq!(out.cleaned.column(Field::Id), out.uncleaned.column(Field::Id));
        assert_eq!(out.cleaned.column(Field::Status), out.uncleaned.column(Field::Status));
        assert_eq!(
            out.uncleaned.column(Field::LivingArea).map(|c| c[0].clone()),
            Some(Cell::Text("1,200 sqft".into()))
        );
        Ok(())
    }

    #[test]
    fn normalizing_twice_changes_nothing() -> Result<()> {
        let raw = sample()?;
        let once = Formatter::default().clean(&raw).cleaned;
        let twice = normalize_numeric_columns(once.clone(), &Field::NUMERIC);
        assert_eq!(once, twice);
        Ok(())
    }

    #[test]
    fn empty_table_produces_empty_columns() -> Result<()> {
        let raw = RawTable::from_csv_reader(Cursor::new("ST,DOM\n"))?;
        let out = Formatter::default().clean(&raw);
        assert_eq!(out.cleaned.num_rows(), 0);
        assert_eq!(out.cleaned.column(Field::Dom), Some(&[] as &[Cell]));
        Ok(())
    }

    #[test]
    fn custom_profile_remaps_columns() -> Result<()> {
        let spec = FieldSpec::new([(Field::LivingArea, "Superficie"), (Field::Status, "Statut")])?;
        let raw = RawTable::from_csv_reader(Cursor::new("Statut,Superficie\nVendu,1 500 pi\n"))?;
        let out = Formatter::new(spec).clean(&raw);
        assert_eq!(out.cleaned.num_columns(), 2);
        assert_eq!(out.cleaned.column(Field::LivingArea), Some(&[Cell::Number(1500.0)][..]));
        Ok(())
    }
}
