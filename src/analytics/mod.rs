// src/analytics/mod.rs

pub mod bundle;

pub use bundle::{GraphSeries, Graphs, StatisticsBundle};

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::process::CanonicalTable;
use crate::schema::Field;

/// Arithmetic mean of the numeric cells of `field`.
/// `None` when the column is absent or holds no numbers.
pub fn average(table: &CanonicalTable, field: Field) -> Option<f64> {
    let Some(cells) = table.column(field) else {
        debug!(field = %field, "average: column absent");
        return None;
    };
    let (sum, count) = cells
        .iter()
        .filter_map(|c| c.as_number())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        debug!(field = %field, "average: no numeric values");
        return None;
    }
    Some(sum / count as f64)
}

/// Occurrences of each distinct non-missing value of `field`.
pub fn status_counts(table: &CanonicalTable, field: Field) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    let Some(cells) = table.column(field) else {
        debug!(field = %field, "status counts: column absent");
        return counts;
    };
    for label in cells.iter().filter_map(|c| c.to_text()) {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

/// Pair `x_field` with `transform(x, y)` for every row where both fields are
/// numbers. Rows for which `transform` yields `None` are dropped as well.
pub fn graph_series<F>(
    table: &CanonicalTable,
    x_field: Field,
    y_field: Field,
    transform: F,
) -> GraphSeries
where
    F: Fn(f64, f64) -> Option<f64>,
{
    let (Some(xs), Some(ys)) = (table.column(x_field), table.column(y_field)) else {
        debug!(x = %x_field, y = %y_field, "graph series: column absent");
        return GraphSeries::default();
    };
    xs.iter()
        .zip(ys)
        .filter_map(|(x, y)| {
            let x = x.as_number()?;
            let y = transform(x, y.as_number()?)?;
            Some((x, y))
        })
        .collect()
}

/// Price divided by area; a zero area leaves the row out rather than plotting infinity.
pub fn price_per_area(area: f64, price: f64) -> Option<f64> {
    if area == 0.0 {
        return None;
    }
    let v = price / area;
    v.is_finite().then_some(v)
}

/// Price per square foot against living area.
pub fn graph_sqft_price(table: &CanonicalTable) -> GraphSeries {
    graph_series(table, Field::LivingArea, Field::SoldPrice, price_per_area)
}

/// Sold price against days on market.
pub fn graph_sold_price_dom(table: &CanonicalTable) -> GraphSeries {
    graph_series(table, Field::Dom, Field::SoldPrice, |_, price| Some(price))
}

/// Builds a [`StatisticsBundle`] from a cleaned table and its uncleaned twin.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Averages and graphs come from `cleaned`; status counts come from
    /// `uncleaned` so that numeric cleaning can never touch the categories.
    #[tracing::instrument(level = "info", skip_all, fields(rows = cleaned.num_rows()))]
    pub fn calculate_statistics(
        &self,
        cleaned: &CanonicalTable,
        uncleaned: &CanonicalTable,
    ) -> StatisticsBundle {
        let averages = Field::NUMERIC
            .iter()
            .map(|&f| (f, average(cleaned, f)))
            .collect();

        let bundle = StatisticsBundle {
            averages,
            status_counts: status_counts(uncleaned, Field::Status),
            graphs: Graphs {
                sqft_price: graph_sqft_price(cleaned),
                sold_price_dom: graph_sold_price_dom(cleaned),
            },
        };

        info!(
            statuses = bundle.status_counts.len(),
            sqft_points = bundle.graphs.sqft_price.len(),
            dom_points = bundle.graphs.sold_price_dom.len(),
            "statistics calculated"
        );
        bundle
    }
}
