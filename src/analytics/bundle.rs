use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::Field;

/// Paired scatter coordinates; `x[i]` always belongs with `y[i]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSeries {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl GraphSeries {
    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

impl FromIterator<(f64, f64)> for GraphSeries {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        let mut series = GraphSeries::default();
        for (x, y) in iter {
            series.push(x, y);
        }
        series
    }
}

/// The two scatter datasets of the report.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graphs {
    /// Price per square foot (y) against living area (x).
    #[serde(rename = "Sqft/Price")]
    pub sqft_price: GraphSeries,
    /// Sold price (y) against days on market (x).
    #[serde(rename = "Sold Price/DOM")]
    pub sold_price_dom: GraphSeries,
}

/// Everything the presentation layer needs for one uploaded table.
///
/// An average of `None` (JSON `null`) means the field was absent or had no
/// numeric values; it is never conflated with a real zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatisticsBundle {
    pub averages: BTreeMap<Field, Option<f64>>,
    pub status_counts: BTreeMap<String, u64>,
    pub graphs: Graphs,
}

impl StatisticsBundle {
    pub fn average(&self, field: Field) -> Option<f64> {
        self.averages.get(&field).copied().flatten()
    }
}
