// src/report/mod.rs

pub mod write;

pub use write::write_json_atomic;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{info, warn};

use crate::analytics::{AnalyticsEngine, StatisticsBundle};
use crate::process::{arrow::write_parquet, CleanedListings, Formatter, RawTable};
use crate::schema::Field;

/// What gets handed to the presentation layer for one input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub row_count: usize,
    pub located_fields: Vec<Field>,
    pub missing_fields: Vec<Field>,
    pub statistics: StatisticsBundle,
}

/// Paths written for one input file.
#[derive(Debug, Clone)]
pub struct ReportOutputs {
    pub stats_json: PathBuf,
    /// `None` when no canonical column was found, so there was nothing to write.
    pub cleaned_parquet: Option<PathBuf>,
}

/// Run the whole pipeline on an in-memory table.
pub fn build_report(
    source: &str,
    raw: &RawTable,
    formatter: &Formatter,
) -> (ReportEnvelope, CleanedListings) {
    let listings = formatter.clean(raw);
    let statistics = AnalyticsEngine.calculate_statistics(&listings.cleaned, &listings.uncleaned);
    let envelope = ReportEnvelope {
        source: source.to_string(),
        generated_at: Utc::now(),
        row_count: raw.num_rows(),
        located_fields: listings.locator.located().map(|(f, _)| f).collect(),
        missing_fields: listings.locator.absent(),
        statistics,
    };
    (envelope, listings)
}

/// One output name per input, unique across the batch.
///
/// Inputs keep their file stem unless another input shares it; those are
/// prefixed with their parent directory name (`laval_listings`), and any
/// name still taken gets a `-2`, `-3`, ... suffix.
pub fn output_stems(inputs: &[PathBuf]) -> Result<Vec<String>> {
    let stems = inputs
        .iter()
        .map(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
                .with_context(|| format!("input {:?} has no usable file name", p))
        })
        .collect::<Result<Vec<String>>>()?;

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for stem in &stems {
        *seen.entry(stem.as_str()).or_insert(0) += 1;
    }

    let mut taken = HashSet::with_capacity(stems.len());
    let mut out = Vec::with_capacity(stems.len());
    for (path, stem) in inputs.iter().zip(&stems) {
        let base = match path.parent().and_then(|d| d.file_name()).and_then(|d| d.to_str()) {
            Some(dir) if seen[stem.as_str()] > 1 => format!("{}_{}", dir, stem),
            _ => stem.clone(),
        };
        let mut name = base.clone();
        let mut n = 1;
        while !taken.insert(name.clone()) {
            n += 1;
            name = format!("{}-{}", base, n);
        }
        out.push(name);
    }
    Ok(out)
}

/// Load `csv_path`, clean and analyse it, and write `<out_stem>.stats.json`
/// plus `<out_stem>.cleaned.parquet` into the existing directory `out_dir`.
#[tracing::instrument(level = "info", skip_all, fields(path = %csv_path.display(), out = out_stem))]
pub fn process_file(
    csv_path: &Path,
    out_stem: &str,
    formatter: &Formatter,
    out_dir: &Path,
) -> Result<ReportOutputs> {
    let start = Instant::now();

    let raw = RawTable::from_csv_path(csv_path)?;
    let (envelope, listings) = build_report(&csv_path.display().to_string(), &raw, formatter);

    if !envelope.missing_fields.is_empty() {
        warn!(missing = ?envelope.missing_fields, "some canonical fields were not found");
    }

    let stats_json = out_dir.join(format!("{}.stats.json", out_stem));
    write_json_atomic(&envelope, &stats_json)
        .with_context(|| format!("writing statistics for {:?}", csv_path))?;

    let cleaned_parquet = if listings.cleaned.num_columns() > 0 {
        let path = out_dir.join(format!("{}.cleaned.parquet", out_stem));
        write_parquet(&listings.cleaned, &path)
            .with_context(|| format!("writing cleaned table for {:?}", csv_path))?;
        Some(path)
    } else {
        None
    };

    info!(rows = envelope.row_count, elapsed = ?start.elapsed(), "report written");
    Ok(ReportOutputs {
        stats_json,
        cleaned_parquet,
    })
}
