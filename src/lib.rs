pub mod analytics;
pub mod process;
pub mod report;
pub mod schema;

pub use analytics::{AnalyticsEngine, GraphSeries, StatisticsBundle};
pub use process::{CanonicalTable, Cell, CleanedListings, Formatter, RawTable};
pub use schema::{ColumnLocator, Field, FieldSpec};

#[cfg(test)]
pub(crate) fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,plaidcomp=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
