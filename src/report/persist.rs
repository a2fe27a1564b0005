//! # Report Persistence
//!
//! Upserts the Report object named after a Cleaner. Only the latest run is
//! kept: an existing Report has its spec overwritten.

use tracing::info;

use crate::crd::{Report, ReportSpec};
use crate::error::StoreError;
use crate::observability::metrics;
use crate::store::ObjectStore;

/// Create or overwrite the Report for `cleaner_name`
///
/// A lookup that fails with anything but "not found" is returned as is.
///
/// # Errors
/// Returns the store error of the lookup, create, or replace call
pub async fn upsert_report(
    store: &dyn ObjectStore,
    cleaner_name: &str,
    spec: &ReportSpec,
) -> Result<Report, StoreError> {
    match store.get_report(cleaner_name).await {
        Ok(mut report) => {
            report.spec = spec.clone();
            info!("update report instance");
            let report = store.replace_report(&report).await?;
            metrics::increment_reports_written("update");
            Ok(report)
        }
        Err(err) if err.is_not_found() => {
            info!("create report instance");
            let report = store
                .create_report(&Report::new(cleaner_name, spec.clone()))
                .await?;
            metrics::increment_reports_written("create");
            Ok(report)
        }
        Err(err) => Err(err),
    }
}
