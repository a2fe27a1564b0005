//! # CRD Generator
//!
//! Prints the CustomResourceDefinitions of the `Cleaner` and `Report`
//! resources as a multi-document YAML stream.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin crdgen > config/crd/cleaner.yaml
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use anyhow::{Context, Result};
use cleaner_notifier::crd::{Cleaner, Report};
use kube::core::CustomResourceExt;

fn main() -> Result<()> {
    let cleaner =
        serde_yaml::to_string(&Cleaner::crd()).context("Failed to serialize Cleaner CRD")?;
    let report =
        serde_yaml::to_string(&Report::crd()).context("Failed to serialize Report CRD")?;

    print!("{cleaner}---\n{report}");
    Ok(())
}
