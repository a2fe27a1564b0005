//! # Custom Resource Definitions
//!
//! CRD types shared by the notifier and the cleanup engine.
//!
//! ## Module Structure
//!
//! - `cleaner.rs` - Cleaner policy (input) and its action
//! - `report.rs` - Report object persisted after every run (output)
//! - `notifications.rs` - Notification entries and the destination type

mod cleaner;
mod notifications;
mod report;

// Re-export all public types
pub use cleaner::{Action, Cleaner, CleanerSpec};
pub use notifications::{Notification, NotificationRef, NotificationType};
pub use report::{Report, ReportSpec, ResourceInfo, ResourceRef};
