//! # Configuration
//!
//! Settings shared by every sink.

mod notifier;

pub use notifier::NotifierConfig;
