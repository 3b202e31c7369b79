//! MCP resources implementation
//!
//! Resources provide read-only access to the datasets the server can see and
//! to a reference guide for the cleaning tools.

pub mod datasets;
pub mod guide;

pub use datasets::{DatasetEntry, discover_datasets, read_dataset};
pub use guide::operations_guide;

/// URI of the operations guide
pub const GUIDE_URI: &str = "csv://guide/operations";

/// Prefix of dataset resource URIs; the file name follows
pub const DATASET_URI_PREFIX: &str = "csv://datasets/";
