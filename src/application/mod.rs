//! Application layer - batch use cases over the ports.

mod process_document;
mod run_batch;

pub use process_document::{process_document, ProcessedDocument};
pub use run_batch::{BatchError, RunBatchCommand, RunBatchHandler};
