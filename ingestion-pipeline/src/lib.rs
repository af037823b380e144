//! Turning an uploaded PDF into a session's active document: persist the
//! raw file, extract and clean its text, chunk and embed it, install the
//! resulting index, and produce a one-shot summary.
#![allow(clippy::missing_docs_in_private_items)]

pub mod pipeline;
pub mod utils;

pub use pipeline::{IngestError, IngestReceipt, IngestionPipeline};
