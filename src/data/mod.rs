//! Tabular sources feeding the association engine.

pub mod ingest;
