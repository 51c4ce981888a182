//! # Tradescope Analytics
//!
//! Turns a fetched snapshot of trading data into trade records and a
//! `MetricsSummary`.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** nothing in this crate performs I/O. It depends only on
//!   `core-types`, so every calculation can be tested in isolation.
//! - **Two derivation strategies:** metrics are either computed from the trade
//!   set by the `MetricsEngine` or read from trailing summary columns. The
//!   choice is a `core_types::MetricsStrategy` value, not duplicated business logic.
//!
//! ## Public API
//!
//! - `RowParser`: tabular rows to `TradeRecord`s.
//! - `MetricsEngine`: the aggregate calculator.
//! - `Summarizer` / `TradeSet`: the single entry point used by the web layer.
//! - `MetricsSummary` and `AnalyticsError`.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod report;
pub mod strategy;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{MetricsEngine, annualized_sharpe};
pub use error::AnalyticsError;
pub use extractor::extract_summary;
pub use parser::RowParser;
pub use report::MetricsSummary;
pub use strategy::{Summarizer, TradeSet};
