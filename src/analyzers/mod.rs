//! Climate series analysis.
//!
//! Groups filtered rows by metric and computes quality-weighted summaries,
//! linear trends, z-score anomalies and seasonal patterns for each metric.

pub mod aggregate;
pub mod analyzer;
pub mod anomaly;
pub mod seasonality;
pub mod trend;
pub mod types;
pub mod utility;
pub mod weights;
