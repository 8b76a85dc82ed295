//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse + validate → Dataset (or DataLoadError)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  immutable records, sorted states, year bounds
//!   └──────────┘
//!        │   + FilterSpec (filter::resolve)
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  series / top-N ranking / table rows
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
