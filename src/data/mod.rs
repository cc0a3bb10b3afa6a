/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (checked against the required columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Vec<Record>, immutable after load
///   └──────────┘
///        │
///        ├──────────────┬───────────────┐
///        ▼              ▼               ▼
///   ┌──────────┐  ┌────────────┐  ┌──────────┐
///   │  filter   │  │ aggregate  │  │  stats    │
///   └──────────┘  └────────────┘  └──────────┘
///   date range     group + sum/mean  regression pairs / fit
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
