/// Data layer: core types, loading, yearly aggregation and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet   (one file per dataset)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  pick mapped columns → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ annualize  │  group by calendar year, mean / sum → AnnualSeries
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ registry  │  DatasetKey → AnnualSeries, read-only after build
///   └──────────┘
/// ```

pub mod annualize;
pub mod export;
pub mod loader;
pub mod model;
pub mod registry;
