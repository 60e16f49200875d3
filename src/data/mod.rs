/// Data layer: core types, manifest loading, and filtering.
///
/// Architecture:
/// ```text
///  <folder>/<split>/wikiart_scraped_<split>.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → Vec<ManifestRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  configuration → retained row indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Examples  │  (index, ExampleRecord), single pass
///   └──────────┘
/// ```

pub mod filter;
pub mod info;
pub mod loader;
pub mod model;
