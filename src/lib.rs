//! Loader for the WikiArt style dataset: art images labeled `Baroque` or
//! `Realism`, shipped as one zip archive per split with a CSV manifest.
//!
//! ```no_run
//! use wikiart::{ConfigName, DatasetBuilder, HttpDownloadManager, WikiArt};
//!
//! # fn main() -> wikiart::Result<()> {
//! let builder = WikiArt::new(ConfigName::Baroque);
//! let downloads = HttpDownloadManager::new("/tmp/wikiart");
//! for split in builder.resolve_splits(&downloads)? {
//!     for example in builder.generate_examples(&split)? {
//!         let (key, record) = example?;
//!         println!("{key}: {} {}", record.style, record.artwork);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod data;
pub mod download;
pub mod error;
pub mod settings;

pub use builder::{DatasetBuilder, SplitGenerator, WikiArt};
pub use data::info::{DatasetInfo, Feature, FeatureType, Features};
pub use data::loader::Examples;
pub use data::model::{BuilderConfig, ConfigName, ExampleRecord, ImageRef, ManifestRow, Split, Style};
pub use download::{DownloadManager, HttpDownloadManager, LocalDownloadManager};
pub use error::{LoaderError, Result};
pub use settings::Settings;
