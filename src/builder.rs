use std::path::PathBuf;

use log::info;

use crate::data::filter::StyleFilter;
use crate::data::info::{DatasetInfo, Features};
use crate::data::loader::{read_manifest, Examples};
use crate::data::model::{BuilderConfig, ConfigName, Split, Version};
use crate::download::DownloadManager;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Static metadata
// ---------------------------------------------------------------------------

pub const CITATION: &str = r"@InProceedings{huggingface:dataset,
title = {WikiArt},
author={Medellín AI.
},
year={2023}
}
";

pub const DESCRIPTION: &str = "Este dataset fue creado para el workshop de Medellin AI y Bancolombia con fines educativos.\n";

pub const HOMEPAGE: &str = "https://www.meetup.com/medellin-ai/";

pub const LICENSE: &str = "mit";

pub const VERSION: Version = Version::new(1, 0, 0);

/// Remote archive for a split.
pub fn archive_url(split: Split) -> &'static str {
    match split {
        Split::Train => "https://workshophuggingface.blob.core.windows.net/wikiart/train.zip",
        Split::Test => "https://workshophuggingface.blob.core.windows.net/wikiart/test.zip",
    }
}

// ---------------------------------------------------------------------------
// Builder interface
// ---------------------------------------------------------------------------

/// Everything `generate_examples` needs to stream one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitGenerator {
    pub split: Split,
    /// Extracted archive folder; the split's files live in `<folder>/<split>/`.
    pub folder: PathBuf,
    pub manifest_file: String,
}

impl SplitGenerator {
    pub fn new(split: Split, folder: impl Into<PathBuf>) -> Self {
        SplitGenerator {
            split,
            folder: folder.into(),
            manifest_file: split.manifest_file().to_string(),
        }
    }

    /// `<folder>/<split>/<manifest file>`.
    pub fn manifest_path(&self) -> PathBuf {
        self.folder.join(self.split.name()).join(&self.manifest_file)
    }
}

pub trait DatasetBuilder {
    /// Static metadata and feature schema.
    fn describe(&self) -> DatasetInfo;

    /// Fetch and extract every split archive, one generator per split.
    fn resolve_splits(&self, downloads: &dyn DownloadManager) -> Result<Vec<SplitGenerator>>;

    /// Read the split's manifest and stream its examples.
    fn generate_examples(&self, split: &SplitGenerator) -> Result<Examples>;
}

// ---------------------------------------------------------------------------
// WikiArt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WikiArt {
    config: BuilderConfig,
}

impl WikiArt {
    /// Number of examples the host should buffer before flushing to storage.
    pub const DEFAULT_WRITER_BATCH_SIZE: usize = 200;

    pub fn new(config: ConfigName) -> Self {
        WikiArt {
            config: BuilderConfig::new(config, VERSION),
        }
    }

    /// Build from a configuration name; unknown names are rejected.
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(WikiArt::new(name.parse()?))
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// All configurations this dataset offers.
    pub fn builder_configs() -> Vec<BuilderConfig> {
        ConfigName::ALL
            .into_iter()
            .map(|name| BuilderConfig::new(name, VERSION))
            .collect()
    }
}

impl Default for WikiArt {
    fn default() -> Self {
        WikiArt::new(ConfigName::default())
    }
}

impl DatasetBuilder for WikiArt {
    fn describe(&self) -> DatasetInfo {
        DatasetInfo {
            description: DESCRIPTION.to_string(),
            citation: CITATION.to_string(),
            homepage: HOMEPAGE.to_string(),
            license: LICENSE.to_string(),
            version: self.config.version,
            config_name: self.config.name,
            config_description: self.config.description.to_string(),
            features: Features::wikiart(),
            supervised_keys: ("image".to_string(), "style".to_string()),
            writer_batch_size: Self::DEFAULT_WRITER_BATCH_SIZE,
        }
    }

    fn resolve_splits(&self, downloads: &dyn DownloadManager) -> Result<Vec<SplitGenerator>> {
        Split::ALL
            .into_iter()
            .map(|split| {
                let folder = downloads.download_and_extract(archive_url(split))?;
                info!("{split} split resolved to {}", folder.display());
                Ok(SplitGenerator::new(split, folder))
            })
            .collect()
    }

    fn generate_examples(&self, split: &SplitGenerator) -> Result<Examples> {
        let rows = read_manifest(&split.manifest_path())?;
        Ok(Examples::new(
            &split.folder,
            split.split.name(),
            rows,
            &StyleFilter::for_config(self.config.name),
        ))
    }
}
