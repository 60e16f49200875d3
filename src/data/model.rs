use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::DynamicImage;
use serde::Serialize;

use crate::error::{LoaderError, Result};

// ---------------------------------------------------------------------------
// Style – the fixed label set
// ---------------------------------------------------------------------------

/// Art style label. The discriminant is the class ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Style {
    Baroque = 0,
    Realism = 1,
}

impl Style {
    /// Every label, in ordinal order.
    pub const ALL: [Style; 2] = [Style::Baroque, Style::Realism];

    /// Label names, in ordinal order.
    pub const NAMES: [&'static str; 2] = ["Baroque", "Realism"];

    pub fn name(self) -> &'static str {
        Self::NAMES[self.ordinal()]
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Exact, case-sensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Style> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Style> {
        Self::ALL.get(ordinal).copied()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Named dataset variant chosen when the loader is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ConfigName {
    #[default]
    All,
    Baroque,
    Realism,
}

impl ConfigName {
    pub const ALL: [ConfigName; 3] = [ConfigName::All, ConfigName::Baroque, ConfigName::Realism];

    pub fn name(self) -> &'static str {
        match self {
            ConfigName::All => "All",
            ConfigName::Baroque => "Baroque",
            ConfigName::Realism => "Realism",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ConfigName::All => "This contains the whole dataset",
            ConfigName::Baroque => "This part of the dataset contains only Baroque style",
            ConfigName::Realism => "This part of the dataset contains only Realism style",
        }
    }
}

impl FromStr for ConfigName {
    type Err = LoaderError;

    fn from_str(s: &str) -> Result<Self> {
        ConfigName::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| LoaderError::UnknownConfig(s.to_string()))
    }
}

impl fmt::Display for ConfigName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version { major, minor, patch }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A configuration together with its version and human readable description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderConfig {
    pub name: ConfigName,
    pub version: Version,
    pub description: &'static str,
}

impl BuilderConfig {
    pub fn new(name: ConfigName, version: Version) -> Self {
        BuilderConfig {
            name,
            version,
            description: name.description(),
        }
    }
}

// ---------------------------------------------------------------------------
// Split
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub const ALL: [Split; 2] = [Split::Train, Split::Test];

    /// Name of the split, which is also the sub-folder holding its files.
    pub fn name(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }

    pub fn manifest_file(self) -> &'static str {
        match self {
            Split::Train => "wikiart_scraped_train.csv",
            Split::Test => "wikiart_scraped_test.csv",
        }
    }
}

impl FromStr for Split {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        Split::ALL
            .into_iter()
            .find(|sp| sp.name() == s)
            .ok_or_else(|| format!("unknown split '{s}', expected train or test"))
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ManifestRow – one line of the manifest CSV
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestRow {
    pub style: String,
    pub artwork: String,
    /// Source URL of the image. Only the final path segment is used locally.
    pub link: String,
}

impl ManifestRow {
    /// Text after the last `/` of `link`, or the whole link if it has none.
    pub fn image_file_name(&self) -> &str {
        match self.link.rfind('/') {
            Some(pos) => &self.link[pos + 1..],
            None => &self.link,
        }
    }
}

// ---------------------------------------------------------------------------
// ExampleRecord – the emitted unit
// ---------------------------------------------------------------------------

/// Reference to an example's image. Decoding is deferred to [`ImageRef::decode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ImageRef {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ImageRef {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ImageRef::Path(p) => Some(p.as_path()),
            ImageRef::Bytes(_) => None,
        }
    }

    /// Decode the referenced image. A missing file is reported here, not at generation time.
    pub fn decode(&self) -> Result<DynamicImage> {
        match self {
            ImageRef::Path(path) => image::open(path).map_err(|err| LoaderError::Image {
                path: path.clone(),
                reason: err.to_string(),
            }),
            ImageRef::Bytes(bytes) => {
                image::load_from_memory(bytes).map_err(|err| LoaderError::Image {
                    path: PathBuf::from("<memory>"),
                    reason: err.to_string(),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleRecord {
    pub style: Style,
    pub artwork: String,
    pub image: ImageRef,
}
