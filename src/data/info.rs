use serde::Serialize;

use super::model::{ConfigName, Style, Version};

// ---------------------------------------------------------------------------
// Feature schema
// ---------------------------------------------------------------------------

/// Type of a single column in an emitted example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum FeatureType {
    /// Categorical label; a value's ordinal is its position in `names`.
    ClassLabel { names: Vec<String> },
    /// Scalar value such as `"string"`.
    Value { dtype: String },
    /// Image reference, decoded by the consumer when `decode` is set.
    Image { decode: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub name: String,
    #[serde(flatten)]
    pub kind: FeatureType,
}

/// Ordered feature schema of an example record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Features(pub Vec<Feature>);

impl Features {
    /// Schema of WikiArt examples: `style`, `artwork`, `image`.
    pub fn wikiart() -> Self {
        Features(vec![
            Feature {
                name: "style".to_string(),
                kind: FeatureType::ClassLabel {
                    names: Style::NAMES.iter().map(|n| n.to_string()).collect(),
                },
            },
            Feature {
                name: "artwork".to_string(),
                kind: FeatureType::Value {
                    dtype: "string".to_string(),
                },
            },
            Feature {
                name: "image".to_string(),
                kind: FeatureType::Image { decode: true },
            },
        ])
    }

    pub fn get(&self, name: &str) -> Option<&FeatureType> {
        self.0.iter().find(|f| f.name == name).map(|f| &f.kind)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|f| f.name.as_str())
    }
}

// ---------------------------------------------------------------------------
// DatasetInfo
// ---------------------------------------------------------------------------

/// Static description of the dataset returned by `describe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    pub description: String,
    pub citation: String,
    pub homepage: String,
    pub license: String,
    pub version: Version,
    pub config_name: ConfigName,
    pub config_description: String,
    pub features: Features,
    /// `(input, target)` columns for supervised use.
    pub supervised_keys: (String, String),
    /// Examples a consumer should buffer before flushing them to storage.
    pub writer_batch_size: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_columns_in_order() {
        let features = Features::wikiart();
        assert_eq!(
            features.names().collect::<Vec<_>>(),
            ["style", "artwork", "image"]
        );
        assert_eq!(
            features.get("style"),
            Some(&FeatureType::ClassLabel {
                names: vec!["Baroque".to_string(), "Realism".to_string()]
            })
        );
        assert_eq!(features.get("missing"), None);
    }

    #[test]
    fn schema_serializes_with_type_tags() {
        let json = serde_json::to_value(Features::wikiart()).unwrap();
        assert_eq!(json[2]["name"], "image");
        assert_eq!(json[2]["type"], "Image");
        assert_eq!(json[2]["decode"], true);
        assert_eq!(json[1]["dtype"], "string");
    }
}
