use super::model::{ConfigName, ManifestRow};

// ---------------------------------------------------------------------------
// Filter predicate: which manifest rows a configuration keeps
// ---------------------------------------------------------------------------

/// Row filter derived from the active configuration.
///
/// `Only` compares the row's `Style` column against the value with exact,
/// case-sensitive string equality. The value is never checked against the
/// label set: a value no row carries simply keeps nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleFilter {
    All,
    Only(String),
}

impl StyleFilter {
    pub fn for_config(config: ConfigName) -> Self {
        match config {
            ConfigName::All => StyleFilter::All,
            other => StyleFilter::Only(other.name().to_string()),
        }
    }

    pub fn only(style: impl Into<String>) -> Self {
        StyleFilter::Only(style.into())
    }

    pub fn accepts(&self, row: &ManifestRow) -> bool {
        match self {
            StyleFilter::All => true,
            StyleFilter::Only(style) => row.style == *style,
        }
    }
}

/// Return positional indices of the rows that pass `filter`, in manifest order.
pub fn filtered_indices(rows: &[ManifestRow], filter: &StyleFilter) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, row)| filter.accepts(row))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(styles: &[&str]) -> Vec<ManifestRow> {
        styles
            .iter()
            .map(|s| ManifestRow {
                style: s.to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn all_keeps_every_row() {
        let rows = rows(&["Baroque", "Realism", "Cubism"]);
        assert_eq!(filtered_indices(&rows, &StyleFilter::All), vec![0, 1, 2]);
    }

    #[test]
    fn only_keeps_original_indices() {
        let rows = rows(&["Baroque", "Realism", "Baroque"]);
        let filter = StyleFilter::for_config(ConfigName::Baroque);
        assert_eq!(filtered_indices(&rows, &filter), vec![0, 2]);
    }

    #[test]
    fn match_is_exact() {
        let rows = rows(&["baroque", "Baroque ", "BAROQUE"]);
        let filter = StyleFilter::for_config(ConfigName::Baroque);
        assert!(filtered_indices(&rows, &filter).is_empty());
    }

    #[test]
    fn unknown_value_keeps_nothing() {
        let rows = rows(&["Baroque", "Realism"]);
        assert!(filtered_indices(&rows, &StyleFilter::only("Impressionism")).is_empty());
    }
}
