use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::filter::{filtered_indices, StyleFilter};
use super::model::{ExampleRecord, ImageRef, ManifestRow, Style};
use crate::error::{LoaderError, Result};

// ---------------------------------------------------------------------------
// Manifest reader
// ---------------------------------------------------------------------------

/// Columns every manifest header must carry.
pub const STYLE_COLUMN: &str = "Style";
pub const ARTWORK_COLUMN: &str = "Artwork";
pub const LINK_COLUMN: &str = "Link";

/// Read a manifest CSV from disk.
///
/// The header row must contain `Style`, `Artwork` and `Link`; column order is
/// free and extra columns are ignored.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestRow>> {
    let file = std::fs::File::open(path).map_err(|err| LoaderError::manifest(path, err))?;
    let rows = parse_manifest(file, path)?;
    debug!("read {} manifest rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse manifest rows from any reader. `path` is only used in error messages.
pub fn parse_manifest<R: Read>(source: R, path: &Path) -> Result<Vec<ManifestRow>> {
    let mut reader = csv::Reader::from_reader(source);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| LoaderError::manifest(path, format!("reading header: {err}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| LoaderError::manifest(path, format!("missing '{name}' column")))
    };
    let style_idx = column(STYLE_COLUMN)?;
    let artwork_idx = column(ARTWORK_COLUMN)?;
    let link_idx = column(LINK_COLUMN)?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record =
            result.map_err(|err| LoaderError::manifest(path, format!("row {row_no}: {err}")))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
        rows.push(ManifestRow {
            style: field(style_idx),
            artwork: field(artwork_idx),
            link: field(link_idx),
        });
    }
    Ok(rows)
}

/// Local path of a row's image: `<folder>/<split>/<basename of Link>`.
pub fn image_path(folder: &Path, split: &str, row: &ManifestRow) -> PathBuf {
    folder.join(split).join(row.image_file_name())
}

// ---------------------------------------------------------------------------
// Example stream
// ---------------------------------------------------------------------------

/// Single-pass stream of `(index, record)` pairs for one split.
///
/// `index` is the row's position in the unfiltered manifest. The stream owns
/// the rows it was built from and hands each one out exactly once; build a new
/// stream from the manifest to iterate again.
#[derive(Debug)]
pub struct Examples {
    folder: PathBuf,
    split: String,
    rows: Vec<ManifestRow>,
    retained: std::vec::IntoIter<usize>,
}

impl Examples {
    pub fn new(folder: &Path, split: &str, rows: Vec<ManifestRow>, filter: &StyleFilter) -> Self {
        let retained = filtered_indices(&rows, filter);
        info!(
            "{split}: {} of {} manifest rows pass filter {filter:?}",
            retained.len(),
            rows.len()
        );
        Examples {
            folder: folder.to_path_buf(),
            split: split.to_string(),
            rows,
            retained: retained.into_iter(),
        }
    }

    fn record(&self, index: usize, row: ManifestRow) -> Result<(usize, ExampleRecord)> {
        let style = Style::from_name(&row.style).ok_or_else(|| LoaderError::UnknownStyle {
            index,
            value: row.style.clone(),
        })?;
        let image = ImageRef::Path(image_path(&self.folder, &self.split, &row));
        Ok((
            index,
            ExampleRecord {
                style,
                artwork: row.artwork,
                image,
            },
        ))
    }
}

impl Iterator for Examples {
    type Item = Result<(usize, ExampleRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.retained.next()?;
        let row = std::mem::take(&mut self.rows[index]);
        Some(self.record(index, row))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.retained.size_hint()
    }
}

impl ExactSizeIterator for Examples {}
