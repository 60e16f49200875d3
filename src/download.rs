//! Download-and-extract capability used to resolve split archives.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use log::{debug, info};

use crate::error::{LoaderError, Result};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Marker written once an archive has been fully extracted.
const COMPLETE_MARKER: &str = ".complete";

/// Turns a remote archive URL into a local folder holding its extracted contents.
pub trait DownloadManager {
    fn download_and_extract(&self, url: &str) -> Result<PathBuf>;
}

/// Last path segment of `url` without query string, e.g. `train.zip`.
pub fn archive_file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Archive file name without its extension, e.g. `train`.
pub fn archive_stem(url: &str) -> &str {
    let name = archive_file_name(url);
    match name.rfind('.') {
        Some(pos) if pos > 0 => &name[..pos],
        _ => name,
    }
}

// ---------------------------------------------------------------------------
// HTTP + zip
// ---------------------------------------------------------------------------

fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .build()
    })
}

/// Downloads archives over HTTP and extracts them under a cache directory.
///
/// Layout:
/// ```text
/// <cache>/downloads/<archive>.zip
/// <cache>/extracted/<archive stem>/...
/// ```
/// An extracted folder carrying the completion marker is reused without
/// touching the network.
#[derive(Debug, Clone)]
pub struct HttpDownloadManager {
    cache_dir: PathBuf,
}

impl HttpDownloadManager {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        HttpDownloadManager {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn extracted_dir(&self, url: &str) -> PathBuf {
        self.cache_dir.join("extracted").join(archive_stem(url))
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let response = match agent().get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(LoaderError::download(url, format!("HTTP {code}")));
            }
            Err(err) => return Err(LoaderError::download(url, err)),
        };
        let tmp = dest.with_file_name(format!("{}.tmp", archive_file_name(url)));
        let written = File::create(&tmp).and_then(|mut file| {
            let bytes = io::copy(&mut response.into_reader(), &mut file)?;
            file.flush()?;
            Ok(bytes)
        });
        let bytes = match written {
            Ok(bytes) => bytes,
            Err(err) => {
                let _ = fs::remove_file(&tmp);
                return Err(LoaderError::download(url, err));
            }
        };
        fs::rename(&tmp, dest).map_err(|err| LoaderError::download(url, err))?;
        debug!("downloaded {bytes} bytes from {url} to {}", dest.display());
        Ok(())
    }
}

impl DownloadManager for HttpDownloadManager {
    fn download_and_extract(&self, url: &str) -> Result<PathBuf> {
        let target = self.extracted_dir(url);
        if target.join(COMPLETE_MARKER).is_file() {
            debug!("cache hit for {url} at {}", target.display());
            return Ok(target);
        }

        let downloads = self.cache_dir.join("downloads");
        fs::create_dir_all(&downloads).map_err(|err| LoaderError::download(url, err))?;
        let archive = downloads.join(archive_file_name(url));
        info!("downloading {url}");
        self.download(url, &archive)?;

        info!("extracting {} to {}", archive.display(), target.display());
        match fs::remove_dir_all(&target) {
            Ok(()) => debug!("cleared partial extraction at {}", target.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(LoaderError::download(url, err)),
        }
        extract_zip(&archive, &target).map_err(|err| LoaderError::download(url, err))?;
        File::create(target.join(COMPLETE_MARKER)).map_err(|err| LoaderError::download(url, err))?;
        Ok(target)
    }
}

/// Caps applied while extracting an archive.
#[derive(Debug, Clone, Copy)]
pub struct ZipLimits {
    pub max_entries: usize,
    pub max_total_uncompressed_bytes: u64,
}

impl ZipLimits {
    /// Generous enough for a split archive of a few thousand images.
    pub fn standard() -> Self {
        ZipLimits {
            max_entries: 100_000,
            max_total_uncompressed_bytes: 16 * 1024 * 1024 * 1024,
        }
    }
}

/// Extract every entry of `zip_path` below `dest_dir` under [`ZipLimits::standard`].
pub fn extract_zip(zip_path: &Path, dest_dir: &Path) -> io::Result<()> {
    extract_zip_with_limits(zip_path, dest_dir, ZipLimits::standard())
}

/// Extract every entry of `zip_path` below `dest_dir`.
///
/// Entries whose names would escape `dest_dir` are skipped. Archives with
/// more entries, or more declared uncompressed bytes, than `limits` allow are
/// rejected before anything is written.
pub fn extract_zip_with_limits(
    zip_path: &Path,
    dest_dir: &Path,
    limits: ZipLimits,
) -> io::Result<()> {
    let file = File::open(zip_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(io::Error::other)?;
    if archive.len() > limits.max_entries {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "archive has {} entries, limit is {}",
                archive.len(),
                limits.max_entries
            ),
        ));
    }
    let mut total: u64 = 0;
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i).map_err(io::Error::other)?;
        total = total.saturating_add(entry.size());
    }
    if total > limits.max_total_uncompressed_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "archive expands to {total} bytes, limit is {}",
                limits.max_total_uncompressed_bytes
            ),
        ));
    }

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(io::Error::other)?;
        let outpath = match entry.enclosed_name() {
            Some(path) => dest_dir.join(path),
            None => {
                debug!("skipping unsafe archive entry '{}'", entry.name());
                continue;
            }
        };
        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
            continue;
        }
        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&outpath)?;
        io::copy(&mut entry, &mut outfile)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Local folders
// ---------------------------------------------------------------------------

/// Resolves archives to `<root>/<archive stem>` folders that already exist on disk.
#[derive(Debug, Clone)]
pub struct LocalDownloadManager {
    root: PathBuf,
}

impl LocalDownloadManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalDownloadManager { root: root.into() }
    }
}

impl DownloadManager for LocalDownloadManager {
    fn download_and_extract(&self, url: &str) -> Result<PathBuf> {
        let folder = self.root.join(archive_stem(url));
        if !folder.is_dir() {
            return Err(LoaderError::download(
                url,
                format!("{} is not a directory", folder.display()),
            ));
        }
        Ok(folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use zip::write::SimpleFileOptions;

    /// Answer a single HTTP request on a local port with `status` and `body`.
    fn serve_once(status: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = [0u8; 4096];
                let _ = stream.read(&mut request);
                let head = format!(
                    "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(&body);
            }
        });
        format!("http://{addr}/wikiart/train.zip")
    }

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(io::Cursor::new(Vec::new()));
        for (name, bytes) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(bytes).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn archive_names_from_urls() {
        let url = "https://host/wikiart/train.zip";
        assert_eq!(archive_file_name(url), "train.zip");
        assert_eq!(archive_stem(url), "train");
        assert_eq!(archive_file_name("https://host/test.zip?sig=abc"), "test.zip");
        assert_eq!(archive_stem("noext"), "noext");
    }

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        fs::write(path, zip_bytes(entries)).unwrap();
    }

    #[test]
    fn extracts_nested_entries() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("train.zip");
        write_zip(
            &zip_path,
            &[
                ("train/wikiart_scraped_train.csv", b"Style,Artwork,Link\n".as_slice()),
                ("train/a.jpg", b"jpeg".as_slice()),
            ],
        );

        let dest = dir.path().join("out");
        extract_zip(&zip_path, &dest).unwrap();
        assert_eq!(
            fs::read(dest.join("train/wikiart_scraped_train.csv")).unwrap(),
            b"Style,Artwork,Link\n"
        );
        assert_eq!(fs::read(dest.join("train/a.jpg")).unwrap(), b"jpeg");
    }

    #[test]
    fn not_a_zip_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.zip");
        fs::write(&path, b"not a zip").unwrap();
        assert!(extract_zip(&path, &dir.path().join("out")).is_err());
    }

    #[test]
    fn completed_extraction_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let manager = HttpDownloadManager::new(dir.path());
        let url = "http://127.0.0.1:9/wikiart/train.zip";
        let target = manager.extracted_dir(url);
        fs::create_dir_all(&target).unwrap();
        File::create(target.join(COMPLETE_MARKER)).unwrap();

        assert_eq!(manager.download_and_extract(url).unwrap(), target);
    }

    #[test]
    fn extraction_limits_reject_large_archives() {
        let dir = tempfile::tempdir().unwrap();
        let zip_path = dir.path().join("train.zip");
        write_zip(
            &zip_path,
            &[("a.txt", b"aaaa".as_slice()), ("b.txt", b"bbbb".as_slice())],
        );
        let dest = dir.path().join("out");

        let few_entries = ZipLimits {
            max_entries: 1,
            ..ZipLimits::standard()
        };
        assert!(extract_zip_with_limits(&zip_path, &dest, few_entries).is_err());

        let few_bytes = ZipLimits {
            max_total_uncompressed_bytes: 7,
            ..ZipLimits::standard()
        };
        assert!(extract_zip_with_limits(&zip_path, &dest, few_bytes).is_err());
        assert!(!dest.join("a.txt").exists());
    }

    #[test]
    fn unreachable_host_is_a_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = HttpDownloadManager::new(dir.path());
        let url = "http://127.0.0.1:9/wikiart/train.zip";

        match manager.download_and_extract(url) {
            Err(LoaderError::Download { url: failed, .. }) => assert_eq!(failed, url),
            other => panic!("unexpected result {other:?}"),
        }
        assert!(!manager.extracted_dir(url).join(COMPLETE_MARKER).exists());
    }

    #[test]
    fn http_error_status_is_a_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = HttpDownloadManager::new(dir.path());
        let url = serve_once("404 Not Found", b"missing".to_vec());

        match manager.download_and_extract(&url) {
            Err(LoaderError::Download { url: failed, reason }) => {
                assert_eq!(failed, url);
                assert_eq!(reason, "HTTP 404");
            }
            other => panic!("unexpected result {other:?}"),
        }
        assert!(!dir.path().join("downloads/train.zip").exists());
        assert!(!dir.path().join("downloads/train.zip.tmp").exists());
    }

    #[test]
    fn corrupt_archive_is_a_download_error() {
        let dir = tempfile::tempdir().unwrap();
        let manager = HttpDownloadManager::new(dir.path());
        let url = serve_once("200 OK", b"not a zip".to_vec());

        assert!(matches!(
            manager.download_and_extract(&url),
            Err(LoaderError::Download { .. })
        ));
        assert!(!manager.extracted_dir(&url).join(COMPLETE_MARKER).exists());
    }

    #[test]
    fn download_replaces_partial_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let manager = HttpDownloadManager::new(dir.path());
        let body = zip_bytes(&[("train/a.jpg", b"jpeg".as_slice())]);
        let url = serve_once("200 OK", body);

        let target = manager.extracted_dir(&url);
        fs::create_dir_all(target.join("train")).unwrap();
        fs::write(target.join("train/stale.jpg"), b"old").unwrap();

        assert_eq!(manager.download_and_extract(&url).unwrap(), target);
        assert_eq!(fs::read(target.join("train/a.jpg")).unwrap(), b"jpeg");
        assert!(!target.join("train/stale.jpg").exists());
        assert!(target.join(COMPLETE_MARKER).is_file());
        assert!(dir.path().join("downloads/train.zip").is_file());
        assert!(!dir.path().join("downloads/train.zip.tmp").exists());
    }

    #[test]
    fn local_manager_maps_to_stem_folder() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("test")).unwrap();
        let manager = LocalDownloadManager::new(dir.path());

        assert_eq!(
            manager.download_and_extract("https://host/wikiart/test.zip").unwrap(),
            dir.path().join("test")
        );
        assert!(matches!(
            manager.download_and_extract("https://host/wikiart/train.zip"),
            Err(LoaderError::Download { .. })
        ));
    }
}
