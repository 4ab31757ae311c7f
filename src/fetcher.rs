use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::Client;
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

use crate::fetch_error::FetchError;

/// Folkhälsomyndigheten's published Covid-19 workbook
pub const DEFAULT_SOURCE_URL: &str =
    "https://www.arcgis.com/sharing/rest/content/items/b5e7488e117749c19881cce45db13f7e/data";

/// A cached workbook younger than this is reused without touching the network
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(60 * 60);

const CHUNK_SIZE: usize = 1024;

/// What `ensure_fresh` did with the cached file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Reused { age: Duration },
    Downloaded { bytes: u64 },
}

/// Keeps a local copy of the source workbook no older than a given age.
///
/// Freshness is decided from the local file's modification time only. The
/// remote side is never asked whether it changed.
#[derive(Clone)]
pub struct SourceFetcher {
    client: Client,
    url: String,
}

impl SourceFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download the workbook to `path` unless a copy younger than `max_age` is already there.
    #[instrument(skip(self), fields(url = %self.url))]
    pub fn ensure_fresh(&self, path: &Path, max_age: Duration) -> Result<FetchOutcome, FetchError> {
        self.ensure_fresh_at(path, max_age, SystemTime::now())
    }

    /// Same as [`ensure_fresh`](Self::ensure_fresh) with an explicit "now".
    pub fn ensure_fresh_at(
        &self,
        path: &Path,
        max_age: Duration,
        now: SystemTime,
    ) -> Result<FetchOutcome, FetchError> {
        let modified = match fs::metadata(path) {
            Ok(meta) => Some(meta.modified().map_err(|e| FetchError::io(path, e))?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(FetchError::io(path, e)),
        };

        if let Some(modified) = modified {
            if !needs_refresh(Some(modified), now, max_age) {
                let age = file_age(modified, now);
                debug!(
                    "Cached file {} is {}s old (limit {}s), reusing",
                    path.display(),
                    age.as_secs(),
                    max_age.as_secs()
                );
                return Ok(FetchOutcome::Reused { age });
            }
            info!("Cached file {} is stale, downloading", path.display());
        } else {
            info!("No cached file at {}, downloading", path.display());
        }

        let bytes = self.download_to(path)?;
        Ok(FetchOutcome::Downloaded { bytes })
    }

    /// Stream the response body into a sibling temp file, then move it over `path`.
    fn download_to(&self, path: &Path) -> Result<u64, FetchError> {
        let mut response = self.client.get(&self.url).send()?;
        let status = response.status();
        debug!("Received HTTP response with status: {}", status);

        if status.as_u16() == 404 {
            return Err(FetchError::NotFound(self.url.clone()));
        } else if status.is_server_error() {
            return Err(FetchError::ServerError {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        } else if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let dir = staging_dir(path);
        let mut staging = NamedTempFile::new_in(&dir).map_err(|e| FetchError::io(&dir, e))?;
        let progress = download_progress(response.content_length());

        let mut chunk = [0u8; CHUNK_SIZE];
        let mut written: u64 = 0;
        loop {
            let n = response.read(&mut chunk).map_err(FetchError::Body)?;
            if n == 0 {
                break;
            }
            staging
                .write_all(&chunk[..n])
                .map_err(|e| FetchError::io(staging.path(), e))?;
            written += n as u64;
            progress.inc(n as u64);
        }
        staging
            .flush()
            .map_err(|e| FetchError::io(staging.path(), e))?;
        progress.finish_and_clear();

        staging.persist(path).map_err(|e| FetchError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        info!("Downloaded {} bytes to {}", written, path.display());
        Ok(written)
    }
}

/// True when the cache is missing or at least `max_age` old.
///
/// A modification time in the future counts as age zero.
pub fn needs_refresh(modified: Option<SystemTime>, now: SystemTime, max_age: Duration) -> bool {
    match modified {
        None => true,
        Some(modified) => file_age(modified, now) >= max_age,
    }
}

fn file_age(modified: SystemTime, now: SystemTime) -> Duration {
    now.duration_since(modified).unwrap_or(Duration::ZERO)
}

fn staging_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn download_progress(total: Option<u64>) -> ProgressBar {
    match total {
        Some(len) => {
            let pb = ProgressBar::new(len);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:40.cyan/blue} {bytes}/{total_bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("##-"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {bytes} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[test]
    fn test_missing_file_needs_refresh() {
        assert!(needs_refresh(None, SystemTime::now(), HOUR));
    }

    #[test]
    fn test_fresh_file_is_kept() {
        let now = SystemTime::now();
        let modified = now - (HOUR - Duration::from_secs(1));
        assert!(!needs_refresh(Some(modified), now, HOUR));
    }

    #[test]
    fn test_file_at_exact_limit_is_stale() {
        let now = SystemTime::now();
        assert!(needs_refresh(Some(now - HOUR), now, HOUR));
    }

    #[test]
    fn test_old_file_is_stale() {
        let now = SystemTime::now();
        let modified = now - (HOUR + Duration::from_secs(1));
        assert!(needs_refresh(Some(modified), now, HOUR));
    }

    #[test]
    fn test_future_mtime_counts_as_fresh() {
        let now = SystemTime::now();
        let modified = now + Duration::from_secs(120);
        assert!(!needs_refresh(Some(modified), now, HOUR));
    }

    #[test]
    fn test_staging_dir_for_bare_file_name() {
        assert_eq!(staging_dir(Path::new("cache.xlsx")), PathBuf::from("."));
        assert_eq!(
            staging_dir(Path::new("/var/cache/fhm.xlsx")),
            PathBuf::from("/var/cache")
        );
    }
}
