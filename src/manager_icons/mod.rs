use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use glob::{glob, Pattern};
use log::{debug, info};
use ureq::Agent;
use crate::errors::{ExternalError, ExternalKind};

const COMPONENT: &str = "icons";

/// Resolves opaque weather icon ids into local image files
pub trait IconResolver {
    fn resolve_icon_path(&self, icon_id: &str) -> Result<PathBuf, ExternalError>;
}

/// Icon resolver downloading OpenWeatherMap icons into an on-disk cache.
///
/// Every icon id is downloaded at most once, later requests are served from the cache directory.
pub struct IconCache {
    agent: Agent,
    cache_dir: PathBuf,
    base_url: String,
}

impl IconCache {
    /// Returns a new IconCache, the cache directory is created if missing
    ///
    /// # Arguments
    ///
    /// * 'cache_dir' - directory to keep downloaded icons in
    /// * 'timeout_secs' - global timeout for one download
    pub fn new(cache_dir: &str, timeout_secs: u64) -> Result<IconCache, ExternalError> {
        fs::create_dir_all(cache_dir)
            .map_err(|e| ExternalError::new(COMPONENT, ExternalKind::Io, e.to_string(), cache_dir))?;

        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .build();

        let agent = config.into();

        Ok(Self { agent, cache_dir: PathBuf::from(cache_dir), base_url: "https://openweathermap.org".to_string() })
    }

    /// Path an icon is cached at
    ///
    /// # Arguments
    ///
    /// * 'icon_id' - the icon id, e.g. "10d"
    pub fn cached_path(&self, icon_id: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.png", icon_id))
    }

    /// Removes cached icons older than the given number of days and returns how many were removed
    ///
    /// # Arguments
    ///
    /// * 'max_age_days' - max age of a cached icon
    pub fn prune(&self, max_age_days: u64) -> Result<usize, ExternalError> {
        let dir = self.cache_dir.to_string_lossy().to_string();
        let pattern = format!("{}/*.png", Pattern::escape(&dir));
        let max_age = Duration::from_secs(max_age_days * 86400);
        let io_error = |e: String| ExternalError::new(COMPONENT, ExternalKind::Io, e, &dir);

        let mut removed = 0;
        for entry in glob(&pattern).map_err(|e| io_error(e.to_string()))? {
            if let Ok(path) = entry {
                let modified = fs::metadata(&path).and_then(|m| m.modified()).map_err(|e| io_error(e.to_string()))?;
                if modified.elapsed().unwrap_or_default() >= max_age {
                    fs::remove_file(&path).map_err(|e| io_error(e.to_string()))?;
                    removed += 1;
                }
            }
        }

        if removed > 0 {
            info!("pruned {} cached icons from {}", removed, dir);
        }
        Ok(removed)
    }

    /// Downloads an icon into the cache
    ///
    /// # Arguments
    ///
    /// * 'icon_id' - the icon id
    /// * 'path' - where to store the icon
    fn download(&self, icon_id: &str, path: &Path) -> Result<(), ExternalError> {
        let url = format!("{}/img/wn/{}@2x.png", self.base_url, icon_id);

        let bytes = self.agent
            .get(&url)
            .call()
            .map_err(|e| ExternalError::from_ureq(COMPONENT, e, icon_id))?
            .body_mut()
            .read_to_vec()
            .map_err(|e| ExternalError::from_ureq(COMPONENT, e, icon_id))?;

        store(path, &bytes)
            .map_err(|e| ExternalError::new(COMPONENT, ExternalKind::Io, e.to_string(), icon_id))
    }
}

/// Writes a file through a sibling temporary file, so an interrupted write never leaves a
/// truncated file at the final path
///
/// # Arguments
///
/// * 'path' - final path of the file
/// * 'bytes' - the file content
fn store(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut partial = path.as_os_str().to_owned();
    partial.push(".part");
    let partial = PathBuf::from(partial);

    fs::write(&partial, bytes)?;
    fs::rename(&partial, path).inspect_err(|_| { let _ = fs::remove_file(&partial); })
}

impl IconResolver for IconCache {
    fn resolve_icon_path(&self, icon_id: &str) -> Result<PathBuf, ExternalError> {
        if icon_id.is_empty() || !icon_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ExternalError::new(COMPONENT, ExternalKind::NotFound, "invalid icon id".to_string(), icon_id));
        }

        let path = self.cached_path(icon_id);
        if path.exists() {
            debug!("icon {} served from cache", icon_id);
        } else {
            self.download(icon_id, &path)?;
            debug!("icon {} downloaded to {}", icon_id, path.display());
        }

        Ok(path)
    }
}
