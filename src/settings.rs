use std::path::PathBuf;

use directories::BaseDirs;
use log::debug;

use crate::error::{LoaderError, Result};

/// Environment variable overriding the cache directory.
pub const CACHE_DIR_ENV: &str = "WIKIART_CACHE_DIR";

/// Runtime settings of a loader session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Where downloaded archives and their extracted folders live.
    pub cache_dir: PathBuf,
}

impl Settings {
    /// Resolve settings. The cache directory comes from, in order: `explicit`,
    /// `$WIKIART_CACHE_DIR`, then the platform cache dir joined with `wikiart`.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        let env = std::env::var_os(CACHE_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let cache_dir = explicit
            .or(env)
            .or_else(|| BaseDirs::new().map(|dirs| dirs.cache_dir().join("wikiart")))
            .ok_or_else(|| {
                LoaderError::Settings(format!(
                    "no cache directory available, set {CACHE_DIR_ENV} or pass one explicitly"
                ))
            })?;
        debug!("using cache dir {}", cache_dir.display());
        Ok(Settings { cache_dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_then_env_then_platform() {
        let previous = std::env::var_os(CACHE_DIR_ENV);

        std::env::set_var(CACHE_DIR_ENV, "/tmp/wikiart-env");
        let settings = Settings::resolve(Some("/tmp/explicit".into())).unwrap();
        assert_eq!(settings.cache_dir, PathBuf::from("/tmp/explicit"));

        let settings = Settings::resolve(None).unwrap();
        assert_eq!(settings.cache_dir, PathBuf::from("/tmp/wikiart-env"));

        std::env::remove_var(CACHE_DIR_ENV);
        if let Ok(settings) = Settings::resolve(None) {
            assert!(settings.cache_dir.ends_with("wikiart"));
        }

        match previous {
            Some(value) => std::env::set_var(CACHE_DIR_ENV, value),
            None => std::env::remove_var(CACHE_DIR_ENV),
        }
    }
}
