//! Location of on-disk data that is not embedded in the binary.
//!
//! Genetic maps are large and are read from a local cache directory laid out as
//! `<root>/genetic_maps/<species>/<map id>/<file>`. The root is taken from
//! `--cache-dir`, then `POPSIM_CACHE_DIR`, then `$HOME/.cache/popsim`, and
//! finally `./popsim_cache`.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the default cache root
pub const CACHE_DIR_ENV: &str = "POPSIM_CACHE_DIR";

/// Cache directory for genetic maps and other downloaded data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDir {
    root: PathBuf,
}

impl CacheDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the cache root from an explicit path or the environment.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::new(path);
        }
        if let Some(path) = std::env::var_os(CACHE_DIR_ENV).filter(|p| !p.is_empty()) {
            return Self::new(path);
        }
        Self::new(default_root(std::env::var_os("HOME").map(PathBuf::from)))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the per-chromosome files of one genetic map
    pub fn genetic_map_dir(&self, species: &str, map_id: &str) -> PathBuf {
        self.root.join("genetic_maps").join(species).join(map_id)
    }
}

impl Default for CacheDir {
    fn default() -> Self {
        Self::resolve(None)
    }
}

fn default_root(home: Option<PathBuf>) -> PathBuf {
    match home {
        Some(home) => home.join(".cache").join("popsim"),
        None => PathBuf::from("popsim_cache"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let cache = CacheDir::resolve(Some(Path::new("/tmp/maps")));
        assert_eq!(cache.root(), Path::new("/tmp/maps"));
    }

    #[test]
    fn test_default_root() {
        assert_eq!(
            default_root(Some(PathBuf::from("/home/user"))),
            PathBuf::from("/home/user/.cache/popsim")
        );
        assert_eq!(default_root(None), PathBuf::from("popsim_cache"));
    }

    #[test]
    fn test_genetic_map_dir_layout() {
        let cache = CacheDir::new("/cache");
        assert_eq!(
            cache.genetic_map_dir("aratha", "Salome2012"),
            PathBuf::from("/cache/genetic_maps/aratha/Salome2012")
        );
    }
}
