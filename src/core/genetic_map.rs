use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::recombination::{RecombinationMap, RecombinationMapError};
use crate::core::types::{Citation, SpeciesId};
use crate::utils::cache::CacheDir;
use crate::utils::validation::MAX_MAP_POSITIONS;

/// Conversion from cM/Mb to per-base-pair, per-generation rates
const CM_PER_MB_TO_RATE: f64 = 1e-8;

#[derive(Error, Debug)]
pub enum GeneticMapError {
    #[error(
        "genetic map '{map}' has no file for chromosome '{chromosome}' at {path}; \
         download and unpack {url} into {dir}"
    )]
    NotCached {
        map: String,
        chromosome: String,
        path: PathBuf,
        dir: PathBuf,
        url: String,
    },

    #[error("failed to read genetic map file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed genetic map: {0}")]
    InvalidFormat(String),

    #[error("invalid recombination map: {0}")]
    InvalidMap(#[from] RecombinationMapError),
}

/// A published genetic map for a species, stored as one HapMap-format file per chromosome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticMap {
    pub id: String,

    /// Species the map belongs to
    pub species: SpeciesId,

    pub description: String,

    /// Archive containing the per-chromosome files
    pub url: String,

    /// File name of a chromosome's map; `{name}` is replaced by the chromosome name
    pub file_pattern: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

impl GeneticMap {
    /// File name holding the map for `chromosome`
    pub fn file_name(&self, chromosome: &str) -> String {
        self.file_pattern.replace("{name}", chromosome)
    }

    /// Directory in `cache` where this map's files live
    pub fn cache_dir(&self, cache: &CacheDir) -> PathBuf {
        cache.genetic_map_dir(self.species.as_str(), &self.id)
    }

    /// Locate the file for `chromosome`, accepting a gzip-compressed variant.
    fn locate(&self, cache: &CacheDir, chromosome: &str) -> Result<PathBuf, GeneticMapError> {
        let dir = self.cache_dir(cache);
        let path = dir.join(self.file_name(chromosome));
        if path.is_file() {
            return Ok(path);
        }
        let gz = dir.join(format!("{}.gz", self.file_name(chromosome)));
        if gz.is_file() {
            return Ok(gz);
        }
        Err(GeneticMapError::NotCached {
            map: self.id.clone(),
            chromosome: chromosome.to_string(),
            path,
            dir,
            url: self.url.clone(),
        })
    }

    /// Whether the map file for `chromosome` is present in `cache`
    pub fn is_cached(&self, cache: &CacheDir, chromosome: &str) -> bool {
        self.locate(cache, chromosome).is_ok()
    }

    /// Load the recombination map of `chromosome` from `cache`.
    ///
    /// # Errors
    ///
    /// Returns `GeneticMapError::NotCached` if the file is absent, or a read or
    /// format error if it cannot be parsed.
    pub fn chromosome_map(
        &self,
        cache: &CacheDir,
        chromosome: &str,
    ) -> Result<RecombinationMap, GeneticMapError> {
        let path = self.locate(cache, chromosome)?;
        debug!("Reading genetic map {} for {} from {}", self.id, chromosome, path.display());
        read_hapmap_file(&path)
    }
}

impl std::fmt::Display for GeneticMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeneticMap(species={}, id={})", self.species, self.id)
    }
}

/// Read a HapMap-format map file, transparently decompressing `.gz` files.
///
/// # Errors
///
/// Returns `GeneticMapError::Io` if the file cannot be read, or a format error.
pub fn read_hapmap_file(path: &Path) -> Result<RecombinationMap, GeneticMapError> {
    let io_err = |source| GeneticMapError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let reader: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
        Box::new(MultiGzDecoder::new(file))
    } else {
        Box::new(file)
    };
    read_hapmap(BufReader::new(reader)).map_err(|e| match e {
        GeneticMapError::Io { source, .. } => io_err(source),
        other => other,
    })
}

/// Parse HapMap-format text: a header line, then
/// `Chromosome Position(bp) Rate(cM/Mb) Map(cM)` rows.
///
/// The rate on a row applies from its position up to the next row. A leading
/// zero-rate interval is added when the first position is not 0, and the
/// last row ends the map.
///
/// # Errors
///
/// Returns `GeneticMapError::InvalidFormat` on short rows, unparsable numbers,
/// or maps with fewer than two positions.
pub fn read_hapmap<R: BufRead>(reader: R) -> Result<RecombinationMap, GeneticMapError> {
    let mut positions = Vec::new();
    let mut rates = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| GeneticMapError::Io {
            path: PathBuf::new(),
            source,
        })?;
        // First line is the column header
        if i == 0 {
            continue;
        }
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_num = i + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            return Err(GeneticMapError::InvalidFormat(format!(
                "line {line_num} has fewer than 3 fields"
            )));
        }

        let position: f64 = fields[1].parse().map_err(|_| {
            GeneticMapError::InvalidFormat(format!(
                "invalid position on line {line_num}: '{}'",
                fields[1]
            ))
        })?;
        let rate: f64 = fields[2].parse().map_err(|_| {
            GeneticMapError::InvalidFormat(format!(
                "invalid rate on line {line_num}: '{}'",
                fields[2]
            ))
        })?;

        if positions.len() >= MAX_MAP_POSITIONS {
            return Err(GeneticMapError::InvalidFormat(format!(
                "more than {MAX_MAP_POSITIONS} positions"
            )));
        }

        positions.push(position);
        rates.push(rate * CM_PER_MB_TO_RATE);
    }

    if positions.is_empty() {
        return Err(GeneticMapError::InvalidFormat(
            "no map positions found".to_string(),
        ));
    }

    if positions[0] != 0.0 {
        positions.insert(0, 0.0);
        rates.insert(0, 0.0);
    }

    Ok(RecombinationMap::new(positions, rates)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    const HAPMAP: &str = "Chromosome\tPosition(bp)\tRate(cM/Mb)\tMap(cM)
chr1\t1000\t2.0\t0.0
chr1\t2000\t4.0\t0.002
chr1\t4000\t0.0\t0.01
";

    fn map() -> GeneticMap {
        GeneticMap {
            id: "TestMap".to_string(),
            species: SpeciesId::new("testsp"),
            description: "test".to_string(),
            url: "http://example.org/maps.tar.gz".to_string(),
            file_pattern: "map_{name}.txt".to_string(),
            citations: Vec::new(),
        }
    }

    #[test]
    fn test_read_hapmap() {
        let recomb = read_hapmap(HAPMAP.as_bytes()).unwrap();
        assert_eq!(recomb.positions(), &[0.0, 1000.0, 2000.0, 4000.0]);
        assert_relative_eq!(recomb.rates()[1], 2e-8);
        assert_relative_eq!(recomb.rates()[2], 4e-8);
        assert_eq!(recomb.rates()[0], 0.0);
        assert_eq!(recomb.sequence_length(), 4000.0);
        assert_relative_eq!(recomb.total_genetic_length(), 1000.0 * 2e-8 + 2000.0 * 4e-8);
    }

    #[test]
    fn test_read_hapmap_starting_at_zero() {
        let text = "header\nchr1 0 1.0 0\nchr1 500 0 0.0005\n";
        let recomb = read_hapmap(text.as_bytes()).unwrap();
        assert_eq!(recomb.positions(), &[0.0, 500.0]);
    }

    #[test]
    fn test_read_hapmap_errors() {
        assert!(matches!(
            read_hapmap("header\n".as_bytes()),
            Err(GeneticMapError::InvalidFormat(_))
        ));
        assert!(matches!(
            read_hapmap("header\nchr1 10\n".as_bytes()),
            Err(GeneticMapError::InvalidFormat(_))
        ));
        assert!(matches!(
            read_hapmap("header\nchr1 ten 1.0 0\n".as_bytes()),
            Err(GeneticMapError::InvalidFormat(_))
        ));
        assert!(matches!(
            read_hapmap("header\nchr1 10 1.0 0\nchr1 5 1.0 0\n".as_bytes()),
            Err(GeneticMapError::InvalidMap(_))
        ));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(map().file_name("chr2L"), "map_chr2L.txt");
    }

    #[test]
    fn test_chromosome_map_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheDir::new(dir.path());
        let err = map().chromosome_map(&cache, "chr1").unwrap_err();
        assert!(matches!(err, GeneticMapError::NotCached { .. }));
        assert!(err.to_string().contains("http://example.org/maps.tar.gz"));
        assert!(!map().is_cached(&cache, "chr1"));
    }

    #[test]
    fn test_chromosome_map_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheDir::new(dir.path());
        let gm = map();
        let map_dir = gm.cache_dir(&cache);
        std::fs::create_dir_all(&map_dir).unwrap();
        std::fs::write(map_dir.join("map_chr1.txt"), HAPMAP).unwrap();

        assert!(gm.is_cached(&cache, "chr1"));
        let recomb = gm.chromosome_map(&cache, "chr1").unwrap();
        assert_eq!(recomb.sequence_length(), 4000.0);
    }

    #[test]
    fn test_chromosome_map_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheDir::new(dir.path());
        let gm = map();
        let map_dir = gm.cache_dir(&cache);
        std::fs::create_dir_all(&map_dir).unwrap();

        let file = File::create(map_dir.join("map_chr1.txt.gz")).unwrap();
        let mut encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        encoder.write_all(HAPMAP.as_bytes()).unwrap();
        encoder.finish().unwrap();

        let recomb = gm.chromosome_map(&cache, "chr1").unwrap();
        assert_eq!(recomb.positions().len(), 4);
    }
}
