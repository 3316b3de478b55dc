use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::genetic_map::{GeneticMap, GeneticMapError};
use crate::core::recombination::RecombinationMapError;
use crate::core::species::Species;
use crate::core::types::SpeciesId;
use crate::models::model::{Model, ModelError};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Species '{0}' not in catalog")]
    SpeciesNotFound(String),

    #[error("Chromosome '{chromosome}' not found for species '{species}'")]
    ChromosomeNotFound { species: String, chromosome: String },

    #[error("Model '{model}' not found for species '{species}'")]
    ModelNotFound { species: String, model: String },

    #[error("Genetic map '{map}' not found for species '{species}'")]
    GeneticMapNotFound { species: String, map: String },

    #[error("Species '{0}' is already in the catalog")]
    DuplicateSpecies(String),

    #[error("Invalid species '{species}': {reason}")]
    InvalidSpecies { species: String, reason: String },

    #[error("Cannot use a length multiplier other than 1 with a genetic map")]
    LengthMultiplierWithGeneticMap,

    #[error("Length multiplier must be a positive number, got {0}")]
    InvalidLengthMultiplier(f64),

    #[error(transparent)]
    GeneticMap(#[from] GeneticMapError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    RecombinationMap(#[from] RecombinationMapError),

    #[error("Embedded catalog unavailable: {0}")]
    EmbeddedUnavailable(String),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    pub created_at: String,
    pub species: Vec<Species>,
}

/// Catalog of species, indexed by id
#[derive(Debug, Default)]
pub struct SpeciesCatalog {
    /// All species, in catalog order
    pub species: Vec<Species>,

    /// Index: species ID -> index in species vec
    id_to_index: HashMap<SpeciesId, usize>,
}

impl SpeciesCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the embedded default catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON fails to parse or validate.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        // Validated at compile time by build.rs
        const EMBEDDED_CATALOG: &str = include_str!("../../catalogs/species.json");
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse catalog from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any species is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            warn!(
                "Catalog version mismatch (expected {}, found {})",
                CATALOG_VERSION, data.version
            );
        }

        let mut catalog = Self::new();
        for species in data.species {
            catalog.add_species(species)?;
        }
        Ok(catalog)
    }

    /// Add a species to the catalog
    ///
    /// # Errors
    ///
    /// Returns `DuplicateSpecies` if the id is taken, or `InvalidSpecies` if
    /// the record breaks a catalog invariant.
    pub fn add_species(&mut self, species: Species) -> Result<(), CatalogError> {
        if self.id_to_index.contains_key(&species.id) {
            return Err(CatalogError::DuplicateSpecies(species.id.to_string()));
        }
        species.validate()?;

        debug!(
            "Registering species {} ({} models, {} genetic maps)",
            species.id,
            species.models.len(),
            species.genetic_maps.len()
        );
        self.id_to_index.insert(species.id.clone(), self.species.len());
        self.species.push(species);
        Ok(())
    }

    /// Get a species by ID
    pub fn get(&self, id: &str) -> Option<&Species> {
        self.id_to_index
            .get(&SpeciesId::new(id))
            .map(|&idx| &self.species[idx])
    }

    /// Get a species by ID, failing if it is unknown
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::SpeciesNotFound` for ids not in the catalog.
    pub fn get_species(&self, id: &str) -> Result<&Species, CatalogError> {
        self.get(id)
            .ok_or_else(|| CatalogError::SpeciesNotFound(id.to_string()))
    }

    /// Every genetic map across all species
    pub fn all_genetic_maps(&self) -> impl Iterator<Item = &GeneticMap> {
        self.species.iter().flat_map(|sp| sp.genetic_maps.iter())
    }

    /// Every published model across all species, with its species
    pub fn all_models(&self) -> impl Iterator<Item = (&Species, &Model)> {
        self.species
            .iter()
            .flat_map(|sp| sp.models.iter().map(move |m| (sp, m)))
    }

    /// Export catalog to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            species: self.species.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of species in catalog
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chromosome::Chromosome;
    use crate::core::genome::Genome;

    fn toy_species(id: &str) -> Species {
        Species::new(
            id,
            "Toy species",
            Genome::new(vec![Chromosome::new("1", 1000, 1e-8, 1e-8)]),
            1.0,
            100.0,
        )
    }

    #[test]
    fn test_load_embedded_catalog() {
        let catalog = SpeciesCatalog::load_embedded().unwrap();
        assert_eq!(catalog.len(), 3);
        for id in ["esccol", "dromel", "aratha"] {
            assert_eq!(catalog.get_species(id).unwrap().id.as_str(), id);
        }
    }

    #[test]
    fn test_catalog_get_nonexistent() {
        let catalog = SpeciesCatalog::load_embedded().unwrap();
        assert!(catalog.get("homsap").is_none());
        assert!(matches!(
            catalog.get_species("homsap"),
            Err(CatalogError::SpeciesNotFound(ref id)) if id == "homsap"
        ));
    }

    #[test]
    fn test_catalog_json_roundtrip() {
        let catalog = SpeciesCatalog::load_embedded().unwrap();
        let json = catalog.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"species\""));

        let reloaded = SpeciesCatalog::from_json(&json).unwrap();
        assert_eq!(reloaded.species, catalog.species);
    }

    #[test]
    fn test_add_species() {
        let mut catalog = SpeciesCatalog::new();
        assert!(catalog.is_empty());
        catalog.add_species(toy_species("toy")).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("toy").unwrap().name, "Toy species");

        assert!(matches!(
            catalog.add_species(toy_species("toy")),
            Err(CatalogError::DuplicateSpecies(_))
        ));
    }

    #[test]
    fn test_add_invalid_species() {
        let mut catalog = SpeciesCatalog::new();
        let mut sp = toy_species("bad");
        sp.generation_time = 0.0;
        assert!(matches!(
            catalog.add_species(sp),
            Err(CatalogError::InvalidSpecies { .. })
        ));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_genome_length_overflow_rejected() {
        let json = format!(
            r#"{{"version": "1.0.0", "created_at": "", "species": [{{
                "id": "huge", "name": "Huge genome", "generation_time": 1.0,
                "population_size": 100.0,
                "genome": {{"chromosomes": [
                    {{"name": "1", "length": {}, "recombination_rate": 0.0, "mutation_rate": 0.0}},
                    {{"name": "2", "length": 2, "recombination_rate": 0.0, "mutation_rate": 0.0}}
                ]}}
            }}]}}"#,
            u64::MAX
        );
        assert!(matches!(
            SpeciesCatalog::from_json(&json),
            Err(CatalogError::InvalidSpecies { ref reason, .. }) if reason.contains("overflows")
        ));
    }

    #[test]
    fn test_version_mismatch_still_loads() {
        let json = r#"{"version": "0.9.0", "created_at": "", "species": []}"#;
        let catalog = SpeciesCatalog::from_json(json).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_all_models_and_maps() {
        let catalog = SpeciesCatalog::load_embedded().unwrap();
        let models: Vec<_> = catalog
            .all_models()
            .map(|(sp, m)| format!("{}/{}", sp.id, m.id))
            .collect();
        assert!(models.contains(&"dromel/african_3epoch".to_string()));
        assert!(models.contains(&"aratha/south_middle_atlas".to_string()));
        assert!(catalog.all_genetic_maps().any(|gm| gm.id == "Salome2012"));
    }
}
