use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::store::CatalogError;
use crate::core::contig::Contig;
use crate::core::genetic_map::GeneticMap;
use crate::core::genome::Genome;
use crate::core::recombination::RecombinationMap;
use crate::core::types::SpeciesId;
use crate::models::generic::ConstantSizeModel;
use crate::models::model::{Model, ModelError};
use crate::utils::cache::CacheDir;
use crate::utils::validation::ensure_positive;

/// A species in the catalog: its genome, genetic maps and demographic models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    /// Unique identifier
    pub id: SpeciesId,

    /// Scientific name
    pub name: String,

    /// Common name
    #[serde(default)]
    pub common_name: String,

    /// Generation time in years
    pub generation_time: f64,

    /// Default effective population size
    pub population_size: f64,

    pub genome: Genome,

    #[serde(default)]
    pub genetic_maps: Vec<GeneticMap>,

    #[serde(default)]
    pub models: Vec<Model>,
}

impl Species {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        genome: Genome,
        generation_time: f64,
        population_size: f64,
    ) -> Self {
        Self {
            id: SpeciesId::new(id),
            name: name.into(),
            common_name: String::new(),
            generation_time,
            population_size,
            genome,
            genetic_maps: Vec::new(),
            models: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_common_name(mut self, common_name: impl Into<String>) -> Self {
        self.common_name = common_name.into();
        self
    }

    pub fn add_model(&mut self, model: Model) {
        self.models.push(model);
    }

    pub fn add_genetic_map(&mut self, mut genetic_map: GeneticMap) {
        genetic_map.species = self.id.clone();
        self.genetic_maps.push(genetic_map);
    }

    /// Look up one of the species' published models by id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ModelNotFound` if no model has this id.
    pub fn get_model(&self, id: &str) -> Result<&Model, CatalogError> {
        self.models
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CatalogError::ModelNotFound {
                species: self.id.to_string(),
                model: id.to_string(),
            })
    }

    /// # Errors
    ///
    /// Returns `CatalogError::GeneticMapNotFound` if no map has this id.
    pub fn get_genetic_map(&self, id: &str) -> Result<&GeneticMap, CatalogError> {
        self.genetic_maps
            .iter()
            .find(|gm| gm.id == id)
            .ok_or_else(|| CatalogError::GeneticMapNotFound {
                species: self.id.to_string(),
                map: id.to_string(),
            })
    }

    /// # Errors
    ///
    /// Returns `CatalogError::ChromosomeNotFound` if the genome has no such chromosome.
    pub fn get_chromosome(&self, name: &str) -> Result<&crate::core::chromosome::Chromosome, CatalogError> {
        self.genome
            .get_chromosome(name)
            .ok_or_else(|| CatalogError::ChromosomeNotFound {
                species: self.id.to_string(),
                chromosome: name.to_string(),
            })
    }

    /// Constant-size model at the species' default population size
    ///
    /// # Errors
    ///
    /// Returns an error if the species' population size or generation time is invalid.
    pub fn default_model(&self) -> Result<Model, ModelError> {
        ConstantSizeModel::new(self.population_size)?
            .into_model()
            .with_generation_time(self.generation_time)
    }

    /// Describe the region of `chromosome` to simulate.
    ///
    /// Without a genetic map the contig has a flat recombination map at the
    /// chromosome's default rate over `length_multiplier` times its length.
    /// With a genetic map the map is read from `cache` and the multiplier must be 1.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if the chromosome or map is unknown, the
    /// multiplier is invalid or combined with a map, or the map cannot be read.
    pub fn get_contig(
        &self,
        chromosome: &str,
        genetic_map: Option<&str>,
        length_multiplier: f64,
        cache: &CacheDir,
    ) -> Result<Contig, CatalogError> {
        let chrom = self.get_chromosome(chromosome)?;
        ensure_positive("length_multiplier", length_multiplier)
            .map_err(|_| CatalogError::InvalidLengthMultiplier(length_multiplier))?;

        match genetic_map {
            None => {
                debug!("Making flat chromosome {} * {}", length_multiplier, chrom.name);
                #[allow(clippy::cast_precision_loss)]
                let length = chrom.length as f64 * length_multiplier;
                let recomb = RecombinationMap::uniform(length, chrom.recombination_rate)?;
                Ok(Contig::new(&chrom.name, recomb, chrom.mutation_rate))
            }
            Some(map_id) => {
                if length_multiplier != 1.0 {
                    return Err(CatalogError::LengthMultiplierWithGeneticMap);
                }
                debug!("Getting map for {} from {}", chrom.name, map_id);
                let gm = self.get_genetic_map(map_id)?;
                let recomb = gm.chromosome_map(cache, &chrom.name)?;
                Ok(Contig::new(&chrom.name, recomb, chrom.mutation_rate).with_genetic_map(&gm.id))
            }
        }
    }

    /// Check the catalog invariants for this species and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidSpecies` describing the first problem.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidSpecies {
            species: self.id.to_string(),
            reason,
        };

        if self.id.as_str().is_empty() {
            return Err(invalid("empty species id".to_string()));
        }
        ensure_positive("generation_time", self.generation_time)
            .map_err(|e| invalid(e.to_string()))?;
        ensure_positive("population_size", self.population_size)
            .map_err(|e| invalid(e.to_string()))?;

        if self.genome.chromosomes.is_empty() {
            return Err(invalid("genome has no chromosomes".to_string()));
        }
        let mut names = HashSet::new();
        for chrom in &self.genome.chromosomes {
            chrom.validate().map_err(|e| invalid(e.to_string()))?;
            if !names.insert(chrom.name.as_str()) {
                return Err(invalid(format!("duplicate chromosome '{}'", chrom.name)));
            }
        }
        if self.genome.checked_length().is_none() {
            return Err(invalid("total genome length overflows u64".to_string()));
        }

        let mut map_ids = HashSet::new();
        for gm in &self.genetic_maps {
            if gm.species != self.id {
                return Err(invalid(format!(
                    "genetic map '{}' belongs to species '{}'",
                    gm.id, gm.species
                )));
            }
            if !map_ids.insert(gm.id.as_str()) {
                return Err(invalid(format!("duplicate genetic map '{}'", gm.id)));
            }
        }
        if let Some(default_map) = &self.genome.default_genetic_map {
            if !map_ids.contains(default_map.as_str()) {
                return Err(invalid(format!(
                    "default genetic map '{default_map}' is not defined"
                )));
            }
        }

        let mut model_ids = HashSet::new();
        for model in &self.models {
            model
                .validate()
                .map_err(|e| invalid(format!("model '{}': {e}", model.id)))?;
            if !model_ids.insert(model.id.as_str()) {
                return Err(invalid(format!("duplicate model '{}'", model.id)));
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Species(id={}, name={})", self.id, self.name)
    }
}
