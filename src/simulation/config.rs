use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::contig::Contig;
use crate::core::species::Species;
use crate::core::types::{Citation, CitationReason, SpeciesId};
use crate::models::model::{Model, ModelError};
use crate::models::population::Sample;
use crate::simulation::provenance::Provenance;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("No samples requested")]
    NoSamples,

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write configuration to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The species fields the engine needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSummary {
    pub id: SpeciesId,
    pub name: String,
    pub generation_time: f64,
}

impl From<&Species> for SpeciesSummary {
    fn from(species: &Species) -> Self {
        Self {
            id: species.id.clone(),
            name: species.name.clone(),
            generation_time: species.generation_time,
        }
    }
}

/// Everything an external engine needs to run one simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub species: SpeciesSummary,
    pub model: Model,
    pub contig: Contig,
    pub samples: Vec<Sample>,
    pub citations: Vec<Citation>,
    pub provenance: Provenance,
}

impl SimulationConfig {
    /// Assemble a configuration, drawing `counts[i]` samples from the i-th
    /// sampling population of `model`.
    ///
    /// # Errors
    ///
    /// Returns an error if no samples are requested or the model rejects the counts.
    pub fn new(
        species: &Species,
        model: Model,
        contig: Contig,
        counts: &[usize],
        provenance: Provenance,
    ) -> Result<Self, SimulationError> {
        let samples = model.get_samples(counts)?;
        if samples.is_empty() {
            return Err(SimulationError::NoSamples);
        }
        let citations = collect_citations(species, &model, &contig);
        Ok(Self {
            species: species.into(),
            model,
            contig,
            samples,
            citations,
            provenance,
        })
    }

    pub fn to_json(&self) -> Result<String, SimulationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the configuration as JSON to `path`.
    ///
    /// # Errors
    ///
    /// Returns `SimulationError::Write` if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> Result<(), SimulationError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| SimulationError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Wrote simulation configuration to {}", path.display());
        Ok(())
    }

    /// Print the papers to cite for this simulation, grouped by what they are cited for.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn write_citations(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(
            out,
            "If you use this simulation in published work, please cite the following papers:"
        )?;
        let sections = [
            ("Simulation engine", CitationReason::SimulationEngine),
            ("Genetic map", CitationReason::GeneticMap),
            ("Simulation model", CitationReason::DemographicModel),
        ];
        for (title, reason) in sections {
            let cited: Vec<&Citation> = self
                .citations
                .iter()
                .filter(|c| c.reasons.contains(&reason))
                .collect();
            if cited.is_empty() {
                continue;
            }
            writeln!(out, "******************")?;
            if reason == CitationReason::DemographicModel {
                writeln!(out, "{title}: {}", self.model.name)?;
            } else {
                writeln!(out, "{title}:")?;
            }
            writeln!(out, "******************")?;
            for citation in cited {
                writeln!(out, "\t{citation}")?;
            }
        }
        Ok(())
    }
}

/// Citations for the engine, the genetic map behind `contig` (if any) and `model`
pub fn collect_citations(species: &Species, model: &Model, contig: &Contig) -> Vec<Citation> {
    let mut citations = vec![Citation::msprime()];
    if let Some(map) = contig
        .genetic_map
        .as_deref()
        .and_then(|id| species.get_genetic_map(id).ok())
    {
        citations.extend(
            map.citations
                .iter()
                .cloned()
                .map(|c| c.because(CitationReason::GeneticMap)),
        );
    }
    citations.extend(
        model
            .citations
            .iter()
            .cloned()
            .map(|c| c.because(CitationReason::DemographicModel)),
    );
    citations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_species;
    use crate::utils::cache::CacheDir;

    fn dromel_config(counts: &[usize]) -> Result<SimulationConfig, SimulationError> {
        let species = get_species("dromel").unwrap();
        let model = species.get_model("ooa_2").unwrap().clone();
        let contig = species
            .get_contig("chr4", None, 1.0, &CacheDir::new("/nonexistent"))
            .unwrap();
        SimulationConfig::new(species, model, contig, counts, Provenance::new("popsim", Vec::new()))
    }

    #[test]
    fn test_config_samples() {
        let config = dromel_config(&[2, 3]).unwrap();
        assert_eq!(config.samples.len(), 5);
        assert_eq!(config.samples.iter().filter(|s| s.population == 1).count(), 3);
        assert_eq!(config.species.id.as_str(), "dromel");
    }

    #[test]
    fn test_config_rejects_bad_samples() {
        assert!(matches!(dromel_config(&[0, 0]), Err(SimulationError::NoSamples)));
        assert!(matches!(
            dromel_config(&[1, 1, 1]),
            Err(SimulationError::Model(ModelError::TooManySamplePopulations { .. }))
        ));
    }

    #[test]
    fn test_citations() {
        let config = dromel_config(&[2]).unwrap();
        assert!(config.citations[0].reasons.contains(&CitationReason::SimulationEngine));
        assert!(config
            .citations
            .iter()
            .any(|c| c.reasons.contains(&CitationReason::DemographicModel)));
        assert!(!config
            .citations
            .iter()
            .any(|c| c.reasons.contains(&CitationReason::GeneticMap)));

        let mut out = Vec::new();
        config.write_citations(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Simulation engine:"));
        assert!(text.contains("Kelleher et al., 2016"));
        assert!(text.contains("Simulation model:"));
        assert!(!text.contains("Genetic map:"));
    }

    #[test]
    fn test_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = dromel_config(&[4]).unwrap();
        config.write_to(&path).unwrap();

        let reloaded: SimulationConfig =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded, config);
    }
}
