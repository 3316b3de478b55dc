//! # popsim-catalog
//!
//! A catalog of standard inputs for population-genetic simulation.
//!
//! Setting up a realistic simulation means collecting a species' chromosome
//! lengths, per-chromosome mutation and recombination rates, a genetic map
//! and a published demographic model, each from a different paper. This
//! crate ships those inputs, curated and cited, so that a simulation of
//! *Drosophila melanogaster* under a published out-of-Africa model is one
//! lookup away.
//!
//! ## Features
//!
//! - **Species catalog**: genomes, genetic maps and models keyed by a short id
//! - **Genetic maps**: HapMap-format recombination maps read from a local cache
//! - **Demographic models**: published models plus generic constant-size and
//!   two-epoch builders, with epoch summaries and tolerance-based comparison
//! - **Simulation configuration**: engine-facing JSON with citations and provenance
//!
//! ## Example
//!
//! ```rust
//! use popsim_catalog::{get_species, utils::cache::CacheDir, TwoEpochModel};
//!
//! let species = get_species("dromel").unwrap();
//! let contig = species
//!     .get_contig("chr2L", None, 0.1, &CacheDir::default())
//!     .unwrap();
//! println!("{contig}");
//!
//! let model = species.get_model("african_3epoch").unwrap();
//! assert_eq!(model.num_populations(), 1);
//!
//! let generic = TwoEpochModel::new(10_000.0, 1_000.0, 200.0).unwrap();
//! assert_eq!(generic.model().population_size_at(0, 500.0), Some(1_000.0));
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Species catalog storage and the embedded registry
//! - [`core`]: Species, genome, chromosome, genetic map and contig records
//! - [`models`]: Demographic models and generic model builders
//! - [`simulation`]: Simulation configuration and provenance
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod models;
pub mod simulation;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::store::{CatalogError, SpeciesCatalog};
pub use catalog::{all_genetic_maps, all_models, all_species, get_species};
pub use core::chromosome::Chromosome;
pub use core::contig::Contig;
pub use core::genetic_map::{GeneticMap, GeneticMapError};
pub use core::genome::Genome;
pub use core::recombination::RecombinationMap;
pub use core::species::Species;
pub use core::types::*;
pub use models::{ConstantSizeModel, DemographicEvent, Model, ModelError, TwoEpochModel, UnequalModelsError};
pub use simulation::{Provenance, SimulationConfig};
