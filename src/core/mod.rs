//! Catalog records describing species and the genomes to simulate.
//!
//! - [`Species`](species::Species): a catalog entry with its genome, genetic maps and models
//! - [`Genome`](genome::Genome) and [`Chromosome`](chromosome::Chromosome): physical layout
//!   with default mutation and recombination rates
//! - [`GeneticMap`](genetic_map::GeneticMap): a published recombination map, read from the
//!   local cache as a [`RecombinationMap`](recombination::RecombinationMap)
//! - [`Contig`](contig::Contig): the region handed to the simulation engine
//! - [`SpeciesId`](types::SpeciesId), [`Citation`](types::Citation): shared metadata types
//!
//! Rates are per base pair per generation. Chromosome names are matched
//! exactly, as written in the catalog.

pub mod chromosome;
pub mod contig;
pub mod genetic_map;
pub mod genome;
pub mod recombination;
pub mod species;
pub mod types;
