//! Command-line interface for popsim.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **species**: List species or show one species in detail
//! - **model**: List published models or show a model's demographic history
//! - **contig**: Describe the contig that would be simulated
//! - **catalog**: Export the catalog or list genetic maps and their cache status
//! - **simulate**: Write a simulation configuration for an external engine
//! - **provenance**: Print the provenance record of this invocation
//!
//! ## Usage
//!
//! ```text
//! # What species are available?
//! popsim species list
//!
//! # Demographic history of a published model
//! popsim model show dromel african_3epoch
//!
//! # 20 samples from chr2L under the out-of-Africa model
//! popsim simulate dromel -c chr2L -m ooa_2 10 10 -o ooa.json
//!
//! # Use a genetic map from the local cache
//! POPSIM_CACHE_DIR=/data/popsim popsim contig aratha -c chr1 -g Salome2012
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::catalog::store::SpeciesCatalog;
use crate::utils::cache::{CacheDir, CACHE_DIR_ENV};

pub mod catalog;
pub mod contig;
pub mod model;
pub mod simulate;
pub mod species;

#[derive(Parser)]
#[command(name = "popsim")]
#[command(version)]
#[command(about = "Standard population-genetic simulation inputs: species, genetic maps and demographic models")]
#[command(
    long_about = "popsim is a catalog of curated inputs for population-genetic simulation.\n\nFor each species it knows the genome (chromosome lengths with default mutation and recombination rates), published genetic maps, and published demographic models. It writes complete, cited simulation configurations for a coalescent engine to run."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase logging verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Do not print citation information
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Path to custom catalog file (defaults to the embedded catalog)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Directory holding downloaded genetic maps
    #[arg(long, global = true, env = CACHE_DIR_ENV)]
    pub cache_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List or show species
    Species(species::SpeciesArgs),

    /// List or show demographic models
    Model(model::ModelArgs),

    /// Describe a contig of a species' genome
    Contig(contig::ContigArgs),

    /// Manage the species catalog
    Catalog(catalog::CatalogArgs),

    /// Write a simulation configuration
    Simulate(simulate::SimulateArgs),

    /// Print the provenance record for this invocation
    Provenance,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Options shared by every subcommand
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub format: OutputFormat,
    pub quiet: bool,
    pub catalog: Option<PathBuf>,
    pub cache: CacheDir,
}

impl GlobalOptions {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            quiet: cli.quiet,
            catalog: cli.catalog.clone(),
            cache: CacheDir::resolve(cli.cache_dir.as_deref()),
        }
    }

    /// Load the custom catalog if one was given, else the embedded one
    pub fn load_catalog(&self) -> anyhow::Result<SpeciesCatalog> {
        load_catalog(self.catalog.as_deref())
    }
}

pub fn load_catalog(path: Option<&Path>) -> anyhow::Result<SpeciesCatalog> {
    let catalog = if let Some(path) = path {
        SpeciesCatalog::load_from_file(path)?
    } else {
        SpeciesCatalog::load_embedded()?
    };
    debug!("Loaded catalog with {} species", catalog.len());
    Ok(catalog)
}

pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
