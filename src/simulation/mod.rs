//! Engine-facing simulation configuration.
//!
//! The crate does not simulate. It assembles a [`SimulationConfig`] (species,
//! model, contig and samples, plus citations and a [`Provenance`] record) and
//! writes it as JSON for a coalescent engine to consume.

pub mod config;
pub mod provenance;

pub use config::{collect_citations, SimulationConfig, SimulationError, SpeciesSummary};
pub use provenance::Provenance;
