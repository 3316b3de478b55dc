//! Demographic models.
//!
//! A [`Model`] describes populations at the present, the migration matrix in
//! force at the present, and a time-ordered list of [`DemographicEvent`]s that
//! change population sizes, growth rates and migration going back in time.
//! Times are in generations before the present.
//!
//! Published models are part of each species' catalog entry. Two generic
//! models can be built for any species:
//!
//! - [`ConstantSizeModel`]: one population of constant size `N`
//! - [`TwoEpochModel`]: one population of size `N1` back to `T` generations
//!   ago and `N2` before that
//!
//! ## Example
//!
//! ```rust
//! use popsim_catalog::models::{Model, TwoEpochModel};
//!
//! let model: Model = TwoEpochModel::new(10_000.0, 2_000.0, 500.0).unwrap().into();
//! assert_eq!(model.population_size_at(0, 100.0), Some(10_000.0));
//! assert_eq!(model.population_size_at(0, 1_000.0), Some(2_000.0));
//! ```

pub mod events;
pub mod generic;
pub mod history;
pub mod model;
pub mod population;

pub use events::DemographicEvent;
pub use generic::{ConstantSizeModel, TwoEpochModel};
pub use history::Epoch;
pub use model::{Model, ModelError, UnequalModelsError};
pub use population::{Population, Sample};
