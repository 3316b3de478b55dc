//! Generic single-population models that apply to any species.

use crate::models::events::DemographicEvent;
use crate::models::model::{Model, ModelError};
use crate::models::population::Population;
use crate::utils::validation::{ensure_non_negative, ensure_positive};

fn generic_population(size: f64) -> Population {
    Population::new("pop0", "Generic population", size)
}

/// A single population of constant size `N`
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantSizeModel {
    population_size: f64,
    model: Model,
}

impl ConstantSizeModel {
    pub const ID: &'static str = "constant";

    /// # Errors
    ///
    /// Returns `ModelError::InvalidParameter` unless `population_size` is finite and > 0.
    pub fn new(population_size: f64) -> Result<Self, ModelError> {
        let population_size = ensure_positive("N", population_size)?;
        let model = Model::new(
            Self::ID,
            "Constant size",
            vec![generic_population(population_size)],
            vec![vec![0.0]],
            Vec::new(),
        )?
        .with_description("Generic model of a single population of constant size.");
        Ok(Self {
            population_size,
            model,
        })
    }

    pub fn population_size(&self) -> f64 {
        self.population_size
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }
}

impl From<ConstantSizeModel> for Model {
    fn from(generic: ConstantSizeModel) -> Self {
        generic.into_model()
    }
}

/// A single population whose size changes once, `T` generations ago:
/// size `N1` from the present back to `T`, and `N2` before that.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoEpochModel {
    n1: f64,
    n2: f64,
    t: f64,
    model: Model,
}

impl TwoEpochModel {
    pub const ID: &'static str = "two_epoch";

    /// # Errors
    ///
    /// Returns `ModelError::InvalidParameter` unless both sizes are finite and
    /// > 0 and `t` is finite and >= 0.
    pub fn new(n1: f64, n2: f64, t: f64) -> Result<Self, ModelError> {
        let n1 = ensure_positive("N1", n1)?;
        let n2 = ensure_positive("N2", n2)?;
        let t = ensure_non_negative("T", t)?;
        let model = Model::new(
            Self::ID,
            "Two epoch",
            vec![generic_population(n1)],
            vec![vec![0.0]],
            vec![DemographicEvent::PopulationParametersChange {
                time: t,
                population: Some(0),
                initial_size: Some(n2),
                growth_rate: Some(0.0),
            }],
        )?
        .with_description(
            "Generic model of a single population with piecewise constant size and a single change.",
        );
        Ok(Self { n1, n2, t, model })
    }

    /// Size from the present back to the change
    pub fn recent_size(&self) -> f64 {
        self.n1
    }

    /// Size before the change
    pub fn ancestral_size(&self) -> f64 {
        self.n2
    }

    /// Time of the change in generations ago
    pub fn change_time(&self) -> f64 {
        self.t
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }
}

impl From<TwoEpochModel> for Model {
    fn from(generic: TwoEpochModel) -> Self {
        generic.into_model()
    }
}
