use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::Citation;
use crate::models::events::DemographicEvent;
use crate::models::history::Epoch;
use crate::models::population::{Population, Sample};
use crate::utils::validation::{
    ensure_non_negative, ensure_positive, is_close, ParameterError, DEFAULT_ATOL, DEFAULT_RTOL,
    MAX_SAMPLES,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Invalid model parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    #[error("A model needs at least one population")]
    NoPopulations,

    #[error("Migration matrix must be {expected}x{expected}, got {rows} rows with row {row} of length {cols}")]
    MigrationMatrixShape {
        expected: usize,
        rows: usize,
        row: usize,
        cols: usize,
    },

    #[error("Migration matrix diagonal entry ({0}, {0}) must be 0")]
    MigrationMatrixDiagonal(usize),

    #[error("Population index {index} out of range (model has {num_populations} populations)")]
    PopulationOutOfRange { index: usize, num_populations: usize },

    #[error("Population {0} cannot migrate to itself")]
    SelfMigration(usize),

    #[error("Demographic event {index} at time {time} is earlier than the previous event at {previous}")]
    EventsOutOfOrder {
        index: usize,
        time: f64,
        previous: f64,
    },

    #[error("Cannot sample from more than {available} populations (requested {requested})")]
    TooManySamplePopulations { requested: usize, available: usize },

    #[error("Cannot draw more than {max} samples in total")]
    TooManySamples { max: usize },

    #[error("Sampling is not allowed from population {0} ('{1}')")]
    SamplingNotAllowed(usize, String),
}

/// Raised by [`Model::verify_equal`] when two models differ beyond tolerance
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct UnequalModelsError(pub String);

fn unequal(msg: impl Into<String>) -> UnequalModelsError {
    UnequalModelsError(msg.into())
}

/// A demographic model: populations at the present, the migration matrix in
/// force at the present, and the events that change them going back in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    pub populations: Vec<Population>,

    /// `migration_matrix[j][k]` is the rate at which lineages move from `j` to
    /// `k` backwards in time
    pub migration_matrix: Vec<Vec<f64>>,

    /// Events in non-decreasing time order
    #[serde(default)]
    pub demographic_events: Vec<DemographicEvent>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,

    /// Generation time in years assumed by the published model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_time: Option<f64>,
}

impl Model {
    /// Create a validated model.
    ///
    /// # Errors
    ///
    /// Returns a `ModelError` if any population, event or migration rate is
    /// invalid, or events are not in time order.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        populations: Vec<Population>,
        migration_matrix: Vec<Vec<f64>>,
        demographic_events: Vec<DemographicEvent>,
    ) -> Result<Self, ModelError> {
        let model = Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            populations,
            migration_matrix,
            demographic_events,
            citations: Vec::new(),
            generation_time: None,
        };
        model.validate()?;
        Ok(model)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }

    /// # Errors
    ///
    /// Returns an error if `generation_time` is not positive.
    pub fn with_generation_time(mut self, generation_time: f64) -> Result<Self, ModelError> {
        self.generation_time = Some(ensure_positive("generation_time", generation_time)?);
        Ok(self)
    }

    /// Check every invariant of the model.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.populations.is_empty() {
            return Err(ModelError::NoPopulations);
        }
        for population in &self.populations {
            population.validate()?;
        }

        let n = self.populations.len();
        if self.migration_matrix.len() != n {
            return Err(ModelError::MigrationMatrixShape {
                expected: n,
                rows: self.migration_matrix.len(),
                row: 0,
                cols: self.migration_matrix.first().map_or(0, Vec::len),
            });
        }
        for (j, row) in self.migration_matrix.iter().enumerate() {
            if row.len() != n {
                return Err(ModelError::MigrationMatrixShape {
                    expected: n,
                    rows: self.migration_matrix.len(),
                    row: j,
                    cols: row.len(),
                });
            }
            for (k, &rate) in row.iter().enumerate() {
                if j == k {
                    if rate != 0.0 {
                        return Err(ModelError::MigrationMatrixDiagonal(j));
                    }
                } else {
                    ensure_non_negative("migration rate", rate)?;
                }
            }
        }

        let mut previous = 0.0;
        for (index, event) in self.demographic_events.iter().enumerate() {
            event.validate(n)?;
            let time = event.time();
            if time < previous {
                return Err(ModelError::EventsOutOfOrder {
                    index,
                    time,
                    previous,
                });
            }
            previous = time;
        }

        if let Some(generation_time) = self.generation_time {
            ensure_positive("generation_time", generation_time)?;
        }
        Ok(())
    }

    pub fn num_populations(&self) -> usize {
        self.populations.len()
    }

    pub fn num_sampling_populations(&self) -> usize {
        self.populations.iter().filter(|p| p.sampling_allowed).count()
    }

    /// Expand per-population sample counts into individual samples taken at
    /// the present. `counts[i]` samples are drawn from population `i`.
    ///
    /// # Errors
    ///
    /// Returns an error if more counts are given than there are sampling
    /// populations, the total exceeds [`MAX_SAMPLES`], or a non-sampling
    /// population is asked for samples.
    pub fn get_samples(&self, counts: &[usize]) -> Result<Vec<Sample>, ModelError> {
        let available = self.num_sampling_populations();
        if counts.len() > available {
            return Err(ModelError::TooManySamplePopulations {
                requested: counts.len(),
                available,
            });
        }

        let total = counts
            .iter()
            .try_fold(0_usize, |acc, &n| acc.checked_add(n))
            .filter(|&total| total <= MAX_SAMPLES)
            .ok_or(ModelError::TooManySamples { max: MAX_SAMPLES })?;

        let mut samples = Vec::with_capacity(total);
        for (index, &n) in counts.iter().enumerate() {
            if n == 0 {
                continue;
            }
            let population = &self.populations[index];
            if !population.sampling_allowed {
                return Err(ModelError::SamplingNotAllowed(index, population.name.clone()));
            }
            samples.extend(std::iter::repeat(Sample::new(index)).take(n));
        }
        Ok(samples)
    }

    /// The demographic history of the model as constant-parameter epochs
    pub fn epochs(&self) -> Vec<Epoch> {
        crate::models::history::compute_epochs(self)
    }

    /// Print the epoch-by-epoch demographic history to `out`.
    ///
    /// # Errors
    ///
    /// Returns any error from writing to `out`.
    pub fn debug(&self, out: &mut impl std::io::Write) -> std::io::Result<()> {
        crate::models::history::write_history(self, out)
    }

    /// Size of `population` at `time` generations ago, or `None` if the
    /// population index or time is out of range.
    pub fn population_size_at(&self, population: usize, time: f64) -> Option<f64> {
        if population >= self.num_populations() || !(time >= 0.0) {
            return None;
        }
        self.epochs()
            .iter()
            .find(|epoch| epoch.contains(time))
            .map(|epoch| epoch.size_at(population, time))
    }

    /// Returns true if this model equals `other` to the given tolerances.
    pub fn equals(&self, other: &Model, rtol: f64, atol: f64) -> bool {
        self.verify_equal(other, rtol, atol).is_ok()
    }

    /// Returns true if this model equals `other` to the default tolerances.
    pub fn approx_eq(&self, other: &Model) -> bool {
        self.equals(other, DEFAULT_RTOL, DEFAULT_ATOL)
    }

    /// Like [`Model::equals`], but reports the first difference found.
    ///
    /// # Errors
    ///
    /// Returns `UnequalModelsError` describing the difference.
    pub fn verify_equal(&self, other: &Model, rtol: f64, atol: f64) -> Result<(), UnequalModelsError> {
        let close = |a: f64, b: f64| is_close(a, b, rtol, atol);

        let shape = |m: &Vec<Vec<f64>>| m.iter().map(Vec::len).collect::<Vec<_>>();
        if shape(&self.migration_matrix) != shape(&other.migration_matrix) {
            return Err(unequal("Migration matrices different shapes"));
        }
        let matrices_close = self
            .migration_matrix
            .iter()
            .flatten()
            .zip(other.migration_matrix.iter().flatten())
            .all(|(&a, &b)| close(a, b));
        if !matrices_close {
            return Err(unequal("Migration matrices differ"));
        }

        if self.populations.len() != other.populations.len() {
            return Err(unequal("Different numbers of populations"));
        }
        for (p1, p2) in self.populations.iter().zip(&other.populations) {
            if !close(p1.initial_size, p2.initial_size) {
                return Err(unequal("Initial sizes differ"));
            }
        }
        for (p1, p2) in self.populations.iter().zip(&other.populations) {
            if !close(p1.growth_rate, p2.growth_rate) {
                return Err(unequal("Growth rates differ"));
            }
        }

        if self.demographic_events.len() != other.demographic_events.len() {
            return Err(unequal("Different numbers of demographic events"));
        }
        for (e1, e2) in self.demographic_events.iter().zip(&other.demographic_events) {
            verify_events_equal(e1, e2, &close)?;
        }
        Ok(())
    }
}

fn verify_events_equal(
    e1: &DemographicEvent,
    e2: &DemographicEvent,
    close: &impl Fn(f64, f64) -> bool,
) -> Result<(), UnequalModelsError> {
    let check_float = |key: &str, a: f64, b: f64| {
        if close(a, b) {
            Ok(())
        } else {
            Err(unequal(format!("Event {key} mismatch: {a} != {b}")))
        }
    };
    let check_option = |key: &str, a: Option<f64>, b: Option<f64>| match (a, b) {
        (None, None) => Ok(()),
        (Some(a), Some(b)) => check_float(key, a, b),
        _ => Err(unequal(format!("Event {key} mismatch: {a:?} != {b:?}"))),
    };

    check_float("time", e1.time(), e2.time())?;
    match (e1, e2) {
        (
            DemographicEvent::PopulationParametersChange {
                population: p1,
                initial_size: s1,
                growth_rate: g1,
                ..
            },
            DemographicEvent::PopulationParametersChange {
                population: p2,
                initial_size: s2,
                growth_rate: g2,
                ..
            },
        ) => {
            if p1 != p2 {
                return Err(unequal(format!("Event population mismatch: {p1:?} != {p2:?}")));
            }
            check_option("initial_size", *s1, *s2)?;
            check_option("growth_rate", *g1, *g2)
        }
        (
            DemographicEvent::MassMigration {
                source: s1,
                destination: d1,
                proportion: f1,
                ..
            },
            DemographicEvent::MassMigration {
                source: s2,
                destination: d2,
                proportion: f2,
                ..
            },
        ) => {
            if s1 != s2 || d1 != d2 {
                return Err(unequal(format!(
                    "Event source/destination mismatch: {s1}->{d1} != {s2}->{d2}"
                )));
            }
            check_float("proportion", *f1, *f2)
        }
        (
            DemographicEvent::MigrationRateChange {
                rate: r1,
                matrix_index: i1,
                ..
            },
            DemographicEvent::MigrationRateChange {
                rate: r2,
                matrix_index: i2,
                ..
            },
        ) => {
            if i1 != i2 {
                return Err(unequal(format!("Event matrix_index mismatch: {i1:?} != {i2:?}")));
            }
            check_float("rate", *r1, *r2)
        }
        _ => Err(unequal("Different types of demographic events")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pop() -> Model {
        Model::new(
            "ooa_2",
            "Two population",
            vec![
                Population::new("AFR", "African", 8.603e6),
                Population::new("EUR", "European", 1.075e6),
            ],
            vec![vec![0.0, 0.0], vec![0.0, 0.0]],
            vec![
                DemographicEvent::size_change(154_600.0, 1, 2200.0),
                DemographicEvent::MassMigration {
                    time: 158_000.0,
                    source: 1,
                    destination: 0,
                    proportion: 1.0,
                },
                DemographicEvent::size_change(600_000.0, 0, 1.7206e6),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_validates_populations() {
        let err = Model::new("m", "m", Vec::new(), Vec::new(), Vec::new()).unwrap_err();
        assert_eq!(err, ModelError::NoPopulations);

        let err = Model::new(
            "m",
            "m",
            vec![Population::new("p", "", -5.0)],
            vec![vec![0.0]],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidParameter(_)));
    }

    #[test]
    fn test_new_validates_migration_matrix() {
        let pops = || vec![Population::new("a", "", 1.0), Population::new("b", "", 1.0)];
        assert!(matches!(
            Model::new("m", "m", pops(), vec![vec![0.0]], Vec::new()),
            Err(ModelError::MigrationMatrixShape { expected: 2, .. })
        ));
        assert!(matches!(
            Model::new("m", "m", pops(), vec![vec![0.0, 0.1], vec![0.1]], Vec::new()),
            Err(ModelError::MigrationMatrixShape { row: 1, cols: 1, .. })
        ));
        assert_eq!(
            Model::new("m", "m", pops(), vec![vec![0.5, 0.1], vec![0.1, 0.0]], Vec::new()),
            Err(ModelError::MigrationMatrixDiagonal(0))
        );
        assert!(Model::new("m", "m", pops(), vec![vec![0.0, -0.1], vec![0.1, 0.0]], Vec::new())
            .is_err());
    }

    #[test]
    fn test_new_requires_ordered_events() {
        let err = Model::new(
            "m",
            "m",
            vec![Population::new("p", "", 100.0)],
            vec![vec![0.0]],
            vec![
                DemographicEvent::size_change(20.0, 0, 10.0),
                DemographicEvent::size_change(10.0, 0, 10.0),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::EventsOutOfOrder { index: 1, .. }));
    }

    #[test]
    fn test_equal_events_times_allowed() {
        assert!(Model::new(
            "m",
            "m",
            vec![Population::new("p", "", 100.0)],
            vec![vec![0.0]],
            vec![
                DemographicEvent::size_change(10.0, 0, 10.0),
                DemographicEvent::size_change(10.0, 0, 20.0),
            ],
        )
        .is_ok());
    }

    #[test]
    fn test_get_samples() {
        let model = two_pop();
        let samples = model.get_samples(&[2, 3]).unwrap();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples.iter().filter(|s| s.population == 0).count(), 2);
        assert_eq!(samples.iter().filter(|s| s.population == 1).count(), 3);
        assert!(samples.iter().all(|s| s.time == 0.0));

        assert_eq!(
            model.get_samples(&[1, 1, 1]),
            Err(ModelError::TooManySamplePopulations {
                requested: 3,
                available: 2
            })
        );
    }

    #[test]
    fn test_get_samples_rejects_huge_totals() {
        let model = two_pop();
        assert_eq!(
            model.get_samples(&[usize::MAX]),
            Err(ModelError::TooManySamples { max: MAX_SAMPLES })
        );
        assert_eq!(
            model.get_samples(&[usize::MAX, 2]),
            Err(ModelError::TooManySamples { max: MAX_SAMPLES })
        );
        assert_eq!(
            model.get_samples(&[MAX_SAMPLES, 1]),
            Err(ModelError::TooManySamples { max: MAX_SAMPLES })
        );
        assert_eq!(model.get_samples(&[MAX_SAMPLES - 1, 1]).unwrap().len(), MAX_SAMPLES);
    }

    #[test]
    fn test_get_samples_respects_sampling_flag() {
        let mut model = two_pop();
        model.populations[1] = model.populations[1].clone().without_sampling();
        assert_eq!(model.num_sampling_populations(), 1);
        assert_eq!(model.get_samples(&[4]).unwrap().len(), 4);
        assert!(model.get_samples(&[1, 1]).is_err());

        let mut model = two_pop();
        model.populations[0] = model.populations[0].clone().without_sampling();
        assert!(matches!(
            model.get_samples(&[1]),
            Err(ModelError::SamplingNotAllowed(0, _))
        ));
    }

    #[test]
    fn test_equals_self() {
        let model = two_pop();
        assert!(model.approx_eq(&model.clone()));
    }

    #[test]
    fn test_equals_within_tolerance() {
        let model = two_pop();
        let mut other = model.clone();
        other.populations[0].initial_size += 1e-6;
        assert!(model.approx_eq(&other));
        other.populations[0].initial_size += 10.0;
        assert_eq!(
            model.verify_equal(&other, DEFAULT_RTOL, DEFAULT_ATOL),
            Err(UnequalModelsError("Initial sizes differ".to_string()))
        );
    }

    #[test]
    fn test_verify_equal_reports_event_differences() {
        let model = two_pop();

        let mut other = model.clone();
        other.demographic_events.pop();
        assert_eq!(
            model.verify_equal(&other, DEFAULT_RTOL, DEFAULT_ATOL).unwrap_err().0,
            "Different numbers of demographic events"
        );

        let mut other = model.clone();
        other.demographic_events[1] = DemographicEvent::size_change(158_000.0, 1, 5.0);
        assert_eq!(
            model.verify_equal(&other, DEFAULT_RTOL, DEFAULT_ATOL).unwrap_err().0,
            "Different types of demographic events"
        );

        let mut other = model.clone();
        other.demographic_events[0] = DemographicEvent::size_change(154_600.0, 1, 2300.0);
        let err = model.verify_equal(&other, DEFAULT_RTOL, DEFAULT_ATOL).unwrap_err();
        assert!(err.0.starts_with("Event initial_size mismatch"));
    }

    #[test]
    fn test_verify_equal_migration_matrix() {
        let model = two_pop();
        let mut other = model.clone();
        other.migration_matrix[0][1] = 1e-3;
        assert_eq!(
            model.verify_equal(&other, DEFAULT_RTOL, DEFAULT_ATOL).unwrap_err().0,
            "Migration matrices differ"
        );
        other.migration_matrix = vec![vec![0.0]];
        assert_eq!(
            model.verify_equal(&other, DEFAULT_RTOL, DEFAULT_ATOL).unwrap_err().0,
            "Migration matrices different shapes"
        );
    }

    #[test]
    fn test_serde_round_trip_preserves_equality() {
        let model = two_pop();
        let json = serde_json::to_string(&model).unwrap();
        let parsed: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, model);
    }
}
