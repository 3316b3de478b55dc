use serde::{Deserialize, Serialize};

use crate::models::model::ModelError;
use crate::utils::validation::{ensure_finite, ensure_non_negative, ensure_positive, ensure_proportion};

/// A change to the demographic state at a point in time, measured in
/// generations before the present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DemographicEvent {
    /// Set the size and/or growth rate of one population (or all when
    /// `population` is `None`). A missing size keeps the size reached at
    /// `time`; a missing growth rate keeps the current growth rate.
    PopulationParametersChange {
        time: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        population: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_size: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        growth_rate: Option<f64>,
    },

    /// Move lineages from `source` to `destination` with probability `proportion`
    /// (backwards in time; forwards this is `destination` founding `source`).
    MassMigration {
        time: f64,
        source: usize,
        destination: usize,
        proportion: f64,
    },

    /// Set one migration-matrix entry, or every off-diagonal entry when
    /// `matrix_index` is `None`.
    MigrationRateChange {
        time: f64,
        rate: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        matrix_index: Option<[usize; 2]>,
    },
}

impl DemographicEvent {
    /// Size change for a single population
    pub fn size_change(time: f64, population: usize, initial_size: f64) -> Self {
        Self::PopulationParametersChange {
            time,
            population: Some(population),
            initial_size: Some(initial_size),
            growth_rate: None,
        }
    }

    pub fn time(&self) -> f64 {
        match self {
            Self::PopulationParametersChange { time, .. }
            | Self::MassMigration { time, .. }
            | Self::MigrationRateChange { time, .. } => *time,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PopulationParametersChange { .. } => "population_parameters_change",
            Self::MassMigration { .. } => "mass_migration",
            Self::MigrationRateChange { .. } => "migration_rate_change",
        }
    }

    /// Check parameter ranges and population indices against a model with
    /// `num_populations` populations.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidParameter` or `ModelError::PopulationOutOfRange`.
    pub fn validate(&self, num_populations: usize) -> Result<(), ModelError> {
        ensure_non_negative("event time", self.time())?;
        let check_index = |index: usize| {
            if index < num_populations {
                Ok(())
            } else {
                Err(ModelError::PopulationOutOfRange {
                    index,
                    num_populations,
                })
            }
        };

        match self {
            Self::PopulationParametersChange {
                population,
                initial_size,
                growth_rate,
                ..
            } => {
                if let Some(p) = population {
                    check_index(*p)?;
                }
                if let Some(size) = initial_size {
                    ensure_positive("initial_size", *size)?;
                }
                if let Some(rate) = growth_rate {
                    ensure_finite("growth_rate", *rate)?;
                }
            }
            Self::MassMigration {
                source,
                destination,
                proportion,
                ..
            } => {
                check_index(*source)?;
                check_index(*destination)?;
                if source == destination {
                    return Err(ModelError::SelfMigration(*source));
                }
                ensure_proportion("proportion", *proportion)?;
            }
            Self::MigrationRateChange {
                rate, matrix_index, ..
            } => {
                ensure_non_negative("migration rate", *rate)?;
                if let Some([i, j]) = matrix_index {
                    check_index(*i)?;
                    check_index(*j)?;
                    if i == j {
                        return Err(ModelError::SelfMigration(*i));
                    }
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for DemographicEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PopulationParametersChange {
                population,
                initial_size,
                growth_rate,
                ..
            } => {
                match population {
                    Some(p) => write!(f, "Population parameter change for {p}:")?,
                    None => write!(f, "Population parameter change for all populations:")?,
                }
                if let Some(size) = initial_size {
                    write!(f, " initial_size -> {size}")?;
                }
                if let Some(rate) = growth_rate {
                    write!(f, " growth_rate -> {rate}")?;
                }
                Ok(())
            }
            Self::MassMigration {
                source,
                destination,
                proportion,
                ..
            } => write!(
                f,
                "Mass migration: lineages moved with probability {proportion} \
                 backwards in time with source {source} & dest {destination}"
            ),
            Self::MigrationRateChange {
                rate, matrix_index, ..
            } => match matrix_index {
                Some([i, j]) => write!(f, "Migration rate change for ({i}, {j}) to {rate}"),
                None => write!(f, "Migration rate change for all off-diagonal entries to {rate}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_tagging() {
        let event = DemographicEvent::MassMigration {
            time: 158_000.0,
            source: 1,
            destination: 0,
            proportion: 1.0,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "mass_migration");
        assert_eq!(json["source"], 1);

        let parsed: DemographicEvent = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_parameters_change_optional_fields() {
        let parsed: DemographicEvent = serde_json::from_str(
            r#"{"type": "population_parameters_change", "time": 10.0, "growth_rate": 0.01}"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            DemographicEvent::PopulationParametersChange {
                time: 10.0,
                population: None,
                initial_size: None,
                growth_rate: Some(0.01),
            }
        );
    }

    #[test]
    fn test_validate() {
        assert!(DemographicEvent::size_change(10.0, 0, 100.0).validate(1).is_ok());
        assert!(matches!(
            DemographicEvent::size_change(10.0, 1, 100.0).validate(1),
            Err(ModelError::PopulationOutOfRange { index: 1, .. })
        ));
        assert!(DemographicEvent::size_change(-1.0, 0, 100.0).validate(1).is_err());
        assert!(DemographicEvent::size_change(10.0, 0, 0.0).validate(1).is_err());

        let bad_proportion = DemographicEvent::MassMigration {
            time: 1.0,
            source: 1,
            destination: 0,
            proportion: 1.5,
        };
        assert!(bad_proportion.validate(2).is_err());

        let self_migration = DemographicEvent::MigrationRateChange {
            time: 1.0,
            rate: 1e-4,
            matrix_index: Some([1, 1]),
        };
        assert!(matches!(
            self_migration.validate(2),
            Err(ModelError::SelfMigration(1))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            DemographicEvent::size_change(10.0, 0, 145_300.0).to_string(),
            "Population parameter change for 0: initial_size -> 145300"
        );
    }
}
