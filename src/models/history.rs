//! Demographic history of a model as a sequence of epochs.
//!
//! An epoch is a time interval during which no demographic event occurs, so
//! each population grows (or shrinks) exponentially at a fixed rate and the
//! migration matrix is constant. This is the model summary printed by
//! `popsim model show`.

use std::io::Write;

use serde::Serialize;

use crate::models::events::DemographicEvent;
use crate::models::model::Model;

/// Parameters in force between two event times
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Epoch {
    pub start_time: f64,

    /// `f64::INFINITY` for the oldest epoch
    pub end_time: f64,

    pub start_sizes: Vec<f64>,

    pub end_sizes: Vec<f64>,

    pub growth_rates: Vec<f64>,

    pub migration_matrix: Vec<Vec<f64>>,

    /// Events applied at `start_time`
    pub events: Vec<DemographicEvent>,
}

impl Epoch {
    /// Whether `time` falls in `[start_time, end_time)`
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_time && time < self.end_time
    }

    /// Size of `population` at `time`, assumed to lie within this epoch
    pub fn size_at(&self, population: usize, time: f64) -> f64 {
        grow(
            self.start_sizes[population],
            self.growth_rates[population],
            time - self.start_time,
        )
    }
}

/// Size after `dt` generations back in time from `size` at growth rate `rate`
fn grow(size: f64, rate: f64, dt: f64) -> f64 {
    if rate == 0.0 || dt == 0.0 {
        return size;
    }
    if dt.is_infinite() {
        return if rate > 0.0 { 0.0 } else { f64::INFINITY };
    }
    size * (-rate * dt).exp()
}

fn apply_event(
    event: &DemographicEvent,
    sizes: &mut [f64],
    growth_rates: &mut [f64],
    migration_matrix: &mut [Vec<f64>],
) {
    match event {
        DemographicEvent::PopulationParametersChange {
            population,
            initial_size,
            growth_rate,
            ..
        } => {
            let targets: Vec<usize> = match population {
                Some(p) => vec![*p],
                None => (0..sizes.len()).collect(),
            };
            for p in targets {
                if let Some(size) = initial_size {
                    sizes[p] = *size;
                }
                if let Some(rate) = growth_rate {
                    growth_rates[p] = *rate;
                }
            }
        }
        // Lineage movement only; population parameters are untouched
        DemographicEvent::MassMigration { .. } => {}
        DemographicEvent::MigrationRateChange {
            rate, matrix_index, ..
        } => match matrix_index {
            Some([j, k]) => migration_matrix[*j][*k] = *rate,
            None => {
                for (j, row) in migration_matrix.iter_mut().enumerate() {
                    for (k, entry) in row.iter_mut().enumerate() {
                        if j != k {
                            *entry = *rate;
                        }
                    }
                }
            }
        },
    }
}

/// Walk the model's events in time order and split its history into epochs.
///
/// Events sharing a time are applied together and start a single epoch.
pub(crate) fn compute_epochs(model: &Model) -> Vec<Epoch> {
    let mut sizes: Vec<f64> = model.populations.iter().map(|p| p.initial_size).collect();
    let mut growth_rates: Vec<f64> = model.populations.iter().map(|p| p.growth_rate).collect();
    let mut migration_matrix = model.migration_matrix.clone();

    let mut epochs = Vec::new();
    let mut start = 0.0;
    let mut pending: Vec<DemographicEvent> = Vec::new();

    let close_epoch = |start: f64,
                       end: f64,
                       sizes: &[f64],
                       growth_rates: &[f64],
                       migration_matrix: &[Vec<f64>],
                       events: Vec<DemographicEvent>| Epoch {
        start_time: start,
        end_time: end,
        start_sizes: sizes.to_vec(),
        end_sizes: sizes
            .iter()
            .zip(growth_rates)
            .map(|(&size, &rate)| grow(size, rate, end - start))
            .collect(),
        growth_rates: growth_rates.to_vec(),
        migration_matrix: migration_matrix.to_vec(),
        events,
    };

    for event in &model.demographic_events {
        let time = event.time();
        if time > start {
            let epoch = close_epoch(
                start,
                time,
                &sizes,
                &growth_rates,
                &migration_matrix,
                std::mem::take(&mut pending),
            );
            sizes.clone_from(&epoch.end_sizes);
            epochs.push(epoch);
            start = time;
        }
        apply_event(event, &mut sizes, &mut growth_rates, &mut migration_matrix);
        pending.push(event.clone());
    }

    epochs.push(close_epoch(
        start,
        f64::INFINITY,
        &sizes,
        &growth_rates,
        &migration_matrix,
        pending,
    ));
    epochs
}

/// Print the demographic history of `model` to `out`, one block per epoch.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_history(model: &Model, out: &mut impl Write) -> std::io::Result<()> {
    let names: Vec<&str> = model.populations.iter().map(|p| p.name.as_str()).collect();
    let name_width = names.iter().map(|n| n.len()).max().unwrap_or(4).max(4);

    for (i, epoch) in model.epochs().iter().enumerate() {
        let header = format!(
            "Epoch {i}: {} -- {} generations",
            epoch.start_time, epoch.end_time
        );
        writeln!(out, "{}", "=".repeat(header.len()))?;
        writeln!(out, "{header}")?;
        writeln!(out, "{}", "=".repeat(header.len()))?;

        for event in &epoch.events {
            writeln!(out, "  @ {}: {event}", event.time())?;
        }

        writeln!(
            out,
            "  {:<name_w$} {:>12} {:>12} {:>12}",
            "Population",
            "start",
            "end",
            "growth_rate",
            name_w = name_width
        )?;
        for (p, name) in names.iter().enumerate() {
            writeln!(
                out,
                "  {:<name_w$} {:>12.4e} {:>12.4e} {:>12.4e}",
                name,
                epoch.start_sizes[p],
                epoch.end_sizes[p],
                epoch.growth_rates[p],
                name_w = name_width
            )?;
        }

        if names.len() > 1 {
            writeln!(out, "  Migration matrix:")?;
            for row in &epoch.migration_matrix {
                let cells: Vec<String> = row.iter().map(|m| format!("{m:.3e}")).collect();
                writeln!(out, "    [{}]", cells.join(", "))?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}
