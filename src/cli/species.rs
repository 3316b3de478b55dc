use clap::{Args, Subcommand};

use crate::cli::{truncate, GlobalOptions, OutputFormat};

/// Chromosomes shown by `species show` unless `--all-chromosomes` is given
const MAX_CHROMOSOMES_SHOWN: usize = 25;

#[derive(Args)]
pub struct SpeciesArgs {
    #[command(subcommand)]
    pub command: SpeciesCommands,
}

#[derive(Subcommand)]
pub enum SpeciesCommands {
    /// List all species in the catalog
    List,

    /// Show details of a specific species
    Show {
        /// Species ID (e.g. "dromel")
        #[arg(required = true)]
        id: String,

        /// Show all chromosomes
        #[arg(long)]
        all_chromosomes: bool,
    },
}

pub fn run(args: SpeciesArgs, opts: &GlobalOptions) -> anyhow::Result<()> {
    match args.command {
        SpeciesCommands::List => run_list(opts),
        SpeciesCommands::Show {
            id,
            all_chromosomes,
        } => run_show(&id, all_chromosomes, opts),
    }
}

fn run_list(opts: &GlobalOptions) -> anyhow::Result<()> {
    let catalog = opts.load_catalog()?;

    match opts.format {
        OutputFormat::Text => {
            let id_width = catalog
                .species
                .iter()
                .map(|s| s.id.as_str().len())
                .max()
                .unwrap_or(2)
                .max(2);
            let name_width = catalog
                .species
                .iter()
                .map(|s| s.name.len().min(30))
                .max()
                .unwrap_or(4)
                .max(4);
            let total_width = id_width + name_width + 12 + 16 + 8 + 6 + 5;

            println!("Species Catalog ({} species)\n", catalog.len());
            println!(
                "{:<id_w$} {:<name_w$} {:>12} {:>16} {:>8} {:>6}",
                "ID",
                "Name",
                "Chromosomes",
                "Genome length",
                "Models",
                "Maps",
                id_w = id_width,
                name_w = name_width
            );
            println!("{}", "-".repeat(total_width));
            for s in &catalog.species {
                println!(
                    "{:<id_w$} {:<name_w$} {:>12} {:>16} {:>8} {:>6}",
                    s.id.as_str(),
                    truncate(&s.name, name_width),
                    s.genome.chromosomes.len(),
                    s.genome.length(),
                    s.models.len(),
                    s.genetic_maps.len(),
                    id_w = id_width,
                    name_w = name_width
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = catalog
                .species
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "id": s.id,
                        "name": s.name,
                        "common_name": s.common_name,
                        "generation_time": s.generation_time,
                        "population_size": s.population_size,
                        "chromosome_count": s.genome.chromosomes.len(),
                        "genome_length": s.genome.length(),
                        "models": s.models.iter().map(|m| &m.id).collect::<Vec<_>>(),
                        "genetic_maps": s.genetic_maps.iter().map(|gm| &gm.id).collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("id\tname\tcommon_name\tchromosome_count\tgenome_length\tmodel_count\tgenetic_map_count");
            for s in &catalog.species {
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    s.id,
                    s.name,
                    s.common_name,
                    s.genome.chromosomes.len(),
                    s.genome.length(),
                    s.models.len(),
                    s.genetic_maps.len()
                );
            }
        }
    }

    Ok(())
}

fn run_show(id: &str, all_chromosomes: bool, opts: &GlobalOptions) -> anyhow::Result<()> {
    let catalog = opts.load_catalog()?;
    let species = catalog.get_species(id)?;

    match opts.format {
        OutputFormat::Text => {
            println!("Species: {}\n", species.name);
            println!("ID:               {}", species.id);
            if !species.common_name.is_empty() {
                println!("Common name:      {}", species.common_name);
            }
            println!("Generation time:  {} years", species.generation_time);
            println!("Population size:  {}", species.population_size);
            println!("Genome length:    {} bp", species.genome.length());
            println!(
                "Mean rates:       recombination {:.3e}, mutation {:.3e}",
                species.genome.mean_recombination_rate(),
                species.genome.mean_mutation_rate()
            );
            if let Some(default_map) = &species.genome.default_genetic_map {
                println!("Default map:      {default_map}");
            }

            let chromosomes = &species.genome.chromosomes;
            let shown = if all_chromosomes {
                &chromosomes[..]
            } else {
                &chromosomes[..chromosomes.len().min(MAX_CHROMOSOMES_SHOWN)]
            };

            println!("\nChromosomes:");
            println!("{:<15} {:>15} {:>14} {:>14}", "Name", "Length", "Recomb rate", "Mut rate");
            println!("{}", "-".repeat(61));
            for chrom in shown {
                println!(
                    "{:<15} {:>15} {:>14.3e} {:>14.3e}",
                    chrom.name, chrom.length, chrom.recombination_rate, chrom.mutation_rate
                );
            }
            if !all_chromosomes && chromosomes.len() > MAX_CHROMOSOMES_SHOWN {
                println!(
                    "\n... and {} more chromosomes (use --all-chromosomes to show all)",
                    chromosomes.len() - MAX_CHROMOSOMES_SHOWN
                );
            }

            if !species.genetic_maps.is_empty() {
                println!("\nGenetic maps:");
                for gm in &species.genetic_maps {
                    println!("  {:<20} {}", gm.id, truncate(&gm.description, 60));
                }
            }
            if !species.models.is_empty() {
                println!("\nModels:");
                for model in &species.models {
                    println!("  {:<20} {}", model.id, model.name);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&species)?);
        }
        OutputFormat::Tsv => {
            println!("name\tlength\trecombination_rate\tmutation_rate");
            for chrom in &species.genome.chromosomes {
                println!(
                    "{}\t{}\t{}\t{}",
                    chrom.name, chrom.length, chrom.recombination_rate, chrom.mutation_rate
                );
            }
        }
    }

    Ok(())
}
