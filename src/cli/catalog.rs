use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::{GlobalOptions, OutputFormat};

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Export the catalog to a file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,
    },

    /// List genetic maps and whether their files are in the local cache
    Maps {
        /// Only list maps for this species
        #[arg(long)]
        species: Option<String>,
    },
}

pub fn run(args: CatalogArgs, opts: &GlobalOptions) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::Export { output } => run_export(output, opts),
        CatalogCommands::Maps { species } => run_maps(species.as_deref(), opts),
    }
}

fn run_export(output: PathBuf, opts: &GlobalOptions) -> anyhow::Result<()> {
    let catalog = opts.load_catalog()?;

    let json = catalog.to_json()?;
    std::fs::write(&output, json)?;

    println!("Exported {} species to {}", catalog.len(), output.display());

    Ok(())
}

fn run_maps(species_filter: Option<&str>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let catalog = opts.load_catalog()?;
    let species: Vec<_> = match species_filter {
        Some(id) => vec![catalog.get_species(id)?],
        None => catalog.species.iter().collect(),
    };

    // (species, map, cached chromosomes, total chromosomes)
    let rows: Vec<_> = species
        .iter()
        .flat_map(|sp| {
            sp.genetic_maps.iter().map(move |gm| {
                let cached = sp
                    .genome
                    .chromosomes
                    .iter()
                    .filter(|c| gm.is_cached(&opts.cache, &c.name))
                    .count();
                (*sp, gm, cached, sp.genome.chromosomes.len())
            })
        })
        .collect();

    match opts.format {
        OutputFormat::Text => {
            println!("Cache directory: {}\n", opts.cache.root().display());
            println!("{:<8} {:<20} {:>8}  URL", "Species", "Map", "Cached");
            println!("{}", "-".repeat(80));
            for (sp, gm, cached, total) in &rows {
                println!(
                    "{:<8} {:<20} {:>8}  {}",
                    sp.id.as_str(),
                    gm.id,
                    format!("{cached}/{total}"),
                    gm.url
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = rows
                .iter()
                .map(|(sp, gm, cached, total)| {
                    serde_json::json!({
                        "species": sp.id,
                        "id": gm.id,
                        "description": gm.description,
                        "url": gm.url,
                        "cache_dir": gm.cache_dir(&opts.cache),
                        "cached_chromosomes": cached,
                        "chromosome_count": total,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("species\tid\tcached_chromosomes\tchromosome_count\turl");
            for (sp, gm, cached, total) in &rows {
                println!("{}\t{}\t{}\t{}\t{}", sp.id, gm.id, cached, total, gm.url);
            }
        }
    }

    Ok(())
}
