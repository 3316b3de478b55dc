use clap::Args;

use crate::cli::{GlobalOptions, OutputFormat};

#[derive(Args)]
pub struct ContigArgs {
    /// Species ID
    #[arg(required = true)]
    pub species: String,

    /// Chromosome to describe (defaults to the first chromosome)
    #[arg(short, long)]
    pub chromosome: Option<String>,

    /// Scale the chromosome length by this factor
    #[arg(short, long, default_value = "1")]
    pub length_multiplier: f64,

    /// Use this genetic map instead of a flat recombination rate
    #[arg(short, long)]
    pub genetic_map: Option<String>,
}

pub fn run(args: ContigArgs, opts: &GlobalOptions) -> anyhow::Result<()> {
    let catalog = opts.load_catalog()?;
    let species = catalog.get_species(&args.species)?;
    let chromosome = match &args.chromosome {
        Some(name) => name.as_str(),
        None => species
            .genome
            .chromosomes
            .first()
            .map(|c| c.name.as_str())
            .ok_or_else(|| anyhow::anyhow!("Species '{}' has no chromosomes", species.id))?,
    };
    let contig = species.get_contig(
        chromosome,
        args.genetic_map.as_deref(),
        args.length_multiplier,
        &opts.cache,
    )?;

    match opts.format {
        OutputFormat::Text => {
            println!("{contig}");
            println!("Chromosome:         {}", contig.chromosome);
            println!(
                "Genetic map:        {}",
                contig.genetic_map.as_deref().unwrap_or("none (flat)")
            );
            println!("Map intervals:      {}", contig.recombination_map.rates().len() - 1);
            println!(
                "Genetic length:     {:.4} M",
                contig.recombination_map.total_genetic_length()
            );
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "species": species.id,
                "chromosome": contig.chromosome,
                "length": contig.length(),
                "mean_recombination_rate": contig.mean_recombination_rate(),
                "mutation_rate": contig.mutation_rate,
                "genetic_map": contig.genetic_map,
                "genetic_length": contig.recombination_map.total_genetic_length(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("position\trate");
            let map = &contig.recombination_map;
            for (position, rate) in map.positions().iter().zip(map.rates()) {
                println!("{position}\t{rate}");
            }
        }
    }

    Ok(())
}
