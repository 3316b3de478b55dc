use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::cli::{GlobalOptions, OutputFormat};
use crate::simulation::{Provenance, SimulationConfig};

#[derive(Args)]
pub struct SimulateArgs {
    /// Species ID
    #[arg(required = true)]
    pub species: String,

    /// Chromosome to simulate (defaults to the first chromosome)
    #[arg(short, long)]
    pub chromosome: Option<String>,

    /// Simulate a chromosome this many times the length of the named one
    #[arg(short, long, default_value = "1")]
    pub length_multiplier: f64,

    /// Genetic map to use (flat recombination rate by default)
    #[arg(short, long)]
    pub genetic_map: Option<String>,

    /// Published model to use (constant size at the species' population size by default)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Number of samples from each population, by index (0 for populations that do not allow sampling)
    #[arg(required = true, num_args = 1..)]
    pub samples: Vec<usize>,

    /// File to write the simulation configuration to
    #[arg(short, long, required = true)]
    pub output: PathBuf,
}

pub fn run(args: SimulateArgs, opts: &GlobalOptions) -> anyhow::Result<()> {
    let catalog = opts.load_catalog()?;
    let species = catalog.get_species(&args.species)?;

    let model = match &args.model {
        Some(id) => species.get_model(id)?.clone(),
        None => species.default_model()?,
    };

    let chromosome = match &args.chromosome {
        Some(name) => name.clone(),
        None => species
            .genome
            .chromosomes
            .first()
            .map(|c| c.name.clone())
            .ok_or_else(|| anyhow::anyhow!("Species '{}' has no chromosomes", species.id))?,
    };
    let contig = species.get_contig(
        &chromosome,
        args.genetic_map.as_deref(),
        args.length_multiplier,
        &opts.cache,
    )?;

    let config = SimulationConfig::new(
        species,
        model,
        contig,
        &args.samples,
        Provenance::from_env(),
    )?;
    info!(
        "Configured model {} for {} on {} with {} samples",
        config.model.name,
        species.name,
        config.contig,
        config.samples.len()
    );
    config.write_to(&args.output)?;

    if !opts.quiet {
        match opts.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&config.citations)?);
            }
            OutputFormat::Tsv => {
                println!("author\tyear\tdoi\treasons");
                for c in &config.citations {
                    let reasons: Vec<String> = c.reasons.iter().map(ToString::to_string).collect();
                    println!("{}\t{}\t{}\t{}", c.author, c.year, c.doi, reasons.join(","));
                }
            }
            OutputFormat::Text => {
                let stdout = std::io::stdout();
                config.write_citations(&mut stdout.lock())?;
            }
        }
    }

    Ok(())
}

/// Print the provenance record of the current invocation
pub fn run_provenance(opts: &GlobalOptions) -> anyhow::Result<()> {
    let provenance = Provenance::from_env();
    match opts.format {
        OutputFormat::Json | OutputFormat::Text => {
            println!("{}", serde_json::to_string_pretty(&provenance)?);
        }
        OutputFormat::Tsv => {
            println!("key\tvalue");
            println!("schema_version\t{}", provenance.schema_version);
            println!("software\t{} {}", provenance.software.name, provenance.software.version);
            println!("command\t{}", provenance.parameters.command);
            println!("args\t{}", provenance.parameters.args.join(" "));
            println!("os\t{}", provenance.environment.os.system);
            println!("machine\t{}", provenance.environment.os.machine);
            println!("timestamp\t{}", provenance.timestamp);
        }
    }
    Ok(())
}
