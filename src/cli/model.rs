use clap::{Args, Subcommand};

use crate::cli::{GlobalOptions, OutputFormat};

#[derive(Args)]
pub struct ModelArgs {
    #[command(subcommand)]
    pub command: ModelCommands,
}

#[derive(Subcommand)]
pub enum ModelCommands {
    /// List published models, for one species or all of them
    List {
        /// Species ID
        species: Option<String>,
    },

    /// Show a model's populations, citations and demographic history
    Show {
        /// Species ID
        #[arg(required = true)]
        species: String,

        /// Model ID
        #[arg(required = true)]
        model: String,
    },
}

pub fn run(args: ModelArgs, opts: &GlobalOptions) -> anyhow::Result<()> {
    match args.command {
        ModelCommands::List { species } => run_list(species.as_deref(), opts),
        ModelCommands::Show { species, model } => run_show(&species, &model, opts),
    }
}

fn run_list(species_filter: Option<&str>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let catalog = opts.load_catalog()?;
    if let Some(id) = species_filter {
        // Unknown species is an error, not an empty list
        catalog.get_species(id)?;
    }
    let models: Vec<_> = catalog
        .all_models()
        .filter(|(sp, _)| species_filter.map_or(true, |id| sp.id.as_str() == id))
        .collect();

    match opts.format {
        OutputFormat::Text => {
            let id_width = models.iter().map(|(_, m)| m.id.len()).max().unwrap_or(5).max(5);
            println!("{:<8} {:<id_w$} {:>11}  Name", "Species", "Model", "Populations", id_w = id_width);
            println!("{}", "-".repeat(8 + id_width + 11 + 30));
            for (sp, m) in &models {
                println!(
                    "{:<8} {:<id_w$} {:>11}  {}",
                    sp.id.as_str(),
                    m.id,
                    m.num_populations(),
                    m.name,
                    id_w = id_width
                );
            }
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = models
                .iter()
                .map(|(sp, m)| {
                    serde_json::json!({
                        "species": sp.id,
                        "id": m.id,
                        "name": m.name,
                        "populations": m.populations.iter().map(|p| &p.name).collect::<Vec<_>>(),
                        "event_count": m.demographic_events.len(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("species\tid\tname\tpopulation_count\tevent_count");
            for (sp, m) in &models {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    sp.id,
                    m.id,
                    m.name,
                    m.num_populations(),
                    m.demographic_events.len()
                );
            }
        }
    }

    Ok(())
}

fn run_show(species_id: &str, model_id: &str, opts: &GlobalOptions) -> anyhow::Result<()> {
    let catalog = opts.load_catalog()?;
    let species = catalog.get_species(species_id)?;
    let model = species.get_model(model_id)?;

    match opts.format {
        OutputFormat::Text => {
            println!("Model: {}\n", model.name);
            println!("ID:       {}", model.id);
            println!("Species:  {}", species.name);
            if let Some(generation_time) = model.generation_time {
                println!("Generation time: {generation_time} years");
            }
            if !model.description.is_empty() {
                println!("\nDescription: {}", model.description);
            }

            println!("\nPopulations:");
            for (i, p) in model.populations.iter().enumerate() {
                let sampling = if p.sampling_allowed { "" } else { " (no sampling)" };
                println!(
                    "  {i}: {:<10} size {:.4e}, growth rate {}{}",
                    p.name, p.initial_size, p.growth_rate, sampling
                );
            }

            if !model.citations.is_empty() {
                println!("\nCitations:");
                for c in &model.citations {
                    println!("  {c}");
                }
            }

            println!("\nDemographic history:");
            let stdout = std::io::stdout();
            model.debug(&mut stdout.lock())?;
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "species": species.id,
                "model": model,
                "epochs": model.epochs(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("epoch\tstart_time\tend_time\tpopulation\tstart_size\tend_size\tgrowth_rate");
            for (i, epoch) in model.epochs().iter().enumerate() {
                for (p, population) in model.populations.iter().enumerate() {
                    println!(
                        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                        i,
                        epoch.start_time,
                        epoch.end_time,
                        population.name,
                        epoch.start_sizes[p],
                        epoch.end_sizes[p],
                        epoch.growth_rates[p]
                    );
                }
            }
        }
    }

    Ok(())
}
