use std::path::Path;

fn main() {
    let catalog_path = Path::new("catalogs/species.json");
    validate_catalog_file(catalog_path);
    set_build_dependencies();
}

fn validate_catalog_file(catalog_path: &Path) {
    // Ensure catalog exists at build time
    assert!(
        catalog_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the catalog file before building.\n",
        catalog_path.display()
    );

    let catalog_contents = std::fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            catalog_path.display()
        );
    });

    let catalog: serde_json::Value = serde_json::from_str(&catalog_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            catalog_path.display()
        );
    });

    validate_catalog_structure(&catalog);
}

fn validate_catalog_structure(catalog: &serde_json::Value) {
    assert!(
        catalog.is_object(),
        "\n\nCATALOG BUILD ERROR: Root must be a JSON object\n\
         Got: {catalog}\n"
    );

    let species = catalog.get("species").unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Missing 'species' field\n\
             The catalog must have a top-level 'species' array.\n"
        );
    });

    let species = species.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: 'species' must be an array\n\
             Got: {species}\n"
        );
    });

    let mut total_chromosomes = 0;
    let mut total_models = 0;
    for (i, entry) in species.iter().enumerate() {
        let species_id = entry
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>");

        validate_species_fields(entry, species_id, i);
        total_chromosomes += validate_chromosomes(entry, species_id);
        total_models += validate_models(entry, species_id);
    }

    println!(
        "cargo:warning=Validated catalog: {} species, {total_chromosomes} chromosomes, {total_models} models",
        species.len()
    );
}

fn validate_species_fields(species: &serde_json::Value, species_id: &str, index: usize) {
    for field in ["id", "name", "genome", "population_size", "generation_time"] {
        assert!(
            species.get(field).is_some(),
            "\n\nCATALOG BUILD ERROR: Species '{species_id}' (index {index}) missing '{field}' field\n"
        );
    }
}

fn validate_chromosomes(species: &serde_json::Value, species_id: &str) -> usize {
    let Some(chromosomes) = species
        .get("genome")
        .and_then(|g| g.get("chromosomes"))
        .and_then(|c| c.as_array())
    else {
        panic!("\n\nCATALOG BUILD ERROR: Species '{species_id}' has no 'genome.chromosomes' array\n");
    };

    for (j, chromosome) in chromosomes.iter().enumerate() {
        let name = chromosome
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>");

        let length = chromosome.get("length").and_then(serde_json::Value::as_u64);
        assert!(
            length.is_some_and(|len| len > 0),
            "\n\nCATALOG BUILD ERROR: Species '{species_id}' chromosome '{name}' (index {j}) must have length > 0\n"
        );

        for rate in ["recombination_rate", "mutation_rate"] {
            let value = chromosome.get(rate).and_then(serde_json::Value::as_f64);
            assert!(
                value.is_some_and(|v| v >= 0.0),
                "\n\nCATALOG BUILD ERROR: Species '{species_id}' chromosome '{name}' has missing or negative '{rate}'\n"
            );
        }
    }

    chromosomes.len()
}

fn validate_models(species: &serde_json::Value, species_id: &str) -> usize {
    let Some(models) = species.get("models").and_then(|m| m.as_array()) else {
        return 0;
    };

    for model in models {
        let model_id = model
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>");

        let mut last_time = 0.0_f64;
        if let Some(events) = model.get("demographic_events").and_then(|e| e.as_array()) {
            for (k, event) in events.iter().enumerate() {
                let time = event.get("time").and_then(serde_json::Value::as_f64);
                let Some(time) = time else {
                    panic!(
                        "\n\nCATALOG BUILD ERROR: Model '{species_id}/{model_id}' event {k} missing 'time'\n"
                    );
                };
                assert!(
                    time >= last_time,
                    "\n\nCATALOG BUILD ERROR: Model '{species_id}/{model_id}' event {k} at time {time} \
                     is earlier than the previous event ({last_time})\n\
                     Demographic events must be non-negative and non-decreasing in time.\n"
                );
                last_time = time;
            }
        }
    }

    models.len()
}

fn set_build_dependencies() {
    // Tell cargo to rerun if catalog changes
    println!("cargo:rerun-if-changed=catalogs/species.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
