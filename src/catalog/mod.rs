//! Species catalog storage and lookup.
//!
//! The catalog holds every species the crate knows about together with its
//! genome, genetic maps and published demographic models. An embedded catalog
//! is compiled into the binary; custom catalogs can also be loaded from JSON
//! files with the same layout.
//!
//! ## Embedded Catalog
//!
//! - **esccol**: *Escherichia coli*
//! - **dromel**: *Drosophila melanogaster*
//! - **aratha**: *Arabidopsis thaliana*
//!
//! ## Example
//!
//! ```rust
//! use popsim_catalog::catalog::get_species;
//!
//! let species = get_species("aratha").unwrap();
//! let model = species.get_model("south_middle_atlas").unwrap();
//! assert_eq!(model.num_populations(), 1);
//! ```
//!
//! ## Custom Catalogs
//!
//! ```rust,no_run
//! use popsim_catalog::SpeciesCatalog;
//! use std::path::Path;
//!
//! // Export to JSON
//! let catalog = SpeciesCatalog::load_embedded().unwrap();
//! let json = catalog.to_json().unwrap();
//!
//! // Load from custom file
//! let custom = SpeciesCatalog::load_from_file(Path::new("my_catalog.json")).unwrap();
//! ```

pub mod registry;
pub mod store;

pub use registry::{all_genetic_maps, all_models, all_species, get_species};
