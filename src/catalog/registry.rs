//! Process-wide registry built from the embedded catalog on first use.

use std::sync::OnceLock;

use crate::catalog::store::{CatalogError, SpeciesCatalog};
use crate::core::genetic_map::GeneticMap;
use crate::core::species::Species;
use crate::models::model::Model;

static REGISTRY: OnceLock<Result<SpeciesCatalog, String>> = OnceLock::new();

fn registry() -> Result<&'static SpeciesCatalog, CatalogError> {
    REGISTRY
        .get_or_init(|| SpeciesCatalog::load_embedded().map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| CatalogError::EmbeddedUnavailable(e.clone()))
}

/// Look up a species in the embedded catalog by id.
///
/// # Errors
///
/// Returns `CatalogError::SpeciesNotFound` if no species has this id.
///
/// # Example
///
/// ```rust
/// let species = popsim_catalog::get_species("dromel").unwrap();
/// assert_eq!(species.name, "Drosophila melanogaster");
/// assert!(popsim_catalog::get_species("XXX").is_err());
/// ```
pub fn get_species(id: &str) -> Result<&'static Species, CatalogError> {
    registry()?.get_species(id)
}

/// Every species in the embedded catalog
///
/// # Errors
///
/// Returns an error only if the embedded catalog failed to load.
pub fn all_species() -> Result<impl Iterator<Item = &'static Species>, CatalogError> {
    Ok(registry()?.species.iter())
}

/// # Errors
///
/// Returns an error only if the embedded catalog failed to load.
pub fn all_genetic_maps() -> Result<impl Iterator<Item = &'static GeneticMap>, CatalogError> {
    Ok(registry()?.all_genetic_maps())
}

/// # Errors
///
/// Returns an error only if the embedded catalog failed to load.
pub fn all_models() -> Result<impl Iterator<Item = (&'static Species, &'static Model)>, CatalogError>
{
    Ok(registry()?.all_models())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_species_returns_same_record() {
        let a = get_species("esccol").unwrap();
        let b = get_species("esccol").unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.id.as_str(), "esccol");
    }

    #[test]
    fn test_get_unknown_species() {
        for id in ["", "XXX", "ESCCOL", " esccol"] {
            assert!(matches!(
                get_species(id),
                Err(CatalogError::SpeciesNotFound(_))
            ));
        }
    }

    #[test]
    fn test_iterators() {
        assert_eq!(all_species().unwrap().count(), 3);
        assert_eq!(all_genetic_maps().unwrap().count(), 2);
        assert_eq!(all_models().unwrap().count(), 4);
    }
}
