//! Product catalog loading from TOML.
//!
//! A catalog file lists categories in display order:
//!
//! ```toml
//! [[categories]]
//! name = "Grains"
//! products = ["Rice", "Beans"]
//! ```

use crate::core::catalog::ProductCatalog;
use crate::errors::{Error, Result};
use std::path::Path;
use tracing::{debug, info};

/// Parses a catalog from TOML text.
///
/// # Errors
/// Returns [`Error::Config`] if the text is not a valid catalog.
pub fn parse_catalog(contents: &str) -> Result<ProductCatalog> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog: {e}"),
    })
}

/// Loads a catalog from a TOML file.
///
/// # Errors
/// Returns [`Error::Config`] if the file cannot be read or parsed.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<ProductCatalog> {
    let path_ref = path.as_ref();
    debug!("Attempting to load catalog from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file {}: {e}", path_ref.display()),
    })?;
    parse_catalog(&contents)
}

/// Loads a catalog file, falling back to the built-in catalog if it does not exist.
///
/// # Errors
/// Returns [`Error::Config`] if the file exists but cannot be read or parsed.
pub fn load_catalog_or_default<P: AsRef<Path>>(path: P) -> Result<ProductCatalog> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        info!(
            "No catalog at {}, using the built-in catalog",
            path_ref.display()
        );
        return Ok(ProductCatalog::builtin());
    }
    load_catalog(path_ref)
}
