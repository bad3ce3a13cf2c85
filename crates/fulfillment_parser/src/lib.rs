//! Parser for rule catalog files (YAML/TOML formats).
//!
//! A catalog file replaces the built-in fulfillment catalog: it lists the
//! logical tables with their role and primary key, and the foreign-key
//! references checked across tables. Parsed catalogs are validated before
//! they are returned.
//!
//! # Example
//!
//! ```rust
//! use fulfillment_parser::parse_yaml;
//! use fulfillment_core::Role;
//!
//! let yaml = r#"
//! tables:
//!   - name: df_Orders
//!     role: event_fact
//!     primary_key: [order_id]
//!   - name: df_OrderItems
//!     role: transaction_detail
//!     primary_key: [order_id]
//! references:
//!   - child_table: df_OrderItems
//!     child_column: order_id
//!     parent_table: df_Orders
//!     parent_column: order_id
//! "#;
//!
//! let catalog = parse_yaml(yaml).expect("Failed to parse catalog");
//! assert_eq!(catalog.get("df_Orders").unwrap().role, Role::EventFact);
//! ```

use fulfillment_core::{CoreError, RuleCatalog};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during catalog parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The file parsed but describes an inconsistent catalog
    #[error(transparent)]
    InvalidCatalog(#[from] CoreError),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported catalog file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a catalog from a YAML string.
pub fn parse_yaml(content: &str) -> Result<RuleCatalog> {
    let catalog: RuleCatalog = serde_yaml_ng::from_str(content)?;
    catalog.validate()?;
    Ok(catalog)
}

/// Parse a catalog from a TOML string.
///
/// # Example
///
/// ```rust
/// use fulfillment_parser::parse_toml;
///
/// let toml = r#"
/// [[tables]]
/// name = "df_products"
/// role = "entity_reference"
/// primary_key = ["product_id"]
/// "#;
///
/// let catalog = parse_toml(toml).unwrap();
/// assert_eq!(catalog.len(), 1);
/// assert!(catalog.references().is_empty());
/// ```
pub fn parse_toml(content: &str) -> Result<RuleCatalog> {
    let catalog: RuleCatalog =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    catalog.validate()?;
    Ok(catalog)
}

/// Detect the catalog format from a file path based on its extension.
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<CatalogFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(CatalogFormat::Yaml),
        "toml" => Ok(CatalogFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a catalog from a file with automatic format detection.
///
/// ```no_run
/// use fulfillment_parser::parse_file;
/// use std::path::Path;
///
/// let catalog = parse_file(Path::new("catalogs/fulfillment.yml")).unwrap();
/// println!("Loaded {} table rule(s)", catalog.len());
/// ```
pub fn parse_file(path: &Path) -> Result<RuleCatalog> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        CatalogFormat::Yaml => parse_yaml(&content),
        CatalogFormat::Toml => parse_toml(&content),
    }
}
