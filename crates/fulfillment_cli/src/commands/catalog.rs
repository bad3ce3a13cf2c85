use crate::output;
use anyhow::Result;

pub fn execute(catalog_path: Option<&str>, format: &str) -> Result<()> {
    let catalog = super::load_catalog(catalog_path)?;

    if format != "json" {
        output::print_success(&format!(
            "Catalog is valid ({} table(s), {} reference(s))",
            catalog.len(),
            catalog.references().len()
        ));
    }
    output::print_catalog(&catalog, format)
}
