use std::path::Path;
use std::process;

use anyhow::Result;

use larder_core::catalog::{load_views_file, read_json};
use larder_core::schema::{check_document, compile_schema};

/// Exit-code contract: 0 on PASS (or when the schema document is absent,
/// which is a skip), 1 on FAIL. Used as a guard in automated checks.
pub(crate) fn cmd_validate_recipes(catalog_path: &Path, schema_path: &Path) -> Result<()> {
    if !schema_path.exists() {
        let path = schema_path.display();
        println!("No schema document at {path}; skipping strict validation.");
        return Ok(());
    }

    let schema = read_json(schema_path)?;
    let instance = read_json(catalog_path)?;
    let validator = compile_schema(&schema)?;

    let violations = check_document(&validator, &instance);
    if violations.is_empty() {
        println!("Schema validation: PASS");
        return Ok(());
    }

    println!("Schema validation: FAIL");
    for violation in &violations {
        println!("  {violation}");
    }
    process::exit(1);
}

pub(crate) fn cmd_validate_views(path: &Path) -> Result<()> {
    match load_views_file(path) {
        Ok(_) => {
            println!("Views validation: PASS");
            Ok(())
        }
        Err(e) => {
            println!("Views validation: FAIL");
            println!("  {e:#}");
            process::exit(1);
        }
    }
}
