//! `prospecto doctor` — Diagnose configuration and data files.

use std::path::Path;

use prospecto_catalog::{BrochureBook, CatalogIndex};
use prospecto_config::{AppConfig, DEFAULT_CONFIG_FILE};

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Prospecto Doctor — System Diagnostics");
    println!("========================================\n");

    let mut issues = 0;

    // Check config
    let config_file = config_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    if config_file.exists() {
        println!("  ✅ Config file found: {}", config_file.display());
    } else {
        println!("  ⚠️  No config file — running on defaults (`prospecto init` writes one)");
    }
    let config = match AppConfig::load(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
            AppConfig::default()
        }
    };

    // Check catalog
    let catalog_file = Path::new(&config.catalog.catalog_file);
    if !catalog_file.exists() {
        println!("  ❌ Catalog missing: {}", catalog_file.display());
        issues += 1;
    } else {
        match CatalogIndex::load(catalog_file) {
            Ok(catalog) => {
                let programs: usize = catalog
                    .iter()
                    .map(|(_, f)| {
                        f.maestrias.len() + f.doctorados.len() + f.especialidades.len()
                    })
                    .sum();
                println!(
                    "  ✅ Catalog: {} faculties, {} programs",
                    catalog.len(),
                    programs
                );
            }
            Err(e) => {
                println!("  ❌ Catalog unreadable: {e}");
                issues += 1;
            }
        }
    }

    // Check brochure book
    let brochure_file = Path::new(&config.catalog.brochure_file);
    if !brochure_file.exists() {
        println!("  ⚠️  Brochure book missing — promo pushes will send no documents");
        issues += 1;
    } else {
        match BrochureBook::load(brochure_file) {
            Ok(book) => {
                let total = book.entries().count();
                let with_url = book.entries().filter(|e| e.url().is_some()).count();
                println!("  ✅ Brochures: {total} programs listed, {with_url} with documents");
            }
            Err(e) => {
                println!("  ❌ Brochure book unreadable: {e}");
                issues += 1;
            }
        }
    }

    // Check editable copy
    if Path::new(&config.catalog.messages_dir).is_dir() {
        println!("  ✅ Messages directory present");
    } else {
        println!("  ⚠️  No messages directory — built-in copy will be used");
    }

    // Check state document location
    let db_file = Path::new(&config.storage.db_file);
    if db_file.exists() {
        println!("  ✅ State document present: {}", db_file.display());
    } else {
        println!("  ✅ State document will be created at: {}", db_file.display());
    }

    // Check bridge credentials
    if config.delivery.adapter == "wpp" && config.delivery.token.is_empty() {
        println!("  ⚠️  No bridge token — set PROSPECTO_BRIDGE_TOKEN");
        issues += 1;
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
