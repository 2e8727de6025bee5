//! `prospecto catalog` — Inspect the program catalog.

use std::path::Path;

use prospecto_catalog::{CatalogIndex, Faculty, ProgramKind};
use prospecto_config::AppConfig;

pub async fn run(
    config_path: Option<&Path>,
    faculty: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    let catalog = CatalogIndex::load(Path::new(&config.catalog.catalog_file))
        .map_err(|e| format!("Failed to load catalog: {e}"))?;

    match faculty {
        Some(id) => {
            let f = catalog.require_faculty(&id)?;
            print_faculty(&id, f);
        }
        None => {
            println!("🎓 Catálogo de posgrado — {} facultades\n", catalog.len());
            for (id, f) in catalog.iter() {
                print_faculty(id, f);
                println!();
            }
        }
    }

    Ok(())
}

fn print_faculty(id: &str, faculty: &Faculty) {
    println!("[{id}] {}", faculty.nombre);
    for kind in [
        ProgramKind::Maestria,
        ProgramKind::Doctorado,
        ProgramKind::Especialidad,
    ] {
        let programs = faculty.programs(kind);
        if programs.is_empty() {
            continue;
        }
        println!("  {}:", kind_heading(kind));
        for program in programs {
            let mark = if program.brochure_url().is_some() {
                "📄"
            } else {
                "  "
            };
            println!("    {mark} {}", program.nombre);
        }
    }
}

fn kind_heading(kind: ProgramKind) -> &'static str {
    match kind {
        ProgramKind::Maestria => "Maestrías",
        ProgramKind::Doctorado => "Doctorados",
        ProgramKind::Especialidad => "Especialidades",
    }
}
