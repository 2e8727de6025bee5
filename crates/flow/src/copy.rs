//! Menu copy loaded from the messages directory.
//!
//! Operations staff edit these texts without touching code. A missing
//! or empty file falls back to the built-in copy with a warning; it is
//! never fatal.

use std::path::Path;

use tracing::warn;

pub const DEFAULT_MENU: &str = "📋 *MENÚ PRINCIPAL*\n1️⃣ Programas de Posgrado\n2️⃣ Admisión\n3️⃣ Calendario Académico\n4️⃣ Taller de Tesis\n5️⃣ Contacto";

pub const DEFAULT_PROGRAMAS: &str =
    "📚 *PROGRAMAS DE POSGRADO*\n1️⃣ Maestrías\n2️⃣ Doctorados\n0️⃣ Volver al menú";

pub const DEFAULT_ADMISION: &str =
    "📝 *ADMISIÓN*\n1️⃣ Requisitos\n2️⃣ Fechas\n3️⃣ Guía del Postulante\n4️⃣ Costos\n0️⃣ Volver al menú";

pub const DEFAULT_REQUISITOS: &str = "Requisitos no disponibles.";

pub const DEFAULT_COSTOS: &str = "Costos no disponibles.";

/// The file-loaded texts the conversation graph needs.
#[derive(Debug, Clone)]
pub struct MessagePack {
    pub menu: String,
    pub programas: String,
    pub admision: String,
    pub requisitos: String,
    pub costos: String,
    /// Footer appended to every program detail. Empty means omitted.
    pub info: String,
}

impl MessagePack {
    /// Load every text from `dir`, falling back file by file.
    pub fn load(dir: &Path) -> Self {
        Self {
            menu: read_or(dir, "menu.txt", DEFAULT_MENU),
            programas: read_or(dir, "programas.txt", DEFAULT_PROGRAMAS),
            admision: read_or(dir, "admision.txt", DEFAULT_ADMISION),
            requisitos: read_or(dir, "requisitos.txt", DEFAULT_REQUISITOS),
            costos: read_or(dir, "costos.txt", DEFAULT_COSTOS),
            info: read_or(dir, "info.txt", ""),
        }
    }

    /// The built-in copy, used when no messages directory is configured.
    pub fn built_in() -> Self {
        Self {
            menu: DEFAULT_MENU.to_string(),
            programas: DEFAULT_PROGRAMAS.to_string(),
            admision: DEFAULT_ADMISION.to_string(),
            requisitos: DEFAULT_REQUISITOS.to_string(),
            costos: DEFAULT_COSTOS.to_string(),
            info: String::new(),
        }
    }
}

fn read_or(dir: &Path, file: &str, default: &str) -> String {
    let path = dir.join(file);
    match std::fs::read_to_string(&path) {
        Ok(content) if !content.trim().is_empty() => content.trim_end().to_string(),
        Ok(_) => {
            warn!(path = %path.display(), "Message file empty, using built-in copy");
            default.to_string()
        }
        Err(_) => {
            warn!(path = %path.display(), "Message file missing, using built-in copy");
            default.to_string()
        }
    }
}
