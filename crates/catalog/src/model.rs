//! Catalog model — faculties, programs, deferred descriptions.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

use prospecto_core::delivery::is_http_url;
use prospecto_core::text::normalize;

/// Shown when a program has no description or its file is unreadable.
pub const DESCRIPCION_FALLBACK: &str = "Descripción no disponible.";

/// The three program kinds the school offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramKind {
    Maestria,
    Doctorado,
    Especialidad,
}

impl ProgramKind {
    /// Lowercase singular label ("maestría").
    pub fn label(&self) -> &'static str {
        match self {
            ProgramKind::Maestria => "maestría",
            ProgramKind::Doctorado => "doctorado",
            ProgramKind::Especialidad => "especialidad",
        }
    }

    /// Infer the kind from free text. Promo requests name the program
    /// loosely ("Maestria en finanzas"), so this goes through [`normalize`].
    pub fn infer(text: &str) -> Option<Self> {
        let normalized = normalize(text);
        if normalized.contains("maestria") {
            Some(ProgramKind::Maestria)
        } else if normalized.contains("doctorado") {
            Some(ProgramKind::Doctorado)
        } else if normalized.contains("especialidad") {
            Some(ProgramKind::Especialidad)
        } else {
            None
        }
    }
}

/// A program description: inline text, or a text file read on first use.
///
/// Deferred descriptions are resolved at most once per process and cached;
/// a missing or unreadable file resolves to [`DESCRIPCION_FALLBACK`] with a
/// single warn log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Description {
    Loaded(String),
    Deferred {
        archivo: PathBuf,
        #[serde(skip)]
        cache: OnceLock<String>,
    },
}

impl Description {
    /// The description text. `base_dir` anchors relative `archivo` paths
    /// (the directory the catalog file lives in).
    pub fn resolve(&self, base_dir: &Path) -> &str {
        match self {
            Description::Loaded(text) => text,
            Description::Deferred { archivo, cache } => cache.get_or_init(|| {
                let path = base_dir.join(archivo);
                match fs::read_to_string(&path) {
                    Ok(text) => text.trim_end().to_string(),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Description file unreadable");
                        DESCRIPCION_FALLBACK.to_string()
                    }
                }
            }),
        }
    }
}

/// One graduate program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub nombre: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<Description>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brochure: Option<String>,
}

impl Program {
    /// Description text, falling back when the program has none.
    pub fn descripcion_text(&self, base_dir: &Path) -> &str {
        self.descripcion
            .as_ref()
            .map(|d| d.resolve(base_dir))
            .unwrap_or(DESCRIPCION_FALLBACK)
    }

    /// Brochure URL, filtered to plain http(s). Anything else counts as
    /// absent.
    pub fn brochure_url(&self) -> Option<&str> {
        self.brochure
            .as_deref()
            .filter(|url| is_http_url(url))
    }
}

/// A faculty and its programs, partitioned by kind. Every partition may be
/// empty; program order within a partition is document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
    pub nombre: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maestrias: Vec<Program>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doctorados: Vec<Program>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub especialidades: Vec<Program>,
}

impl Faculty {
    /// The kind partition, possibly empty.
    pub fn programs(&self, kind: ProgramKind) -> &[Program] {
        match kind {
            ProgramKind::Maestria => &self.maestrias,
            ProgramKind::Doctorado => &self.doctorados,
            ProgramKind::Especialidad => &self.especialidades,
        }
    }
}
