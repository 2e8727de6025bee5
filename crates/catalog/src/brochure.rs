//! Flat brochure book used by the promo sender.
//!
//! Separate from the full catalog: one entry per program, no
//! descriptions, faculty ids as keys. This is the haystack the matcher
//! in `prospecto-matching` searches.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use prospecto_core::delivery::is_http_url;
use prospecto_core::error::CatalogError;
use prospecto_core::text::normalize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrochureEntry {
    pub nombre: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brochure: Option<String>,
}

impl BrochureEntry {
    /// Brochure URL, filtered to plain http(s).
    pub fn url(&self) -> Option<&str> {
        self.brochure.as_deref().filter(|u| is_http_url(u))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrochureFaculty {
    pub nombre: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub programas: Vec<BrochureEntry>,
}

/// All brochure entries, keyed by faculty id and iterated in numeric id
/// order so matching tie-breaks stay stable.
#[derive(Debug, Clone, Default)]
pub struct BrochureBook {
    facultades: HashMap<String, BrochureFaculty>,
    ordered_ids: Vec<String>,
}

impl BrochureBook {
    /// Load the book from `path`. Missing file means an empty book with a
    /// warning; unreadable or malformed is an error.
    pub fn load(path: &Path) -> std::result::Result<Self, CatalogError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Brochure file not found, starting empty");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CatalogError::Io {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };
        let book = Self::from_json_str(&raw).map_err(|e| match e {
            CatalogError::Parse { reason, .. } => CatalogError::Parse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        info!(path = %path.display(), faculties = book.facultades.len(), "Brochure book loaded");
        Ok(book)
    }

    pub fn from_json_str(raw: &str) -> std::result::Result<Self, CatalogError> {
        let facultades: HashMap<String, BrochureFaculty> =
            serde_json::from_str(raw).map_err(|e| CatalogError::Parse {
                path: String::new(),
                reason: e.to_string(),
            })?;
        let mut ordered_ids: Vec<String> = facultades.keys().cloned().collect();
        ordered_ids.sort_by_key(|id| (id.parse::<u64>().unwrap_or(u64::MAX), id.clone()));
        Ok(Self {
            facultades,
            ordered_ids,
        })
    }

    /// Every entry in the book, by faculty id order then document order.
    pub fn entries(&self) -> impl Iterator<Item = &BrochureEntry> {
        self.ordered_ids
            .iter()
            .filter_map(|id| self.facultades.get(id))
            .flat_map(|f| f.programas.iter())
    }

    /// Find a faculty whose name overlaps `hint` (either contains the
    /// other after normalization). A blank hint matches nothing.
    pub fn find_faculty(&self, hint: &str) -> Option<&BrochureFaculty> {
        let needle = normalize(hint);
        if needle.is_empty() {
            return None;
        }
        self.ordered_ids
            .iter()
            .filter_map(|id| self.facultades.get(id))
            .find(|f| {
                let name = normalize(&f.nombre);
                name.contains(&needle) || needle.contains(&name)
            })
    }

    /// First entry with a usable brochure in the file order of `faculty`.
    pub fn first_brochure(faculty: &BrochureFaculty) -> Option<&BrochureEntry> {
        faculty.programas.iter().find(|p| p.url().is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.facultades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "10": {
            "nombre": "Facultad de Ciencias Económicas",
            "programas": [
                { "nombre": "Maestría en Finanzas", "brochure": "https://x.test/fin.pdf" },
                { "nombre": "Maestría en Comercio y Negociaciones Internacionales" }
            ]
        },
        "2": {
            "nombre": "Facultad de Ciencias Administrativas",
            "programas": [
                { "nombre": "Maestría en Gerencia Educativa", "brochure": "ftp://x.test/ge.pdf" },
                { "nombre": "Doctorado en Administración", "brochure": "https://x.test/da.pdf" }
            ]
        }
    }"#;

    #[test]
    fn entries_follow_id_order() {
        let book = BrochureBook::from_json_str(FIXTURE).unwrap();
        let names: Vec<&str> = book.entries().map(|e| e.nombre.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Maestría en Gerencia Educativa",
                "Doctorado en Administración",
                "Maestría en Finanzas",
                "Maestría en Comercio y Negociaciones Internacionales",
            ]
        );
    }

    #[test]
    fn faculty_hint_matches_both_directions() {
        let book = BrochureBook::from_json_str(FIXTURE).unwrap();
        // Hint shorter than the name
        let f = book.find_faculty("ciencias economicas").unwrap();
        assert_eq!(f.nombre, "Facultad de Ciencias Económicas");
        // Hint longer than the name
        let f = book
            .find_faculty("la Facultad de Ciencias Administrativas del Callao")
            .unwrap();
        assert_eq!(f.nombre, "Facultad de Ciencias Administrativas");
        assert!(book.find_faculty("facultad de derecho").is_none());
        assert!(book.find_faculty("   ").is_none());
    }

    #[test]
    fn first_brochure_skips_entries_without_url() {
        let book = BrochureBook::from_json_str(FIXTURE).unwrap();
        let f = book.find_faculty("administrativas").unwrap();
        // The ftp URL does not count as a brochure
        let entry = BrochureBook::first_brochure(f).unwrap();
        assert_eq!(entry.nombre, "Doctorado en Administración");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let book = BrochureBook::load(&dir.path().join("no-existe.json")).unwrap();
        assert!(book.is_empty());
    }
}
