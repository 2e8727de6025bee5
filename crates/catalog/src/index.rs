//! The loaded program catalog, keyed by faculty id.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use prospecto_core::error::CatalogError;

use crate::model::{Faculty, Program, ProgramKind};

/// All faculties, loaded from a JSON document mapping faculty id to
/// [`Faculty`]. Ids are menu digits ("1" through "12"), kept in numeric
/// order so menus and tie-breaks are stable.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    facultades: HashMap<String, Faculty>,
    ordered_ids: Vec<String>,
    base_dir: PathBuf,
}

impl CatalogIndex {
    /// Load the catalog from `path`. A missing file yields an empty
    /// catalog with a warning; an unreadable or malformed file is an
    /// error the caller must surface.
    pub fn load(path: &Path) -> std::result::Result<Self, CatalogError> {
        let base_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Catalog file not found, starting empty");
                return Ok(Self::empty(base_dir));
            }
            Err(e) => {
                return Err(CatalogError::Io {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };
        let index = Self::from_json_str(&raw, base_dir).map_err(|e| match e {
            CatalogError::Parse { reason, .. } => CatalogError::Parse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        info!(path = %path.display(), faculties = index.len(), "Catalog loaded");
        Ok(index)
    }

    /// Parse a catalog document directly. `base_dir` anchors deferred
    /// description paths.
    pub fn from_json_str(
        raw: &str,
        base_dir: impl Into<PathBuf>,
    ) -> std::result::Result<Self, CatalogError> {
        let facultades: HashMap<String, Faculty> =
            serde_json::from_str(raw).map_err(|e| CatalogError::Parse {
                path: String::new(),
                reason: e.to_string(),
            })?;
        let mut ordered_ids: Vec<String> = facultades.keys().cloned().collect();
        ordered_ids.sort_by_key(|id| (id.parse::<u64>().unwrap_or(u64::MAX), id.clone()));
        Ok(Self {
            facultades,
            ordered_ids,
            base_dir: base_dir.into(),
        })
    }

    pub fn empty(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            facultades: HashMap::new(),
            ordered_ids: Vec::new(),
            base_dir: base_dir.into(),
        }
    }

    pub fn faculty(&self, id: &str) -> Option<&Faculty> {
        self.facultades.get(id)
    }

    /// Like [`faculty`](Self::faculty) but an unknown id is an error.
    pub fn require_faculty(&self, id: &str) -> std::result::Result<&Faculty, CatalogError> {
        self.facultades
            .get(id)
            .ok_or_else(|| CatalogError::UnknownFaculty(id.to_string()))
    }

    /// Programs of `kind` in the faculty `id`, empty when the faculty is
    /// unknown or has none.
    pub fn programs(&self, id: &str, kind: ProgramKind) -> &[Program] {
        self.facultades
            .get(id)
            .map(|f| f.programs(kind))
            .unwrap_or(&[])
    }

    /// Faculty ids in numeric order.
    pub fn faculty_ids(&self) -> &[String] {
        &self.ordered_ids
    }

    /// Faculties in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Faculty)> {
        self.ordered_ids
            .iter()
            .filter_map(|id| self.facultades.get(id).map(|f| (id.as_str(), f)))
    }

    /// Directory deferred description paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn len(&self) -> usize {
        self.facultades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facultades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "2": {
            "nombre": "Facultad de Ciencias Administrativas",
            "maestrias": [
                { "nombre": "Maestría en Administración Estratégica de Empresas" }
            ],
            "doctorados": [
                { "nombre": "Doctorado en Administración" }
            ]
        },
        "10": {
            "nombre": "Facultad de Ciencias Económicas",
            "maestrias": [
                { "nombre": "Maestría en Finanzas", "brochure": "https://x.test/fin.pdf" }
            ]
        },
        "1": {
            "nombre": "Facultad de Ciencias de la Salud",
            "maestrias": [
                { "nombre": "Maestría en Gerencia en Salud" },
                { "nombre": "Maestría en Salud Pública" }
            ]
        }
    }"#;

    #[test]
    fn ids_are_ordered_numerically() {
        let index = CatalogIndex::from_json_str(FIXTURE, ".").unwrap();
        assert_eq!(index.faculty_ids(), &["1", "2", "10"]);
        let names: Vec<&str> = index.iter().map(|(id, _)| id).collect();
        assert_eq!(names, vec!["1", "2", "10"]);
    }

    #[test]
    fn lookup_by_id() {
        let index = CatalogIndex::from_json_str(FIXTURE, ".").unwrap();
        assert_eq!(
            index.faculty("10").unwrap().nombre,
            "Facultad de Ciencias Económicas"
        );
        assert!(index.faculty("99").is_none());
        assert!(matches!(
            index.require_faculty("99"),
            Err(CatalogError::UnknownFaculty(id)) if id == "99"
        ));
    }

    #[test]
    fn programs_of_missing_faculty_are_empty() {
        let index = CatalogIndex::from_json_str(FIXTURE, ".").unwrap();
        assert_eq!(index.programs("1", ProgramKind::Maestria).len(), 2);
        assert!(index.programs("1", ProgramKind::Doctorado).is_empty());
        assert!(index.programs("99", ProgramKind::Maestria).is_empty());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = CatalogIndex::load(&dir.path().join("no-existe.json")).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.base_dir(), dir.path());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "{ truncated").unwrap();
        let err = CatalogIndex::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn load_resolves_base_dir_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"1": {"nombre": "F", "maestrias": [
                { "nombre": "M", "descripcion": { "archivo": "desc/m.txt" } }
            ]}}"#,
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("desc")).unwrap();
        std::fs::write(dir.path().join("desc/m.txt"), "Texto de prueba.\n").unwrap();

        let index = CatalogIndex::load(&path).unwrap();
        let program = &index.programs("1", ProgramKind::Maestria)[0];
        assert_eq!(program.descripcion_text(index.base_dir()), "Texto de prueba.");
    }
}
