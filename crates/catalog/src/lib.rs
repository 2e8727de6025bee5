//! # Prospecto Catalog
//!
//! The graduate-program catalog: faculties, programs, descriptions and
//! brochures. Two documents back it:
//!
//! - `catalog.json` — hierarchical, what the conversation browses
//!   ([`CatalogIndex`]);
//! - `brochures.json` — flat, what the matching engine scans
//!   ([`BrochureBook`]).
//!
//! Both are loaded once at startup, shared as `Arc`, and never mutated.

pub mod brochure;
pub mod index;
pub mod model;

pub use brochure::{BrochureBook, BrochureEntry, BrochureFaculty};
pub use index::CatalogIndex;
pub use model::{DESCRIPCION_FALLBACK, Description, Faculty, Program, ProgramKind};
