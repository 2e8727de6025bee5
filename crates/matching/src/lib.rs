//! Brochure matching.
//!
//! Promo requests name a program in free text ("Maestria en finanzas").
//! Resolution cascades through three tiers and stops at the first hit:
//! exact normalized equality, token overlap, then a faculty-level
//! fallback driven by the request's faculty hint. Entries without an
//! http(s) brochure are invisible to every tier.

use std::sync::Arc;

use tracing::debug;

use prospecto_catalog::{BrochureBook, BrochureEntry};
use prospecto_core::text::{normalize, tokenize};

/// Which tier produced a match. `Exact` and `TokenOverlap` identify a
/// specific program; `FacultyFallback` only identifies the faculty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    TokenOverlap,
    FacultyFallback,
}

/// A resolved brochure: the URL to send plus the matched entry name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrochureMatch {
    pub url: String,
    pub programa: String,
    pub tier: MatchTier,
}

/// Resolves free-text program names against a [`BrochureBook`].
#[derive(Clone)]
pub struct Matcher {
    book: Arc<BrochureBook>,
}

impl Matcher {
    pub fn new(book: Arc<BrochureBook>) -> Self {
        Self { book }
    }

    /// Cascade through the tiers. `programa` is the free-text program
    /// name, `facultad` the faculty hint used by the fallback tier.
    pub fn resolve(&self, programa: &str, facultad: &str) -> Option<BrochureMatch> {
        let matched = self
            .exact(programa)
            .or_else(|| self.token_overlap(programa))
            .or_else(|| self.faculty_fallback(facultad));
        match &matched {
            Some(m) => {
                debug!(tier = ?m.tier, programa = %m.programa, "Brochure resolved");
            }
            None => {
                debug!(programa = %programa, facultad = %facultad, "No brochure matched");
            }
        }
        matched
    }

    /// First entry whose normalized name equals the normalized query.
    fn exact(&self, programa: &str) -> Option<BrochureMatch> {
        let needle = normalize(programa);
        if needle.is_empty() {
            return None;
        }
        self.book
            .entries()
            .find(|e| e.url().is_some() && normalize(&e.nombre) == needle)
            .and_then(|e| Self::matched(e, MatchTier::Exact))
    }

    /// Best token-overlap candidate. A query token counts when it and a
    /// candidate token contain one another either way. The score must
    /// reach `max(2, tokens/2)` and beat the running best strictly, so
    /// ties keep the earliest entry in book order.
    fn token_overlap(&self, programa: &str) -> Option<BrochureMatch> {
        let query_tokens = tokenize(programa);
        if query_tokens.is_empty() {
            return None;
        }
        let threshold = (query_tokens.len() / 2).max(2);

        let mut best: Option<&BrochureEntry> = None;
        let mut best_score = 0usize;
        for entry in self.book.entries() {
            if entry.url().is_none() {
                continue;
            }
            let candidate_tokens = tokenize(&entry.nombre);
            let score = query_tokens
                .iter()
                .filter(|qt| {
                    candidate_tokens
                        .iter()
                        .any(|ct| ct.contains(qt.as_str()) || qt.contains(ct.as_str()))
                })
                .count();
            if score >= threshold && score > best_score {
                best = Some(entry);
                best_score = score;
            }
        }
        best.and_then(|e| Self::matched(e, MatchTier::TokenOverlap))
    }

    /// First brochure of the faculty whose name overlaps the hint.
    fn faculty_fallback(&self, facultad: &str) -> Option<BrochureMatch> {
        let faculty = self.book.find_faculty(facultad)?;
        BrochureBook::first_brochure(faculty)
            .and_then(|e| Self::matched(e, MatchTier::FacultyFallback))
    }

    fn matched(entry: &BrochureEntry, tier: MatchTier) -> Option<BrochureMatch> {
        entry.url().map(|url| BrochureMatch {
            url: url.to_string(),
            programa: entry.nombre.clone(),
            tier,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(raw: &str) -> Matcher {
        Matcher::new(Arc::new(BrochureBook::from_json_str(raw).unwrap()))
    }

    const FIXTURE: &str = r#"{
        "1": {
            "nombre": "Facultad de Ciencias de la Salud",
            "programas": [
                { "nombre": "Maestría en Salud Pública", "brochure": "https://x.test/msp.pdf" },
                { "nombre": "Doctorado en Salud Pública", "brochure": "https://x.test/dsp.pdf" }
            ]
        },
        "10": {
            "nombre": "Facultad de Ciencias Económicas",
            "programas": [
                { "nombre": "Maestría en Finanzas", "brochure": "https://x.test/fin.pdf" },
                { "nombre": "Maestría en Comercio y Negociaciones Internacionales", "brochure": "https://x.test/cni.pdf" }
            ]
        }
    }"#;

    #[test]
    fn exact_tier_ignores_accents_and_case() {
        let matcher = book(FIXTURE);
        let m = matcher.resolve("maestria en salud publica", "").unwrap();
        assert_eq!(m.tier, MatchTier::Exact);
        assert_eq!(m.url, "https://x.test/msp.pdf");
        assert_eq!(m.programa, "Maestría en Salud Pública");
    }

    #[test]
    fn exact_tier_beats_token_overlap() {
        // "Finanzas" tokenizes to one token, below the overlap floor of
        // two, and the earlier entry shares that token. Exact equality
        // still wins for the later entry.
        let matcher = book(
            r#"{
                "1": { "nombre": "A", "programas": [
                    { "nombre": "Maestría en Gestión de Finanzas", "brochure": "https://x.test/a.pdf" }
                ]},
                "2": { "nombre": "B", "programas": [
                    { "nombre": "Finanzas", "brochure": "https://x.test/b.pdf" }
                ]}
            }"#,
        );
        let m = matcher.resolve("finanzas", "").unwrap();
        assert_eq!(m.tier, MatchTier::Exact);
        assert_eq!(m.url, "https://x.test/b.pdf");
    }

    #[test]
    fn token_overlap_matches_partial_names() {
        let matcher = book(FIXTURE);
        // Tokens: maestria, comercio, internacional. "internacional" is a
        // substring of "internacionales", so it counts.
        let m = matcher
            .resolve("Maestría en Comercio Internacional", "")
            .unwrap();
        assert_eq!(m.tier, MatchTier::TokenOverlap);
        assert_eq!(m.url, "https://x.test/cni.pdf");
    }

    #[test]
    fn token_overlap_tie_keeps_book_order() {
        let matcher = book(FIXTURE);
        // Both Salud Pública entries score two; the maestría comes first.
        let m = matcher.resolve("Salud Pública", "").unwrap();
        assert_eq!(m.tier, MatchTier::TokenOverlap);
        assert_eq!(m.programa, "Maestría en Salud Pública");
    }

    #[test]
    fn token_threshold_scales_with_query_length() {
        let matcher = book(FIXTURE);
        // Six tokens require three overlaps; only two of these hit
        // "Maestría en Finanzas".
        assert!(
            matcher
                .resolve(
                    "Maestría Finanzas Corporativas Avanzadas Bursátiles Cuantitativas",
                    ""
                )
                .is_none()
        );
    }

    #[test]
    fn faculty_fallback_when_program_is_unknown() {
        let matcher = book(FIXTURE);
        let m = matcher
            .resolve("Curso de Titulación", "ciencias economicas")
            .unwrap();
        assert_eq!(m.tier, MatchTier::FacultyFallback);
        assert_eq!(m.url, "https://x.test/fin.pdf");
    }

    #[test]
    fn entries_without_http_brochure_never_match() {
        let matcher = book(
            r#"{
                "1": { "nombre": "Facultad de Ciencias de la Salud", "programas": [
                    { "nombre": "Maestría en Enfermería", "brochure": "ftp://x.test/e.pdf" }
                ]}
            }"#,
        );
        assert!(matcher.resolve("Maestría en Enfermería", "salud").is_none());
    }

    #[test]
    fn no_match_yields_none() {
        let matcher = book(FIXTURE);
        assert!(matcher.resolve("Astronomía Lunar", "facultad de derecho").is_none());
        assert!(matcher.resolve("", "").is_none());
    }
}
