//! The persisted state document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use prospecto_core::{ContactRequest, UserState};

fn default_proximo_id() -> u64 {
    1
}

/// Everything the assistant persists, as one JSON document: per-user
/// state, the contact-request log, and the next request id. The id
/// counter lives in the document so restarts never reuse an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default)]
    pub user_state: BTreeMap<String, UserState>,

    #[serde(default)]
    pub solicitudes_contacto: Vec<ContactRequest>,

    #[serde(default = "default_proximo_id")]
    pub proximo_id: u64,
}

impl Default for StateDocument {
    fn default() -> Self {
        Self {
            user_state: BTreeMap::new(),
            solicitudes_contacto: Vec::new(),
            proximo_id: 1,
        }
    }
}

impl StateDocument {
    /// Take the next request id, advancing the counter.
    pub fn next_id(&mut self) -> u64 {
        let id = self.proximo_id;
        self.proximo_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_counter_defaults_to_one() {
        let doc: StateDocument = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(doc.proximo_id, 1);

        let doc: StateDocument =
            serde_json::from_str(r#"{"user_state":{},"solicitudes_contacto":[]}"#).unwrap();
        assert_eq!(doc.proximo_id, 1);
    }

    #[test]
    fn next_id_advances() {
        let mut doc = StateDocument::default();
        assert_eq!(doc.next_id(), 1);
        assert_eq!(doc.next_id(), 2);
        assert_eq!(doc.proximo_id, 3);
    }

    #[test]
    fn round_trips_persisted_counter() {
        let mut doc = StateDocument::default();
        doc.next_id();
        doc.next_id();
        let json = serde_json::to_string(&doc).unwrap();
        let back: StateDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.proximo_id, 3);
    }
}
