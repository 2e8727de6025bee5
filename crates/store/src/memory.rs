//! In-memory store for tests and the local chat loop.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::info;

use prospecto_core::error::StoreError;
use prospecto_core::{ContactDraft, ContactRequest, StateStore, UserState};

use crate::document::StateDocument;

/// Holds the whole state document behind an `RwLock`. Nothing survives
/// the process.
#[derive(Default)]
pub struct MemoryStore {
    doc: RwLock<StateDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, user_id: &str) -> Result<Option<UserState>, StoreError> {
        Ok(self.doc.read().await.user_state.get(user_id).cloned())
    }

    async fn merge(
        &self,
        user_id: &str,
        patch: Map<String, Value>,
    ) -> Result<UserState, StoreError> {
        let mut doc = self.doc.write().await;
        let entry = doc.user_state.entry(user_id.to_string()).or_default();
        for (key, value) in patch {
            entry.attrs.insert(key, value);
        }
        entry.updated_at = Some(Utc::now());
        Ok(entry.clone())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self.doc.write().await.user_state.remove(user_id).is_some())
    }

    async fn append_contact(&self, draft: ContactDraft) -> Result<ContactRequest, StoreError> {
        let mut doc = self.doc.write().await;
        let id = doc.next_id();
        let record = ContactRequest::from_draft(draft, id);
        doc.solicitudes_contacto.push(record.clone());
        info!(id, user = %record.usuario_id, "Contact request stored");
        Ok(record)
    }

    async fn contact_requests(&self) -> Result<Vec<ContactRequest>, StoreError> {
        Ok(self.doc.read().await.solicitudes_contacto.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn merge_accumulates_attributes() {
        let store = MemoryStore::new();
        let mut patch = Map::new();
        patch.insert("facultadId".into(), json!("5"));
        store.merge("u", patch).await.unwrap();

        let mut patch = Map::new();
        patch.insert("tipoPrograma".into(), json!("doctorado"));
        let merged = store.merge("u", patch).await.unwrap();
        assert_eq!(merged.get_str("facultadId"), Some("5"));
        assert_eq!(merged.get_str("tipoPrograma"), Some("doctorado"));
    }

    #[tokio::test]
    async fn ids_increase_within_process() {
        let store = MemoryStore::new();
        let draft = ContactDraft {
            usuario_id: "u".into(),
            tipo_consulta: "1".into(),
            canal: "1".into(),
            nombre: "N".into(),
            correo: "c@x.com".into(),
            telefono: "9".into(),
            mensaje: "m".into(),
        };
        assert_eq!(store.append_contact(draft.clone()).await.unwrap().id, 1);
        assert_eq!(store.append_contact(draft).await.unwrap().id, 2);
    }

    #[tokio::test]
    async fn delete_unknown_user_is_false() {
        let store = MemoryStore::new();
        assert!(!store.delete("nadie").await.unwrap());
    }
}
