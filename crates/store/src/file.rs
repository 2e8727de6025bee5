//! File-backed store — one pretty-printed JSON document on disk.
//!
//! Every operation reads the document fresh, mutates it, and writes it
//! back while holding a single writer lock, so concurrent turns cannot
//! interleave their read-modify-write cycles. A missing file is an empty
//! document; an unreadable or malformed one is logged and treated as
//! empty rather than taking the conversation down. Failed writes are
//! logged and swallowed for the same reason: the chat keeps going even
//! when the disk does not.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use prospecto_core::error::StoreError;
use prospecto_core::{ContactDraft, ContactRequest, StateStore, UserState};

use crate::document::StateDocument;

pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        debug!(path = %path.display(), "File store opened");
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    fn read_document(&self) -> StateDocument {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return StateDocument::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "State document unreadable, starting empty");
                return StateDocument::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "State document malformed, starting empty");
                StateDocument::default()
            }
        }
    }

    fn write_document(&self, doc: &StateDocument) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!(path = %self.path.display(), error = %e, "Could not create state directory");
                return;
            }
        }
        let json = match serde_json::to_string_pretty(doc) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Could not serialize state document");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            error!(path = %self.path.display(), error = %e, "Could not write state document");
        }
    }
}

#[async_trait]
impl StateStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, user_id: &str) -> Result<Option<UserState>, StoreError> {
        let _guard = self.write_lock.lock().await;
        Ok(self.read_document().user_state.get(user_id).cloned())
    }

    async fn merge(
        &self,
        user_id: &str,
        patch: Map<String, Value>,
    ) -> Result<UserState, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document();
        let entry = doc.user_state.entry(user_id.to_string()).or_default();
        for (key, value) in patch {
            entry.attrs.insert(key, value);
        }
        entry.updated_at = Some(Utc::now());
        let merged = entry.clone();
        self.write_document(&doc);
        Ok(merged)
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document();
        let existed = doc.user_state.remove(user_id).is_some();
        if existed {
            self.write_document(&doc);
        }
        Ok(existed)
    }

    async fn append_contact(&self, draft: ContactDraft) -> Result<ContactRequest, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document();
        let id = doc.next_id();
        let record = ContactRequest::from_draft(draft, id);
        doc.solicitudes_contacto.push(record.clone());
        self.write_document(&doc);
        info!(id, user = %record.usuario_id, "Contact request stored");
        Ok(record)
    }

    async fn contact_requests(&self) -> Result<Vec<ContactRequest>, StoreError> {
        let _guard = self.write_lock.lock().await;
        Ok(self.read_document().solicitudes_contacto)
    }
}
