//! Durable conversation state — the store trait and its document shapes.
//!
//! The store holds one JSON document: a per-user attribute bag, the
//! append-only contact-request log, and the durable request counter. Field
//! names on disk are the document format the admissions back office already
//! ingests; do not rename them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Per-user durable attribute bag.
///
/// Attributes are opaque to the store; the flow engine reads the keys it
/// wrote (`facultadId`). `updatedAt` is refreshed on every merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(flatten)]
    pub attrs: Map<String, Value>,

    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserState {
    /// String attribute accessor; non-string values read as absent.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }
}

/// A contact request as captured by the conversation, before the store
/// assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDraft {
    #[serde(rename = "usuarioId")]
    pub usuario_id: String,
    #[serde(rename = "tipoConsulta")]
    pub tipo_consulta: String,
    pub canal: String,
    pub nombre: String,
    pub correo: String,
    pub telefono: String,
    pub mensaje: String,
}

/// A stored contact request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactRequest {
    pub id: u64,
    #[serde(rename = "usuarioId")]
    pub usuario_id: String,
    #[serde(rename = "tipoConsulta")]
    pub tipo_consulta: String,
    pub canal: String,
    pub nombre: String,
    pub correo: String,
    pub telefono: String,
    pub mensaje: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl ContactRequest {
    /// Stamp a draft with its assigned id and the current time.
    pub fn from_draft(draft: ContactDraft, id: u64) -> Self {
        Self {
            id,
            usuario_id: draft.usuario_id,
            tipo_consulta: draft.tipo_consulta,
            canal: draft.canal,
            nombre: draft.nombre,
            correo: draft.correo,
            telefono: draft.telefono,
            mensaje: draft.mensaje,
            created_at: Utc::now(),
        }
    }
}

/// The durable state seam.
///
/// Implementations: file-backed JSON document, in-memory (tests and local
/// chat). Reads always reflect the document as persisted; no implementation
/// keeps a private cache between calls.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Backend name (e.g. "file", "memory").
    fn name(&self) -> &str;

    /// Fetch a user's state, `None` if the user has none.
    async fn get(&self, user_id: &str) -> std::result::Result<Option<UserState>, StoreError>;

    /// Shallow-merge `patch` into the user's attribute bag, creating the
    /// entry if absent, and refresh `updatedAt`. Returns the merged state.
    async fn merge(
        &self,
        user_id: &str,
        patch: Map<String, Value>,
    ) -> std::result::Result<UserState, StoreError>;

    /// Remove a user's state. Returns whether an entry existed.
    async fn delete(&self, user_id: &str) -> std::result::Result<bool, StoreError>;

    /// Append a contact request, assigning the next durable id and the
    /// creation timestamp. The returned record is what the user is told.
    async fn append_contact(
        &self,
        draft: ContactDraft,
    ) -> std::result::Result<ContactRequest, StoreError>;

    /// Snapshot of the contact-request log, in append order.
    async fn contact_requests(&self) -> std::result::Result<Vec<ContactRequest>, StoreError>;
}
