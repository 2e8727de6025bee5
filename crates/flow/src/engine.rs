//! Per-user session engine.
//!
//! One [`SessionEngine`] serves every user. Sessions are keyed by phone
//! number and live in memory; the durable part of a conversation (the
//! selected faculty, captured contact requests) goes through the
//! [`StateStore`]. Each user's turns are serialized behind a per-session
//! mutex so a burst of messages from one number cannot interleave.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use prospecto_catalog::{CatalogIndex, ProgramKind};
use prospecto_channels::Courier;
use prospecto_core::blacklist::Blacklist;
use prospecto_core::error::{Error, FlowError};
use prospecto_core::state::{ContactDraft, StateStore};
use prospecto_core::text::{is_affirmative, is_negative, normalize};

use crate::graph::FlowGraph;
use crate::node::{NodeId, Reply, Segment, Transform};
use crate::script::{self, FAREWELL, FAREWELL_KEYWORDS};

const REJECT_OPTION: &str = "❌ Respuesta no válida, selecciona una de las opciones.";
const REJECT_PICK: &str = "❌ Opción inválida. Intente de nuevo.";
const INTERNAL_ERROR: &str = "❌ Error interno. Intente de nuevo más tarde.";
const FACULTY_LOST: &str = "❌ Error: Información de facultad perdida. Regresando al menú.";
const BROCHURE_CAPTION: &str = "📄 Aquí tienes el brochure:";
const CONTACT_STORED: &str =
    "✅ Gracias. Tu solicitud fue registrada y un asesor te contactará pronto.";
const CONTACT_FAILED: &str =
    "❌ Ocurrió un error al registrar tu solicitud. Por favor intenta de nuevo.";

/// Flows the HTTP surface can start without an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEvent {
    /// Contact-request form, from the registration endpoint.
    Contacto,
    /// Program browser menu.
    Programas,
}

impl DispatchEvent {
    fn target(self) -> NodeId {
        match self {
            DispatchEvent::Contacto => script::CONTACTO_TIPO,
            DispatchEvent::Programas => script::PROGRAMAS,
        }
    }
}

/// Where one user currently is in the conversation.
#[derive(Debug, Default)]
struct Session {
    /// Node awaiting this user's reply, `None` when idle.
    node: Option<NodeId>,
    /// Answers captured so far by the contact form.
    scratch: HashMap<String, String>,
}

/// Drives the conversation graph for every user.
pub struct SessionEngine {
    graph: FlowGraph,
    catalog: Arc<CatalogIndex>,
    store: Arc<dyn StateStore>,
    courier: Courier,
    blacklist: Arc<Blacklist>,
    info_footer: String,
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionEngine {
    pub fn new(
        graph: FlowGraph,
        catalog: Arc<CatalogIndex>,
        store: Arc<dyn StateStore>,
        courier: Courier,
        blacklist: Arc<Blacklist>,
        info_footer: impl Into<String>,
    ) -> Self {
        Self {
            graph,
            catalog,
            store,
            courier,
            blacklist,
            info_footer: info_footer.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Handle one inbound message.
    ///
    /// Blacklisted senders are dropped silently. With no session open, a
    /// farewell keyword gets the farewell and anything else starts the
    /// welcome flow; with a session open the message is the reply to the
    /// node the session is parked on.
    pub async fn handle_message(&self, from: &str, body: &str) -> Result<(), Error> {
        let turn = Uuid::new_v4();
        if self.blacklist.contains(from).await {
            debug!(%turn, from = %from, "Sender is blacklisted, ignoring message");
            return Ok(());
        }

        let handle = self.session_handle(from).await;
        let mut session = handle.lock().await;

        let ended = match session.node {
            None => {
                if FAREWELL_KEYWORDS.contains(&normalize(body).as_str()) {
                    debug!(%turn, from = %from, "Farewell keyword outside a session");
                    self.say(from, FAREWELL).await;
                    true
                } else {
                    info!(%turn, from = %from, "Session started");
                    self.walk(&mut session, from, self.graph.entry()).await?
                }
            }
            Some(node) => {
                debug!(%turn, from = %from, node, "Reply received");
                self.advance(&mut session, from, node, body).await?
            }
        };

        if ended {
            session.node = None;
            session.scratch.clear();
            drop(session);
            self.release(from, &handle).await;
        }
        Ok(())
    }

    /// Start a flow for a user without an inbound message.
    ///
    /// Replaces whatever session the user had; captured answers are
    /// discarded.
    pub async fn dispatch(&self, event: DispatchEvent, to: &str) -> Result<(), Error> {
        if self.blacklist.contains(to).await {
            debug!(to = %to, ?event, "Recipient is blacklisted, ignoring dispatch");
            return Ok(());
        }
        info!(to = %to, ?event, "Dispatching flow");

        let handle = self.session_handle(to).await;
        let mut session = handle.lock().await;
        session.scratch.clear();
        let ended = self.walk(&mut session, to, event.target()).await?;

        if ended {
            session.node = None;
            session.scratch.clear();
            drop(session);
            self.release(to, &handle).await;
        }
        Ok(())
    }

    async fn session_handle(&self, user: &str) -> Arc<Mutex<Session>> {
        if let Some(handle) = self.sessions.read().await.get(user) {
            return Arc::clone(handle);
        }
        let mut sessions = self.sessions.write().await;
        Arc::clone(sessions.entry(user.to_string()).or_default())
    }

    /// Drop a finished session unless another turn is already queued on
    /// it. A queued waiter keeps the entry and starts fresh on the
    /// cleared node.
    async fn release(&self, user: &str, handle: &Arc<Mutex<Session>>) {
        let mut sessions = self.sessions.write().await;
        let idle = sessions
            .get(user)
            .is_some_and(|current| Arc::ptr_eq(current, handle) && Arc::strong_count(current) == 2);
        if idle {
            sessions.remove(user);
        }
    }

    /// Emit nodes starting at `start` until one waits for a reply or ends
    /// the session. Returns whether the session ended.
    async fn walk(
        &self,
        session: &mut Session,
        to: &str,
        start: NodeId,
    ) -> Result<bool, FlowError> {
        let mut current = start;
        let mut hops = 0usize;
        loop {
            hops += 1;
            if hops > self.graph.len() {
                return Err(FlowError::WalkCycle(start.to_string()));
            }

            let node = self.graph.node(current)?;
            for segment in &node.prompt {
                self.send_segment(to, segment).await;
            }

            if node.terminal {
                return Ok(true);
            }
            if node.reply.is_some() {
                session.node = Some(node.id);
                return Ok(false);
            }
            current = node.next.ok_or_else(|| FlowError::Graph {
                node: node.id.to_string(),
                reason: "no continuation".into(),
            })?;
        }
    }

    /// Apply a reply to the node the session is parked on.
    async fn advance(
        &self,
        session: &mut Session,
        from: &str,
        node_id: NodeId,
        raw: &str,
    ) -> Result<bool, FlowError> {
        let node = self.graph.node(node_id)?;
        let reply = node.reply.ok_or_else(|| FlowError::Graph {
            node: node_id.to_string(),
            reason: "session parked on a node that takes no reply".into(),
        })?;
        let input = raw.trim();

        match reply {
            Reply::Menu { options } => match options.iter().find(|(opt, _)| *opt == input) {
                Some(&(_, target)) => self.walk(session, from, target).await,
                None => {
                    debug!(from = %from, node = node_id, input = %input, "Invalid menu option");
                    self.reject(session, from, node_id, REJECT_OPTION).await
                }
            },

            Reply::Confirm { yes, no } => {
                if is_affirmative(input) {
                    self.walk(session, from, yes).await
                } else if is_negative(input) {
                    self.walk(session, from, no).await
                } else {
                    debug!(from = %from, node = node_id, input = %input, "Ambiguous confirmation");
                    self.reject(session, from, node_id, REJECT_OPTION).await
                }
            }

            Reply::FacultyPick {
                kind,
                choices,
                back,
                next,
            } => {
                if input == "0" {
                    return self.walk(session, from, back).await;
                }
                match choices.iter().find(|(opt, _)| *opt == input) {
                    Some(&(_, faculty_id)) => {
                        self.show_faculty(session, from, node_id, kind, faculty_id, next)
                            .await
                    }
                    None => {
                        debug!(from = %from, node = node_id, input = %input, "Invalid faculty option");
                        self.reject(session, from, node_id, REJECT_PICK).await
                    }
                }
            }

            Reply::ProgramPick { kind, back, next } => {
                self.pick_program(session, from, node_id, kind, back, next, input)
                    .await
            }

            Reply::Field {
                name,
                transform,
                allowed,
                next,
            } => {
                if let Some(allowed) = allowed {
                    if !allowed.contains(&input) {
                        debug!(from = %from, node = node_id, input = %input, "Answer outside allowed set");
                        return self.walk(session, from, node_id).await;
                    }
                }
                let value = match transform {
                    Transform::Keep => input.to_string(),
                    Transform::TrimLower => input.to_lowercase(),
                };
                session.scratch.insert(name.to_string(), value);
                self.walk(session, from, next).await
            }

            Reply::Submit => self.submit_contact(session, from, input).await,
        }
    }

    /// Persist the chosen faculty, emit its program listing, and park at
    /// the program-selection node.
    async fn show_faculty(
        &self,
        session: &mut Session,
        from: &str,
        node_id: NodeId,
        kind: ProgramKind,
        faculty_id: &str,
        next: NodeId,
    ) -> Result<bool, FlowError> {
        let found = self
            .catalog
            .faculty(faculty_id)
            .map(|f| (f, f.programs(kind)))
            .filter(|(_, programs)| !programs.is_empty());
        let Some((faculty, programs)) = found else {
            warn!(from = %from, faculty = faculty_id, kind = kind.label(), "Faculty lookup came up empty");
            let notice = match kind {
                ProgramKind::Maestria => "❌ Facultad no encontrada.",
                _ => "❌ Facultad no encontrada o sin doctorados.",
            };
            return self.reject(session, from, node_id, notice).await;
        };

        let mut patch = Map::new();
        patch.insert("facultadId".into(), Value::String(faculty_id.to_string()));
        if let Err(e) = self.store.merge(from, patch).await {
            warn!(from = %from, error = %e, "Failed to persist faculty selection");
            return self.reject(session, from, node_id, INTERNAL_ERROR).await;
        }
        info!(from = %from, faculty = %faculty.nombre, kind = kind.label(), "Faculty selected");

        let lead = match kind {
            ProgramKind::Maestria => "Seleccione una maestría para ver más detalles:",
            _ => "Seleccione un doctorado para ver más detalles:",
        };
        let listing = programs
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}\u{fe0f}\u{20e3} {}", i + 1, p.nombre))
            .collect::<Vec<_>>()
            .join("\n");

        self.say(from, &format!("📚 *{}*", faculty.nombre)).await;
        self.say(from, lead).await;
        self.say(from, &listing).await;
        self.say(from, "0️⃣ Volver al listado de facultades").await;

        self.walk(session, from, next).await
    }

    #[allow(clippy::too_many_arguments)]
    async fn pick_program(
        &self,
        session: &mut Session,
        from: &str,
        node_id: NodeId,
        kind: ProgramKind,
        back: NodeId,
        next: NodeId,
        input: &str,
    ) -> Result<bool, FlowError> {
        let state = match self.store.get(from).await {
            Ok(state) => state,
            Err(e) => {
                warn!(from = %from, error = %e, "State read failed during program pick");
                None
            }
        };
        let faculty = state
            .as_ref()
            .and_then(|s| s.get_str("facultadId"))
            .and_then(|id| self.catalog.faculty(id));
        let Some(faculty) = faculty else {
            warn!(from = %from, "Faculty selection lost, redirecting to listing");
            self.say(from, FACULTY_LOST).await;
            return self.walk(session, from, back).await;
        };

        if input == "0" {
            if let Err(e) = self.store.delete(from).await {
                warn!(from = %from, error = %e, "Failed to clear faculty selection");
            }
            return self.walk(session, from, back).await;
        }

        let programs = faculty.programs(kind);
        let pick = input
            .parse::<usize>()
            .ok()
            .filter(|i| (1..=programs.len()).contains(i));
        let Some(index) = pick else {
            debug!(from = %from, node = node_id, input = %input, "Invalid program option");
            return self.reject(session, from, node_id, REJECT_PICK).await;
        };
        let program = &programs[index - 1];
        info!(from = %from, programa = %program.nombre, kind = kind.label(), "Program detail requested");

        self.say(from, &format!("🎓 *{}*", program.nombre)).await;
        self.say(from, program.descripcion_text(self.catalog.base_dir()))
            .await;
        if !self.info_footer.is_empty() {
            self.say(from, &self.info_footer).await;
        }

        match program.brochure_url() {
            Some(url) => {
                if let Err(e) = self.courier.send_media(from, BROCHURE_CAPTION, url).await {
                    error!(from = %from, url = %url, error = %e, "Brochure delivery failed");
                }
            }
            None => {
                let notice = match kind {
                    ProgramKind::Maestria => "📄 Brochure no disponible para esta maestría.",
                    _ => "📄 Brochure no disponible para este doctorado.",
                };
                self.say(from, notice).await;
            }
        }

        if let Err(e) = self.store.delete(from).await {
            warn!(from = %from, error = %e, "Failed to clear faculty selection");
        }
        self.walk(session, from, next).await
    }

    /// Build the contact request from the captured answers plus the final
    /// message, store it, and confirm with the assigned id. The session
    /// ends either way; a storage failure must not trap the user in the
    /// form.
    async fn submit_contact(
        &self,
        session: &mut Session,
        from: &str,
        input: &str,
    ) -> Result<bool, FlowError> {
        let draft = ContactDraft {
            usuario_id: from.to_string(),
            tipo_consulta: scratch_or(&session.scratch, "tipoConsulta", "No especificado"),
            canal: scratch_or(&session.scratch, "canal", "No especificado"),
            nombre: scratch_or(&session.scratch, "nombre", "No proporcionado"),
            correo: scratch_or(&session.scratch, "correo", "No proporcionado"),
            telefono: scratch_or(&session.scratch, "telefono", "No proporcionado"),
            mensaje: input.to_string(),
        };

        match self.store.append_contact(draft).await {
            Ok(record) => {
                info!(from = %from, id = record.id, "Contact request captured");
                self.say(
                    from,
                    &format!("{CONTACT_STORED}\nSu ID de solicitud es: {}", record.id),
                )
                .await;
            }
            Err(e) => {
                error!(from = %from, error = %e, "Contact request could not be stored");
                self.say(from, CONTACT_FAILED).await;
            }
        }
        session.scratch.clear();
        Ok(true)
    }

    /// Send the notice, then re-emit the node's prompt and wait again.
    async fn reject(
        &self,
        session: &mut Session,
        to: &str,
        node_id: NodeId,
        notice: &str,
    ) -> Result<bool, FlowError> {
        self.say(to, notice).await;
        self.walk(session, to, node_id).await
    }

    /// Outbound text where a failure must not break the turn.
    async fn say(&self, to: &str, text: &str) {
        if let Err(e) = self.courier.send_text(to, text).await {
            error!(to = %to, error = %e, "Outbound text failed");
        }
    }

    async fn send_segment(&self, to: &str, segment: &Segment) {
        let result = match &segment.media {
            Some(media) => self.courier.send_media(to, &segment.text, &media.url).await,
            None => self.courier.send_text(to, &segment.text).await,
        };
        if let Err(e) = result {
            error!(to = %to, error = %e, "Outbound segment failed");
        }
    }
}

/// Scratch value under `key`, or `fallback` when absent or empty.
fn scratch_or(scratch: &HashMap<String, String>, key: &str, fallback: &str) -> String {
    scratch
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use prospecto_channels::RetryPolicy;
    use prospecto_core::delivery::{DeliveryAdapter, OutboundMessage};
    use prospecto_core::error::DeliveryError;
    use prospecto_store::MemoryStore;

    use crate::copy::MessagePack;

    #[derive(Default)]
    struct RecordingAdapter {
        sent: StdMutex<Vec<(String, OutboundMessage)>>,
    }

    #[async_trait]
    impl DeliveryAdapter for RecordingAdapter {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(
            &self,
            destination: &str,
            message: &OutboundMessage,
        ) -> Result<(), DeliveryError> {
            self.sent
                .lock()
                .unwrap()
                .push((destination.to_string(), message.clone()));
            Ok(())
        }
    }

    impl RecordingAdapter {
        fn texts(&self) -> Vec<String> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|(_, m)| m.text.clone())
                .collect()
        }

        fn messages(&self) -> Vec<OutboundMessage> {
            self.sent.lock().unwrap().iter().map(|(_, m)| m.clone()).collect()
        }

        fn last_text(&self) -> String {
            self.texts().last().cloned().unwrap_or_default()
        }

        fn clear(&self) {
            self.sent.lock().unwrap().clear();
        }
    }

    const CATALOG: &str = r#"{
        "1": {
            "nombre": "Facultad de Ciencias de la Salud",
            "maestrias": [
                {
                    "nombre": "Maestría en Gerencia en Salud",
                    "descripcion": "Forma gerentes para servicios de salud.",
                    "brochure": "https://x.test/brochure/fcs/gerencia.pdf"
                },
                {
                    "nombre": "Maestría en Salud Pública",
                    "descripcion": "Salud poblacional y gestión sanitaria."
                }
            ],
            "doctorados": [
                {
                    "nombre": "Doctorado en Salud Pública",
                    "descripcion": "Investigación doctoral en salud pública.",
                    "brochure": "https://x.test/brochure/fcs/doctorado.pdf"
                }
            ]
        },
        "12": {
            "nombre": "Facultad de Ciencias de la Educación",
            "doctorados": [
                {
                    "nombre": "Doctorado en Educación",
                    "descripcion": "Investigación educativa avanzada.",
                    "brochure": "https://x.test/brochure/fced/educacion.pdf"
                }
            ]
        }
    }"#;

    const USER: &str = "51999000111";

    fn fixture() -> (Arc<SessionEngine>, Arc<RecordingAdapter>, Arc<MemoryStore>) {
        fixture_with(Arc::new(Blacklist::new()), "")
    }

    fn fixture_with(
        blacklist: Arc<Blacklist>,
        info_footer: &str,
    ) -> (Arc<SessionEngine>, Arc<RecordingAdapter>, Arc<MemoryStore>) {
        let adapter = Arc::new(RecordingAdapter::default());
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(CatalogIndex::from_json_str(CATALOG, ".").unwrap());
        let graph = script::build_graph(&MessagePack::built_in()).unwrap();
        let courier = Courier::new(
            adapter.clone(),
            RetryPolicy {
                attempts: 1,
                delay: Duration::ZERO,
            },
        );
        let engine = SessionEngine::new(
            graph,
            catalog,
            store.clone(),
            courier,
            blacklist,
            info_footer,
        );
        (Arc::new(engine), adapter, store)
    }

    async fn drive(engine: &SessionEngine, inputs: &[&str]) {
        for input in inputs {
            engine.handle_message(USER, input).await.unwrap();
        }
    }

    #[tokio::test]
    async fn first_message_walks_welcome_into_menu() {
        let (engine, adapter, _) = fixture();
        engine.handle_message(USER, "hola").await.unwrap();

        let messages = adapter.messages();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].text.contains("BIENVENIDO A LA ESCUELA DE POSGRADO"));
        assert!(messages[1].media.is_some(), "welcome image attached");
        assert!(messages[2].text.contains("MENÚ PRINCIPAL"));
    }

    #[tokio::test]
    async fn farewell_keyword_closes_without_session() {
        let (engine, adapter, _) = fixture();
        engine.handle_message(USER, "adiós").await.unwrap();
        assert_eq!(adapter.texts(), vec![FAREWELL.to_string()]);

        // Next message starts the welcome flow, not a parked node.
        adapter.clear();
        engine.handle_message(USER, "hola").await.unwrap();
        assert!(adapter.texts()[0].contains("BIENVENIDO"));
    }

    #[tokio::test]
    async fn invalid_menu_option_reprompts_with_notice() {
        let (engine, adapter, _) = fixture();
        drive(&engine, &["hola"]).await;
        adapter.clear();

        engine.handle_message(USER, "9").await.unwrap();
        let texts = adapter.texts();
        assert_eq!(texts[0], REJECT_OPTION);
        assert!(texts[1].contains("MENÚ PRINCIPAL"));
    }

    #[tokio::test]
    async fn maestria_detail_sends_description_and_brochure() {
        let (engine, adapter, _) = fixture();
        drive(&engine, &["hola", "1", "1", "1"]).await;
        adapter.clear();

        engine.handle_message(USER, "1").await.unwrap();
        let messages = adapter.messages();
        assert_eq!(messages[0].text, "🎓 *Maestría en Gerencia en Salud*");
        assert_eq!(messages[1].text, "Forma gerentes para servicios de salud.");
        let brochure = &messages[2];
        assert_eq!(brochure.text, BROCHURE_CAPTION);
        assert_eq!(
            brochure.media.as_ref().map(|m| m.url.as_str()),
            Some("https://x.test/brochure/fcs/gerencia.pdf")
        );
        assert!(messages[3].text.contains("¿Necesita consultar otra maestría?"));
    }

    #[tokio::test]
    async fn faculty_listing_uses_keycap_numbering() {
        let (engine, adapter, _) = fixture();
        drive(&engine, &["hola", "1"]).await;
        adapter.clear();

        engine.handle_message(USER, "1").await.unwrap();
        let texts = adapter.texts();
        assert_eq!(texts[0], "📚 *Facultad de Ciencias de la Salud*");
        assert_eq!(texts[1], "Seleccione una maestría para ver más detalles:");
        assert_eq!(
            texts[2],
            "1\u{fe0f}\u{20e3} Maestría en Gerencia en Salud\n2\u{fe0f}\u{20e3} Maestría en Salud Pública"
        );
        assert_eq!(texts[3], "0️⃣ Volver al listado de facultades");
        assert_eq!(texts[4], "📩 Seleccione una maestría:");
    }

    #[tokio::test]
    async fn program_without_brochure_sends_notice() {
        let (engine, adapter, _) = fixture();
        drive(&engine, &["hola", "1", "1", "1"]).await;
        adapter.clear();

        engine.handle_message(USER, "2").await.unwrap();
        let texts = adapter.texts();
        assert!(texts.contains(&"📄 Brochure no disponible para esta maestría.".to_string()));
        assert!(adapter.messages().iter().all(|m| m.media.is_none()));
    }

    #[tokio::test]
    async fn browse_loop_repeats_and_farewell_ends_session() {
        let (engine, adapter, _) = fixture();
        drive(&engine, &["hola", "1", "1", "1", "1"]).await;

        // "sí" repeats the faculty listing.
        adapter.clear();
        engine.handle_message(USER, "sí").await.unwrap();
        assert!(adapter.texts()[0].contains("MAESTRÍAS DE LA UNIVERSIDAD"));

        // Walk to the confirmation again and decline.
        drive(&engine, &["1", "1"]).await;
        adapter.clear();
        engine.handle_message(USER, "2").await.unwrap();
        assert_eq!(adapter.last_text(), FAREWELL);

        // The session is gone: the next message is a fresh welcome.
        adapter.clear();
        engine.handle_message(USER, "hola").await.unwrap();
        assert!(adapter.texts()[0].contains("BIENVENIDO"));
    }

    #[tokio::test]
    async fn doctorado_option_six_reaches_education_faculty() {
        let (engine, adapter, _) = fixture();
        drive(&engine, &["hola", "1", "2"]).await;
        adapter.clear();

        engine.handle_message(USER, "6").await.unwrap();
        let texts = adapter.texts();
        assert_eq!(texts[0], "📚 *Facultad de Ciencias de la Educación*");
        assert_eq!(texts[1], "Seleccione un doctorado para ver más detalles:");
        assert!(texts[2].contains("Doctorado en Educación"));
    }

    #[tokio::test]
    async fn faculty_selection_is_stored_then_cleared() {
        let (engine, _, store) = fixture();
        drive(&engine, &["hola", "1", "1", "1"]).await;

        let state = store.get(USER).await.unwrap().unwrap();
        assert_eq!(state.get_str("facultadId"), Some("1"));

        drive(&engine, &["1"]).await;
        assert!(store.get(USER).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn zero_at_program_select_returns_to_listing() {
        let (engine, adapter, store) = fixture();
        drive(&engine, &["hola", "1", "1", "1"]).await;
        adapter.clear();

        engine.handle_message(USER, "0").await.unwrap();
        assert!(adapter.texts()[0].contains("MAESTRÍAS DE LA UNIVERSIDAD"));
        assert!(store.get(USER).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lost_faculty_state_redirects_to_listing() {
        let (engine, adapter, store) = fixture();
        drive(&engine, &["hola", "1", "1", "1"]).await;
        store.delete(USER).await.unwrap();
        adapter.clear();

        engine.handle_message(USER, "1").await.unwrap();
        let texts = adapter.texts();
        assert_eq!(texts[0], FACULTY_LOST);
        assert!(texts[1].contains("MAESTRÍAS DE LA UNIVERSIDAD"));
    }

    #[tokio::test]
    async fn contact_flow_persists_request_and_confirms_id() {
        let (engine, adapter, store) = fixture();
        drive(&engine, &["hola", "5", "1", "2", "Jane Doe", " JANE@X.COM ", "999999999"]).await;
        adapter.clear();

        engine.handle_message(USER, "hello").await.unwrap();
        assert!(adapter.last_text().contains("Su ID de solicitud es: 1"));

        let requests = store.contact_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let record = &requests[0];
        assert_eq!(record.usuario_id, USER);
        assert_eq!(record.tipo_consulta, "1");
        assert_eq!(record.canal, "2");
        assert_eq!(record.nombre, "Jane Doe");
        assert_eq!(record.correo, "jane@x.com");
        assert_eq!(record.telefono, "999999999");
        assert_eq!(record.mensaje, "hello");
    }

    #[tokio::test]
    async fn contact_ids_increase_across_requests() {
        let (engine, adapter, _) = fixture();
        drive(&engine, &["hola", "5", "1", "1", "Ana", "ana@x.com", "111", "primera"]).await;
        assert!(adapter.last_text().contains("Su ID de solicitud es: 1"));

        drive(&engine, &["hola", "5", "2", "2", "Luis", "luis@x.com", "222", "segunda"]).await;
        assert!(adapter.last_text().contains("Su ID de solicitud es: 2"));
    }

    #[tokio::test]
    async fn out_of_range_tipo_reprompts_without_notice() {
        let (engine, adapter, _) = fixture();
        drive(&engine, &["hola", "5"]).await;
        adapter.clear();

        engine.handle_message(USER, "9").await.unwrap();
        let texts = adapter.texts();
        assert_eq!(texts.len(), 1);
        assert!(texts[0].contains("tipo de consulta"));
    }

    #[tokio::test]
    async fn blacklisted_sender_gets_nothing() {
        let blacklist = Arc::new(Blacklist::new());
        blacklist.add(USER).await;
        let (engine, adapter, _) = fixture_with(blacklist, "");

        engine.handle_message(USER, "hola").await.unwrap();
        engine.dispatch(DispatchEvent::Contacto, USER).await.unwrap();
        assert!(adapter.texts().is_empty());
    }

    #[tokio::test]
    async fn dispatch_contacto_starts_the_form() {
        let (engine, adapter, store) = fixture();
        engine.dispatch(DispatchEvent::Contacto, USER).await.unwrap();
        assert!(adapter.last_text().contains("Formulario de contacto personalizado"));

        // The dispatched session captures answers like an inbound one.
        drive(&engine, &["3", "1", "Eva", "eva@x.com", "333", "quiero informes"]).await;
        let requests = store.contact_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].tipo_consulta, "3");
    }

    #[tokio::test]
    async fn dispatch_programas_opens_program_menu() {
        let (engine, adapter, _) = fixture();
        engine.dispatch(DispatchEvent::Programas, USER).await.unwrap();
        assert!(adapter.last_text().contains("PROGRAMAS DE POSGRADO"));
    }

    #[tokio::test]
    async fn info_footer_is_sent_after_description() {
        let (engine, adapter, _) =
            fixture_with(Arc::new(Blacklist::new()), "📞 Informes: 900969591");
        drive(&engine, &["hola", "1", "1", "1"]).await;
        adapter.clear();

        engine.handle_message(USER, "1").await.unwrap();
        let texts = adapter.texts();
        assert_eq!(texts[1], "Forma gerentes para servicios de salud.");
        assert_eq!(texts[2], "📞 Informes: 900969591");
    }
}
