//! HTTP surface for the prospecto admissions assistant.
//!
//! Exposes the endpoints the WPPConnect bridge and the admissions back
//! office call: the inbound message webhook, direct sends, flow
//! triggers, blacklist management, and the promotional push.
//!
//! Built on Axum for high performance async HTTP.

pub mod promo;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use prospecto_catalog::{BrochureBook, CatalogIndex};
use prospecto_channels::{ConsoleAdapter, Courier, RetryPolicy, WppBridge, WppBridgeConfig};
use prospecto_config::AppConfig;
use prospecto_core::blacklist::Blacklist;
use prospecto_core::delivery::DeliveryAdapter;
use prospecto_core::error::Error;
use prospecto_core::state::StateStore;
use prospecto_flow::{DispatchEvent, MessagePack, SessionEngine, script};
use prospecto_matching::Matcher;
use prospecto_store::FileStore;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub engine: Arc<SessionEngine>,
    pub courier: Courier,
    pub matcher: Matcher,
    pub blacklist: Arc<Blacklist>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/messages", post(send_message_handler))
        .route("/register", post(register_handler))
        .route("/programas", post(programas_handler))
        .route("/blacklist", post(blacklist_handler))
        .route("/blacklist/list", get(blacklist_list_handler))
        .route("/enviar-mensaje", post(promo_handler))
        .route("/webhook", post(webhook_handler))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Wire the full application from configuration: catalog, store,
/// delivery adapter, session engine, matcher.
pub fn build_state(config: &AppConfig) -> Result<SharedState, Error> {
    let catalog = Arc::new(CatalogIndex::load(Path::new(&config.catalog.catalog_file))?);
    let book = Arc::new(BrochureBook::load(Path::new(&config.catalog.brochure_file))?);
    let copy = MessagePack::load(Path::new(&config.catalog.messages_dir));

    let store: Arc<dyn StateStore> =
        Arc::new(FileStore::new(PathBuf::from(&config.storage.db_file)));

    let adapter: Arc<dyn DeliveryAdapter> = match config.delivery.adapter.as_str() {
        "console" => Arc::new(ConsoleAdapter),
        _ => Arc::new(WppBridge::new(WppBridgeConfig {
            base_url: config.delivery.bridge_url.clone(),
            session: config.delivery.session.clone(),
            token: config.delivery.token.clone(),
        })),
    };
    let courier = Courier::new(
        adapter,
        RetryPolicy {
            attempts: config.delivery.media_retry_attempts,
            delay: Duration::from_millis(config.delivery.media_retry_delay_ms),
        },
    );

    let blacklist = Arc::new(Blacklist::new());
    let graph = script::build_graph(&copy)?;

    info!(
        faculties = catalog.len(),
        adapter = courier.adapter_name(),
        "Gateway state assembled"
    );

    let engine = Arc::new(SessionEngine::new(
        graph,
        catalog,
        store,
        courier.clone(),
        blacklist.clone(),
        copy.info.clone(),
    ));

    Ok(Arc::new(GatewayState {
        engine,
        courier,
        matcher: Matcher::new(book),
        blacklist,
    }))
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = build_state(&config)?;
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Deserialize)]
struct SendMessageRequest {
    number: String,
    message: String,
    #[serde(rename = "urlMedia", default)]
    url_media: Option<String>,
}

async fn send_message_handler(
    State(state): State<SharedState>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<String, StatusCode> {
    let result = match payload.url_media.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => {
            state
                .courier
                .send_media(&payload.number, &payload.message, url)
                .await
        }
        None => state.courier.send_text(&payload.number, &payload.message).await,
    };

    match result {
        Ok(()) => Ok("sended".to_string()),
        Err(e) => {
            error!(number = %payload.number, error = %e, "Direct send failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Deserialize)]
struct RegisterRequest {
    number: String,
    #[serde(default)]
    name: Option<String>,
}

async fn register_handler(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<String, StatusCode> {
    info!(
        number = %payload.number,
        name = payload.name.as_deref().unwrap_or(""),
        "Contact flow trigger received"
    );
    match state
        .engine
        .dispatch(DispatchEvent::Contacto, &payload.number)
        .await
    {
        Ok(()) => Ok("trigger".to_string()),
        Err(e) => {
            error!(number = %payload.number, error = %e, "Contact flow trigger failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Deserialize)]
struct ProgramasRequest {
    number: String,
}

async fn programas_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ProgramasRequest>,
) -> Result<String, StatusCode> {
    match state
        .engine
        .dispatch(DispatchEvent::Programas, &payload.number)
        .await
    {
        Ok(()) => Ok("trigger".to_string()),
        Err(e) => {
            error!(number = %payload.number, error = %e, "Program flow trigger failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Deserialize)]
struct BlacklistRequest {
    number: String,
    intent: String,
}

#[derive(Serialize)]
struct BlacklistResponse {
    status: &'static str,
    number: String,
    intent: String,
}

async fn blacklist_handler(
    State(state): State<SharedState>,
    Json(payload): Json<BlacklistRequest>,
) -> Result<Json<BlacklistResponse>, StatusCode> {
    match payload.intent.as_str() {
        "add" => {
            state.blacklist.add(&payload.number).await;
        }
        "remove" => {
            state.blacklist.remove(&payload.number).await;
        }
        _ => return Err(StatusCode::BAD_REQUEST),
    }
    Ok(Json(BlacklistResponse {
        status: "ok",
        number: payload.number,
        intent: payload.intent,
    }))
}

#[derive(Serialize)]
struct BlacklistListResponse {
    status: &'static str,
    blacklist: Vec<String>,
}

async fn blacklist_list_handler(State(state): State<SharedState>) -> Json<BlacklistListResponse> {
    Json(BlacklistListResponse {
        status: "ok",
        blacklist: state.blacklist.list().await,
    })
}

#[derive(Deserialize)]
struct PromoRequest {
    #[serde(default)]
    numero: Option<String>,
    #[serde(default)]
    mensaje: Option<String>,
    #[serde(default)]
    facultad: Option<String>,
    #[serde(default)]
    programa: Option<String>,
}

#[derive(Serialize)]
struct PromoResponse {
    status: &'static str,
    #[serde(rename = "brochureEnviado")]
    brochure_enviado: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

async fn promo_handler(
    State(state): State<SharedState>,
    Json(payload): Json<PromoRequest>,
) -> Result<Json<PromoResponse>, (StatusCode, Json<ErrorResponse>)> {
    let fields = (
        non_empty(payload.numero),
        non_empty(payload.mensaje),
        non_empty(payload.facultad),
        non_empty(payload.programa),
    );
    let (Some(numero), Some(mensaje), Some(facultad), Some(programa)) = fields else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Faltan datos",
            }),
        ));
    };

    match promo::send_promo(&state, &numero, &mensaje, &facultad, &programa).await {
        Ok(sent) => Ok(Json(PromoResponse {
            status: "Mensaje y PDF enviados",
            brochure_enviado: sent.as_str(),
        })),
        Err(e) => {
            error!(numero = %numero, error = %e, "Promo delivery failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Error interno al enviar mensaje",
                }),
            ))
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Deserialize)]
struct WebhookRequest {
    from: String,
    body: String,
}

#[derive(Serialize)]
struct WebhookResponse {
    status: &'static str,
}

/// Inbound message from the bridge. Always acks so the bridge does not
/// retry; processing failures are logged.
async fn webhook_handler(
    State(state): State<SharedState>,
    Json(payload): Json<WebhookRequest>,
) -> Json<WebhookResponse> {
    if let Err(e) = state.engine.handle_message(&payload.from, &payload.body).await {
        error!(from = %payload.from, error = %e, "Inbound message processing failed");
    }
    Json(WebhookResponse { status: "ok" })
}
