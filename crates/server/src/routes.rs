use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Json, Router,
};
use configs::StorageConfig;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::{
    auth::{repository::SeaOrmCredentialRepository, AuthCheckService},
    contact::{repository::SeaOrmContactRepository, ContactService},
    message::{repository::SeaOrmMessageRepository, MessageService},
    storage::blob_store::BlobStore,
};

use crate::openapi;

pub mod auth;
pub mod contacts;
pub mod messages;

/// 所有 handler 共享的状态
#[derive(Clone)]
pub struct ServerState {
    pub contacts: Arc<ContactService>,
    pub messages: Arc<MessageService>,
    pub auth: Arc<AuthCheckService>,
}

impl ServerState {
    /// Wire the SeaORM-backed repositories onto one connection pool.
    pub fn new(db: DatabaseConnection, blobs: Arc<dyn BlobStore>) -> Self {
        let contacts = ContactService::new(Arc::new(SeaOrmContactRepository { db: db.clone() }), blobs);
        let messages = MessageService::new(Arc::new(SeaOrmMessageRepository { db: db.clone() }));
        let auth = AuthCheckService::new(Arc::new(SeaOrmCredentialRepository { db }));
        Self {
            contacts: Arc::new(contacts),
            messages: Arc::new(messages),
            auth: Arc::new(auth),
        }
    }
}

/// Plain acknowledgement body, e.g. `{"message": "Contact deleted successfully"}`
#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: &'static str,
}

impl Ack {
    pub fn new(message: &'static str) -> Json<Self> { Json(Self { message }) }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: contact API, uploaded files, static front-end
pub fn build_router(state: ServerState, storage: &StorageConfig, cors: CorsLayer) -> Router {
    // 静态路由段优先于 `:id`，因此 /contact/name 等不会被当作 id
    let api = Router::new()
        .route("/contact", get(contacts::list).post(contacts::create))
        .route("/contact/name", get(contacts::search_by_name))
        .route("/contact/login", post(auth::login))
        .route("/contact/messages", post(messages::append))
        .route("/contact/messages/:contact_id", get(messages::list))
        .route("/contact/profile_picture/:contact_name", get(contacts::profile_picture))
        .route("/contact/:id", put(contacts::update).delete(contacts::delete))
        .layer(DefaultBodyLimit::max(storage.max_upload_bytes))
        .with_state(state);

    let meta = Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi::openapi_json));

    // 上传文件通过 url_prefix 暴露，其余未命中路由交给前端静态目录
    let uploads = ServeDir::new(&storage.upload_dir);
    let public = ServeDir::new(&storage.public_dir);

    api.merge(meta)
        .nest_service(&storage.url_prefix, uploads)
        .fallback_service(public)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
