use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use service::message::domain::Message;
use tracing::debug;

use crate::errors::JsonApiError;
use crate::routes::{Ack, ServerState};

/// `contactId` 既可以是数字也可以是数字字符串
#[derive(Debug, Default, Deserialize)]
pub struct AppendMessageRequest {
    #[serde(rename = "contactId", default)]
    pub contact_id: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AppendMessageRequest {
    /// Numeric id, or `None` when absent or not an integer.
    pub fn contact_id(&self) -> Option<i32> {
        match self.contact_id.as_ref()? {
            Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// 某联系人的消息，时间倒序
#[utoipa::path(get, path = "/contact/messages/{contactId}", tag = "message", params(("contactId" = String, Path, description = "Contact id")), responses((status = 200, description = "Messages, newest first", body = [crate::openapi::MessageDoc]), (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)))]
pub async fn list(
    State(state): State<ServerState>,
    Path(contact_id): Path<String>,
) -> Result<Json<Vec<Message>>, JsonApiError> {
    // 非数字的 id 不可能匹配任何消息
    let Ok(contact_id) = contact_id.trim().parse::<i32>() else {
        debug!(contact_id = %contact_id, "non-numeric contact id, no messages");
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.messages.list_for_contact(contact_id).await?))
}

/// 追加消息；任何写入失败都返回 409
#[utoipa::path(post, path = "/contact/messages", tag = "message", request_body = crate::openapi::AppendMessageDoc, responses((status = 201, description = "Created", body = crate::openapi::AckDoc), (status = 409, description = "Write rejected", body = crate::openapi::ErrorDoc), (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)))]
pub async fn append(
    State(state): State<ServerState>,
    body: Result<Json<AppendMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Ack>), JsonApiError> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            debug!(err = %rejection.body_text(), "unreadable message body");
            AppendMessageRequest::default()
        }
    };
    let contact_id = req.contact_id();
    state.messages.append(contact_id, req.message).await?;
    Ok((StatusCode::CREATED, Ack::new("Message added successfully")))
}
