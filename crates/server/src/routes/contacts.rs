use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use service::contact::domain::{Contact, ContactFields, ImageUpload};
use service::contact::service::CONTACT_NOT_FOUND;
use service::errors::ServiceError;
use tracing::debug;

use crate::errors::JsonApiError;
use crate::routes::{Ack, ServerState};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub contact_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfilePicture {
    pub picture: Option<String>,
}

fn multipart_error(e: MultipartError) -> JsonApiError {
    // 超出 body 上限时 multer 给出 413，其余按 400 处理
    JsonApiError::new(e.status(), "Invalid Multipart Body", Some(e.body_text()))
}

/// 非数字的 id 不可能匹配任何联系人，按 404 处理
fn parse_contact_id(raw: &str) -> Result<i32, JsonApiError> {
    raw.trim().parse::<i32>().map_err(|_| {
        debug!(contact_id = %raw, "non-numeric contact id");
        ServiceError::NotFound(CONTACT_NOT_FOUND.into()).into()
    })
}

/// 列出所有联系人
#[utoipa::path(get, path = "/contact", tag = "contact", responses((status = 200, description = "All contacts", body = [crate::openapi::ContactDoc]), (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Contact>>, JsonApiError> {
    Ok(Json(state.contacts.list().await?))
}

/// 新建联系人，multipart 表单，可附带 `image` 文件
#[utoipa::path(post, path = "/contact", tag = "contact", request_body(content = crate::openapi::CreateContactForm, content_type = "multipart/form-data"), responses((status = 201, description = "Created", body = crate::openapi::AckDoc), (status = 400, description = "Bad Request", body = crate::openapi::ErrorDoc), (status = 409, description = "Name taken", body = crate::openapi::ErrorDoc), (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)))]
pub async fn create(
    State(state): State<ServerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Ack>), JsonApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        JsonApiError::new(StatusCode::BAD_REQUEST, "Invalid Multipart Body", Some(rejection.body_text()))
    })?;
    let mut fields = ContactFields::default();
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "contact_name" => fields.contact_name = Some(field.text().await.map_err(multipart_error)?),
            "phone_number" => fields.phone_number = Some(field.text().await.map_err(multipart_error)?),
            "message" => fields.message = Some(field.text().await.map_err(multipart_error)?),
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                // 浏览器在未选择文件时仍会发送一个空文件名的 part
                if !file_name.is_empty() {
                    image = Some(ImageUpload { file_name, bytes: bytes.to_vec() });
                }
            }
            other => debug!(field = other, "ignoring unknown multipart field"),
        }
    }

    state.contacts.create(fields, image).await?;
    Ok((StatusCode::CREATED, Ack::new("Contact added successfully")))
}

#[utoipa::path(delete, path = "/contact/{id}", tag = "contact", params(("id" = String, Path, description = "Contact id")), responses((status = 200, description = "Deleted", body = crate::openapi::AckDoc), (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc), (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Ack>, JsonApiError> {
    let id = parse_contact_id(&id)?;
    state.contacts.delete(id).await?;
    Ok(Ack::new("Contact deleted successfully"))
}

#[utoipa::path(put, path = "/contact/{id}", tag = "contact", params(("id" = String, Path, description = "Contact id")), request_body = crate::openapi::UpdateContactDoc, responses((status = 200, description = "Updated", body = crate::openapi::AckDoc), (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc), (status = 409, description = "Name taken", body = crate::openapi::ErrorDoc), (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)))]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Result<Json<ContactFields>, JsonRejection>,
) -> Result<Json<Ack>, JsonApiError> {
    let id = parse_contact_id(&id)?;
    // 无法解析的 body 视为字段缺失，由存储层决定结果
    let fields = match body {
        Ok(Json(fields)) => fields,
        Err(rejection) => {
            debug!(err = %rejection.body_text(), "unreadable contact body");
            ContactFields::default()
        }
    };
    state.contacts.update(id, fields).await?;
    Ok(Ack::new("Contact updated successfully"))
}

/// 按名称片段模糊查询（不区分大小写）
#[utoipa::path(get, path = "/contact/name", tag = "contact", params(("contact_name" = String, Query, description = "Name fragment")), responses((status = 200, description = "Matches", body = [crate::openapi::ContactDoc]), (status = 400, description = "Missing contact_name", body = crate::openapi::ErrorDoc), (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)))]
pub async fn search_by_name(
    State(state): State<ServerState>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<Vec<Contact>>, JsonApiError> {
    let fragment = q.contact_name.unwrap_or_default();
    Ok(Json(state.contacts.search_by_name(&fragment).await?))
}

#[utoipa::path(get, path = "/contact/profile_picture/{contact_name}", tag = "contact", params(("contact_name" = String, Path, description = "Exact contact name")), responses((status = 200, description = "Image reference or null", body = crate::openapi::ProfilePictureDoc), (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc), (status = 500, description = "Store failure", body = crate::openapi::ErrorDoc)))]
pub async fn profile_picture(
    State(state): State<ServerState>,
    Path(contact_name): Path<String>,
) -> Result<Json<ProfilePicture>, JsonApiError> {
    let picture = state.contacts.profile_picture(&contact_name).await?;
    Ok(Json(ProfilePicture { picture }))
}
