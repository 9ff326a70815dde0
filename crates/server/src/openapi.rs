use axum::Json;
use serde::Deserialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ContactDoc {
    pub id: i32,
    pub contact_name: String,
    pub phone_number: String,
    pub message: String,
    pub image_url: Option<String>,
}

/// multipart/form-data 表单
#[derive(ToSchema)]
pub struct CreateContactForm {
    pub contact_name: String,
    pub phone_number: String,
    pub message: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[derive(ToSchema)]
pub struct UpdateContactDoc {
    pub contact_name: Option<String>,
    pub phone_number: Option<String>,
    pub message: Option<String>,
}

#[derive(ToSchema)]
pub struct MessageDoc {
    pub id: i32,
    pub contact_id: i32,
    pub message: String,
    pub message_timestamp: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AppendMessageDoc {
    /// 数字或数字字符串
    #[serde(rename = "contactId")]
    pub contact_id: i32,
    pub message: String,
}

#[derive(ToSchema)]
pub struct LoginRequest { pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct RoleDoc { pub role: String }

#[derive(ToSchema)]
pub struct ProfilePictureDoc { pub picture: Option<String> }

#[derive(ToSchema)]
pub struct AckDoc { pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String, pub title: String, pub code: Option<u16> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::contacts::list,
        crate::routes::contacts::create,
        crate::routes::contacts::update,
        crate::routes::contacts::delete,
        crate::routes::contacts::search_by_name,
        crate::routes::contacts::profile_picture,
        crate::routes::messages::list,
        crate::routes::messages::append,
        crate::routes::auth::login,
    ),
    components(
        schemas(
            HealthResponse,
            ContactDoc,
            CreateContactForm,
            UpdateContactDoc,
            MessageDoc,
            AppendMessageDoc,
            LoginRequest,
            RoleDoc,
            ProfilePictureDoc,
            AckDoc,
            ErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "contact"),
        (name = "message"),
        (name = "auth")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
