use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;

/// Uniform success envelope; failures are rendered with the same shape by
/// `ApiError`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: u16,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn success<T: Serialize>(status: StatusCode, message: &str, data: T) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse {
        status: status.as_u16(),
        success: true,
        message: message.to_string(),
        data: Some(data),
    })
}

pub fn message_only(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::<()> {
        status: status.as_u16(),
        success: true,
        message: message.to_string(),
        data: None,
    })
}
