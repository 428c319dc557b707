/// Response envelopes shared by every route
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct SuccessBody<T: Serialize> {
    success: bool,
    #[serde(flatten)]
    data: T,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// 200 with `{success: true, ..data}`
pub fn success_response<T: Serialize>(data: T) -> Response {
    Json(SuccessBody {
        success: true,
        data,
    })
    .into_response()
}

/// `{success: false, error, code}` with the given status
pub fn error_response(
    status: StatusCode,
    code: &str,
    message: &str,
    details: Option<Value>,
) -> Response {
    let body = ErrorBody {
        success: false,
        error: message,
        code,
        details,
    };
    (status, Json(body)).into_response()
}
