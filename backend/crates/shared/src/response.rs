//! Success Envelope
//!
//! Every successful response body is `{ "success": true, "message", "data" }`.

use std::borrow::Cow;

use serde::Serialize;

/// Success envelope plus the bits that travel outside the body
/// (status code, cache status header).
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    message: Cow<'static, str>,
    data: T,
    #[serde(skip)]
    status: u16,
    #[serde(skip)]
    cache_hit: Option<bool>,
}

impl<T> ApiResponse<T> {
    /// 200 OK
    pub fn ok(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self::with_status(200, message, data)
    }

    /// 201 Created
    pub fn created(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self::with_status(201, message, data)
    }

    fn with_status(status: u16, message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            status,
            cache_hit: None,
        }
    }

    /// Report whether the payload came from the cache (`X-Cache: HIT|MISS`).
    pub fn cache_status(mut self, hit: bool) -> Self {
        self.cache_hit = Some(hit);
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Name of the cache status header.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode};

        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        let cache_hit = self.cache_hit;

        let mut response = (status, Json(self)).into_response();
        if let Some(hit) = cache_hit {
            response.headers_mut().insert(
                CACHE_STATUS_HEADER,
                HeaderValue::from_static(if hit { "HIT" } else { "MISS" }),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_shape() {
        let json = serde_json::to_value(ApiResponse::created(
            "Account created successfully",
            serde_json::json!({ "id": 1 }),
        ))
        .unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Account created successfully");
        assert_eq!(json["data"]["id"], 1);
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_null_data() {
        let json = serde_json::to_value(ApiResponse::created("Logged out", ())).unwrap();
        assert!(json["data"].is_null());
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_cache_header() {
        use axum::response::IntoResponse;

        let response = ApiResponse::ok("Users retrieved", 1).cache_status(true).into_response();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.headers()[CACHE_STATUS_HEADER], "HIT");

        let response = ApiResponse::ok("Users retrieved", 1).into_response();
        assert!(response.headers().get(CACHE_STATUS_HEADER).is_none());
    }
}
