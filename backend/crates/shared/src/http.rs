//! Axum extractors that reject with the failure envelope instead of axum's
//! plain-text rejections.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Json, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::app_error::AppError;
use crate::id::Id;
use crate::pagination::{PageQuery, PageRequest};

/// JSON body; malformed or mistyped input becomes `400 BAD_REQUEST`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request("Expected a JSON body")
                .with_action("Send the request with Content-Type: application/json")
        }
        other => AppError::bad_request(other.body_text()),
    }
}

/// Single `{id}` path segment parsed into a typed id.
pub struct PathId<T>(pub Id<T>);

impl<T, S> FromRequestParts<S> for PathId<T>
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(uuid) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| {
                AppError::bad_request("Invalid id in path").with_source(e)
            })?;
        Ok(Self(Id::from_uuid(uuid)))
    }
}

impl<S> FromRequestParts<S> for PageRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| {
                AppError::bad_request("Invalid pagination parameters").with_source(e)
            })?;
        PageRequest::try_from(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn json_request(body: &'static str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_body_accepts_valid_payload() {
        let JsonBody(payload) = JsonBody::<Payload>::from_request(json_request(r#"{"name":"ada"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.name, "ada");
    }

    #[tokio::test]
    async fn test_json_body_rejects_with_bad_request() {
        let err = JsonBody::<Payload>::from_request(json_request(r#"{"name":42}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_page_request_from_query() {
        let (mut parts, _) = HttpRequest::builder()
            .uri("/user?limit=2")
            .body(())
            .unwrap()
            .into_parts();
        let page = PageRequest::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(page.limit(), 2);
        assert_eq!(page.cursor(), None);

        let (mut parts, _) = HttpRequest::builder()
            .uri("/user?limit=500")
            .body(())
            .unwrap()
            .into_parts();
        let err = PageRequest::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}
