//! Query string extractor that accepts repeated keys.

use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::Query;
use serde::de::DeserializeOwned;

/// Query extractor that collects repeated keys (`?uris=/a&uris=/b`) into a `Vec`.
///
/// Wraps `axum_extra::extract::Query`, which parses with `serde_html_form`.
/// Rejections become [`AppError::QueryRejection`].
pub struct MultiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for MultiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::QueryRejection(e.to_string()))?;

        Ok(MultiQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Params {
        start: String,
        #[serde(default)]
        uris: Vec<String>,
    }

    async fn handler(MultiQuery(params): MultiQuery<Params>) -> String {
        format!("{}|{}", params.start, params.uris.join(","))
    }

    async fn call(uri: &str) -> (StatusCode, String) {
        let app = Router::new().route("/", get(handler));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_repeated_keys_collect_into_vec() {
        let (status, body) = call("/?start=a&uris=%2Fevents%2F1&uris=%2Fevents%2F2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "a|/events/1,/events/2");
    }

    #[tokio::test]
    async fn test_absent_list_defaults_to_empty() {
        let (status, body) = call("/?start=a").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "a|");
    }

    #[tokio::test]
    async fn test_missing_required_key_is_bad_request() {
        let (status, body) = call("/?uris=%2Fevents%2F1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("INVALID_QUERY"));
    }
}
