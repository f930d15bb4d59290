use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// JSON body extractor whose rejections are reported as `400 {error}`
/// instead of axum's plain-text 415/422 responses.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Deserialize a field that distinguishes "absent" from "null".
/// Use together with `#[serde(default)]`: absent -> `None`, `null` -> `Some(None)`.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Returns the value if it is present and not blank
pub fn validate_required<'a>(value: &'a Option<String>) -> Option<&'a str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Serialize)]
pub struct FallbackResponse {
    error: &'static str,
}

/// Handler for unmatched routes
pub async fn fallback() -> (StatusCode, Json<FallbackResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(FallbackResponse { error: "Not found" }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        name: Option<Option<String>>,
    }

    #[test]
    fn test_double_option() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.name, None);

        let null: Patch = serde_json::from_str(r#"{"name": null}"#).unwrap();
        assert_eq!(null.name, Some(None));

        let value: Patch = serde_json::from_str(r#"{"name": "QA"}"#).unwrap();
        assert_eq!(value.name, Some(Some("QA".to_string())));
    }

    #[test]
    fn test_validate_required() {
        assert_eq!(validate_required(&Some("10.0.0.1".into())), Some("10.0.0.1"));
        assert_eq!(validate_required(&Some("   ".into())), None);
        assert_eq!(validate_required(&None), None);
    }
}
