/* packages/adapter/axum/src/error.rs */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pages_tree::TreeError;

/// Orphan-rule wrapper so handlers can return `TreeError` directly.
pub(crate) struct AxumError(pub TreeError);

impl IntoResponse for AxumError {
  fn into_response(self) -> Response {
    let err = self.0;
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::json!({
      "ok": false,
      "error": {
        "code": err.code(),
        "message": err.message(),
      }
    });
    (status, axum::Json(body)).into_response()
  }
}

impl From<TreeError> for AxumError {
  fn from(err: TreeError) -> Self {
    Self(err)
  }
}

#[cfg(test)]
mod tests {
  use http_body_util::BodyExt;
  use pages_tree::errors::ErrorKind;

  use super::*;

  #[tokio::test]
  async fn renders_error_envelope() {
    let err = TreeError::new(ErrorKind::Parse, "bad artifact");
    let resp = AxumError::from(err).into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"]["code"], "PARSE_ERROR");
    assert_eq!(json["error"]["message"], "bad artifact");
  }
}
