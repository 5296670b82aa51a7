use serde::{Deserialize, Serialize};

/// An outbound HTTP request the resolver completed during an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchRequest {
  /// Milliseconds since the unix epoch, taken once the response arrived.
  pub logged_at: u64,
  pub url: String,
  pub method: String,
  pub status_code: u16,
  /// Round trip in milliseconds, excluding body capture.
  pub duration: u64,
  /// MIME essence of the response `content-type`, parameters stripped.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub content_type: Option<String>,
  /// Response body text; only captured for json, plain text and html.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub body: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_optional_fields_are_omitted() {
    let request = FetchRequest {
      logged_at: 10,
      url: "https://example.com/image.png".to_string(),
      method: "GET".to_string(),
      status_code: 200,
      duration: 4,
      content_type: Some("image/png".to_string()),
      body: None,
    };

    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["contentType"], "image/png");
    assert!(json.get("body").is_none());
  }

  #[test]
  fn test_accepts_null_body() {
    let request: FetchRequest = serde_json::from_value(serde_json::json!({
      "loggedAt": 1,
      "url": "https://example.com",
      "method": "POST",
      "statusCode": 201,
      "duration": 0,
      "body": null,
    }))
    .unwrap();

    assert_eq!(request.body, None);
    assert_eq!(request.content_type, None);
  }
}
