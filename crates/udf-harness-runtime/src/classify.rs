use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use udf_harness_fetch::ContentKind;
use udf_harness_protocol::{GraphQlErrorPayload, InvokeResult};

use crate::resolver::ResolverOutput;
use crate::thrown::{GraphQlError, Thrown};

const NULLISH_MESSAGE: &str = "nullish value thrown";

/// Turn a resolver output into the JSON value reported as `Success`.
///
/// Responses are decoded by content type: json is parsed, plain text and
/// html become strings, and anything else is base64 encoded. A json body
/// that fails to parse counts as a throw.
pub fn normalize_output(output: ResolverOutput) -> Result<Value, Thrown> {
  match output {
    ResolverOutput::Value(value) => Ok(value),
    ResolverOutput::Response(response) => {
      let kind = ContentKind::from_headers(response.headers());
      let body = response.into_body();

      match kind {
        ContentKind::Json => Ok(serde_json::from_slice(&body)?),
        ContentKind::Text | ContentKind::Html => {
          Ok(Value::String(String::from_utf8_lossy(&body).into_owned()))
        }
        ContentKind::Other => Ok(Value::String(STANDARD.encode(&body))),
      }
    }
  }
}

/// Classify a thrown value.
pub fn classify(thrown: Thrown) -> InvokeResult {
  match thrown {
    Thrown::Value(Value::Null) => InvokeResult::Error(NULLISH_MESSAGE.to_string()),
    Thrown::Error(error) => match error.downcast::<GraphQlError>() {
      Ok(graphql) => {
        let GraphQlError {
          message,
          extensions,
        } = *graphql;
        InvokeResult::GraphQlError(GraphQlErrorPayload {
          message,
          extensions,
        })
      }
      Err(error) => InvokeResult::Error(error.to_string()),
    },
    other => InvokeResult::Error(other.to_string()),
  }
}
