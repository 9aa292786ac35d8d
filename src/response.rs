//! Interpretation of queue manager API replies.

use serde_json::Value;

/// Message reported when the transport returned no decodable body.
pub(crate) const NO_DATA: &str = "no data returned";

/// Outcome of a queue manager API call.
///
/// The API signals failure by including an `error` key in its JSON reply;
/// every other reply shape counts as success. Successful payloads are
/// passed through whole, since callers may need fields beyond a bare
/// success flag.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiOutcome {
    /// The call was accepted; carries the full reply payload
    Success(Value),
    /// The call failed; carries the server's message, or a generic
    /// message when no reply was received at all
    Failure(String),
}

impl ApiOutcome {
    /// Fold a decoded JSON reply into an outcome.
    ///
    /// Only the presence of an `error` key is inspected; the payload is
    /// otherwise treated opaquely.
    pub fn from_payload(payload: Value) -> Self {
        match payload.get("error") {
            Some(Value::String(message)) => {
                tracing::error!(error = %message, "queue manager reported an error");
                Self::Failure(message.clone())
            }
            Some(other) => {
                let message = other.to_string();
                tracing::error!(error = %message, "queue manager reported an error");
                Self::Failure(message)
            }
            None => Self::Success(payload),
        }
    }

    /// Whether the call was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(message),
        }
    }

    /// The successful reply payload, if any.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Success(payload) => Some(payload),
            Self::Failure(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_key_yields_failure_with_message() {
        let outcome = ApiOutcome::from_payload(json!({"error": "bad key"}));
        assert_eq!(outcome, ApiOutcome::Failure("bad key".to_string()));
        assert!(!outcome.is_success());
        assert_eq!(outcome.message(), Some("bad key"));
    }

    #[test]
    fn non_string_error_value_is_stringified() {
        let outcome = ApiOutcome::from_payload(json!({"error": {"code": 100}}));
        assert_eq!(
            outcome,
            ApiOutcome::Failure(r#"{"code":100}"#.to_string())
        );
    }

    #[test]
    fn payload_without_error_key_passes_through_whole() {
        let payload = json!({"status": true, "nzo_ids": ["SABnzbd_nzo_x1"]});
        let outcome = ApiOutcome::from_payload(payload.clone());
        assert_eq!(outcome, ApiOutcome::Success(payload.clone()));
        assert!(outcome.is_success());
        assert_eq!(outcome.payload(), Some(&payload));
        assert_eq!(outcome.message(), None);
    }
}
