//! Response Envelope
//!
//! Every API response body is a flat JSON object:
//! `{"success": bool, "msg": string, ...extra}`.
//! Extra fields are merged at the top level next to `success` and `msg`.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::{Map, Value};

/// Message used when a call succeeds and nothing more specific is said.
pub const DEFAULT_MESSAGE: &str = "OK";

/// Uniform JSON envelope
///
/// ## Examples
/// ```rust
/// use kernel::envelope::Envelope;
///
/// let body = Envelope::ok().with("karma", 3).unwrap();
/// let json = serde_json::to_value(&body).unwrap();
/// assert_eq!(json["success"], true);
/// assert_eq!(json["msg"], "OK");
/// assert_eq!(json["karma"], 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    success: bool,
    msg: Cow<'static, str>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Envelope {
    /// Successful envelope with the default message
    pub fn ok() -> Self {
        Self {
            success: true,
            msg: Cow::Borrowed(DEFAULT_MESSAGE),
            extra: Map::new(),
        }
    }

    /// Failed envelope carrying a user-facing message
    pub fn failure(msg: impl Into<Cow<'static, str>>) -> Self {
        Self {
            success: false,
            msg: msg.into(),
            extra: Map::new(),
        }
    }

    /// Replace the message
    pub fn with_message(mut self, msg: impl Into<Cow<'static, str>>) -> Self {
        self.msg = msg.into();
        self
    }

    /// Attach an extra top-level field
    ///
    /// `success` and `msg` are reserved and cannot be overwritten.
    pub fn with<T: Serialize>(mut self, key: &str, value: T) -> Result<Self, serde_json::Error> {
        if key == "success" || key == "msg" {
            return Ok(self);
        }
        self.extra.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Look up an extra field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

#[cfg(feature = "axum")]
impl Envelope {
    /// Render with an explicit HTTP status
    pub fn into_response_with_status(self, status: http::StatusCode) -> axum::response::Response {
        use axum::response::IntoResponse;

        (status, axum::Json(self)).into_response()
    }
}

// Rule violations travel as `success: false` under 200, so the default is OK.
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for Envelope {
    fn into_response(self) -> axum::response::Response {
        self.into_response_with_status(http::StatusCode::OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_shape() {
        let json = serde_json::to_value(Envelope::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "msg": "OK"}));
    }

    #[test]
    fn test_failure_shape() {
        let json = serde_json::to_value(Envelope::failure("Unauthorized")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "msg": "Unauthorized"})
        );
    }

    #[test]
    fn test_extra_fields_are_flattened() {
        let env = Envelope::ok()
            .with_message("User has been logged out.")
            .with("answers", vec![1, 2, 3])
            .unwrap();
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["msg"], "User has been logged out.");
        assert_eq!(json["answers"], serde_json::json!([1, 2, 3]));
        assert_eq!(env.get("answers"), Some(&serde_json::json!([1, 2, 3])));
    }

    #[test]
    fn test_reserved_keys_are_ignored() {
        let env = Envelope::failure("nope").with("success", true).unwrap();
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(env.message(), "nope");
        assert!(env.get("success").is_none());
    }
}
