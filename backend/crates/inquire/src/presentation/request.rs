//! Request Parameters & Validation
//!
//! Every endpoint reads a flat parameter set: the query string merged with
//! the body (urlencoded form or a flat JSON object). Body values win over
//! query values with the same name.
//!
//! A body that cannot be read is not reported by the extractor. It is held
//! until [`Endpoint::validate`] has accepted the method.

use std::collections::HashMap;
use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{Method, header};
use serde_json::Value;

use crate::error::{InquireError, InquireResult};

/// Method and flat parameters of one API call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    params: HashMap<String, String>,
    body_error: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, params: HashMap<String, String>) -> Self {
        Self {
            method,
            params,
            body_error: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Raw value; empty strings count as absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn str(&self, name: &str) -> InquireResult<&str> {
        self.get(name)
            .ok_or_else(|| InquireError::MissingParameter(name.to_string()))
    }

    pub fn f64(&self, name: &str) -> InquireResult<f64> {
        parse_finite(name, self.str(name)?)
    }

    pub fn optional_f64(&self, name: &str) -> InquireResult<Option<f64>> {
        self.get(name).map(|v| parse_finite(name, v)).transpose()
    }

    /// Negative counts read as zero and huge ones saturate.
    pub fn optional_count(&self, name: &str) -> InquireResult<Option<u32>> {
        self.get(name)
            .map(|v| {
                let n = v
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| InquireError::InvalidNumber(name.to_string()))?;
                Ok(u32::try_from(n.max(0)).unwrap_or(u32::MAX))
            })
            .transpose()
    }

    /// Identifier parameter. A value that cannot be an id names nothing, so
    /// it fails with `not_found`.
    pub fn id<T: FromStr>(&self, name: &str, not_found: InquireError) -> InquireResult<T> {
        self.str(name)?.trim().parse().map_err(|_| not_found)
    }
}

fn parse_finite(name: &str, value: &str) -> InquireResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| InquireError::InvalidNumber(name.to_string()))
}

fn parse_form(bytes: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(bytes).into_owned().collect()
}

fn parse_json(bytes: &[u8]) -> InquireResult<HashMap<String, String>> {
    let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(bytes) else {
        return Err(InquireError::InvalidInput(
            "Request body must be a JSON object.".to_string(),
        ));
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                // nested values are not parameters
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key, value))
        })
        .collect())
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.trim_start().starts_with("application/json"))
}

impl<S> FromRequest<S> for ApiRequest
where
    S: Send + Sync,
{
    type Rejection = InquireError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let method = req.method().clone();
        let mut params = req
            .uri()
            .query()
            .map(|q| parse_form(q.as_bytes()))
            .unwrap_or_default();
        let json = is_json(&req);

        let mut body_error = None;

        match Bytes::from_request(req, state).await {
            Ok(body) if body.is_empty() => {}
            Ok(body) if json => match parse_json(&body) {
                Ok(body_params) => params.extend(body_params),
                Err(e) => body_error = Some(e.to_string()),
            },
            Ok(body) => params.extend(parse_form(&body)),
            Err(rejection) => body_error = Some(rejection.body_text()),
        }

        Ok(Self {
            method,
            params,
            body_error,
        })
    }
}

// ============================================================================
// Endpoint
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
}

/// Expected method and required parameters of an endpoint
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    verb: Verb,
    required: &'static [&'static str],
}

impl Endpoint {
    pub const fn get(required: &'static [&'static str]) -> Self {
        Self {
            verb: Verb::Get,
            required,
        }
    }

    pub const fn post(required: &'static [&'static str]) -> Self {
        Self {
            verb: Verb::Post,
            required,
        }
    }

    fn accepts(&self, method: &Method) -> bool {
        match self.verb {
            Verb::Get => method == Method::GET,
            Verb::Post => method == Method::POST,
        }
    }

    /// Method first, then the body, then required parameters in
    /// declaration order.
    pub fn validate(&self, req: &ApiRequest) -> InquireResult<()> {
        if !self.accepts(req.method()) {
            return Err(InquireError::MethodNotAllowed(req.method().to_string()));
        }

        if let Some(reason) = &req.body_error {
            return Err(InquireError::InvalidInput(reason.clone()));
        }

        match self.required.iter().find(|name| req.get(name).is_none()) {
            Some(missing) => Err(InquireError::MissingParameter(missing.to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::question_id::QuestionId;

    fn request(method: Method, pairs: &[(&str, &str)]) -> ApiRequest {
        ApiRequest::new(
            method,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    const ASK: Endpoint = Endpoint::post(&["question", "latitude", "longitude", "pay_key"]);

    #[test]
    fn test_wrong_method_reported_first() {
        let err = ASK.validate(&request(Method::GET, &[])).unwrap_err();
        assert_eq!(err.to_string(), "GET requests are not allowed.");
    }

    #[test]
    fn test_unreadable_body_reported_after_method() {
        let mut req = request(Method::GET, &[]);
        req.body_error = Some("Request body must be a JSON object.".to_string());

        let err = ASK.validate(&req).unwrap_err();
        assert_eq!(err.to_string(), "GET requests are not allowed.");

        req.method = Method::POST;
        let err = ASK.validate(&req).unwrap_err();
        assert_eq!(err.to_string(), "Request body must be a JSON object.");
    }

    #[test]
    fn test_first_missing_parameter_in_order() {
        let req = request(Method::POST, &[("question", "Where?"), ("longitude", "1")]);
        let err = ASK.validate(&req).unwrap_err();
        assert_eq!(err.to_string(), "'latitude' is required.");
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let req = request(
            Method::POST,
            &[
                ("question", ""),
                ("latitude", "1"),
                ("longitude", "1"),
                ("pay_key", "k"),
            ],
        );
        let err = ASK.validate(&req).unwrap_err();
        assert_eq!(err.to_string(), "'question' is required.");
    }

    #[test]
    fn test_complete_request_passes() {
        let req = request(
            Method::POST,
            &[
                ("question", "Where?"),
                ("latitude", "1"),
                ("longitude", "1"),
                ("pay_key", "k"),
            ],
        );
        assert!(ASK.validate(&req).is_ok());
    }

    #[test]
    fn test_numbers() {
        let req = request(
            Method::GET,
            &[("latitude", " 37.5 "), ("longitude", "west"), ("max", "inf")],
        );
        assert_eq!(req.f64("latitude").unwrap(), 37.5);
        assert_eq!(
            req.f64("longitude").unwrap_err().to_string(),
            "'longitude' must be a number."
        );
        assert!(req.f64("max").is_err());
        assert_eq!(req.optional_f64("absent").unwrap(), None);
    }

    #[test]
    fn test_counts() {
        let req = request(
            Method::GET,
            &[("a", "10"), ("b", "-3"), ("c", "99999999999"), ("d", "ten")],
        );
        assert_eq!(req.optional_count("a").unwrap(), Some(10));
        assert_eq!(req.optional_count("b").unwrap(), Some(0));
        assert_eq!(req.optional_count("c").unwrap(), Some(u32::MAX));
        assert!(req.optional_count("d").is_err());
        assert_eq!(req.optional_count("e").unwrap(), None);
    }

    #[test]
    fn test_unparsable_id_is_not_found() {
        let req = request(Method::POST, &[("question_id", "42")]);
        let err = req
            .id::<QuestionId>("question_id", InquireError::QuestionNotFound)
            .unwrap_err();
        assert!(matches!(err, InquireError::QuestionNotFound));
    }

    #[test]
    fn test_json_body_flattening() {
        let params = parse_json(br#"{"latitude": 37.3, "question": "Hi", "tags": [1]}"#).unwrap();
        assert_eq!(params["latitude"], "37.3");
        assert_eq!(params["question"], "Hi");
        assert!(!params.contains_key("tags"));

        assert!(parse_json(b"[1, 2]").is_err());
    }

    #[test]
    fn test_form_body() {
        let params = parse_form(b"email=a%40b.com&password=p+w");
        assert_eq!(params["email"], "a@b.com");
        assert_eq!(params["password"], "p w");
    }
}
