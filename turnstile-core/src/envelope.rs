//! # Response Envelope
//!
//! Normalizes heterogeneous stage return values into the canonical response
//! shape `{ success, code, message, ..extra }`.
//!
//! Two entry points, [`ok`] and [`ko`], funnel into one [`normalize`]
//! routine. The permissive value coercion (number becomes the status code, a
//! string becomes the message, a map is treated as a partial envelope) is
//! modeled as the [`Payload`] union instead of runtime type inspection.
//!
//! # Rules
//!
//! - `code` defaults to 200 (`ok`) or 500 (`ko`) when the payload and the
//!   overrides supply none.
//! - An explicit status already set on the dialog wins over a caller-supplied
//!   code.
//! - `message` defaults to the canonical reason phrase for `code`.
//! - `success` is always recomputed as `code < 400`, never trusted from
//!   caller input.

use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};

/// Status applied by [`ok`] when nothing supplies a code.
pub const DEFAULT_OK_STATUS: u16 = 200;

/// Status applied by [`ko`] when nothing supplies a code.
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Envelopes with a code below this threshold are successes.
pub const SUCCESS_WHEN_STATUS_LT: u16 = 400;

/// A stage return value on its way into an envelope.
///
/// The union replaces duck typing: a bare number is a status code, a bare
/// string is a message, and a map is a partial envelope to be shallow-merged.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A bare status code.
    Code(u16),
    /// A bare message.
    Text(String),
    /// A partial envelope; `code`/`message` keys are extracted, `success`
    /// is discarded, everything else becomes an extra field.
    Fields(Map<String, Value>),
}

impl From<u16> for Payload {
    fn from(code: u16) -> Self {
        Payload::Code(code)
    }
}

impl From<StatusCode> for Payload {
    fn from(status: StatusCode) -> Self {
        Payload::Code(status.as_u16())
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_owned())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(fields: Map<String, Value>) -> Self {
        Payload::Fields(fields)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(number) => match number.as_u64().and_then(|n| u16::try_from(n).ok()) {
                Some(code) => Payload::Code(code),
                None => Payload::Fields(wrap_data(Value::Number(number))),
            },
            Value::String(text) => Payload::Text(text),
            Value::Object(fields) => Payload::Fields(fields),
            Value::Null => Payload::Fields(Map::new()),
            other => Payload::Fields(wrap_data(other)),
        }
    }
}

// Values with no envelope shape of their own land under a `data` field.
fn wrap_data(value: Value) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("data".to_owned(), value);
    fields
}

/// The canonical response shape returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    /// Whether the response is a success (`code < 400`).
    pub success: bool,
    /// The response status code.
    pub code: u16,
    /// The response message; the canonical reason phrase unless overridden.
    pub message: Option<String>,
    /// Extra fields carried alongside the canonical triple.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Serialize into a JSON value, canonical keys first.
    pub fn to_value(&self) -> Value {
        let mut fields = Map::new();
        fields.insert("success".to_owned(), Value::Bool(self.success));
        fields.insert("code".to_owned(), Value::from(self.code));
        fields.insert(
            "message".to_owned(),
            self.message.clone().map_or(Value::Null, Value::String),
        );
        fields.extend(self.extra.clone());
        Value::Object(fields)
    }
}

/// Normalize a payload into an envelope.
///
/// Later arguments win: the payload's own `code`/`message` fields are
/// overridden by `message` and `extra`, and `extra` may itself carry a
/// `code` or `message`. `explicit_status`, when present, wins over all of
/// them. The `default_code` applies only when nothing else supplies one.
pub fn normalize(
    payload: Payload,
    message: Option<String>,
    extra: Option<Map<String, Value>>,
    default_code: u16,
    explicit_status: Option<u16>,
) -> Envelope {
    let mut code: Option<u16> = None;
    let mut resolved_message: Option<String> = None;
    let mut fields = Map::new();

    match payload {
        Payload::Code(c) if c != 0 => code = Some(c),
        Payload::Code(_) => {}
        Payload::Text(text) => resolved_message = Some(text),
        Payload::Fields(map) => absorb(map, &mut code, &mut resolved_message, &mut fields),
    }

    if let Some(text) = message {
        resolved_message = Some(text);
    }
    if let Some(map) = extra {
        absorb(map, &mut code, &mut resolved_message, &mut fields);
    }

    let mut code = code.unwrap_or(default_code);
    if let Some(status) = explicit_status {
        code = status;
    }

    let message = resolved_message.or_else(|| reason_phrase(code));

    Envelope {
        success: code < SUCCESS_WHEN_STATUS_LT,
        code,
        message,
        extra: fields,
    }
}

// Pull the canonical keys out of a partial-envelope map; the rest are extra
// fields. Later absorptions win over earlier ones.
fn absorb(
    map: Map<String, Value>,
    code: &mut Option<u16>,
    message: &mut Option<String>,
    fields: &mut Map<String, Value>,
) {
    for (key, value) in map {
        match key.as_str() {
            // 0 is not a real status; treat it as unset.
            "code" => {
                if let Some(parsed) = value.as_u64().and_then(|n| u16::try_from(n).ok()) {
                    if parsed != 0 {
                        *code = Some(parsed);
                    }
                }
            }
            "message" => {
                if let Some(text) = value.as_str() {
                    *message = Some(text.to_owned());
                }
            }
            // Recomputed by `normalize`, never trusted from caller input.
            "success" => {}
            _ => {
                fields.insert(key, value);
            }
        }
    }
}

/// The canonical reason phrase for a status code, if one is defined.
pub fn reason_phrase(code: u16) -> Option<String> {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map(str::to_owned)
}

/// Build a success envelope. The code defaults to 200.
pub fn ok(payload: impl Into<Payload>) -> Envelope {
    normalize(payload.into(), None, None, DEFAULT_OK_STATUS, None)
}

/// Build a success envelope with message and extra-field overrides.
pub fn ok_with(
    payload: impl Into<Payload>,
    message: Option<&str>,
    extra: Option<Map<String, Value>>,
) -> Envelope {
    normalize(
        payload.into(),
        message.map(str::to_owned),
        extra,
        DEFAULT_OK_STATUS,
        None,
    )
}

/// Build a failure envelope. The code defaults to 500.
pub fn ko(payload: impl Into<Payload>) -> Envelope {
    normalize(payload.into(), None, None, DEFAULT_ERROR_STATUS, None)
}

/// Build a failure envelope with message and extra-field overrides.
pub fn ko_with(
    payload: impl Into<Payload>,
    message: Option<&str>,
    extra: Option<Map<String, Value>>,
) -> Envelope {
    normalize(
        payload.into(),
        message.map(str::to_owned),
        extra,
        DEFAULT_ERROR_STATUS,
        None,
    )
}

/// Build an envelope with a bound status code.
///
/// The payload fills the message (text) or extra-field (map) position, the
/// way the named shorthands consume their argument.
pub fn respond(code: u16, payload: impl Into<Payload>) -> Envelope {
    let default_code = if code < SUCCESS_WHEN_STATUS_LT {
        DEFAULT_OK_STATUS
    } else {
        DEFAULT_ERROR_STATUS
    };
    let (message, extra) = match payload.into() {
        Payload::Text(text) => (Some(text), None),
        Payload::Fields(map) => (None, Some(map)),
        Payload::Code(_) => (None, None),
    };
    normalize(Payload::Code(code), message, extra, default_code, None)
}

/// Read-only table of shorthand names to their bound status codes.
///
/// Built once at process initialization; the names are the camel-cased
/// canonical reason phrases of the well-known codes.
pub static SHORTHANDS: phf::Map<&'static str, u16> = phf::phf_map! {
    "created" => 201,
    "accepted" => 202,
    "noContent" => 204,
    "badRequest" => 400,
    "unauthorized" => 401,
    "paymentRequired" => 402,
    "forbidden" => 403,
    "notFound" => 404,
    "methodNotAllowed" => 405,
    "notAcceptable" => 406,
    "requestTimeout" => 408,
    "conflict" => 409,
    "unprocessableEntity" => 422,
    "internalServerError" => 500,
    "notImplemented" => 501,
    "serviceUnavailable" => 503,
};

/// Look up a shorthand by name and build its envelope.
pub fn shorthand(name: &str, payload: impl Into<Payload>) -> Option<Envelope> {
    SHORTHANDS.get(name).map(|&code| respond(code, payload))
}

macro_rules! shorthand_responses {
    ($($(#[$doc:meta])* $name:ident => $code:expr;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(payload: impl Into<Payload>) -> Envelope {
                respond($code, payload)
            }
        )*
    };
}

shorthand_responses! {
    /// 201 Created.
    created => 201;
    /// 202 Accepted.
    accepted => 202;
    /// 204 No Content.
    no_content => 204;
    /// 400 Bad Request.
    bad_request => 400;
    /// 401 Unauthorized.
    unauthorized => 401;
    /// 402 Payment Required.
    payment_required => 402;
    /// 403 Forbidden.
    forbidden => 403;
    /// 404 Not Found.
    not_found => 404;
    /// 405 Method Not Allowed.
    method_not_allowed => 405;
    /// 406 Not Acceptable.
    not_acceptable => 406;
    /// 408 Request Timeout.
    request_timeout => 408;
    /// 409 Conflict.
    conflict => 409;
    /// 422 Unprocessable Entity.
    unprocessable_entity => 422;
    /// 500 Internal Server Error.
    internal_server_error => 500;
    /// 501 Not Implemented.
    not_implemented => 501;
    /// 503 Service Unavailable.
    service_unavailable => 503;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_defaults() {
        let envelope = ok(Map::new());
        assert!(envelope.success);
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.message.as_deref(), Some("OK"));
        assert!(envelope.extra.is_empty());
    }

    #[test]
    fn test_ko_defaults() {
        let envelope = ko(Map::new());
        assert!(!envelope.success);
        assert_eq!(envelope.code, 500);
        assert_eq!(envelope.message.as_deref(), Some("Internal Server Error"));
    }

    #[test]
    fn test_number_payload_becomes_code() {
        assert_eq!(ok(404u16).code, 404);
        assert_eq!(ko(404u16).code, 404);
        assert!(!ok(404u16).success);
    }

    #[test]
    fn test_text_payload_becomes_message() {
        let envelope = ok("all good");
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.message.as_deref(), Some("all good"));
    }

    #[test]
    fn test_partial_envelope_merge() {
        let payload = json!({"code": 201, "name": "x"});
        let Payload::Fields(_) = Payload::from(payload.clone()) else {
            panic!("object payload must become fields");
        };
        let envelope = ok(Payload::from(payload));
        assert_eq!(envelope.code, 201);
        assert_eq!(envelope.message.as_deref(), Some("Created"));
        assert_eq!(envelope.extra.get("name"), Some(&json!("x")));
    }

    #[test]
    fn test_overrides_win_in_order() {
        let mut extra = Map::new();
        extra.insert("code".to_owned(), json!(503));
        let envelope = ok_with(200u16, Some("first"), Some(extra));
        assert_eq!(envelope.code, 503);
        assert_eq!(envelope.message.as_deref(), Some("first"));
    }

    #[test]
    fn test_success_is_recomputed() {
        let payload = json!({"success": true, "code": 500});
        let envelope = ok(Payload::from(payload));
        assert!(!envelope.success);
        assert!(envelope.extra.get("success").is_none());
    }

    #[test]
    fn test_shorthand_table() {
        assert_eq!(SHORTHANDS.get("notFound"), Some(&404));
        let envelope = shorthand("notFound", "record missing").expect("known shorthand");
        assert_eq!(envelope.code, 404);
        assert_eq!(envelope.message.as_deref(), Some("record missing"));
        assert!(shorthand("teapot", 0u16).is_none());
    }

    #[test]
    fn test_named_shorthands() {
        assert_eq!(not_found(Map::new()).code, 404);
        assert_eq!(created(Map::new()).code, 201);
        assert!(created(Map::new()).success);
    }

    #[test]
    fn test_to_value_flattens_extra() {
        let payload = json!({"id": 7, "name": "x"});
        let value = ok(Payload::from(payload)).to_value();
        assert_eq!(
            value,
            json!({"success": true, "code": 200, "message": "OK", "id": 7, "name": "x"})
        );
    }
}
