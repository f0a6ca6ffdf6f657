use std::collections::HashMap;
use std::sync::OnceLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use prost::Message;
use regex::Regex;
use serde_json::{Map, Value};

use crate::schema::{ActionRequest, ActionResponse, ActionType};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Empty request payload.")]
    EmptyPayload,
    #[error("Failed to decode request: {}", .failures.join("; "))]
    Undecodable {
        /// Whatever correlation id could be recovered, possibly empty
        request_id: String,
        failures: Vec<String>,
    },
}

impl DecodeError {
    pub fn request_id(&self) -> &str {
        match self {
            DecodeError::EmptyPayload => "",
            DecodeError::Undecodable { request_id, .. } => request_id,
        }
    }
}

/// One way of turning the unwrapped envelope bytes into a request
pub trait DecodeStrategy {
    fn name(&self) -> &'static str;
    fn decode(&self, bytes: &[u8]) -> Result<ActionRequest, String>;
}

/// The schema-coded (protobuf) form
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaDecoder;

impl DecodeStrategy for SchemaDecoder {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn decode(&self, bytes: &[u8]) -> Result<ActionRequest, String> {
        let request = ActionRequest::decode(bytes).map_err(|e| e.to_string())?;
        // Unknown fields are skipped, so arbitrary text can decode to nothing
        if request == ActionRequest::default() {
            return Err("message carries no known fields".to_string());
        }
        Ok(request)
    }
}

/// JSON object or `key=value` lines, with camelCase or snake_case keys
#[derive(Debug, Default, Clone, Copy)]
pub struct LooseTextDecoder;

impl DecodeStrategy for LooseTextDecoder {
    fn name(&self) -> &'static str {
        "loose text"
    }

    fn decode(&self, bytes: &[u8]) -> Result<ActionRequest, String> {
        let text = std::str::from_utf8(bytes).map_err(|e| format!("not UTF-8: {e}"))?;
        let text = text.trim();
        if text.starts_with('{') {
            let value: Value = serde_json::from_str(text).map_err(|e| format!("JSON: {e}"))?;
            match value {
                Value::Object(object) => decode_json_object(&object),
                _ => Err("JSON payload is not an object".to_string()),
            }
        } else {
            decode_key_values(text)
        }
    }
}

fn json_field<'a>(object: &'a Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    object.get(camel).or_else(|| object.get(snake))
}

fn json_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn parse_action_type(value: &str) -> Result<i32, String> {
    let value = value.trim();
    if let Ok(ordinal) = value.parse::<i32>() {
        return Ok(ordinal);
    }
    ActionType::from_str_name(&value.to_ascii_uppercase())
        .map(|action| action as i32)
        .ok_or_else(|| format!("unknown action type name '{value}'"))
}

fn decode_json_object(object: &Map<String, Value>) -> Result<ActionRequest, String> {
    let action_type = match json_field(object, "actionType", "action_type") {
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| format!("action type {n} is not an integer"))?,
        Some(Value::String(s)) => parse_action_type(s)?,
        Some(other) => return Err(format!("action type has unexpected value {other}")),
        None => return Err("missing actionType".to_string()),
    };

    let mut parameters = HashMap::new();
    match object.get("parameters") {
        Some(Value::Object(params)) => {
            for (name, value) in params {
                if !value.is_null() {
                    parameters.insert(name.clone(), json_to_text(value));
                }
            }
        }
        Some(Value::Null) | None => {}
        Some(other) => return Err(format!("parameters has unexpected value {other}")),
    }

    Ok(ActionRequest {
        request_id: json_field(object, "requestId", "request_id")
            .map(json_to_text)
            .unwrap_or_default(),
        action_type,
        target_element_id: json_field(object, "targetElementId", "target_element_id")
            .map(json_to_text)
            .unwrap_or_default(),
        parameters,
    })
}

fn decode_key_values(text: &str) -> Result<ActionRequest, String> {
    let mut request = ActionRequest::default();
    let mut action_type = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| format!("line '{line}' is not key=value"))?;
        let (key, value) = (key.trim(), value.trim());

        if let Some(name) = key.strip_prefix("parameters.") {
            request.parameters.insert(name.to_string(), value.to_string());
            continue;
        }
        match key {
            "requestId" | "request_id" => request.request_id = value.to_string(),
            "actionType" | "action_type" => action_type = Some(parse_action_type(value)?),
            "targetElementId" | "target_element_id" => {
                request.target_element_id = value.to_string()
            }
            other => log::debug!("Ignoring unknown key '{other}' in text request"),
        }
    }

    request.action_type = action_type.ok_or("missing actionType")?;
    Ok(request)
}

/// Best-effort correlation id from a payload no strategy could decode
fn recover_request_id(bytes: &[u8]) -> String {
    static REQUEST_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = REQUEST_ID_REGEX.get_or_init(|| {
        Regex::new(r#"(?:requestId|request_id)["']?\s*[:=]\s*["']?([A-Za-z0-9_.:\-]+)"#)
            .expect("Invalid request id regex")
    });

    let text = String::from_utf8_lossy(bytes);
    regex
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Base64 envelope around a schema-coded message.
///
/// Decoding tries each strategy in order and the first success wins. When
/// every strategy fails, their errors are joined into one [`DecodeError`].
pub struct EnvelopeCodec {
    strategies: Vec<Box<dyn DecodeStrategy>>,
}

impl Default for EnvelopeCodec {
    fn default() -> Self {
        Self::with_strategies(vec![Box::new(SchemaDecoder), Box::new(LooseTextDecoder)])
    }
}

impl EnvelopeCodec {
    pub fn with_strategies(strategies: Vec<Box<dyn DecodeStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn decode(&self, raw: &str) -> Result<ActionRequest, DecodeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DecodeError::EmptyPayload);
        }
        let bytes = unwrap_envelope(raw);

        let mut failures = Vec::new();
        for (attempt, strategy) in self.strategies.iter().enumerate() {
            match strategy.decode(&bytes) {
                Ok(request) => {
                    if attempt > 0 {
                        log::warn!(
                            "Request '{}' decoded by fallback strategy '{}'",
                            request.request_id,
                            strategy.name()
                        );
                    }
                    return Ok(request);
                }
                Err(reason) => failures.push(format!("{}: {reason}", strategy.name())),
            }
        }

        Err(DecodeError::Undecodable {
            request_id: recover_request_id(&bytes),
            failures,
        })
    }

    pub fn encode(&self, response: &ActionResponse) -> String {
        STANDARD.encode(response.encode_to_vec())
    }

    pub fn encode_request(&self, request: &ActionRequest) -> String {
        STANDARD.encode(request.encode_to_vec())
    }

    /// Decode a response envelope (the agent's side of the exchange).
    ///
    /// An all-default response encodes to zero bytes, so an empty envelope
    /// decodes back to it.
    pub fn decode_response(&self, raw: &str) -> Result<ActionResponse, DecodeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(ActionResponse::default());
        }
        let bytes = unwrap_envelope(raw);
        ActionResponse::decode(bytes.as_slice()).map_err(|e| DecodeError::Undecodable {
            request_id: recover_request_id(&bytes),
            failures: vec![format!("schema: {e}")],
        })
    }
}

fn unwrap_envelope(raw: &str) -> Vec<u8> {
    match STANDARD.decode(raw) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Payload is not base64 ({e}), decoding raw text");
            raw.as_bytes().to_vec()
        }
    }
}
