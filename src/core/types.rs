use crate::core::errors::ApiError;
use crate::core::traits::ApiResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Flat request parameters, keyed by field name
pub type Params = Map<String, Value>;

pub const ERROR_MESSAGE_KEY: &str = "errorMessage";
pub const CODE_KEY: &str = "code";

/// HTTP methods the gateway accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Get,
    Post,
}

impl RequestMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = ApiError;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let method = s.trim();
        if method.is_empty() {
            return Err(ApiError::Validation(
                "Request method must not be empty".to_string(),
            ));
        }

        match method.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            other => Err(ApiError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Flatten any serializable value into request parameters.
///
/// The value must serialize to a JSON object (or to `null`, which yields no
/// parameters). Fields serialized as `null` are dropped.
pub fn flatten_params<T>(params: &T) -> Result<Params, ApiError>
where
    T: Serialize + ?Sized,
{
    let value = serde_json::to_value(params).map_err(|e| {
        ApiError::Validation(format!("Failed to serialize request parameters: {}", e))
    })?;

    match value {
        Value::Object(mut map) => {
            map.retain(|_, v| !v.is_null());
            Ok(map)
        }
        Value::Null => Ok(Params::new()),
        other => Err(ApiError::Validation(format!(
            "Request parameters must be an object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Render a parameter value the way it appears in a query string
pub fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Generic response container.
///
/// Holds whatever object the gateway returned, keyed by field name. When the
/// gateway answers with a non-200 status the container instead carries
/// `errorMessage` and `code`. It (de)serializes as the bare data object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultResponse {
    data: Params,
    #[serde(skip)]
    remote_error: bool,
}

impl ResultResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: Params) -> Self {
        Self {
            data,
            remote_error: false,
        }
    }

    /// Container for a failure the gateway reported
    pub fn from_remote_error(envelope: ErrorEnvelope) -> Self {
        Self {
            data: envelope.into_data(),
            remote_error: true,
        }
    }

    pub const fn data(&self) -> &Params {
        &self.data
    }

    pub fn into_data(self) -> Params {
        self.data
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Error message folded in from a non-200 answer
    pub fn error_message(&self) -> Option<&str> {
        self.data.get(ERROR_MESSAGE_KEY).and_then(Value::as_str)
    }

    pub fn code(&self) -> Option<i64> {
        self.data.get(CODE_KEY).and_then(Value::as_i64)
    }

    /// True when the data was folded from a non-200 answer. A successful
    /// payload that happens to contain `errorMessage` does not count.
    pub const fn is_remote_error(&self) -> bool {
        self.remote_error
    }

    /// Deserialize the data into a caller-defined struct
    pub fn to_typed<T: serde::de::DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(Value::Object(self.data.clone()))
            .map_err(|e| ApiError::Operation(format!("Failed to deserialize response data: {}", e)))
    }
}

impl ApiResponse for ResultResponse {
    fn set_data(&mut self, data: Params) {
        self.data = data;
    }

    fn mark_remote_error(&mut self) {
        self.remote_error = true;
    }
}

/// Error body returned by the gateway on non-200 statuses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub message: String,
    pub code: i64,
}

impl ErrorEnvelope {
    /// Best-effort parse: anything missing or malformed becomes empty / zero
    pub fn parse_lenient(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            return Self::default();
        };

        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let code = value.get("code").and_then(Value::as_i64).unwrap_or_default();

        Self { message, code }
    }

    /// Container data carrying this failure
    pub fn into_data(self) -> Params {
        let mut data = Params::new();
        data.insert(ERROR_MESSAGE_KEY.to_string(), Value::String(self.message));
        data.insert(CODE_KEY.to_string(), Value::from(self.code));
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct IpQuery {
        ip: String,
        lang: Option<String>,
        limit: u32,
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!(" get ".parse::<RequestMethod>().unwrap(), RequestMethod::Get);
        assert_eq!("Post".parse::<RequestMethod>().unwrap(), RequestMethod::Post);
        assert!(matches!(
            "PUT".parse::<RequestMethod>(),
            Err(ApiError::UnsupportedMethod(m)) if m == "PUT"
        ));
        assert!(matches!(
            "   ".parse::<RequestMethod>(),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_flatten_struct_drops_nulls() {
        let params = flatten_params(&IpQuery {
            ip: "8.8.8.8".to_string(),
            lang: None,
            limit: 3,
        })
        .unwrap();

        assert_eq!(params.len(), 2);
        assert_eq!(params["ip"], json!("8.8.8.8"));
        assert_eq!(params["limit"], json!(3));
    }

    #[test]
    fn test_flatten_rejects_non_object() {
        assert!(matches!(
            flatten_params(&vec![1, 2]),
            Err(ApiError::Validation(_))
        ));
        assert!(flatten_params(&()).unwrap().is_empty());
    }

    #[test]
    fn test_param_to_string() {
        assert_eq!(param_to_string(&json!("abc")), "abc");
        assert_eq!(param_to_string(&json!(42)), "42");
        assert_eq!(param_to_string(&json!(true)), "true");
    }

    #[test]
    fn test_error_envelope_lenient() {
        let envelope = ErrorEnvelope::parse_lenient(r#"{"message":"forbidden","code":40300}"#);
        assert_eq!(envelope.message, "forbidden");
        assert_eq!(envelope.code, 40300);

        assert_eq!(ErrorEnvelope::parse_lenient("<html>502</html>"), ErrorEnvelope::default());
        assert_eq!(
            ErrorEnvelope::parse_lenient(r#"{"code":"oops"}"#),
            ErrorEnvelope::default()
        );
    }

    #[test]
    fn test_container_error_accessors() {
        let response = ResultResponse::from_remote_error(ErrorEnvelope {
            message: "forbidden".to_string(),
            code: 40300,
        });
        assert!(response.is_remote_error());
        assert_eq!(response.error_message(), Some("forbidden"));
        assert_eq!(response.code(), Some(40300));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"errorMessage": "forbidden", "code": 40300})
        );
    }

    #[test]
    fn test_error_message_field_alone_is_not_remote_error() {
        let Value::Object(data) = json!({"errorMessage": "none", "ip": "1.1.1.1"}) else {
            unreachable!()
        };
        let response = ResultResponse::from_data(data);
        assert_eq!(response.error_message(), Some("none"));
        assert!(!response.is_remote_error());
    }

    #[test]
    fn test_container_serializes_as_data() {
        let mut response = ResultResponse::new();
        let Value::Object(data) = json!({"name": "ip-42"}) else {
            unreachable!()
        };
        response.set_data(data);

        assert_eq!(serde_json::to_value(&response).unwrap(), json!({"name": "ip-42"}));
        assert!(!response.is_remote_error());

        #[derive(Deserialize)]
        struct Named {
            name: String,
        }
        assert_eq!(response.to_typed::<Named>().unwrap().name, "ip-42");
    }
}
