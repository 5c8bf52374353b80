//! Wire types shared by the outbound upstream client and the inbound
//! gateway server: both sides speak plain JSON-RPC 2.0 over HTTP.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A JSON-RPC request or response identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(u64),
    String(String),
    None,
}

impl Id {
    pub fn is_none(&self) -> bool {
        matches!(self, Id::None)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{n}"),
            Id::String(s) => write!(f, "{s}"),
            Id::None => write!(f, "null"),
        }
    }
}

impl Default for Id {
    fn default() -> Self {
        Id::None
    }
}

/// An outbound (or inbound) JSON-RPC 2.0 request.
#[derive(Debug, Clone)]
pub struct Request {
    pub id: Id,
    pub method: String,
    pub params: serde_json::Value,
}

impl Request {
    pub fn new(id: Id, method: impl Into<String>, params: serde_json::Value) -> Self {
        Request {
            id,
            method: method.into(),
            params,
        }
    }
}

impl Serialize for Request {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Request", 4)?;
        state.serialize_field("jsonrpc", "2.0")?;
        state.serialize_field("method", &self.method)?;
        state.serialize_field("params", &self.params)?;
        state.serialize_field("id", &self.id)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Request {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            #[allow(dead_code)]
            jsonrpc: Option<String>,
            method: String,
            #[serde(default)]
            params: serde_json::Value,
            #[serde(default)]
            id: Id,
        }

        let raw = Raw::deserialize(deserializer)?;
        Ok(Request {
            id: raw.id,
            method: raw.method,
            params: raw.params,
        })
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ErrorPayload {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        ErrorPayload {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Either a successful result or an error — a JSON-RPC response carries
/// exactly one of the two, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    Success(serde_json::Value),
    Error(ErrorPayload),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub id: Id,
    pub payload: ResponsePayload,
}

impl Response {
    pub fn success(id: Id, result: serde_json::Value) -> Self {
        Response {
            id,
            payload: ResponsePayload::Success(result),
        }
    }

    pub fn error(id: Id, error: ErrorPayload) -> Self {
        Response {
            id,
            payload: ResponsePayload::Error(error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, ResponsePayload::Error(_))
    }
}

impl Serialize for Response {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Response", 3)?;
        state.serialize_field("jsonrpc", "2.0")?;
        match &self.payload {
            ResponsePayload::Success(result) => state.serialize_field("result", result)?,
            ResponsePayload::Error(err) => state.serialize_field("error", err)?,
        }
        state.serialize_field("id", &self.id)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for Response {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ResponseVisitor;

        impl<'de> Visitor<'de> for ResponseVisitor {
            type Value = Response;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON-RPC 2.0 response object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Response, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut id: Option<Id> = None;
                let mut result: Option<serde_json::Value> = None;
                let mut error: Option<ErrorPayload> = None;

                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "id" => id = Some(map.next_value()?),
                        "result" => result = Some(map.next_value()?),
                        "error" => error = Some(map.next_value()?),
                        _ => {
                            let _: de::IgnoredAny = map.next_value()?;
                        }
                    }
                }

                let id = id.unwrap_or(Id::None);
                let payload = match (result, error) {
                    (Some(_), Some(_)) => {
                        return Err(de::Error::custom(
                            "response carries both `result` and `error`",
                        ))
                    }
                    (Some(result), None) => ResponsePayload::Success(result),
                    (None, Some(error)) => ResponsePayload::Error(error),
                    (None, None) => {
                        return Err(de::Error::custom("response carries neither `result` nor `error`"))
                    }
                };

                Ok(Response { id, payload })
            }
        }

        deserializer.deserialize_map(ResponseVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_literal_version_tag() {
        let req = Request::new(Id::Number(1), "eth_chainId", serde_json::json!([]));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "eth_chainId");
        assert_eq!(json["id"], 1);
    }

    #[test]
    fn response_deserializes_success() {
        let raw = r#"{"jsonrpc":"2.0","result":"0x1","id":7}"#;
        let resp: Response = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.id, Id::Number(7));
        assert_eq!(resp.payload, ResponsePayload::Success(serde_json::json!("0x1")));
    }

    #[test]
    fn response_deserializes_error() {
        let raw = r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"not found"},"id":null}"#;
        let resp: Response = serde_json::from_str(raw).unwrap();
        assert!(resp.is_error());
        assert_eq!(resp.id, Id::None);
    }

    #[test]
    fn response_rejects_both_result_and_error() {
        let raw = r#"{"jsonrpc":"2.0","result":1,"error":{"code":1,"message":"x"},"id":1}"#;
        let resp: Result<Response, _> = serde_json::from_str(raw);
        assert!(resp.is_err());
    }

    #[test]
    fn id_untagged_roundtrip() {
        assert_eq!(serde_json::to_string(&Id::Number(5)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&Id::String("a".into())).unwrap(), "\"a\"");
        assert_eq!(serde_json::to_string(&Id::None).unwrap(), "null");
    }
}
