//! Highlight server wire format.
//!
//! Every request and response is one line holding a JSON array:
//!
//! ```text
//! [msg_num, {"version", "id", "buf_type", "buf_name", "buf_body", "additional_info"}]
//! [msg_num, {"version", "id", "buf_type", "buf_name", "return_code", "error_message", "tokens"}]
//! ```
//!
//! `v1` requests carry an integer `id`, `v1.1` requests a string `id`.
//! Responses always echo the id as a string.

use gosem_core::{CategoryTable, GosemError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub(crate) const VERSION_V1: &str = "v1";
pub(crate) const VERSION_V11: &str = "v1.1";
/// Version reported when the request could not be read.
pub(crate) const BASE_VERSION_PROTOCOL: &str = VERSION_V11;

pub(crate) const SUCCESS_CODE: i32 = 0;
pub(crate) const FAILURE_CODE: i32 = 1;

// ── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawRequestBody {
    version: String,
    id: Value,
    buf_type: String,
    buf_name: String,
    buf_body: String,
    #[serde(default)]
    additional_info: String,
}

/// A validated tokenize request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Request {
    pub msg_num: i64,
    pub version: String,
    pub id: String,
    pub buf_type: String,
    pub buf_name: String,
    pub buf_body: String,
    pub additional_info: String,
}

impl Request {
    /// Parse and validate one request line.
    pub(crate) fn parse(line: &str) -> Result<Self, GosemError> {
        let (msg_num, body): (i64, RawRequestBody) = serde_json::from_str(line)
            .map_err(|e| GosemError::Protocol(format!("invalid message: {e}")))?;

        let id = match (body.version.as_str(), &body.id) {
            (VERSION_V1, Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
            (VERSION_V11, Value::String(s)) => s.clone(),
            (VERSION_V1, _) => {
                return Err(GosemError::Protocol(
                    "invalid message: v1 id must be an integer".to_string(),
                ))
            }
            (VERSION_V11, _) => {
                return Err(GosemError::Protocol(
                    "invalid message: v1.1 id must be a string".to_string(),
                ))
            }
            (other, _) => {
                return Err(GosemError::Protocol(format!(
                    "not implemented version: {other}"
                )))
            }
        };

        Ok(Self {
            msg_num,
            version: body.version,
            id,
            buf_type: body.buf_type,
            buf_name: body.buf_name,
            buf_body: body.buf_body,
            additional_info: body.additional_info,
        })
    }
}

// ── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ResponseBody {
    pub version: String,
    pub id: String,
    pub buf_type: String,
    pub buf_name: String,
    pub return_code: i32,
    pub error_message: String,
    pub tokens: CategoryTable,
}

/// `[msg_num, body]` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Response(pub i64, pub ResponseBody);

impl Response {
    /// Answer to a line that could not be parsed as a request.
    pub(crate) fn invalid_request(error: &GosemError) -> Self {
        Self(
            0,
            ResponseBody {
                version: BASE_VERSION_PROTOCOL.to_string(),
                id: String::new(),
                buf_type: String::new(),
                buf_name: String::new(),
                return_code: FAILURE_CODE,
                error_message: error.to_string(),
                tokens: CategoryTable::new(),
            },
        )
    }

    pub(crate) fn failure(request: &Request, message: impl Into<String>) -> Self {
        Self::for_request(request, FAILURE_CODE, message.into(), CategoryTable::new())
    }

    /// A produced table; `warning` carries a non-fatal resolution error.
    pub(crate) fn success(request: &Request, tokens: CategoryTable, warning: Option<String>) -> Self {
        Self::for_request(request, SUCCESS_CODE, warning.unwrap_or_default(), tokens)
    }

    fn for_request(
        request: &Request,
        return_code: i32,
        error_message: String,
        tokens: CategoryTable,
    ) -> Self {
        Self(
            request.msg_num,
            ResponseBody {
                version: request.version.clone(),
                id: request.id.clone(),
                buf_type: request.buf_type.clone(),
                buf_name: request.buf_name.clone(),
                return_code,
                error_message,
                tokens,
            },
        )
    }

    pub(crate) fn to_line(&self) -> Result<String, GosemError> {
        Ok(serde_json::to_string(self)?)
    }
}
