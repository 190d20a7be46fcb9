//! Outbound call request and response.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Nested request parameters, keyed by parameter name.
pub type Params = BTreeMap<String, ParamValue>;

/// A single parameter value. Maps and lists nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    String(String),
    List(Vec<ParamValue>),
    Map(Params),
    /// A file on disk, uploaded as a multipart part.
    #[serde(skip_deserializing)]
    File(PathBuf),
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Params> for ParamValue {
    fn from(value: Params) -> Self {
        ParamValue::Map(value)
    }
}

impl From<Vec<ParamValue>> for ParamValue {
    fn from(value: Vec<ParamValue>) -> Self {
        ParamValue::List(value)
    }
}

/// An outbound API call, handed unmodified to the inner caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRequest {
    /// HTTP method, e.g. `GET`.
    pub method: String,
    /// Absolute URL including scheme and host.
    pub url: String,
    /// Full header lines (`"Authorization: Bearer sk_test"`), not key/value pairs.
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub params: Params,
    /// Whether `params` carries a file to upload.
    #[serde(default)]
    pub has_file: bool,
}

impl CallRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: Vec::new(),
            params: Params::new(),
            has_file: false,
        }
    }

    pub fn with_header(mut self, line: impl Into<String>) -> Self {
        self.headers.push(line.into());
        self
    }

    pub fn with_headers(mut self, lines: Vec<String>) -> Self {
        self.headers = lines;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_file(mut self, has_file: bool) -> Self {
        self.has_file = has_file;
        self
    }
}

/// The raw answer of an inner caller. Any status code is a valid response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResponse {
    pub body: String,
    pub status_code: u16,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl CallResponse {
    pub fn new(body: impl Into<String>, status_code: u16) -> Self {
        Self {
            body: body.into(),
            status_code,
            headers: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Look up a response header.
    ///
    /// Exact key first, then an ASCII case-insensitive match, since transports
    /// disagree on header name casing. When several casings are present the
    /// lexicographically smallest key wins. Absent headers yield `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.headers.get(name) {
            return Some(value);
        }
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, value)| value.as_str())
    }

    /// Whether the status is in the client or server error range (>= 400).
    pub fn is_error_status(&self) -> bool {
        self.status_code >= 400
    }
}
