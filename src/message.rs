//! Request and response values passed to handler operations.

use crate::error::{Error, Result};

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, StatusCode, Uri};
use serde::Serialize;

/// A file attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Body handed to a synthetic request.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Sent untouched.
    Raw(Bytes),
    /// Encoded as JSON or as a form, depending on the request's content type.
    /// Form encoding writes nested lists and maps in bracket form, e.g.
    /// `tags[0]=a&filter[id]=1`.
    Structured(serde_json::Value),
}

impl RequestBody {
    pub fn encode(self, headers: &HeaderMap) -> Result<Bytes> {
        match self {
            RequestBody::Empty => Ok(Bytes::new()),
            RequestBody::Raw(raw) => Ok(raw),
            RequestBody::Structured(value) => {
                let json = headers
                    .get_all(CONTENT_TYPE)
                    .iter()
                    .filter_map(|v| v.to_str().ok())
                    .any(|v| v.contains("application/json"));
                if json {
                    Ok(serde_json::to_vec(&value)?.into())
                } else {
                    Ok(serde_qs::to_string(&value)?.into())
                }
            }
        }
    }
}

impl From<&str> for RequestBody {
    fn from(s: &str) -> Self {
        RequestBody::Raw(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<String> for RequestBody {
    fn from(s: String) -> Self {
        RequestBody::Raw(s.into())
    }
}

impl From<Bytes> for RequestBody {
    fn from(b: Bytes) -> Self {
        RequestBody::Raw(b)
    }
}

impl From<serde_json::Value> for RequestBody {
    fn from(v: serde_json::Value) -> Self {
        RequestBody::Structured(v)
    }
}

#[derive(Debug)]
pub struct Request {
    inner: http::Request<Bytes>,
    files: Vec<UploadedFile>,
}

impl Request {
    pub fn new(inner: http::Request<Bytes>) -> Self {
        Self {
            inner,
            files: Vec::new(),
        }
    }

    pub fn with_files(mut self, files: Vec<UploadedFile>) -> Self {
        self.files = files;
        self
    }

    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn is(&self, method: &Method) -> bool {
        self.inner.method() == method
    }

    pub fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// First value of a header, if it is valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    pub fn body(&self) -> &Bytes {
        self.inner.body()
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Content type without parameters, lowercased.
    pub fn media_type(&self) -> Option<String> {
        let ct = self.content_type()?.split(';').next()?.trim();
        if ct.is_empty() {
            None
        } else {
            Some(ct.to_ascii_lowercase())
        }
    }

    pub fn content_length(&self) -> usize {
        self.inner.body().len()
    }

    /// Decoded query string pairs, in order.
    pub fn try_query_params(&self) -> Result<Vec<(String, String)>> {
        match self.inner.uri().query() {
            Some(q) => serde_urlencoded::from_str(q)
                .map_err(|e| Error::InvalidRequest(format!("malformed query string: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    /// Like [`Request::try_query_params`], but a query string that fails to
    /// decode yields no pairs at all.
    pub fn query_params(&self) -> Vec<(String, String)> {
        self.try_query_params().unwrap_or_default()
    }

    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query_params()
            .into_iter()
            .find_map(|(k, v)| if k == name { Some(v) } else { None })
    }

    /// Decodes a JSON or form body. Other media types yield `Null`.
    pub fn parsed_body(&self) -> Result<serde_json::Value> {
        let body = self.inner.body();
        match self.media_type().as_deref() {
            Some("application/json") => {
                if body.is_empty() {
                    return Ok(serde_json::Value::Null);
                }
                serde_json::from_slice(body)
                    .map_err(|e| Error::InvalidRequest(format!("malformed JSON body: {}", e)))
            }
            Some("application/x-www-form-urlencoded") => {
                let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)
                    .map_err(|e| Error::InvalidRequest(format!("malformed form body: {}", e)))?;
                Ok(pairs
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect::<serde_json::Map<_, _>>()
                    .into())
            }
            _ => Ok(serde_json::Value::Null),
        }
    }

    pub fn as_http(&self) -> &http::Request<Bytes> {
        &self.inner
    }

    pub fn into_http(self) -> http::Request<Bytes> {
        self.inner
    }
}

#[derive(Debug, Default)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Appends `value` as JSON and sets the content type.
    pub fn with_json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let json = serde_json::to_vec(value)?;
        let mut res = self.with_header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        res.body.extend_from_slice(&json);
        Ok(res)
    }

    pub fn write(mut self, body: &str) -> Self {
        self.body.extend_from_slice(body.as_bytes());
        self
    }

    pub fn into_http(self) -> http::Response<Bytes> {
        let mut res = http::Response::new(Bytes::from(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}
