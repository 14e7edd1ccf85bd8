use crate::error::{Error, ErrorKind};
use crate::message::Response;

use http::header::{HeaderValue, ALLOW};
use http::StatusCode;
use serde_json::{json, Map, Value};

pub(super) const INTERNAL_MESSAGE: &str = "An internal error happened.";

/// Renders `err` as a JSON error envelope.
pub(super) fn error_response(err: &Error, status: StatusCode, details: bool) -> Response {
    let mut content = Map::new();
    content.insert("status".into(), json!("error"));

    let mut res = Response::new().with_status(status);

    match err.kind() {
        ErrorKind::RouteNotFound => {
            content.insert("message".into(), json!("Page not found."));
        }
        ErrorKind::MethodNotAllowed => {
            let allowed: Vec<&str> = err.allowed_methods().iter().map(|m| m.as_str()).collect();
            content.insert("message".into(), json!("Method not allowed"));
            content.insert("allowedMethods".into(), json!(allowed));
            if let Ok(v) = HeaderValue::from_str(&allowed.join(", ")) {
                res = res.with_header(ALLOW, v);
            }
        }
        _ if status.is_server_error() => {
            content.insert("message".into(), json!(INTERNAL_MESSAGE));
            if details {
                content.insert("details".into(), describe(err));
            }
        }
        _ => {
            content.insert("message".into(), json!(err.to_string()));
        }
    }

    match res.with_json(&Value::Object(content)) {
        Ok(res) => res,
        Err(_) => Response::new().with_status(status),
    }
}

fn describe(err: &Error) -> Value {
    let mut chain = Vec::new();
    let mut source = std::error::Error::source(err);
    while let Some(e) = source {
        chain.push(json!(e.to_string()));
        source = e.source();
    }
    json!({
        "kind": format!("{:?}", err.kind()),
        "message": err.to_string(),
        "causes": chain,
    })
}
