use handler_router::{Method, Request, RequestBody, Response};

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use serde_json::json;

fn request(uri: &str, content_type: Option<&str>, body: &'static [u8]) -> Request {
    let mut builder = http::Request::builder().method("POST").uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(CONTENT_TYPE, ct);
    }
    Request::new(builder.body(Bytes::from_static(body)).unwrap())
}

#[test]
fn message_query_params() {
    let req = request("/echo?a=1&b=x%20y&a=2", None, b"");
    assert_eq!(
        req.try_query_params().unwrap(),
        [
            ("a".to_owned(), "1".to_owned()),
            ("b".to_owned(), "x y".to_owned()),
            ("a".to_owned(), "2".to_owned()),
        ]
    );
    assert_eq!(req.query_param("a").as_deref(), Some("1"));
    assert_eq!(req.query_param("c"), None);

    let req = request("/echo", None, b"");
    assert!(req.try_query_params().unwrap().is_empty());
    assert!(req.query_params().is_empty());
}

#[test]
fn message_parsed_body() {
    let req = request("/echo", Some("application/json; charset=utf-8"), br#"{"a":[1,2]}"#);
    assert_eq!(req.media_type().as_deref(), Some("application/json"));
    assert_eq!(req.parsed_body().unwrap(), json!({ "a": [1, 2] }));
    assert!(req.is(&Method::POST));

    let req = request("/echo", Some("application/x-www-form-urlencoded"), b"a=1&b=two");
    assert_eq!(req.parsed_body().unwrap(), json!({ "a": "1", "b": "two" }));

    let req = request("/echo", Some("application/json"), b"{nope");
    assert!(req.parsed_body().is_err());

    let req = request("/echo", Some("text/plain"), b"hi");
    assert_eq!(req.parsed_body().unwrap(), serde_json::Value::Null);
    assert_eq!(req.content_length(), 2);
}

#[test]
fn message_body_encoding() {
    let mut json_headers = HeaderMap::new();
    json_headers.insert(CONTENT_TYPE, "application/json".parse().unwrap());

    let body = RequestBody::from(json!({ "list": [1, 2] }));
    assert_eq!(body.clone().encode(&json_headers).unwrap(), &br#"{"list":[1,2]}"#[..]);
    assert_eq!(body.encode(&HeaderMap::new()).unwrap(), &b"list[0]=1&list[1]=2"[..]);

    assert!(RequestBody::Empty.encode(&json_headers).unwrap().is_empty());
    assert_eq!(RequestBody::from("raw").encode(&json_headers).unwrap(), &b"raw"[..]);
}

#[test]
fn message_response_json() {
    let res = Response::new().write("x").with_json(&json!({ "ok": true })).unwrap();
    assert_eq!(res.header("content-type"), Some("application/json; charset=utf-8"));
    assert_eq!(res.body_string(), r#"x{"ok":true}"#);

    let res = res.with_status(http::StatusCode::CREATED).into_http();
    assert_eq!(res.status(), http::StatusCode::CREATED);
}
