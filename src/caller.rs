//! In-process calls to a handler without a network round trip.

use crate::container::Container;
use crate::error::{Error, Result};
use crate::handler::{Bound, Handler};
use crate::message::{Request, RequestBody, Response, UploadedFile};
use crate::route::Method;
use crate::table::RouteTable;

use std::sync::Arc;

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use tracing::debug;

/// Calls the operations of one handler type through fabricated requests.
///
/// ```ignore
/// let caller = HandlerCaller::<ExampleHandler>::create("http://localhost/api", None)?;
/// let body = caller.get("/echo?x=1", &[])?;
/// ```
pub struct HandlerCaller<H: Handler> {
    container: Container,
    bound: Bound<H>,
    base_url: String,
    table: RouteTable,
}

impl<H: Handler> HandlerCaller<H> {
    /// Builds the handler from `container`, or from a fresh container.
    pub fn create(base_url: impl Into<String>, container: Option<Container>) -> Result<Self> {
        let container = container.unwrap_or_default();
        let handler = H::create(&container);
        Self::with_handler(base_url, handler, container)
    }

    pub fn with_handler(
        base_url: impl Into<String>,
        handler: H,
        container: Container,
    ) -> Result<Self> {
        let mut table = RouteTable::new();
        for route in H::routes() {
            table.insert(route, ())?;
        }
        Ok(Self {
            container,
            bound: Bound::new(Arc::new(handler)),
            base_url: base_url.into(),
            table,
        })
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn handler(&self) -> &H {
        self.bound.handler()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    pub fn set_handler(&mut self, handler: H) -> &mut Self {
        self.bound.set_handler(Arc::new(handler));
        self
    }

    pub fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<String> {
        self.request(Method::GET, url, headers, RequestBody::Empty, Vec::new())
    }

    pub fn post(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: impl Into<RequestBody>,
    ) -> Result<String> {
        self.request(Method::POST, url, headers, body, Vec::new())
    }

    pub fn put(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: impl Into<RequestBody>,
        files: Vec<UploadedFile>,
    ) -> Result<String> {
        self.request(Method::PUT, url, headers, body, files)
    }

    pub fn patch(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: impl Into<RequestBody>,
        files: Vec<UploadedFile>,
    ) -> Result<String> {
        self.request(Method::PATCH, url, headers, body, files)
    }

    pub fn delete(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: impl Into<RequestBody>,
    ) -> Result<String> {
        self.request(Method::DELETE, url, headers, body, Vec::new())
    }

    /// Dispatches one request and returns the response body.
    ///
    /// `url` is relative to the base URL and may carry a query string.
    pub fn request(
        &self,
        method: Method,
        url: &str,
        headers: &[(&str, &str)],
        body: impl Into<RequestBody>,
        files: Vec<UploadedFile>,
    ) -> Result<String> {
        self.table.method_allowed(url, Some(&method))?;
        let index = self.table.resolve(url, Some(&method))?;
        let route = self.table.route(index);

        let headers = header_map(headers)?;
        let body = body.into().encode(&headers)?;
        let args = self.table.bind(index, url)?;

        debug!(%method, url, target = route.target(), "synthetic dispatch");

        let mut builder = http::Request::builder()
            .method(method)
            .uri(join_url(&self.base_url, url));
        if let Some(h) = builder.headers_mut() {
            *h = headers;
        }
        let request = Request::new(builder.body(body)?).with_files(files);

        let response = self.bound.invoke(route, request, Response::new(), &args)?;
        Ok(response.body_string())
    }
}

fn header_map(headers: &[(&str, &str)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for &(name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidRequest(format!("invalid header name {:?}: {}", name, e)))?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            Error::InvalidRequest(format!("invalid header value {:?}: {}", value, e))
        })?;
        map.append(name, value);
    }
    Ok(map)
}

fn join_url(base: &str, url: &str) -> String {
    let base = base.trim_end_matches('/');
    let url = url.trim_start_matches('/');
    format!("{}/{}", base, url)
}
