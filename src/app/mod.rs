//! Live dispatch of real requests across every registered handler.

mod render;

use crate::args::Args;
use crate::config::AppConfig;
use crate::container::Container;
use crate::error::{Error, ErrorKind, Result};
use crate::handler::{BoxDispatch, Bound, Dispatch, Handler};
use crate::message::{Request, Response};
use crate::route::{Method, Route};
use crate::table::RouteTable;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use bytes::Bytes;
use http::{StatusCode, Uri};
use tracing::{debug, error};

type ErrorCallback = Box<dyn Fn(&Method, &Uri, &Error) + Send + Sync>;

/// The rest of the chain, as seen by a middleware.
pub type Next<'a> = &'a dyn Fn(Request) -> Result<Response>;

type Middleware = Box<dyn for<'a> Fn(Request, Next<'a>) -> Result<Response> + Send + Sync>;

type ErrorHandler = Box<dyn Fn(&Error, StatusCode, bool) -> Response + Send + Sync>;

pub struct App {
    config: AppConfig,
    container: Container,
    table: RouteTable<BoxDispatch>,
    statuses: HashMap<ErrorKind, StatusCode>,
    error_callbacks: Vec<ErrorCallback>,
    error_handlers: HashMap<ErrorKind, ErrorHandler>,
    middleware: Vec<Middleware>,
    preflight: HashSet<String>,
}

/// Answers CORS preflight requests with an empty response.
struct Preflight;

const PREFLIGHT_TARGET: &str = "preflight";

const URL_CACHE_CAPACITY: usize = 4096;

impl Dispatch for Preflight {
    fn is_callable(&self, target: &str) -> bool {
        target == PREFLIGHT_TARGET
    }

    fn dispatch(&self, _: &Route, _: Request, res: Response, _: &Args) -> Result<Response> {
        Ok(res)
    }
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            container: Container::new(),
            table: RouteTable::new().with_cache_capacity(URL_CACHE_CAPACITY),
            statuses: HashMap::new(),
            error_callbacks: Vec::new(),
            error_handlers: HashMap::new(),
            middleware: Vec::new(),
            preflight: HashSet::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn routes(&self) -> &RouteTable<BoxDispatch> {
        &self.table
    }

    /// Builds `H` from the app container and registers its routes.
    pub fn add_handler<H: Handler>(&mut self) -> Result<&mut Self> {
        let handler = H::create(&self.container);
        self.add_handler_instance(handler)
    }

    pub fn add_handler_instance<H: Handler>(&mut self, handler: H) -> Result<&mut Self> {
        let bound: BoxDispatch = Arc::new(Bound::new(Arc::new(handler)));
        let preflight: BoxDispatch = Arc::new(Preflight);

        for route in H::routes() {
            let pattern = route.pattern().to_owned();
            self.table.insert(route, Arc::clone(&bound))?;

            if self.config.cors && self.preflight.insert(pattern.clone()) {
                self.table
                    .insert(Route::options(pattern, PREFLIGHT_TARGET), Arc::clone(&preflight))?;
            }
        }

        debug!(handler = std::any::type_name::<H>(), "handler registered");
        Ok(self)
    }

    /// Overrides the status code rendered for an error kind.
    pub fn set_status(&mut self, kind: ErrorKind, status: StatusCode) -> &mut Self {
        self.statuses.insert(kind, status);
        self
    }

    /// Renders errors of `kind` instead of the JSON envelope. The handler gets
    /// the error, its status and whether debug details were requested.
    pub fn set_error_handler<F>(&mut self, kind: ErrorKind, handler: F) -> &mut Self
    where
        F: Fn(&Error, StatusCode, bool) -> Response + Send + Sync + 'static,
    {
        self.error_handlers.insert(kind, Box::new(handler));
        self
    }

    /// Wraps every request, routing included. The last middleware added runs
    /// first.
    pub fn add_middleware<F>(&mut self, middleware: F) -> &mut Self
    where
        F: for<'a> Fn(Request, Next<'a>) -> Result<Response> + Send + Sync + 'static,
    {
        self.middleware.push(Box::new(middleware));
        self
    }

    pub fn clear_middleware(&mut self) -> &mut Self {
        self.middleware.clear();
        self
    }

    /// Runs for every error rendered with a 5xx status.
    pub fn on_error<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(&Method, &Uri, &Error) + Send + Sync + 'static,
    {
        self.error_callbacks.push(Box::new(callback));
        self
    }

    /// Path of a named route, including the base path.
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String> {
        let path = self.table.url_for(name, params)?;
        Ok(format!("{}{}", self.config.base_path.trim_end_matches('/'), path))
    }

    pub fn status_for(&self, err: &Error) -> StatusCode {
        self.statuses
            .get(&err.kind())
            .copied()
            .unwrap_or_else(|| err.status_code())
    }

    pub fn handle(&self, req: http::Request<Bytes>) -> http::Response<Bytes> {
        let method = req.method().clone();
        let uri = req.uri().clone();
        let debug = self.is_debug(&req);

        match self.run(self.middleware.len(), Request::new(req)) {
            Ok(res) => res.into_http(),
            Err(err) => {
                let status = self.status_for(&err);
                if status.is_server_error() {
                    error!(%method, %uri, error = %err, "request failed");
                    for callback in &self.error_callbacks {
                        callback(&method, &uri, &err);
                    }
                } else {
                    let code = status.as_u16();
                    debug!(%method, %uri, error = %err, status = code, "request rejected");
                }
                match self.error_handlers.get(&err.kind()) {
                    Some(handler) => handler(&err, status, debug).into_http(),
                    None => render::error_response(&err, status, debug).into_http(),
                }
            }
        }
    }
}

impl App {
    /// Runs the first `depth` middleware around [`App::dispatch`].
    fn run(&self, depth: usize, req: Request) -> Result<Response> {
        match depth.checked_sub(1) {
            Some(inner) => {
                let next = |req: Request| self.run(inner, req);
                (self.middleware[inner])(req, &next)
            }
            None => self.dispatch(req),
        }
    }

    fn dispatch(&self, req: Request) -> Result<Response> {
        let url = self.routing_url(req.uri())?;
        let method = req.method().clone();

        self.table.method_allowed(&url, Some(&method))?;
        let index = self.table.resolve(&url, Some(&method))?;
        let route = self.table.route(index);
        let target = self.table.data(index);

        if !target.is_callable(route.target()) {
            return Err(Error::RouteNotCallable {
                target: route.target().to_owned(),
                pattern: route.pattern().to_owned(),
            });
        }

        let args = self.table.bind(index, &url)?;
        target.dispatch(route, req, Response::new(), &args)
    }

    /// Request path relative to the base path.
    fn routing_url(&self, uri: &Uri) -> Result<String> {
        let base = self.config.base_path.trim_end_matches('/');
        let path = uri.path();
        let rest = path.strip_prefix(base).ok_or_else(|| Error::RouteNotFound {
            url: path.to_owned(),
        })?;

        match rest {
            "" => Ok("/".to_owned()),
            r if r.starts_with('/') => Ok(r.to_owned()),
            _ => Err(Error::RouteNotFound {
                url: path.to_owned(),
            }),
        }
    }

    fn is_debug(&self, req: &http::Request<Bytes>) -> bool {
        match &self.config.debug_header {
            Some(h) => req
                .headers()
                .get(h.name.as_str())
                .and_then(|v| v.to_str().ok())
                .map_or(false, |v| v == h.value),
            None => false,
        }
    }
}
