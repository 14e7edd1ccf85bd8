mod endpoints;

pub use self::endpoints::Endpoints;

use crate::args::Args;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::message::{Request, Response};
use crate::route::Route;

use std::sync::Arc;

/// A handler operation.
pub type Endpoint<H> = fn(&H, Request, Response, &Args) -> Result<Response>;

/// A group of endpoint operations owning its route declarations.
pub trait Handler: Sized + Send + Sync + 'static {
    fn create(container: &Container) -> Self;

    fn routes() -> Vec<Route>;

    fn endpoints() -> Endpoints<Self>;

    /// Runs around every live dispatch to this handler.
    fn on_request(
        &self,
        req: Request,
        res: Response,
        args: &Args,
        next: Endpoint<Self>,
    ) -> Result<Response> {
        next(self, req, res, args)
    }
}

/// Object-safe view of a handler instance and its endpoints.
pub trait Dispatch: Send + Sync {
    fn is_callable(&self, target: &str) -> bool;

    fn dispatch(
        &self,
        route: &Route,
        req: Request,
        res: Response,
        args: &Args,
    ) -> Result<Response>;
}

pub type BoxDispatch = Arc<dyn Dispatch>;

/// A handler instance with the endpoint map of its type.
pub struct Bound<H> {
    handler: Arc<H>,
    endpoints: Endpoints<H>,
}

impl<H: Handler> Bound<H> {
    pub fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            endpoints: H::endpoints(),
        }
    }

    pub fn handler(&self) -> &Arc<H> {
        &self.handler
    }

    pub fn set_handler(&mut self, handler: Arc<H>) {
        self.handler = handler;
    }

    /// Looks up the route's target, failing on a route that names no endpoint.
    pub fn endpoint(&self, route: &Route) -> Result<Endpoint<H>> {
        self.endpoints
            .get(route.target())
            .ok_or_else(|| Error::RouteNotCallable {
                target: route.target().to_owned(),
                pattern: route.pattern().to_owned(),
            })
    }

    /// Calls the endpoint directly, without [`Handler::on_request`].
    pub fn invoke(
        &self,
        route: &Route,
        req: Request,
        res: Response,
        args: &Args,
    ) -> Result<Response> {
        let endpoint = self.endpoint(route)?;
        endpoint(&*self.handler, req, res, args)
    }
}

impl<H: Handler> Dispatch for Bound<H> {
    fn is_callable(&self, target: &str) -> bool {
        self.endpoints.contains(target)
    }

    fn dispatch(
        &self,
        route: &Route,
        req: Request,
        res: Response,
        args: &Args,
    ) -> Result<Response> {
        let endpoint = self.endpoint(route)?;
        self.handler.on_request(req, res, args, endpoint)
    }
}
