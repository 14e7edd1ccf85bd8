use super::{BoxError, BoxFuture};
use crate::app::App;

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::service::Service;

type Response = http::Response<Full<Bytes>>;

/// Serves an [`App`] over hyper. Cloning shares the app.
#[derive(Clone)]
pub struct AppService {
    app: Arc<App>,
}

impl AppService {
    pub fn new(app: App) -> Self {
        Self::from_shared(Arc::new(app))
    }

    pub fn from_shared(app: Arc<App>) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &App {
        &self.app
    }
}

impl<B> Service<http::Request<B>> for AppService
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Into<BoxError>,
{
    type Response = Response;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Response, BoxError>>;

    fn call(&self, req: http::Request<B>) -> Self::Future {
        let app = Arc::clone(&self.app);
        Box::pin(async move {
            let (parts, body) = req.into_parts();
            let body = body
                .collect()
                .await
                .map_err(Into::<BoxError>::into)?
                .to_bytes();
            let res = app.handle(http::Request::from_parts(parts, body));
            Ok::<_, BoxError>(res.map(Full::new))
        })
    }
}

impl App {
    pub fn into_service(self) -> AppService {
        AppService::new(self)
    }
}
