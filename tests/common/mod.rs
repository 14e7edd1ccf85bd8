#![allow(dead_code)]

use handler_router::auth::{Client, Permission, Privileged};
use handler_router::{endpoints, routes};
use handler_router::{Args, Container, Endpoints, Error, Handler, Request, Response, Result, Route};

use std::sync::atomic::{AtomicUsize, Ordering};

use http::header::{HeaderName, HeaderValue};
use serde_json::json;

pub struct ExampleHandler {
    pub hooked: AtomicUsize,
    container: Container,
}

impl ExampleHandler {
    fn get_echo(&self, req: Request, res: Response, _: &Args) -> Result<Response> {
        let params: serde_json::Map<_, _> = req
            .query_params()
            .into_iter()
            .map(|(k, v)| (k, json!(v)))
            .collect();
        res.with_json(&params)
    }

    fn post_echo(&self, req: Request, res: Response, _: &Args) -> Result<Response> {
        let body = String::from_utf8_lossy(req.body()).into_owned();
        Ok(res.write(&body))
    }

    fn get_data(&self, _: Request, res: Response, args: &Args) -> Result<Response> {
        res.with_json(args)
    }

    fn put_data(&self, req: Request, res: Response, args: &Args) -> Result<Response> {
        let files: Vec<&str> = req.files().iter().map(|f| f.file_name.as_str()).collect();
        res.with_json(&json!({
            "id": args.get_str("id"),
            "files": files,
            "body": req.parsed_body()?,
        }))
    }

    fn delete_data(&self, _: Request, res: Response, args: &Args) -> Result<Response> {
        let id: u32 = match args.parse("id") {
            Some(Ok(id)) => id,
            _ => return Err(Error::InvalidRequest("bad id".to_owned())),
        };
        Ok(res.write(&format!("deleted {}", id)))
    }

    fn get_user(&self, _: Request, res: Response, args: &Args) -> Result<Response> {
        res.with_json(args)
    }

    fn get_fail(&self, _: Request, _: Response, _: &Args) -> Result<Response> {
        Err(Error::Internal("disk on fire".to_owned()))
    }

    fn get_missing(&self, _: Request, _: Response, _: &Args) -> Result<Response> {
        Err(Error::NotFound("No such item.".to_owned()))
    }
}

impl Handler for ExampleHandler {
    fn create(container: &Container) -> Self {
        Self {
            hooked: AtomicUsize::new(0),
            container: container.clone(),
        }
    }

    fn routes() -> Vec<Route> {
        let mut routes = routes![
            GET "/echo" => get_echo,
            POST "/echo" => post_echo,
            GET "/data/{id:[0-9]+}" => get_data,
            PUT "/data/{id:[0-9]+}" => put_data,
            DELETE "/data/{id:[0-9]+}" => delete_data,
            GET "/fail" => get_fail,
            GET "/missing" => get_missing,
            GET "/broken" => not_an_endpoint,
        ];
        routes.push(Route::get("/users[/{id:[0-9]+}[/{tab}]]", "get_user").name("user"));
        routes.push(
            Route::get("/fixed/{id}", "get_data")
                .argument("id", "static")
                .argument("kind", "fixed"),
        );
        routes
    }

    fn endpoints() -> Endpoints<Self> {
        endpoints![
            Self::get_echo,
            Self::post_echo,
            Self::get_data,
            Self::put_data,
            Self::delete_data,
            Self::get_user,
            Self::get_fail,
            Self::get_missing,
        ]
    }

    fn on_request(
        &self,
        req: Request,
        res: Response,
        args: &Args,
        next: handler_router::Endpoint<Self>,
    ) -> Result<Response> {
        self.hooked.fetch_add(1, Ordering::SeqCst);
        let res = res.with_header(
            HeaderName::from_static("x-hooked"),
            HeaderValue::from_static("1"),
        );
        next(self, req, res, args)
    }
}

pub struct SecretHandler {
    container: Container,
}

impl Privileged for SecretHandler {
    fn container(&self) -> &Container {
        &self.container
    }
}

impl SecretHandler {
    fn get_secret(&self, _: Request, res: Response, _: &Args) -> Result<Response> {
        self.force_permission("secret.read", &Args::new())?;
        let client = self.client()?;
        Ok(res.write(&format!("hello {}", client.username())))
    }

    fn delete_secret(&self, _: Request, res: Response, _: &Args) -> Result<Response> {
        self.force_all_permissions(&["secret.read", "secret.delete"])?;
        Ok(res.write("gone"))
    }
}

impl Handler for SecretHandler {
    fn create(container: &Container) -> Self {
        Self {
            container: container.clone(),
        }
    }

    fn routes() -> Vec<Route> {
        routes![
            GET "/secret" => get_secret,
            DELETE "/secret" => delete_secret,
        ]
    }

    fn endpoints() -> Endpoints<Self> {
        endpoints![Self::get_secret, Self::delete_secret]
    }
}

pub struct TestClient {
    pub name: String,
    pub permissions: Vec<Permission>,
}

impl TestClient {
    pub fn new(name: &str, permissions: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            permissions: permissions.iter().map(|p| Permission::new(*p)).collect(),
        }
    }
}

impl Client for TestClient {
    fn username(&self) -> &str {
        &self.name
    }

    fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

pub fn request(method: &str, uri: &str) -> http::Request<bytes::Bytes> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(bytes::Bytes::new())
        .unwrap()
}
