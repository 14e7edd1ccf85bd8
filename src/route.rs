use crate::args::{Args, Value};
use crate::error::{Error, Result};

pub use http::Method;

/// One declared endpoint of a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    method: Method,
    pattern: String,
    target: String,
    arguments: Args,
    name: Option<String>,
}

impl Route {
    pub fn new(method: Method, pattern: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            method,
            pattern: pattern.into(),
            target: target.into(),
            arguments: Args::new(),
            name: None,
        }
    }

    /// Adds a static argument, passed to the handler whatever the URL holds.
    pub fn argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name, value);
        self
    }

    pub fn arguments(mut self, args: Args) -> Self {
        self.arguments.merge(&args);
        self
    }

    /// Names the route for reverse lookup. An empty name leaves it unnamed.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = if name.is_empty() { None } else { Some(name) };
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn static_arguments(&self) -> &Args {
        &self.arguments
    }

    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn check_method(&self) -> Result<()> {
        const ALLOWED: [Method; 7] = [
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
            Method::HEAD,
        ];
        if ALLOWED.contains(&self.method) {
            Ok(())
        } else {
            Err(Error::InvalidRoute {
                pattern: self.pattern.clone(),
                reason: format!("unsupported method {}", self.method),
            })
        }
    }
}

macro_rules! define_method {
    ($name:tt, $method:tt) => {
        pub fn $name(pattern: impl Into<String>, target: impl Into<String>) -> Self {
            Self::new(Method::$method, pattern, target)
        }
    };
}

impl Route {
    define_method!(get, GET);
    define_method!(post, POST);
    define_method!(put, PUT);
    define_method!(patch, PATCH);
    define_method!(delete, DELETE);
    define_method!(options, OPTIONS);
    define_method!(head, HEAD);
}

/// Declares a handler's routes.
///
/// ```
/// use handler_router::routes;
///
/// let routes = routes![
///     GET "/echo" => get_echo,
///     POST "/echo" => post_echo,
///     GET "/data/{id:[0-9]+}" => get_data,
/// ];
/// assert_eq!(routes.len(), 3);
/// assert_eq!(routes[2].target(), "get_data");
/// ```
#[macro_export]
macro_rules! routes {
    (@entry GET, $pattern:expr, $target:ident) => {
        $crate::route::Route::new($crate::route::Method::GET, $pattern, stringify!($target))
    };
    (@entry POST, $pattern:expr, $target:ident) => {
        $crate::route::Route::new($crate::route::Method::POST, $pattern, stringify!($target))
    };
    (@entry PUT, $pattern:expr, $target:ident) => {
        $crate::route::Route::new($crate::route::Method::PUT, $pattern, stringify!($target))
    };
    (@entry PATCH, $pattern:expr, $target:ident) => {
        $crate::route::Route::new($crate::route::Method::PATCH, $pattern, stringify!($target))
    };
    (@entry DELETE, $pattern:expr, $target:ident) => {
        $crate::route::Route::new($crate::route::Method::DELETE, $pattern, stringify!($target))
    };
    (@entry OPTIONS, $pattern:expr, $target:ident) => {
        $crate::route::Route::new($crate::route::Method::OPTIONS, $pattern, stringify!($target))
    };
    (@entry HEAD, $pattern:expr, $target:ident) => {
        $crate::route::Route::new($crate::route::Method::HEAD, $pattern, stringify!($target))
    };

    [$($method:tt $pattern:expr => $target:ident),* $(,)?] => {
        vec![$($crate::routes!(@entry $method, $pattern, $target)),*]
    };
}
