use http::{Method, StatusCode};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid route pattern {pattern:?}: {reason}")]
    PatternSyntax { pattern: String, reason: String },

    #[error("invalid route {pattern:?}: {reason}")]
    InvalidRoute { pattern: String, reason: String },

    #[error("route name {name:?} is already registered")]
    DuplicateRouteName { name: String },

    #[error("no route named {name:?}")]
    UnknownRouteName { name: String },

    #[error("route {name:?} needs parameter {param:?}")]
    MissingRouteParameter { name: String, param: String },

    #[error("value {value:?} does not satisfy parameter {param:?} of route {name:?}")]
    InvalidRouteParameter {
        name: String,
        param: String,
        value: String,
    },

    #[error("route for {url} not found")]
    RouteNotFound { url: String },

    #[error("method {method} not allowed for {url}")]
    MethodNotAllowed {
        url: String,
        method: Method,
        allowed: Vec<Method>,
    },

    #[error("no handler operation for {method} {url}")]
    HandlerNotCallable { url: String, method: Method },

    #[error("route {pattern:?} targets {target:?}, which is not callable")]
    RouteNotCallable { target: String, pattern: String },

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    AccessDenied(String),

    #[error("{0}")]
    NotFound(String),

    #[error("service {key:?} not found in container")]
    ServiceNotFound { key: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[source] BoxError),
}

/// Coarse classification used for status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    RouteNotFound,
    MethodNotAllowed,
    NotCallable,
    InvalidRequest,
    Unauthorized,
    AccessDenied,
    NotFound,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PatternSyntax { .. }
            | Error::InvalidRoute { .. }
            | Error::DuplicateRouteName { .. }
            | Error::UnknownRouteName { .. }
            | Error::MissingRouteParameter { .. }
            | Error::InvalidRouteParameter { .. }
            | Error::ServiceNotFound { .. }
            | Error::Config(_) => ErrorKind::Configuration,
            Error::RouteNotFound { .. } => ErrorKind::RouteNotFound,
            Error::MethodNotAllowed { .. } => ErrorKind::MethodNotAllowed,
            Error::HandlerNotCallable { .. } | Error::RouteNotCallable { .. } => {
                ErrorKind::NotCallable
            }
            Error::InvalidRequest(_) | Error::Serialization(_) => ErrorKind::InvalidRequest,
            Error::Unauthorized(_) => ErrorKind::Unauthorized,
            Error::AccessDenied(_) => ErrorKind::AccessDenied,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Io(_) | Error::Internal(_) | Error::Other(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    /// Methods that would have been accepted, for `Allow` headers.
    pub fn allowed_methods(&self) -> &[Method] {
        match self {
            Error::MethodNotAllowed { allowed, .. } => allowed,
            _ => &[],
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    pub fn other(e: impl Into<BoxError>) -> Self {
        Error::Other(e.into())
    }
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::AccessDenied => StatusCode::FORBIDDEN,
            ErrorKind::RouteNotFound | ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::Configuration | ErrorKind::NotCallable | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_qs::Error> for Error {
    fn from(e: serde_qs::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::InvalidRequest(e.to_string())
    }
}
