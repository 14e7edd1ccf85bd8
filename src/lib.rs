//! Route patterns, route tables and handler dispatch on top of `http`.
//!
//! Handlers declare their routes (`GET /data/{id:[0-9]+}` → `get_data`) and an
//! explicit map from operation name to method. [`HandlerCaller`] invokes those
//! operations in-process through fabricated requests; [`App`] routes real
//! requests to every registered handler and renders errors as JSON.

#![deny(unsafe_code)]

pub mod app;
pub mod args;
pub mod auth;
pub mod binder;
pub mod caller;
pub mod config;
pub mod container;
pub mod error;
pub mod handler;
pub mod message;
pub mod pattern;
pub mod route;
pub mod table;

#[cfg(feature = "hyper-service")]
pub mod hyper_service;

pub use crate::app::{App, Next};
pub use crate::args::{Args, Value};
pub use crate::caller::HandlerCaller;
pub use crate::config::AppConfig;
pub use crate::container::Container;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::handler::{Endpoint, Endpoints, Handler};
pub use crate::message::{Request, RequestBody, Response, UploadedFile};
pub use crate::route::{Method, Route};
pub use crate::table::RouteTable;

#[cfg(feature = "hyper-service")]
pub use crate::hyper_service::AppService;
