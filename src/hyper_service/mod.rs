#![forbid(unsafe_code)]

mod service;

pub use self::service::AppService;

use std::future::Future;
use std::pin::Pin;

use crate::error::BoxError;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
