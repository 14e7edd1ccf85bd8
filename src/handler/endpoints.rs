use super::Endpoint;

use std::collections::HashMap;
use std::fmt;

/// Operation name to callable, built once per handler type.
pub struct Endpoints<H> {
    map: HashMap<&'static str, Endpoint<H>>,
}

impl<H> Endpoints<H> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn with(mut self, name: &'static str, endpoint: Endpoint<H>) -> Self {
        self.insert(name, endpoint);
        self
    }

    pub fn insert(&mut self, name: &'static str, endpoint: Endpoint<H>) -> &mut Self {
        self.map.insert(name, endpoint);
        self
    }

    pub fn get(&self, name: &str) -> Option<Endpoint<H>> {
        self.map.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<H> Default for Endpoints<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for Endpoints<H> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<H> fmt::Debug for Endpoints<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&&str> = self.map.keys().collect();
        names.sort();
        f.debug_struct("Endpoints").field("names", &names).finish()
    }
}

/// Builds [`Endpoints`] from handler methods, keyed by method name.
///
/// ```ignore
/// fn endpoints() -> Endpoints<Self> {
///     endpoints![Self::get_echo, Self::post_echo]
/// }
/// ```
#[macro_export]
macro_rules! endpoints {
    [$($ty:ident :: $name:ident),* $(,)?] => {{
        let mut __endpoints = $crate::handler::Endpoints::new();
        $(__endpoints.insert(stringify!($name), $ty::$name);)*
        __endpoints
    }};
}
