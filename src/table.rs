//! Registered routes and the per-URL match cache.

use crate::args::Args;
use crate::binder;
use crate::error::{Error, Result};
use crate::pattern::{self, sanitize_url, ParsedPattern, Segment};
use crate::route::{Method, Route};

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use regex::Regex;
use smallvec::SmallVec;
use tracing::{debug, trace};

#[derive(Debug)]
pub struct RouteTable<T = ()> {
    entries: Vec<Entry<T>>,
    patterns: HashMap<Box<str>, Arc<ParsedPattern>>,
    names: HashMap<String, usize>,
    url_cache: RwLock<HashMap<String, Arc<UrlRoutes>>>,
    cache_capacity: Option<usize>,
    scans: AtomicUsize,
}

#[derive(Debug)]
struct Entry<T> {
    route: Route,
    pattern: Arc<ParsedPattern>,
    data: T,
}

/// Routes matching one concrete URL, keyed by method.
///
/// Methods keep the position of their first match; a later route with the
/// same method replaces the index in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlRoutes {
    by_method: SmallVec<[(Method, usize); 4]>,
}

impl UrlRoutes {
    pub fn get(&self, method: &Method) -> Option<usize> {
        self.by_method
            .iter()
            .find_map(|(m, i)| if m == method { Some(*i) } else { None })
    }

    pub fn first(&self) -> Option<usize> {
        self.by_method.first().map(|&(_, i)| i)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> + '_ {
        self.by_method.iter().map(|(m, _)| m)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Method, usize)> + '_ {
        self.by_method.iter().map(|(m, i)| (m, *i))
    }

    pub fn len(&self) -> usize {
        self.by_method.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_method.is_empty()
    }

    fn record(&mut self, method: &Method, index: usize) {
        match self.by_method.iter_mut().find(|(m, _)| m == method) {
            Some(slot) => slot.1 = index,
            None => self.by_method.push((method.clone(), index)),
        }
    }
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RouteTable<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            patterns: HashMap::new(),
            names: HashMap::new(),
            url_cache: RwLock::new(HashMap::new()),
            cache_capacity: None,
            scans: AtomicUsize::new(0),
        }
    }

    /// Bounds the URL cache; it is emptied whenever it reaches `capacity`.
    /// Unbounded by default.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = Some(capacity.max(1));
        self
    }

    /// Registers a route.
    ///
    /// Fails on a malformed pattern, an unsupported method or a name that is
    /// already taken.
    pub fn insert(&mut self, route: Route, data: T) -> Result<&mut Self> {
        route.check_method()?;

        if let Some(name) = route.route_name() {
            if self.names.contains_key(name) {
                return Err(Error::DuplicateRouteName {
                    name: name.to_owned(),
                });
            }
        }

        let pattern = self.parse_cached(route.pattern())?;
        let index = self.entries.len();

        if let Some(name) = route.route_name() {
            self.names.insert(name.to_owned(), index);
        }

        debug!(
            method = %route.method(),
            pattern = route.pattern(),
            target = route.target(),
            "route registered"
        );

        self.entries.push(Entry {
            route,
            pattern,
            data,
        });
        self.url_cache.get_mut().clear();
        Ok(self)
    }

    /// Routes whose pattern matches `url`, ignoring its query string.
    ///
    /// The result is cached per exact `url` string.
    pub fn routes_for_url(&self, url: &str) -> Result<Arc<UrlRoutes>> {
        if let Some(hit) = self.url_cache.read().get(url) {
            return if hit.is_empty() {
                Err(not_found(url))
            } else {
                Ok(Arc::clone(hit))
            };
        }

        let routes = Arc::new(self.scan(url));
        let routes = {
            let mut cache = self.url_cache.write();
            if let Some(cap) = self.cache_capacity {
                if cache.len() >= cap && !cache.contains_key(url) {
                    cache.clear();
                }
            }
            Arc::clone(cache.entry(url.to_owned()).or_insert(routes))
        };

        if routes.is_empty() {
            return Err(not_found(url));
        }
        Ok(routes)
    }

    pub fn method_allowed(&self, url: &str, method: Option<&Method>) -> Result<()> {
        let routes = self.routes_for_url(url)?;
        match method {
            Some(m) if routes.get(m).is_none() => Err(Error::MethodNotAllowed {
                url: url.to_owned(),
                method: m.clone(),
                allowed: routes.methods().cloned().collect(),
            }),
            _ => Ok(()),
        }
    }

    /// Index of the route serving `method` on `url`. Without a method, the
    /// first method matched for that URL is used.
    pub fn resolve(&self, url: &str, method: Option<&Method>) -> Result<usize> {
        let routes = self.routes_for_url(url)?;
        let index = match method {
            Some(m) => routes.get(m),
            None => routes.first(),
        };
        index.ok_or_else(|| Error::HandlerNotCallable {
            url: url.to_owned(),
            method: method.cloned().unwrap_or_default(),
        })
    }

    pub fn bind(&self, index: usize, url: &str) -> Result<Args> {
        let entry = &self.entries[index];
        binder::bind(&entry.route, &entry.pattern, url)
    }

    pub fn route(&self, index: usize) -> &Route {
        &self.entries[index].route
    }

    pub fn data(&self, index: usize) -> &T {
        &self.entries[index].data
    }

    pub fn pattern(&self, index: usize) -> &ParsedPattern {
        &self.entries[index].pattern
    }

    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Builds the path of a named route.
    ///
    /// Uses the longest alternative whose parameters are all supplied. Every
    /// supplied value must satisfy its parameter's constraint.
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String> {
        let index = self.find_by_name(name).ok_or_else(|| Error::UnknownRouteName {
            name: name.to_owned(),
        })?;
        let pattern = &self.entries[index].pattern;

        let lookup = |param: &str| {
            params
                .iter()
                .find_map(|&(k, v)| if k == param { Some(v) } else { None })
        };

        let mut missing = None;
        'alternatives: for alt in pattern.alternatives().iter().rev() {
            let mut url = String::new();
            for seg in alt.segments() {
                match seg {
                    Segment::Literal(text) => url.push_str(text),
                    Segment::Param { name: param, regex } => match lookup(&**param) {
                        Some(value) => {
                            check_param(pattern.source(), name, param, regex, value)?;
                            url.push_str(value);
                        }
                        None => {
                            missing = Some(param.to_string());
                            continue 'alternatives;
                        }
                    },
                }
            }
            return Ok(url);
        }

        Err(Error::MissingRouteParameter {
            name: name.to_owned(),
            param: missing.unwrap_or_default(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Route, &T)> + '_ {
        self.entries.iter().map(|e| (&e.route, &e.data))
    }

    /// Number of full scans over the registered routes, i.e. URL cache misses.
    pub fn match_scans(&self) -> usize {
        self.scans.load(Ordering::Relaxed)
    }

    pub fn cached_urls(&self) -> usize {
        self.url_cache.read().len()
    }
}

impl<T> RouteTable<T> {
    fn parse_cached(&mut self, source: &str) -> Result<Arc<ParsedPattern>> {
        if let Some(parsed) = self.patterns.get(source) {
            return Ok(Arc::clone(parsed));
        }
        let parsed = Arc::new(pattern::parse(source)?);
        self.patterns.insert(source.into(), Arc::clone(&parsed));
        Ok(parsed)
    }

    fn scan(&self, url: &str) -> UrlRoutes {
        self.scans.fetch_add(1, Ordering::Relaxed);
        let path = sanitize_url(url);

        let mut routes = UrlRoutes::default();
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.pattern.is_match(path) {
                routes.record(entry.route.method(), i);
            }
        }
        trace!(url, matched = routes.len(), "scanned routes for url");
        routes
    }
}

fn check_param(source: &str, name: &str, param: &str, regex: &str, value: &str) -> Result<()> {
    let re = Regex::new(&format!("^(?:{})$", regex)).map_err(|e| Error::PatternSyntax {
        pattern: source.to_owned(),
        reason: e.to_string(),
    })?;
    if re.is_match(value) {
        Ok(())
    } else {
        Err(Error::InvalidRouteParameter {
            name: name.to_owned(),
            param: param.to_owned(),
            value: value.to_owned(),
        })
    }
}

fn not_found(url: &str) -> Error {
    Error::RouteNotFound {
        url: url.to_owned(),
    }
}
